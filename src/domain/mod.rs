mod bill;
mod calendar;
mod category;
mod ledger;
mod money;
mod user;

pub use bill::*;
pub use calendar::*;
pub use category::*;
pub use ledger::*;
pub use money::*;
pub use user::*;
