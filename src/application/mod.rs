// Application layer: the ledger store and the interactive session on top of it.

pub mod error;
pub mod session;
pub mod store;

pub use error::*;
pub use session::*;
pub use store::*;
