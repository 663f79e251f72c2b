use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, DayZone, User, UserId, amount_serde, format_amount_plain};

/// Opaque bill identifier. New ids are random UUID v4 strings; ids read from
/// older ledgers are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(String);

impl BillId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BillId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BillId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// A single recorded expense. Bills are immutable once recorded; the only
/// way to change one is to delete it and record a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    pub user_id: UserId,
    /// Name of the user at the time the bill was recorded
    pub user_name: String,
    #[serde(with = "amount_serde")]
    pub amount: Cents,
    /// When the expense happened
    pub date: DateTime<Utc>,
    /// Category id (e.g., "food", "transport")
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Bill {
    pub fn new(user: &User, amount: Cents, date: DateTime<Utc>, category: impl Into<String>) -> Self {
        Self {
            id: BillId::generate(),
            user_id: user.id,
            user_name: user.name.clone(),
            amount,
            date,
            category: category.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Calendar day of the bill as seen from the given zone.
    pub fn calendar_date(&self, zone: &DayZone) -> NaiveDate {
        zone.date_of(&self.date)
    }

    /// Returns true if the user name or description contains `term`
    /// (case-insensitive), or the plain amount rendering contains it.
    pub fn matches_term(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.user_name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || format_amount_plain(self.amount).contains(term)
    }
}
