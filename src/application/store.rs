use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::domain::{
    self, Bill, BillId, Category, DayZone, TotalCents, User, UserId, ValidationError,
    find_category, parse_cents,
};
use crate::storage::{BILLS_KEY, BlobStore};

use super::StoreError;

/// What to do when the persisted blob cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Treat the ledger as empty and log a warning.
    #[default]
    Lenient,
    /// Fail with `StoreError::Corrupt`.
    Strict,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Key of the slot holding the serialized bills
    pub key: String,
    pub load_policy: LoadPolicy,
    /// Zone used to decide which calendar day a bill falls on
    pub time_zone: DayZone,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: BILLS_KEY.to_string(),
            load_policy: LoadPolicy::default(),
            time_zone: DayZone::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    pub fn with_time_zone(mut self, zone: DayZone) -> Self {
        self.time_zone = zone;
        self
    }
}

/// The ledger of shared bills. Holds the ordered bill sequence in memory and
/// rewrites the whole sequence through the blob store on every change.
/// This is the primary interface for any client (CLI, tests, etc.).
pub struct LedgerStore<S: BlobStore> {
    blobs: S,
    config: StoreConfig,
    bills: Vec<Bill>,
}

impl<S: BlobStore> LedgerStore<S> {
    /// Open the ledger with the default configuration.
    pub fn open(blobs: S) -> Result<Self, StoreError> {
        Self::with_config(blobs, StoreConfig::default())
    }

    /// Open the ledger, loading the persisted bills once.
    pub fn with_config(blobs: S, config: StoreConfig) -> Result<Self, StoreError> {
        let mut store = Self {
            blobs,
            config,
            bills: Vec::new(),
        };
        store.bills = store.load_all()?;
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Decode the persisted bills. An absent slot is an empty ledger.
    pub fn load_all(&self) -> Result<Vec<Bill>, StoreError> {
        let Some(blob) = self.blobs.read(&self.config.key)? else {
            debug!(key = %self.config.key, "no persisted ledger, starting empty");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Bill>>(&blob) {
            Ok(bills) => {
                debug!(key = %self.config.key, count = bills.len(), "loaded ledger");
                Ok(bills)
            }
            Err(err) => match self.config.load_policy {
                LoadPolicy::Lenient => {
                    warn!(key = %self.config.key, error = %err, "persisted ledger is malformed, starting empty");
                    Ok(Vec::new())
                }
                LoadPolicy::Strict => Err(StoreError::Corrupt(err.to_string())),
            },
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&self.bills)
            .map_err(|err| StoreError::Storage(err.into()))?;
        self.blobs.write(&self.config.key, &blob)?;
        debug!(key = %self.config.key, count = self.bills.len(), "persisted ledger");
        Ok(())
    }

    // ========================
    // Mutations
    // ========================

    /// Record a new bill for the selected user.
    ///
    /// Checks run in order: user, amount, category. When `date` is `None`
    /// the bill is stamped with the current time.
    pub fn add_bill(
        &mut self,
        selected_user: Option<&User>,
        amount: &str,
        category: &str,
        date: Option<DateTime<Utc>>,
        description: &str,
    ) -> Result<Bill, StoreError> {
        let user = selected_user.ok_or(ValidationError::MissingUser)?;
        let amount_cents = parse_cents(amount).map_err(|_| ValidationError::InvalidAmount)?;

        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError::MissingCategory.into());
        }
        if find_category(category).is_none() {
            return Err(ValidationError::UnknownCategory(category.to_string()).into());
        }

        let bill = Bill::new(user, amount_cents, date.unwrap_or_else(Utc::now), category)
            .with_description(description.trim());

        self.bills.push(bill.clone());
        if let Err(err) = self.persist() {
            self.bills.pop();
            return Err(err);
        }

        info!(id = %bill.id, user = %bill.user_name, amount = bill.amount, "recorded bill");
        Ok(bill)
    }

    /// Delete a bill on behalf of `requesting_user_id`. Missing bills and
    /// bills owned by someone else both report `NotOwner`.
    pub fn delete_bill(
        &mut self,
        bill_id: &BillId,
        requesting_user_id: UserId,
    ) -> Result<(), StoreError> {
        let position = self
            .bills
            .iter()
            .position(|b| &b.id == bill_id && b.is_owned_by(requesting_user_id))
            .ok_or(ValidationError::NotOwner)?;

        let removed = self.bills.remove(position);
        if let Err(err) = self.persist() {
            self.bills.insert(position, removed);
            return Err(err);
        }

        info!(id = %bill_id, user = requesting_user_id, "deleted bill");
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    /// All bills in insertion order.
    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn get_bill(&self, id: &BillId) -> Option<&Bill> {
        self.bills.iter().find(|b| &b.id == id)
    }

    pub fn total_for_user(&self, user_id: UserId) -> TotalCents {
        domain::total_for_user(user_id, &self.bills)
    }

    pub fn total_for_category(&self, category_id: &str) -> TotalCents {
        domain::total_for_category(category_id, &self.bills)
    }

    pub fn grand_total(&self) -> TotalCents {
        domain::grand_total(&self.bills)
    }

    pub fn user_totals(&self) -> Vec<(User, TotalCents)> {
        domain::user_totals(&self.bills)
    }

    pub fn category_totals(&self) -> Vec<(Category, TotalCents)> {
        domain::category_totals(&self.bills)
    }

    /// Bills matching `term`, optionally limited to one calendar day, newest first.
    pub fn search(&self, term: &str, date_filter: Option<NaiveDate>) -> Vec<Bill> {
        domain::search_bills(&self.bills, term, date_filter, &self.config.time_zone)
    }
}
