use chrono::{DateTime, Utc};

use crate::domain::{Bill, BillId, User, ValidationError};
use crate::storage::BlobStore;

use super::{LedgerStore, StoreError};

/// Delete confirmation flow: a bill is first marked as the deletion
/// candidate, then the deletion is either confirmed or cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    PendingDelete(BillId),
}

/// Transient per-process state: who is acting, the pending deletion and the
/// message of the last failure. Never persisted.
#[derive(Debug, Default)]
pub struct Session {
    selected: Option<User>,
    delete_state: DeleteState,
    last_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.selected.as_ref()
    }

    pub fn delete_state(&self) -> &DeleteState {
        &self.delete_state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Switch the acting user. Switching to a different user drops any
    /// pending state; reselecting the current user keeps it.
    pub fn select_user(&mut self, user: User) {
        if self.selected.as_ref().is_some_and(|u| u.id != user.id) {
            self.reset();
        }
        self.selected = Some(user);
    }

    pub fn logout(&mut self) {
        self.selected = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.delete_state = DeleteState::Idle;
        self.last_error = None;
    }

    fn record<T>(&mut self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
        result
    }

    /// Record a bill as the selected user.
    pub fn add_bill<S: BlobStore>(
        &mut self,
        store: &mut LedgerStore<S>,
        amount: &str,
        category: &str,
        date: Option<DateTime<Utc>>,
        description: &str,
    ) -> Result<Bill, StoreError> {
        let result = store.add_bill(self.selected.as_ref(), amount, category, date, description);
        self.record(result)
    }

    /// Mark a bill for deletion. Only the owner of an existing bill can get
    /// past this step; otherwise the state stays `Idle`.
    pub fn request_delete<S: BlobStore>(
        &mut self,
        store: &LedgerStore<S>,
        bill_id: BillId,
    ) -> Result<(), StoreError> {
        let result = match &self.selected {
            None => Err(ValidationError::MissingUser.into()),
            Some(user) => match store.get_bill(&bill_id) {
                Some(bill) if bill.is_owned_by(user.id) => {
                    self.delete_state = DeleteState::PendingDelete(bill_id);
                    Ok(())
                }
                _ => Err(ValidationError::NotOwner.into()),
            },
        };
        self.record(result)
    }

    /// Apply the pending deletion. Returns the deleted id, or `None` when
    /// nothing was pending.
    pub fn confirm_delete<S: BlobStore>(
        &mut self,
        store: &mut LedgerStore<S>,
    ) -> Result<Option<BillId>, StoreError> {
        let DeleteState::PendingDelete(bill_id) = std::mem::take(&mut self.delete_state) else {
            return Ok(None);
        };
        let result = match &self.selected {
            Some(user) => store.delete_bill(&bill_id, user.id).map(|_| Some(bill_id)),
            None => Err(ValidationError::MissingUser.into()),
        };
        self.record(result)
    }

    pub fn cancel_delete(&mut self) {
        self.delete_state = DeleteState::Idle;
    }
}
