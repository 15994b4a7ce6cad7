//! Errors surfaced by the record store. None of them are retried automatically;
//! the caller decides whether to try again.

use super::models::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No user is signed in")]
    NotAuthenticated,
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("A budget for category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error("Expense '{0}' not found")]
    ExpenseNotFound(String),
    #[error("Budget '{0}' not found")]
    BudgetNotFound(String),
}

impl StoreError {
    pub(crate) fn unavailable(error: anyhow::Error) -> Self {
        StoreError::StoreUnavailable(format!("{:#}", error))
    }

    /// Short machine-readable name used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotAuthenticated => "not_authenticated",
            StoreError::StoreUnavailable(_) => "store_unavailable",
            StoreError::DuplicateCategory(_) => "duplicate_category",
            StoreError::InvalidInput(_) => "invalid_input",
            StoreError::ExpenseNotFound(_) | StoreError::BudgetNotFound(_) => "not_found",
        }
    }
}
