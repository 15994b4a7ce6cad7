pub mod budget;
pub mod expense;

pub use budget::{Budget, BudgetDraft, BudgetProgress, BudgetStatus};
pub use expense::{Expense, ExpenseDraft};

/// Reasons a submitted expense or budget is rejected before reaching storage
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Description cannot be empty")]
    EmptyDescription,
    #[error("Description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("Amount must be positive")]
    NonPositiveAmount,
    #[error("Category cannot be empty")]
    EmptyCategory,
    #[error("Invalid date '{0}': expected RFC 3339 or YYYY-MM-DD")]
    InvalidDate(String),
    #[error("User id cannot be empty")]
    EmptyUserId,
}

pub(crate) fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ValidationError::NonPositiveAmount)
    }
}

pub(crate) fn validate_category(category: &str) -> Result<String, ValidationError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    Ok(category.to_string())
}
