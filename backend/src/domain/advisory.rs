//! Contract for the external AI advisory service.

use async_trait::async_trait;

/// Shortest trimmed description worth sending for a category suggestion
pub const MIN_DESCRIPTION_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySuggestion {
    pub category: String,
    /// Always within [0, 1]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialTips {
    pub tips: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("Invalid advisory request: {0}")]
    InvalidInput(String),
    #[error("Advisory service unavailable: {0}")]
    Unavailable(String),
    #[error("Advisory service returned an unexpected response: {0}")]
    MalformedResponse(String),
}

impl AdvisoryError {
    pub fn code(&self) -> &'static str {
        match self {
            AdvisoryError::InvalidInput(_) => "invalid_input",
            AdvisoryError::Unavailable(_) => "advisor_unavailable",
            AdvisoryError::MalformedResponse(_) => "advisor_bad_response",
        }
    }
}

#[async_trait]
pub trait AdvisoryService: Send + Sync {
    async fn suggest_category(&self, description: &str) -> Result<CategorySuggestion, AdvisoryError>;

    /// Freshly generated on every call; nothing is cached
    async fn financial_tips(&self) -> Result<FinancialTips, AdvisoryError>;
}

/// Trimmed description, or `InvalidInput` when it is too short to classify
pub fn validate_description(description: &str) -> Result<&str, AdvisoryError> {
    let trimmed = description.trim();
    if trimmed.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(AdvisoryError::InvalidInput(format!(
            "Description must be at least {} characters",
            MIN_DESCRIPTION_CHARS
        )));
    }
    Ok(trimmed)
}
