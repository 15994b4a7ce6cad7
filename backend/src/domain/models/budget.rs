use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{validate_amount, validate_category, ValidationError};

/// Persisted part of a budget. Spending figures live in [`BudgetProgress`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDraft {
    pub category: String,
    pub amount: f64,
}

impl Budget {
    pub fn generate_id() -> String {
        format!("budget::{}", Uuid::new_v4())
    }

    pub fn from_draft(id: String, draft: BudgetDraft) -> Self {
        Self {
            id,
            category: draft.category,
            amount: draft.amount,
        }
    }
}

impl BudgetDraft {
    pub fn new(category: &str, amount: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            category: validate_category(category)?,
            amount: validate_amount(amount)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    OnTrack,
    Caution,
    Warning,
    OverBudget,
}

/// A budget joined with what has been spent in its category
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub spent: f64,
    /// `amount - spent`, negative when over budget
    pub remaining: f64,
}

impl BudgetProgress {
    pub fn new(budget: &Budget, spent: f64) -> Self {
        Self {
            id: budget.id.clone(),
            category: budget.category.clone(),
            amount: budget.amount,
            spent,
            remaining: budget.amount - spent,
        }
    }

    /// Spent as a percentage of the cap; a zero cap reports 0.
    pub fn percent_used(&self) -> f64 {
        if self.amount > 0.0 {
            self.spent / self.amount * 100.0
        } else {
            0.0
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.amount
    }

    pub fn status(&self) -> BudgetStatus {
        let percent = self.percent_used();
        if self.is_over_budget() {
            BudgetStatus::OverBudget
        } else if percent >= 70.0 {
            BudgetStatus::Warning
        } else if percent > 50.0 {
            BudgetStatus::Caution
        } else {
            BudgetStatus::OnTrack
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(amount: f64, spent: f64) -> BudgetProgress {
        let budget = Budget {
            id: "budget::1".to_string(),
            category: "Food".to_string(),
            amount,
        };
        BudgetProgress::new(&budget, spent)
    }

    #[test]
    fn test_remaining_is_not_clamped() {
        let over = progress(50.0, 75.0);
        assert_eq!(over.remaining, -25.0);
        assert!(over.is_over_budget());
        assert_eq!(over.status(), BudgetStatus::OverBudget);
    }

    #[test]
    fn test_zero_amount_reports_zero_percent() {
        let zero = progress(0.0, 0.0);
        assert_eq!(zero.percent_used(), 0.0);
        assert_eq!(zero.status(), BudgetStatus::OnTrack);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(progress(100.0, 50.0).status(), BudgetStatus::OnTrack);
        assert_eq!(progress(100.0, 50.5).status(), BudgetStatus::Caution);
        assert_eq!(progress(100.0, 70.0).status(), BudgetStatus::Warning);
        assert_eq!(progress(100.0, 100.0).status(), BudgetStatus::Warning);
        assert_eq!(progress(100.0, 100.01).status(), BudgetStatus::OverBudget);
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(
            BudgetDraft::new(" Food ", 100.0).unwrap().category,
            "Food"
        );
        assert_eq!(BudgetDraft::new("", 100.0), Err(ValidationError::EmptyCategory));
        assert_eq!(
            BudgetDraft::new("Food", -1.0),
            Err(ValidationError::NonPositiveAmount)
        );
    }
}
