use shared::{Budget, BudgetStatus, CreateBudgetRequest};

use crate::domain::commands::budgets::BudgetInput;
use crate::domain::models::{BudgetProgress, BudgetStatus as DomainBudgetStatus};

pub struct BudgetMapper;

impl BudgetMapper {
    pub fn to_input(request: CreateBudgetRequest) -> BudgetInput {
        BudgetInput {
            category: request.category,
            amount: request.amount,
        }
    }

    pub fn status_to_dto(status: DomainBudgetStatus) -> BudgetStatus {
        match status {
            DomainBudgetStatus::OnTrack => BudgetStatus::OnTrack,
            DomainBudgetStatus::Caution => BudgetStatus::Caution,
            DomainBudgetStatus::Warning => BudgetStatus::Warning,
            DomainBudgetStatus::OverBudget => BudgetStatus::OverBudget,
        }
    }

    /// Budget DTO with its derived spending figures
    pub fn to_dto(progress: BudgetProgress) -> Budget {
        Budget {
            progress_percent: progress.percent_used(),
            status: Self::status_to_dto(progress.status()),
            id: progress.id,
            category: progress.category,
            amount: progress.amount,
            spent: progress.spent,
            remaining: progress.remaining,
        }
    }

    pub fn to_dto_list(progress: Vec<BudgetProgress>) -> Vec<Budget> {
        progress.into_iter().map(Self::to_dto).collect()
    }
}
