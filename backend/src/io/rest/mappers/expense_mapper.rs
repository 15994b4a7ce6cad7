use shared::{CreateExpenseRequest, Expense};

use crate::domain::commands::expenses::ExpenseInput;
use crate::domain::models::Expense as DomainExpense;

pub struct ExpenseMapper;

impl ExpenseMapper {
    /// Convert a create or update request into store input
    pub fn to_input(request: CreateExpenseRequest) -> ExpenseInput {
        ExpenseInput {
            description: request.description,
            amount: request.amount,
            category: request.category,
            date: request.date,
        }
    }

    pub fn to_dto(domain: DomainExpense) -> Expense {
        Expense {
            id: domain.id,
            description: domain.description,
            amount: domain.amount,
            category: domain.category,
            date: domain.date,
        }
    }

    pub fn to_dto_list<'a>(domain: impl IntoIterator<Item = &'a DomainExpense>) -> Vec<Expense> {
        domain.into_iter().cloned().map(Self::to_dto).collect()
    }
}
