//! # Storage Traits
//!
//! Storage abstractions the domain layer works against. Records are always
//! scoped to one user, mirroring the per-user `expenses` and `budgets`
//! sub-collections of a document database.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{Budget, BudgetDraft, Expense, ExpenseDraft};

#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// All expenses of a user, most recent first
    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>>;

    /// Store a new expense; the storage assigns its id
    async fn create_expense(&self, user_id: &str, draft: &ExpenseDraft) -> Result<Expense>;

    /// Replace an existing expense. Fails if the id is unknown.
    async fn update_expense(&self, user_id: &str, expense: &Expense) -> Result<()>;

    /// Returns true if the expense was found and deleted
    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait BudgetStorage: Send + Sync {
    async fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>>;

    /// Store a new budget; the storage assigns its id
    async fn create_budget(&self, user_id: &str, draft: &BudgetDraft) -> Result<Budget>;

    /// Replace an existing budget. Fails if the id is unknown.
    async fn update_budget(&self, user_id: &str, budget: &Budget) -> Result<()>;

    /// Returns true if the budget was found and deleted
    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<bool>;
}

/// Factory for the repositories of one storage backend.
///
/// The domain layer only sees this trait, so the backend can be swapped
/// without touching the record store.
pub trait Connection: Send + Sync + Clone + 'static {
    type ExpenseRepository: ExpenseStorage + 'static;
    type BudgetRepository: BudgetStorage + 'static;

    fn create_expense_repository(&self) -> Self::ExpenseRepository;

    fn create_budget_repository(&self) -> Self::BudgetRepository;
}
