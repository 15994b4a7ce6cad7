//! Record store: the signed-in user's expenses and budgets held in memory and
//! mirrored to storage.
//!
//! Every mutation goes through the typed operations below. State lives behind
//! a synchronous lock that is never held across an await. Mutations and the
//! fetch-and-apply step of a load are serialized by an async write gate, so
//! the one-budget-per-category check and the write it guards happen as one
//! step and a load never replaces memory with a fetch older than a write.
//!
//! Each load start and each clear bumps the session epoch. A load that
//! finishes under a different epoch than it started with is discarded, so a
//! slow load can never resurrect a session that was signed out or replaced.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    commands::{budgets::BudgetInput, expenses::ExpenseInput, session::LoadOutcome},
    errors::StoreError,
    models::{expense::sort_newest_first, Budget, Expense, ValidationError},
};
use crate::storage::{BudgetStorage, Connection, ExpenseStorage};
use shared::SessionPhase;

/// Copy of the in-memory collections at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSnapshot {
    /// Most recent first
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub user_id: Option<String>,
    pub phase: SessionPhase,
}

impl SessionStatus {
    pub fn loaded(&self) -> bool {
        self.phase == SessionPhase::Ready
    }
}

struct SessionState {
    user_id: Option<String>,
    phase: SessionPhase,
    epoch: u64,
    expenses: Vec<Expense>,
    budgets: Vec<Budget>,
}

impl SessionState {
    fn empty() -> Self {
        Self {
            user_id: None,
            phase: SessionPhase::Uninitialized,
            epoch: 0,
            expenses: Vec::new(),
            budgets: Vec::new(),
        }
    }

    fn is_user(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }

    fn upsert_expense(&mut self, expense: Expense) {
        match self.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => *existing = expense,
            None => self.expenses.push(expense),
        }
        sort_newest_first(&mut self.expenses);
    }

    fn upsert_budget(&mut self, budget: Budget) {
        match self.budgets.iter_mut().find(|b| b.id == budget.id) {
            Some(existing) => *existing = budget,
            None => self.budgets.push(budget),
        }
    }
}

pub struct RecordStore<C: Connection> {
    expense_repository: C::ExpenseRepository,
    budget_repository: C::BudgetRepository,
    state: RwLock<SessionState>,
    write_gate: Mutex<()>,
}

impl<C: Connection> RecordStore<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            expense_repository: connection.create_expense_repository(),
            budget_repository: connection.create_budget_repository(),
            state: RwLock::new(SessionState::empty()),
            write_gate: Mutex::new(()),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.read_state();
        SessionStatus {
            user_id: state.user_id.clone(),
            phase: state.phase,
        }
    }

    pub fn snapshot(&self) -> RecordSnapshot {
        let state = self.read_state();
        RecordSnapshot {
            expenses: state.expenses.clone(),
            budgets: state.budgets.clone(),
        }
    }

    /// Fetch all of a user's records and make them the current session.
    pub async fn load_session(&self, user_id: &str) -> Result<LoadOutcome, StoreError> {
        if user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId.into());
        }

        let epoch = {
            let mut state = self.write_state();
            if state.is_user(user_id) && state.phase == SessionPhase::Ready {
                debug!("Session for {} already loaded", user_id);
                return Ok(LoadOutcome::AlreadyLoaded);
            }
            if !state.is_user(user_id) {
                state.expenses.clear();
                state.budgets.clear();
            }
            state.user_id = Some(user_id.to_string());
            state.phase = SessionPhase::Loading;
            state.epoch += 1;
            state.epoch
        };

        let _gate = self.write_gate.lock().await;
        if self.read_state().epoch != epoch {
            info!("Load for user {} superseded before it started", user_id);
            return Ok(LoadOutcome::Superseded);
        }

        info!("Loading records for user {}", user_id);
        let fetched = self.fetch_all(user_id).await;

        let mut state = self.write_state();
        if state.epoch != epoch || !state.is_user(user_id) {
            info!("Discarding stale load for user {}", user_id);
            return Ok(LoadOutcome::Superseded);
        }

        match fetched {
            Ok((mut expenses, budgets)) => {
                sort_newest_first(&mut expenses);
                let outcome = LoadOutcome::Loaded {
                    expenses: expenses.len(),
                    budgets: budgets.len(),
                };
                state.expenses = expenses;
                state.budgets = budgets;
                state.phase = SessionPhase::Ready;
                info!("Session ready for {}: {:?}", user_id, outcome);
                Ok(outcome)
            }
            Err(e) => {
                state.phase = SessionPhase::Failed;
                warn!("Failed to load records for {}: {:#}", user_id, e);
                Err(StoreError::unavailable(e))
            }
        }
    }

    async fn fetch_all(&self, user_id: &str) -> anyhow::Result<(Vec<Expense>, Vec<Budget>)> {
        let expenses = self.expense_repository.list_expenses(user_id).await?;
        let budgets = self.budget_repository.list_budgets(user_id).await?;
        Ok((expenses, budgets))
    }

    /// Forget the current user and everything loaded for them. No storage call.
    pub fn clear_session(&self) {
        let mut state = self.write_state();
        let epoch = state.epoch + 1;
        *state = SessionState::empty();
        state.epoch = epoch;
        info!("Session cleared");
    }

    fn active_user(&self) -> Result<String, StoreError> {
        self.read_state()
            .user_id
            .clone()
            .ok_or(StoreError::NotAuthenticated)
    }

    /// Apply a successful write to memory if the session still belongs to the writer.
    fn apply_for(&self, user_id: &str, apply: impl FnOnce(&mut SessionState)) {
        let mut state = self.write_state();
        if state.is_user(user_id) {
            apply(&mut state);
        } else {
            debug!("Session changed during write for {}; memory left as is", user_id);
        }
    }

    pub async fn add_expense(&self, input: ExpenseInput) -> Result<Expense, StoreError> {
        let draft = input.validate()?;
        let _gate = self.write_gate.lock().await;
        let user_id = self.active_user()?;

        let expense = self
            .expense_repository
            .create_expense(&user_id, &draft)
            .await
            .map_err(StoreError::unavailable)?;

        self.apply_for(&user_id, |state| state.upsert_expense(expense.clone()));
        Ok(expense)
    }

    pub async fn update_expense(&self, id: &str, input: ExpenseInput) -> Result<Expense, StoreError> {
        let draft = input.validate()?;
        let _gate = self.write_gate.lock().await;
        let user_id = self.active_user()?;

        let expenses = self.current_expenses(&user_id).await?;
        if !expenses.iter().any(|e| e.id == id) {
            return Err(StoreError::ExpenseNotFound(id.to_string()));
        }

        let expense = Expense::from_draft(id.to_string(), draft);
        self.expense_repository
            .update_expense(&user_id, &expense)
            .await
            .map_err(StoreError::unavailable)?;

        self.apply_for(&user_id, |state| state.upsert_expense(expense.clone()));
        Ok(expense)
    }

    /// Delete an expense. Storage is always asked, even when the id is not held
    /// in memory; returns whether memory held it.
    pub async fn delete_expense(&self, id: &str) -> Result<bool, StoreError> {
        let _gate = self.write_gate.lock().await;
        let user_id = self.active_user()?;

        self.expense_repository
            .delete_expense(&user_id, id)
            .await
            .map_err(StoreError::unavailable)?;

        let mut removed = false;
        self.apply_for(&user_id, |state| {
            let before = state.expenses.len();
            state.expenses.retain(|e| e.id != id);
            removed = state.expenses.len() != before;
        });
        Ok(removed)
    }

    /// Expenses currently known for the user: memory once loaded, otherwise storage.
    async fn current_expenses(&self, user_id: &str) -> Result<Vec<Expense>, StoreError> {
        {
            let state = self.read_state();
            if state.is_user(user_id) && state.phase == SessionPhase::Ready {
                return Ok(state.expenses.clone());
            }
        }
        self.expense_repository
            .list_expenses(user_id)
            .await
            .map_err(StoreError::unavailable)
    }

    /// Budgets currently known for the user: memory once loaded, otherwise storage.
    async fn current_budgets(&self, user_id: &str) -> Result<Vec<Budget>, StoreError> {
        {
            let state = self.read_state();
            if state.is_user(user_id) && state.phase == SessionPhase::Ready {
                return Ok(state.budgets.clone());
            }
        }
        self.budget_repository
            .list_budgets(user_id)
            .await
            .map_err(StoreError::unavailable)
    }

    pub async fn add_budget(&self, input: BudgetInput) -> Result<Budget, StoreError> {
        let draft = input.validate()?;
        let _gate = self.write_gate.lock().await;
        let user_id = self.active_user()?;

        let budgets = self.current_budgets(&user_id).await?;
        if budgets.iter().any(|b| b.category == draft.category) {
            return Err(StoreError::DuplicateCategory(draft.category));
        }

        let budget = self
            .budget_repository
            .create_budget(&user_id, &draft)
            .await
            .map_err(StoreError::unavailable)?;

        self.apply_for(&user_id, |state| state.upsert_budget(budget.clone()));
        Ok(budget)
    }

    pub async fn update_budget(&self, id: &str, input: BudgetInput) -> Result<Budget, StoreError> {
        let draft = input.validate()?;
        let _gate = self.write_gate.lock().await;
        let user_id = self.active_user()?;

        let budgets = self.current_budgets(&user_id).await?;
        if !budgets.iter().any(|b| b.id == id) {
            return Err(StoreError::BudgetNotFound(id.to_string()));
        }
        if budgets
            .iter()
            .any(|b| b.id != id && b.category == draft.category)
        {
            return Err(StoreError::DuplicateCategory(draft.category));
        }

        let budget = Budget::from_draft(id.to_string(), draft);
        self.budget_repository
            .update_budget(&user_id, &budget)
            .await
            .map_err(StoreError::unavailable)?;

        self.apply_for(&user_id, |state| state.upsert_budget(budget.clone()));
        Ok(budget)
    }

    pub async fn delete_budget(&self, id: &str) -> Result<bool, StoreError> {
        let _gate = self.write_gate.lock().await;
        let user_id = self.active_user()?;

        self.budget_repository
            .delete_budget(&user_id, id)
            .await
            .map_err(StoreError::unavailable)?;

        let mut removed = false;
        self.apply_for(&user_id, |state| {
            let before = state.budgets.len();
            state.budgets.retain(|b| b.id != id);
            removed = state.budgets.len() != before;
        });
        Ok(removed)
    }
}
