//! In-memory storage used by domain and REST tests. Reads and writes can be
//! made to fail, and loads can be held open to exercise session races.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use crate::domain::models::{expense::sort_newest_first, Budget, BudgetDraft, Expense, ExpenseDraft};
use crate::storage::traits::{BudgetStorage, Connection, ExpenseStorage};

#[derive(Clone, Default)]
pub struct MemoryConnection {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    expenses: Mutex<HashMap<String, Vec<Expense>>>,
    budgets: Mutex<HashMap<String, Vec<Budget>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    load_gate: Mutex<Option<watch::Receiver<bool>>>,
    loads_started: AtomicUsize,
    expense_deletes: AtomicUsize,
    next_id: AtomicU64,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every following `list_expenses` take its snapshot, then wait until the
    /// returned sender sends `true`
    pub fn hold_loads(&self) -> watch::Sender<bool> {
        let (sender, receiver) = watch::channel(false);
        *self.inner.load_gate.lock().unwrap() = Some(receiver);
        sender
    }

    pub fn loads_started(&self) -> usize {
        self.inner.loads_started.load(Ordering::SeqCst)
    }

    pub fn expense_deletes(&self) -> usize {
        self.inner.expense_deletes.load(Ordering::SeqCst)
    }

    pub fn seed_expense(&self, user_id: &str, expense: Expense) {
        self.inner
            .expenses
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(expense);
    }

    pub fn seed_budget(&self, user_id: &str, budget: Budget) {
        self.inner
            .budgets
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(budget);
    }

    pub fn stored_budgets(&self, user_id: &str) -> Vec<Budget> {
        self.inner
            .budgets
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn check_reads(&self) -> Result<()> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            bail!("simulated read failure");
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            bail!("simulated write failure");
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}::{}", prefix, id)
    }
}

impl Connection for MemoryConnection {
    type ExpenseRepository = MemoryConnection;
    type BudgetRepository = MemoryConnection;

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        self.clone()
    }

    fn create_budget_repository(&self) -> Self::BudgetRepository {
        self.clone()
    }
}

#[async_trait]
impl ExpenseStorage for MemoryConnection {
    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        self.inner.loads_started.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;

        // Snapshot first, so a held load returns what was stored when it started
        let mut expenses = self
            .inner
            .expenses
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        sort_newest_first(&mut expenses);

        let gate = self.inner.load_gate.lock().unwrap().clone();
        if let Some(mut gate) = gate {
            gate.wait_for(|open| *open).await?;
        }
        Ok(expenses)
    }

    async fn create_expense(&self, user_id: &str, draft: &ExpenseDraft) -> Result<Expense> {
        self.check_writes()?;
        let expense = Expense::from_draft(self.next_id("expense"), draft.clone());
        self.seed_expense(user_id, expense.clone());
        Ok(expense)
    }

    async fn update_expense(&self, user_id: &str, expense: &Expense) -> Result<()> {
        self.check_writes()?;
        let mut expenses = self.inner.expenses.lock().unwrap();
        let existing = expenses
            .get_mut(user_id)
            .and_then(|list| list.iter_mut().find(|e| e.id == expense.id))
            .ok_or_else(|| anyhow!("Expense {} does not exist", expense.id))?;
        *existing = expense.clone();
        Ok(())
    }

    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<bool> {
        self.inner.expense_deletes.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;
        let mut expenses = self.inner.expenses.lock().unwrap();
        let Some(list) = expenses.get_mut(user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|e| e.id != expense_id);
        Ok(list.len() != before)
    }
}

#[async_trait]
impl BudgetStorage for MemoryConnection {
    async fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        self.check_reads()?;
        Ok(self.stored_budgets(user_id))
    }

    async fn create_budget(&self, user_id: &str, draft: &BudgetDraft) -> Result<Budget> {
        self.check_writes()?;
        let budget = Budget::from_draft(self.next_id("budget"), draft.clone());
        self.seed_budget(user_id, budget.clone());
        Ok(budget)
    }

    async fn update_budget(&self, user_id: &str, budget: &Budget) -> Result<()> {
        self.check_writes()?;
        let mut budgets = self.inner.budgets.lock().unwrap();
        let existing = budgets
            .get_mut(user_id)
            .and_then(|list| list.iter_mut().find(|b| b.id == budget.id))
            .ok_or_else(|| anyhow!("Budget {} does not exist", budget.id))?;
        *existing = budget.clone();
        Ok(())
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<bool> {
        self.check_writes()?;
        let mut budgets = self.inner.budgets.lock().unwrap();
        let Some(list) = budgets.get_mut(user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|b| b.id != budget_id);
        Ok(list.len() != before)
    }
}
