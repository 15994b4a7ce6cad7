//! # CSV Expense Repository
//!
//! Stores each user's expenses in `users/{uid}/expenses.csv`:
//!
//! ```csv
//! id,description,amount,category,date
//! expense::5f0c…,Groceries,42.5,Food,2024-03-09T00:00:00+00:00
//! ```

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::connection::{CsvConnection, EXPENSES_FILE};
use super::{read_records, write_records};
use crate::domain::models::{expense::sort_newest_first, Expense, ExpenseDraft};
use crate::storage::traits::ExpenseStorage;

const HEADER: [&str; 5] = ["id", "description", "amount", "category", "date"];

/// CSV record structure for expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExpenseRecord {
    id: String,
    description: String,
    amount: f64,
    category: String,
    date: String,
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        ExpenseRecord {
            id: expense.id.clone(),
            description: expense.description.clone(),
            amount: expense.amount,
            category: expense.category.clone(),
            date: expense.date.clone(),
        }
    }
}

impl From<ExpenseRecord> for Expense {
    fn from(record: ExpenseRecord) -> Self {
        Expense {
            id: record.id,
            description: record.description,
            amount: record.amount,
            category: record.category,
            date: record.date,
        }
    }
}

#[derive(Clone)]
pub struct ExpenseRepository {
    connection: CsvConnection,
}

impl ExpenseRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        let path = self
            .connection
            .ensure_collection_exists(user_id, EXPENSES_FILE, &HEADER.join(","))?;
        let records: Vec<ExpenseRecord> = read_records(&path)?;
        Ok(records.into_iter().map(Expense::from).collect())
    }

    fn write_expenses(&self, user_id: &str, expenses: &[Expense]) -> Result<()> {
        let path = self
            .connection
            .ensure_collection_exists(user_id, EXPENSES_FILE, &HEADER.join(","))?;
        let records: Vec<ExpenseRecord> = expenses.iter().map(ExpenseRecord::from).collect();
        write_records(&path, &HEADER, &records)
    }
}

#[async_trait]
impl ExpenseStorage for ExpenseRepository {
    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        let mut expenses = self.read_expenses(user_id)?;
        sort_newest_first(&mut expenses);
        debug!("Read {} expenses for user {}", expenses.len(), user_id);
        Ok(expenses)
    }

    async fn create_expense(&self, user_id: &str, draft: &ExpenseDraft) -> Result<Expense> {
        let mut expenses = self.read_expenses(user_id)?;
        let expense = Expense::from_draft(Expense::generate_id(), draft.clone());
        expenses.push(expense.clone());
        self.write_expenses(user_id, &expenses)?;
        info!("Stored expense {} for user {}", expense.id, user_id);
        Ok(expense)
    }

    async fn update_expense(&self, user_id: &str, expense: &Expense) -> Result<()> {
        let mut expenses = self.read_expenses(user_id)?;
        let existing = expenses
            .iter_mut()
            .find(|e| e.id == expense.id)
            .ok_or_else(|| anyhow!("Expense {} does not exist", expense.id))?;
        *existing = expense.clone();
        self.write_expenses(user_id, &expenses)?;
        info!("Updated expense {} for user {}", expense.id, user_id);
        Ok(())
    }

    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<bool> {
        let mut expenses = self.read_expenses(user_id)?;
        let before = expenses.len();
        expenses.retain(|e| e.id != expense_id);
        if expenses.len() == before {
            return Ok(false);
        }
        self.write_expenses(user_id, &expenses)?;
        info!("Deleted expense {} for user {}", expense_id, user_id);
        Ok(true)
    }
}
