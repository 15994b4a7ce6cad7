//! # CSV Budget Repository
//!
//! Stores each user's budgets in `users/{uid}/budgets.csv`. Only the cap is
//! persisted; spending figures are derived on read.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::connection::{CsvConnection, BUDGETS_FILE};
use super::{read_records, write_records};
use crate::domain::models::{Budget, BudgetDraft};
use crate::storage::traits::BudgetStorage;

const HEADER: [&str; 3] = ["id", "category", "amount"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BudgetRecord {
    id: String,
    category: String,
    amount: f64,
}

impl From<&Budget> for BudgetRecord {
    fn from(budget: &Budget) -> Self {
        BudgetRecord {
            id: budget.id.clone(),
            category: budget.category.clone(),
            amount: budget.amount,
        }
    }
}

impl From<BudgetRecord> for Budget {
    fn from(record: BudgetRecord) -> Self {
        Budget {
            id: record.id,
            category: record.category,
            amount: record.amount,
        }
    }
}

#[derive(Clone)]
pub struct BudgetRepository {
    connection: CsvConnection,
}

impl BudgetRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        let path = self
            .connection
            .ensure_collection_exists(user_id, BUDGETS_FILE, &HEADER.join(","))?;
        let records: Vec<BudgetRecord> = read_records(&path)?;
        Ok(records.into_iter().map(Budget::from).collect())
    }

    fn write_budgets(&self, user_id: &str, budgets: &[Budget]) -> Result<()> {
        let path = self
            .connection
            .ensure_collection_exists(user_id, BUDGETS_FILE, &HEADER.join(","))?;
        let records: Vec<BudgetRecord> = budgets.iter().map(BudgetRecord::from).collect();
        write_records(&path, &HEADER, &records)
    }
}

#[async_trait]
impl BudgetStorage for BudgetRepository {
    async fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        let budgets = self.read_budgets(user_id)?;
        debug!("Read {} budgets for user {}", budgets.len(), user_id);
        Ok(budgets)
    }

    async fn create_budget(&self, user_id: &str, draft: &BudgetDraft) -> Result<Budget> {
        let mut budgets = self.read_budgets(user_id)?;
        let budget = Budget::from_draft(Budget::generate_id(), draft.clone());
        budgets.push(budget.clone());
        self.write_budgets(user_id, &budgets)?;
        info!("Stored budget {} ({}) for user {}", budget.id, budget.category, user_id);
        Ok(budget)
    }

    async fn update_budget(&self, user_id: &str, budget: &Budget) -> Result<()> {
        let mut budgets = self.read_budgets(user_id)?;
        let existing = budgets
            .iter_mut()
            .find(|b| b.id == budget.id)
            .ok_or_else(|| anyhow!("Budget {} does not exist", budget.id))?;
        *existing = budget.clone();
        self.write_budgets(user_id, &budgets)?;
        info!("Updated budget {} for user {}", budget.id, user_id);
        Ok(())
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<bool> {
        let mut budgets = self.read_budgets(user_id)?;
        let before = budgets.len();
        budgets.retain(|b| b.id != budget_id);
        if budgets.len() == before {
            return Ok(false);
        }
        self.write_budgets(user_id, &budgets)?;
        info!("Deleted budget {} for user {}", budget_id, user_id);
        Ok(true)
    }
}
