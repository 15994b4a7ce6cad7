//! Derived-data calculator.
//!
//! Everything here is computed from a [`RecordSnapshot`] on demand; nothing is
//! cached or stored. Sums run over expenses in snapshot order so results are
//! reproducible.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use crate::domain::models::{BudgetProgress, Expense};
use crate::domain::record_store::RecordSnapshot;

/// Total spent on one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DaySpending {
    pub day: NaiveDate,
    pub total: f64,
}

/// Figures for the dashboard overview cards
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingSummary {
    pub total_spending: f64,
    pub top_category: Option<String>,
    pub total_budgeted: f64,
    pub total_spent_against_budgets: f64,
    pub expense_count: usize,
    pub budget_count: usize,
}

pub struct DerivedData<'a> {
    snapshot: &'a RecordSnapshot,
    default_categories: &'a [String],
}

impl<'a> DerivedData<'a> {
    pub fn new(snapshot: &'a RecordSnapshot, default_categories: &'a [String]) -> Self {
        Self {
            snapshot,
            default_categories,
        }
    }

    pub fn total_spending(&self) -> f64 {
        self.snapshot.expenses.iter().map(|e| e.amount).sum()
    }

    /// Category → total spent. Categories without expenses are absent.
    pub fn spending_by_category(&self) -> BTreeMap<String, f64> {
        let mut spending = BTreeMap::new();
        for expense in &self.snapshot.expenses {
            *spending.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
        }
        spending
    }

    /// Categories by total spent, highest first; ties broken by name
    pub fn category_ranking(&self) -> Vec<(String, f64)> {
        let mut ranking: Vec<(String, f64)> = self.spending_by_category().into_iter().collect();
        ranking.sort_by(|(name_a, total_a), (name_b, total_b)| {
            total_b.total_cmp(total_a).then_with(|| name_a.cmp(name_b))
        });
        ranking
    }

    /// One entry per budget, sorted by category
    pub fn budget_progress(&self) -> Vec<BudgetProgress> {
        let spending = self.spending_by_category();
        let mut progress: Vec<BudgetProgress> = self
            .snapshot
            .budgets
            .iter()
            .map(|budget| {
                let spent = spending.get(&budget.category).copied().unwrap_or(0.0);
                BudgetProgress::new(budget, spent)
            })
            .collect();
        progress.sort_by(|a, b| a.category.cmp(&b.category));
        progress
    }

    /// Daily totals, oldest day first. Expenses whose date cannot be read are
    /// skipped.
    pub fn spending_over_time(&self) -> Vec<DaySpending> {
        let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for expense in &self.snapshot.expenses {
            match expense.day() {
                Some(day) => *by_day.entry(day).or_insert(0.0) += expense.amount,
                None => warn!("Invalid date for expense {}: '{}'", expense.id, expense.date),
            }
        }
        by_day
            .into_iter()
            .map(|(day, total)| DaySpending { day, total })
            .collect()
    }

    /// Default categories plus every category in use, deduplicated and sorted
    pub fn all_categories(&self) -> Vec<String> {
        let in_use = self
            .snapshot
            .expenses
            .iter()
            .map(|e| &e.category)
            .chain(self.snapshot.budgets.iter().map(|b| &b.category));

        self.default_categories
            .iter()
            .chain(in_use)
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    pub fn expenses_by_category(&self, category: &str) -> Vec<&'a Expense> {
        self.snapshot
            .expenses
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    pub fn summary(&self) -> SpendingSummary {
        let progress = self.budget_progress();
        SpendingSummary {
            total_spending: self.total_spending(),
            top_category: self.category_ranking().into_iter().next().map(|(name, _)| name),
            total_budgeted: progress.iter().map(|p| p.amount).sum(),
            total_spent_against_budgets: progress.iter().map(|p| p.spent).sum(),
            expense_count: self.snapshot.expenses.len(),
            budget_count: self.snapshot.budgets.len(),
        }
    }
}
