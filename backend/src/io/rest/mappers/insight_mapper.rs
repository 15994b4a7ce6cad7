use shared::{CategorySpending, DailySpending, DashboardSummary};

use crate::domain::derived_data::{DaySpending, SpendingSummary};

pub struct InsightMapper;

impl InsightMapper {
    pub fn to_category_spending(ranking: Vec<(String, f64)>) -> Vec<CategorySpending> {
        ranking
            .into_iter()
            .map(|(category, total)| CategorySpending { category, total })
            .collect()
    }

    pub fn to_daily_spending(series: Vec<DaySpending>) -> Vec<DailySpending> {
        series
            .into_iter()
            .map(|point| DailySpending {
                date: point.day.format("%Y-%m-%d").to_string(),
                total: point.total,
            })
            .collect()
    }

    pub fn to_dashboard_summary(summary: SpendingSummary) -> DashboardSummary {
        DashboardSummary {
            total_spending: summary.total_spending,
            top_category: summary.top_category,
            total_budgeted: summary.total_budgeted,
            total_spent_against_budgets: summary.total_spent_against_budgets,
            expense_count: summary.expense_count,
            budget_count: summary.budget_count,
        }
    }
}
