use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense ID in format: "expense::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// What the money was spent on (1-100 characters)
    pub description: String,
    /// Amount spent, always positive
    pub amount: f64,
    /// Free-text category label
    pub category: String,
    /// Timestamp with timezone (RFC 3339)
    pub date: String,
}

/// Budget with its derived spending figures.
///
/// `spent`, `remaining`, `progress_percent` and `status` are computed from the
/// current expenses on every read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID in format: "budget::<uuid>"
    pub id: String,
    pub category: String,
    /// Spending cap for the category
    pub amount: f64,
    pub spent: f64,
    /// May be negative when the category is over budget
    pub remaining: f64,
    /// Spent as a percentage of the cap (0 for a zero cap)
    pub progress_percent: f64,
    pub status: BudgetStatus,
}

/// How close a budget is to its cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// 50% or less of the cap spent
    OnTrack,
    /// More than 50% spent
    Caution,
    /// 70% or more spent
    Warning,
    /// Spent exceeds the cap
    OverBudget,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::OnTrack => "on track",
            BudgetStatus::Caution => "caution",
            BudgetStatus::Warning => "warning",
            BudgetStatus::OverBudget => "over budget",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub description: String,
    pub amount: f64,
    pub category: String,
    /// RFC 3339 timestamp or YYYY-MM-DD date
    pub date: String,
}

/// Full replacement of an existing expense
pub type UpdateExpenseRequest = CreateExpenseRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListRequest {
    /// Only return expenses with exactly this category
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    /// Most recent first
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBudgetRequest {
    pub category: String,
    pub amount: f64,
}

/// Full replacement of an existing budget
pub type UpdateBudgetRequest = CreateBudgetRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetListResponse {
    /// Sorted by category name
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
    /// False when the record was not held in the current session
    pub removed: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingByCategoryResponse {
    /// Highest total first
    pub categories: Vec<CategorySpending>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpending {
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingOverTimeResponse {
    /// Oldest day first
    pub points: Vec<DailySpending>,
}

/// Values shown on the dashboard overview cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_spending: f64,
    /// Category with the highest spending, if any expenses exist
    pub top_category: Option<String>,
    pub total_budgeted: f64,
    pub total_spent_against_budgets: f64,
    pub expense_count: usize,
    pub budget_count: usize,
}

/// Lifecycle of the data loaded for the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Stable user identifier issued by the identity provider
    pub uid: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub phase: SessionPhase,
    pub loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestCategoryRequest {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestCategoryResponse {
    pub category: String,
    /// Between 0 and 1
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTipsResponse {
    pub tips: Vec<String>,
}

/// Error body returned by every failing API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind, e.g. "duplicate_category"
    pub code: String,
    pub message: String,
}
