use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use super::{validate_amount, validate_category, ValidationError};

pub const MAX_DESCRIPTION_LENGTH: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    /// RFC 3339 for everything written through the store; older rows may hold anything
    pub date: String,
}

/// A validated expense that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

impl Expense {
    pub fn generate_id() -> String {
        format!("expense::{}", Uuid::new_v4())
    }

    pub fn from_draft(id: String, draft: ExpenseDraft) -> Self {
        Self {
            id,
            description: draft.description,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
        }
    }

    /// Parsed date in the offset it was recorded with
    pub fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        parse_expense_date(&self.date)
    }

    /// Calendar day of the expense in its own offset
    pub fn day(&self) -> Option<NaiveDate> {
        self.parsed_date().map(|date| date.date_naive())
    }
}

impl ExpenseDraft {
    pub fn new(
        description: &str,
        amount: f64,
        category: &str,
        date: &str,
    ) -> Result<Self, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::DescriptionTooLong {
                max: MAX_DESCRIPTION_LENGTH,
            });
        }

        let parsed = parse_expense_date(date)
            .ok_or_else(|| ValidationError::InvalidDate(date.to_string()))?;

        Ok(Self {
            description: description.to_string(),
            amount: validate_amount(amount)?,
            category: validate_category(category)?,
            date: parsed.to_rfc3339(),
        })
    }
}

/// Accepts RFC 3339 timestamps and plain dates (taken as midnight UTC).
pub fn parse_expense_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|day| Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)).fixed_offset())
}

/// Most recent first; expenses with unreadable dates go last in their original order.
pub fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
