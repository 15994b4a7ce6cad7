//! # Domain Module
//!
//! Business logic for SpendWise, independent of the REST layer and of the
//! storage backend.
//!
//! ## Module Organization
//!
//! - **models**: Expense and budget entities plus input validation
//! - **commands**: Inputs handed to the record store and session events
//! - **record_store**: The signed-in user's records in memory, mirrored to storage
//! - **derived_data**: Totals, per-category spending, budget progress and
//!   spending over time, computed from a snapshot on every read
//! - **session_manager**: Maps sign-in / sign-out events onto store loads
//! - **advisory**: Contract for the external AI advisory service
//!
//! ## Business Rules
//!
//! - Amounts are positive; descriptions are 1 to 100 characters
//! - At most one budget per category (exact, case-sensitive match)
//! - Budget `spent` and `remaining` are derived, never stored
//! - Expenses are kept most recent first

pub mod advisory;
pub mod commands;
pub mod derived_data;
pub mod errors;
pub mod models;
pub mod record_store;
pub mod session_manager;

pub use advisory::{AdvisoryError, AdvisoryService, CategorySuggestion, FinancialTips};
pub use derived_data::{DaySpending, DerivedData, SpendingSummary};
pub use errors::StoreError;
pub use record_store::{RecordSnapshot, RecordStore, SessionStatus};
pub use session_manager::SessionManager;
