//! # Storage Module
//!
//! Persistence for expenses and budgets. The domain layer depends on the
//! traits in [`traits`]; [`csv`] is the backend the application runs with.
//!
//! Derived budget figures (spent, remaining) are never written here.

pub mod csv;
#[cfg(test)]
pub mod memory;
pub mod traits;

pub use self::csv::CsvConnection;
pub use traits::{BudgetStorage, Connection, ExpenseStorage};
