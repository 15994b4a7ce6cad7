//! Domain-level command and result types.
//! The REST layer maps the public DTOs from the `shared` crate onto these;
//! they are validated here before anything reaches storage.

pub mod expenses {
    use crate::domain::models::{ExpenseDraft, ValidationError};

    /// Input for creating an expense or fully replacing an existing one.
    #[derive(Debug, Clone)]
    pub struct ExpenseInput {
        pub description: String,
        pub amount: f64,
        pub category: String,
        pub date: String,
    }

    impl ExpenseInput {
        pub fn validate(&self) -> Result<ExpenseDraft, ValidationError> {
            ExpenseDraft::new(&self.description, self.amount, &self.category, &self.date)
        }
    }
}

pub mod budgets {
    use crate::domain::models::{BudgetDraft, ValidationError};

    /// Input for creating a budget or fully replacing an existing one.
    #[derive(Debug, Clone)]
    pub struct BudgetInput {
        pub category: String,
        pub amount: f64,
    }

    impl BudgetInput {
        pub fn validate(&self) -> Result<BudgetDraft, ValidationError> {
            BudgetDraft::new(&self.category, self.amount)
        }
    }
}

pub mod session {
    /// How a `load_session` call ended when it did not fail.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LoadOutcome {
        /// Collections replaced with freshly fetched data
        Loaded { expenses: usize, budgets: usize },
        /// The same user was already loaded; nothing fetched
        AlreadyLoaded,
        /// The session moved on (sign-out or another load) while fetching; result dropped
        Superseded,
    }

    /// Identity reported by the identity provider
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Identity {
        pub uid: String,
        pub email: Option<String>,
    }

    /// Events emitted by the identity provider
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AuthEvent {
        SignedIn(Identity),
        SignedOut,
    }
}
