use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::budget_repository::BudgetRepository;
use super::expense_repository::ExpenseRepository;
use crate::storage::traits::Connection;

pub const EXPENSES_FILE: &str = "expenses.csv";
pub const BUDGETS_FILE: &str = "budgets.csv";

/// CsvConnection maps each user to a directory of CSV collections:
///
/// ```text
/// {base}/users/{encoded uid}/expenses.csv
/// {base}/users/{encoded uid}/budgets.csv
/// ```
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Directory holding one user's collections
    pub fn user_directory(&self, user_id: &str) -> PathBuf {
        self.base_directory
            .join("users")
            .join(Self::encode_user_id(user_id))
    }

    pub fn collection_path(&self, user_id: &str, file_name: &str) -> PathBuf {
        self.user_directory(user_id).join(file_name)
    }

    /// Create the user's directory and the collection file with its header row
    pub fn ensure_collection_exists(
        &self,
        user_id: &str,
        file_name: &str,
        header: &str,
    ) -> Result<PathBuf> {
        let user_dir = self.user_directory(user_id);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
            debug!("Created user directory {}", user_dir.display());
        }

        let file_path = user_dir.join(file_name);
        if !file_path.exists() {
            fs::write(&file_path, format!("{}\n", header))?;
        }

        Ok(file_path)
    }

    /// Turn a uid into a directory name. ASCII letters, digits and '-' pass
    /// through; every other byte becomes `_xx`, so distinct uids never collide.
    pub fn encode_user_id(user_id: &str) -> String {
        let mut encoded = String::with_capacity(user_id.len());
        for byte in user_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                encoded.push(byte as char);
            } else {
                encoded.push_str(&format!("_{:02x}", byte));
            }
        }
        encoded
    }
}

impl Connection for CsvConnection {
    type ExpenseRepository = ExpenseRepository;
    type BudgetRepository = BudgetRepository;

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        ExpenseRepository::new(self.clone())
    }

    fn create_budget_repository(&self) -> Self::BudgetRepository {
        BudgetRepository::new(self.clone())
    }
}
