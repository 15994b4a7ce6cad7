//! # CSV Document Store
//!
//! File-based storage laid out like per-user document collections.
//! Every mutation rewrites the whole collection file through a temp file
//! and an atomic rename.

pub mod budget_repository;
pub mod connection;
pub mod expense_repository;
#[cfg(test)]
pub mod test_utils;

pub use budget_repository::BudgetRepository;
pub use connection::CsvConnection;
pub use expense_repository::ExpenseRepository;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;
use tracing::error;

/// Read every row of a collection file. Fails on the first row that does not
/// decode, so a later rewrite can never drop it.
pub(crate) fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => {
                error!("Unreadable row {} in {}: {}", index + 1, path.display(), e);
                return Err(e)
                    .with_context(|| format!("Unreadable row {} in {}", index + 1, path.display()));
            }
        }
    }
    Ok(records)
}

/// Replace a collection file with the given rows
pub(crate) fn write_records<T: Serialize>(path: &Path, header: &[&str], records: &[T]) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to open {}", temp_path.display()))?;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        writer.write_record(header)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
