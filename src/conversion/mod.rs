use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

pub mod columns;
pub mod entities;
pub mod mapping;
pub mod normalizer;
pub mod options;
pub mod pipeline;
pub mod reconciler;
pub mod summary;
pub mod table;
pub mod transformer;

use table::TableError;

#[derive(Debug, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("column `{column}` not found in the {table} table")]
    MissingColumn { table: &'static str, column: String },
    #[error("no category column could be located in the {0} table")]
    CategoryColumnNotFound(&'static str),
}

#[derive(Debug, PartialEq, Error)]
#[error("category mapping is incomplete, unmapped labels: {}", join_labels(.missing))]
pub struct IncompleteMappingError {
    pub missing: BTreeSet<String>,
}

#[derive(Debug, PartialEq, Error)]
pub enum MappingError {
    #[error("`{0}` is not an inconsistent category")]
    UnknownLabel(String),
}

#[derive(Debug, PartialEq, Error)]
pub enum ConversionError {
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
    #[error("{0}")]
    IncompleteMapping(#[from] IncompleteMappingError),
    #[error("{0}")]
    Mapping(#[from] MappingError),
    #[error("{0}")]
    Table(#[from] TableError),
}

/// A cell that could not be parsed and was replaced by a blank or a default.
/// Never fatal; the run carries on.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionWarning {
    pub table: &'static str,
    pub column: &'static str,
    pub row: usize,
    pub value: String,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not coerce `{}` in {}.{} (row {})",
            self.value, self.table, self.column, self.row
        )
    }
}

fn join_labels(labels: &BTreeSet<String>) -> String {
    labels.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
