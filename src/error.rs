use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::parse::ParseError;
use crate::ConfigError;

/// Unified error type covering parsing, configuration, JSON and I/O.
///
/// Returned by loaders like [`RuleStore::from_json()`](crate::RuleStore::from_json)
/// and [`RuleStore::from_file()`](crate::RuleStore::from_file).
#[derive(Debug, Error)]
pub enum FormgateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure reported by the transaction collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transaction '{txcode}' failed: {message}")]
pub struct TransactionError {
    pub txcode: String,
    pub message: String,
}

impl TransactionError {
    pub fn new(txcode: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            txcode: txcode.into(),
            message: message.into(),
        }
    }
}

/// Per-field validation messages produced by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation{}", .fields.len(), field_list(.fields))]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &str, message: impl Into<String>) -> Self {
        self.fields.insert(name.to_owned(), message.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn field_list(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(name, message)| format!("; {name}: {message}"))
        .collect()
}

/// Severity passed to [`ExceptionReporter`](crate::ExceptionReporter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can abort a button click.
#[derive(Debug, Error)]
pub enum ClickError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl ClickError {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            ClickError::Config(_) | ClickError::Transaction(_) => Severity::Error,
            ClickError::Validation(_) => Severity::Warning,
        }
    }
}
