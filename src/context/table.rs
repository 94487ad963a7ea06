//! Context backed by a TOML document
//!
//! Scalars are attributes, sub-tables are relations. Arrays become attributes
//! joined with `", "`. TOML has no callables, so method placeholders always
//! report a missing method.

use std::path::Path;

use super::{Context, Relation};
use crate::config::ConfigError;
use crate::error::ContextError;
use crate::value::Value;

/// Read-only context over a parsed TOML table
#[derive(Debug, Clone, Default)]
pub struct TomlContext {
    table: toml::Table,
}

impl TomlContext {
    pub fn new(table: toml::Table) -> Self {
        Self { table }
    }

    /// Load a context from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a context from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(content.parse::<toml::Table>()?))
    }

    /// Top-level keys, usable as a known-variable set for validation
    pub fn keys(&self) -> Vec<String> {
        self.table.keys().cloned().collect()
    }
}

fn scalar(value: &toml::Value) -> Option<Value> {
    match value {
        toml::Value::String(s) => Some(Value::Str(s.clone())),
        toml::Value::Integer(n) => Some(Value::Int(*n)),
        toml::Value::Float(x) => Some(Value::Float(*x)),
        toml::Value::Boolean(b) => Some(Value::Bool(*b)),
        toml::Value::Datetime(d) => Some(Value::Str(d.to_string())),
        toml::Value::Array(items) => Some(Value::Str(
            items
                .iter()
                .filter_map(scalar)
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )),
        toml::Value::Table(_) => None,
    }
}

impl Context for TomlContext {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.table.get(name).and_then(scalar)
    }

    fn relation(&self, name: &str) -> Result<Relation<'_>, ContextError> {
        Ok(match self.table.get(name) {
            Some(toml::Value::Table(related)) if related.is_empty() => Relation::Null,
            Some(toml::Value::Table(related)) => {
                Relation::Loaded(Box::new(TomlContext::new(related.clone())))
            }
            _ => Relation::Missing,
        })
    }

    fn has_method(&self, _name: &str) -> bool {
        false
    }

    fn invoke(&self, name: &str, _args: &[Value]) -> Result<Value, ContextError> {
        Err(ContextError::new(format!(
            "TOML data has no callable '{}'",
            name
        )))
    }
}
