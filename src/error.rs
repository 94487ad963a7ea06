//! Error types for placeholder resolution

use thiserror::Error;

/// Errors raised while resolving placeholders against a context
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The placeholder could not be resolved (missing attribute, relation or
    /// method, disallowed call, failed call, no resolver, depth exceeded)
    #[error("Variable \"{variable}\" cannot be resolved: {reason}.")]
    VariableResolution { variable: String, reason: String },

    /// The placeholder is already being resolved further up the chain
    #[error(
        "Circular dependency detected for variable \"{variable}\". Chain: {}",
        format_chain(chain, variable)
    )]
    CircularDependency { variable: String, chain: Vec<String> },
}

impl ResolveError {
    /// Create a resolution error for a placeholder
    pub fn resolution(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::VariableResolution {
            variable: variable.into(),
            reason: reason.into(),
        }
    }

    /// Create a circular dependency error
    pub fn circular(variable: impl Into<String>, chain: Vec<String>) -> Self {
        Self::CircularDependency {
            variable: variable.into(),
            chain,
        }
    }

    /// The placeholder this error refers to
    pub fn variable(&self) -> &str {
        match self {
            Self::VariableResolution { variable, .. } => variable,
            Self::CircularDependency { variable, .. } => variable,
        }
    }
}

fn format_chain(chain: &[String], variable: &str) -> String {
    chain
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(variable))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Failure reported by a context adapter: a relation loader or a method call
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ContextError {
    pub message: String,
}

impl ContextError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
