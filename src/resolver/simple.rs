//! Plain attribute lookup: `[name]`

use super::method::is_method_call;
use super::{unresolved, ResolveStrategy};
use crate::config::VariableConfig;
use crate::context::Context;
use crate::error::ResolveError;
use crate::value::Value;

/// Resolves placeholders that are neither a relation path nor a method call
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleStrategy;

impl ResolveStrategy for SimpleStrategy {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn can_resolve(&self, placeholder: &str, config: &VariableConfig) -> bool {
        let relation = &config.relationship_symbol;
        (relation.is_empty() || !placeholder.contains(relation.as_str()))
            && !is_method_call(placeholder, &config.method_symbol)
    }

    fn resolve(
        &self,
        placeholder: &str,
        context: &dyn Context,
        config: &VariableConfig,
    ) -> Result<Value, ResolveError> {
        match context.attribute(placeholder) {
            Some(value) if !value.is_null() => Ok(value),
            _ => unresolved(
                config,
                placeholder,
                format!("Attribute '{}' does not exist", placeholder),
            ),
        }
    }
}
