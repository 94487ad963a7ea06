//! Relation traversal: `[client->company->name]`

use super::method::is_method_call;
use super::{unresolved, ResolveStrategy};
use crate::config::VariableConfig;
use crate::context::{Context, Relation};
use crate::error::ResolveError;
use crate::value::Value;

/// Walks relation hops and reads the trailing attribute on the last record
///
/// A relation that exists but holds no record yields the fallback value even
/// in strict mode; only unknown relation or attribute names are errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipStrategy;

impl ResolveStrategy for RelationshipStrategy {
    fn name(&self) -> &'static str {
        "relationship"
    }

    fn can_resolve(&self, placeholder: &str, config: &VariableConfig) -> bool {
        let symbol = config.relationship_symbol.as_str();
        !symbol.is_empty()
            && placeholder.contains(symbol)
            && !placeholder.starts_with(symbol)
            && !placeholder.ends_with(symbol)
            && !is_method_call(placeholder, &config.method_symbol)
    }

    fn resolve(
        &self,
        placeholder: &str,
        context: &dyn Context,
        config: &VariableConfig,
    ) -> Result<Value, ResolveError> {
        let mut parts: Vec<&str> = placeholder
            .split(config.relationship_symbol.as_str())
            .collect();
        let attribute = parts.pop().unwrap_or_default();
        walk(placeholder, context, &parts, attribute, config)
    }
}

fn walk(
    variable: &str,
    context: &dyn Context,
    hops: &[&str],
    attribute: &str,
    config: &VariableConfig,
) -> Result<Value, ResolveError> {
    let Some((hop, rest)) = hops.split_first() else {
        return match context.attribute(attribute) {
            Some(value) if !value.is_null() => Ok(value),
            _ => unresolved(
                config,
                variable,
                format!("Attribute '{}' does not exist on related record", attribute),
            ),
        };
    };

    match context.relation(hop) {
        Ok(Relation::Loaded(related)) => walk(variable, &*related, rest, attribute, config),
        Ok(Relation::Null) => {
            tracing::debug!(variable, relation = *hop, "related record is null, using fallback");
            Ok(Value::Str(config.fallback_value.clone()))
        }
        Ok(Relation::Missing) => unresolved(
            config,
            variable,
            format!("Relationship '{}' does not exist", hop),
        ),
        Err(err) => {
            tracing::warn!(variable, relation = *hop, error = %err, "failed to load relation");
            unresolved(
                config,
                variable,
                format!("Relationship '{}' failed to load: {}", hop, err),
            )
        }
    }
}
