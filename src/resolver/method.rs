//! Method invocation: `[formattedAmount()]`, `[formatDate('Y-m-d')]`

use super::arguments::parse_arguments;
use super::{unresolved, ResolveStrategy};
use crate::config::VariableConfig;
use crate::context::Context;
use crate::error::ResolveError;
use crate::value::Value;

/// Whether the placeholder has method-call shape: it ends with the method
/// symbol, or it is `name(args)` where the symbol's first and last characters
/// open and close the argument list.
pub(crate) fn is_method_call(placeholder: &str, symbol: &str) -> bool {
    if symbol.is_empty() {
        return false;
    }
    placeholder.ends_with(symbol) || split_call(placeholder, symbol).is_some()
}

/// Split `name(args)` into its name and raw argument text
fn split_call<'p>(placeholder: &'p str, symbol: &str) -> Option<(&'p str, &'p str)> {
    let open = symbol.chars().next()?;
    let close = symbol.chars().last()?;
    let body = placeholder.strip_suffix(close)?;
    let at = body.find(open)?;
    if at == 0 {
        return None;
    }
    Some((&body[..at], &body[at + open.len_utf8()..]))
}

/// Invokes a whitelisted callable on the context
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodStrategy;

impl ResolveStrategy for MethodStrategy {
    fn name(&self) -> &'static str {
        "method"
    }

    fn can_resolve(&self, placeholder: &str, config: &VariableConfig) -> bool {
        is_method_call(placeholder, &config.method_symbol)
    }

    fn resolve(
        &self,
        placeholder: &str,
        context: &dyn Context,
        config: &VariableConfig,
    ) -> Result<Value, ResolveError> {
        if !config.allow_method_calls {
            return unresolved(config, placeholder, "Method calls are disabled");
        }

        let (name, arguments) = match split_call(placeholder, &config.method_symbol) {
            Some((name, raw)) => (name.trim().to_string(), parse_arguments(raw)),
            None => (placeholder.replace(config.method_symbol.as_str(), ""), Vec::new()),
        };

        if !config.is_whitelisted(&name) {
            return unresolved(
                config,
                placeholder,
                format!("Method '{}' is not whitelisted", name),
            );
        }

        if !context.has_method(&name) {
            return unresolved(
                config,
                placeholder,
                format!("Method '{}' does not exist", name),
            );
        }

        match context.invoke(&name, &arguments) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::error!(
                    variable = placeholder,
                    method = %name,
                    error = %err,
                    "failed to call method"
                );
                unresolved(config, placeholder, format!("Method call failed: {}", err))
            }
        }
    }
}
