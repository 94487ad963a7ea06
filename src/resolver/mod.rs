//! Placeholder resolution
//!
//! The [`Resolver`] repeatedly scans a template for the first placeholder,
//! hands it to the first strategy that claims it, and replaces every literal
//! occurrence of that placeholder token with the resolved value. Scanning
//! restarts from the top after each substitution, bounded by an iteration
//! ceiling.

mod arguments;
mod method;
mod relationship;
pub mod scanner;
mod simple;

pub use method::MethodStrategy;
pub use relationship::RelationshipStrategy;
pub use simple::SimpleStrategy;

use std::sync::Arc;

use crate::config::{Config, VariableConfig};
use crate::context::Context;
use crate::error::ResolveError;
use crate::value::Value;

/// A way of resolving one shape of placeholder
pub trait ResolveStrategy: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Whether this strategy handles the placeholder
    fn can_resolve(&self, placeholder: &str, config: &VariableConfig) -> bool;

    /// Resolve the placeholder against the context
    fn resolve(
        &self,
        placeholder: &str,
        context: &dyn Context,
        config: &VariableConfig,
    ) -> Result<Value, ResolveError>;
}

/// Apply the strict/fallback policy to a placeholder that cannot be resolved
pub(crate) fn unresolved(
    config: &VariableConfig,
    variable: &str,
    reason: impl Into<String>,
) -> Result<Value, ResolveError> {
    let reason = reason.into();
    if config.strict_mode {
        return Err(ResolveError::resolution(variable, reason));
    }
    tracing::debug!(
        variable,
        reason = %reason,
        fallback = %config.fallback_value,
        "placeholder unresolved, using fallback"
    );
    Ok(Value::Str(config.fallback_value.clone()))
}

/// Placeholders currently being resolved within one `resolve` call
#[derive(Debug, Default)]
struct ResolutionStack {
    names: Vec<String>,
}

impl ResolutionStack {
    fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn depth(&self) -> usize {
        self.names.len()
    }

    /// Push `name`; it is popped when the returned frame drops
    fn enter(&mut self, name: &str) -> Frame<'_> {
        self.names.push(name.to_string());
        Frame { stack: self }
    }
}

struct Frame<'s> {
    stack: &'s mut ResolutionStack,
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.stack.names.pop();
    }
}

/// Resolves all placeholders in a template against a context
///
/// Holds only configuration and the strategy chain; every call gets its own
/// resolution stack, so one instance can be shared across threads.
#[derive(Clone)]
pub struct Resolver {
    config: VariableConfig,
    strategies: Vec<Arc<dyn ResolveStrategy>>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Resolver {
    /// Create a resolver with the default chain: simple, relationship, method
    pub fn new(config: &Config) -> Self {
        Self::empty(config)
            .with_strategy(SimpleStrategy)
            .with_strategy(RelationshipStrategy)
            .with_strategy(MethodStrategy)
    }

    /// Create a resolver with no strategies
    pub fn empty(config: &Config) -> Self {
        Self {
            config: config.variables.clone(),
            strategies: Vec::new(),
        }
    }

    /// Append a strategy to the chain
    pub fn with_strategy(mut self, strategy: impl ResolveStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Same strategy chain under a different configuration
    pub fn with_config(&self, config: &Config) -> Self {
        Self {
            config: config.variables.clone(),
            strategies: self.strategies.clone(),
        }
    }

    pub fn config(&self) -> &VariableConfig {
        &self.config
    }

    /// Strategy names in registration order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve every placeholder in `text`.
    ///
    /// `key`, `lang` and `channel` identify the template for diagnostics. In
    /// non-strict mode this only fails on a circular dependency. Hitting the
    /// iteration ceiling or the output length bound is not an error: the
    /// partially resolved text is returned and a warning is logged.
    pub fn resolve(
        &self,
        text: &str,
        context: &dyn Context,
        key: &str,
        lang: &str,
        channel: &str,
    ) -> Result<String, ResolveError> {
        let config = &self.config;
        if !config.delimiters_enabled() {
            return Ok(text.to_string());
        }

        let mut stack = ResolutionStack::default();
        let mut text = text.to_string();
        let mut iterations = 0;

        while let Some(placeholder) =
            scanner::next_placeholder(&text, &config.starter, &config.ender)
        {
            if iterations >= config.max_iterations {
                tracing::warn!(
                    key,
                    lang,
                    channel,
                    max_iterations = config.max_iterations,
                    "maximum placeholder resolution iterations exceeded"
                );
                break;
            }
            let placeholder = placeholder.to_string();
            let value = self.resolve_placeholder(&placeholder, context, &mut stack)?;
            let token = format!("{}{}{}", config.starter, placeholder, config.ender);

            let occurrences = text.matches(token.as_str()).count();
            let projected = text.len() - occurrences * token.len() + occurrences * value.len();
            if projected > config.max_output_length {
                tracing::warn!(
                    key,
                    lang,
                    channel,
                    variable = %placeholder,
                    max_output_length = config.max_output_length,
                    "resolved text would exceed maximum output length"
                );
                break;
            }

            text = text.replace(&token, &value);
            iterations += 1;
        }

        Ok(text)
    }

    fn resolve_placeholder(
        &self,
        placeholder: &str,
        context: &dyn Context,
        stack: &mut ResolutionStack,
    ) -> Result<String, ResolveError> {
        let config = &self.config;

        if stack.contains(placeholder) {
            return Err(ResolveError::circular(placeholder, stack.names.clone()));
        }

        if stack.depth() >= config.max_depth {
            return unresolved(
                config,
                placeholder,
                format!("Maximum resolution depth of {} exceeded", config.max_depth),
            )
            .map(|v| v.to_string());
        }

        let _frame = stack.enter(placeholder);

        match self
            .strategies
            .iter()
            .find(|s| s.can_resolve(placeholder, config))
        {
            Some(strategy) => strategy
                .resolve(placeholder, context, config)
                .map(|v| v.to_string()),
            None => unresolved(config, placeholder, "No resolver found for variable")
                .map(|v| v.to_string()),
        }
    }
}
