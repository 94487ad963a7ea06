//! Configuration for resolution and validation
//!
//! A single immutable [`Config`] value is handed to the resolver and the
//! validator when they are built. It can be loaded from TOML; every key is
//! optional and falls back to the defaults below.
//!
//! ```toml
//! fallback_lang = "en"
//!
//! [variables]
//! starter = "{{"
//! ender = "}}"
//! strict_mode = true
//! whitelisted_methods = ["formattedAmount"]
//!
//! [validation]
//! check_undefined_variables = true
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language used when a template is missing in the requested language
    pub fallback_lang: String,
    pub variables: VariableConfig,
    pub validation: ValidationConfig,
}

/// Placeholder syntax and resolution policy
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VariableConfig {
    pub starter: String,
    pub ender: String,
    /// Separates relation hops, e.g. `client->name`
    pub relationship_symbol: String,
    /// Marks a method call, e.g. `formattedAmount()`
    pub method_symbol: String,
    /// Turn missing/disallowed placeholders into errors instead of fallbacks
    pub strict_mode: bool,
    pub allow_method_calls: bool,
    /// Callable names that may be invoked; `"*"` allows all
    pub whitelisted_methods: Vec<String>,
    /// Substituted for placeholders that cannot be resolved
    pub fallback_value: String,
    pub max_depth: usize,
    /// Upper bound on scan/substitute rounds per template
    pub max_iterations: usize,
    /// Upper bound, in bytes, on the text produced while resolving
    pub max_output_length: usize,
}

/// Static template validation settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub check_undefined_variables: bool,
    pub max_template_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_lang: "ar".to_string(),
            variables: VariableConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl Default for VariableConfig {
    fn default() -> Self {
        Self {
            starter: "[".to_string(),
            ender: "]".to_string(),
            relationship_symbol: "->".to_string(),
            method_symbol: "()".to_string(),
            strict_mode: false,
            allow_method_calls: true,
            whitelisted_methods: vec!["*".to_string()],
            fallback_value: String::new(),
            max_depth: 10,
            max_iterations: 100,
            max_output_length: 1_000_000,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_undefined_variables: false,
            max_template_length: 10_000,
        }
    }
}

impl Config {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the placeholder delimiters
    pub fn with_delimiters(mut self, starter: impl Into<String>, ender: impl Into<String>) -> Self {
        self.variables.starter = starter.into();
        self.variables.ender = ender.into();
        self
    }

    /// Set the relationship path symbol
    pub fn with_relationship_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.variables.relationship_symbol = symbol.into();
        self
    }

    /// Set the method call symbol
    pub fn with_method_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.variables.method_symbol = symbol.into();
        self
    }

    /// Enable or disable strict mode
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.variables.strict_mode = strict;
        self
    }

    /// Enable or disable method calls
    pub fn with_method_calls(mut self, allow: bool) -> Self {
        self.variables.allow_method_calls = allow;
        self
    }

    /// Replace the method whitelist
    pub fn with_whitelist<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables.whitelisted_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fallback value for unresolved placeholders
    pub fn with_fallback_value(mut self, value: impl Into<String>) -> Self {
        self.variables.fallback_value = value.into();
        self
    }

    /// Set the maximum resolution depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.variables.max_depth = depth;
        self
    }

    /// Set the iteration ceiling
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.variables.max_iterations = iterations;
        self
    }

    /// Set the bound on resolved text size
    pub fn with_max_output_length(mut self, length: usize) -> Self {
        self.variables.max_output_length = length;
        self
    }

    /// Enable or disable validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validation.enabled = enabled;
        self
    }

    /// Enable or disable undefined-variable warnings
    pub fn with_undefined_check(mut self, check: bool) -> Self {
        self.validation.check_undefined_variables = check;
        self
    }

    /// Set the maximum template length
    pub fn with_max_template_length(mut self, length: usize) -> Self {
        self.validation.max_template_length = length;
        self
    }

    /// Set the fallback language
    pub fn with_fallback_lang(mut self, lang: impl Into<String>) -> Self {
        self.fallback_lang = lang.into();
        self
    }
}

impl VariableConfig {
    /// Empty delimiters disable resolution and validation entirely
    pub fn delimiters_enabled(&self) -> bool {
        !self.starter.is_empty() && !self.ender.is_empty()
    }

    /// Whether `name` may be invoked as a method
    pub fn is_whitelisted(&self, name: &str) -> bool {
        self.whitelisted_methods
            .iter()
            .any(|m| m == "*" || m == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fallback_lang, "ar");
        assert_eq!(config.variables.starter, "[");
        assert_eq!(config.variables.ender, "]");
        assert_eq!(config.variables.relationship_symbol, "->");
        assert_eq!(config.variables.method_symbol, "()");
        assert!(!config.variables.strict_mode);
        assert!(config.variables.allow_method_calls);
        assert_eq!(config.variables.whitelisted_methods, vec!["*"]);
        assert_eq!(config.variables.fallback_value, "");
        assert_eq!(config.variables.max_depth, 10);
        assert_eq!(config.variables.max_iterations, 100);
        assert_eq!(config.variables.max_output_length, 1_000_000);
        assert!(config.validation.enabled);
        assert!(!config.validation.check_undefined_variables);
        assert_eq!(config.validation.max_template_length, 10_000);
    }

    #[test]
    fn test_builder_pattern() {
        let config = Config::new()
            .with_delimiters("{{", "}}")
            .with_strict_mode(true)
            .with_whitelist(["fullName"]);

        assert_eq!(config.variables.starter, "{{");
        assert_eq!(config.variables.ender, "}}");
        assert!(config.variables.strict_mode);
        assert!(config.variables.is_whitelisted("fullName"));
        assert!(!config.variables.is_whitelisted("delete"));
    }

    #[test]
    fn test_wildcard_whitelist() {
        let config = VariableConfig::default();
        assert!(config.is_whitelisted("anything"));
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
fallback_lang = "en"

[variables]
strict_mode = true
fallback_value = "N/A"

[validation]
max_template_length = 50
"#;
        let config = Config::from_str(toml_str).expect("Should parse");
        assert_eq!(config.fallback_lang, "en");
        assert!(config.variables.strict_mode);
        assert_eq!(config.variables.fallback_value, "N/A");
        // untouched keys keep their defaults
        assert_eq!(config.variables.starter, "[");
        assert_eq!(config.validation.max_template_length, 50);
        assert!(config.validation.enabled);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = Config::from_str("").expect("Should parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = Config::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_delimiters_enabled() {
        assert!(VariableConfig::default().delimiters_enabled());
        let config = Config::new().with_delimiters("", "]");
        assert!(!config.variables.delimiters_enabled());
    }
}
