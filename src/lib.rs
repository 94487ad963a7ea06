//! Placeholder Engine - resolves delimited placeholders in text templates
//!
//! Templates contain placeholders such as `[id]`, `[client->name]` or
//! `[formattedAmount()]`. Each one is resolved against a data [`Context`]
//! by the first matching strategy (plain attribute, relation path, method
//! call), and templates can be statically validated without any data.
//!
//! # Example
//!
//! ```rust
//! use placeholder_engine::{render, MapContext};
//!
//! let invoice = MapContext::new().attr("id", 123).attr("amount", 500);
//! let text = render("Invoice #[id] for [amount]", &invoice).unwrap();
//! assert_eq!(text, "Invoice #123 for 500");
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod resolver;
pub mod service;
pub mod validator;
pub mod value;

pub use config::{Config, ConfigError, ValidationConfig, VariableConfig};
pub use context::{Context, MapContext, Relation, TomlContext};
pub use error::{ContextError, ResolveError};
pub use resolver::{
    MethodStrategy, RelationshipStrategy, ResolveStrategy, Resolver, SimpleStrategy,
};
pub use service::{
    MemoryStore, RenderedMessage, ServiceError, Template, TemplateService, TemplateStore,
    TemplateUpdate,
};
pub use validator::{Diagnostic, DiagnosticKind, TemplateValidator, ValidationResult};
pub use value::Value;

/// Resolve a template with the default configuration
///
/// # Example
///
/// ```rust
/// use placeholder_engine::{render, MapContext, Value};
///
/// let invoice = MapContext::new()
///     .relation("client", MapContext::new().attr("name", "John Doe"))
///     .method("formattedAmount", |_| Ok(Value::from("$500.00")));
///
/// let text = render("Dear [client->name], total: [formattedAmount()]", &invoice).unwrap();
/// assert_eq!(text, "Dear John Doe, total: $500.00");
/// ```
pub fn render(text: &str, context: &dyn Context) -> Result<String, ResolveError> {
    render_with_config(text, context, &Config::default())
}

/// Resolve a template with a custom configuration
///
/// # Example
///
/// ```rust
/// use placeholder_engine::{render_with_config, Config, MapContext};
///
/// let config = Config::new()
///     .with_delimiters("{{", "}}")
///     .with_fallback_value("n/a");
///
/// let ctx = MapContext::new().attr("name", "Ann");
/// let text = render_with_config("{{name}} / {{missing}}", &ctx, &config).unwrap();
/// assert_eq!(text, "Ann / n/a");
/// ```
pub fn render_with_config(
    text: &str,
    context: &dyn Context,
    config: &Config,
) -> Result<String, ResolveError> {
    Resolver::new(config).resolve(text, context, "", "", "")
}

/// Validate a template with the default configuration
///
/// ```rust
/// use placeholder_engine::validate;
///
/// assert!(validate("Hello [name]").is_valid());
/// assert!(!validate("Hello [name").is_valid());
/// ```
pub fn validate(text: &str) -> ValidationResult {
    TemplateValidator::default().validate(text)
}
