//! Static template validation
//!
//! Checks template text without any data context: overall length, delimiter
//! balance, placeholder-name legality and, optionally, names missing from a
//! known-variable set. Every check runs; findings accumulate into a
//! [`ValidationResult`] instead of failing fast.

mod result;

pub use result::{Diagnostic, DiagnosticKind, ValidationResult};

use crate::config::{Config, ValidationConfig, VariableConfig};
use crate::resolver::scanner::{self, Located};

/// Validates template text against the configured syntax
#[derive(Debug, Clone, Default)]
pub struct TemplateValidator {
    variables: VariableConfig,
    validation: ValidationConfig,
}

impl TemplateValidator {
    pub fn new(config: &Config) -> Self {
        Self {
            variables: config.variables.clone(),
            validation: config.validation.clone(),
        }
    }

    /// Same validator under a different configuration
    pub fn with_config(&self, config: &Config) -> Self {
        Self::new(config)
    }

    /// Validate without a known-variable set
    pub fn validate(&self, text: &str) -> ValidationResult {
        self.validate_with_known(text, &[] as &[&str])
    }

    /// Validate, warning about placeholders whose base name is not in
    /// `known_variables` when undefined-variable checks are enabled
    pub fn validate_with_known<S: AsRef<str>>(
        &self,
        text: &str,
        known_variables: &[S],
    ) -> ValidationResult {
        let mut result = ValidationResult::success();

        if !self.validation.enabled || !self.variables.delimiters_enabled() {
            return result;
        }

        let max = self.validation.max_template_length;
        if text.chars().count() > max {
            result.add_error(Diagnostic::new(
                DiagnosticKind::Length,
                format!("Template exceeds maximum length of {} characters", max),
            ));
        }

        self.check_brackets(text, &mut result);

        let placeholders =
            scanner::placeholders(text, &self.variables.starter, &self.variables.ender);
        self.check_names(&placeholders, &mut result);

        if self.validation.check_undefined_variables && !known_variables.is_empty() {
            self.check_undefined(&placeholders, known_variables, &mut result);
        }

        result
    }

    fn check_brackets(&self, text: &str, result: &mut ValidationResult) {
        let starter = self.variables.starter.as_str();
        let ender = self.variables.ender.as_str();

        let opening = text.matches(starter).count();
        let closing = text.matches(ender).count();
        if opening != closing {
            result.add_error(Diagnostic::new(
                DiagnosticKind::Brackets,
                format!(
                    "Mismatched brackets: found {} opening and {} closing brackets",
                    opening, closing
                ),
            ));
        }

        let mut depth = 0usize;
        let mut pos = 0;
        while let Some(offset) = text[pos..].find(starter) {
            let at = pos + offset;
            depth += 1;

            let after = at + starter.len();
            let Some(close) = text[after..].find(ender) else {
                result.add_error(
                    Diagnostic::new(
                        DiagnosticKind::Brackets,
                        format!("Unclosed bracket at position {}", at),
                    )
                    .at(at..after),
                );
                return;
            };

            depth -= 1;
            pos = after + close + ender.len();
        }

        if depth != 0 {
            result.add_error(Diagnostic::new(
                DiagnosticKind::Brackets,
                format!("Unclosed brackets found (depth: {})", depth),
            ));
        }
    }

    fn check_names(&self, placeholders: &[Located<'_>], result: &mut ValidationResult) {
        let relation = self.variables.relationship_symbol.as_str();
        let method = self.variables.method_symbol.as_str();

        for placeholder in placeholders {
            let name = placeholder.name;
            let span = placeholder.span.clone();

            if name.is_empty() {
                result.add_error(
                    Diagnostic::new(DiagnosticKind::Name, "Empty variable found").at(span),
                );
                continue;
            }

            let without_relation = if relation.is_empty() {
                name.to_string()
            } else {
                name.replace(relation, "")
            };
            if !without_relation.chars().all(is_name_char) {
                result.add_error(
                    Diagnostic::new(
                        DiagnosticKind::Name,
                        format!("Variable '{}' contains invalid characters", name),
                    )
                    .at(span.clone()),
                );
            }

            if !relation.is_empty() && name.contains(&relation.repeat(2)) {
                result.add_error(
                    Diagnostic::new(
                        DiagnosticKind::Name,
                        format!("Variable '{}' has consecutive relationship symbols", name),
                    )
                    .at(span.clone()),
                );
            }

            if !method.is_empty() && name.ends_with(method) && name.len() <= method.len() {
                result.add_error(
                    Diagnostic::new(
                        DiagnosticKind::Name,
                        format!("Variable '{}' has empty method name", name),
                    )
                    .at(span),
                );
            }
        }
    }

    fn check_undefined<S: AsRef<str>>(
        &self,
        placeholders: &[Located<'_>],
        known_variables: &[S],
        result: &mut ValidationResult,
    ) {
        for placeholder in placeholders {
            let base = base_name(placeholder.name, &self.variables);
            if !known_variables.iter().any(|k| k.as_ref() == base) {
                result.add_warning(
                    Diagnostic::new(
                        DiagnosticKind::Undefined,
                        format!("Variable '{}' may be undefined", placeholder.name),
                    )
                    .at(placeholder.span.clone()),
                );
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '_' | '-' | '(' | ')' | '\'' | '"' | ',')
}

/// Strip a trailing call suffix and any relation path, leaving the name
/// that must exist on the root context
fn base_name<'p>(placeholder: &'p str, config: &VariableConfig) -> &'p str {
    let mut base = placeholder;

    if let Some(open) = config.method_symbol.chars().next() {
        let close = config.method_symbol.chars().last().unwrap_or(open);
        if base.ends_with(close) {
            if let Some(at) = base.find(open) {
                base = &base[..at];
            }
        }
    }

    let relation = config.relationship_symbol.as_str();
    if !relation.is_empty() {
        if let Some(at) = base.find(relation) {
            base = &base[..at];
        }
    }

    base
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn validator() -> TemplateValidator {
        TemplateValidator::default()
    }

    #[test]
    fn test_valid_template() {
        let result =
            validator().validate("Dear [client->name], invoice #[id] for [formattedAmount()]");
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_plain_text_is_valid() {
        assert!(validator().validate("No placeholders here.").is_valid());
    }

    #[test]
    fn test_unclosed_bracket() {
        let result = validator().validate("Hello [name");
        assert_eq!(
            result.error_messages(),
            vec![
                "Mismatched brackets: found 1 opening and 0 closing brackets",
                "Unclosed bracket at position 6",
            ]
        );
        assert_eq!(result.errors[1].span, Some(6..7));
    }

    #[test]
    fn test_stray_ender_is_count_mismatch() {
        let result = validator().validate("Hello name]");
        assert_eq!(
            result.error_messages(),
            vec!["Mismatched brackets: found 0 opening and 1 closing brackets"]
        );
    }

    #[test]
    fn test_empty_placeholder() {
        let result = validator().validate("Hello []");
        assert_eq!(result.error_messages(), vec!["Empty variable found"]);
    }

    #[test]
    fn test_consecutive_relationship_symbols() {
        let result = validator().validate("Hello [client->->name]");
        assert_eq!(
            result.error_messages(),
            vec!["Variable 'client->->name' has consecutive relationship symbols"]
        );
    }

    #[test]
    fn test_invalid_characters() {
        let result = validator().validate("Pay [amount$] now");
        assert_eq!(
            result.error_messages(),
            vec!["Variable 'amount$' contains invalid characters"]
        );
    }

    #[test]
    fn test_method_arguments_are_legal() {
        let result = validator().validate(r#"[formatDate('Y-m-d', "x y")]"#);
        assert!(result.is_valid(), "{:?}", result.errors);
    }

    #[test]
    fn test_empty_method_name() {
        let result = validator().validate("Call [()]");
        assert_eq!(result.error_messages(), vec!["Variable '()' has empty method name"]);
    }

    #[test]
    fn test_length_limit() {
        let config = Config::new().with_max_template_length(5);
        let result = TemplateValidator::new(&config).validate("123456");
        assert_eq!(
            result.error_messages(),
            vec!["Template exceeds maximum length of 5 characters"]
        );
    }

    #[test]
    fn test_all_checks_run() {
        let config = Config::new().with_max_template_length(10);
        let result = TemplateValidator::new(&config).validate("A long one with [] and [bad$]");
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_disabled_validation() {
        let config = Config::new().with_validation(false);
        assert!(TemplateValidator::new(&config).validate("[").is_valid());
    }

    #[test]
    fn test_empty_delimiters_trivially_valid() {
        let config = Config::new().with_delimiters("[", "");
        assert!(TemplateValidator::new(&config).validate("[[[ ] []").is_valid());
    }

    #[test]
    fn test_undefined_variables_warn() {
        let config = Config::new().with_undefined_check(true);
        let result = TemplateValidator::new(&config).validate_with_known(
            "[id] [client->name] [formattedAmount()] [formatDate('Y')] [ghost]",
            &["id", "client", "formattedAmount", "formatDate"],
        );
        assert!(result.is_valid());
        assert_eq!(
            result.warning_messages(),
            vec!["Variable 'ghost' may be undefined"]
        );
    }

    #[test]
    fn test_undefined_check_needs_known_set() {
        let config = Config::new().with_undefined_check(true);
        let result = TemplateValidator::new(&config).validate("[ghost]");
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_undefined_check_disabled_by_default() {
        let result = validator().validate_with_known("[ghost]", &["id"]);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_custom_delimiters() {
        let config = Config::new().with_delimiters("{{", "}}");
        let validator = TemplateValidator::new(&config);
        assert!(validator.validate("Hi {{name}}, [not a placeholder").is_valid());
        let result = validator.validate("Hi {{name");
        assert!(!result.is_valid());
    }

    #[test]
    fn test_base_name() {
        let config = VariableConfig::default();
        assert_eq!(base_name("id", &config), "id");
        assert_eq!(base_name("client->name", &config), "client");
        assert_eq!(base_name("fullName()", &config), "fullName");
        assert_eq!(base_name("fmt('a->b')", &config), "fmt");
    }
}
