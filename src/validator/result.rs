//! Validation outcome: blocking errors and advisory warnings

use std::fmt;

use ariadne::{Color, IndexType, Label, Report, ReportKind, Source};

use crate::resolver::scanner::Span;

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Length,
    Brackets,
    Name,
    Undefined,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Length => write!(f, "length"),
            DiagnosticKind::Brackets => write!(f, "brackets"),
            DiagnosticKind::Name => write!(f, "name"),
            DiagnosticKind::Undefined => write!(f, "undefined"),
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Location in the template, when the finding has one
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors block acceptance of a template; warnings never do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::default()
    }

    /// True iff there are no errors, regardless of warnings
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_error(&mut self, diagnostic: Diagnostic) -> &mut Self {
        self.errors.push(diagnostic);
        self
    }

    pub fn add_warning(&mut self, diagnostic: Diagnostic) -> &mut Self {
        self.warnings.push(diagnostic);
        self
    }

    /// Combine two results, keeping order
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|d| d.message.clone()).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|d| d.message.clone()).collect()
    }

    /// Render all findings with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let errors = self.errors.iter().map(|d| (d, ReportKind::Error, Color::Red));
        let warnings = self
            .warnings
            .iter()
            .map(|d| (d, ReportKind::Warning, Color::Yellow));

        for (diagnostic, kind, color) in errors.chain(warnings) {
            let span = diagnostic.span.clone().unwrap_or(0..0);
            // spans are byte offsets into the template
            let mut report = Report::build(kind, filename, span.start)
                .with_config(ariadne::Config::default().with_index_type(IndexType::Byte))
                .with_code(diagnostic.kind)
                .with_message(&diagnostic.message);
            if diagnostic.span.is_some() {
                report = report.with_label(
                    Label::new((filename, span))
                        .with_message(&diagnostic.message)
                        .with_color(color),
                );
            }
            // writing into a Vec cannot fail
            let _ = report
                .finish()
                .write((filename, Source::from(source)), &mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_ignores_warnings() {
        let mut result = ValidationResult::success();
        assert!(result.is_valid());
        result.add_warning(Diagnostic::new(DiagnosticKind::Undefined, "maybe"));
        assert!(result.is_valid());
        assert!(result.has_warnings());
        result.add_error(Diagnostic::new(DiagnosticKind::Name, "bad"));
        assert!(!result.is_valid());
        assert!(result.has_errors());
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut a = ValidationResult::success();
        a.add_error(Diagnostic::new(DiagnosticKind::Length, "first"));
        let mut b = ValidationResult::success();
        b.add_error(Diagnostic::new(DiagnosticKind::Brackets, "second"));
        b.add_warning(Diagnostic::new(DiagnosticKind::Undefined, "w"));

        let merged = a.merge(b);
        assert_eq!(merged.error_messages(), vec!["first", "second"]);
        assert_eq!(merged.warning_messages(), vec!["w"]);
    }

    #[test]
    fn test_format_includes_messages() {
        let source = "Hello [name";
        let mut result = ValidationResult::success();
        result.add_error(
            Diagnostic::new(DiagnosticKind::Brackets, "Unclosed bracket at position 6").at(6..7),
        );
        result.add_warning(Diagnostic::new(
            DiagnosticKind::Undefined,
            "Variable 'x' may be undefined",
        ));

        let out = result.format(source, "greeting.txt");
        assert!(out.contains("Unclosed bracket at position 6"));
        assert!(out.contains("Variable 'x' may be undefined"));
        assert!(out.contains("greeting.txt"));
    }

    #[test]
    fn test_format_labels_non_ascii_source() {
        let source = "مرحبا يا صديقي العزيز [name";
        let result = crate::validator::TemplateValidator::default().validate(source);
        let unclosed = result
            .errors
            .iter()
            .find(|d| d.message.starts_with("Unclosed bracket"))
            .expect("unclosed bracket reported");
        assert_eq!(unclosed.span, Some(40..41));

        let out = result.format(source, "ar.txt");
        assert!(out.contains("صديقي"), "source excerpt missing:\n{}", out);
        // once in the report header, once on the label
        assert_eq!(out.matches("Unclosed bracket at position 40").count(), 2);
    }
}
