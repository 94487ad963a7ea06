//! Placeholder scanning

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

/// A placeholder found in template text
#[derive(Debug, Clone, PartialEq)]
pub struct Located<'t> {
    /// Text strictly between the delimiters
    pub name: &'t str,
    /// Span of the whole token, delimiters included
    pub span: Span,
}

/// Find the first placeholder in `text`.
///
/// Takes the first `starter`, then the first `ender` after it. Returns `None`
/// when there is no starter or the first starter is never closed.
pub fn next_placeholder<'t>(text: &'t str, starter: &str, ender: &str) -> Option<&'t str> {
    locate_from(text, 0, starter, ender).map(|found| found.name)
}

/// All placeholders in `text`, left to right, each scan resuming after the
/// previous ender. Stops at the first unterminated starter.
pub fn placeholders<'t>(text: &'t str, starter: &str, ender: &str) -> Vec<Located<'t>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(located) = locate_from(text, pos, starter, ender) {
        pos = located.span.end;
        found.push(located);
    }
    found
}

fn locate_from<'t>(text: &'t str, from: usize, starter: &str, ender: &str) -> Option<Located<'t>> {
    if starter.is_empty() || ender.is_empty() || from > text.len() {
        return None;
    }
    let start = from + text[from..].find(starter)?;
    let inner = start + starter.len();
    let end = inner + text[inner..].find(ender)?;
    Some(Located {
        name: &text[inner..end],
        span: start..end + ender.len(),
    })
}
