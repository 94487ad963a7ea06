//! Method argument lexing using logos
//!
//! Splits `'Y-m-d', 2, "a, b"` into literal values. Commas inside quotes do
//! not split, a backslash escapes the quote character, and unquoted
//! numeric-looking arguments become numbers.

use logos::Logos;

use crate::value::Value;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum ArgToken {
    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleQuoted,

    #[regex(r#"'([^'\\]|\\.)*'"#)]
    SingleQuoted,

    #[token(",")]
    Comma,

    #[regex(r#"[^,"'\s]+"#)]
    Bare,

    #[regex(r"\s+")]
    Whitespace,
}

/// Tokens making up one argument
#[derive(Default)]
struct Segment {
    /// Byte range of the first to last non-whitespace token
    range: Option<(usize, usize)>,
    tokens: usize,
    quote: Option<char>,
}

impl Segment {
    fn push(&mut self, token: ArgToken, span: std::ops::Range<usize>) {
        self.range = Some(match self.range {
            Some((start, _)) => (start, span.end),
            None => (span.start, span.end),
        });
        self.tokens += 1;
        self.quote = match token {
            ArgToken::DoubleQuoted => Some('"'),
            ArgToken::SingleQuoted => Some('\''),
            _ => None,
        };
    }

    fn value(&self, source: &str) -> Value {
        let Some((start, end)) = self.range else {
            return Value::Str(String::new());
        };
        let text = &source[start..end];
        match self.quote {
            Some(quote) if self.tokens == 1 => {
                Value::Str(unescape(&text[1..text.len() - 1], quote))
            }
            _ => Value::from_literal(text),
        }
    }
}

fn unescape(inner: &str, quote: char) -> String {
    let escaped = format!("\\{}", quote);
    inner.replace(&escaped, &quote.to_string())
}

/// Parse a comma-separated argument list
pub fn parse_arguments(source: &str) -> Vec<Value> {
    if source.trim().is_empty() {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut segment = Segment::default();
    let mut segment_start = 0;

    for (token, span) in ArgToken::lexer(source).spanned() {
        match token {
            Ok(ArgToken::Comma) => {
                args.push(segment.value(source));
                segment = Segment::default();
                segment_start = span.end;
            }
            Ok(ArgToken::Whitespace) => {}
            Ok(token) => segment.push(token, span),
            Err(()) => {
                // unterminated quote: the rest of the list belongs to this argument
                let start = segment.range.map_or(span.start, |(start, _)| start);
                args.push(Value::Str(source[start..].trim().to_string()));
                return args;
            }
        }
    }

    if segment_start < source.len() {
        args.push(segment.value(source));
    }
    args
}
