//! SQL lexer
//!
//! Splits a raw SQL string into an ordered sequence of classified spans.
//! The lexer is total: every input produces a span sequence, and the
//! concatenation of all span texts reproduces the input exactly. There is
//! no failure state: characters that match no rule become single-character
//! `Punctuation` spans, and unterminated strings/comments are absorbed into
//! a single trailing span with a non-fatal warning.
//!
//! This is deliberately not a SQL parser. It only needs enough lexical
//! discipline to tell user-chosen names apart from string literals,
//! comments, numbers, operators, and reserved keywords.

use std::fmt;

use crate::keywords::is_reserved_word;

/// Classification of a lexical span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Keyword,
    Identifier,
    QuotedIdentifier,
    StringLiteral,
    NumericLiteral,
    Comment,
    Operator,
    Punctuation,
    Whitespace,
}

/// A contiguous, classified substring of the input.
///
/// Spans are exhaustive and non-overlapping: `text` slices cover the whole
/// input in order, so reassembly is plain concatenation. `start`/`end` are
/// byte offsets kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Non-fatal lexing anomalies. The affected region is still emitted as a
/// single span running to end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexWarning {
    UnterminatedBlockComment { start: usize },
    UnterminatedStringLiteral { start: usize },
    UnterminatedQuotedIdentifier { start: usize },
}

impl fmt::Display for LexWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexWarning::UnterminatedBlockComment { start } => {
                write!(f, "unterminated block comment starting at byte {}", start)
            }
            LexWarning::UnterminatedStringLiteral { start } => {
                write!(f, "unterminated string literal starting at byte {}", start)
            }
            LexWarning::UnterminatedQuotedIdentifier { start } => {
                write!(f, "unterminated quoted identifier starting at byte {}", start)
            }
        }
    }
}

/// Which quoted-identifier delimiters the lexer recognizes.
///
/// Double quotes are always on (SQL standard). Backticks (MySQL) and
/// brackets (SQL Server) are opt-in, since in other dialects those
/// characters are ordinary punctuation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexerConfig {
    pub backtick_identifiers: bool,
    pub bracket_identifiers: bool,
}

/// Multi-character operators matched greedily before the single-char
/// catch-all.
const MULTI_CHAR_OPERATORS: &[&str] = &["<=", ">=", "<>", "!=", "::", "||"];

/// Tokenize `input` into spans, in source order.
///
/// Always succeeds; anomalies are reported through the warning list.
pub fn tokenize(input: &str, config: &LexerConfig) -> (Vec<Span>, Vec<LexWarning>) {
    let mut spans = Vec::new();
    let mut warnings = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let first = rest.chars().next().unwrap();

        let (kind, len) = if rest.starts_with("--") {
            // Line comment: up to but excluding the newline.
            let len = rest.find('\n').unwrap_or(rest.len());
            (SpanKind::Comment, len)
        } else if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(i) => (SpanKind::Comment, 2 + i + 2),
                None => {
                    warnings.push(LexWarning::UnterminatedBlockComment { start: pos });
                    (SpanKind::Comment, rest.len())
                }
            }
        } else if first == '\'' {
            let len = scan_delimited(rest, '\'', '\'');
            if len == 0 {
                warnings.push(LexWarning::UnterminatedStringLiteral { start: pos });
                (SpanKind::StringLiteral, rest.len())
            } else {
                (SpanKind::StringLiteral, len)
            }
        } else if first == '"'
            || (config.backtick_identifiers && first == '`')
            || (config.bracket_identifiers && first == '[')
        {
            let close = if first == '[' { ']' } else { first };
            let len = scan_delimited(rest, first, close);
            if len == 0 {
                warnings.push(LexWarning::UnterminatedQuotedIdentifier { start: pos });
                (SpanKind::QuotedIdentifier, rest.len())
            } else {
                (SpanKind::QuotedIdentifier, len)
            }
        } else if first.is_ascii_digit() {
            (SpanKind::NumericLiteral, scan_number(rest))
        } else if first.is_ascii_alphabetic() || first == '_' {
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            let kind = if is_reserved_word(&rest[..len]) {
                SpanKind::Keyword
            } else {
                SpanKind::Identifier
            };
            (kind, len)
        } else if first.is_whitespace() {
            let len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            (SpanKind::Whitespace, len)
        } else if let Some(op) = MULTI_CHAR_OPERATORS.iter().find(|op| rest.starts_with(*op)) {
            (SpanKind::Operator, op.len())
        } else {
            // Single-character catch-all; never errors. Full char width so
            // non-ASCII input stays on UTF-8 boundaries.
            let kind = if "+-*/%<>=!|&^~".contains(first) {
                SpanKind::Operator
            } else {
                SpanKind::Punctuation
            };
            (kind, first.len_utf8())
        };

        spans.push(Span {
            kind,
            text: rest[..len].to_string(),
            start: pos,
            end: pos + len,
        });
        pos += len;
    }

    (spans, warnings)
}

/// Scan a delimited region starting at `open`, where a doubled closing
/// delimiter is the SQL-standard embedded escape (`''`, `""`, `]]`).
///
/// Returns the byte length of the region including both delimiters, or 0 if
/// the closing delimiter is never found.
fn scan_delimited(rest: &str, open: char, close: char) -> usize {
    debug_assert!(rest.starts_with(open));
    let body = &rest[open.len_utf8()..];
    let mut offset = 0;
    while let Some(i) = body[offset..].find(close) {
        let after = offset + i + close.len_utf8();
        if body[after..].starts_with(close) {
            // Doubled delimiter: part of the content, keep scanning.
            offset = after + close.len_utf8();
        } else {
            return open.len_utf8() + after;
        }
    }
    0
}

/// Maximal run of digits, optional single decimal point, optional exponent.
/// The decimal point and exponent are consumed only when a digit follows,
/// so `1.` lexes as `1` + `.` and stays lossless.
fn scan_number(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if bytes.get(j).is_some_and(u8::is_ascii_digit) {
            i = j;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }
    i
}
