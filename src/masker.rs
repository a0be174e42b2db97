//! Masking engine
//!
//! Drives the lexer over a SQL string, consults the classifier and the
//! mapping table, and reassembles the output by concatenating span text in
//! source order. Each operation is a single pure pass with no state beyond
//! the mapping table.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::keywords::{is_maskable, is_reserved_word};
use crate::lexer::{tokenize, LexWarning, LexerConfig, SpanKind};
use crate::mapping::{is_placeholder, MappingTable};

/// Word tokens inside comment text, for the comment-only mode's secondary
/// word-level pass.
static COMMENT_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("Invalid comment word regex"));

/// The masking orchestrator. Holds only the lexer configuration; all
/// session state lives in the caller's `MappingTable`.
#[derive(Debug, Clone, Default)]
pub struct Masker {
    config: LexerConfig,
}

impl Masker {
    pub fn new(config: LexerConfig) -> Self {
        Self { config }
    }

    /// Replace every maskable identifier with its placeholder.
    ///
    /// Quoted identifiers are keyed by their exact text including the quote
    /// delimiters, and the masked output is always the bare placeholder;
    /// placeholders never need quoting. Keywords, literals, comments,
    /// operators, and whitespace pass through verbatim.
    pub fn encode(&self, sql: &str, mapping: &mut MappingTable) -> (String, Vec<LexWarning>) {
        let (spans, warnings) = tokenize(sql, &self.config);
        let mut output = String::with_capacity(sql.len());
        for span in &spans {
            if is_maskable(span) {
                output.push_str(&mapping.resolve_or_create(&span.text));
            } else {
                output.push_str(&span.text);
            }
        }
        (output, warnings)
    }

    /// Restore original identifiers in masked SQL.
    ///
    /// Only bare-identifier spans that are placeholder-shaped and known to
    /// the mapping are substituted. Unknown placeholders stay unchanged
    /// (best-effort reconstruction); the mapping is never mutated.
    pub fn decode(&self, masked_sql: &str, mapping: &MappingTable) -> (String, Vec<LexWarning>) {
        let (spans, warnings) = tokenize(masked_sql, &self.config);
        let mut output = String::with_capacity(masked_sql.len());
        for span in &spans {
            match span.kind {
                SpanKind::Identifier if is_placeholder(&span.text) => {
                    output.push_str(mapping.restore(&span.text).unwrap_or(&span.text));
                }
                _ => output.push_str(&span.text),
            }
        }
        (output, warnings)
    }

    /// Mask only comment text, leaving all executable SQL byte-identical.
    ///
    /// Within each comment span a secondary word-level split masks every
    /// non-reserved word through the same mapping table, so a word that also
    /// appears as a real identifier elsewhere in the session gets the same
    /// placeholder. Comment delimiters and non-word characters are kept.
    pub fn encode_comments_only(
        &self,
        sql: &str,
        mapping: &mut MappingTable,
    ) -> (String, Vec<LexWarning>) {
        let (spans, warnings) = tokenize(sql, &self.config);
        let mut output = String::with_capacity(sql.len());
        for span in &spans {
            if span.kind == SpanKind::Comment {
                output.push_str(&mask_comment_words(&span.text, mapping));
            } else {
                output.push_str(&span.text);
            }
        }
        (output, warnings)
    }

    /// Inverse of [`encode_comments_only`](Self::encode_comments_only):
    /// restores placeholder-shaped words inside comment spans only.
    pub fn decode_comments_only(
        &self,
        masked_sql: &str,
        mapping: &MappingTable,
    ) -> (String, Vec<LexWarning>) {
        let (spans, warnings) = tokenize(masked_sql, &self.config);
        let mut output = String::with_capacity(masked_sql.len());
        for span in &spans {
            if span.kind == SpanKind::Comment {
                output.push_str(&restore_comment_words(&span.text, mapping));
            } else {
                output.push_str(&span.text);
            }
        }
        (output, warnings)
    }
}

fn mask_comment_words(comment: &str, mapping: &mut MappingTable) -> String {
    COMMENT_WORD
        .replace_all(comment, |caps: &regex::Captures<'_>| {
            let word = &caps[0];
            if is_reserved_word(word) {
                word.to_string()
            } else {
                mapping.resolve_or_create(word)
            }
        })
        .into_owned()
}

fn restore_comment_words(comment: &str, mapping: &MappingTable) -> String {
    COMMENT_WORD
        .replace_all(comment, |caps: &regex::Captures<'_>| {
            let word = &caps[0];
            if is_placeholder(word) {
                mapping.restore(word).unwrap_or(word).to_string()
            } else {
                word.to_string()
            }
        })
        .into_owned()
}

/// Whole-cell unmask: if the value (after whitespace trimming) is exactly a
/// known placeholder, substitute it wholesale; otherwise pass through
/// unchanged. Supports restoring non-SQL columns that happen to contain a
/// masked bare name.
pub fn unmask_value(value: &str, mapping: &MappingTable) -> String {
    match mapping.restore(value.trim()) {
        Some(original) => original.to_string(),
        None => value.to_string(),
    }
}
