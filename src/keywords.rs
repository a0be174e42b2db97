//! Reserved-word set and identifier classification.
//!
//! The reserved set is plain data so it can be extended per SQL dialect
//! without touching the lexer. It covers standard clause keywords, DDL
//! words, built-in scalar types, aggregate/window function names, and the
//! literal words `NULL`/`TRUE`/`FALSE`, none of which are ever maskable,
//! even though lexically they look like bare words.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::lexer::{Span, SpanKind};

/// Words that pass through masking untouched. Stored uppercase; membership
/// checks are case-insensitive.
static RESERVED_WORDS: &[&str] = &[
    // Clause keywords
    "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "IN", "LIKE", "ILIKE", "IS",
    "NULL", "DISTINCT", "AS", "ON", "JOIN", "LEFT", "RIGHT", "INNER", "OUTER",
    "FULL", "CROSS", "GROUP", "ORDER", "BY", "HAVING", "LIMIT", "OFFSET",
    "UNION", "ALL", "ANY", "SOME", "EXISTS", "BETWEEN", "CASE", "WHEN", "THEN",
    "ELSE", "END", "WITH", "RECURSIVE", "OVER", "PARTITION", "ROWS", "RANGE",
    "ASC", "DESC", "NULLS", "FIRST", "LAST", "USING", "NATURAL", "LATERAL",
    "FETCH", "NEXT", "ONLY", "TOP", "ESCAPE",
    // DML
    "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE", "RETURNING",
    "MERGE", "MATCHED", "CONFLICT", "DO", "NOTHING",
    // DDL
    "CREATE", "TABLE", "VIEW", "DROP", "ALTER", "ADD", "COLUMN", "PRIMARY",
    "KEY", "FOREIGN", "REFERENCES", "INDEX", "UNIQUE", "CONSTRAINT", "CHECK",
    "DEFAULT", "CASCADE", "RESTRICT", "IF", "TEMPORARY", "TEMP", "SEQUENCE",
    "TRIGGER", "FUNCTION", "PROCEDURE", "RETURNS", "GRANT", "REVOKE",
    "TRUNCATE", "COMMENT", "RENAME", "TO",
    // Transactions
    "BEGIN", "COMMIT", "ROLLBACK", "TRANSACTION", "SAVEPOINT",
    // Literals
    "TRUE", "FALSE", "UNKNOWN",
    // Built-in scalar types
    "INT", "INTEGER", "BIGINT", "SMALLINT", "TINYINT", "SERIAL", "BIGSERIAL",
    "DECIMAL", "NUMERIC", "FLOAT", "REAL", "DOUBLE", "PRECISION", "MONEY",
    "CHAR", "CHARACTER", "VARCHAR", "VARYING", "TEXT", "NCHAR", "NVARCHAR",
    "DATE", "TIME", "TIMESTAMP", "TIMESTAMPTZ", "DATETIME", "INTERVAL",
    "BOOLEAN", "BOOL", "BYTEA", "BINARY", "VARBINARY", "BLOB", "CLOB", "UUID",
    "JSON", "JSONB", "XML", "ARRAY", "ZONE",
    // Aggregate and window functions
    "COUNT", "SUM", "AVG", "MIN", "MAX", "STRING_AGG", "ARRAY_AGG",
    "GROUP_CONCAT", "RANK", "DENSE_RANK", "ROW_NUMBER", "NTILE", "LAG",
    "LEAD", "FIRST_VALUE", "LAST_VALUE", "PERCENTILE_CONT", "PERCENTILE_DISC",
    // Common scalar functions
    "COALESCE", "NULLIF", "CAST", "CONVERT", "EXTRACT", "NOW",
    "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER",
    "LOWER", "UPPER", "SUBSTRING", "TRIM", "LTRIM", "RTRIM", "LENGTH",
    "CHAR_LENGTH", "REPLACE", "CONCAT", "ABS", "ROUND", "FLOOR", "CEIL",
    "CEILING", "MOD", "POWER", "SQRT", "EXP", "LN", "LOG", "DATE_TRUNC",
    "DATE_PART", "DATEADD", "DATEDIFF", "GREATEST", "LEAST",
];

static RESERVED_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RESERVED_WORDS.iter().copied().collect());

/// Case-insensitive membership test against the reserved-word set.
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_SET.contains(word.to_ascii_uppercase().as_str())
}

/// Decide whether a span may be replaced by a placeholder.
///
/// Only bare and quoted identifiers are maskable. Keywords, literals,
/// comments, operators, and whitespace are protected syntax. The lexer has
/// already routed reserved bare words into `SpanKind::Keyword`, so this
/// check is purely on the span kind.
pub fn is_maskable(span: &Span) -> bool {
    matches!(span.kind, SpanKind::Identifier | SpanKind::QuotedIdentifier)
}
