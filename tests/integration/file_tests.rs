//! File pipeline tests: encode/decode whole .sql files with their mapping
//! JSON, session resumption, and mapping failure modes.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use sqlmask::{decode_sql_file, encode_sql_file, DecodeOptions, MaskOptions};

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn mask_options(input: PathBuf, output: PathBuf) -> MaskOptions {
    MaskOptions {
        input_path: input,
        output_path: output,
        mapping_path: None,
        resume_mapping: None,
        comments_only: false,
        lexer_config: Default::default(),
        verbose: false,
    }
}

#[test]
fn test_encode_then_decode_restores_file_exactly() {
    let dir = TempDir::new().unwrap();
    let sql = "SELECT user_id, email\nFROM users\nWHERE status = 'active';\n";
    let input = write_file(dir.path(), "query.sql", sql);
    let masked_path = dir.path().join("masked.sql");

    let report = encode_sql_file(mask_options(input, masked_path.clone())).unwrap();
    assert_eq!(report.mapping_entries, 4);
    assert_eq!(report.lex_warnings, 0);

    let masked = fs::read_to_string(&masked_path).unwrap();
    assert!(!masked.contains("users"));
    assert!(masked.contains("'active'"));

    let restored_path = dir.path().join("restored.sql");
    decode_sql_file(DecodeOptions {
        input_path: masked_path,
        mapping_path: report.mapping_path,
        output_path: restored_path.clone(),
        comments_only: false,
        lexer_config: Default::default(),
        verbose: false,
    })
    .unwrap();

    assert_eq!(fs::read_to_string(&restored_path).unwrap(), sql);
}

#[test]
fn test_default_mapping_path_is_output_plus_suffix() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "q.sql", "SELECT a FROM b");
    let output = dir.path().join("masked.sql");

    let report = encode_sql_file(mask_options(input, output.clone())).unwrap();
    assert_eq!(report.mapping_path, dir.path().join("masked.sql.map.json"));
    assert!(report.mapping_path.exists());
}

#[test]
fn test_resume_mapping_keeps_placeholders_stable() {
    let dir = TempDir::new().unwrap();
    let first_in = write_file(dir.path(), "a.sql", "SELECT user_id FROM users");
    let first_out = dir.path().join("a.masked.sql");
    let report = encode_sql_file(mask_options(first_in, first_out.clone())).unwrap();

    // Second file reuses the first session's mapping.
    let second_in = write_file(dir.path(), "b.sql", "DELETE FROM users WHERE user_id = 1");
    let second_out = dir.path().join("b.masked.sql");
    let mut options = mask_options(second_in, second_out.clone());
    options.resume_mapping = Some(report.mapping_path.clone());
    encode_sql_file(options).unwrap();

    let first = fs::read_to_string(&first_out).unwrap();
    let second = fs::read_to_string(&second_out).unwrap();

    // "users" got a placeholder in session one; session two must reuse it.
    let (spans, _) = sqlmask::lexer::tokenize(&first, &Default::default());
    let users_placeholder = spans
        .iter()
        .rev()
        .find(|s| s.kind == sqlmask::lexer::SpanKind::Identifier)
        .unwrap()
        .text
        .clone();
    assert!(second.contains(&users_placeholder));
}

#[test]
fn test_comments_only_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let sql = "SELECT acct_no FROM ledger -- acct_no links to billing\n";
    let input = write_file(dir.path(), "q.sql", sql);
    let masked_path = dir.path().join("masked.sql");

    let mut options = mask_options(input, masked_path.clone());
    options.comments_only = true;
    let report = encode_sql_file(options).unwrap();

    let masked = fs::read_to_string(&masked_path).unwrap();
    assert!(masked.starts_with("SELECT acct_no FROM ledger -- "));
    assert!(!masked.contains("billing"));

    let restored_path = dir.path().join("restored.sql");
    decode_sql_file(DecodeOptions {
        input_path: masked_path,
        mapping_path: report.mapping_path,
        output_path: restored_path.clone(),
        comments_only: true,
        lexer_config: Default::default(),
        verbose: false,
    })
    .unwrap();
    assert_eq!(fs::read_to_string(&restored_path).unwrap(), sql);
}

#[test]
fn test_unterminated_literal_is_nonfatal_and_reported() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "q.sql", "SELECT a FROM t WHERE s = 'open");
    let output = dir.path().join("masked.sql");

    let report = encode_sql_file(mask_options(input, output)).unwrap();
    assert_eq!(report.lex_warnings, 1);
}

#[test]
fn test_malformed_mapping_is_fatal_to_decode() {
    let dir = TempDir::new().unwrap();
    let masked = write_file(dir.path(), "masked.sql", "SELECT m1 FROM m2");
    let mapping = write_file(dir.path(), "mapping.json", "[1, 2, 3]");
    let output = dir.path().join("restored.sql");

    let result = decode_sql_file(DecodeOptions {
        input_path: masked,
        mapping_path: mapping,
        output_path: output.clone(),
        comments_only: false,
        lexer_config: Default::default(),
        verbose: false,
    });

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Malformed mapping"));
    // No partial processing: nothing was written.
    assert!(!output.exists());
}

#[test]
fn test_decode_with_foreign_placeholders_is_best_effort() {
    let dir = TempDir::new().unwrap();
    let masked = write_file(dir.path(), "masked.sql", "SELECT m1, m99 FROM m2");
    let mapping = write_file(
        dir.path(),
        "mapping.json",
        "{\"user_id\": \"m1\", \"users\": \"m2\"}",
    );
    let output = dir.path().join("restored.sql");

    decode_sql_file(DecodeOptions {
        input_path: masked,
        mapping_path: mapping,
        output_path: output.clone(),
        comments_only: false,
        lexer_config: Default::default(),
        verbose: false,
    })
    .unwrap();

    // Known placeholders restored, the unknown one left unchanged.
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "SELECT user_id, m99 FROM users"
    );
}

#[test]
fn test_missing_input_file_errors() {
    let dir = TempDir::new().unwrap();
    let result = encode_sql_file(mask_options(
        dir.path().join("nonexistent.sql"),
        dir.path().join("out.sql"),
    ));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to read SQL file"));
}

#[test]
fn test_utf8_bom_is_stripped_before_masking() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bom.sql");
    fs::write(&input, "\u{FEFF}SELECT a FROM b").unwrap();
    let output = dir.path().join("masked.sql");

    encode_sql_file(mask_options(input, output.clone())).unwrap();
    let masked = fs::read_to_string(&output).unwrap();
    assert!(masked.starts_with("SELECT"));
}
