//! CSV batch tests: masking a query column across rows with one shared
//! mapping, restoring it, and the whole-cell unmask-all pass.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use sqlmask::csv_batch::{mask_csv, unmask_all_columns, unmask_csv, CsvOptions};
use sqlmask::error::SqlMaskError;
use sqlmask::mapping::MappingTable;
use sqlmask::masker::Masker;

fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn options(dir: &Path, input: PathBuf) -> CsvOptions {
    CsvOptions {
        input_path: input,
        output_path: dir.join("out.csv"),
        mapping_path: dir.join("mapping.json"),
        delimiter: b',',
        quote: b'"',
        verbose: false,
    }
}

#[test]
fn test_mask_csv_is_consistent_across_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(
        dir.path(),
        "in.csv",
        "id,query\n1,SELECT user_id FROM users\n2,DELETE FROM users WHERE user_id = 3\n",
    );
    let opts = options(dir.path(), input);

    let masker = Masker::default();
    let report = mask_csv(&masker, &opts, "query", "masked_query", false).unwrap();
    assert_eq!(report.rows, 2);

    let output = fs::read_to_string(&opts.output_path).unwrap();
    let mut lines = output.lines();
    assert_eq!(lines.next().unwrap(), "id,query,masked_query");

    // Same placeholder for "users" in both rows.
    let mapping = MappingTable::load_from_file(&opts.mapping_path).unwrap();
    let users = mapping.forward().get("users").unwrap();
    let rows: Vec<&str> = lines.collect();
    assert!(rows[0].contains(users.as_str()));
    assert!(rows[1].contains(users.as_str()));
    assert!(!rows[0].contains("user_id"));
}

#[test]
fn test_mask_csv_leaves_blank_cells_blank() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(
        dir.path(),
        "in.csv",
        "id,query\n1,SELECT a FROM b\n2,\n3,   \n",
    );
    let opts = options(dir.path(), input);

    let report = mask_csv(&Masker::default(), &opts, "query", "masked_query", false).unwrap();
    assert_eq!(report.rows, 3);

    let output = fs::read_to_string(&opts.output_path).unwrap();
    let rows: Vec<&str> = output.lines().skip(1).collect();
    assert!(rows[1].ends_with(','));
    assert!(rows[2].ends_with(','));
}

#[test]
fn test_mask_then_unmask_csv_round_trip() {
    let dir = TempDir::new().unwrap();
    let queries = [
        "SELECT user_id, email FROM users WHERE status = 'active'",
        "SELECT COUNT(*) FROM orders GROUP BY user_id",
    ];
    let input = write_csv(
        dir.path(),
        "in.csv",
        &format!("query\n\"{}\"\n\"{}\"\n", queries[0], queries[1]),
    );
    let mask_opts = options(dir.path(), input);
    mask_csv(&Masker::default(), &mask_opts, "query", "masked_query", false).unwrap();

    let unmask_opts = CsvOptions {
        input_path: mask_opts.output_path.clone(),
        output_path: dir.path().join("restored.csv"),
        mapping_path: mask_opts.mapping_path.clone(),
        ..mask_opts.clone()
    };
    unmask_csv(
        &Masker::default(),
        &unmask_opts,
        "masked_query",
        "unmasked_query",
        false,
    )
    .unwrap();

    let mut reader = csv::Reader::from_path(&unmask_opts.output_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let unmasked_idx = headers
        .iter()
        .position(|h| h == "unmasked_query")
        .unwrap();
    for (record, original) in reader.records().zip(queries) {
        assert_eq!(record.unwrap().get(unmasked_idx).unwrap(), original);
    }
}

#[test]
fn test_mask_csv_overwrites_existing_target_column() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(
        dir.path(),
        "in.csv",
        "query,masked_query\nSELECT a FROM b,stale\n",
    );
    let opts = options(dir.path(), input);

    mask_csv(&Masker::default(), &opts, "query", "masked_query", false).unwrap();

    let output = fs::read_to_string(&opts.output_path).unwrap();
    assert_eq!(output.lines().next().unwrap(), "query,masked_query");
    assert!(!output.contains("stale"));
}

#[test]
fn test_unmask_all_columns_whole_cell() {
    let dir = TempDir::new().unwrap();

    // Build a mapping via a throwaway encode.
    let mut mapping = MappingTable::new();
    let masker = Masker::default();
    masker.encode("SELECT email FROM users", &mut mapping);
    let mapping_path = dir.path().join("mapping.json");
    mapping.save_to_file(&mapping_path).unwrap();

    let users = mapping.forward().get("users").unwrap().clone();
    let email = mapping.forward().get("email").unwrap().clone();

    let input = write_csv(
        dir.path(),
        "in.csv",
        &format!(
            "table_name,column_name,note\n{users},{email},not a placeholder\n",
        ),
    );
    let opts = CsvOptions {
        input_path: input,
        output_path: dir.path().join("out.csv"),
        mapping_path,
        delimiter: b',',
        quote: b'"',
        verbose: false,
    };
    unmask_all_columns(&opts).unwrap();

    let output = fs::read_to_string(&opts.output_path).unwrap();
    assert_eq!(
        output,
        "table_name,column_name,note\nusers,email,not a placeholder\n"
    );
}

#[test]
fn test_missing_sql_column_lists_available_headers() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), "in.csv", "id,stmt\n1,SELECT 1\n");
    let opts = options(dir.path(), input);

    let err = mask_csv(&Masker::default(), &opts, "query", "masked_query", false).unwrap_err();
    match err {
        SqlMaskError::ColumnNotFound { column, available } => {
            assert_eq!(column, "query");
            assert_eq!(available, "id, stmt");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_mask_comments_csv_leaves_code_untouched() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(
        dir.path(),
        "in.csv",
        "query\nSELECT acct FROM ledger -- acct is sensitive\n",
    );
    let opts = options(dir.path(), input);

    mask_csv(&Masker::default(), &opts, "query", "masked_query", true).unwrap();

    let output = fs::read_to_string(&opts.output_path).unwrap();
    assert!(output.contains("SELECT acct FROM ledger"));
    assert!(!output.contains("sensitive"));
}

#[test]
fn test_semicolon_delimiter() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), "in.csv", "id;query\n1;SELECT a FROM b\n");
    let mut opts = options(dir.path(), input);
    opts.delimiter = b';';

    let report = mask_csv(&Masker::default(), &opts, "query", "masked_query", false).unwrap();
    assert_eq!(report.rows, 1);

    let output = fs::read_to_string(&opts.output_path).unwrap();
    assert!(output.lines().next().unwrap().contains("id;query;masked_query"));
}
