//! Row-oriented CSV batch interface.
//!
//! Masks or unmasks the SQL column of a CSV file row by row. All rows of
//! one run share a single mapping table, so placeholder assignment is
//! consistent across the whole batch; the mapping is persisted once after
//! the last row.

use std::path::PathBuf;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::SqlMaskError;
use crate::mapping::MappingTable;
use crate::masker::{unmask_value, Masker};

/// Shared configuration for the CSV subcommands.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Input CSV file
    pub input_path: PathBuf,
    /// Output CSV file
    pub output_path: PathBuf,
    /// Mapping JSON file (written by mask, read by unmask)
    pub mapping_path: PathBuf,
    /// Field delimiter, default `,`
    pub delimiter: u8,
    /// Quote character, default `"`
    pub quote: u8,
    /// Print progress to stdout
    pub verbose: bool,
}

/// Row/mapping counts from a batch run, for caller-side reporting.
#[derive(Debug, Clone, Copy)]
pub struct CsvReport {
    pub rows: usize,
    pub mapping_entries: usize,
    pub lex_warnings: usize,
}

/// Mask the SQL column of every row into `masked_column` (appended to the
/// header if absent, overwritten in place if present). Empty cells stay
/// empty. The shared mapping is written once after all rows.
pub fn mask_csv(
    masker: &Masker,
    options: &CsvOptions,
    sql_column: &str,
    masked_column: &str,
    comments_only: bool,
) -> Result<CsvReport, SqlMaskError> {
    let mut mapping = MappingTable::new();
    let mut lex_warnings = 0;

    let rows = transform_column(options, sql_column, masked_column, |sql| {
        let (masked, warnings) = if comments_only {
            masker.encode_comments_only(sql, &mut mapping)
        } else {
            masker.encode(sql, &mut mapping)
        };
        lex_warnings += warnings.len();
        masked
    })?;

    mapping.save_to_file(&options.mapping_path)?;

    if options.verbose {
        println!("Processed {} rows", rows);
        println!("Output CSV written to: {}", options.output_path.display());
        println!("Mapping JSON written to: {}", options.mapping_path.display());
        println!("Mapping contains {} entries", mapping.len());
    }

    Ok(CsvReport {
        rows,
        mapping_entries: mapping.len(),
        lex_warnings,
    })
}

/// Restore the masked column of every row into `unmasked_column` using a
/// previously saved mapping. The mapping is never written.
pub fn unmask_csv(
    masker: &Masker,
    options: &CsvOptions,
    masked_column: &str,
    unmasked_column: &str,
    comments_only: bool,
) -> Result<CsvReport, SqlMaskError> {
    let mapping = MappingTable::load_from_file(&options.mapping_path)?;
    let mut lex_warnings = 0;

    let rows = transform_column(options, masked_column, unmasked_column, |masked| {
        let (restored, warnings) = if comments_only {
            masker.decode_comments_only(masked, &mapping)
        } else {
            masker.decode(masked, &mapping)
        };
        lex_warnings += warnings.len();
        restored
    })?;

    if options.verbose {
        println!("Processed {} rows", rows);
        println!("Output CSV written to: {}", options.output_path.display());
        println!("Used mapping from: {}", options.mapping_path.display());
        println!("Mapping contains {} entries", mapping.len());
    }

    Ok(CsvReport {
        rows,
        mapping_entries: mapping.len(),
        lex_warnings,
    })
}

/// Pass every cell of every column through the whole-cell unmask, restoring
/// non-SQL columns that contain a masked bare name. Column names and order
/// are unchanged.
pub fn unmask_all_columns(options: &CsvOptions) -> Result<CsvReport, SqlMaskError> {
    let mapping = MappingTable::load_from_file(&options.mapping_path)?;

    let mut reader = open_reader(options)?;
    let headers = read_headers(&mut reader, options)?;
    let mut writer = open_writer(options)?;

    write_record(&mut writer, &headers, options)?;

    let mut rows = 0;
    for result in reader.records() {
        let record = result.map_err(|source| SqlMaskError::Csv {
            path: options.input_path.clone(),
            source,
        })?;
        let unmasked: Vec<String> = record
            .iter()
            .map(|cell| unmask_value(cell, &mapping))
            .collect();
        write_record(&mut writer, &StringRecord::from(unmasked), options)?;
        rows += 1;
    }

    flush_writer(writer, options)?;

    if options.verbose {
        println!("Processed {} rows with {} columns", rows, headers.len());
        println!("Output CSV written to: {}", options.output_path.display());
        println!("Used mapping from: {}", options.mapping_path.display());
    }

    Ok(CsvReport {
        rows,
        mapping_entries: mapping.len(),
        lex_warnings: 0,
    })
}

/// Shared driver: read rows, apply `transform` to the source column, write
/// the result into the target column. Returns the number of rows written.
fn transform_column(
    options: &CsvOptions,
    source_column: &str,
    target_column: &str,
    mut transform: impl FnMut(&str) -> String,
) -> Result<usize, SqlMaskError> {
    let mut reader = open_reader(options)?;
    let headers = read_headers(&mut reader, options)?;

    let source_idx = find_column(&headers, source_column)?;
    let target_idx = headers.iter().position(|h| h == target_column);

    let mut out_headers = headers.clone();
    if target_idx.is_none() {
        out_headers.push_field(target_column);
    }

    let mut writer = open_writer(options)?;
    write_record(&mut writer, &out_headers, options)?;

    let mut rows = 0;
    for result in reader.records() {
        let record = result.map_err(|source| SqlMaskError::Csv {
            path: options.input_path.clone(),
            source,
        })?;

        let value = record.get(source_idx).unwrap_or("");
        let transformed = if value.trim().is_empty() {
            String::new()
        } else {
            transform(value)
        };

        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        match target_idx {
            Some(idx) => fields[idx] = transformed,
            None => fields.push(transformed),
        }

        write_record(&mut writer, &StringRecord::from(fields), options)?;
        rows += 1;
    }

    flush_writer(writer, options)?;
    Ok(rows)
}

fn open_reader(options: &CsvOptions) -> Result<csv::Reader<std::fs::File>, SqlMaskError> {
    ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .from_path(&options.input_path)
        .map_err(|source| SqlMaskError::Csv {
            path: options.input_path.clone(),
            source,
        })
}

fn open_writer(options: &CsvOptions) -> Result<csv::Writer<std::fs::File>, SqlMaskError> {
    WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .from_path(&options.output_path)
        .map_err(|source| SqlMaskError::Csv {
            path: options.output_path.clone(),
            source,
        })
}

fn read_headers(
    reader: &mut csv::Reader<std::fs::File>,
    options: &CsvOptions,
) -> Result<StringRecord, SqlMaskError> {
    let headers = reader
        .headers()
        .map_err(|source| SqlMaskError::Csv {
            path: options.input_path.clone(),
            source,
        })?
        .clone();
    if headers.is_empty() {
        return Err(SqlMaskError::MissingHeaders {
            path: options.input_path.clone(),
        });
    }
    Ok(headers)
}

fn find_column(headers: &StringRecord, column: &str) -> Result<usize, SqlMaskError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| SqlMaskError::ColumnNotFound {
            column: column.to_string(),
            available: headers.iter().collect::<Vec<_>>().join(", "),
        })
}

fn write_record(
    writer: &mut csv::Writer<std::fs::File>,
    record: &StringRecord,
    options: &CsvOptions,
) -> Result<(), SqlMaskError> {
    writer
        .write_record(record)
        .map_err(|source| SqlMaskError::Csv {
            path: options.output_path.clone(),
            source,
        })
}

fn flush_writer(
    mut writer: csv::Writer<std::fs::File>,
    options: &CsvOptions,
) -> Result<(), SqlMaskError> {
    writer.flush().map_err(|source| SqlMaskError::OutputWrite {
        path: options.output_path.clone(),
        source,
    })
}
