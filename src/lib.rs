//! sqlmask: SQL identifier obfuscation with lossless restore
//!
//! This library replaces schema-identifying names (tables, columns,
//! aliases) in SQL text with opaque placeholders while leaving keywords,
//! literals, comments, and structure intact, and restores the original
//! text bit-for-bit from a saved mapping. It is built on a lossless lexer
//! rather than regex substitution, so string literals and comments are
//! provably never misread as identifiers.

pub mod csv_batch;
pub mod error;
pub mod keywords;
pub mod lexer;
pub mod mapping;
pub mod masker;

use std::path::{Path, PathBuf};

use anyhow::Result;
use encoding_rs::WINDOWS_1252;

use lexer::LexerConfig;
use mapping::MappingTable;
use masker::Masker;

pub use error::SqlMaskError;

/// Options for masking a SQL file
#[derive(Debug, Clone)]
pub struct MaskOptions {
    /// Path to the input .sql file
    pub input_path: PathBuf,
    /// Output path for the masked SQL
    pub output_path: PathBuf,
    /// Output path for the mapping JSON (defaults to `<output>.map.json`)
    pub mapping_path: Option<PathBuf>,
    /// Existing mapping to resume, keeping placeholders consistent across runs
    pub resume_mapping: Option<PathBuf>,
    /// Mask only comment text, leaving executable SQL untouched
    pub comments_only: bool,
    /// Quoted-identifier dialect configuration
    pub lexer_config: LexerConfig,
    /// Enable verbose output
    pub verbose: bool,
}

/// Options for restoring a masked SQL file
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Path to the masked .sql file
    pub input_path: PathBuf,
    /// Path to the mapping JSON written during masking
    pub mapping_path: PathBuf,
    /// Output path for the restored SQL
    pub output_path: PathBuf,
    /// Restore comment text masked by the comments-only mode
    pub comments_only: bool,
    /// Quoted-identifier dialect configuration
    pub lexer_config: LexerConfig,
    /// Enable verbose output
    pub verbose: bool,
}

/// Counts from a completed mask run
#[derive(Debug, Clone)]
pub struct EncodeReport {
    /// Where the mapping JSON was written
    pub mapping_path: PathBuf,
    /// Number of identifier entries in the mapping
    pub mapping_entries: usize,
    /// Number of non-fatal lexing anomalies
    pub lex_warnings: usize,
}

/// Mask a SQL file and write the masked text plus the mapping JSON
pub fn encode_sql_file(options: MaskOptions) -> Result<EncodeReport> {
    if options.verbose {
        println!("Masking: {}", options.input_path.display());
    }

    let sql = read_sql_file(&options.input_path)?;

    let mut mapping = match &options.resume_mapping {
        Some(path) => MappingTable::load_from_file(path)?,
        None => MappingTable::new(),
    };

    let masker = Masker::new(options.lexer_config);
    let (masked, warnings) = if options.comments_only {
        masker.encode_comments_only(&sql, &mut mapping)
    } else {
        masker.encode(&sql, &mut mapping)
    };

    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    std::fs::write(&options.output_path, &masked).map_err(|source| {
        SqlMaskError::OutputWrite {
            path: options.output_path.clone(),
            source,
        }
    })?;

    let mapping_path = options.mapping_path.unwrap_or_else(|| {
        let mut name = options.output_path.as_os_str().to_owned();
        name.push(".map.json");
        PathBuf::from(name)
    });
    mapping.save_to_file(&mapping_path)?;

    if options.verbose {
        println!("Masked SQL written to: {}", options.output_path.display());
        println!("Mapping written to: {}", mapping_path.display());
        println!("Mapping contains {} entries", mapping.len());
    }

    Ok(EncodeReport {
        mapping_path,
        mapping_entries: mapping.len(),
        lex_warnings: warnings.len(),
    })
}

/// Restore a masked SQL file using its mapping JSON
pub fn decode_sql_file(options: DecodeOptions) -> Result<()> {
    if options.verbose {
        println!("Restoring: {}", options.input_path.display());
    }

    let masked = read_sql_file(&options.input_path)?;
    let mapping = MappingTable::load_from_file(&options.mapping_path)?;

    let masker = Masker::new(options.lexer_config);
    let (restored, warnings) = if options.comments_only {
        masker.decode_comments_only(&masked, &mapping)
    } else {
        masker.decode(&masked, &mapping)
    };

    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    std::fs::write(&options.output_path, &restored).map_err(|source| {
        SqlMaskError::OutputWrite {
            path: options.output_path.clone(),
            source,
        }
    })?;

    if options.verbose {
        println!("Restored SQL written to: {}", options.output_path.display());
    }

    Ok(())
}

/// Read a SQL file, trying UTF-8 first and Windows-1252 as fallback, with
/// BOM stripping. SQL files created on Windows are commonly 1252-encoded.
fn read_sql_file(path: &Path) -> Result<String, SqlMaskError> {
    let bytes = std::fs::read(path).map_err(|source| SqlMaskError::SqlFileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(err.as_bytes());
            if had_errors {
                return Err(SqlMaskError::SqlFileRead {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "File contains invalid characters",
                    ),
                });
            }
            decoded.into_owned()
        }
    };

    Ok(match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}
