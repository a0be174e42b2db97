use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sqlmask::csv_batch::{self, CsvOptions};
use sqlmask::lexer::LexerConfig;
use sqlmask::masker::Masker;
use sqlmask::{decode_sql_file, encode_sql_file, DecodeOptions, MaskOptions};

#[derive(Parser)]
#[command(name = "sqlmask")]
#[command(author, version, about = "Obfuscate SQL identifiers with lossless restore")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mask identifiers in a SQL file
    Encode {
        /// Input .sql file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the masked SQL
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the mapping JSON (defaults to <output>.map.json)
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Resume an existing mapping to keep placeholders consistent
        #[arg(long)]
        resume_mapping: Option<PathBuf>,

        /// Mask only comment text, leaving SQL code untouched
        #[arg(long)]
        comments_only: bool,

        #[command(flatten)]
        dialect: DialectArgs,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore a masked SQL file using its mapping
    Decode {
        /// Masked .sql file
        #[arg(short, long)]
        input: PathBuf,

        /// Mapping JSON written during masking
        #[arg(short, long)]
        mapping: PathBuf,

        /// Output file for the restored SQL
        #[arg(short, long)]
        output: PathBuf,

        /// Restore comment text masked by --comments-only
        #[arg(long)]
        comments_only: bool,

        #[command(flatten)]
        dialect: DialectArgs,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Mask or unmask SQL queries inside a CSV file
    #[command(subcommand)]
    Csv(CsvCommands),
}

#[derive(Subcommand)]
enum CsvCommands {
    /// Mask the SQL column of every row
    Mask {
        #[command(flatten)]
        common: CsvArgs,

        /// Name of the column containing SQL queries
        #[arg(long)]
        sql_column: String,

        /// Name of the column to write masked SQL to
        #[arg(long, default_value = "masked_query")]
        masked_column: String,
    },

    /// Mask only comments in the SQL column of every row
    MaskComments {
        #[command(flatten)]
        common: CsvArgs,

        /// Name of the column containing SQL queries
        #[arg(long)]
        sql_column: String,

        /// Name of the column to write masked SQL to
        #[arg(long, default_value = "masked_query")]
        masked_column: String,
    },

    /// Restore the masked column of every row
    Unmask {
        #[command(flatten)]
        common: CsvArgs,

        /// Name of the column containing masked SQL queries
        #[arg(long)]
        masked_column: String,

        /// Name of the column to write restored SQL to
        #[arg(long, default_value = "unmasked_query")]
        unmasked_column: String,

        /// The masked column was produced by mask-comments
        #[arg(long)]
        comments_only: bool,
    },

    /// Restore every cell of every column via whole-cell lookup
    UnmaskAll {
        #[command(flatten)]
        common: CsvArgs,
    },
}

#[derive(Args)]
struct CsvArgs {
    /// Input CSV file
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long)]
    output: PathBuf,

    /// Mapping JSON file
    #[arg(short, long)]
    mapping: PathBuf,

    /// CSV delimiter character
    #[arg(long, default_value = ",")]
    delimiter: String,

    /// CSV quote character
    #[arg(long, default_value = "\"")]
    quote: String,

    #[command(flatten)]
    dialect: DialectArgs,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args, Clone, Copy)]
struct DialectArgs {
    /// Treat backtick-quoted names as identifiers (MySQL)
    #[arg(long)]
    backtick_identifiers: bool,

    /// Treat bracket-quoted names as identifiers (SQL Server)
    #[arg(long)]
    bracket_identifiers: bool,
}

impl DialectArgs {
    fn lexer_config(&self) -> LexerConfig {
        LexerConfig {
            backtick_identifiers: self.backtick_identifiers,
            bracket_identifiers: self.bracket_identifiers,
        }
    }
}

impl CsvArgs {
    fn to_options(&self) -> Result<CsvOptions> {
        Ok(CsvOptions {
            input_path: self.input.clone(),
            output_path: self.output.clone(),
            mapping_path: self.mapping.clone(),
            delimiter: single_byte(&self.delimiter, "delimiter")?,
            quote: single_byte(&self.quote, "quote")?,
            verbose: self.verbose,
        })
    }
}

fn single_byte(value: &str, name: &str) -> Result<u8> {
    match value.as_bytes() {
        [b] => Ok(*b),
        _ => bail!("{} must be a single ASCII character, got '{}'", name, value),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            mapping,
            resume_mapping,
            comments_only,
            dialect,
            verbose,
        } => {
            encode_sql_file(MaskOptions {
                input_path: input,
                output_path: output,
                mapping_path: mapping,
                resume_mapping,
                comments_only,
                lexer_config: dialect.lexer_config(),
                verbose,
            })?;
        }

        Commands::Decode {
            input,
            mapping,
            output,
            comments_only,
            dialect,
            verbose,
        } => {
            decode_sql_file(DecodeOptions {
                input_path: input,
                mapping_path: mapping,
                output_path: output,
                comments_only,
                lexer_config: dialect.lexer_config(),
                verbose,
            })?;
        }

        Commands::Csv(csv_command) => match csv_command {
            CsvCommands::Mask {
                common,
                sql_column,
                masked_column,
            } => {
                let masker = Masker::new(common.dialect.lexer_config());
                csv_batch::mask_csv(
                    &masker,
                    &common.to_options()?,
                    &sql_column,
                    &masked_column,
                    false,
                )?;
            }
            CsvCommands::MaskComments {
                common,
                sql_column,
                masked_column,
            } => {
                let masker = Masker::new(common.dialect.lexer_config());
                csv_batch::mask_csv(
                    &masker,
                    &common.to_options()?,
                    &sql_column,
                    &masked_column,
                    true,
                )?;
            }
            CsvCommands::Unmask {
                common,
                masked_column,
                unmasked_column,
                comments_only,
            } => {
                let masker = Masker::new(common.dialect.lexer_config());
                csv_batch::unmask_csv(
                    &masker,
                    &common.to_options()?,
                    &masked_column,
                    &unmasked_column,
                    comments_only,
                )?;
            }
            CsvCommands::UnmaskAll { common } => {
                csv_batch::unmask_all_columns(&common.to_options()?)?;
            }
        },
    }

    Ok(())
}
