//! Tabular CLI - move data between SQLite tables, CSV files and JSON files

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabular_etl::config::{load_config, write_config, TabularConfig};
use tabular_etl::record::{value_text, Record};
use tabular_etl::ui::{self, Icons};
use tabular_etl::{csv_to_sql, json_to_sql, sql_to_csv, sql_to_json, JsonMode, TableSchema};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "tabular")]
#[command(version)]
#[command(about = "Move tabular data between SQLite tables, CSV and JSON")]
#[command(long_about = r#"
Tabular exports query results as CSV or JSON and loads CSV or keyed JSON
files into fresh SQLite tables, inferring column types from the first row.

Example usage:
  tabular export-csv --query "SELECT * FROM people" --output people.csv
  tabular export-json --query "SELECT * FROM people" --mode keyed --primary-key id
  tabular import-csv --input people.csv --table people
  tabular infer --input people.csv
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a query result as CSV
    ExportCsv {
        /// SQL query to run
        #[arg(short, long)]
        query: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a query result as JSON
    ExportJson {
        /// SQL query to run
        #[arg(short, long)]
        query: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// JSON shape: flat (list of records) or keyed (map by primary key)
        #[arg(short, long)]
        mode: Option<String>,

        /// Column whose value keys each record (keyed mode only)
        #[arg(short, long)]
        primary_key: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a CSV file into a new table
    ImportCsv {
        /// CSV file with a header line
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Destination table (dropped and recreated)
        #[arg(short, long)]
        table: String,
    },

    /// Load a keyed JSON file (object of objects) into a new table
    ImportJson {
        /// JSON file to load
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Destination table (dropped and recreated)
        #[arg(short, long)]
        table: String,
    },

    /// Show the schema a CSV file would be imported with
    Infer {
        /// CSV file with a header line
        #[arg(short, long)]
        input: PathBuf,

        /// Table name used in the printed statements
        #[arg(short, long, default_value = "imported")]
        table: String,

        /// Print the inferred schema as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Write a config file with the given defaults
    Init {
        /// Default database path
        #[arg(short, long)]
        database: Option<String>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(tabular_etl::config::default_config_path);
    let config = load_config(Some(&config_path))?.unwrap_or_default();

    match cli.command {
        Commands::ExportCsv { query, database, output } => {
            let database = database.unwrap_or_else(|| config.database_path());
            tracing::info!("Exporting CSV from {}", database.display());
            let csv = sql_to_csv(&query, &database)?;
            emit(&csv, output.as_deref())?;
        }

        Commands::ExportJson { query, database, mode, primary_key, output } => {
            let database = database.unwrap_or_else(|| config.database_path());
            let mode = match mode {
                Some(m) => m.parse::<JsonMode>()?,
                None => config.json_mode.unwrap_or_default(),
            };
            let primary_key = primary_key.or_else(|| match mode {
                JsonMode::Keyed => config.primary_key.clone(),
                JsonMode::Flat => None,
            });

            tracing::info!("Exporting {} JSON from {}", mode, database.display());
            let json = sql_to_json(&query, &database, mode, primary_key.as_deref())?;
            emit(&json, output.as_deref())?;
        }

        Commands::ImportCsv { input, database, table } => {
            let database = database.unwrap_or_else(|| config.database_path());
            ui::header(&format!("Importing {} into {}", input.display(), table));
            ui::info(&format!("{} Database", Icons::DATABASE), &database.display().to_string());
            csv_to_sql(&input, &database, &table)?;
            ui::success(&format!("Table {} replaced", table));
        }

        Commands::ImportJson { input, database, table } => {
            let database = database.unwrap_or_else(|| config.database_path());
            ui::header(&format!("Importing {} into {}", input.display(), table));
            ui::info(&format!("{} Database", Icons::DATABASE), &database.display().to_string());
            json_to_sql(&input, &database, &table)?;
            ui::success(&format!("Table {} replaced", table));
        }

        Commands::Infer { input, table, json } => {
            let mut reader = csv::Reader::from_reader(BufReader::new(File::open(&input)?));
            let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

            let Some(first) = reader.records().next() else {
                ui::warn(&format!("{} has no data rows; nothing to infer", input.display()));
                return Ok(());
            };
            let first = first?;
            let sample = Record::from_text(1, headers, first.iter())?;
            let schema = TableSchema::infer(&table, &sample);
            if json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
                return Ok(());
            }

            let samples: Vec<String> = sample.values().map(value_text).collect();

            ui::section(&format!(" {} {} ", Icons::FILE, input.display()));
            println!("{}", ui::schema_table(&schema, &samples));
            ui::summary_row("create:", &schema.create_statement());
            ui::summary_row("insert:", &schema.insert_statement());
        }

        Commands::Init { database, force } => {
            let new_config = TabularConfig {
                database: database.or(config.database),
                ..TabularConfig::default()
            };
            write_config(&config_path, &new_config, force)?;
            ui::success(&format!("{} Wrote {}", Icons::GEAR, config_path.display()));
        }
    }

    Ok(())
}

fn emit(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}
