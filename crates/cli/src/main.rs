use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "tabula",
    version,
    about = "Preview German bank exports as normalized transactions and spot recurring payments."
)]
pub struct Cli {
    /// TOML file with recurring tunables, account mapping and category rules
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the supported bank formats.
    Formats,
    /// Import a delimited bank export (CSV).
    Csv {
        /// Path to the export
        file: PathBuf,
        /// Pin a bank format instead of detecting it (see `tabula formats`)
        #[arg(long)]
        format: Option<String>,
        /// Field delimiter (default: sniffed from the first line)
        #[arg(long)]
        delimiter: Option<char>,
        /// Character encoding label, e.g. utf-8 or iso-8859-1
        #[arg(long)]
        encoding: Option<String>,
        /// Map an IBAN to an account id: IBAN=ID (repeatable)
        #[arg(long = "account", value_parser = commands::parse_account_mapping)]
        accounts: Vec<(String, String)>,
    },
    /// Import the first sheet of a workbook (XLSX, XLS, ODS).
    Xlsx {
        /// Path to the workbook
        file: PathBuf,
        /// Map an IBAN to an account id: IBAN=ID (repeatable)
        #[arg(long = "account", value_parser = commands::parse_account_mapping)]
        accounts: Vec<(String, String)>,
    },
    /// Detect recurring payments in a JSON array of {payee, amount, date}.
    Recurring {
        /// JSON file, or `-` for stdin
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    // stdout carries JSON results; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Formats => commands::formats(),
        Commands::Csv {
            file,
            format,
            delimiter,
            encoding,
            accounts,
        } => commands::csv(&config, &file, format, delimiter, encoding, accounts),
        Commands::Xlsx { file, accounts } => commands::xlsx(&config, &file, accounts),
        Commands::Recurring { file } => commands::recurring(&config, &file),
    });

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e.message);
            println!("{}", e.to_json());
            ExitCode::FAILURE
        }
    }
}
