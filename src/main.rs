//! rowpipe - read messy tables as typed, labeled rows

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rowpipe::config::{Config, HeaderMode, OutputFormat, DEFAULT_WINDOW};
use rowpipe::guess::prepare;
use rowpipe::output::render_to_stdout;
use rowpipe::{parser, Error, TableSet};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Read CSV and spreadsheet tables as typed, labeled rows
#[derive(Parser, Debug)]
#[command(name = "rowpipe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to read
    file: PathBuf,

    /// Only read this table (sheet name, or file stem for CSV)
    #[arg(short, long)]
    table: Option<String>,

    /// List table names and exit
    #[arg(long)]
    list_tables: bool,

    /// Rows to skip before header detection
    #[arg(long)]
    offset: Option<usize>,

    /// Do not look for a header row
    #[arg(long, conflicts_with = "header_names")]
    no_headers: bool,

    /// Use these column names instead of a header row (comma-separated)
    #[arg(long, value_delimiter = ',')]
    header_names: Vec<String>,

    /// Infer column types from a sample of rows
    #[arg(long)]
    guess_types: bool,

    /// Only accept a type that fits every sampled value
    #[arg(long, requires = "guess_types")]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Maximum rows printed per table
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Field delimiter for delimited text (sniffed by default)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Rows sampled for header and type guessing
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let headers = if self.no_headers {
            HeaderMode::None
        } else if !self.header_names.is_empty() {
            HeaderMode::Explicit(self.header_names.clone())
        } else {
            HeaderMode::Guess
        };

        let mut config = Config::default()
            .with_headers(headers)
            .with_window(self.window)
            .with_guess_types(self.guess_types)
            .with_strict_types(self.strict)
            .with_output_format(self.format.into());

        if let Some(delimiter) = self.delimiter {
            let byte = u8::try_from(delimiter)
                .ok()
                .filter(u8::is_ascii)
                .with_context(|| {
                    format!("Delimiter must be a single ASCII character: {:?}", delimiter)
                })?;
            config = config.with_delimiter(byte);
        }
        if let Some(offset) = self.offset {
            config = config.with_row_offset(offset);
        }
        if let Some(limit) = self.limit {
            config = config.with_limit(limit);
        }
        if let Some(ref table) = self.table {
            config = config.with_table_name(table.clone());
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config()?;

    let mut tables = parser::open(&cli.file, &config)
        .with_context(|| format!("Failed to open {}", cli.file.display()))?;

    if cli.list_tables {
        for name in tables.table_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    if let Some(ref name) = config.table_name {
        if tables.table(name).is_none() {
            return Err(Error::TableNotFound(name.clone()).into());
        }
    }

    for row_set in tables.tables_mut() {
        if config.table_name.as_deref().is_some_and(|name| name != row_set.name()) {
            continue;
        }
        prepare(row_set, &config).with_context(|| format!("Failed to prepare {}", row_set))?;
    }

    let selected = tables
        .tables()
        .iter()
        .filter(|t| config.table_name.as_deref().map_or(true, |name| name == t.name()));
    render_to_stdout(selected, config.limit, config.output_format)
}
