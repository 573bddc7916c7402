//! reaper-filter CLI
//!
//! CLI tool for checking filter queries and filtering captured traffic.

mod records;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rf_core::HttpRequest;
use rf_query::{Criteria, Scope};

use crate::records::for_each_record;

/// Exit code when `--strict` rejects a query that fell back to raw text.
const EXIT_FALLBACK: u8 = 2;

#[derive(Parser)]
#[command(name = "rf")]
#[command(about = "reaper-filter query checker and traffic filter")]
struct Cli {
    /// Log filter (EnvFilter syntax), e.g. `debug` or `rf_query=trace`
    #[arg(long, global = true, env = "RF_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and print its canonical form
    Parse {
        query: String,

        /// Print the rule tree as JSON
        #[arg(long)]
        json: bool,

        /// Fail when the query does not parse
        #[arg(long)]
        strict: bool,
    },

    /// Print captured requests (JSON lines) matching a query
    Filter {
        query: String,

        /// Input file of JSON lines; stdin when omitted
        #[arg(short, long, env = "RF_INPUT")]
        input: Option<String>,

        /// Print only the number of matching records
        #[arg(short, long)]
        count: bool,

        /// Fail when the query does not parse
        #[arg(long)]
        strict: bool,
    },

    /// Print captured requests (JSON lines) inside an include/exclude scope
    Scope {
        /// Query that includes records; repeatable
        #[arg(long)]
        include: Vec<String>,

        /// Query that excludes records; repeatable
        #[arg(long)]
        exclude: Vec<String>,

        /// Input file of JSON lines; stdin when omitted
        #[arg(short, long, env = "RF_INPUT")]
        input: Option<String>,

        /// Print only the number of records in scope
        #[arg(short, long)]
        count: bool,
    },

    /// Check a single URL against a query
    CheckUrl {
        query: String,
        url: String,

        #[arg(short, long, default_value = "GET")]
        method: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Parse { query, json, strict } => cmd_parse(&query, json, strict),
        Commands::Filter {
            query,
            input,
            count,
            strict,
        } => cmd_filter(&query, input.as_deref(), count, strict),
        Commands::Scope {
            include,
            exclude,
            input,
            count,
        } => cmd_scope(include, exclude, input.as_deref(), count),
        Commands::CheckUrl { query, url, method } => cmd_check_url(&query, &url, &method),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if let Err(e) = subscriber.try_init() {
        eprintln!("Failed to init tracing subscriber: {e}");
    }
}

/// Report a fallback parse. Returns the exit code to use if `strict`.
fn report_parse_error(criteria: &Criteria, strict: bool) -> Option<ExitCode> {
    let err = criteria.parse_error()?;
    eprintln!("Parse error: {err}");
    if strict {
        return Some(ExitCode::from(EXIT_FALLBACK));
    }
    eprintln!("  Matching '{}' as raw body text", criteria.raw());
    None
}

fn cmd_parse(query: &str, json: bool, strict: bool) -> anyhow::Result<ExitCode> {
    let criteria = Criteria::new(query);
    if let Some(code) = report_parse_error(&criteria, strict) {
        return Ok(code);
    }

    if json {
        let tree = serde_json::to_string_pretty(criteria.root()).context("Failed to encode rule tree")?;
        println!("{tree}");
    } else {
        println!("{criteria}");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_filter(query: &str, input: Option<&str>, count: bool, strict: bool) -> anyhow::Result<ExitCode> {
    let criteria = Criteria::new(query);
    if let Some(code) = report_parse_error(&criteria, strict) {
        return Ok(code);
    }
    tracing::debug!(query = %criteria, "filtering records");
    emit_matching(input, count, |record| criteria.matches(record))
}

fn cmd_scope(
    include: Vec<String>,
    exclude: Vec<String>,
    input: Option<&str>,
    count: bool,
) -> anyhow::Result<ExitCode> {
    let scope = Scope::new(include, exclude);
    for (raw, err) in scope.parse_errors() {
        eprintln!("Parse error in '{raw}': {err}");
    }
    tracing::debug!(
        include = scope.include.len(),
        exclude = scope.exclude.len(),
        "filtering records by scope"
    );
    emit_matching(input, count, |record| scope.includes(record))
}

fn emit_matching<F>(input: Option<&str>, count: bool, mut keep: F) -> anyhow::Result<ExitCode>
where
    F: FnMut(&HttpRequest) -> bool,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut matched = 0usize;
    let mut total = 0usize;

    for_each_record(input, |line, record| {
        total += 1;
        if keep(record) {
            matched += 1;
            if !count {
                writeln!(out, "{line}").context("Failed to write output")?;
            }
        }
        Ok(())
    })?;

    if count {
        writeln!(out, "{matched}").context("Failed to write output")?;
    }
    tracing::info!(matched, total, "filter complete");
    Ok(ExitCode::SUCCESS)
}

fn cmd_check_url(query: &str, url: &str, method: &str) -> anyhow::Result<ExitCode> {
    let criteria = Criteria::new(query);
    report_parse_error(&criteria, false);
    let record = HttpRequest::from_url(method, url);
    if criteria.matches(&record) {
        println!("match");
    } else {
        println!("no match");
    }
    Ok(ExitCode::SUCCESS)
}
