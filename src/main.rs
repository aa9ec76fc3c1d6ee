use std::io::Read;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use sqlhttp::Connection;

const HOST_ENV: &str = "SQLHTTP_HOST";
const DEFAULT_PORT: u16 = 8080;

/// sqlhttp — query a remote SQL-over-HTTP endpoint
#[derive(Debug, Parser)]
#[command(
    name = "sqlhttp",
    about = "Execute SQL queries against a remote SQL-over-HTTP endpoint",
    version
)]
struct Args {
    /// SQL query to execute
    #[arg(conflicts_with_all = ["stdin", "file"])]
    query: Option<String>,

    /// Endpoint base URL (defaults to the SQLHTTP_HOST host)
    #[arg(long)]
    url: Option<String>,

    /// Read the query from stdin
    #[arg(long, conflicts_with = "file")]
    stdin: bool,

    /// Read the query from a SQL file
    #[arg(short = 'f', long)]
    file: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("sqlhttp: error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let base_url = resolve_base_url(
        args.url.as_deref(),
        std::env::var(HOST_ENV).ok().as_deref(),
    );
    let query = query_text(&args)?;
    debug!(url = %base_url, "connecting");

    let conn = Connection::connect(&base_url)
        .with_context(|| format!("could not connect to {base_url}"))?;
    let mut cursor = conn.cursor()?;
    cursor.execute(&query)?;

    // A result with no columns means a write-style or empty response;
    // there is no table to print.
    if cursor.description().map_or(true, |d| d.is_empty()) {
        println!("Query executed successfully.");
    } else {
        print!("{}", cursor.display_table()?);
    }

    cursor.close();
    conn.close();
    Ok(())
}

/// Resolve the endpoint base URL from the `--url` flag or the host
/// environment variable, applying the default scheme and port when missing.
fn resolve_base_url(url: Option<&str>, env_host: Option<&str>) -> String {
    if let Some(url) = url {
        return url.to_string();
    }

    let mut host = env_host.unwrap_or("localhost").to_string();
    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("http://{host}");
    }
    let authority = host.splitn(2, "//").nth(1).unwrap_or("");
    if !authority.contains(':') {
        host = format!("{host}:{DEFAULT_PORT}");
    }
    host
}

/// Read the query text from the selected source. Empty queries are an
/// error regardless of source.
fn query_text(args: &Args) -> Result<String> {
    let text = if let Some(query) = &args.query {
        query.clone()
    } else if args.stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("could not read query from stdin")?;
        buf
    } else if let Some(path) = &args.file {
        std::fs::read_to_string(path).with_context(|| format!("cannot read file: {path}"))?
    } else {
        anyhow::bail!("provide a query argument, --stdin, or --file");
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        anyhow::bail!("query cannot be empty");
    }
    Ok(text)
}
