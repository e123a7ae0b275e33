//! `catalyst-migrate <input.json> <table_name>`
//!
//! Posts a JSON array of rows to a running server in chunks of 200, using
//! `CATALYST_API_URL` and `CATALYST_SERVICE_KEY` (read after loading `.env`).

use catalyst_server::import::{parse_rows, run_import, HttpChunkSink, DEFAULT_CHUNK_SIZE};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage: catalyst-migrate <input.json> <table_name>");
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().collect();
    let (Some(input_path), Some(table)) = (args.get(1), args.get(2)) else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let (Some(api_url), Some(service_key)) =
        (env_var("CATALYST_API_URL"), env_var("CATALYST_SERVICE_KEY"))
    else {
        tracing::error!("Missing CATALYST_API_URL or CATALYST_SERVICE_KEY in env");
        return ExitCode::FAILURE;
    };

    let raw = match std::fs::read_to_string(input_path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(path = %input_path, error = %e, "Failed to read input file");
            return ExitCode::FAILURE;
        }
    };
    let rows = match parse_rows(&raw) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load rows");
            return ExitCode::FAILURE;
        }
    };

    let sink = HttpChunkSink::new(&api_url, &service_key);
    match run_import(&sink, table, &rows, DEFAULT_CHUNK_SIZE).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Import aborted");
            ExitCode::FAILURE
        }
    }
}
