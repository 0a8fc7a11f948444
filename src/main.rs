//! OpenAPI from comments - Command-line tool for generating OpenAPI documentation.
//!
//! Scans a Rust project for `@openapi` comment blocks, resolves the request and
//! response types they reference against the structs declared in the project, and
//! writes an OpenAPI 3.0 document.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-comments [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-from-comments ./my-api-project -o openapi.yaml
//! ```
//!
//! Generate JSON documentation with a custom title, skipping broken blocks:
//! ```bash
//! openapi-from-comments ./my-api-project -f json --title "Pet Store" --skip-invalid
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_comments::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag before the logger exists
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI from comments starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
