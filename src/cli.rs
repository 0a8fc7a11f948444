use crate::catalog::Catalog;
use crate::comment_parser::CommentParser;
use crate::comments::extract_comment_blocks;
use crate::model::Document;
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file, Info, OpenApiDocument};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// OpenAPI from comments - Generate OpenAPI documentation from `@openapi` source comments
#[derive(Parser, Debug)]
#[command(name = "openapi-from-comments")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// API title written to the info object
    #[arg(long = "title", default_value = "Generated API")]
    pub title: String,

    /// API version written to the info object
    #[arg(long = "api-version", default_value = "1.0.0")]
    pub api_version: String,

    /// API description written to the info object
    #[arg(long = "description")]
    pub description: Option<String>,

    /// Skip comment blocks that fail to parse instead of aborting
    #[arg(long = "skip-invalid")]
    pub skip_invalid: bool,

    /// Directory names to leave out of the scan (repeatable)
    #[arg(short = 'e', long = "exclude", value_name = "DIR")]
    pub exclude: Vec<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl CliArgs {
    pub fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            version: self.api_version.clone(),
            description: self.description.clone(),
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub files_scanned: usize,
    pub files_parsed: usize,
    pub types_cataloged: usize,
    pub blocks_parsed: usize,
    pub blocks_skipped: usize,
    pub operations: usize,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Scans the project and parses every comment block into one document.
///
/// The type catalog is built from all parsed files before any block is read, so a
/// block may reference types declared anywhere in the project.
///
/// # Errors
///
/// Fails if the project cannot be scanned, or on the first invalid block unless
/// `skip_invalid` is set.
pub fn generate(args: &CliArgs) -> Result<(Document, Summary)> {
    let mut summary = Summary::default();

    info!("Scanning project directory...");
    let scanner = args
        .exclude
        .iter()
        .fold(FileScanner::new(args.project_path.clone()), |s, dir| {
            s.exclude(dir.as_str())
        });
    let scan_result = scanner.scan()?;
    summary.files_scanned = scan_result.source_files.len();
    info!("Found {} Rust files", summary.files_scanned);

    info!("Parsing Rust files...");
    let parsed_files: Vec<ParsedFile> =
        AstParser::parse_files(scanner.root(), &scan_result.source_files)
            .into_iter()
            .filter_map(Result::ok)
            .collect();
    summary.files_parsed = parsed_files.len();
    info!("Successfully parsed {} files", summary.files_parsed);

    let catalog = Catalog::from_parsed_files(&parsed_files);
    summary.types_cataloged = catalog.len();
    info!("Cataloged {} types", summary.types_cataloged);

    let parser = CommentParser::new(catalog);
    let mut document = Document::new();

    info!("Parsing comment blocks...");
    for file in &parsed_files {
        for block in extract_comment_blocks(&file.source) {
            match parser.parse_comment(&mut document, &block.text) {
                Ok(0) => {}
                Ok(written) => {
                    debug!(
                        "{}:{}: {} operation(s)",
                        file.path.display(),
                        block.start_line,
                        written
                    );
                    summary.blocks_parsed += 1;
                }
                Err(e) if args.skip_invalid => {
                    warn!(
                        "Skipping invalid block at {}:{}: {}",
                        file.path.display(),
                        block.start_line,
                        e
                    );
                    summary.blocks_skipped += 1;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!(
                            "Invalid @openapi block at {}:{}",
                            file.path.display(),
                            block.start_line
                        )
                    });
                }
            }
        }
    }

    summary.operations = document.operation_count();
    if summary.operations == 0 {
        warn!("No @openapi operations found in the project");
    }

    Ok((document, summary))
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document generation...");

    let (document, summary) = generate(&args)?;

    let api_info = args.info();
    let envelope = OpenApiDocument::new(&api_info, &document);

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&envelope)?,
        OutputFormat::Json => serialize_json(&envelope)?,
    };

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", summary.files_scanned);
    info!("  - Files parsed: {}", summary.files_parsed);
    info!("  - Types cataloged: {}", summary.types_cataloged);
    info!("  - Blocks parsed: {}", summary.blocks_parsed);
    if summary.blocks_skipped > 0 {
        info!("  - Blocks skipped: {}", summary.blocks_skipped);
    }
    info!("  - Operations: {}", summary.operations);

    Ok(())
}
