use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Reads Rust source files and parses them with `syn`.
///
/// The syntax tree feeds the type catalog, the raw text feeds comment discovery
/// (regular `//` comments are not part of the syntax tree).
pub struct AstParser;

/// A successfully parsed source file.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Module path relative to the project root (`models::user`), empty for the crate root
    pub module_path: String,
    /// Raw file content
    pub source: String,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses a single file located under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid Rust syntax.
    pub fn parse_file(root: &Path, path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let syntax_tree = syn::parse_file(&source)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            module_path: module_path(root, path),
            source,
            syntax_tree,
        })
    }

    /// Parses every file, logging failures and continuing with the rest.
    pub fn parse_files(root: &Path, paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(root, path).inspect_err(|e| {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

/// Derives the module path of `path` relative to `root`.
///
/// A leading `src` directory is dropped, as are `lib.rs`, `main.rs` and `mod.rs` file
/// names; any other file contributes its stem.
pub fn module_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.first().map(String::as_str) == Some("src") {
        segments.remove(0);
    }

    if let Some(file_name) = segments.pop() {
        if !matches!(file_name.as_str(), "lib.rs" | "main.rs" | "mod.rs") {
            let stem = file_name.strip_suffix(".rs").unwrap_or(&file_name);
            segments.push(stem.to_string());
        }
    }

    segments.join(crate::catalog::NAMESPACE_SEPARATOR)
}
