use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names that never contain project sources.
const DEFAULT_EXCLUDES: &[&str] = &["target"];

/// Collects the `.rs` files of a project whose comments will be searched for directives.
///
/// Hidden directories and `target` are skipped, as is any directory named through
/// [`FileScanner::exclude`].
///
/// # Example
///
/// ```no_run
/// use openapi_from_comments::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project")).exclude("vendor");
/// let result = scanner.scan().unwrap();
/// println!("Found {} source files", result.source_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    excludes: Vec<String>,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Source files, sorted by path
    pub source_files: Vec<PathBuf>,
    /// Entries that could not be read
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Skips every directory with the given name.
    pub fn exclude(mut self, dir_name: impl Into<String>) -> Self {
        self.excludes.push(dir_name.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Walks the tree below the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the root itself is not a readable directory; unreadable
    /// entries below it are reported as warnings.
    pub fn scan(&self) -> Result<ScanResult> {
        std::fs::read_dir(&self.root_path)
            .with_context(|| format!("Cannot read directory: {}", self.root_path.display()))?;

        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_skipped(e));

        for entry in walker {
            match entry {
                Ok(entry) if is_rust_file(&entry) => source_files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        source_files.sort();
        debug!(
            "Scanned {}: {} source files",
            self.root_path.display(),
            source_files.len()
        );

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.')
            || (entry.file_type().is_dir() && self.excludes.iter().any(|x| *x == name))
    }
}

fn is_rust_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.path().extension().and_then(|s| s.to_str()) == Some("rs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(result: &ScanResult, root: &Path) -> Vec<String> {
        result
            .source_files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_scan_collects_sorted_rust_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/models")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("src/models/user.rs"), "struct User {}").unwrap();
        fs::write(root.join("src/api.rs"), "").unwrap();
        fs::write(root.join("README.md"), "# README").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert!(result.warnings.is_empty());
        assert_eq!(
            names(&result, root),
            vec!["src/api.rs", "src/main.rs", "src/models/user.rs"]
        );
    }

    #[test]
    fn test_scan_skips_target_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("target")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join("target/build.rs"), "fn main() {}").unwrap();
        fs::write(root.join(".git/hook.rs"), "// hook").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(names(&result, root), vec!["main.rs"]);
    }

    #[test]
    fn test_scan_custom_exclude() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("vendor")).unwrap();
        fs::write(root.join("vendor/dep.rs"), "").unwrap();
        fs::write(root.join("lib.rs"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf())
            .exclude("vendor")
            .scan()
            .unwrap();

        assert_eq!(names(&result, root), vec!["lib.rs"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert!(result.source_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let result = FileScanner::new(PathBuf::from("/nonexistent/project")).scan();
        assert!(result.is_err());
    }
}
