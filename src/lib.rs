//! OpenAPI from comments - OpenAPI 3.0 documents from annotated source comments.
//!
//! Handlers are documented with line directives inside ordinary comments:
//!
//! ```text
//! // @openapi GET /users/{id}
//! // @openapiParam id in=path, type=int
//! // @openapiTags users
//! // @openapiSummary Fetch a user
//! // @openapiResponse 200 application/json models::User
//! // @openapiResponse 404 application/json {"error": "not found"}
//! ```
//!
//! Response and request payloads are either JSON literals (kept as examples), inline
//! `{name: type}` field lists, or names of structs declared in the project, which are
//! converted to schemas.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans project directories for Rust files
//! 2. [`parser`] - Parses Rust source files into syntax trees
//! 3. [`catalog`] - Collects struct, alias and enum declarations as type descriptors
//! 4. [`comments`] - Recovers comment blocks from the raw source
//! 5. [`directive`] - Classifies comment lines by directive prefix
//! 6. [`comment_parser`] - Turns a comment block into operations on a [`model::Document`]
//! 7. [`params`], [`schema`], [`validate`] - Directive payloads, schema resolution and checks
//! 8. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_comments::{
//!     catalog::Catalog,
//!     comment_parser::CommentParser,
//!     comments::extract_comment_blocks,
//!     model::Document,
//!     parser::AstParser,
//!     scanner::FileScanner,
//!     serializer::{serialize_yaml, Info, OpenApiDocument},
//! };
//! use std::path::PathBuf;
//!
//! let scanner = FileScanner::new(PathBuf::from("./my-project"));
//! let scan_result = scanner.scan().unwrap();
//!
//! let parsed_files: Vec<_> = AstParser::parse_files(scanner.root(), &scan_result.source_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let parser = CommentParser::new(Catalog::from_parsed_files(&parsed_files));
//! let mut document = Document::new();
//! for file in &parsed_files {
//!     for block in extract_comment_blocks(&file.source) {
//!         parser.parse_comment(&mut document, &block.text).unwrap();
//!     }
//! }
//!
//! let info = Info::default();
//! let yaml = serialize_yaml(&OpenApiDocument::new(&info, &document)).unwrap();
//! println!("{}", yaml);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod catalog;
pub mod cli;
pub mod comment_parser;
pub mod comments;
pub mod directive;
pub mod error;
pub mod model;
pub mod params;
pub mod parser;
pub mod scanner;
pub mod schema;
pub mod serializer;
pub mod validate;
