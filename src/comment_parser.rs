use crate::catalog::Catalog;
use crate::directive::Directive;
use crate::error::{ParseError, Result};
use crate::model::{Body, Content, Document, HttpMethod, Operation, Schema};
use crate::params;
use crate::schema::{SchemaResolver, OCTET_STREAM};
use crate::validate;
use log::debug;

/// Parses `@openapi` comment blocks into operations and merges them into a [`Document`].
///
/// # Example
///
/// ```
/// use openapi_from_comments::catalog::Catalog;
/// use openapi_from_comments::comment_parser::CommentParser;
/// use openapi_from_comments::model::{Document, HttpMethod};
///
/// let parser = CommentParser::new(Catalog::default());
/// let mut doc = Document::new();
/// let comment = "@openapi GET /health\n@openapiResponse 200 application/json {\"ok\": true}";
///
/// assert_eq!(parser.parse_comment(&mut doc, comment).unwrap(), 1);
/// assert!(doc.operation("/health", HttpMethod::Get).is_some());
/// ```
pub struct CommentParser {
    catalog: Catalog,
}

/// Operation being built from one comment block, with every (method, path) it applies to.
#[derive(Debug, Default)]
struct Accumulator {
    operation: Operation,
    declarations: Vec<(HttpMethod, String)>,
}

impl CommentParser {
    pub fn new(catalog: Catalog) -> Self {
        debug!("Initializing CommentParser with {} types", catalog.len());
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Parses one comment block and merges the resulting operation into `doc`.
    ///
    /// Returns the number of (path, method) entries written. Every directive is parsed
    /// first; a block that then has no `@openapi` path declaration yields `Ok(0)`.
    ///
    /// # Errors
    ///
    /// Any failing directive aborts the block with the offending line attached, even
    /// in a block without a path declaration. A block that declares a path but no
    /// response fails with
    /// [`ParseError::MissingResponse`]. `doc` is only modified on success.
    pub fn parse_comment(&self, doc: &mut Document, comment: &str) -> Result<usize> {
        let directives = comment
            .lines()
            .filter_map(|line| Directive::classify(line).map(|d| (line.trim(), d)));

        let mut acc = Accumulator::default();
        for (line, directive) in directives {
            debug!("Found {} directive", directive.name());
            self.apply(&mut acc, directive)
                .map_err(|e| e.at_line(line))?;
        }

        let Accumulator {
            operation,
            declarations,
        } = acc;

        let Some((method, path)) = declarations.first() else {
            return Ok(0);
        };

        if operation.responses.is_empty() {
            return Err(ParseError::MissingResponse {
                method: *method,
                path: path.clone(),
            });
        }

        for (method, path) in &declarations {
            debug!("Merging operation {} {}", method, path);
            doc.merge(path, *method, operation.clone());
        }

        Ok(declarations.len())
    }

    fn apply(&self, acc: &mut Accumulator, directive: Directive<'_>) -> Result<()> {
        let op = &mut acc.operation;
        match directive {
            Directive::Path(payload) => acc.declarations.push(parse_path(payload)?),
            Directive::Tags(payload) => op.tags = parse_tags(payload),
            Directive::Summary(text) => op.summary = Some(text.to_string()),
            Directive::Description(text) => op.description = Some(text.to_string()),
            Directive::Deprecated => op.deprecated = true,
            Directive::Param(payload) => op.parameters.push(params::parse_param(payload)?),
            Directive::Request(payload) => op.request_body = Some(self.parse_request(payload)?),
            Directive::Response(payload) => {
                let (status, body) = self.parse_response(payload)?;
                op.responses.insert(status, body);
            }
        }
        Ok(())
    }

    /// `<content-type> <payload>`
    fn parse_request(&self, payload: &str) -> Result<Body> {
        let (content_type, rest) = split_word(payload);
        if content_type.is_empty() {
            return Err(ParseError::malformed("Missing content type"));
        }

        let body = Body::single(content_type, self.resolve_content(content_type, rest)?);
        validate::validate_request(&body)?;
        Ok(body)
    }

    /// `<status> <content-type> <payload>`
    fn parse_response(&self, payload: &str) -> Result<(String, Body)> {
        let (status, rest) = split_word(payload);
        let (content_type, rest) = split_word(rest);
        if status.is_empty() {
            return Err(ParseError::malformed("Missing status code"));
        }
        if content_type.is_empty() {
            return Err(ParseError::malformed("Missing content type"));
        }

        let body = Body::single(content_type, self.resolve_content(content_type, rest)?);
        validate::validate_response(status, &body)?;
        Ok((status.to_string(), body))
    }

    fn resolve_content(&self, content_type: &str, payload: &str) -> Result<Content> {
        if content_type == OCTET_STREAM {
            return Ok(Content::Schema(Schema::binary()));
        }
        if payload.is_empty() {
            return Err(ParseError::malformed("Missing payload"));
        }
        SchemaResolver::new(&self.catalog).resolve_payload(payload)
    }
}

/// `<method> <path>`; the method is matched case-insensitively.
fn parse_path(payload: &str) -> Result<(HttpMethod, String)> {
    let mut words = payload.split_whitespace();
    let method = words.next().unwrap_or("").to_lowercase();
    let path = words.next().unwrap_or("");

    let method = validate::validate_path(&method, path)?;
    Ok((method, path.to_string()))
}

fn parse_tags(payload: &str) -> Vec<String> {
    payload
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits off the first whitespace-delimited word; the remainder is trimmed.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}
