//! Document model produced by the comment parser.
//!
//! The shapes mirror the subset of OpenAPI 3.0 that the `@openapi` directives can
//! describe. Every map is a `BTreeMap` so that serialized output is stable across runs.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP methods accepted by the `@openapi` path declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP HEAD method
    Head,
    /// HTTP OPTIONS method
    Options,
}

impl HttpMethod {
    /// All methods, in the order they appear in a serialized path item.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    /// Parses a lowercase method name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    /// Lowercase name used as the key inside a path item.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// The location where a parameter value is read from in an HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Path segment (e.g., `/users/{id}`)
    Path,
    /// Query string parameter
    Query,
    /// HTTP header
    Header,
    /// Cookie value
    Cookie,
}

impl ParameterLocation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

/// Paths of the API, keyed by URL path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub paths: BTreeMap<String, PathItem>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the operation registered for `method` on `path`, if any.
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.get(method))
    }

    /// Number of (path, method) pairs carrying an operation.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(PathItem::len).sum()
    }

    /// Inserts `operation` at (`path`, `method`).
    ///
    /// An existing operation at the same key is replaced; other methods of the same
    /// path are left untouched.
    pub fn merge(&mut self, path: &str, method: HttpMethod, operation: Operation) {
        let item = self.paths.entry(path.to_string()).or_default();
        item.set(method, operation);
    }
}

/// All operations for a single path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

impl PathItem {
    fn slot(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Options => &mut self.options,
        }
    }

    pub fn get(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
        }
    }

    pub fn set(&mut self, method: HttpMethod, operation: Operation) {
        *self.slot(method) = Some(operation);
    }

    /// Methods that currently carry an operation.
    pub fn methods(&self) -> Vec<HttpMethod> {
        HttpMethod::ALL
            .into_iter()
            .filter(|m| self.get(*m).is_some())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.methods().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single documented API operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Body>,
    /// Responses keyed by status code
    pub responses: BTreeMap<String, Body>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Property,
}

/// Request or response body, keyed by MIME type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Body {
    pub content: BTreeMap<String, Content>,
}

impl Body {
    /// Body with a single content entry.
    pub fn single(content_type: &str, content: Content) -> Self {
        let mut map = BTreeMap::new();
        map.insert(content_type.to_string(), content);
        Self { content: map }
    }
}

/// Media type content: either a literal example payload or a schema, never both.
///
/// Serializes as a one-entry map (`example: ...` or `schema: ...`), the shape of an
/// OpenAPI Media Type object in both JSON and YAML.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Verbatim example payload, already checked to be valid JSON
    Example(String),
    Schema(Schema),
}

impl Content {
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            Content::Schema(schema) => Some(schema),
            Content::Example(_) => None,
        }
    }

    pub fn example(&self) -> Option<&str> {
        match self {
            Content::Example(literal) => Some(literal),
            Content::Schema(_) => None,
        }
    }
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Content::Example(literal) => map.serialize_entry("example", &Literal(literal))?,
            Content::Schema(schema) => map.serialize_entry("schema", schema)?,
        }
        map.end()
    }
}

/// Emits a literal as structured data so that consumers see an object, not a string.
struct Literal<'a>(&'a str);

impl Serialize for Literal<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match serde_json::from_str::<serde_json::Value>(self.0) {
            Ok(value) => value.serialize(serializer),
            Err(_) => serializer.serialize_str(self.0),
        }
    }
}

/// Structural type description of a payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
}

impl Schema {
    /// Empty `object` schema.
    pub fn object() -> Self {
        Self {
            schema_type: Some("object".to_string()),
            properties: Some(BTreeMap::new()),
            ..Self::default()
        }
    }

    /// `array` schema wrapping `items`.
    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// `{type: string, format: binary}`, used for opaque byte streams.
    pub fn binary() -> Self {
        Self {
            schema_type: Some("string".to_string()),
            format: Some("binary".to_string()),
            ..Self::default()
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_deref()
    }
}

impl From<Property> for Schema {
    /// Drops the property-only metadata (example, default, description).
    fn from(property: Property) -> Self {
        Self {
            schema_type: property.property_type,
            format: property.format,
            properties: property.properties,
            items: property.items,
        }
    }
}

/// Schema of a named field or parameter value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Property {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Property>>,
}

impl Property {
    /// Property with only a type and an optional format.
    pub fn typed(property_type: &str, format: Option<&str>) -> Self {
        Self {
            property_type: Some(property_type.to_string()),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.property_type.as_deref()
    }
}
