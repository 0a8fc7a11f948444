//! Resolution of directive payloads and raw type strings into schema trees.
//!
//! A payload is one of three shapes:
//!
//! - a JSON literal (`{"id": 1}`), kept verbatim as an example;
//! - an inline field list (`{id: int, tags: []string}`), turned into an `object` schema;
//! - a type reference (`User`, `[]models::User`), looked up in the [`Catalog`].
//!
//! Raw field types use a small grammar: `*T` marks an optional value, `[]T` a sequence,
//! `a::b::T` a qualified name. Any type that cannot be resolved at any depth fails the
//! whole payload.

use crate::catalog::{qualify, Catalog, TypeDescriptor};
use crate::error::{ParseError, Result};
use crate::model::{Content, Property, Schema};
use log::debug;
use std::collections::{BTreeMap, HashSet};

/// Content type whose payload is always described as a binary string.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Type names that are already valid schema types.
pub const SCHEMA_TYPES: [&str; 6] = ["string", "integer", "number", "boolean", "array", "object"];

const ARRAY_PREFIX: &str = "[]";
const OPTIONAL_PREFIX: char = '*';

/// Maps a primitive type name to its schema type.
pub fn primitive_type(name: &str) -> Option<&'static str> {
    match name {
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32"
        | "u64" | "u128" | "usize" => Some("integer"),
        "float" | "float32" | "float64" | "f32" | "f64" => Some("number"),
        "bool" => Some("boolean"),
        "string" | "String" | "str" | "char" | "[]byte" => Some("string"),
        _ => None,
    }
}

/// Maps a primitive type name to its schema format, if it has one.
pub fn primitive_format(name: &str) -> Option<&'static str> {
    match name {
        "float" | "float32" | "f32" => Some("float"),
        "float64" | "f64" => Some("double"),
        "[]byte" => Some("binary"),
        _ => None,
    }
}

pub fn is_timestamp(name: &str) -> bool {
    matches!(
        name,
        "time.Time" | "DateTime" | "NaiveDateTime" | "OffsetDateTime" | "SystemTime"
    )
}

/// The three payload shapes accepted by request and response directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Valid JSON, stored as an example
    Literal(&'a str),
    /// `(field name, raw type)` pairs in source order
    FieldList(Vec<(String, String)>),
    /// Name of a catalog type, optionally `[]`-prefixed
    TypeRef(&'a str),
}

impl<'a> Payload<'a> {
    /// Tries, in order: JSON literal, inline field list, type reference.
    pub fn classify(payload: &'a str) -> Result<Self> {
        if !payload.starts_with('{') {
            return Ok(Payload::TypeRef(payload));
        }

        if serde_json::from_str::<serde::de::IgnoredAny>(payload).is_ok() {
            return Ok(Payload::Literal(payload));
        }

        parse_field_list(payload).map(Payload::FieldList)
    }
}

/// Parses `{name: type, "other": "type"}`. Quotes around names and types are optional.
fn parse_field_list(payload: &str) -> Result<Vec<(String, String)>> {
    let invalid = || ParseError::InvalidLiteral(payload.to_string());

    let inner = payload
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(invalid)?;

    let mut fields = Vec::new();
    for entry in inner.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, raw_type) = entry.split_once(':').ok_or_else(invalid)?;
        let name = unquote(name.trim());
        let raw_type = unquote(raw_type.trim());
        if name.is_empty() || raw_type.is_empty() {
            return Err(invalid());
        }
        fields.push((name.to_string(), raw_type.to_string()));
    }

    if fields.is_empty() {
        return Err(invalid());
    }

    Ok(fields)
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}

/// Resolves payloads against a catalog.
///
/// One resolver is used per directive; it tracks the types currently being expanded so
/// that self-referencing types fail with [`ParseError::CyclicType`] instead of
/// recursing forever.
pub struct SchemaResolver<'c> {
    catalog: &'c Catalog,
    in_progress: HashSet<String>,
}

impl<'c> SchemaResolver<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            in_progress: HashSet::new(),
        }
    }

    /// Resolves a request/response payload into body content.
    pub fn resolve_payload(&mut self, payload: &str) -> Result<Content> {
        match Payload::classify(payload)? {
            Payload::Literal(literal) => {
                debug!("Payload is a literal example");
                Ok(Content::Example(literal.to_string()))
            }
            Payload::FieldList(fields) => {
                debug!("Payload is an inline list of {} fields", fields.len());
                let mut properties = BTreeMap::new();
                for (name, raw_type) in fields {
                    let property = self.type_to_property("", &raw_type)?;
                    properties.insert(name, property);
                }
                Ok(Content::Schema(Schema {
                    properties: Some(properties),
                    ..Schema::object()
                }))
            }
            Payload::TypeRef(name) => {
                debug!("Payload references type {}", name);
                self.struct_to_schema(name).map(Content::Schema)
            }
        }
    }

    /// Resolves a (possibly `[]`-prefixed) catalog type name into a schema.
    pub fn struct_to_schema(&mut self, name: &str) -> Result<Schema> {
        if let Some(element) = name.strip_prefix(ARRAY_PREFIX) {
            return self.struct_to_schema(element).map(Schema::array);
        }

        let catalog = self.catalog;
        let descriptor = catalog
            .lookup(name)
            .ok_or_else(|| ParseError::UnknownType(name.to_string()))?;

        self.descriptor_to_schema(descriptor)
    }

    /// Resolves a raw field type into a property schema.
    pub fn type_to_property(&mut self, namespace: &str, raw_type: &str) -> Result<Property> {
        let t = raw_type.strip_prefix(OPTIONAL_PREFIX).unwrap_or(raw_type);

        if let Some(schema_type) = primitive_type(t) {
            return Ok(Property::typed(schema_type, primitive_format(t)));
        }

        if is_timestamp(t) {
            return Ok(Property::typed("string", Some("date-time")));
        }

        if let Some(element) = t.strip_prefix(ARRAY_PREFIX) {
            let element = self.type_to_property(namespace, element)?;
            return Ok(Property {
                property_type: Some("array".to_string()),
                items: Some(Box::new(Schema::from(element))),
                ..Property::default()
            });
        }

        let qualified = qualify(namespace, t);
        let catalog = self.catalog;
        let descriptor = catalog
            .lookup(&qualified)
            .ok_or(ParseError::UnknownType(qualified))?;

        if let Some(target) = alias_target(descriptor) {
            return self.guarded(&descriptor.name, |this| {
                this.type_to_property(descriptor.namespace(), target)
            });
        }

        let schema = self.descriptor_to_schema(descriptor)?;
        Ok(Property {
            property_type: Some("object".to_string()),
            properties: schema.properties,
            ..Property::default()
        })
    }

    fn descriptor_to_schema(&mut self, descriptor: &TypeDescriptor) -> Result<Schema> {
        if let Some(target) = alias_target(descriptor) {
            return self
                .guarded(&descriptor.name, |this| {
                    this.type_to_property(descriptor.namespace(), target)
                })
                .map(Schema::from);
        }

        self.guarded(&descriptor.name, |this| this.object_from_fields(descriptor))
    }

    fn object_from_fields(&mut self, descriptor: &TypeDescriptor) -> Result<Schema> {
        debug!("Expanding fields of {}", descriptor.name);

        let namespace = descriptor.namespace();
        let mut properties = BTreeMap::new();

        for field in &descriptor.fields {
            let tag = &field.tag;
            if tag.skip {
                continue;
            }

            let name = tag
                .rename
                .as_deref()
                .filter(|r| !r.is_empty())
                .unwrap_or(&field.name);

            let mut property = self.type_to_property(namespace, &field.raw_type)?;
            if tag.schema_type.is_some() {
                property.property_type = tag.schema_type.clone();
            }
            if tag.format.is_some() {
                property.format = tag.format.clone();
            }
            if tag.example.is_some() {
                property.example = tag.example.clone();
            }

            properties.insert(name.to_string(), property);
        }

        Ok(Schema {
            properties: Some(properties),
            ..Schema::object()
        })
    }

    /// Runs `f` with `name` marked as in progress.
    fn guarded<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if !self.in_progress.insert(name.to_string()) {
            return Err(ParseError::CyclicType(name.to_string()));
        }
        let result = f(self);
        self.in_progress.remove(name);
        result
    }
}

fn alias_target(descriptor: &TypeDescriptor) -> Option<&str> {
    descriptor.alias_of.as_deref().filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDescriptor, FieldTag};
    use pretty_assertions::assert_eq;

    fn field(name: &str, raw_type: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, raw_type)
    }

    fn props(entries: Vec<(&str, Property)>) -> Option<BTreeMap<String, Property>> {
        Some(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            TypeDescriptor::new("Person", vec![field("Name", "string"), field("Age", "int")]),
            TypeDescriptor::new(
                "models::User",
                vec![
                    field("id", "uint64"),
                    field("address", "*Address"),
                    field("tags", "[]string"),
                    field("created", "time.Time"),
                ],
            ),
            TypeDescriptor::new("models::Address", vec![field("street", "string")]),
            TypeDescriptor::alias("models::UserID", "uint64"),
            TypeDescriptor::alias("PersonAlias", "Person"),
            TypeDescriptor::alias("People", "[]Person"),
        ])
    }

    #[test]
    fn test_integer_bucket_is_uniform() {
        let catalog = Catalog::default();
        let mut resolver = SchemaResolver::new(&catalog);
        let names = [
            "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32",
            "uint64", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
            "u128", "usize",
        ];

        for name in names {
            let property = resolver.type_to_property("", name).unwrap();
            assert_eq!(property, Property::typed("integer", None), "type: {}", name);
        }
    }

    #[test]
    fn test_float_and_byte_formats() {
        let catalog = Catalog::default();
        let mut resolver = SchemaResolver::new(&catalog);

        for name in ["float", "float32", "f32"] {
            assert_eq!(
                resolver.type_to_property("", name).unwrap(),
                Property::typed("number", Some("float"))
            );
        }
        for name in ["float64", "f64"] {
            assert_eq!(
                resolver.type_to_property("", name).unwrap(),
                Property::typed("number", Some("double"))
            );
        }
        assert_eq!(
            resolver.type_to_property("", "[]byte").unwrap(),
            Property::typed("string", Some("binary"))
        );
        assert_eq!(
            resolver.type_to_property("", "bool").unwrap(),
            Property::typed("boolean", None)
        );
    }

    #[test]
    fn test_pointer_marker_is_transparent() {
        let catalog = Catalog::default();
        let mut resolver = SchemaResolver::new(&catalog);
        assert_eq!(
            resolver.type_to_property("", "*string").unwrap(),
            resolver.type_to_property("", "string").unwrap()
        );
    }

    #[test]
    fn test_timestamps_are_date_time_strings() {
        let catalog = Catalog::default();
        let mut resolver = SchemaResolver::new(&catalog);
        for name in ["time.Time", "*DateTime", "NaiveDateTime", "SystemTime"] {
            assert_eq!(
                resolver.type_to_property("", name).unwrap(),
                Property::typed("string", Some("date-time"))
            );
        }
    }

    #[test]
    fn test_nested_arrays_keep_structure() {
        let catalog = catalog();
        let mut resolver = SchemaResolver::new(&catalog);

        let property = resolver.type_to_property("", "[][]Person").unwrap();
        assert_eq!(property.type_name(), Some("array"));

        let inner = property.items.unwrap();
        assert_eq!(inner.type_name(), Some("array"));

        let person = inner.items.unwrap();
        assert_eq!(person.type_name(), Some("object"));
        assert_eq!(
            *person,
            resolver.struct_to_schema("Person").unwrap(),
        );
    }

    #[test]
    fn test_array_payload_wraps_element_schema() {
        let catalog = catalog();
        let mut resolver = SchemaResolver::new(&catalog);

        let element = resolver.struct_to_schema("Person").unwrap();
        let array = resolver.struct_to_schema("[]Person").unwrap();
        assert_eq!(array, Schema::array(element.clone()));
        assert!(array.properties.is_none());

        let nested = resolver.struct_to_schema("[][]Person").unwrap();
        assert_eq!(nested, Schema::array(Schema::array(element)));
    }

    #[test]
    fn test_struct_round_trip() {
        let catalog = catalog();
        let mut resolver = SchemaResolver::new(&catalog);

        let schema = resolver.struct_to_schema("Person").unwrap();
        assert_eq!(
            schema,
            Schema {
                schema_type: Some("object".to_string()),
                properties: props(vec![
                    ("Name", Property::typed("string", None)),
                    ("Age", Property::typed("integer", None)),
                ]),
                ..Schema::default()
            }
        );
    }

    #[test]
    fn test_alias_is_transparent() {
        let catalog = catalog();
        let mut resolver = SchemaResolver::new(&catalog);

        assert_eq!(
            resolver.type_to_property("", "PersonAlias").unwrap(),
            resolver.type_to_property("", "Person").unwrap()
        );
        assert_eq!(
            resolver.type_to_property("", "People").unwrap(),
            resolver.type_to_property("", "[]Person").unwrap()
        );
        assert_eq!(
            resolver.struct_to_schema("PersonAlias").unwrap(),
            resolver.struct_to_schema("Person").unwrap()
        );
        assert_eq!(
            resolver.struct_to_schema("People").unwrap(),
            resolver.struct_to_schema("[]Person").unwrap()
        );
    }

    #[test]
    fn test_namespace_qualifies_nested_references() {
        let catalog = catalog();
        let mut resolver = SchemaResolver::new(&catalog);

        let schema = resolver.struct_to_schema("models::User").unwrap();
        let properties = schema.properties.unwrap();

        let address = &properties["address"];
        assert_eq!(address.type_name(), Some("object"));
        assert_eq!(
            address.properties,
            props(vec![("street", Property::typed("string", None))])
        );
        assert_eq!(properties["id"], Property::typed("integer", None));
        assert_eq!(properties["created"], Property::typed("string", Some("date-time")));

        let tags = &properties["tags"];
        assert_eq!(tags.type_name(), Some("array"));
        assert_eq!(tags.items.as_deref().and_then(Schema::type_name), Some("string"));
    }

    #[test]
    fn test_primitive_alias_in_namespace() {
        let catalog = catalog();
        let mut resolver = SchemaResolver::new(&catalog);
        assert_eq!(
            resolver.type_to_property("models", "UserID").unwrap(),
            Property::typed("integer", None)
        );
    }

    #[test]
    fn test_field_tags_rename_skip_and_override() {
        let catalog = Catalog::new(vec![TypeDescriptor::new(
            "Account",
            vec![
                field("id", "int").with_tag(FieldTag {
                    rename: Some("accountId".to_string()),
                    ..FieldTag::default()
                }),
                field("secret", "string").with_tag(FieldTag {
                    skip: true,
                    ..FieldTag::default()
                }),
                field("balance", "float64").with_tag(FieldTag {
                    schema_type: Some("string".to_string()),
                    format: Some("decimal".to_string()),
                    example: Some("10.50".to_string()),
                    ..FieldTag::default()
                }),
            ],
        )]);
        let mut resolver = SchemaResolver::new(&catalog);

        let properties = resolver.struct_to_schema("Account").unwrap().properties.unwrap();
        assert_eq!(properties.len(), 2);
        assert!(properties.contains_key("accountId"));
        assert!(!properties.contains_key("secret"));

        let balance = &properties["balance"];
        assert_eq!(balance.type_name(), Some("string"));
        assert_eq!(balance.format.as_deref(), Some("decimal"));
        assert_eq!(balance.example.as_deref(), Some("10.50"));
    }

    #[test]
    fn test_colliding_names_last_field_wins() {
        let catalog = Catalog::new(vec![TypeDescriptor::new(
            "Dup",
            vec![
                field("a", "string"),
                field("b", "int").with_tag(FieldTag {
                    rename: Some("a".to_string()),
                    ..FieldTag::default()
                }),
            ],
        )]);
        let mut resolver = SchemaResolver::new(&catalog);

        let properties = resolver.struct_to_schema("Dup").unwrap().properties.unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties["a"], Property::typed("integer", None));
    }

    #[test]
    fn test_unknown_type_at_depth_fails() {
        let catalog = Catalog::new(vec![TypeDescriptor::new(
            "Outer",
            vec![field("inner", "[]Missing")],
        )]);
        let mut resolver = SchemaResolver::new(&catalog);

        assert_eq!(
            resolver.struct_to_schema("Outer"),
            Err(ParseError::UnknownType("Missing".to_string()))
        );
        assert_eq!(
            resolver.struct_to_schema("Nope"),
            Err(ParseError::UnknownType("Nope".to_string()))
        );
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let catalog = Catalog::new(vec![
            TypeDescriptor::new("Node", vec![field("children", "[]Node")]),
            TypeDescriptor::alias("Loop", "Loop2"),
            TypeDescriptor::alias("Loop2", "Loop"),
        ]);
        let mut resolver = SchemaResolver::new(&catalog);

        assert_eq!(
            resolver.struct_to_schema("Node"),
            Err(ParseError::CyclicType("Node".to_string()))
        );
        assert!(matches!(
            resolver.type_to_property("", "Loop"),
            Err(ParseError::CyclicType(_))
        ));
    }

    #[test]
    fn test_repeated_type_is_not_cyclic() {
        let catalog = Catalog::new(vec![
            TypeDescriptor::new("Point", vec![field("x", "int")]),
            TypeDescriptor::new("Line", vec![field("from", "Point"), field("to", "*Point")]),
        ]);
        let mut resolver = SchemaResolver::new(&catalog);

        let properties = resolver.struct_to_schema("Line").unwrap().properties.unwrap();
        assert_eq!(properties["from"], properties["to"]);
    }

    #[test]
    fn test_classify_payloads() {
        assert_eq!(
            Payload::classify(r#"{"id": "int"}"#),
            Ok(Payload::Literal(r#"{"id": "int"}"#))
        );
        assert_eq!(Payload::classify("User"), Ok(Payload::TypeRef("User")));
        assert_eq!(
            Payload::classify(r#"{"id": int, tags: []string}"#),
            Ok(Payload::FieldList(vec![
                ("id".to_string(), "int".to_string()),
                ("tags".to_string(), "[]string".to_string()),
            ]))
        );
    }

    #[test]
    fn test_classify_invalid_literal() {
        for payload in ["{id int}", "{: int}", "{id: }", "{,}", "{id: int"] {
            assert_eq!(
                Payload::classify(payload),
                Err(ParseError::InvalidLiteral(payload.to_string())),
                "payload: {}",
                payload
            );
        }
    }

    #[test]
    fn test_literal_payload_never_resolves_types() {
        let catalog = Catalog::default();
        let mut resolver = SchemaResolver::new(&catalog);

        let content = resolver.resolve_payload(r#"{"type": "Missing"}"#).unwrap();
        assert_eq!(content, Content::Example(r#"{"type": "Missing"}"#.to_string()));
    }

    #[test]
    fn test_field_list_payload_builds_object() {
        let catalog = catalog();
        let mut resolver = SchemaResolver::new(&catalog);

        let content = resolver
            .resolve_payload(r#"{"id": int, "owner": Person, "tags": []string}"#)
            .unwrap();
        let schema = content.schema().unwrap();
        assert_eq!(schema.type_name(), Some("object"));

        let properties = schema.properties.as_ref().unwrap();
        assert_eq!(properties["id"], Property::typed("integer", None));
        assert_eq!(properties["owner"].type_name(), Some("object"));
        assert_eq!(properties["tags"].type_name(), Some("array"));
    }

    #[test]
    fn test_field_list_unknown_type_fails() {
        let catalog = Catalog::default();
        let mut resolver = SchemaResolver::new(&catalog);
        assert_eq!(
            resolver.resolve_payload("{id: Widget}"),
            Err(ParseError::UnknownType("Widget".to_string()))
        );
    }
}
