use crate::parser::ParsedFile;
use log::{debug, warn};
use std::collections::HashMap;

/// Separator between namespace segments in qualified type names.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Read-only collection of type descriptors consulted by the schema resolver.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    descriptors: Vec<TypeDescriptor>,
    /// Qualified name -> index into `descriptors`
    by_name: HashMap<String, usize>,
    /// Unqualified name -> indices of every descriptor with that short name
    by_short_name: HashMap<String, Vec<usize>>,
}

/// Metadata describing one named data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Name, qualified with its namespace when it has one (e.g. `models::User`)
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
    /// Target type when this descriptor is a pure alias
    pub alias_of: Option<String>,
}

/// A single field of a type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Raw type in directive grammar (`*T`, `[]T`, `models::User`, ...)
    pub raw_type: String,
    pub tag: FieldTag,
}

/// Serialization overrides attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    /// Output property name
    pub rename: Option<String>,
    /// Field is omitted from the serialized form
    pub skip: bool,
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub example: Option<String>,
}

impl TypeDescriptor {
    /// Descriptor for a struct with named fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
            alias_of: None,
        }
    }

    /// Descriptor that stands for `target`.
    pub fn alias(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            alias_of: Some(target.into()),
        }
    }

    pub fn is_alias(&self) -> bool {
        self.alias_of.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Namespace part of the name (`models` for `models::User`), empty at the root.
    pub fn namespace(&self) -> &str {
        namespace_of(&self.name)
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_type: raw_type.into(),
            tag: FieldTag::default(),
        }
    }

    pub fn with_tag(mut self, tag: FieldTag) -> Self {
        self.tag = tag;
        self
    }
}

/// Namespace part of a possibly qualified type name.
pub fn namespace_of(name: &str) -> &str {
    name.rsplit_once(NAMESPACE_SEPARATOR)
        .map(|(ns, _)| ns)
        .unwrap_or("")
}

/// Final segment of a possibly qualified type name.
pub fn short_name(name: &str) -> &str {
    name.rsplit_once(NAMESPACE_SEPARATOR)
        .map(|(_, short)| short)
        .unwrap_or(name)
}

/// Qualifies `name` with `namespace` unless it is already qualified.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() || name.contains(NAMESPACE_SEPARATOR) {
        name.to_string()
    } else {
        format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, name)
    }
}

impl Catalog {
    pub fn new(descriptors: Vec<TypeDescriptor>) -> Self {
        let mut catalog = Self::default();
        for descriptor in descriptors {
            catalog.insert(descriptor);
        }
        catalog
    }

    /// Adds a descriptor; a later descriptor with the same name replaces the earlier one.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        if let Some(&index) = self.by_name.get(&descriptor.name) {
            warn!("Duplicate type descriptor: {}", descriptor.name);
            self.descriptors[index] = descriptor;
            return;
        }

        let index = self.descriptors.len();
        self.by_name.insert(descriptor.name.clone(), index);
        self.by_short_name
            .entry(short_name(&descriptor.name).to_string())
            .or_default()
            .push(index);
        self.descriptors.push(descriptor);
    }

    /// Looks up a descriptor by name.
    ///
    /// An exact match wins. Otherwise the final segment of `name` is matched against
    /// every descriptor's final segment and a single candidate is returned; missing or
    /// ambiguous short names yield `None`.
    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        if let Some(&index) = self.by_name.get(name) {
            return Some(&self.descriptors[index]);
        }

        match self.by_short_name.get(short_name(name)).map(Vec::as_slice) {
            Some([index]) => {
                debug!(
                    "Resolved {} to {} by short name",
                    name, self.descriptors[*index].name
                );
                Some(&self.descriptors[*index])
            }
            Some(candidates) if candidates.len() > 1 => {
                debug!("Ambiguous type name {}: {} candidates", name, candidates.len());
                None
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.iter()
    }

    /// Builds a catalog from every struct, alias, newtype and unit enum in `files`.
    pub fn from_parsed_files(files: &[ParsedFile]) -> Self {
        let mut catalog = Self::default();
        for file in files {
            for descriptor in extract_descriptors(file) {
                catalog.insert(descriptor);
            }
        }
        debug!("Catalog built with {} type descriptors", catalog.len());
        catalog
    }
}

/// Extracts type descriptors from one parsed file, including inline `mod` blocks.
pub fn extract_descriptors(file: &ParsedFile) -> Vec<TypeDescriptor> {
    let mut descriptors = Vec::new();
    collect_items(&file.module_path, &file.syntax_tree.items, &mut descriptors);
    descriptors
}

fn collect_items(namespace: &str, items: &[syn::Item], out: &mut Vec<TypeDescriptor>) {
    for item in items {
        match item {
            syn::Item::Struct(item_struct) => {
                let name = qualify(namespace, &item_struct.ident.to_string());
                if let Some(descriptor) = struct_descriptor(name, item_struct) {
                    out.push(descriptor);
                }
            }
            syn::Item::Type(item_type) => {
                let name = qualify(namespace, &item_type.ident.to_string());
                let target = normalize_type(&item_type.ty);
                debug!("Found alias {} = {}", name, target);
                out.push(TypeDescriptor::alias(name, target));
            }
            syn::Item::Enum(item_enum) => {
                let is_unit_only = item_enum
                    .variants
                    .iter()
                    .all(|v| matches!(v.fields, syn::Fields::Unit));
                if is_unit_only {
                    let name = qualify(namespace, &item_enum.ident.to_string());
                    debug!("Found unit enum {}, serialized as string", name);
                    out.push(TypeDescriptor::alias(name, "string"));
                }
            }
            syn::Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    let nested_ns = qualify(namespace, &item_mod.ident.to_string());
                    collect_items(&nested_ns, nested, out);
                }
            }
            _ => {}
        }
    }
}

fn struct_descriptor(name: String, item_struct: &syn::ItemStruct) -> Option<TypeDescriptor> {
    match &item_struct.fields {
        syn::Fields::Named(named) => {
            let fields: Vec<FieldDescriptor> = named
                .named
                .iter()
                .filter_map(|field| {
                    let field_name = field.ident.as_ref()?.to_string();
                    Some(FieldDescriptor {
                        name: field_name,
                        raw_type: normalize_type(&field.ty),
                        tag: parse_field_tag(&field.attrs),
                    })
                })
                .collect();
            debug!("Found struct {} with {} fields", name, fields.len());
            Some(TypeDescriptor::new(name, fields))
        }
        // Newtypes serialize as their inner value
        syn::Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
            let inner = normalize_type(&unnamed.unnamed[0].ty);
            debug!("Found newtype {} over {}", name, inner);
            Some(TypeDescriptor::alias(name, inner))
        }
        _ => None,
    }
}

/// Reads `#[serde(...)]` and `#[openapi(...)]` attributes of a field.
fn parse_field_tag(attrs: &[syn::Attribute]) -> FieldTag {
    let mut tag = FieldTag::default();

    for attr in attrs {
        let result = if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    tag.rename = Some(value.value());
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    tag.skip = true;
                } else {
                    skip_meta_value(&meta)?;
                }
                Ok(())
            })
        } else if attr.path().is_ident("openapi") {
            attr.parse_nested_meta(|meta| {
                let slot = if meta.path.is_ident("type") {
                    &mut tag.schema_type
                } else if meta.path.is_ident("format") {
                    &mut tag.format
                } else if meta.path.is_ident("example") {
                    &mut tag.example
                } else {
                    return skip_meta_value(&meta);
                };
                let value: syn::LitStr = meta.value()?.parse()?;
                *slot = Some(value.value());
                Ok(())
            })
        } else {
            continue;
        };

        if let Err(e) = result {
            warn!("Ignoring malformed field attribute: {}", e);
        }
    }

    tag
}

/// Consumes the value of an attribute entry we do not interpret.
fn skip_meta_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta_value(&nested))?;
    }
    Ok(())
}

const TIMESTAMP_IDENTS: &[&str] = &["DateTime", "NaiveDateTime", "OffsetDateTime", "SystemTime"];

const SEQUENCE_IDENTS: &[&str] = &["Vec", "VecDeque", "HashSet", "BTreeSet", "LinkedList"];

/// Renders a Rust type in the directive type grammar.
pub fn normalize_type(ty: &syn::Type) -> String {
    match ty {
        syn::Type::Path(type_path) => normalize_path(&type_path.path),
        syn::Type::Reference(reference) => normalize_type(&reference.elem),
        syn::Type::Paren(paren) => normalize_type(&paren.elem),
        syn::Type::Group(group) => normalize_type(&group.elem),
        syn::Type::Slice(slice) => sequence_of(normalize_type(&slice.elem)),
        syn::Type::Array(array) => sequence_of(normalize_type(&array.elem)),
        _ => "Unknown".to_string(),
    }
}

fn sequence_of(element: String) -> String {
    if element == "u8" {
        "[]byte".to_string()
    } else {
        format!("[]{}", element)
    }
}

fn normalize_path(path: &syn::Path) -> String {
    let Some(segment) = path.segments.last() else {
        return "Unknown".to_string();
    };
    let ident = segment.ident.to_string();

    if TIMESTAMP_IDENTS.contains(&ident.as_str()) {
        return ident;
    }

    if let Some(inner) = first_type_argument(segment) {
        match ident.as_str() {
            "Option" | "Box" | "Rc" | "Arc" => return format!("*{}", normalize_type(inner)),
            i if SEQUENCE_IDENTS.contains(&i) => return sequence_of(normalize_type(inner)),
            _ => {}
        }
    }

    path.segments
        .iter()
        .map(|s| s.ident.to_string())
        .filter(|s| s != "crate" && s != "self" && s != "super")
        .collect::<Vec<_>>()
        .join(NAMESPACE_SEPARATOR)
}

fn first_type_argument(segment: &syn::PathSegment) -> Option<&syn::Type> {
    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        args.args.iter().find_map(|arg| match arg {
            syn::GenericArgument::Type(ty) => Some(ty),
            _ => None,
        })
    } else {
        None
    }
}
