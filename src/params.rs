//! Parameter directives: `@openapiParam <name> <key>=<value>[, <key>=<value>...]`.

use crate::error::{ParseError, Result};
use crate::model::{Parameter, ParameterLocation, Property};
use crate::schema::{primitive_format, primitive_type, SCHEMA_TYPES};
use crate::validate;
use log::{debug, warn};

/// Keys understood in a parameter's option list.
pub const KNOWN_KEYS: [&str; 7] = [
    "in",
    "type",
    "required",
    "default",
    "example",
    "format",
    "description",
];

/// Ordered `key=value` options. A repeated key replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValues {
    entries: Vec<(String, String)>,
}

impl KeyValues {
    /// Parses `a=1, b=2`. Empty entries (e.g. a trailing comma) are skipped.
    pub fn parse(s: &str) -> Result<Self> {
        let mut options = Self::default();

        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                ParseError::malformed(format!("Expected key=value, got: {}", entry))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ParseError::malformed(format!("Missing key in: {}", entry)));
            }
            options.insert(key, value.trim());
        }

        Ok(options)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses the payload of an `@openapiParam` directive.
pub fn parse_param(payload: &str) -> Result<Parameter> {
    let payload = payload.trim();
    let (name, tail) = payload
        .split_once(char::is_whitespace)
        .unwrap_or((payload, ""));

    if name.is_empty() {
        return Err(ParseError::malformed("Missing parameter name"));
    }

    let options = KeyValues::parse(tail)?;
    for key in options.keys().filter(|k| !KNOWN_KEYS.contains(k)) {
        warn!("Ignoring unknown option '{}' on parameter {}", key, name);
    }

    let location = validate::parameter_location(options.get("in"))?;
    let declared_type = options.get("type").filter(|t| !t.is_empty());

    let format = options
        .get("format")
        .or_else(|| declared_type.and_then(primitive_format));

    let schema_type = declared_type.map(|t| {
        if SCHEMA_TYPES.contains(&t) {
            t
        } else {
            primitive_type(t).unwrap_or(t)
        }
    });

    let required = match options.get("required") {
        Some(flag) => flag == "true",
        None => location == ParameterLocation::Path,
    };

    let param = Parameter {
        name: name.to_string(),
        location,
        required,
        schema: Property {
            property_type: schema_type.map(str::to_string),
            format: format.map(str::to_string),
            example: options.get("example").map(str::to_string),
            default: options.get("default").map(str::to_string),
            description: options.get("description").map(str::to_string),
            ..Property::default()
        },
    };

    debug!("Parsed parameter {} in {:?}", param.name, param.location);
    validate::validate_parameter(&param)?;
    Ok(param)
}
