//! Structural checks run right after a directive is parsed.
//!
//! None of these functions mutate anything; they either accept the parsed value or
//! describe what is wrong with it.

use crate::error::{ParseError, Result};
use crate::model::{Body, Content, HttpMethod, Parameter, ParameterLocation, Schema};
use crate::schema::OCTET_STREAM;

/// Checks a path declaration and returns its method.
pub fn validate_path(method: &str, path: &str) -> Result<HttpMethod> {
    if method.is_empty() {
        return Err(ParseError::malformed("Missing method"));
    }
    if path.is_empty() {
        return Err(ParseError::malformed("Missing path"));
    }

    let method = HttpMethod::parse(method)
        .ok_or_else(|| ParseError::invalid(format!("Invalid method: {}", method)))?;

    if !path.starts_with('/') {
        return Err(ParseError::invalid(format!("Path must start with '/': {}", path)));
    }

    Ok(method)
}

/// Checks the `in=` value of a parameter.
pub fn parameter_location(value: Option<&str>) -> Result<ParameterLocation> {
    match value {
        None | Some("") => Err(ParseError::invalid("Parameter location (in) is required")),
        Some(v) => ParameterLocation::parse(v)
            .ok_or_else(|| ParseError::invalid(format!("Invalid parameter location: {}", v))),
    }
}

pub fn validate_parameter(param: &Parameter) -> Result<()> {
    if param.name.is_empty() {
        return Err(ParseError::invalid("Parameter name is required"));
    }
    if param.location == ParameterLocation::Path && !param.required {
        return Err(ParseError::invalid(format!(
            "Path parameter must be required: {}",
            param.name
        )));
    }
    Ok(())
}

pub fn validate_request(body: &Body) -> Result<()> {
    validate_body(body)
}

pub fn validate_response(status: &str, body: &Body) -> Result<()> {
    if !is_status_code(status) {
        return Err(ParseError::invalid(format!("Invalid status code: {}", status)));
    }
    validate_body(body)
}

/// `default`, a concrete code (`404`) or a range (`2XX`).
fn is_status_code(status: &str) -> bool {
    if status == "default" {
        return true;
    }

    match status.as_bytes() {
        [first, rest @ ..] if rest.len() == 2 && (b'1'..=b'5').contains(first) => {
            rest.iter().all(u8::is_ascii_digit) || rest == b"XX"
        }
        _ => false,
    }
}

fn validate_body(body: &Body) -> Result<()> {
    if body.content.is_empty() {
        return Err(ParseError::invalid("Body has no content"));
    }
    for (content_type, content) in &body.content {
        validate_content(content_type, content)?;
    }
    Ok(())
}

fn validate_content(content_type: &str, content: &Content) -> Result<()> {
    let is_media_type = content_type
        .split_once('/')
        .is_some_and(|(kind, sub)| !kind.is_empty() && !sub.is_empty());
    if !is_media_type {
        return Err(ParseError::invalid(format!("Invalid content type: {}", content_type)));
    }

    match content {
        Content::Example(literal) if literal.is_empty() => {
            Err(ParseError::invalid("Example payload is empty"))
        }
        Content::Example(_) => Ok(()),
        Content::Schema(schema) => {
            if content_type == OCTET_STREAM && *schema != Schema::binary() {
                return Err(ParseError::invalid(format!(
                    "{} content must be a binary string",
                    OCTET_STREAM
                )));
            }
            validate_schema(schema)
        }
    }
}

fn validate_schema(schema: &Schema) -> Result<()> {
    match schema.type_name() {
        None | Some("") => Err(ParseError::invalid("Schema has no type")),
        Some("object") if schema.properties.is_none() => {
            Err(ParseError::invalid("Object schema has no properties"))
        }
        Some("array") => match &schema.items {
            Some(items) if schema.properties.is_none() => validate_schema(items),
            _ => Err(ParseError::invalid("Array schema needs exactly one items schema")),
        },
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Property;

    fn param(name: &str, location: ParameterLocation, required: bool) -> Parameter {
        Parameter {
            name: name.to_string(),
            location,
            required,
            schema: Property::default(),
        }
    }

    #[test]
    fn test_validate_path_accepts_known_methods() {
        assert_eq!(validate_path("get", "/users"), Ok(HttpMethod::Get));
        assert_eq!(validate_path("delete", "/users/{id}"), Ok(HttpMethod::Delete));
    }

    #[test]
    fn test_validate_path_failures() {
        assert!(matches!(
            validate_path("", ""),
            Err(ParseError::MalformedDirective(_))
        ));
        assert!(matches!(
            validate_path("get", ""),
            Err(ParseError::MalformedDirective(_))
        ));
        assert_eq!(
            validate_path("fetch", "/users"),
            Err(ParseError::invalid("Invalid method: fetch"))
        );
        assert!(matches!(
            validate_path("get", "users"),
            Err(ParseError::ValidationFailure(_))
        ));
    }

    #[test]
    fn test_parameter_location() {
        assert_eq!(parameter_location(Some("cookie")), Ok(ParameterLocation::Cookie));
        assert!(parameter_location(None).is_err());
        assert_eq!(
            parameter_location(Some("body")),
            Err(ParseError::invalid("Invalid parameter location: body"))
        );
    }

    #[test]
    fn test_validate_parameter() {
        assert!(validate_parameter(&param("id", ParameterLocation::Path, true)).is_ok());
        assert!(validate_parameter(&param("q", ParameterLocation::Query, false)).is_ok());
        assert!(validate_parameter(&param("", ParameterLocation::Query, false)).is_err());
        assert_eq!(
            validate_parameter(&param("id", ParameterLocation::Path, false)),
            Err(ParseError::invalid("Path parameter must be required: id"))
        );
    }

    #[test]
    fn test_status_codes() {
        for status in ["200", "404", "default", "2XX", "5XX", "201"] {
            assert!(is_status_code(status), "status: {}", status);
        }
        for status in ["", "20", "600", "abc", "2X0", "20X", "OK", "2000", "X00"] {
            assert!(!is_status_code(status), "status: {}", status);
        }
    }

    #[test]
    fn test_validate_response_content() {
        let ok = Body::single("application/json", Content::Schema(Schema::object()));
        assert!(validate_response("200", &ok).is_ok());
        assert!(validate_response("twohundred", &ok).is_err());

        let bad_type = Body::single("json", Content::Schema(Schema::object()));
        assert!(validate_response("200", &bad_type).is_err());

        let untyped = Body::single("application/json", Content::Schema(Schema::default()));
        assert_eq!(
            validate_response("200", &untyped),
            Err(ParseError::invalid("Schema has no type"))
        );
    }

    #[test]
    fn test_octet_stream_must_be_binary() {
        let binary = Body::single(OCTET_STREAM, Content::Schema(Schema::binary()));
        assert!(validate_request(&binary).is_ok());

        let object = Body::single(OCTET_STREAM, Content::Schema(Schema::object()));
        assert!(validate_request(&object).is_err());
    }

    #[test]
    fn test_array_schema_shape() {
        let array = Schema::array(Schema::object());
        let body = Body::single("application/json", Content::Schema(array.clone()));
        assert!(validate_request(&body).is_ok());

        let broken = Schema {
            properties: Some(Default::default()),
            ..array
        };
        let body = Body::single("application/json", Content::Schema(broken));
        assert!(validate_request(&body).is_err());
    }

    #[test]
    fn test_empty_body_is_rejected() {
        assert!(validate_request(&Body::default()).is_err());
    }
}
