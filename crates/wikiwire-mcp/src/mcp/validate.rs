//! Argument checks against a tool's advertised input schema, run before dispatch.
//!
//! Only the parts of JSON Schema our catalog actually emits are honored: `required`,
//! and `type` (string or array form) on top-level properties.

use rmcp::model::JsonObject;
use serde_json::Value;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("missing required argument `{0}`")]
    MissingRequired(String),
    #[error("argument `{name}` must be {expected}")]
    WrongType { name: String, expected: String },
    #[error("argument `{0}` must be non-empty")]
    Blank(String),
    #[error("{0}")]
    Malformed(String),
}

fn is_integral(v: &Value) -> bool {
    v.is_i64() || v.is_u64() || v.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn matches_type(v: &Value, ty: &str) -> bool {
    match ty {
        "string" => v.is_string(),
        "integer" => is_integral(v),
        "number" => v.is_number(),
        "boolean" => v.is_boolean(),
        "object" => v.is_object(),
        "array" => v.is_array(),
        "null" => v.is_null(),
        _ => true,
    }
}

fn declared_types(prop: &Value) -> Vec<&str> {
    match prop.get("type") {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(a)) => a.iter().filter_map(|v| v.as_str()).collect(),
        _ => Vec::new(),
    }
}

/// Check `args` against `schema` and return the arguments in the shape the typed
/// structs expect: `null` on an optional property means absent, and integral floats
/// (`5.0`) on integer properties become integers.
pub fn check_arguments(schema: &JsonObject, args: JsonObject) -> Result<JsonObject, ArgumentError> {
    let required: Vec<&str> = match schema.get("required") {
        Some(Value::Array(r)) => r.iter().filter_map(|v| v.as_str()).collect(),
        _ => Vec::new(),
    };
    for name in &required {
        match args.get(*name) {
            None | Some(Value::Null) => return Err(ArgumentError::MissingRequired(name.to_string())),
            Some(_) => {}
        }
    }

    let props = match schema.get("properties") {
        Some(Value::Object(p)) => Some(p),
        _ => None,
    };
    let mut out = JsonObject::new();
    for (name, value) in args {
        if value.is_null() && !required.contains(&name.as_str()) {
            continue;
        }
        let Some(prop) = props.and_then(|p| p.get(&name)) else {
            out.insert(name, value);
            continue;
        };
        let types = declared_types(prop);
        if !types.is_empty() && !types.iter().any(|t| matches_type(&value, t)) {
            return Err(ArgumentError::WrongType {
                expected: match types.as_slice() {
                    [one] => format!("of type {one}"),
                    many => format!("one of types {}", many.join(", ")),
                },
                name,
            });
        }
        let value = match value.as_f64() {
            Some(f) if types.contains(&"integer") && !value.is_i64() && !value.is_u64() => {
                Value::from(f as i64)
            }
            _ => value,
        };
        out.insert(name, value);
    }
    Ok(out)
}

/// Text arguments are passed upstream as given; only all-whitespace values are refused.
pub fn ensure_non_blank(name: &str, value: &str) -> Result<(), ArgumentError> {
    if value.trim().is_empty() {
        return Err(ArgumentError::Blank(name.to_string()));
    }
    Ok(())
}
