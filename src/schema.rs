//! Read-only accessors over schema nodes plus the closed dispatch enum.
//!
//! Schema nodes are plain `serde_json::Value` trees; this crate never mutates
//! them. Dispatch over a node is a closed tagged enum, not a string lookup:
//! unknown or compound `type` values are a construction-time error.

use serde_json::Value;

use crate::error::FormError;

/// Which combinator keyword a variant node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKey {
    AnyOf,
    OneOf,
    AllOf,
}

impl VariantKey {
    pub fn as_str(self) -> &'static str {
        match self {
            VariantKey::AnyOf => "anyOf",
            VariantKey::OneOf => "oneOf",
            VariantKey::AllOf => "allOf",
        }
    }
}

/// Closed set of constructible node kinds, in dispatch order: `enum` wins
/// over combinators, combinators win over `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Enum,
    Variant(VariantKey),
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

/// Classify a schema node, first match wins.
pub fn classify(node: &Value) -> Result<NodeKind, FormError> {
    if node.get("enum").is_some() {
        return Ok(NodeKind::Enum);
    }
    for (key, kind) in [
        ("anyOf", VariantKey::AnyOf),
        ("oneOf", VariantKey::OneOf),
        ("allOf", VariantKey::AllOf),
    ] {
        if node.get(key).is_some() {
            return Ok(NodeKind::Variant(kind));
        }
    }

    let ty = match node.get("type") {
        None => {
            return Err(FormError::InvalidType {
                found: "no type information for a non-enum schema".to_string(),
            });
        }
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            // Arrays of types (and anything else non-string) are out of scope.
            return Err(FormError::InvalidType {
                found: other.to_string(),
            });
        }
    };

    match ty {
        "object" => Ok(NodeKind::Object),
        "array" => Ok(NodeKind::Array),
        "string" => Ok(NodeKind::String),
        "number" => Ok(NodeKind::Number),
        "integer" => Ok(NodeKind::Integer),
        "boolean" => Ok(NodeKind::Boolean),
        "null" => Ok(NodeKind::Null),
        other => Err(FormError::InvalidType {
            found: format!("\"{other}\""),
        }),
    }
}

// ------------------------------ Accessors --------------------------------- //

pub fn title(node: &Value) -> Option<&str> {
    node.get("title").and_then(Value::as_str)
}

/// A node's `title`, falling back to the label inherited from the parent
/// (the property name for object children).
pub fn display_label<'a>(node: &'a Value, label: Option<&'a str>) -> Option<&'a str> {
    title(node).or(label)
}

pub fn default_value(node: &Value) -> Option<&Value> {
    node.get("default")
}

pub fn const_value(node: &Value) -> Option<&Value> {
    node.get("const")
}

pub fn pattern(node: &Value) -> Option<&str> {
    node.get("pattern").and_then(Value::as_str)
}

pub fn minimum(node: &Value) -> Option<f64> {
    node.get("minimum").and_then(Value::as_f64)
}

pub fn maximum(node: &Value) -> Option<f64> {
    node.get("maximum").and_then(Value::as_f64)
}

pub fn min_items(node: &Value) -> usize {
    node.get("minItems").and_then(Value::as_u64).unwrap_or(0) as usize
}

pub fn max_items(node: &Value) -> Option<usize> {
    node.get("maxItems").and_then(Value::as_u64).map(|n| n as usize)
}
