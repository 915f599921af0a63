//! Error taxonomy for form construction and data access.
//!
//! Construction-time kinds (`MissingVariantTitle`, `MissingItemsSchema`,
//! `MissingBooleanTitle`, `InvalidType`, `InvalidPattern`, `ValidatorBuild`)
//! abort the whole facade build; no partial widget tree is exposed.
//! Runtime kinds (`SchemaValidation`, `PatternMismatch`) propagate from the
//! single get/set operation that raised them and leave sibling elements
//! untouched.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    /// The schema itself, or a value on the data get/set path, failed
    /// validation against the governing schema.
    #[error("validation failed ({context}):\n{violations}")]
    SchemaValidation {
        /// Which validation point raised this (meta-schema, data getter, ...).
        context: String,
        violations: ValidationViolations,
    },

    /// The jsonschema crate could not compile a validator for a subschema.
    #[error("cannot build validator: {reason}")]
    ValidatorBuild { reason: String },

    /// An anyOf/oneOf/allOf alternative carries no `title` to select it by.
    #[error("schemas within anyOf/oneOf/allOf need to set the title field")]
    MissingVariantTitle,

    /// An array schema without an `items` subschema.
    #[error("expecting 'items' key for 'array' type")]
    MissingItemsSchema,

    /// A boolean schema with neither its own `title` nor an inherited label;
    /// the checkbox folds the title into itself, so it cannot be anonymous.
    #[error("boolean schemas need a title, either their own or an inherited label")]
    MissingBooleanTitle,

    /// `type` is missing, or a list of types, or not one of the seven
    /// recognized type strings.
    #[error("expecting a single recognized type string, got {found}")]
    InvalidType { found: String },

    /// A string schema's `pattern` is not a valid regex.
    #[error("invalid regex in 'pattern': {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A string value does not full-match the schema's `pattern`. Raised
    /// symmetrically from both the getter and the setter.
    #[error("value '{value}' does not match the specified pattern '{pattern}'")]
    PatternMismatch { value: String, pattern: String },
}

/// A single validation violation with structured context, as reported by the
/// validator oracle.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_names_the_instance_path() {
        let v = Violation {
            instance_path: "/prices/0".to_string(),
            schema_path: "/properties/prices/items/minimum".to_string(),
            message: "0 is less than the minimum of 1".to_string(),
        };
        let s = v.to_string();
        assert!(s.contains("/prices/0"));
        assert!(s.contains("minimum"));
    }

    #[test]
    fn root_violation_display_says_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/type".to_string(),
            message: "\"x\" is not of type \"object\"".to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }
}
