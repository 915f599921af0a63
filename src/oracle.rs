//! Validator oracle backed by the `jsonschema` crate.
//!
//! Validation happens at four defined points: once against the Draft-07
//! meta-schema at facade construction, defensively on the `data` getter,
//! on the `data` setter before any widget is touched, and per-alternative
//! inside the variant setter. Validators are compiled once and held; the
//! meta-schema ships embedded with `additionalProperties: false` patched
//! onto its top level so unknown top-level schema keywords are rejected.

use jsonschema::{Draft, Validator};
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::{FormError, ValidationViolations, Violation};

const DRAFT07_META: &str = include_str!("../schemas/draft07.json");

static META_VALIDATOR: Lazy<Result<Validator, String>> = Lazy::new(|| {
    let mut meta: Value =
        serde_json::from_str(DRAFT07_META).map_err(|e| format!("embedded meta-schema: {e}"))?;
    if let Some(obj) = meta.as_object_mut() {
        obj.insert("additionalProperties".to_string(), Value::Bool(false));
    }
    let mut opts = jsonschema::options();
    opts.with_draft(Draft::Draft7);
    opts.build(&meta).map_err(|e| e.to_string())
});

/// Compile a Draft-07 validator for a schema node.
pub fn build_validator(schema: &Value) -> Result<Validator, FormError> {
    let mut opts = jsonschema::options();
    opts.with_draft(Draft::Draft7);
    opts.build(schema)
        .map_err(|e| FormError::ValidatorBuild { reason: e.to_string() })
}

/// Validate `instance` against a compiled validator, collecting every
/// violation with its instance and schema paths.
pub fn check(validator: &Validator, instance: &Value, context: &str) -> Result<(), FormError> {
    let violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(FormError::SchemaValidation {
            context: context.to_string(),
            violations: ValidationViolations::new(violations),
        })
    }
}

/// Cheap accept/reject probe; used by the variant setter to pick a branch.
pub fn accepts(validator: &Validator, instance: &Value) -> bool {
    validator.is_valid(instance)
}

/// Validate a schema document against the patched Draft-07 meta-schema.
pub fn validate_meta(schema: &Value) -> Result<(), FormError> {
    let meta = META_VALIDATOR
        .as_ref()
        .map_err(|reason| FormError::ValidatorBuild { reason: reason.clone() })?;
    check(meta, schema, "schema against Draft-07 meta-schema")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_schema_passes_meta_validation() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "price": { "type": "number", "minimum": 0 }
            },
            "required": ["name"]
        });
        validate_meta(&schema).unwrap();
    }

    #[test]
    fn unknown_top_level_keyword_is_rejected() {
        let schema = json!({ "type": "object", "propertiess": {} });
        let err = validate_meta(&schema).unwrap_err();
        assert!(matches!(err, FormError::SchemaValidation { .. }));
    }

    #[test]
    fn bad_type_value_is_rejected_by_meta() {
        let schema = json!({ "type": "strng" });
        assert!(validate_meta(&schema).is_err());
    }

    #[test]
    fn check_reports_instance_paths() {
        let validator = build_validator(&json!({
            "type": "object",
            "properties": { "n": { "type": "integer", "minimum": 2 } }
        }))
        .unwrap();
        let err = check(&validator, &json!({ "n": 1 }), "test").unwrap_err();
        match err {
            FormError::SchemaValidation { violations, .. } => {
                assert!(!violations.is_empty());
                assert_eq!(violations.violations()[0].instance_path, "/n");
            }
            other => panic!("expected SchemaValidation, got {other}"),
        }
    }

    #[test]
    fn accepts_probes_without_allocating_errors() {
        let validator = build_validator(&json!({ "type": "integer" })).unwrap();
        assert!(accepts(&validator, &json!(5)));
        assert!(!accepts(&validator, &json!("five")));
    }
}
