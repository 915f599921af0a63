//! Recursive schema-to-widget compiler.
//!
//! `compile` turns one schema node into a [`FormElement`]: a self-contained
//! bundle of getter/setter/resetter/observer-registration behavior plus the
//! ordered widget handles to compose into the parent layout. Elements nest
//! the way schema nodes nest; the element tree is built once and lives for
//! the facade's lifetime.
//!
//! Dispatch order, first match wins: `enum`, then `anyOf`/`oneOf`/`allOf`,
//! then a single `type` string. Everything else fails construction.
pub mod simple;
pub mod object;
pub mod array;
pub mod variant;

use serde_json::Value;

use crate::config::FormConfig;
use crate::error::FormError;
use crate::schema::{self, NodeKind};
use crate::ui::{Observer, WidgetHandle};

pub use array::ArrayElement;
pub use object::ObjectElement;
pub use simple::SimpleElement;
pub use variant::VariantElement;

// ----------------------------- Form elements ------------------------------- //

/// The compiled unit for one schema node. The four verbs (get, set, reset,
/// observe) dispatch over this closed set; there is no runtime type lookup.
pub enum FormElement {
    /// `const`, single-option enums, and `null`: a fixed literal, no widgets.
    Constant(ConstantElement),
    Simple(SimpleElement),
    Object(ObjectElement),
    Array(ArrayElement),
    Variant(VariantElement),
}

impl std::fmt::Debug for FormElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormElement::Constant(_) => f.write_str("FormElement::Constant"),
            FormElement::Simple(_) => f.write_str("FormElement::Simple"),
            FormElement::Object(_) => f.write_str("FormElement::Object"),
            FormElement::Array(_) => f.write_str("FormElement::Array"),
            FormElement::Variant(_) => f.write_str("FormElement::Variant"),
        }
    }
}

impl FormElement {
    /// Extract the current UI state as schema-shaped data.
    pub fn get(&self) -> Result<Value, FormError> {
        match self {
            FormElement::Constant(e) => Ok(e.value.clone()),
            FormElement::Simple(e) => e.get(),
            FormElement::Object(e) => e.get(),
            FormElement::Array(e) => e.get(),
            FormElement::Variant(e) => e.get(),
        }
    }

    /// Push an external, already-validated value into UI state.
    pub fn set(&self, value: &Value) -> Result<(), FormError> {
        match self {
            FormElement::Constant(_) => Ok(()),
            FormElement::Simple(e) => e.set(value),
            FormElement::Object(e) => e.set(value),
            FormElement::Array(e) => e.set(value),
            FormElement::Variant(e) => e.set(value),
        }
    }

    /// Restore the node's `default`, or its type-appropriate zero value.
    pub fn reset(&self) -> Result<(), FormError> {
        match self {
            FormElement::Constant(_) => Ok(()),
            FormElement::Simple(e) => e.reset(),
            FormElement::Object(e) => e.reset(),
            FormElement::Array(e) => e.reset(),
            FormElement::Variant(e) => e.reset(),
        }
    }

    /// Propagate a change subscription to every live descendant widget.
    /// Array elements additionally keep the observer for replay onto pool
    /// children activated later.
    pub fn observe(&self, observer: &Observer) {
        match self {
            FormElement::Constant(_) => {}
            FormElement::Simple(e) => e.observe(observer),
            FormElement::Object(e) => e.observe(observer),
            FormElement::Array(e) => e.observe(observer),
            FormElement::Variant(e) => e.observe(observer),
        }
    }

    /// Widget handles to compose into the parent layout, declaration order.
    pub fn widgets(&self) -> Vec<WidgetHandle> {
        match self {
            FormElement::Constant(_) => Vec::new(),
            FormElement::Simple(e) => e.widgets(),
            FormElement::Object(e) => e.widgets(),
            FormElement::Array(e) => e.widgets(),
            FormElement::Variant(e) => e.widgets(),
        }
    }

    pub fn as_array(&self) -> Option<&ArrayElement> {
        match self {
            FormElement::Array(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_variant(&self) -> Option<&VariantElement> {
        match self {
            FormElement::Variant(e) => Some(e),
            _ => None,
        }
    }
}

/// A fixed literal with no UI surface; the getter always returns the
/// literal, setter and resetter are no-ops.
pub struct ConstantElement {
    value: Value,
}

impl ConstantElement {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

// ------------------------------- Dispatch ---------------------------------- //

/// Compile one schema node. `label` is the name inherited from the parent
/// (the property name for object children); `root` suppresses the
/// collapsible wrapper around the top-level object or array.
pub fn compile(
    schema: &Value,
    label: Option<&str>,
    root: bool,
    config: &FormConfig,
) -> Result<FormElement, FormError> {
    match schema::classify(schema)? {
        NodeKind::Enum => simple::construct_enum(schema, label, config),
        NodeKind::Variant(key) => variant::construct(schema, key, config),
        NodeKind::Object => object::construct(schema, label, root, config),
        NodeKind::Array => array::construct(schema, label, root, config),
        NodeKind::String => simple::construct_string(schema, label, config),
        NodeKind::Number => simple::construct_number(schema, label, false, config),
        NodeKind::Integer => simple::construct_number(schema, label, true, config),
        NodeKind::Boolean => simple::construct_boolean(schema, label, config),
        NodeKind::Null => Ok(FormElement::Constant(ConstantElement::new(Value::Null))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(schema: serde_json::Value) -> FormElement {
        compile(&schema, None, true, &FormConfig::default()).unwrap()
    }

    #[test]
    fn null_elements_are_inert() {
        let element = build(json!({ "type": "null" }));
        assert_eq!(element.get().unwrap(), json!(null));
        assert!(element.widgets().is_empty());
        element.set(&json!(null)).unwrap();
        element.reset().unwrap();
    }

    #[test]
    fn unknown_type_fails_construction() {
        let err = compile(
            &json!({ "type": "decimal" }),
            None,
            true,
            &FormConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FormError::InvalidType { .. }));
    }

    #[test]
    fn set_then_get_is_identity_across_kinds() {
        let cases = [
            (json!({ "type": "string" }), json!("hello")),
            (json!({ "type": "integer" }), json!(42)),
            (json!({ "type": "number" }), json!(2.5)),
            (json!({ "type": "boolean", "title": "Flag" }), json!(true)),
            (
                json!({ "type": "object", "properties": { "a": { "type": "string" } } }),
                json!({ "a": "x" }),
            ),
            (
                json!({ "type": "array", "items": { "type": "integer" } }),
                json!([3, 1, 2]),
            ),
        ];
        for (schema, value) in cases {
            let element = build(schema.clone());
            element.set(&value).unwrap();
            assert_eq!(element.get().unwrap(), value, "round-trip for {schema}");
        }
    }

    #[test]
    fn const_has_no_widgets_and_fixed_getter() {
        let element = build(json!({ "type": "string", "const": "fixed" }));
        assert!(element.widgets().is_empty());
        assert_eq!(element.get().unwrap(), json!("fixed"));
        // Setter is a no-op on constants.
        element.set(&json!("fixed")).unwrap();
        assert_eq!(element.get().unwrap(), json!("fixed"));
    }
}
