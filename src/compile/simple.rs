//! Constructors for the leaf kinds: string, number, integer, boolean, enum.
//!
//! Each binds exactly one primitive input control. `const` short-circuits to
//! a constant element with no UI surface at all.

use regex::Regex;
use serde_json::Value;

use crate::config::FormConfig;
use crate::error::FormError;
use crate::schema;
use crate::ui::{self, Control, Observer, Stack, WidgetHandle};

use super::{ConstantElement, FormElement};

/// A single-control leaf element.
pub struct SimpleElement {
    control: Control,
    widgets: Vec<WidgetHandle>,
    /// Anchored regex plus the schema's original pattern text, strings only.
    /// Enforced symmetrically on both the getter and the setter.
    pattern: Option<(Regex, String)>,
    reset_value: Value,
}

impl SimpleElement {
    pub fn get(&self) -> Result<Value, FormError> {
        let value = self.control.value();
        self.check_pattern(&value)?;
        Ok(value)
    }

    pub fn set(&self, value: &Value) -> Result<(), FormError> {
        self.check_pattern(value)?;
        self.control.set_value(value.clone());
        Ok(())
    }

    pub fn reset(&self) -> Result<(), FormError> {
        self.control.set_value(self.reset_value.clone());
        Ok(())
    }

    pub fn observe(&self, observer: &Observer) {
        self.control.observe(observer.clone());
    }

    pub fn widgets(&self) -> Vec<WidgetHandle> {
        self.widgets.clone()
    }

    fn check_pattern(&self, value: &Value) -> Result<(), FormError> {
        let Some((regex, pattern)) = &self.pattern else {
            return Ok(());
        };
        let text = value.as_str().unwrap_or("");
        if regex.is_match(text) {
            Ok(())
        } else {
            Err(FormError::PatternMismatch {
                value: text.to_string(),
                pattern: pattern.clone(),
            })
        }
    }
}

/// Compose the control with its label, if any. The label sits above or
/// beside the input per configuration.
fn labeled(
    control: Control,
    schema: &Value,
    label: Option<&str>,
    config: &FormConfig,
) -> Vec<WidgetHandle> {
    match schema::display_label(schema, label) {
        None => vec![WidgetHandle::Control(control)],
        Some(text) => {
            let children = vec![WidgetHandle::label(text), WidgetHandle::Control(control)];
            let stack = if config.vertically_place_labels {
                Stack::vertical(children)
            } else {
                Stack::horizontal(children)
            };
            vec![WidgetHandle::Stack(stack)]
        }
    }
}

fn constant(value: &Value) -> Result<FormElement, FormError> {
    Ok(FormElement::Constant(ConstantElement::new(value.clone())))
}

// ------------------------------- Strings ----------------------------------- //

pub fn construct_string(
    schema: &Value,
    label: Option<&str>,
    config: &FormConfig,
) -> Result<FormElement, FormError> {
    if let Some(fixed) = schema::const_value(schema) {
        return constant(fixed);
    }

    // Full-string match semantics: anchor the schema's pattern.
    let pattern = match schema::pattern(schema) {
        None => None,
        Some(p) => {
            let anchored =
                Regex::new(&format!("^(?:{p})$")).map_err(|e| FormError::InvalidPattern {
                    pattern: p.to_string(),
                    reason: e.to_string(),
                })?;
            Some((anchored, p.to_string()))
        }
    };

    let reset_value = schema::default_value(schema)
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()));

    let control = Control::text();
    control.set_value(reset_value.clone());

    Ok(FormElement::Simple(SimpleElement {
        widgets: labeled(control.clone(), schema, label, config),
        control,
        pattern,
        reset_value,
    }))
}

// --------------------------- Numbers / integers ---------------------------- //

pub fn construct_number(
    schema: &Value,
    label: Option<&str>,
    integer: bool,
    config: &FormConfig,
) -> Result<FormElement, FormError> {
    if let Some(fixed) = schema::const_value(schema) {
        return constant(fixed);
    }

    let min = schema::minimum(schema);
    let max = schema::maximum(schema);

    // Both bounds: the control is naturally bounded and its own clamping is
    // authoritative. A single bound exceeds the primitive's capability, so
    // the compiler compensates with a live clamp handler below.
    let bounds = match (min, max) {
        (Some(lo), Some(hi)) => Some((lo, hi)),
        _ => None,
    };
    let control = Control::number(integer, bounds, config.use_sliders && bounds.is_some());

    if bounds.is_none() && (min.is_some() || max.is_some()) {
        let clamp_target = control.clone();
        control.observe(Observer::new(std::rc::Rc::new(move |event| {
            let clamped = ui::clamp_value(integer, &event.new, min, max);
            if clamped != event.new {
                clamp_target.set_value(clamped);
            }
        })));
    }

    // Zero value, overridden by a bound when zero falls outside it.
    let reset_value = match schema::default_value(schema) {
        Some(d) => d.clone(),
        None => ui::clamp_value(integer, &Value::from(0), min, max),
    };
    control.set_value(reset_value.clone());

    Ok(FormElement::Simple(SimpleElement {
        widgets: labeled(control.clone(), schema, label, config),
        control,
        pattern: None,
        reset_value,
    }))
}

// -------------------------------- Booleans --------------------------------- //

pub fn construct_boolean(
    schema: &Value,
    label: Option<&str>,
    _config: &FormConfig,
) -> Result<FormElement, FormError> {
    if let Some(fixed) = schema::const_value(schema) {
        return constant(fixed);
    }

    // The title folds into the checkbox itself, so an anonymous boolean has
    // no way to describe itself.
    let title = match schema::display_label(schema, label) {
        Some(t) if !t.is_empty() => t,
        _ => return Err(FormError::MissingBooleanTitle),
    };

    let reset_value = schema::default_value(schema)
        .cloned()
        .unwrap_or(Value::Bool(false));
    let control = Control::checkbox(title);
    control.set_value(reset_value.clone());

    Ok(FormElement::Simple(SimpleElement {
        widgets: vec![WidgetHandle::Control(control.clone())],
        control,
        pattern: None,
        reset_value,
    }))
}

// --------------------------------- Enums ----------------------------------- //

pub fn construct_enum(
    schema: &Value,
    label: Option<&str>,
    config: &FormConfig,
) -> Result<FormElement, FormError> {
    let options: Vec<Value> = schema
        .get("enum")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    // Trivial enums have exactly one possible value: no widget, but the
    // value still shows up in the data snapshot.
    if options.len() == 1 {
        return constant(&options[0]);
    }

    let reset_value = match schema::default_value(schema) {
        Some(d) if options.contains(d) => d.clone(),
        _ => options.first().cloned().unwrap_or(Value::Null),
    };
    let control = Control::dropdown(options);
    control.set_value(reset_value.clone());

    Ok(FormElement::Simple(SimpleElement {
        widgets: labeled(control.clone(), schema, label, config),
        control,
        pattern: None,
        reset_value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn build(schema: serde_json::Value) -> FormElement {
        compile(&schema, None, false, &FormConfig::default()).unwrap()
    }

    #[test]
    fn string_default_applies_without_any_set() {
        let element = build(json!({ "type": "string", "default": "hi" }));
        assert_eq!(element.get().unwrap(), json!("hi"));
    }

    #[test]
    fn pattern_is_enforced_on_set() {
        let element = build(json!({ "type": "string", "pattern": "^[a-z]+$" }));
        element.set(&json!("abc")).unwrap();
        assert_eq!(element.get().unwrap(), json!("abc"));
        let err = element.set(&json!("ABC")).unwrap_err();
        assert!(matches!(err, FormError::PatternMismatch { .. }));
        // The failed set did not disturb the stored value.
        assert_eq!(element.get().unwrap(), json!("abc"));
    }

    #[test]
    fn pattern_is_enforced_on_get_too() {
        // Drive the widget directly, bypassing the element setter, the way a
        // user typing into the control would.
        let element = build(json!({ "type": "string", "pattern": "^[a-z]+$" }));
        match &element {
            FormElement::Simple(e) => e.control.set_value(json!("NOPE")),
            _ => unreachable!(),
        }
        let err = element.get().unwrap_err();
        assert!(matches!(err, FormError::PatternMismatch { .. }));
    }

    #[test]
    fn pattern_match_is_full_string_not_substring() {
        let element = build(json!({ "type": "string", "pattern": "[a-z]+" }));
        let err = element.set(&json!("abc123")).unwrap_err();
        assert!(matches!(err, FormError::PatternMismatch { .. }));
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let err = compile(
            &json!({ "type": "string", "pattern": "([" }),
            None,
            false,
            &FormConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FormError::InvalidPattern { .. }));
    }

    #[test]
    fn single_lower_bound_clamps_live() {
        let element = build(json!({ "type": "integer", "minimum": 3 }));
        element.set(&json!(1)).unwrap();
        // The clamp handler snapped the out-of-range input back to the bound.
        assert_eq!(element.get().unwrap(), json!(3));
        element.set(&json!(10)).unwrap();
        assert_eq!(element.get().unwrap(), json!(10));
    }

    #[test]
    fn zero_incompatible_bound_shapes_the_reset_value() {
        let element = build(json!({ "type": "number", "minimum": 1.5 }));
        assert_eq!(element.get().unwrap(), json!(1.5));
        let element = build(json!({ "type": "integer", "maximum": -2 }));
        assert_eq!(element.get().unwrap(), json!(-2));
    }

    #[test]
    fn doubly_bounded_integer_uses_intrinsic_clamping() {
        let element = build(json!({ "type": "integer", "minimum": 1, "maximum": 3 }));
        element.set(&json!(7)).unwrap();
        assert_eq!(element.get().unwrap(), json!(3));
    }

    #[test]
    fn boolean_without_any_title_fails_construction() {
        let err = compile(
            &json!({ "type": "boolean" }),
            None,
            false,
            &FormConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FormError::MissingBooleanTitle));
    }

    #[test]
    fn boolean_inherits_the_property_label() {
        let element = compile(
            &json!({ "type": "boolean" }),
            Some("enabled"),
            false,
            &FormConfig::default(),
        )
        .unwrap();
        element.set(&json!(true)).unwrap();
        assert_eq!(element.get().unwrap(), json!(true));
        // Exactly one widget: the checkbox itself, no separate label.
        assert_eq!(element.widgets().len(), 1);
    }

    #[test]
    fn enum_round_trips_the_selected_option() {
        let element = build(json!({ "enum": ["red", "green", "blue"], "default": "green" }));
        assert_eq!(element.get().unwrap(), json!("green"));
        element.set(&json!("blue")).unwrap();
        assert_eq!(element.get().unwrap(), json!("blue"));
    }

    #[test]
    fn single_option_enum_is_a_constant() {
        let element = build(json!({ "enum": ["only"] }));
        assert!(element.widgets().is_empty());
        assert_eq!(element.get().unwrap(), json!("only"));
    }

    #[test]
    fn simple_elements_fan_changes_out_to_observers() {
        let element = build(json!({ "type": "string" }));
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        element.observe(&Observer::new(Rc::new(move |_| hits2.set(hits2.get() + 1))));
        element.set(&json!("x")).unwrap();
        assert_eq!(hits.get(), 1);
    }
}
