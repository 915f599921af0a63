//! Variant constructor for anyOf/oneOf/allOf: a titled-alternative selector
//! over eagerly built children, exactly one displayed at a time.
//!
//! All three combinator keywords share this constructor; oneOf/allOf get no
//! upfront cross-alternative checking beyond what the validator oracle
//! reports when data is read or written.

use std::cell::Cell;
use std::rc::Rc;

use jsonschema::Validator;
use serde_json::Value;

use crate::config::FormConfig;
use crate::error::{FormError, ValidationViolations, Violation};
use crate::oracle;
use crate::schema::VariantKey;
use crate::ui::{Control, Observer, Stack, WidgetHandle};

use super::{compile, FormElement};

pub struct VariantElement {
    key: VariantKey,
    /// Alternative titles, selector options in declaration order.
    names: Vec<String>,
    /// One pre-built child per alternative; switching swaps displayed
    /// widgets in place and never rebuilds.
    children: Vec<FormElement>,
    /// One compiled validator per alternative, probed by the setter.
    validators: Vec<Validator>,
    selector: Control,
    /// Index of the displayed alternative, kept in sync by the selector's
    /// own change handler.
    active: Rc<Cell<usize>>,
    widgets: Vec<WidgetHandle>,
}

impl VariantElement {
    /// Delegates to the active alternative only.
    pub fn get(&self) -> Result<Value, FormError> {
        self.children[self.active.get()].get()
    }

    /// Probe each alternative's schema in declaration order and hand the
    /// value to the first one that accepts it. No alternative accepting is
    /// an error, not a silent no-op.
    pub fn set(&self, value: &Value) -> Result<(), FormError> {
        for (i, validator) in self.validators.iter().enumerate() {
            if oracle::accepts(validator, value) {
                self.selector.set_value(Value::String(self.names[i].clone()));
                return self.children[i].set(value);
            }
        }

        let violations: Vec<Violation> = self
            .validators
            .iter()
            .zip(&self.names)
            .enumerate()
            .filter_map(|(i, (validator, name))| {
                validator.iter_errors(value).next().map(|e| Violation {
                    instance_path: e.instance_path.to_string(),
                    schema_path: format!("/{}/{i}", self.key.as_str()),
                    message: format!("{name}: {e}"),
                })
            })
            .collect();
        Err(FormError::SchemaValidation {
            context: format!("no {} alternative accepts the value", self.key.as_str()),
            violations: ValidationViolations::new(violations),
        })
    }

    /// Select the first alternative again and reset every child.
    pub fn reset(&self) -> Result<(), FormError> {
        for child in &self.children {
            child.reset()?;
        }
        if let Some(first) = self.names.first() {
            self.selector.set_value(Value::String(first.clone()));
        }
        Ok(())
    }

    /// Fan out to the selector and to every alternative child, active or
    /// not, so switching later does not lose subscriptions.
    pub fn observe(&self, observer: &Observer) {
        self.selector.observe(observer.clone());
        for child in &self.children {
            child.observe(observer);
        }
    }

    pub fn widgets(&self) -> Vec<WidgetHandle> {
        self.widgets.clone()
    }

    pub fn active_name(&self) -> &str {
        &self.names[self.active.get()]
    }

    /// Switch alternatives by title, as the selector widget would.
    pub fn select(&self, name: &str) {
        self.selector.set_value(Value::String(name.to_string()));
    }
}

pub fn construct(
    schema: &Value,
    key: VariantKey,
    config: &FormConfig,
) -> Result<FormElement, FormError> {
    let alternatives = schema
        .get(key.as_str())
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut names = Vec::with_capacity(alternatives.len());
    let mut children = Vec::with_capacity(alternatives.len());
    let mut validators = Vec::with_capacity(alternatives.len());
    for alt in &alternatives {
        let Some(title) = alt.get("title").and_then(Value::as_str) else {
            return Err(FormError::MissingVariantTitle);
        };
        // Duplicate titles are a documented ambiguity: selection resolves to
        // the first matching name, nothing disambiguates them here.
        names.push(title.to_string());
        children.push(compile(alt, None, false, config)?);
        validators.push(oracle::build_validator(alt)?);
    }

    let selector = Control::dropdown(names.iter().map(|n| Value::String(n.clone())).collect());

    let mut initial = vec![WidgetHandle::Control(selector.clone())];
    initial.extend(children.first().map(FormElement::widgets).unwrap_or_default());
    let container = Stack::vertical(initial);

    let active = Rc::new(Cell::new(0usize));
    {
        // The swap handler touches only the container and the active index,
        // never the element itself, so a set() in progress cannot deadlock
        // on re-entry when it moves the selector.
        let names = names.clone();
        let child_widgets: Vec<Vec<WidgetHandle>> =
            children.iter().map(FormElement::widgets).collect();
        let selector_handle = selector.clone();
        let container = container.clone();
        let active = active.clone();
        selector.observe(Observer::new(Rc::new(move |_| {
            let selected = selector_handle.value();
            let Some(idx) = names
                .iter()
                .position(|n| Some(n.as_str()) == selected.as_str())
            else {
                return;
            };
            active.set(idx);
            let mut shown = vec![WidgetHandle::Control(selector_handle.clone())];
            shown.extend(child_widgets[idx].iter().cloned());
            container.set_children(shown);
        })));
    }

    Ok(FormElement::Variant(VariantElement {
        key,
        names,
        children,
        validators,
        selector,
        active,
        widgets: vec![WidgetHandle::Stack(container)],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(schema: serde_json::Value) -> FormElement {
        compile(&schema, None, true, &FormConfig::default()).unwrap()
    }

    fn variant_schema() -> serde_json::Value {
        json!({
            "anyOf": [
                { "title": "A", "type": "integer" },
                { "title": "B", "type": "string" }
            ]
        })
    }

    #[test]
    fn untitled_alternative_fails_construction() {
        let err = compile(
            &json!({ "anyOf": [{ "type": "integer" }] }),
            None,
            true,
            &FormConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FormError::MissingVariantTitle));
    }

    #[test]
    fn setter_selects_the_first_accepting_alternative() {
        let element = build(variant_schema());
        let variant = element.as_variant().unwrap();

        element.set(&json!(5)).unwrap();
        assert_eq!(variant.active_name(), "A");
        assert_eq!(element.get().unwrap(), json!(5));

        element.set(&json!("x")).unwrap();
        assert_eq!(variant.active_name(), "B");
        assert_eq!(element.get().unwrap(), json!("x"));
    }

    #[test]
    fn rejected_value_raises_instead_of_soft_failing() {
        let element = build(variant_schema());
        let err = element.set(&json!(true)).unwrap_err();
        assert!(matches!(err, FormError::SchemaValidation { .. }));
        // The active alternative is untouched by the failed set.
        assert_eq!(element.as_variant().unwrap().active_name(), "A");
    }

    #[test]
    fn switching_swaps_displayed_widgets_in_place() {
        let element = build(variant_schema());
        let variant = element.as_variant().unwrap();
        let container = match &element.widgets()[0] {
            WidgetHandle::Stack(s) => s.clone(),
            _ => panic!("expected the variant container stack"),
        };
        let shown_for_a = container.children().len();

        variant.select("B");
        assert_eq!(variant.active_name(), "B");
        // Selector plus alternative B's widgets, replaced in place.
        assert_eq!(container.children().len(), shown_for_a);
    }

    #[test]
    fn getter_ignores_inactive_alternatives() {
        let element = build(variant_schema());
        element.set(&json!(3)).unwrap();
        let variant = element.as_variant().unwrap();
        variant.select("B");
        // Active child is the string alternative with its own (empty) state.
        assert_eq!(element.get().unwrap(), json!(""));
    }

    #[test]
    fn one_of_and_all_of_reuse_the_same_constructor() {
        for key in ["oneOf", "allOf"] {
            let element = build(json!({
                key: [
                    { "title": "N", "type": "number" },
                    { "title": "S", "type": "string" }
                ]
            }));
            element.set(&json!(1.5)).unwrap();
            assert_eq!(element.get().unwrap(), json!(1.5));
        }
    }

    #[test]
    fn observers_survive_alternative_switching() {
        use std::cell::Cell;
        let element = build(variant_schema());
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        element.observe(&Observer::new(Rc::new(move |_| hits2.set(hits2.get() + 1))));

        // Registered while A is active; switching to B and editing it must
        // still notify.
        element.as_variant().unwrap().select("B");
        let before = hits.get();
        element.set(&json!("later")).unwrap();
        assert!(hits.get() > before);
    }

    #[test]
    fn nested_variant_inside_object_round_trips() {
        let element = build(json!({
            "type": "object",
            "properties": {
                "value": {
                    "anyOf": [
                        { "title": "Count", "type": "integer" },
                        { "title": "Name", "type": "string" }
                    ]
                }
            }
        }));
        element.set(&json!({ "value": "deep" })).unwrap();
        assert_eq!(element.get().unwrap(), json!({ "value": "deep" }));
    }
}
