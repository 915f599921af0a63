//! Object constructor: one child element per schema property.

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{self, FormConfig};
use crate::error::FormError;
use crate::schema;
use crate::ui::{Observer, Section, Stack, WidgetHandle};

use super::{compile, FormElement};

/// Children keyed by property name, held in display order (the pluggable
/// sorter's order, falling back to declaration order).
pub struct ObjectElement {
    children: IndexMap<String, FormElement>,
    widgets: Vec<WidgetHandle>,
}

impl ObjectElement {
    /// Mapping of property name to child getter result, in display order.
    /// Key order is presentational only; data equality ignores it.
    pub fn get(&self) -> Result<Value, FormError> {
        let mut map = serde_json::Map::new();
        for (name, child) in &self.children {
            map.insert(name.clone(), child.get()?);
        }
        Ok(Value::Object(map))
    }

    /// Apply present keys through the child setters and reset the rest, so a
    /// partial update clears omitted optional fields back to their defaults.
    pub fn set(&self, value: &Value) -> Result<(), FormError> {
        let map = value.as_object();
        for (name, child) in &self.children {
            match map.and_then(|m| m.get(name)) {
                Some(v) => child.set(v)?,
                None => child.reset()?,
            }
        }
        Ok(())
    }

    pub fn reset(&self) -> Result<(), FormError> {
        for child in self.children.values() {
            child.reset()?;
        }
        Ok(())
    }

    pub fn observe(&self, observer: &Observer) {
        for child in self.children.values() {
            child.observe(observer);
        }
    }

    pub fn widgets(&self) -> Vec<WidgetHandle> {
        self.widgets.clone()
    }

    pub fn children(&self) -> &IndexMap<String, FormElement> {
        &self.children
    }
}

pub fn construct(
    schema: &Value,
    label: Option<&str>,
    root: bool,
    cfg: &FormConfig,
) -> Result<FormElement, FormError> {
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    // preserve_order keeps the schema's declaration order; the sorter then
    // decides display order on top of it.
    let declared: Vec<String> = properties.keys().cloned().collect();
    let ordered = config::sorted_keys(cfg, &declared);

    let mut children = IndexMap::with_capacity(ordered.len());
    for name in ordered {
        let subschema = &properties[&name];
        let child = compile(subschema, Some(&name), false, cfg)?;
        children.insert(name, child);
    }

    let mut widget_list = Vec::new();
    for child in children.values() {
        widget_list.extend(child.widgets());
    }
    // The root object lays out flat; anything deeper folds into a collapsed
    // section titled by the schema or the inherited label.
    let widgets = if root {
        widget_list
    } else {
        let section = Section::collapsed(
            schema::display_label(schema, label),
            Stack::vertical(widget_list),
        );
        vec![WidgetHandle::Section(section)]
    };

    Ok(FormElement::Object(ObjectElement { children, widgets }))
}
