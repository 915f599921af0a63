//! The form facade: owns the schema, the compiled root element, and the
//! validation choke points around whole-document reads and writes.

use serde_json::Value;

use jsonschema::Validator;

use crate::compile::{self, FormElement};
use crate::config::FormConfig;
use crate::error::FormError;
use crate::oracle;
use crate::ui::{ChangeHandler, Observer, Stack, WidgetHandle};

pub struct Form {
    schema: Value,
    validator: Validator,
    root: FormElement,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("schema", &self.schema)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Form {
    pub fn new(schema: Value) -> Result<Self, FormError> {
        Self::with_config(schema, FormConfig::default())
    }

    /// Validate the schema against the Draft-07 meta-schema, then compile
    /// the whole element tree. Fails fast: a construction error leaves no
    /// partial widget tree behind.
    pub fn with_config(schema: Value, config: FormConfig) -> Result<Self, FormError> {
        oracle::validate_meta(&schema)?;
        let validator = oracle::build_validator(&schema)?;
        let root = compile::compile(&schema, None, true, &config)?;
        Ok(Self {
            schema,
            validator,
            root,
        })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Snapshot the current form state as schema-conformant data. The
    /// produced value is re-validated against the schema before it is
    /// returned, as a defensive double-check.
    pub fn data(&self) -> Result<Value, FormError> {
        let data = self.root.get()?;
        oracle::check(&self.validator, &data, "data getter")?;
        Ok(data)
    }

    /// Push a whole document into the form. The input is validated before
    /// any widget state is mutated; a rejected value changes nothing.
    pub fn set_data(&self, value: &Value) -> Result<(), FormError> {
        oracle::check(&self.validator, value, "data setter")?;
        self.root.set(value)
    }

    /// Restore every element to its schema default or zero value.
    pub fn reset(&self) -> Result<(), FormError> {
        self.root.reset()
    }

    /// Register a change handler across the whole element tree. Array pool
    /// children created after this call pick the subscription up through the
    /// per-array observer replay.
    pub fn observe(
        &self,
        handler: ChangeHandler,
        names: Option<String>,
        event_type: Option<String>,
    ) {
        let mut observer = Observer::new(handler);
        observer.names = names;
        if let Some(event_type) = event_type {
            observer.event_type = event_type;
        }
        self.root.observe(&observer);
    }

    /// The fully composed widget tree, for handing to a display surface.
    pub fn widget(&self) -> WidgetHandle {
        WidgetHandle::Stack(Stack::vertical(self.root.widgets()))
    }

    pub fn root(&self) -> &FormElement {
        &self.root
    }
}
