//! Array constructor: dynamic resizing over a pool of reusable children.
//!
//! Every child ever built stays in the pool; shrinking only deactivates.
//! Growing prefers a pooled-but-inactive child (resetting its stale state)
//! and compiles a fresh one only when the pool is exhausted, so expensive
//! subschemas are compiled at most `max observed size` times over the form's
//! lifetime. `active` holds the stable pool ids of the live entries in
//! display order; its length is the logical element size.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::config::FormConfig;
use crate::error::FormError;
use crate::schema;
use crate::ui::{Button, ChangeEvent, Observer, Section, Stack, WidgetHandle};

use super::{compile, FormElement};

pub struct ArrayElement {
    state: Rc<RefCell<ArrayState>>,
    widgets: Vec<WidgetHandle>,
}

struct ArrayState {
    items_schema: Value,
    config: FormConfig,
    min_items: usize,
    max_items: Option<usize>,
    default: Option<Value>,
    /// Every child ever constructed, indexed by stable pool id.
    pool: Vec<PoolEntry>,
    /// Ordered pool ids of the active entries; `len()` is `element_size`.
    active: Vec<usize>,
    /// Deactivated pool ids awaiting reuse.
    spare: Vec<usize>,
    /// Visible rows plus the trailing add button.
    list: Stack,
    add_button: Button,
    /// Kept for replay onto children constructed after registration.
    observers: Vec<Observer>,
}

struct PoolEntry {
    element: FormElement,
    /// The entry's widgets stacked with its remove/move-earlier/move-later
    /// controls.
    row: WidgetHandle,
}

impl ArrayElement {
    /// Ordered getter results of the active entries.
    pub fn get(&self) -> Result<Value, FormError> {
        let state = self.state.borrow();
        let mut out = Vec::with_capacity(state.active.len());
        for &id in &state.active {
            out.push(state.pool[id].element.get()?);
        }
        Ok(Value::Array(out))
    }

    /// Deactivate everything, then replay one add per input element and push
    /// the element's value through the fresh child. Reuse and stale-state
    /// resets fall out of the add path.
    pub fn set(&self, value: &Value) -> Result<(), FormError> {
        let values = value.as_array().cloned().unwrap_or_default();
        set_items(&self.state, &values)
    }

    /// Replay the schema `default` if there is one, otherwise shrink back to
    /// `minItems` freshly-reset entries.
    pub fn reset(&self) -> Result<(), FormError> {
        let default = self.state.borrow().default.clone();
        match default {
            Some(Value::Array(values)) => set_items(&self.state, &values),
            _ => {
                let min_items = self.state.borrow().min_items;
                deactivate_all(&self.state);
                for _ in 0..min_items {
                    add_entry(&self.state)?;
                }
                Ok(())
            }
        }
    }

    pub fn observe(&self, observer: &Observer) {
        let pool_len = {
            let mut state = self.state.borrow_mut();
            state.observers.push(observer.clone());
            state.pool.len()
        };
        // Register on every pooled child, inactive ones included: a child
        // reactivated later must already carry the subscription.
        for id in 0..pool_len {
            let state = self.state.borrow();
            state.pool[id].element.observe(observer);
        }
    }

    pub fn widgets(&self) -> Vec<WidgetHandle> {
        self.widgets.clone()
    }

    pub fn element_size(&self) -> usize {
        self.state.borrow().active.len()
    }

    pub fn pool_size(&self) -> usize {
        self.state.borrow().pool.len()
    }

    /// The add verb, as triggered by the add button. Returns whether an
    /// entry was actually added (`maxItems` refuses).
    pub fn add(&self) -> Result<bool, FormError> {
        add_entry(&self.state)
    }

    /// The remove verb at an active position (`minItems` refuses).
    pub fn remove_at(&self, index: usize) {
        let id = self.state.borrow().active.get(index).copied();
        if let Some(id) = id {
            remove_entry(&self.state, id);
        }
    }

    pub fn move_earlier(&self, index: usize) {
        let id = self.state.borrow().active.get(index).copied();
        if let Some(id) = id {
            move_entry(&self.state, id, -1);
        }
    }

    pub fn move_later(&self, index: usize) {
        let id = self.state.borrow().active.get(index).copied();
        if let Some(id) = id {
            move_entry(&self.state, id, 1);
        }
    }
}

pub fn construct(
    schema: &Value,
    label: Option<&str>,
    root: bool,
    config: &FormConfig,
) -> Result<FormElement, FormError> {
    let items_schema = match schema.get("items") {
        Some(items) => items.clone(),
        None => return Err(FormError::MissingItemsSchema),
    };

    let min_items = schema::min_items(schema);
    let max_items = schema::max_items(schema);
    let default = schema::default_value(schema).cloned();

    let add_button = Button::new("Add entry");
    let list = Stack::vertical(vec![WidgetHandle::Button(add_button.clone())]);

    let state = Rc::new(RefCell::new(ArrayState {
        items_schema,
        config: config.clone(),
        min_items,
        max_items,
        default: default.clone(),
        pool: Vec::new(),
        active: Vec::new(),
        spare: Vec::new(),
        list: list.clone(),
        add_button: add_button.clone(),
        observers: Vec::new(),
    }));

    {
        let weak = Rc::downgrade(&state);
        add_button.on_click(Rc::new(move || {
            if let Some(state) = weak.upgrade() {
                if let Err(err) = add_entry(&state) {
                    // Click callbacks have no error channel back to a caller.
                    eprintln!("jsonform: add entry failed: {err}");
                }
            }
        }));
    }

    // Front-load expensive recursive compiles at form-build time.
    let warm = min_items.max(config.preconstruct_array_items);
    for _ in 0..warm {
        let id = build_pool_entry(&state)?;
        state.borrow_mut().spare.push(id);
    }
    // Lowest ids reactivate first.
    state.borrow_mut().spare.reverse();

    for _ in 0..min_items {
        add_entry(&state)?;
    }

    if let Some(Value::Array(values)) = default {
        set_items(&state, &values)?;
    }

    let widgets = if root {
        vec![WidgetHandle::Stack(list)]
    } else {
        let section = Section::collapsed(
            schema::display_label(schema, label),
            Stack::vertical(vec![WidgetHandle::Stack(list)]),
        );
        vec![WidgetHandle::Section(section)]
    };

    Ok(FormElement::Array(ArrayElement { state, widgets }))
}

// ------------------------------ Pool plumbing ------------------------------ //

/// Compile a fresh child and wire its per-item controls. The entry's stable
/// pool id is captured directly in each button's callback, so no handler
/// ever scans sibling widgets to find out which row was clicked.
fn build_pool_entry(state: &Rc<RefCell<ArrayState>>) -> Result<usize, FormError> {
    let (items_schema, config, observers, id) = {
        let st = state.borrow();
        (
            st.items_schema.clone(),
            st.config.clone(),
            st.observers.clone(),
            st.pool.len(),
        )
    };

    let element = compile(&items_schema, None, false, &config)?;
    for obs in &observers {
        element.observe(obs);
    }

    let remove = Button::new("Remove");
    let earlier = Button::new("Move up");
    let later = Button::new("Move down");
    {
        let weak = Rc::downgrade(state);
        remove.on_click(Rc::new(move || {
            if let Some(state) = weak.upgrade() {
                remove_entry(&state, id);
            }
        }));
    }
    {
        let weak = Rc::downgrade(state);
        earlier.on_click(Rc::new(move || {
            if let Some(state) = weak.upgrade() {
                move_entry(&state, id, -1);
            }
        }));
    }
    {
        let weak = Rc::downgrade(state);
        later.on_click(Rc::new(move || {
            if let Some(state) = weak.upgrade() {
                move_entry(&state, id, 1);
            }
        }));
    }

    let mut row_children = element.widgets();
    row_children.push(WidgetHandle::Stack(Stack::horizontal(vec![
        WidgetHandle::Button(remove),
        WidgetHandle::Button(earlier),
        WidgetHandle::Button(later),
    ])));
    let row = WidgetHandle::Stack(Stack::vertical(row_children));

    state.borrow_mut().pool.push(PoolEntry { element, row });
    Ok(id)
}

fn add_entry(state: &Rc<RefCell<ArrayState>>) -> Result<bool, FormError> {
    {
        let st = state.borrow();
        if st.max_items.is_some_and(|max| st.active.len() == max) {
            return Ok(false);
        }
    }

    let reused = state.borrow_mut().spare.pop();
    let id = match reused {
        Some(id) => {
            // Clear whatever the entry held when it was last active.
            state.borrow().pool[id].element.reset()?;
            id
        }
        None => build_pool_entry(state)?,
    };

    let (sizes, observers) = {
        let mut st = state.borrow_mut();
        let before = st.active.len();
        st.active.push(id);
        rerender(&st);
        ((before, st.active.len()), st.observers.clone())
    };
    notify_size_change(&observers, sizes);
    Ok(true)
}

fn remove_entry(state: &Rc<RefCell<ArrayState>>, id: usize) {
    let (sizes, observers) = {
        let mut st = state.borrow_mut();
        if st.active.len() == st.min_items {
            return;
        }
        let Some(pos) = st.active.iter().position(|&a| a == id) else {
            return;
        };
        let before = st.active.len();
        st.active.remove(pos);
        // Preserved for reuse, never destroyed.
        st.spare.push(id);
        rerender(&st);
        ((before, st.active.len()), st.observers.clone())
    };
    notify_size_change(&observers, sizes);
}

/// Swap an entry with its neighbor; clamped at the ends, so moving the first
/// entry earlier (or the last later) is a no-op.
fn move_entry(state: &Rc<RefCell<ArrayState>>, id: usize, dir: isize) {
    let mut st = state.borrow_mut();
    let Some(pos) = st.active.iter().position(|&a| a == id) else {
        return;
    };
    let last = st.active.len() - 1;
    let target = pos.saturating_add_signed(dir).min(last);
    if target != pos {
        st.active.swap(pos, target);
        rerender(&st);
    }
}

fn deactivate_all(state: &Rc<RefCell<ArrayState>>) {
    let mut st = state.borrow_mut();
    while let Some(id) = st.active.pop() {
        st.spare.push(id);
    }
    // Reuse in ascending pool order for a stable layout.
    st.spare.sort_unstable_by(|a, b| b.cmp(a));
    rerender(&st);
}

fn set_items(state: &Rc<RefCell<ArrayState>>, values: &[Value]) -> Result<(), FormError> {
    deactivate_all(state);
    for value in values {
        if !add_entry(state)? {
            // Input was validated against the schema upstream, so hitting
            // maxItems here cannot drop data.
            break;
        }
        let id = state.borrow().active.last().copied();
        if let Some(id) = id {
            let st = state.borrow();
            st.pool[id].element.set(value)?;
        }
    }
    Ok(())
}

fn rerender(state: &ArrayState) {
    let mut children: Vec<WidgetHandle> = state
        .active
        .iter()
        .map(|&id| state.pool[id].row.clone())
        .collect();
    children.push(WidgetHandle::Button(state.add_button.clone()));
    state.list.set_children(children);
}

/// Adding or removing entries changes the data even though no single widget
/// changed value, so the array fires its own notification.
fn notify_size_change(observers: &[Observer], (before, after): (usize, usize)) {
    let event = ChangeEvent {
        name: "value",
        event_type: "change",
        old: Value::from(before),
        new: Value::from(after),
    };
    for obs in observers {
        obs.notify(&event);
    }
}
