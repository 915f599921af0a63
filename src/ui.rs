//! Opaque UI primitive capability layer.
//!
//! The compiler depends only on this surface: value controls with a change
//! subscription, push buttons with a click subscription, and layout
//! containers (stacks plus collapsible titled sections). The implementation
//! here is headless: state lives in `Rc<RefCell<..>>` cells and events are
//! dispatched synchronously on the caller's thread, which is what the
//! single-threaded cooperative model of the form core assumes. A concrete
//! toolkit binding would mirror this surface one to one.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

// ------------------------------ Events ------------------------------------ //

/// A discrete widget state change, delivered synchronously to observers.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Which attribute changed; value controls emit `"value"`.
    pub name: &'static str,
    pub event_type: &'static str,
    pub old: Value,
    pub new: Value,
}

pub type ChangeHandler = Rc<dyn Fn(&ChangeEvent)>;

/// A change subscription: handler plus optional attribute filter and the
/// event type it listens for.
#[derive(Clone)]
pub struct Observer {
    pub handler: ChangeHandler,
    /// `None` observes every attribute.
    pub names: Option<String>,
    pub event_type: String,
}

impl Observer {
    pub fn new(handler: ChangeHandler) -> Self {
        Self {
            handler,
            names: None,
            event_type: "change".to_string(),
        }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if self.event_type != event.event_type {
            return false;
        }
        match &self.names {
            None => true,
            Some(name) => name == event.name,
        }
    }

    pub fn notify(&self, event: &ChangeEvent) {
        if self.matches(event) {
            (self.handler)(event);
        }
    }
}

// ----------------------------- Value controls ------------------------------ //

#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    Text,
    Number {
        integer: bool,
        /// Cosmetic: render a doubly-bounded control as a slider.
        slider: bool,
    },
    Checkbox,
    Dropdown,
}

struct ControlInner {
    kind: ControlKind,
    /// Folded-in label; checkboxes carry their title here.
    label: Option<String>,
    value: Value,
    /// Dropdown options, empty for other kinds.
    options: Vec<Value>,
    /// Intrinsic bounds. Only doubly-bounded controls clamp themselves;
    /// single-bound clamping is compensated by the compiler via an observer.
    min: Option<f64>,
    max: Option<f64>,
    observers: Vec<Observer>,
}

/// A single primitive input control. Cloning yields another handle onto the
/// same underlying widget state.
#[derive(Clone)]
pub struct Control {
    inner: Rc<RefCell<ControlInner>>,
}

impl Control {
    fn new(kind: ControlKind, value: Value) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ControlInner {
                kind,
                label: None,
                value,
                options: Vec::new(),
                min: None,
                max: None,
                observers: Vec::new(),
            })),
        }
    }

    pub fn text() -> Self {
        Self::new(ControlKind::Text, Value::String(String::new()))
    }

    /// Numeric input. Both bounds present makes the control naturally
    /// bounded: it clamps every incoming value itself.
    pub fn number(integer: bool, bounds: Option<(f64, f64)>, slider: bool) -> Self {
        let zero = if integer {
            Value::from(0i64)
        } else {
            Value::from(0.0f64)
        };
        let control = Self::new(ControlKind::Number { integer, slider }, zero);
        if let Some((min, max)) = bounds {
            let mut inner = control.inner.borrow_mut();
            inner.min = Some(min);
            inner.max = Some(max);
            inner.value = clamped_number(integer, 0.0, Some(min), Some(max));
        }
        control
    }

    pub fn checkbox(label: &str) -> Self {
        let control = Self::new(ControlKind::Checkbox, Value::Bool(false));
        control.inner.borrow_mut().label = Some(label.to_string());
        control
    }

    pub fn dropdown(options: Vec<Value>) -> Self {
        let first = options.first().cloned().unwrap_or(Value::Null);
        let control = Self::new(ControlKind::Dropdown, first);
        control.inner.borrow_mut().options = options;
        control
    }

    pub fn kind(&self) -> ControlKind {
        self.inner.borrow().kind.clone()
    }

    pub fn label(&self) -> Option<String> {
        self.inner.borrow().label.clone()
    }

    pub fn value(&self) -> Value {
        self.inner.borrow().value.clone()
    }

    /// Update the value and notify observers. Equal values are dropped
    /// without an event; doubly-bounded numerics clamp first.
    pub fn set_value(&self, value: Value) {
        let (event, observers) = {
            let mut inner = self.inner.borrow_mut();
            let value = match (&inner.kind, inner.min, inner.max) {
                (ControlKind::Number { integer, .. }, Some(min), Some(max)) => {
                    let n = value.as_f64().unwrap_or(0.0);
                    if n < min || n > max {
                        clamped_number(*integer, n, Some(min), Some(max))
                    } else {
                        // In range: keep the caller's exact number
                        // representation so round-trips stay structural.
                        value
                    }
                }
                _ => value,
            };
            if inner.value == value {
                return;
            }
            let event = ChangeEvent {
                name: "value",
                event_type: "change",
                old: std::mem::replace(&mut inner.value, value.clone()),
                new: value,
            };
            (event, inner.observers.clone())
        };
        // Borrow released: handlers may re-enter (e.g. a clamp snapping the
        // value back) without tripping the RefCell.
        for obs in &observers {
            obs.notify(&event);
        }
    }

    pub fn observe(&self, observer: Observer) {
        self.inner.borrow_mut().observers.push(observer);
    }
}

fn clamped_number(integer: bool, n: f64, min: Option<f64>, max: Option<f64>) -> Value {
    let mut n = n;
    if let Some(min) = min {
        n = n.max(min);
    }
    if let Some(max) = max {
        n = n.min(max);
    }
    if integer {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

/// Clamp a raw numeric value against optional bounds, preserving
/// integer-ness. In-range values pass through with their representation
/// untouched. Shared by the compiler's single-bound clamp handlers.
pub fn clamp_value(integer: bool, value: &Value, min: Option<f64>, max: Option<f64>) -> Value {
    let n = value.as_f64().unwrap_or(0.0);
    let below = min.is_some_and(|m| n < m);
    let above = max.is_some_and(|m| n > m);
    if !below && !above {
        return value.clone();
    }
    clamped_number(integer, n, min, max)
}

// -------------------------------- Buttons ---------------------------------- //

struct ButtonInner {
    label: String,
    clicks: Vec<Rc<dyn Fn()>>,
}

#[derive(Clone)]
pub struct Button {
    inner: Rc<RefCell<ButtonInner>>,
}

impl Button {
    pub fn new(label: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ButtonInner {
                label: label.to_string(),
                clicks: Vec::new(),
            })),
        }
    }

    pub fn label(&self) -> String {
        self.inner.borrow().label.clone()
    }

    pub fn on_click(&self, handler: Rc<dyn Fn()>) {
        self.inner.borrow_mut().clicks.push(handler);
    }

    /// Deliver a click. The handler list is snapshotted first so a handler
    /// may mutate this button (or its ancestors) freely.
    pub fn click(&self) {
        let handlers = self.inner.borrow().clicks.clone();
        for h in &handlers {
            h();
        }
    }
}

// ------------------------------- Containers -------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

struct StackInner {
    orientation: Orientation,
    children: Vec<WidgetHandle>,
}

/// A vertical or horizontal sequence of child widgets. Children are
/// replaceable in place, which is how arrays re-render and variants swap
/// their displayed alternative.
#[derive(Clone)]
pub struct Stack {
    inner: Rc<RefCell<StackInner>>,
}

impl Stack {
    pub fn new(orientation: Orientation, children: Vec<WidgetHandle>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StackInner { orientation, children })),
        }
    }

    pub fn vertical(children: Vec<WidgetHandle>) -> Self {
        Self::new(Orientation::Vertical, children)
    }

    pub fn horizontal(children: Vec<WidgetHandle>) -> Self {
        Self::new(Orientation::Horizontal, children)
    }

    pub fn orientation(&self) -> Orientation {
        self.inner.borrow().orientation
    }

    pub fn children(&self) -> Vec<WidgetHandle> {
        self.inner.borrow().children.clone()
    }

    pub fn set_children(&self, children: Vec<WidgetHandle>) {
        self.inner.borrow_mut().children = children;
    }
}

struct SectionInner {
    title: Option<String>,
    body: Stack,
    collapsed: bool,
}

/// A collapsible titled section; starts folded, matching the accordion
/// convention for non-root objects and arrays.
#[derive(Clone)]
pub struct Section {
    inner: Rc<RefCell<SectionInner>>,
}

impl Section {
    pub fn collapsed(title: Option<&str>, body: Stack) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SectionInner {
                title: title.map(str::to_string),
                body,
                collapsed: true,
            })),
        }
    }

    pub fn title(&self) -> Option<String> {
        self.inner.borrow().title.clone()
    }

    pub fn body(&self) -> Stack {
        self.inner.borrow().body.clone()
    }

    pub fn is_collapsed(&self) -> bool {
        self.inner.borrow().collapsed
    }

    pub fn set_collapsed(&self, collapsed: bool) {
        self.inner.borrow_mut().collapsed = collapsed;
    }
}

// ----------------------------- Widget handles ------------------------------ //

/// Cheap, cloneable handle onto any primitive widget, composed into parent
/// layouts in declaration order.
#[derive(Clone)]
pub enum WidgetHandle {
    Label(Rc<str>),
    Control(Control),
    Button(Button),
    Stack(Stack),
    Section(Section),
}

impl WidgetHandle {
    pub fn label(text: &str) -> Self {
        WidgetHandle::Label(Rc::from(text))
    }
}

/// Textual outline of a widget tree, one node per line. The headless
/// stand-in for a display surface.
pub fn outline(widget: &WidgetHandle) -> String {
    let mut out = String::new();
    outline_into(widget, 0, &mut out);
    out
}

fn outline_into(widget: &WidgetHandle, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match widget {
        WidgetHandle::Label(text) => {
            out.push_str(&format!("{pad}label \"{text}\"\n"));
        }
        WidgetHandle::Control(c) => {
            let desc = match c.kind() {
                ControlKind::Text => "text".to_string(),
                ControlKind::Number { integer, slider } => format!(
                    "{}{}",
                    if integer { "integer" } else { "number" },
                    if slider { " (slider)" } else { "" }
                ),
                ControlKind::Checkbox => {
                    format!("checkbox \"{}\"", c.label().unwrap_or_default())
                }
                ControlKind::Dropdown => "dropdown".to_string(),
            };
            out.push_str(&format!("{pad}{desc} = {}\n", c.value()));
        }
        WidgetHandle::Button(b) => {
            out.push_str(&format!("{pad}button \"{}\"\n", b.label()));
        }
        WidgetHandle::Stack(s) => {
            let dir = match s.orientation() {
                Orientation::Vertical => "vbox",
                Orientation::Horizontal => "hbox",
            };
            out.push_str(&format!("{pad}{dir}\n"));
            for child in s.children() {
                outline_into(&child, depth + 1, out);
            }
        }
        WidgetHandle::Section(s) => {
            out.push_str(&format!(
                "{pad}section \"{}\"{}\n",
                s.title().unwrap_or_default(),
                if s.is_collapsed() { " (collapsed)" } else { "" }
            ));
            outline_into(&WidgetHandle::Stack(s.body()), depth + 1, out);
        }
    }
}
