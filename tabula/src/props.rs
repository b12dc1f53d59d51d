//! Prop getters
//!
//! Prop getters hand a rendering layer a plain bag of attributes and an
//! optional change handler. The bag carries no UI-framework types: the
//! adapter maps attributes onto whatever elements it renders and calls
//! [`PropBag::trigger_change`] when the user toggles the control.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Change handler receiving the new checked state.
pub type ChangeHandler = Rc<dyn Fn(bool)>;

/// Attribute and event-handler bag.
#[derive(Clone, Default)]
pub struct PropBag {
    attributes: BTreeMap<String, Value>,
    on_change: Option<ChangeHandler>,
}

impl PropBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the change handler.
    pub fn on_change(mut self, handler: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Rc::new(handler));
        self
    }

    /// Returns an attribute value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// All attributes, sorted by name.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Returns the change handler, if any.
    pub fn change_handler(&self) -> Option<&ChangeHandler> {
        self.on_change.as_ref()
    }

    /// Invokes the change handler. Returns `false` if there is none.
    pub fn trigger_change(&self, checked: bool) -> bool {
        match &self.on_change {
            Some(handler) => {
                handler(checked);
                true
            }
            None => false,
        }
    }

    /// Merges `other` over `self`: its attributes replace same-named ones and
    /// its change handler, if set, replaces ours.
    pub fn merge(mut self, other: PropBag) -> Self {
        self.attributes.extend(other.attributes);
        if other.on_change.is_some() {
            self.on_change = other.on_change;
        }
        self
    }

    /// Attributes as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }
}

impl fmt::Debug for PropBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropBag")
            .field("attributes", &self.attributes)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// Caller-supplied overrides for a prop getter.
pub enum UserProps {
    /// Merged over the computed bag.
    Merge(PropBag),
    /// Receives the computed bag and returns the final one.
    With(Box<dyn FnOnce(PropBag) -> PropBag>),
}

impl UserProps {
    /// Transforming form.
    pub fn with(f: impl FnOnce(PropBag) -> PropBag + 'static) -> Self {
        Self::With(Box::new(f))
    }
}

impl From<PropBag> for UserProps {
    fn from(bag: PropBag) -> Self {
        Self::Merge(bag)
    }
}

impl fmt::Debug for UserProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge(bag) => f.debug_tuple("Merge").field(bag).finish(),
            Self::With(_) => f.write_str("With(..)"),
        }
    }
}

/// Combines a computed bag with optional caller overrides.
pub fn prop_getter(initial: PropBag, user: Option<UserProps>) -> PropBag {
    match user {
        None => initial,
        Some(UserProps::Merge(bag)) => initial.merge(bag),
        Some(UserProps::With(f)) => f(initial),
    }
}
