//! Event registry for rendered cart controls.
//!
//! Each render assigns every remove button and quantity input an element id and
//! records which line item it belongs to. An incoming UI event is resolved by
//! looking its target up in the registry of the *latest* render, so the item is
//! always derived from the element at event time and never from state captured
//! when some earlier markup was produced.

use std::collections::HashMap;

use sleep_outside_core::{ProductId, define_id};

define_id!(ControlId);

/// What a rendered control does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// The remove button of a line.
    Remove,
    /// The numeric quantity input of a line.
    Quantity,
}

/// The line item and behavior associated with a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub kind: ControlKind,
    pub item: ProductId,
}

/// A user interaction observed on the cart list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A click on an element.
    Click { target: ControlId },
    /// A committed value change on an input.
    Change { target: ControlId, value: String },
}

impl UiEvent {
    /// The element the event was fired on.
    #[must_use]
    pub const fn target(&self) -> &ControlId {
        match self {
            Self::Click { target } | Self::Change { target, .. } => target,
        }
    }
}

/// A cart operation resolved from a UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Remove(ProductId),
    SetQuantity { item: ProductId, raw: String },
}

/// Mapping from element id to binding for the currently rendered list.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    bindings: HashMap<ControlId, Binding>,
}

impl EventRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `control` with a line item.
    pub fn bind(&mut self, control: ControlId, kind: ControlKind, item: ProductId) {
        self.bindings.insert(control, Binding { kind, item });
    }

    /// Look up the binding of an element.
    #[must_use]
    pub fn binding(&self, control: &ControlId) -> Option<&Binding> {
        self.bindings.get(control)
    }

    /// Resolve an event to a cart action.
    ///
    /// Returns `None` for unknown targets and for events that do not fit the
    /// control (a change on a remove button, a click on a quantity input).
    #[must_use]
    pub fn resolve(&self, event: &UiEvent) -> Option<CartAction> {
        let binding = self.binding(event.target())?;
        match (event, binding.kind) {
            (UiEvent::Click { .. }, ControlKind::Remove) => {
                Some(CartAction::Remove(binding.item.clone()))
            }
            (UiEvent::Change { value, .. }, ControlKind::Quantity) => Some(CartAction::SetQuantity {
                item: binding.item.clone(),
                raw: value.clone(),
            }),
            _ => None,
        }
    }

    /// Number of bound controls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no controls are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
