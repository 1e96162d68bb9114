use std::fmt;

use crate::{Component, ComponentId, ComponentKind};

/// Identifier of a [`Circuit`] within a project. Stable and never reused,
/// but not necessarily dense.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CircuitId(u64);

impl CircuitId {
    /// Creates an id from its raw value.
    pub fn new(raw: u64) -> Self {
        CircuitId(raw)
    }

    /// The raw value, as stored in the serialized form.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A named, reusable circuit: an ordered list of components wired through
/// their input slots.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    /// Stable identity within the project.
    pub id: CircuitId,
    /// Name other circuits use to instantiate this one.
    pub name: String,
    /// Components in creation order. The order defines component ids as well
    /// as the ordinals of the primary ports.
    pub components: Vec<Component>,
}

impl Circuit {
    /// Looks up a component by id.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.index())
    }

    /// Looks up a component by id for mutation.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id.index())
    }

    /// Iterates the `INPUT` components in creation order.
    pub fn primary_inputs(&self) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(|component| component.kind == ComponentKind::Input)
    }

    /// Iterates the `OUTPUT` components in creation order.
    pub fn primary_outputs(&self) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(|component| component.kind == ComponentKind::Output)
    }

    /// Number of primary input ports.
    pub fn input_count(&self) -> usize {
        self.primary_inputs().count()
    }

    /// Number of primary output ports.
    pub fn output_count(&self) -> usize {
        self.primary_outputs().count()
    }

    /// Position of an `INPUT` component among all `INPUT`s of this circuit.
    ///
    /// This ordinal pairs the formal port with the corresponding input slot
    /// on every instance of the circuit. Returns `None` when `id` is not an
    /// `INPUT` of this circuit.
    pub fn input_ordinal(&self, id: ComponentId) -> Option<usize> {
        self.primary_inputs()
            .position(|component| component.id == id)
    }
}
