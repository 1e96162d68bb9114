use std::{fmt, num::NonZeroU64};

use crate::ComponentKind;

/// Identifier of a [`Component`] within its owning circuit.
///
/// Ids are 1-based and dense: the `n`-th created component of a circuit has
/// id `n`. The raw value 0 never names a component; the serialized form uses
/// it to mark an unconnected input slot, which the model represents as
/// [`None`] instead.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(NonZeroU64);

impl ComponentId {
    /// Creates an id from its raw value, rejecting the reserved value 0.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(ComponentId)
    }

    /// The id of the component stored at the given 0-based position.
    pub fn from_index(index: usize) -> Self {
        ComponentId(NonZeroU64::new(index as u64 + 1).expect("component position overflow"))
    }

    /// The raw value, as stored in the serialized form.
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// The 0-based position of this component in its circuit.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The source end of a connection: a component and one of its output slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Driver {
    /// Component whose output drives the connected slot.
    pub component: ComponentId,
    /// Output slot index on that component.
    pub output: usize,
}

/// A gate, primary port or subcircuit instance placed in a circuit.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Identity within the owning circuit, stable once assigned.
    pub id: ComponentId,
    /// What the component is.
    pub kind: ComponentKind,
    /// Canvas position. Carried for the editor's benefit and ignored by
    /// elaboration.
    pub position: (f32, f32),
    /// Connection per input slot, `None` while unconnected.
    pub inputs: Vec<Option<Driver>>,
    /// Live value per output slot.
    ///
    /// Only an `INPUT`'s single output is set directly by the user; every
    /// other slot is written back by evaluation.
    pub outputs: Vec<bool>,
}
