//! In-memory model of a circuit library.
//!
//! A [`Project`] is an ordered collection of named [`Circuit`]s. Each circuit
//! is a flat list of [`Component`]s: primitive gates, primary ports and
//! instances of other circuits referenced by name. Connections are stored on
//! the consuming side, as one optional [`Driver`] per input slot.
//!
//! The model maintains a few structural invariants through its editing
//! operations:
//!
//! * Component ids within a circuit are dense and stable. The `n`-th created
//!   component has id `n` and components are never removed.
//! * Input slot counts and output slot counts match the component's kind. For
//!   subcircuit instances they track the referenced circuit's primary port
//!   population (see [`Project::sync_ports`]).
//! * Every connected input slot names an existing component and one of its
//!   output slots.
//!
//! Reusing a circuit from the library is by-reference: an instance only
//! stores the target's name, resolved again on every elaboration. Lookup
//! takes the first circuit with a matching name.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::undocumented_unsafe_blocks)]

mod circuit;
mod component;
mod kind;
mod port_sync;
mod project;

pub use circuit::{Circuit, CircuitId};
pub use component::{Component, ComponentId, Driver};
pub use kind::ComponentKind;
pub use project::{ModelError, Project};
