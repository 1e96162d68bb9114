//! Flattening of hierarchical circuits into a single-gate-type network and
//! evaluation of the result.
//!
//! The output of [`elaborate`] is a [`Network`]: an acyclic arena of
//! [`Node`]s in which the only gate is the universal one, negated
//! conjunction. [`Evaluator`] computes node values over such a network with
//! one visit per node. [`evaluate`] ties both together for the common case
//! of running a circuit from the editor: flatten, evaluate every output and
//! write the results back into the model.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::undocumented_unsafe_blocks)]

mod elaborate;
mod eval;
mod network;

pub use elaborate::{elaborate, CompileError};
pub use eval::{evaluate, Evaluator};
pub use network::{Network, Node, NodeId};
