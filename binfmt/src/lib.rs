//! Binary persistence for [`Project`][logicol_netlist::Project]s.
//!
//! The layout is fixed little-endian, with no magic number and no version
//! tag:
//!
//! ```text
//! File      := circuitCount:u64 Circuit[circuitCount]
//! Circuit   := id:u64 Name componentCount:u64 Component[componentCount]
//! Component := id:u64 x:f32 y:f32 Name
//!              inputCount:u64 Slot[inputCount]
//!              outputCount:u64 value:u8[outputCount]
//! Slot      := outputIndex:u64 sourceId:u64
//! Name      := length:u64 byte[length]
//! ```
//!
//! Names are UTF-8 and store component kinds by their primitive name, with
//! anything else read back as a subcircuit reference. A `Slot` with
//! `sourceId` 0 is unconnected; its `outputIndex` carries no meaning and is
//! ignored.
//!
//! [`save`] is total and [`load`] is strict: input must frame exactly, and
//! the reconstructed project must satisfy the same structural invariants
//! the editing operations maintain, so that later elaboration can rely on
//! them. The one exception is a subcircuit reference that resolves to no
//! circuit, which loads fine and only fails once elaborated, keeping
//! projects with renamed-away targets inspectable.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::undocumented_unsafe_blocks)]

mod load;
mod save;

pub use load::{load, CorruptData};
pub use save::save;
