//! Propagation of primary port changes to existing instances.

use crate::{ComponentKind, Project};

impl Project {
    /// Resizes the slots of every instance of the named circuit to match its
    /// current primary port population.
    ///
    /// Slots are matched by index: existing connections and output values
    /// below the new count are preserved, new input slots start unconnected
    /// and new output slots start at `false`. Shrinking drops the trailing
    /// slots along with their connections.
    ///
    /// [`Project::add_component`] calls this whenever a port is added, so
    /// instances can never be observed with a stale slot count in between.
    pub fn sync_ports(&mut self, name: &str) {
        let Some(target) = self.circuit_by_name(name) else {
            return;
        };
        let input_count = target.input_count();
        let output_count = target.output_count();

        for circuit in &mut self.circuits {
            for component in &mut circuit.components {
                let ComponentKind::Subcircuit(reference) = &component.kind else {
                    continue;
                };
                if reference != name {
                    continue;
                }
                if component.inputs.len() == input_count
                    && component.outputs.len() == output_count
                {
                    continue;
                }
                log::trace!(
                    "resyncing instance {} of {:?} in {:?} to {}/{} ports",
                    component.id,
                    name,
                    circuit.name,
                    input_count,
                    output_count,
                );
                component.inputs.resize(input_count, None);
                component.outputs.resize(output_count, false);
            }
        }
    }
}
