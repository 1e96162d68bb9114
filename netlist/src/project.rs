use crate::{Circuit, CircuitId, Component, ComponentId, ComponentKind, Driver};

/// Errors reported by the editing operations on a [`Project`].
///
/// All of these leave the project unchanged.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A circuit with the requested name already exists.
    #[error("a circuit named {name:?} already exists")]
    DuplicateName {
        /// The rejected name.
        name: String,
    },
    /// The requested circuit name is reserved for a primitive kind.
    #[error("{name:?} is a primitive component name")]
    ReservedName {
        /// The rejected name.
        name: String,
    },
    /// No circuit in the project has the given id.
    #[error("no circuit with id {id}")]
    UnknownCircuit {
        /// The unresolved id.
        id: CircuitId,
    },
    /// A subcircuit component was requested for a name with no matching
    /// circuit in the project.
    #[error("no circuit named {name:?} in the project")]
    UnknownReference {
        /// The unresolved name.
        name: String,
    },
    /// No component in the circuit has the given id.
    #[error("no component with id {id}")]
    UnknownComponent {
        /// The unresolved id.
        id: ComponentId,
    },
    /// An input or output slot index is out of range for its component.
    #[error("component {component} has no slot {slot}")]
    SlotOutOfRange {
        /// The component the slot was addressed on.
        component: ComponentId,
        /// The out-of-range slot index.
        slot: usize,
    },
    /// The target of a toggle request is not an `INPUT` component.
    #[error("component {id} is not an INPUT")]
    NotAnInput {
        /// The rejected component.
        id: ComponentId,
    },
}

/// An ordered library of circuits. The root object of the model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Project {
    /// Circuits in creation order.
    pub circuits: Vec<Circuit>,
}

impl Project {
    /// Looks up a circuit by id.
    pub fn circuit(&self, id: CircuitId) -> Option<&Circuit> {
        self.circuits.iter().find(|circuit| circuit.id == id)
    }

    /// Looks up a circuit by id for mutation.
    pub fn circuit_mut(&mut self, id: CircuitId) -> Option<&mut Circuit> {
        self.circuits.iter_mut().find(|circuit| circuit.id == id)
    }

    /// Looks up a circuit by name, taking the first match.
    pub fn circuit_by_name(&self, name: &str) -> Option<&Circuit> {
        self.circuits.iter().find(|circuit| circuit.name == name)
    }

    /// Creates a new empty circuit and returns its id.
    ///
    /// The name must be unique within the project and must not shadow a
    /// primitive component name, since instantiation resolves names with
    /// primitives taking precedence. `XOR` is the one exception: a circuit
    /// of that name is never instantiated as a subcircuit, but it is what
    /// `XOR` components expand to.
    pub fn add_circuit(&mut self, name: impl Into<String>) -> Result<CircuitId, ModelError> {
        let name = name.into();
        let kind = ComponentKind::from_name(&name);
        if kind.is_primitive() && kind != ComponentKind::Xor {
            return Err(ModelError::ReservedName { name });
        }
        if self.circuit_by_name(&name).is_some() {
            return Err(ModelError::DuplicateName { name });
        }
        let id = CircuitId::new(
            self.circuits
                .iter()
                .map(|circuit| circuit.id.get())
                .max()
                .unwrap_or(0)
                + 1,
        );
        self.circuits.push(Circuit {
            id,
            name,
            components: Vec::new(),
        });
        Ok(id)
    }

    /// Adds a component to a circuit and returns its id.
    ///
    /// Slot counts are derived from the kind. For a subcircuit instance they
    /// mirror the referenced circuit's current primary port population; the
    /// reference must resolve at creation time. A reference whose name is a
    /// primitive kind is stored as that primitive instead. All slots start
    /// unconnected and all outputs start at `false`.
    ///
    /// Adding an `INPUT` or `OUTPUT` changes the circuit's own port
    /// population, so every instance of it elsewhere in the project is
    /// resized on the spot (see [`Project::sync_ports`]).
    pub fn add_component(
        &mut self,
        circuit: CircuitId,
        kind: ComponentKind,
    ) -> Result<ComponentId, ModelError> {
        // a reference whose name is a primitive kind would read back as
        // that primitive anyway, so store it canonically from the start
        let kind = match kind {
            ComponentKind::Subcircuit(name) => ComponentKind::from_name(&name),
            primitive => primitive,
        };

        let (input_count, output_count) = match &kind {
            ComponentKind::Subcircuit(name) => {
                let target =
                    self.circuit_by_name(name)
                        .ok_or_else(|| ModelError::UnknownReference {
                            name: name.clone(),
                        })?;
                (target.input_count(), target.output_count())
            }
            primitive => (
                primitive
                    .fixed_inputs()
                    .expect("primitive kinds have fixed slot counts"),
                primitive
                    .fixed_outputs()
                    .expect("primitive kinds have fixed slot counts"),
            ),
        };

        let resync = matches!(kind, ComponentKind::Input | ComponentKind::Output);

        let target = self
            .circuit_mut(circuit)
            .ok_or(ModelError::UnknownCircuit { id: circuit })?;
        let id = ComponentId::from_index(target.components.len());
        target.components.push(Component {
            id,
            kind,
            position: (0.0, 0.0),
            inputs: vec![None; input_count],
            outputs: vec![false; output_count],
        });

        if resync {
            let name = target.name.clone();
            self.sync_ports(&name);
        }
        Ok(id)
    }

    /// Connects or disconnects one input slot.
    ///
    /// Requesting the exact connection the slot already holds disconnects it
    /// instead, so a repeated click on the same pin pair acts as a toggle.
    /// Any other request overwrites the slot; a slot holds at most one
    /// driver.
    pub fn set_connection(
        &mut self,
        circuit: CircuitId,
        component: ComponentId,
        slot: usize,
        source: ComponentId,
        source_output: usize,
    ) -> Result<(), ModelError> {
        let target = self
            .circuit_mut(circuit)
            .ok_or(ModelError::UnknownCircuit { id: circuit })?;

        let outputs = target
            .component(source)
            .ok_or(ModelError::UnknownComponent { id: source })?
            .outputs
            .len();
        if source_output >= outputs {
            return Err(ModelError::SlotOutOfRange {
                component: source,
                slot: source_output,
            });
        }

        let sink = target
            .component_mut(component)
            .ok_or(ModelError::UnknownComponent { id: component })?;
        let slot = sink
            .inputs
            .get_mut(slot)
            .ok_or(ModelError::SlotOutOfRange { component, slot })?;

        let driver = Driver {
            component: source,
            output: source_output,
        };
        *slot = if *slot == Some(driver) {
            None
        } else {
            Some(driver)
        };
        Ok(())
    }

    /// Flips the value of an `INPUT` component and returns the new value.
    pub fn toggle_input(
        &mut self,
        circuit: CircuitId,
        component: ComponentId,
    ) -> Result<bool, ModelError> {
        let target = self
            .circuit_mut(circuit)
            .ok_or(ModelError::UnknownCircuit { id: circuit })?;
        let component = target
            .component_mut(component)
            .ok_or(ModelError::UnknownComponent { id: component })?;
        if component.kind != ComponentKind::Input {
            return Err(ModelError::NotAnInput { id: component.id });
        }
        let value = &mut component.outputs[0];
        *value = !*value;
        Ok(*value)
    }

    /// Moves a component on the canvas.
    pub fn set_position(
        &mut self,
        circuit: CircuitId,
        component: ComponentId,
        position: (f32, f32),
    ) -> Result<(), ModelError> {
        let target = self
            .circuit_mut(circuit)
            .ok_or(ModelError::UnknownCircuit { id: circuit })?;
        let component = target
            .component_mut(component)
            .ok_or(ModelError::UnknownComponent { id: component })?;
        component.position = position;
        Ok(())
    }
}
