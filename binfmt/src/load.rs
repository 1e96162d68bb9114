use bytes::Buf;
use logicol_netlist::{Circuit, CircuitId, Component, ComponentId, ComponentKind, Driver, Project};

/// Failure to reconstruct a [`Project`] from serialized bytes.
///
/// The format carries no magic number, so foreign input surfaces as
/// whichever of these checks it trips first.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CorruptData {
    /// A field runs past the end of the input.
    #[error("truncated input: {field} needs {needed} bytes, {remaining} remain")]
    UnexpectedEnd {
        /// The field being read.
        field: &'static str,
        /// Bytes the field still needed.
        needed: u64,
        /// Bytes left in the input.
        remaining: u64,
    },
    /// Input continues after the last circuit.
    #[error("{remaining} trailing bytes after the last circuit")]
    TrailingBytes {
        /// Number of unconsumed bytes.
        remaining: u64,
    },
    /// A stored name is not valid UTF-8.
    #[error("a {field} name is not valid UTF-8")]
    InvalidName {
        /// The field holding the name.
        field: &'static str,
    },
    /// A component id differs from the 1-based position it was stored at.
    #[error("component id {found} stored at position {position}")]
    NonDenseId {
        /// 0-based position within the circuit.
        position: usize,
        /// The id that was stored there.
        found: u64,
    },
    /// An input slot references a component or output slot that does not
    /// exist.
    #[error("component {component} of {circuit:?} references missing pin {source}:{output}")]
    DanglingSource {
        /// Circuit the referencing component is part of.
        circuit: String,
        /// Id of the referencing component.
        component: u64,
        /// Referenced component id.
        ///
        /// Spelled raw so thiserror does not treat it as the error source.
        r#source: u64,
        /// Referenced output slot.
        output: u64,
    },
    /// A component's slot counts disagree with its kind.
    #[error("component {component} of {circuit:?} has slot counts that do not match its kind")]
    SlotCountMismatch {
        /// Circuit the component is part of.
        circuit: String,
        /// Id of the offending component.
        component: u64,
    },
}

/// Cursor over the input with explicit bounds checks ahead of every read.
struct Reader<'a> {
    buf: &'a [u8],
}

impl Reader<'_> {
    fn need(&self, needed: u64, field: &'static str) -> Result<(), CorruptData> {
        if (self.buf.remaining() as u64) < needed {
            Err(CorruptData::UnexpectedEnd {
                field,
                needed,
                remaining: self.buf.remaining() as u64,
            })
        } else {
            Ok(())
        }
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, CorruptData> {
        self.need(1, field)?;
        Ok(self.buf.get_u8())
    }

    fn u64(&mut self, field: &'static str) -> Result<u64, CorruptData> {
        self.need(8, field)?;
        Ok(self.buf.get_u64_le())
    }

    fn f32(&mut self, field: &'static str) -> Result<f32, CorruptData> {
        self.need(4, field)?;
        Ok(self.buf.get_f32_le())
    }

    /// Reads an element count or byte length.
    ///
    /// Every counted element takes at least one byte, so a count larger
    /// than the remaining input is already known to be corrupt. Checking
    /// here also keeps a hostile count from sizing any allocation.
    fn count(&mut self, field: &'static str) -> Result<usize, CorruptData> {
        let raw = self.u64(field)?;
        self.need(raw, field)?;
        Ok(raw as usize)
    }

    fn string(&mut self, field: &'static str) -> Result<String, CorruptData> {
        let len = self.count(field)?;
        let mut bytes = vec![0; len];
        self.buf.copy_to_slice(&mut bytes);
        String::from_utf8(bytes).map_err(|_| CorruptData::InvalidName { field })
    }

    fn finish(self) -> Result<(), CorruptData> {
        if self.buf.has_remaining() {
            Err(CorruptData::TrailingBytes {
                remaining: self.buf.remaining() as u64,
            })
        } else {
            Ok(())
        }
    }
}

/// Reconstructs a project from bytes produced by [`save`][crate::save].
///
/// Rejects input that does not frame exactly as well as input that frames
/// but violates the model's structural invariants. See the crate docs for
/// the checks and the one deliberate exception for unresolved subcircuit
/// names.
pub fn load(bytes: &[u8]) -> Result<Project, CorruptData> {
    let mut reader = Reader { buf: bytes };
    let circuit_count = reader.count("circuit count")?;
    let mut circuits = Vec::new();
    for _ in 0..circuit_count {
        circuits.push(read_circuit(&mut reader)?);
    }
    reader.finish()?;

    let project = Project { circuits };
    validate(&project)?;
    Ok(project)
}

fn read_circuit(reader: &mut Reader) -> Result<Circuit, CorruptData> {
    let id = CircuitId::new(reader.u64("circuit id")?);
    let name = reader.string("circuit")?;
    let component_count = reader.count("component count")?;
    let mut components = Vec::new();
    for position in 0..component_count {
        components.push(read_component(reader, &name, position)?);
    }
    Ok(Circuit {
        id,
        name,
        components,
    })
}

fn read_component(
    reader: &mut Reader,
    circuit: &str,
    position: usize,
) -> Result<Component, CorruptData> {
    let found = reader.u64("component id")?;
    if found != position as u64 + 1 {
        return Err(CorruptData::NonDenseId { position, found });
    }
    let id = ComponentId::from_index(position);

    let x = reader.f32("position")?;
    let y = reader.f32("position")?;
    let kind = ComponentKind::from_name(&reader.string("component")?);

    let input_count = reader.count("input count")?;
    let mut inputs = Vec::new();
    for _ in 0..input_count {
        let output = reader.u64("slot output index")?;
        let source = reader.u64("slot source id")?;
        // source id 0 marks an unconnected slot; its output index carries
        // no meaning
        let slot = match ComponentId::new(source) {
            None => None,
            Some(component) => Some(Driver {
                component,
                output: usize::try_from(output).map_err(|_| CorruptData::DanglingSource {
                    circuit: circuit.to_owned(),
                    component: found,
                    source,
                    output,
                })?,
            }),
        };
        inputs.push(slot);
    }

    let output_count = reader.count("output count")?;
    let mut outputs = Vec::new();
    for _ in 0..output_count {
        outputs.push(reader.u8("output value")? != 0);
    }

    Ok(Component {
        id,
        kind,
        position: (x, y),
        inputs,
        outputs,
    })
}

/// Checks the invariants a freshly built project would satisfy.
///
/// Slot counts must match the component's kind, except for subcircuit
/// references whose name resolves to nothing: those pass through to fail at
/// elaboration instead. Every connected slot must reference an existing
/// component and output.
fn validate(project: &Project) -> Result<(), CorruptData> {
    for circuit in &project.circuits {
        for component in &circuit.components {
            let expected = match &component.kind {
                ComponentKind::Subcircuit(name) => project
                    .circuit_by_name(name)
                    .map(|target| (target.input_count(), target.output_count())),
                primitive => Some((
                    primitive
                        .fixed_inputs()
                        .expect("primitive kinds have fixed slot counts"),
                    primitive
                        .fixed_outputs()
                        .expect("primitive kinds have fixed slot counts"),
                )),
            };
            if let Some((input_count, output_count)) = expected {
                if component.inputs.len() != input_count
                    || component.outputs.len() != output_count
                {
                    return Err(CorruptData::SlotCountMismatch {
                        circuit: circuit.name.clone(),
                        component: component.id.get(),
                    });
                }
            }

            for slot in component.inputs.iter().flatten() {
                let resolved = circuit
                    .component(slot.component)
                    .is_some_and(|source| slot.output < source.outputs.len());
                if !resolved {
                    return Err(CorruptData::DanglingSource {
                        circuit: circuit.name.clone(),
                        component: component.id.get(),
                        source: slot.component.get(),
                        output: slot.output as u64,
                    });
                }
            }
        }
    }
    Ok(())
}
