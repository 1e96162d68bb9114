//! Flattening of a hierarchical circuit into a [`Network`].
//!
//! Elaboration starts from the `OUTPUT` components of a root circuit and
//! walks the wiring backwards, expanding every component it meets into
//! universal gates:
//!
//! * `NOT(x)` becomes `Universal(x, x)`.
//! * `AND(a, b)` becomes `Universal(i, i)` with `i = Universal(a, b)`.
//! * `OR(a, b)` becomes `Universal(Universal(a, a), Universal(b, b))`.
//! * `XOR` has no built-in expansion; it is resolved against a library
//!   circuit named `XOR` like any other instance. Without one it degrades
//!   to constant false, with a warning.
//!
//! Subcircuit instances are expanded by substitution. Entering an instance
//! pushes a [`CallSite`] recording where the instance sits; when the walk
//! inside the referenced circuit reaches one of its formal `INPUT` ports,
//! the port's ordinal selects the matching input slot on the recorded
//! instance and elaboration resumes in the enclosing circuit, popping the
//! frame. Only an `INPUT` met with no frames left, which can only happen in
//! the root circuit itself, becomes a [`Node::Leaf`] carrying its current
//! toggle value.
//!
//! Every driven pin is elaborated at most once per dynamic scope: a second
//! consumer of the same pin receives the already built node, so shared logic
//! stays shared in the network. Distinct instances of the same circuit get
//! distinct scopes and share nothing. The same bookkeeping catches wiring
//! loops: a pin revisited while its own cone is still being expanded is
//! combinational feedback and aborts elaboration.

use logicol_netlist::{Circuit, Component, ComponentId, ComponentKind, Driver, Project};
use zwohash::HashMap;

use crate::{Network, Node, NodeId};

/// Errors reported by [`elaborate`]. The project is never modified, so any
/// of these leaves it exactly as it was.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A component references a name that is neither a primitive nor a
    /// circuit in the project.
    #[error("no circuit named {name:?} in the project")]
    UnresolvedReference {
        /// The unresolved name.
        name: String,
    },
    /// A circuit transitively instantiates itself.
    #[error("circuit {name:?} transitively instantiates itself")]
    HierarchyCycle {
        /// The circuit that was already being elaborated when a new instance
        /// of it was entered.
        name: String,
    },
    /// The wiring feeds a component's output back into its own input cone
    /// without passing through anything that could break the loop.
    #[error("combinational feedback through component {component} of circuit {circuit:?}")]
    CombinationalCycle {
        /// Circuit in which the feedback was detected.
        circuit: String,
        /// Component whose cone was reentered.
        component: ComponentId,
    },
}

/// One frame of the instantiation chain: a subcircuit instance whose formal
/// `INPUT` ports are currently being substituted.
struct CallSite<'a, 'b> {
    /// The instance component, holding the actual input slots.
    component: &'a Component,
    /// The circuit containing the instance.
    circuit: &'a Circuit,
    /// Scope the instance itself is elaborated in, resumed when the walk
    /// crosses back out through a formal port.
    scope: u32,
    /// Frame of the instance one level further out, if any.
    parent: Option<&'b CallSite<'a, 'b>>,
}

/// A driven output pin within one dynamic scope of the elaboration.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct Pin {
    scope: u32,
    component: ComponentId,
    output: usize,
}

const ROOT_SCOPE: u32 = 0;

struct Elaborator<'a> {
    project: &'a Project,
    network: Network,
    /// Result per elaborated pin. `None` while the pin's cone is still being
    /// expanded, which is how combinational feedback shows up.
    pins: HashMap<Pin, Option<NodeId>>,
    next_scope: u32,
}

/// Flattens `root` and everything it transitively instantiates into a
/// [`Network`], one root per `OUTPUT` component in creation order.
///
/// `root` must be a circuit of `project`; instance references are resolved
/// against the project's circuit names. The project itself is left
/// untouched, in particular the `INPUT` values are snapshotted into
/// [`Node::Leaf`] nodes rather than referenced.
pub fn elaborate(project: &Project, root: &Circuit) -> Result<Network, CompileError> {
    let mut elaborator = Elaborator {
        project,
        network: Network::default(),
        pins: Default::default(),
        next_scope: ROOT_SCOPE + 1,
    };
    for output in root.primary_outputs() {
        let node = elaborator.slot(ROOT_SCOPE, root, output.inputs[0], None)?;
        elaborator.network.push_root(node);
    }
    log::debug!(
        "flattened {:?} into {} nodes driving {} outputs",
        root.name,
        elaborator.network.len(),
        elaborator.network.roots().len(),
    );
    Ok(elaborator.network)
}

impl<'a> Elaborator<'a> {
    fn fresh_scope(&mut self) -> u32 {
        let scope = self.next_scope;
        self.next_scope += 1;
        scope
    }

    /// Elaborates whatever drives one input slot. An unconnected slot reads
    /// as constant false.
    fn slot(
        &mut self,
        scope: u32,
        circuit: &'a Circuit,
        slot: Option<Driver>,
        site: Option<&CallSite<'a, '_>>,
    ) -> Result<NodeId, CompileError> {
        match slot {
            None => Ok(self.network.push(Node::False)),
            Some(driver) => self.pin(scope, circuit, driver, site),
        }
    }

    /// Elaborates one driven pin, memoized per scope.
    fn pin(
        &mut self,
        scope: u32,
        circuit: &'a Circuit,
        driver: Driver,
        site: Option<&CallSite<'a, '_>>,
    ) -> Result<NodeId, CompileError> {
        let key = Pin {
            scope,
            component: driver.component,
            output: driver.output,
        };
        match self.pins.get(&key) {
            Some(&Some(node)) => return Ok(node),
            Some(None) => {
                return Err(CompileError::CombinationalCycle {
                    circuit: circuit.name.clone(),
                    component: driver.component,
                })
            }
            None => (),
        }
        self.pins.insert(key, None);
        let node = self.expand(scope, circuit, driver, site)?;
        self.pins.insert(key, Some(node));
        Ok(node)
    }

    /// Expands the component behind a pin into gates.
    fn expand(
        &mut self,
        scope: u32,
        circuit: &'a Circuit,
        driver: Driver,
        site: Option<&CallSite<'a, '_>>,
    ) -> Result<NodeId, CompileError> {
        let component = circuit
            .component(driver.component)
            .expect("input slot references a component that is not part of the circuit");
        match &component.kind {
            ComponentKind::Not => {
                let x = self.slot(scope, circuit, component.inputs[0], site)?;
                Ok(self.network.push(Node::Universal(x, x)))
            }
            ComponentKind::And => {
                let a = self.slot(scope, circuit, component.inputs[0], site)?;
                let b = self.slot(scope, circuit, component.inputs[1], site)?;
                let inner = self.network.push(Node::Universal(a, b));
                Ok(self.network.push(Node::Universal(inner, inner)))
            }
            ComponentKind::Or => {
                let a = self.slot(scope, circuit, component.inputs[0], site)?;
                let b = self.slot(scope, circuit, component.inputs[1], site)?;
                let not_a = self.network.push(Node::Universal(a, a));
                let not_b = self.network.push(Node::Universal(b, b));
                Ok(self.network.push(Node::Universal(not_a, not_b)))
            }
            ComponentKind::Xor => match self.project.circuit_by_name("XOR") {
                Some(target) => self.enter(scope, circuit, component, driver.output, target, site),
                None => {
                    log::warn!(
                        "no circuit named XOR in the project; \
                         XOR component {} in {:?} reads as constant false",
                        component.id,
                        circuit.name,
                    );
                    Ok(self.network.push(Node::False))
                }
            },
            ComponentKind::Subcircuit(name) => {
                let target = self.project.circuit_by_name(name).ok_or_else(|| {
                    CompileError::UnresolvedReference { name: name.clone() }
                })?;
                self.enter(scope, circuit, component, driver.output, target, site)
            }
            ComponentKind::Input => self.input(circuit, component, site),
            ComponentKind::Output => unreachable!("OUTPUT components have no output slots"),
        }
    }

    /// Steps into a referenced circuit through one of its `OUTPUT` ports.
    fn enter(
        &mut self,
        scope: u32,
        circuit: &'a Circuit,
        instance: &'a Component,
        output: usize,
        target: &'a Circuit,
        site: Option<&CallSite<'a, '_>>,
    ) -> Result<NodeId, CompileError> {
        if target.id == circuit.id {
            return Err(CompileError::HierarchyCycle {
                name: target.name.clone(),
            });
        }
        let mut frame = site;
        while let Some(current) = frame {
            if current.circuit.id == target.id {
                return Err(CompileError::HierarchyCycle {
                    name: target.name.clone(),
                });
            }
            frame = current.parent;
        }

        let Some(port) = target.primary_outputs().nth(output) else {
            // reachable through the XOR fallthrough when the XOR circuit
            // does not actually have an OUTPUT
            log::warn!(
                "instance {} in {:?} uses output {} of {:?}, which has only {} outputs",
                instance.id,
                circuit.name,
                output,
                target.name,
                target.output_count(),
            );
            return Ok(self.network.push(Node::False));
        };
        let slot = port.inputs[0];
        let frame = CallSite {
            component: instance,
            circuit,
            scope,
            parent: site,
        };
        let inner = self.fresh_scope();
        self.slot(inner, target, slot, Some(&frame))
    }

    /// Elaborates an `INPUT` component: a leaf in the root circuit, a
    /// substitution through the nearest call site anywhere else.
    fn input(
        &mut self,
        circuit: &'a Circuit,
        component: &'a Component,
        site: Option<&CallSite<'a, '_>>,
    ) -> Result<NodeId, CompileError> {
        match site {
            None => Ok(self.network.push(Node::Leaf(component.outputs[0]))),
            Some(site) => {
                let ordinal = circuit
                    .input_ordinal(component.id)
                    .expect("INPUT component not part of its own circuit");
                match site.component.inputs.get(ordinal).copied() {
                    Some(slot) => self.slot(site.scope, site.circuit, slot, site.parent),
                    None => {
                        // reachable through the XOR fallthrough when the XOR
                        // circuit declares more than two inputs
                        log::warn!(
                            "instance {} in {:?} has no slot for input port {} of {:?}",
                            site.component.id,
                            site.circuit.name,
                            ordinal,
                            circuit.name,
                        );
                        Ok(self.network.push(Node::False))
                    }
                }
            }
        }
    }
}
