//! Memoized evaluation of a flattened [`Network`].

use logicol_netlist::{CircuitId, Driver, Project};

use crate::{elaborate, CompileError, Network, Node, NodeId};

/// Evaluates the nodes of a [`Network`], computing each node at most once
/// per pass.
///
/// Visited flags are kept per node and set before a gate descends into its
/// children. Since the arena is acyclic the flag only ever short-circuits
/// repeated consumers of a shared node, never a node's own evaluation.
pub struct Evaluator<'a> {
    network: &'a Network,
    visited: Vec<bool>,
    values: Vec<bool>,
    computed: usize,
}

impl<'a> Evaluator<'a> {
    /// Prepares an evaluator with every node unvisited.
    pub fn new(network: &'a Network) -> Self {
        Evaluator {
            network,
            visited: vec![false; network.len()],
            values: vec![false; network.len()],
            computed: 0,
        }
    }

    /// Marks every node unvisited for a fresh pass.
    ///
    /// This sweeps the whole arena rather than walking the graph, so no node
    /// can be left stale no matter how it is shared.
    pub fn reset(&mut self) {
        self.visited.fill(false);
        self.computed = 0;
    }

    /// The value of one node, computing it if this pass has not yet.
    pub fn node(&mut self, id: NodeId) -> bool {
        if self.visited[id.index()] {
            return self.values[id.index()];
        }
        self.visited[id.index()] = true;
        let value = match self.network.node(id) {
            Node::False => false,
            Node::Leaf(value) => value,
            Node::Universal(left, right) => {
                let left = self.node(left);
                let right = self.node(right);
                !(left && right)
            }
        };
        self.values[id.index()] = value;
        self.computed += 1;
        value
    }

    /// Runs a full pass: resets, then evaluates every root in `OUTPUT`
    /// creation order.
    pub fn pass(&mut self) -> Vec<bool> {
        self.reset();
        let roots = self.network.roots().to_vec();
        roots.into_iter().map(|root| self.node(root)).collect()
    }

    /// Number of nodes actually computed since the last reset. Repeated
    /// reads of a shared node do not count.
    pub fn computed_nodes(&self) -> usize {
        self.computed
    }
}

/// Elaborates `root` and evaluates all of its `OUTPUT` components.
///
/// Returns the output values in creation order. Each value is also written
/// back onto the output slot of the component driving the corresponding
/// `OUTPUT`, which is where the editor reads live values from. On error the
/// project is left untouched.
///
/// `root` must be the id of a circuit in `project`.
pub fn evaluate(project: &mut Project, root: CircuitId) -> Result<Vec<bool>, CompileError> {
    let (network, drivers) = {
        let circuit = project
            .circuit(root)
            .expect("evaluated circuit is not part of the project");
        let network = elaborate(project, circuit)?;
        let drivers: Vec<Option<Driver>> = circuit
            .primary_outputs()
            .map(|output| output.inputs[0])
            .collect();
        (network, drivers)
    };

    let mut evaluator = Evaluator::new(&network);
    let values = evaluator.pass();
    log::debug!(
        "evaluated {} nodes for {} outputs",
        evaluator.computed_nodes(),
        values.len(),
    );

    let circuit = project
        .circuit_mut(root)
        .expect("evaluated circuit is not part of the project");
    for (&driver, &value) in drivers.iter().zip(&values) {
        let Some(driver) = driver else { continue };
        let source = circuit
            .component_mut(driver.component)
            .expect("input slot references a component that is not part of the circuit");
        source.outputs[driver.output] = value;
    }
    Ok(values)
}
