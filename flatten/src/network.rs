use std::fmt;

/// Index of a node in a [`Network`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A node of a flattened network.
///
/// `Universal` is the only gate; elaboration expresses every supported
/// boolean function through it (see [`elaborate`][crate::elaborate]).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Node {
    /// Constant false. Produced for unconnected input slots.
    False,
    /// Primary input of the elaborated circuit, carrying the value its
    /// `INPUT` component had at elaboration time.
    Leaf(bool),
    /// The universal gate: negated conjunction of the two child nodes.
    Universal(NodeId, NodeId),
}

/// A flattened network of universal gates, with one root per `OUTPUT` of the
/// elaborated circuit.
///
/// Nodes live in an append-only arena and gates only ever reference earlier
/// entries, so the network is acyclic by construction. Sharing is by id:
/// when elaboration reuses a signal, both consumers hold the same [`NodeId`]
/// rather than copies of the subtree.
#[derive(Default, Debug)]
pub struct Network {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Network {
    /// Appends a node and returns its id.
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        if let Node::Universal(left, right) = node {
            assert!(
                left.index() < self.nodes.len() && right.index() < self.nodes.len(),
                "universal gate references a node that does not exist yet"
            );
        }
        let id = NodeId(u32::try_from(self.nodes.len()).expect("network too large"));
        self.nodes.push(node);
        id
    }

    /// Records the node driving the next `OUTPUT` in creation order.
    pub(crate) fn push_root(&mut self, root: NodeId) {
        assert!(root.index() < self.nodes.len());
        self.roots.push(root);
    }

    /// The node with the given id.
    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id.index()]
    }

    /// The root node per `OUTPUT` component, in creation order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
