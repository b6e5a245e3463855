use {
    crate::{RingError, RingResult},
    rapidhash::RapidBuildHasher,
    std::{
        collections::{HashMap, VecDeque},
        fmt,
        hash::Hash,
        ops::Index,
    },
};

/// Node that keys are routed to.
///
/// A node is an opaque identifier, equality is by value. Its `Display`
/// rendering is what gets hashed (together with the replica index) to place
/// the node's virtual nodes on the ring, so two nodes that render the same
/// will land on the same positions.
pub trait Node: fmt::Display + Hash + Eq + Clone + 'static {}

impl<T> Node for T where T: fmt::Display + Hash + Eq + Clone + 'static {}

/// Compact node handle.
pub(crate) type NodeIdx = u16;

/// Node together with its weight.
#[derive(Debug, Clone)]
pub(crate) struct Member<N> {
    pub node: N,
    pub weight: u32,
}

/// Nodes collection, a.k.a. the weight table.
///
/// The collection assigns each node an index, which serves as a handle
/// throughout the rest of the ring: positions store the index (a `u16`
/// taking up only two bytes) instead of a copy of the node.
#[derive(Debug, Clone)]
pub(crate) struct Nodes<N: Node> {
    /// Stored nodes.
    members: HashMap<NodeIdx, Member<N>, RapidBuildHasher>,

    /// Reverse lookup, node to its index.
    indexes: HashMap<N, NodeIdx, RapidBuildHasher>,

    /// Next index that will be assigned to a node.
    ///
    /// If the free list is not empty, the next index will be taken from it.
    next_idx: NodeIdx,

    /// When a node is removed, its index is added to this queue, so that
    /// it can be reused.
    free_list: VecDeque<NodeIdx>,
}

impl<N: Node> Default for Nodes<N> {
    fn default() -> Self {
        Self {
            members: HashMap::default(),
            indexes: HashMap::default(),
            next_idx: 0,
            free_list: VecDeque::new(),
        }
    }
}

impl<N: Node> Index<NodeIdx> for Nodes<N> {
    type Output = N;

    fn index(&self, idx: NodeIdx) -> &Self::Output {
        &self.members.get(&idx).expect("Node not found").node
    }
}

impl<N: Node> Nodes<N> {
    /// Creates a new empty nodes collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns index of a given node, if it is in the collection.
    pub fn idx(&self, node: &N) -> Option<NodeIdx> {
        self.indexes.get(node).copied()
    }

    /// Adds a node with its weight to the collection.
    ///
    /// The node must not be in the collection already.
    /// Returns the index of the node in the collection.
    pub fn insert(&mut self, node: N, weight: u32) -> RingResult<NodeIdx> {
        let idx = if let Some(idx) = self.free_list.pop_front() {
            idx
        } else {
            self.next_idx = self
                .next_idx
                .checked_add(1)
                .ok_or(RingError::OutOfIndices)?;
            self.next_idx - 1
        };

        self.indexes.insert(node.clone(), idx);
        self.members.insert(idx, Member { node, weight });
        Ok(idx)
    }

    /// Removes and returns (if existed) a node from the collection.
    pub fn remove(&mut self, idx: NodeIdx) -> Option<Member<N>> {
        let member = self.members.remove(&idx)?;
        self.indexes.remove(&member.node);
        self.free_list.push_back(idx);
        Some(member)
    }

    /// Returns the node with given index.
    pub fn get(&self, idx: NodeIdx) -> Option<&N> {
        self.members.get(&idx).map(|member| &member.node)
    }

    /// Returns the weight of a given node.
    pub fn weight(&self, node: &N) -> Option<u32> {
        self.idx(node)
            .and_then(|idx| self.members.get(&idx))
            .map(|member| member.weight)
    }

    /// Number of nodes in the collection.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Iterator over the nodes and their weights.
    pub fn iter(&self) -> impl Iterator<Item = (&N, u32)> {
        self.members
            .values()
            .map(|member| (&member.node, member.weight))
    }
}
