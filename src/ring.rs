use {
    crate::{
        DefaultHasher,
        FnHasher,
        Node,
        RingError,
        RingHasher,
        RingResult,
        hash::replica_key,
        node::{NodeIdx, Nodes},
    },
    std::{collections::BTreeMap, fmt, sync::Arc},
    tracing::{debug, trace},
};

/// Weighted consistent hash ring.
///
/// Every node is represented by `replicas * weight` virtual nodes, each
/// placed on a `u32` ring at `hasher("{node}:{index}")`. A key is owned by
/// the node of the first position at or after the key's hash, wrapping
/// around to the lowest position when the key hashes past the last one.
///
/// The ring is a plain owned value with no internal locking. Wrap it into
/// [`SharedRing`](crate::SharedRing) when it needs to be read and updated
/// from several threads.
pub struct Ring<N: Node, H = DefaultHasher> {
    /// Number of virtual nodes per unit of weight.
    replicas: usize,

    /// Hash function shared by all snapshots of the ring.
    hasher: Arc<H>,

    /// Weight table.
    nodes: Nodes<N>,

    /// Ring positions, in ascending order, bound to their owning node.
    positions: BTreeMap<u32, NodeIdx>,
}

impl<N: Node, H> Clone for Ring<N, H> {
    fn clone(&self) -> Self {
        Self {
            replicas: self.replicas,
            hasher: Arc::clone(&self.hasher),
            nodes: self.nodes.clone(),
            positions: self.positions.clone(),
        }
    }
}

impl<N: Node + fmt::Debug, H> fmt::Debug for Ring<N, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("replicas", &self.replicas)
            .field("nodes", &self.nodes)
            .field("positions", &self.positions.len())
            .finish()
    }
}

impl<N: Node> Ring<N> {
    /// Creates an empty ring using the default hasher.
    ///
    /// `replicas` is the number of virtual nodes a node of weight 1 gets.
    /// Tens to low hundreds is a reasonable choice: more replicas smooth the
    /// load out at the cost of a bigger lookup structure.
    pub fn new(replicas: usize) -> RingResult<Self> {
        Self::with_hasher(replicas, DefaultHasher)
    }
}

impl<N: Node, F> Ring<N, FnHasher<F>>
where
    F: Fn(&str) -> u32,
{
    /// Creates an empty ring that places keys using the given function.
    pub fn with_hash_fn(replicas: usize, hash_fn: F) -> RingResult<Self> {
        Self::with_hasher(replicas, FnHasher::new(hash_fn))
    }
}

impl<N: Node, H: RingHasher> Ring<N, H> {
    /// Creates an empty ring with a custom hasher.
    pub fn with_hasher(replicas: usize, hasher: H) -> RingResult<Self> {
        if replicas == 0 {
            return Err(RingError::ZeroReplicas);
        }

        Ok(Self {
            replicas,
            hasher: Arc::new(hasher),
            nodes: Nodes::new(),
            positions: BTreeMap::new(),
        })
    }

    /// Adds a node with weight 1.
    pub fn add_node(&mut self, node: N) -> RingResult<()> {
        self.add_node_with_weight(node, 1)
    }

    /// Adds a node with the given weight.
    ///
    /// The node claims `replicas * weight` positions on the ring, so its
    /// share of the keys is proportional to its weight relative to the sum
    /// of all weights.
    ///
    /// If the node is already on the ring, its positions are replaced: the
    /// call sets the node's weight rather than adding to it.
    ///
    /// A zero weight is rejected with [`RingError::ZeroWeight`]. On error
    /// the ring is left unchanged.
    pub fn add_node_with_weight(&mut self, node: N, weight: u32) -> RingResult<()> {
        if weight == 0 {
            return Err(RingError::ZeroWeight);
        }
        let count = self
            .replicas
            .checked_mul(weight as usize)
            .ok_or(RingError::ReplicaOverflow {
                replicas: self.replicas,
                weight,
            })?;

        let replaced = self.remove_node(&node).is_some();
        let idx = self.nodes.insert(node, weight)?;
        let node = &self.nodes[idx];

        for i in 0..count {
            let position = self.hasher.hash(&replica_key(node, i));
            if let Some(prev) = self.positions.insert(position, idx) {
                trace!(position, %node, "replica position overwritten: {}", self.nodes[prev]);
            }
        }

        debug!(%node, weight, replaced, positions = self.positions.len(), "added node to ring");
        Ok(())
    }

    /// Removes a node and all of its positions from the ring.
    ///
    /// Returns the node if it was removed, `None` if it was not on the ring.
    pub fn remove_node(&mut self, node: &N) -> Option<N> {
        let idx = self.nodes.idx(node)?;
        let member = self.nodes.remove(idx)?;

        // Checked on insertion.
        let count = self.replicas * member.weight as usize;
        for i in 0..count {
            let position = self.hasher.hash(&replica_key(node, i));
            // Position may have been taken over by another node on collision.
            if self.positions.get(&position) == Some(&idx) {
                self.positions.remove(&position);
            }
        }

        debug!(%node, positions = self.positions.len(), "removed node from ring");
        Some(member.node)
    }

    /// Returns the node responsible for the given key.
    ///
    /// If the ring is empty (no nodes has been added), `None` is returned.
    pub fn get_node(&self, key: &str) -> Option<&N> {
        let position = self.position(key);
        self.positions
            .range(position..)
            .next()
            .or_else(|| self.positions.first_key_value())
            .and_then(|(_, idx)| self.nodes.get(*idx))
    }

    /// Returns up to `count` distinct nodes responsible for the given key.
    ///
    /// Nodes are listed in ring order starting at the key's position, the
    /// first one is always the node returned by [`get_node()`](Self::get_node).
    /// The walk stops after one full revolution, so fewer than `count` nodes
    /// are returned when the ring does not have that many.
    pub fn get_nodes(&self, key: &str, count: usize) -> Vec<&N> {
        let max = count.min(self.nodes.len());
        if max == 0 {
            return Vec::new();
        }

        let mut found: Vec<NodeIdx> = Vec::with_capacity(max);
        let position = self.position(key);
        let after = self.positions.range(position..);
        let before = self.positions.range(..position);
        for (_, idx) in after.chain(before) {
            if !found.contains(idx) {
                found.push(*idx);
                if found.len() == max {
                    break;
                }
            }
        }

        found
            .into_iter()
            .filter_map(|idx| self.nodes.get(idx))
            .collect()
    }

    /// Returns the ring position a given key hashes to.
    pub fn position(&self, key: &str) -> u32 {
        self.hasher.hash(key)
    }

    /// Returns `true` if the node is on the ring.
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.idx(node).is_some()
    }

    /// Returns the weight of the node, if it is on the ring.
    pub fn weight(&self, node: &N) -> Option<u32> {
        self.nodes.weight(node)
    }

    /// Iterator over the nodes on the ring and their weights.
    pub fn nodes(&self) -> impl Iterator<Item = (&N, u32)> {
        self.nodes.iter()
    }

    /// Iterator over ring positions and their owners, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &N)> {
        self.positions
            .iter()
            .filter_map(move |(position, idx)| {
                self.nodes.get(*idx).map(|node| (*position, node))
            })
    }

    /// Number of virtual nodes per unit of weight.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Number of nodes on the ring.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of positions on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the ring has no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
