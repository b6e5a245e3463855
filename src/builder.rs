use crate::{DefaultHasher, FnHasher, Node, Ring, RingHasher, RingResult, SharedRing};

/// Number of virtual nodes per unit of weight used by [`RingBuilder::default`].
pub const DEFAULT_REPLICAS: usize = 160;

/// Ring builder.
///
/// Collects ring configuration and the initial set of nodes. Validation
/// happens in [`build()`](Self::build), which fails on the first invalid
/// setting or node.
pub struct RingBuilder<N: Node, H = DefaultHasher> {
    replicas: usize,
    hasher: H,
    nodes: Vec<(N, u32)>,
}

impl<N: Node> Default for RingBuilder<N> {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS)
    }
}

impl<N: Node> RingBuilder<N> {
    /// Create new ring builder with a given number of replicas per unit of
    /// weight.
    pub fn new(replicas: usize) -> Self {
        Self {
            replicas,
            hasher: DefaultHasher,
            nodes: Vec::new(),
        }
    }
}

impl<N: Node, H: RingHasher> RingBuilder<N, H> {
    /// Transform the builder into one with a different hasher.
    pub fn with_hasher<CustomH: RingHasher>(self, hasher: CustomH) -> RingBuilder<N, CustomH> {
        RingBuilder {
            replicas: self.replicas,
            hasher,
            nodes: self.nodes,
        }
    }

    /// Transform the builder into one hashing with a plain function.
    pub fn with_hash_fn<F>(self, hash_fn: F) -> RingBuilder<N, FnHasher<F>>
    where
        F: Fn(&str) -> u32,
    {
        self.with_hasher(FnHasher::new(hash_fn))
    }

    /// Add a node with weight 1.
    pub fn with_node(self, node: N) -> Self {
        self.with_weighted_node(node, 1)
    }

    /// Add a node with the given weight.
    pub fn with_weighted_node(mut self, node: N, weight: u32) -> Self {
        self.nodes.push((node, weight));
        self
    }

    /// Add several nodes with weight 1.
    pub fn with_nodes<I: IntoIterator<Item = N>>(mut self, nodes: I) -> Self {
        self.nodes.extend(nodes.into_iter().map(|node| (node, 1)));
        self
    }

    /// Build the ring.
    ///
    /// Nodes are added in the order they were given to the builder.
    pub fn build(self) -> RingResult<Ring<N, H>> {
        let mut ring = Ring::with_hasher(self.replicas, self.hasher)?;
        for (node, weight) in self.nodes {
            ring.add_node_with_weight(node, weight)?;
        }
        Ok(ring)
    }

    /// Build the ring wrapped for shared use.
    pub fn build_shared(self) -> RingResult<SharedRing<N, H>> {
        self.build().map(SharedRing::new)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::RingError};

    #[test]
    fn ring_builder() {
        let ring = RingBuilder::default()
            .with_nodes(["node1", "node2"])
            .with_weighted_node("node3", 2)
            .build()
            .unwrap();
        assert_eq!(ring.replicas(), DEFAULT_REPLICAS);
        assert_eq!(ring.node_count(), 3);
        assert_eq!(ring.len(), DEFAULT_REPLICAS * 4);

        let ring = RingBuilder::new(3)
            .with_hash_fn(|key: &str| key.bytes().map(u32::from).sum::<u32>())
            .with_node("a")
            .build()
            .unwrap();
        assert_eq!(ring.position("ab"), 97 + 98);

        let shared = RingBuilder::new(10).with_node(1u32).build_shared().unwrap();
        assert_eq!(shared.get_node("key"), Some(1));
    }

    #[test]
    fn ring_builder_errors() {
        let ring = RingBuilder::<&str>::new(0).with_node("a").build();
        assert_eq!(ring.err(), Some(RingError::ZeroReplicas));

        let ring = RingBuilder::new(3)
            .with_node("a")
            .with_weighted_node("b", 0)
            .build();
        assert_eq!(ring.err(), Some(RingError::ZeroWeight));

        let ring = RingBuilder::new(usize::MAX)
            .with_weighted_node("a", 2)
            .build();
        assert_eq!(
            ring.err(),
            Some(RingError::ReplicaOverflow {
                replicas: usize::MAX,
                weight: 2,
            })
        );
    }
}
