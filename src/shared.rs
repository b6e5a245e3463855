use {
    crate::{DefaultHasher, Node, Ring, RingHasher, RingResult},
    parking_lot::{Mutex, RwLock},
    std::sync::Arc,
};

/// Ring that can be read and updated from several threads.
///
/// Readers work against an immutable snapshot of the ring and never observe
/// a partially updated one. Writers are serialized: each update clones the
/// current ring, applies the change to the copy and publishes it atomically.
/// Snapshots taken before an update keep seeing the old ring.
pub struct SharedRing<N: Node, H = DefaultHasher> {
    current: RwLock<Arc<Ring<N, H>>>,
    writer: Mutex<()>,
}

impl<N: Node, H> From<Ring<N, H>> for SharedRing<N, H> {
    fn from(ring: Ring<N, H>) -> Self {
        Self::new(ring)
    }
}

impl<N: Node, H> SharedRing<N, H> {
    /// Wraps a ring for shared use.
    pub fn new(ring: Ring<N, H>) -> Self {
        Self {
            current: RwLock::new(Arc::new(ring)),
            writer: Mutex::new(()),
        }
    }

    /// Returns the current state of the ring.
    ///
    /// The snapshot is not affected by subsequent updates.
    pub fn snapshot(&self) -> Arc<Ring<N, H>> {
        self.current.read().clone()
    }
}

impl<N: Node, H: RingHasher> SharedRing<N, H> {
    /// Applies a change to the ring and publishes the result.
    ///
    /// If `f` fails, nothing is published and the error is returned.
    pub fn update<T, F>(&self, f: F) -> RingResult<T>
    where
        F: FnOnce(&mut Ring<N, H>) -> RingResult<T>,
    {
        let _writer = self.writer.lock();
        let mut next = (*self.snapshot()).clone();
        let res = f(&mut next)?;
        *self.current.write() = Arc::new(next);
        Ok(res)
    }

    /// Adds a node with weight 1.
    pub fn add_node(&self, node: N) -> RingResult<()> {
        self.update(|ring| ring.add_node(node))
    }

    /// Adds a node with the given weight, see [`Ring::add_node_with_weight`].
    pub fn add_node_with_weight(&self, node: N, weight: u32) -> RingResult<()> {
        self.update(|ring| ring.add_node_with_weight(node, weight))
    }

    /// Removes a node from the ring.
    ///
    /// Returns the node if it was removed, `None` otherwise. Nothing is
    /// published when the node was not on the ring.
    pub fn remove_node(&self, node: &N) -> Option<N> {
        let _writer = self.writer.lock();
        let current = self.snapshot();
        if !current.contains(node) {
            return None;
        }

        let mut next = (*current).clone();
        let removed = next.remove_node(node);
        *self.current.write() = Arc::new(next);
        removed
    }

    /// Returns the node responsible for the given key.
    pub fn get_node(&self, key: &str) -> Option<N> {
        self.snapshot().get_node(key).cloned()
    }

    /// Returns up to `count` distinct nodes responsible for the given key.
    pub fn get_nodes(&self, key: &str, count: usize) -> Vec<N> {
        self.snapshot()
            .get_nodes(key, count)
            .into_iter()
            .cloned()
            .collect()
    }
}
