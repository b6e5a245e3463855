#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RingError {
    /// Ring was configured with zero replicas per node.
    #[error("Replica count must be positive")]
    ZeroReplicas,

    /// Node was added with zero weight.
    #[error("Node weight must be positive")]
    ZeroWeight,

    /// Number of virtual nodes for a node does not fit into `usize`.
    #[error("Too many replicas: {replicas} replicas with weight {weight}")]
    ReplicaOverflow { replicas: usize, weight: u32 },

    /// No more indexes available in nodes to index mapping.
    #[error("Out of indexes in nodes to index mapping")]
    OutOfIndices,
}

pub type RingResult<T> = Result<T, RingError>;
