//! Weighted consistent hash ring.
//!
//! Maps arbitrary string keys to a dynamic set of nodes such that:
//!
//! - the assignment is deterministic and reproducible from the key alone,
//! - adding or removing a node remaps only the keys that land on (or leave)
//!   that node,
//! - nodes can be given unequal shares of the keyspace via their weight.
//!
//! Each node is represented on the ring by `replicas * weight` virtual
//! nodes. A key belongs to the node owning the first virtual node at or
//! after the key's hash, wrapping around past the highest position.
//!
//! ```
//! use weighted_ring::RingBuilder;
//!
//! let ring = RingBuilder::new(100)
//!     .with_weighted_node("node-a", 2)
//!     .with_node("node-b")
//!     .build()
//!     .unwrap();
//!
//! let owner = ring.get_node("user:42").unwrap();
//! let replicas = ring.get_nodes("user:42", 2);
//! assert_eq!(replicas[0], owner);
//! assert_eq!(replicas.len(), 2);
//! ```

mod builder;
mod error;
mod hash;
mod node;
mod ring;
mod shared;


pub use {
    builder::{DEFAULT_REPLICAS, RingBuilder},
    error::{RingError, RingResult},
    hash::{DefaultHasher, FnHasher, RingHasher},
    node::Node,
    ring::Ring,
    shared::SharedRing,
};
