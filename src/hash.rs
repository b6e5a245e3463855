use {auto_impl::auto_impl, rapidhash::rapidhash};

/// Hash function that places keys and virtual nodes on the ring.
///
/// Implementations must be deterministic: the same input must produce the
/// same output across calls and, if ring state needs to be reproducible,
/// across process restarts. Output should be spread uniformly over the whole
/// `u32` range, collision resistance is not required.
#[auto_impl(&, Box, Arc)]
pub trait RingHasher {
    /// Maps a string to its position on the ring.
    fn hash(&self, key: &str) -> u32;
}

/// Default hasher for the ring.
///
/// Uses rapidhash with the default seed and secrets and folds the 64-bit
/// digest into 32 bits. The output is portable across platforms.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHasher;

impl RingHasher for DefaultHasher {
    fn hash(&self, key: &str) -> u32 {
        let digest = rapidhash(key.as_bytes());
        ((digest >> 32) ^ digest) as u32
    }
}

/// Adapter that turns a plain function or closure into a [`RingHasher`].
#[derive(Debug, Clone, Copy)]
pub struct FnHasher<F>(F);

impl<F> FnHasher<F>
where
    F: Fn(&str) -> u32,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> RingHasher for FnHasher<F>
where
    F: Fn(&str) -> u32,
{
    fn hash(&self, key: &str) -> u32 {
        (self.0)(key)
    }
}

/// Key under which the `index`-th virtual node of `node` is hashed.
pub(crate) fn replica_key(node: &impl std::fmt::Display, index: usize) -> String {
    format!("{node}:{index}")
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::{collections::HashSet, sync::Arc},
    };

    fn hash_key<H: RingHasher>(hasher: H) -> u32 {
        hasher.hash("key")
    }

    #[test]
    fn sanity_checks() {
        // Same input, same output.
        let hash1 = DefaultHasher.hash("hello world");
        let hash2 = DefaultHasher.hash("hello world");
        assert_eq!(hash1, hash2, "Hashes should be equal for the same input");
        assert_ne!(DefaultHasher.hash("hello world"), DefaultHasher.hash("hello world!"));

        // Forwarding impls agree with the hasher itself.
        let boxed: Box<DefaultHasher> = Box::new(DefaultHasher);
        let shared = Arc::new(DefaultHasher);
        assert_eq!(boxed.hash("key"), DefaultHasher.hash("key"));
        assert_eq!(shared.hash("key"), DefaultHasher.hash("key"));
        assert_eq!(hash_key(&DefaultHasher), DefaultHasher.hash("key"));
    }

    #[test]
    fn spreads_over_range() {
        let hashes = (0..10_000)
            .map(|i| DefaultHasher.hash(&format!("key{i}")))
            .collect::<Vec<_>>();

        // Virtually no collisions for a small sample.
        let unique = hashes.iter().collect::<HashSet<_>>();
        assert!(unique.len() > 9_990);

        // Both halves of the range are populated roughly evenly.
        let upper = hashes.iter().filter(|h| **h > u32::MAX / 2).count();
        assert!((4_000..6_000).contains(&upper), "skewed: {upper}");
    }

    #[test]
    fn fn_hasher() {
        let hasher = FnHasher::new(|key: &str| key.len() as u32);
        assert_eq!(hasher.hash("abc"), 3);
        assert_eq!(replica_key(&"node", 7), "node:7");
        assert_eq!(replica_key(&42, 0), "42:0");
    }
}
