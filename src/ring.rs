//! Hash Ring Module
//!
//! Consistent hashing with virtual nodes. Each real node contributes
//! `replicas` positions on the ring so keys spread evenly, and adding a
//! node remaps only a small fraction of keys.

use std::collections::HashMap;

/// Hash function mapping bytes onto the ring's keyspace.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

// == Hash Ring ==
/// Sorted sequence of virtual-node hashes plus the mapping back to real
/// node identifiers.
///
/// There is no removal operation: dropping a node means rebuilding the
/// ring from the reduced node set.
pub struct HashRing {
    hash: HashFn,
    /// Virtual nodes per real node
    replicas: usize,
    /// Sorted virtual-node hashes; duplicates from collisions are kept
    keys: Vec<u32>,
    /// Virtual hash -> real node identifier
    nodes: HashMap<u32, String>,
}

impl HashRing {
    // == Constructors ==
    /// Creates a ring using CRC32 (IEEE) as the hash function.
    pub fn new(replicas: usize) -> Self {
        Self::with_hash(replicas, Box::new(crc32fast::hash))
    }

    /// Creates a ring with a custom hash function.
    pub fn with_hash(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            keys: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    // == Add ==
    /// Adds real nodes to the ring.
    ///
    /// Each node lands on `replicas` positions, hashed from the replica
    /// index prepended to the node identifier. The key sequence is
    /// re-sorted once after the whole batch.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let virtual_hash = (self.hash)(format!("{i}{node}").as_bytes());
                self.keys.push(virtual_hash);
                self.nodes.insert(virtual_hash, node.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    // == Locate ==
    /// Returns the node owning `key`, or `None` for an empty key or an
    /// empty ring.
    ///
    /// Ownership goes to the first virtual node at or past the key's
    /// hash, wrapping around to the smallest position when the hash is
    /// beyond every ring entry.
    pub fn locate(&self, key: &str) -> Option<&str> {
        if key.is_empty() || self.keys.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&h| h < hash);
        let virtual_hash = self.keys[idx % self.keys.len()];
        self.nodes.get(&virtual_hash).map(String::as_str)
    }

    // == Accessors ==
    /// Returns true if no nodes have been added.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
