//! Segmented LRU map with small, fixed capacities.
//!
//! New entries land in the probationary segment; a second hit promotes them to
//! the protected segment. Protected overflow is demoted back to probationary,
//! probationary overflow is dropped. Both segments keep their oldest entry at
//! index 0; capacities are tiny so linear scans beat hashing.

#[derive(Debug, Clone)]
pub struct SlruMap<K, V> {
    protected: Vec<(K, V)>,
    probationary: Vec<(K, V)>,
    protected_capacity: usize,
    probationary_capacity: usize,
}

impl<K: PartialEq, V> SlruMap<K, V> {
    pub fn new(protected_capacity: usize, probationary_capacity: usize) -> Self {
        let protected_capacity = protected_capacity.max(1);
        let probationary_capacity = probationary_capacity.max(1);
        Self {
            protected: Vec::new(),
            probationary: Vec::new(),
            protected_capacity,
            probationary_capacity,
        }
    }

    /// Looks `key` up and records the hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if let Some(pos) = self.protected.iter().position(|(k, _)| k == key) {
            let entry = self.protected.remove(pos);
            self.protected.push(entry);
        } else {
            let pos = self.probationary.iter().position(|(k, _)| k == key)?;
            let entry = self.probationary.remove(pos);
            self.promote(entry);
        }
        self.protected.last().map(|(_, value)| value)
    }

    pub fn put(&mut self, key: K, value: V) {
        if let Some(pos) = self.protected.iter().position(|(k, _)| *k == key) {
            self.protected.remove(pos);
            self.protected.push((key, value));
            return;
        }
        if let Some(pos) = self.probationary.iter().position(|(k, _)| *k == key) {
            self.probationary.remove(pos);
        }
        self.push_probationary((key, value));
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.protected
            .iter()
            .chain(self.probationary.iter())
            .any(|(k, _)| k == key)
    }

    pub fn clear(&mut self) {
        self.protected.clear();
        self.probationary.clear();
    }

    pub fn len(&self) -> usize {
        self.protected.len() + self.probationary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upper bound of `len()`.
    pub fn capacity(&self) -> usize {
        self.protected_capacity
            .saturating_add(self.probationary_capacity)
    }

    fn promote(&mut self, entry: (K, V)) {
        self.protected.push(entry);
        if self.protected.len() > self.protected_capacity {
            let demoted = self.protected.remove(0);
            self.push_probationary(demoted);
        }
    }

    fn push_probationary(&mut self, entry: (K, V)) {
        self.probationary.push(entry);
        if self.probationary.len() > self.probationary_capacity {
            self.probationary.remove(0);
        }
    }
}
