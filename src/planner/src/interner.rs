use std::collections::HashMap;
use std::hash::Hash;

/// Deduplicates immutable values, handing back a small integer handle. Equal values
/// always get the same handle and a handle is never reused for a different value.
#[derive(Debug)]
pub struct Interner<K> {
    values: Vec<K>,
    index: HashMap<K, u32>,
}

impl<K> Default for Interner<K> {
    fn default() -> Self {
        Interner {
            values: vec![],
            index: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> Interner<K> {
    pub fn intern(&mut self, value: K) -> u32 {
        if let Some(handle) = self.index.get(&value) {
            return *handle;
        }
        let handle = self.values.len() as u32;
        self.values.push(value.clone());
        self.index.insert(value, handle);
        handle
    }

    pub fn lookup(&self, handle: u32) -> &K {
        &self.values[handle as usize]
    }

    pub fn contains_handle(&self, handle: u32) -> bool {
        (handle as usize) < self.values.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
