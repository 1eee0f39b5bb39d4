//! Name and id lookup indices shared by the move and creature tables.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::EntryError;

/// Drop `n` trailing `_`-separated components from a name.
///
/// Returns `None` when the name has fewer than `n + 1` components.
pub fn trim_components(name: &str, n: usize) -> Option<&str> {
    let mut end = name.len();
    for _ in 0..n {
        end = name[..end].rfind('_')?;
    }
    if end == 0 {
        return None;
    }
    Some(&name[..end])
}

/// Unique name to key mapping. Inserting an existing name fails rather
/// than overwriting.
#[derive(Debug, Clone)]
pub struct NameIndex<K> {
    map: HashMap<String, K>,
}

impl<K> Default for NameIndex<K> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K: Copy> NameIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<K> {
        self.map.get(name).copied()
    }

    /// Look up `name` with `n` trailing components removed.
    pub fn get_trimmed(&self, name: &str, n: usize) -> Option<K> {
        self.get(trim_components(name, n)?)
    }

    pub fn insert(&mut self, name: &str, key: K) -> Result<(), EntryError> {
        if self.map.contains_key(name) {
            return Err(EntryError::DuplicateName(name.to_string()));
        }
        self.map.insert(name.to_string(), key);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, K)> {
        self.map.iter().map(|(name, &key)| (name.as_str(), key))
    }
}

/// Unique id to key mapping.
#[derive(Debug, Clone)]
pub struct IdIndex<I, K> {
    map: HashMap<I, K>,
}

impl<I, K> Default for IdIndex<I, K> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<I: Eq + Hash + Copy, K: Copy> IdIndex<I, K> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: I) -> bool {
        self.map.contains_key(&id)
    }

    #[inline]
    pub fn get(&self, id: I) -> Option<K> {
        self.map.get(&id).copied()
    }

    /// Insert unless `id` is taken. Returns whether the insert happened.
    pub fn try_insert(&mut self, id: I, key: K) -> bool {
        if self.map.contains_key(&id) {
            return false;
        }
        self.map.insert(id, key);
        true
    }
}
