//! Insertion-ordered collection keyed by a function of its elements.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// Ordered collection whose keys are derived from the elements.
///
/// Elements live in a `Vec` in insertion order; a hash index maps each key
/// to its position. [`IndexedList::set`] replaces in place, so an element
/// keeps its position when overwritten.
#[derive(Clone)]
pub struct IndexedList<K, V> {
    items: Vec<V>,
    index: FxHashMap<K, usize>,
    key_of: fn(&V) -> K,
}

impl<K, V> IndexedList<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Creates an empty list keyed by `key_of`.
    pub fn new(key_of: fn(&V) -> K) -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
            key_of,
        }
    }

    /// Inserts a new element. Fails if its key is already present.
    pub fn add(&mut self, item: V) -> Result<()> {
        let key = (self.key_of)(&item);
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateKey {
                key: format!("{key:?}"),
            });
        }
        self.index.insert(key, self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Inserts or replaces the element with the same key.
    ///
    /// Returns the replaced element, if any.
    pub fn set(&mut self, item: V) -> Option<V> {
        let key = (self.key_of)(&item);
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.items[pos], item)),
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(item);
                None
            }
        }
    }

    /// Returns the element for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.items[pos])
    }

    /// Returns a mutable element for `key`.
    ///
    /// The caller must not change the element's key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.index.get(key) {
            Some(&pos) => Some(&mut self.items[pos]),
            None => None,
        }
    }

    /// Returns the element for `key`, failing if it is absent.
    pub fn fetch(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or_else(|| Error::KeyNotFound {
            key: format!("{key:?}"),
        })
    }

    /// Mutable variant of [`IndexedList::fetch`].
    pub fn fetch_mut(&mut self, key: &K) -> Result<&mut V> {
        match self.index.get(key) {
            Some(&pos) => Ok(&mut self.items[pos]),
            None => Err(Error::KeyNotFound {
                key: format!("{key:?}"),
            }),
        }
    }

    /// Removes and returns the element for `key`.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.index.remove(key)?;
        let item = self.items.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(item)
    }

    /// Replaces the element stored under `old` with `item`, whose key may
    /// differ. The element keeps its position.
    ///
    /// Nothing changes if `old` is absent or the new key already belongs to
    /// another element.
    pub(crate) fn replace_keyed(&mut self, old: &K, item: V) -> Result<V> {
        let pos = *self.index.get(old).ok_or_else(|| Error::KeyNotFound {
            key: format!("{old:?}"),
        })?;
        let new = (self.key_of)(&item);
        if &new != old {
            if self.index.contains_key(&new) {
                return Err(Error::DuplicateKey {
                    key: format!("{new:?}"),
                });
            }
            self.index.remove(old);
            self.index.insert(new, pos);
        }
        Ok(std::mem::replace(&mut self.items[pos], item))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    /// Iterates elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.items.iter()
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.items.iter().map(self.key_of)
    }

    /// Returns the elements as a slice, in insertion order.
    pub fn values(&self) -> &[V] {
        &self.items
    }
}

impl<K, V: PartialEq> PartialEq for IndexedList<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<K, V: fmt::Debug> fmt::Debug for IndexedList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a IndexedList<K, V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
