//! Order-stable, deduplicated dictionaries for layer keys and values.
//!
//! A [`Dictionary`] owns its entries together with the reverse index used
//! for interning. The index is built when the dictionary is constructed and
//! maintained on every insert, so it can never drift from the entries.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::model::{Tag, Value, ValueKey};

/// An entry type that can be stored in a [`Dictionary`].
pub trait DictionaryEntry {
    /// Key used to detect duplicates.
    type Key: Hash + Eq;

    /// Returns the lookup key for this entry.
    fn lookup_key(&self) -> Self::Key;
}

impl DictionaryEntry for String {
    type Key = String;

    fn lookup_key(&self) -> String {
        self.clone()
    }
}

impl DictionaryEntry for Value {
    type Key = ValueKey;

    fn lookup_key(&self) -> ValueKey {
        self.key()
    }
}

/// Append-only table mapping dictionary positions to entries.
///
/// Positions are the indices referenced by feature tags.
pub struct Dictionary<T: DictionaryEntry> {
    entries: Vec<T>,
    index: FxHashMap<T::Key, u32>,
}

impl<T: DictionaryEntry + fmt::Debug> fmt::Debug for Dictionary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

impl<T> Clone for Dictionary<T>
where
    T: DictionaryEntry + Clone,
    T::Key: Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            index: self.index.clone(),
        }
    }
}

impl<T: DictionaryEntry> Default for Dictionary<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T: DictionaryEntry + PartialEq> PartialEq for Dictionary<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: DictionaryEntry> Dictionary<T> {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dictionary from existing entries, keeping their order.
    ///
    /// When several entries share a lookup key, the last one owns the
    /// lookup slot. Entries are never removed.
    pub fn from_entries(entries: Vec<T>) -> Self {
        let mut index = FxHashMap::with_capacity_and_hasher(entries.len(), Default::default());
        for (i, entry) in entries.iter().enumerate() {
            index.insert(entry.lookup_key(), i as u32);
        }
        Self { entries, index }
    }

    /// Adds or gets the position of an entry.
    pub fn intern(&mut self, entry: T) -> u32 {
        let key = entry.lookup_key();
        if let Some(&idx) = self.index.get(&key) {
            idx
        } else {
            let idx = self.entries.len() as u32;
            self.entries.push(entry);
            self.index.insert(key, idx);
            idx
        }
    }

    /// Looks up the position registered for a lookup key.
    pub fn position<Q>(&self, key: &Q) -> Option<u32>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    /// Looks up an entry by position.
    pub fn get(&self, index: u32) -> Option<&T> {
        self.entries.get(index as usize)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Returns the entries as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    /// Consumes the dictionary, returning its entries.
    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }
}

impl Dictionary<String> {
    /// Adds or gets the position of a key without allocating when present.
    pub fn intern_str(&mut self, key: &str) -> u32 {
        match self.index.get(key) {
            Some(&idx) => idx,
            None => self.intern(key.to_string()),
        }
    }
}

impl Dictionary<Value> {
    /// Looks up the position a value would occupy.
    pub fn position_of(&self, value: &Value) -> Option<u32> {
        self.index.get(&value.key()).copied()
    }
}

impl<T: DictionaryEntry> FromIterator<T> for Dictionary<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut dict = Self::new();
        for entry in iter {
            dict.intern(entry);
        }
        dict
    }
}

impl<'a, T: DictionaryEntry> IntoIterator for &'a Dictionary<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Interns a key, returning its (possibly new) position.
pub fn intern_key(keys: &mut Dictionary<String>, key: &str) -> u32 {
    keys.intern_str(key)
}

/// Interns a value, returning its (possibly new) position.
pub fn intern_value(values: &mut Dictionary<Value>, value: Value) -> u32 {
    values.intern(value)
}

/// Appends a tag pair to a feature's tags. Pairs are never deduplicated.
pub fn append_tag(tags: &mut Vec<Tag>, key: u32, value: u32) {
    tags.push(Tag { key, value });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_key_idempotent() {
        let mut keys = Dictionary::new();

        // First add returns 0
        assert_eq!(intern_key(&mut keys, "name"), 0);
        // Second add of same key returns same index
        assert_eq!(intern_key(&mut keys, "name"), 0);
        // Different key gets new index
        assert_eq!(intern_key(&mut keys, "class"), 1);

        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get(1).map(String::as_str), Some("class"));
        assert_eq!(keys.position("name"), Some(0));
        assert_eq!(keys.position("missing"), None);
    }

    #[test]
    fn test_intern_value_numeric_collision() {
        let mut values = Dictionary::new();

        assert_eq!(intern_value(&mut values, Value::Int(1)), 0);
        assert_eq!(intern_value(&mut values, Value::Double(1.0)), 0);
        assert_eq!(intern_value(&mut values, Value::from("1")), 1);
        assert_eq!(intern_value(&mut values, Value::Bool(true)), 2);

        // the slot keeps the first declared kind
        assert_eq!(values.len(), 3);
        assert_eq!(values.get(0), Some(&Value::Int(1)));
    }

    #[test]
    fn test_from_entries_last_collision_wins() {
        let values = Dictionary::from_entries(vec![
            Value::Int(7),
            Value::from("x"),
            Value::Double(7.0),
        ]);

        assert_eq!(values.len(), 3);
        assert_eq!(values.position_of(&Value::UInt(7)), Some(2));
        assert_eq!(values.position_of(&Value::from("x")), Some(1));
        // colliding entries are all kept in place
        assert_eq!(
            values.into_entries(),
            vec![Value::Int(7), Value::from("x"), Value::Double(7.0)]
        );
    }

    #[test]
    fn test_append_tag_keeps_duplicates() {
        let mut tags = Vec::new();
        append_tag(&mut tags, 0, 1);
        append_tag(&mut tags, 0, 1);
        assert_eq!(tags, vec![Tag { key: 0, value: 1 }, Tag { key: 0, value: 1 }]);
    }
}
