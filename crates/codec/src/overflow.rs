//! Overflow bag: the catch-all store for wire fields unknown to a
//! descriptor set.

use crate::value::FieldValue;

/// Inserts into an ordered key/value list with "last write wins, first
/// position kept" semantics. Shared by the overflow bag and plain map decode
/// so duplicate keys behave identically in both.
pub(crate) fn insert_ordered(entries: &mut Vec<(String, FieldValue)>, key: String, value: FieldValue) {
    match entries.iter_mut().find(|(existing, _)| *existing == key) {
        Some((_, slot)) => *slot = value,
        None => entries.push((key, value)),
    }
}

/// Ordered mapping of unknown wire field name to captured value.
///
/// Present only on instances of types that declare an overflow kind, and
/// only once an unknown field has been seen or a caller asked for the bag
/// explicitly. Iteration order is first-occurrence order on the wire and is
/// preserved on re-encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverflowBag {
    entries: Vec<(String, FieldValue)>,
}

impl OverflowBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value. A repeated key overwrites the prior value but keeps
    /// the original insertion position.
    pub fn insert(&mut self, key: String, value: FieldValue) {
        insert_ordered(&mut self.entries, key, value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
