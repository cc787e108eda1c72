//! Sorted-unique element container backing the `orderedset` tag.
//!
//! Elements are kept ascending under [`Value::total_cmp`] with no
//! structural duplicates. The operator engine's two-pointer merges rely on
//! this invariant, so every constructor re-establishes it.

use super::Value;

/// Set with a maintained sort order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderedSet {
    items: Vec<Value>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Wrap a vector that is already sorted and duplicate-free.
    ///
    /// This is the cheap path for merge results, which produce their output
    /// in order.
    pub fn from_sorted_vec(items: Vec<Value>) -> Self {
        debug_assert!(
            items
                .windows(2)
                .all(|w| w[0].total_cmp(&w[1]) == std::cmp::Ordering::Less),
            "input must be sorted and duplicate-free"
        );
        Self { items }
    }

    /// Insert an element, keeping order. Returns false if an equal element
    /// was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        match self.items.binary_search_by(|x| x.total_cmp(&value)) {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, value);
                true
            }
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items
            .binary_search_by(|x| x.total_cmp(value))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl FromIterator<Value> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut items: Vec<Value> = iter.into_iter().collect();
        items.sort_by(Value::total_cmp);
        items.dedup();
        Self { items }
    }
}

impl<'a> IntoIterator for &'a OrderedSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
