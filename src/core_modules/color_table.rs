// THEORY:
// The `ColorTable` is the central data structure of the engine: an
// immutable-after-construction mapping from a source color to its
// replacement. Every other module only ever reads it.
//
// Key architectural principles:
// 1.  **Merge-Once Construction**: A table is assembled exactly once from two
//     or more partial listings. On a key collision the later-listed source
//     wins, but the key keeps the position it was first seen at. After
//     construction there is no way to add, remove, or mutate an entry.
// 2.  **Deterministic Iteration Order**: Entries are stored in a `Vec` in
//     first-insertion order, with a `HashMap` index on the side for O(1)
//     exact lookups. The nearest-color scan walks the `Vec`, so its
//     tie-break ("first minimal-distance key wins") is a stable, documented
//     property instead of an accident of hash ordering.
// 3.  **Safe to Share**: With no interior mutability the table can be handed
//     out behind an `Arc` and read concurrently without synchronization.

use crate::core_modules::pixel::pixel::Rgb;
use std::collections::HashMap;

/// An immutable mapping from a source color to its replacement color.
#[derive(Debug, Default)]
pub struct ColorTable {
    /// All entries in first-insertion order. This is the canonical iteration
    /// order for the nearest-color scan.
    entries: Vec<(Rgb, Rgb)>,
    /// Exact-match index into `entries`.
    index: HashMap<Rgb, usize>,
}

impl ColorTable {
    /// Builds a table by merging partial listings in the order given.
    ///
    /// Duplicate keys resolve to the value from the later-listed source; the
    /// key's position in iteration order is the position it was first seen
    /// at.
    pub fn from_parts<I, P>(parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = (Rgb, Rgb)>,
    {
        let mut table = Self::default();
        for part in parts {
            for (key, value) in part {
                table.insert(key, value);
            }
        }
        table
    }

    /// Builds a table from a single listing. Equivalent to `from_parts` with
    /// one part.
    pub fn from_pairs<P>(pairs: P) -> Self
    where
        P: IntoIterator<Item = (Rgb, Rgb)>,
    {
        Self::from_parts([pairs])
    }

    /// An empty table. Every nearest-color query against it falls back to
    /// the identity transform.
    pub fn empty() -> Self {
        Self::default()
    }

    // Construction-only. Not public: the table is read-only once built.
    fn insert(&mut self, key: Rgb, value: Rgb) {
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Replacement for `color` if it is an exact key of the table.
    #[inline]
    pub fn get(&self, color: &Rgb) -> Option<Rgb> {
        self.index.get(color).map(|&position| self.entries[position].1)
    }

    /// All `(source, replacement)` entries in canonical iteration order.
    #[inline]
    pub fn entries(&self) -> &[(Rgb, Rgb)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> Rgb {
        Rgb::new(r, g, b)
    }

    #[test]
    fn later_source_overrides_earlier() {
        let table = ColorTable::from_parts([
            vec![(rgb(1, 1, 1), rgb(2, 2, 2))],
            vec![(rgb(1, 1, 1), rgb(3, 3, 3))],
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&rgb(1, 1, 1)), Some(rgb(3, 3, 3)));
    }

    #[test]
    fn override_keeps_first_insertion_position() {
        let table = ColorTable::from_parts([
            vec![(rgb(1, 1, 1), rgb(2, 2, 2)), (rgb(9, 9, 9), rgb(8, 8, 8))],
            vec![(rgb(1, 1, 1), rgb(3, 3, 3))],
        ]);
        // The overridden key stays first in iteration order.
        assert_eq!(table.entries()[0], (rgb(1, 1, 1), rgb(3, 3, 3)));
        assert_eq!(table.entries()[1], (rgb(9, 9, 9), rgb(8, 8, 8)));
    }

    #[test]
    fn exact_lookup_misses_on_absent_key() {
        let table = ColorTable::from_pairs(vec![(rgb(1, 1, 1), rgb(2, 2, 2))]);
        assert_eq!(table.get(&rgb(0, 0, 0)), None);
    }

    #[test]
    fn empty_table_has_no_entries() {
        let table = ColorTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.entries().len(), 0);
    }
}
