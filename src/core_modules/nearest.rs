// THEORY:
// The `nearest` module is the fallback path of the substitution engine: when
// a pixel's exact color is absent from the table, it answers "which table
// key is closest?" and returns that key's replacement value.
//
// Key architectural principles:
// 1.  **Brute-Force Scan**: A linear walk over the table's entries, comparing
//     squared channel distances. O(table size) per call, which dominates cost
//     for tables beyond a few hundred entries; a spatial index (k-d tree,
//     grid bucketing over the channel cube) could replace the scan as long
//     as the tie-break and empty-table behavior below are preserved.
// 2.  **Deterministic Tie-Break**: The strict `<` comparison means the first
//     minimal-distance key in the table's canonical iteration order wins.
//     This is an explicit contract, not an accident: the table stores its
//     entries in first-insertion order precisely so this scan is stable.
// 3.  **Identity Fallback**: An empty table is not an error. The query color
//     itself is returned unchanged, so an engine wired to an empty table
//     degrades to a no-op instead of failing.

use crate::core_modules::color_table::ColorTable;
use crate::core_modules::pixel::pixel::{Rgb, SquaredDistance};

/// Replacement value of the table key nearest to `query` by squared
/// Euclidean channel distance. Returns `query` unchanged when the table is
/// empty.
pub fn nearest_replacement(query: Rgb, table: &ColorTable) -> Rgb {
    let mut best: Option<(SquaredDistance, Rgb)> = None;

    for (key, replacement) in table.entries() {
        let distance = query.squared_distance(key);
        // Strict `<` keeps the first minimal-distance key encountered.
        if best.map_or(true, |(best_distance, _)| distance < best_distance) {
            best = Some((distance, *replacement));
        }
    }

    match best {
        Some((_, replacement)) => replacement,
        None => query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> Rgb {
        Rgb::new(r, g, b)
    }

    #[test]
    fn picks_minimal_squared_distance_key() {
        let table = ColorTable::from_pairs(vec![
            (rgb(10, 10, 10), rgb(0, 0, 0)),
            (rgb(250, 250, 250), rgb(255, 255, 255)),
        ]);
        // d((200,200,200), (10,10,10)) = 3*190^2 = 108300
        // d((200,200,200), (250,250,250)) = 3*50^2 = 7500
        assert_eq!(
            nearest_replacement(rgb(200, 200, 200), &table),
            rgb(255, 255, 255)
        );
    }

    #[test]
    fn tie_break_prefers_first_in_iteration_order() {
        // Both keys are equidistant from (100, 0, 0).
        let table = ColorTable::from_pairs(vec![
            (rgb(90, 0, 0), rgb(1, 1, 1)),
            (rgb(110, 0, 0), rgb(2, 2, 2)),
        ]);
        assert_eq!(nearest_replacement(rgb(100, 0, 0), &table), rgb(1, 1, 1));

        // Same candidates listed in the opposite order flip the winner.
        let flipped = ColorTable::from_pairs(vec![
            (rgb(110, 0, 0), rgb(2, 2, 2)),
            (rgb(90, 0, 0), rgb(1, 1, 1)),
        ]);
        assert_eq!(nearest_replacement(rgb(100, 0, 0), &flipped), rgb(2, 2, 2));
    }

    #[test]
    fn empty_table_returns_query_unchanged() {
        let table = ColorTable::empty();
        assert_eq!(nearest_replacement(rgb(42, 7, 99), &table), rgb(42, 7, 99));
    }

    #[test]
    fn exact_key_is_its_own_nearest() {
        let table = ColorTable::from_pairs(vec![(rgb(5, 5, 5), rgb(7, 7, 7))]);
        assert_eq!(nearest_replacement(rgb(5, 5, 5), &table), rgb(7, 7, 7));
    }
}
