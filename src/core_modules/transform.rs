// THEORY:
// The `transform` module decides, for exactly one pixel, what color it
// becomes: the table's mapped value on an exact key hit, the nearest key's
// value otherwise. It is a pure function of (color, table) with no side
// effects and no allocation, because the frame processor calls it once per
// pixel in the hot path.
//
// The exact-match test is an explicit key-existence check (`Option` from the
// table lookup), never a truthiness test on the mapped value — a mapped
// value of (0,0,0) is a perfectly valid replacement and must not be
// mistaken for a miss.

use crate::core_modules::color_table::ColorTable;
use crate::core_modules::nearest::nearest_replacement;
use crate::core_modules::pixel::pixel::Rgb;

/// Replacement color for one pixel: the exact table mapping if `color` is a
/// key, else the nearest key's mapping.
#[inline]
pub fn transform_pixel(color: Rgb, table: &ColorTable) -> Rgb {
    match table.get(&color) {
        Some(replacement) => replacement,
        None => nearest_replacement(color, table),
    }
}
