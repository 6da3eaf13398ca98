//! **homegrid** — grid placement and conflict resolution for home screens.
//!
//! Items (icons, widgets, folders, …) occupy rectangles of cells on fixed
//! `rows × columns` pages.  When an item is dragged, dropped or resized onto
//! cells that are already taken, the engine relocates the displaced items to
//! the nearest free space or rejects the gesture outright.
//!
//! # Architecture
//!
//! * [`geometry`] converts between pixel space and grid cells.
//! * [`bounds`] and [`occupancy`] answer "does it fit / is it free".
//! * [`search`] finds the nearest free rectangle with an A* anchor search.
//! * [`resolver`] orchestrates a whole move, resize or insertion, and
//!   [`shift`] offers push-aside resolution as an alternative to search.
//! * [`engine`] wraps all of the above behind a configured facade, and
//!   [`ipc`] exposes it as a newline-delimited JSON loop.
//!
//! Every operation is a pure function of the caller's items: the engine
//! keeps no state between calls.

pub mod bounds;
pub mod command;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod ipc;
pub mod model;
pub mod occupancy;
pub mod resolver;
pub mod search;
pub mod shift;
pub mod transform;

pub use engine::PlacementEngine;
pub use model::{Cell, CellSize, Item, PixelPoint, PixelSize, Region};
pub use resolver::{
    find_available_region_by_page, find_region_for_move, find_region_for_resize, resolve_conflicts,
    resolve_conflicts_toward, PlacementError, RelocationPolicy, ResolveOptions, ResolveStrategy,
};
pub use search::{find_free_region, Heuristic};

/// Lower-case `s` and drop whitespace, `_` and `-`, so that "Best-Effort",
/// "best_effort" and "besteffort" all compare equal.
pub(crate) fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Cell under the center of a dragged bounding box.  See
/// [`geometry::pixel_to_cell`].
pub fn pixels_to_cell_target(
    point: PixelPoint,
    bounding_box: PixelSize,
    cell: CellSize,
    rows: usize,
    columns: usize,
) -> Cell {
    geometry::pixel_to_cell(point, bounding_box, cell, rows, columns)
}

/// Pixel size of the rectangle spanned by `cells`.  See
/// [`geometry::bounding_box`].
pub fn bounding_box_for(cells: &[Cell], cell: CellSize) -> PixelSize {
    geometry::bounding_box(cells, cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_normalize_the_same_way() {
        assert_eq!(normalize_name(" Best-Effort "), "besteffort");
        assert_eq!(normalize_name("8_way"), "8way");
        assert_eq!(normalize_name("A Star"), "astar");
    }
}
