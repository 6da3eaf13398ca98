//! Cheap footprint checks that run before any search.

use crate::geometry::footprint_dimensions;
use crate::model::{Cell, CellSize, Item, PixelPoint};
use crate::occupancy::OccupancyGrid;
use std::collections::HashSet;

/// Whether a single cell lies inside a `rows × columns` grid.
pub fn cell_within_bounds(cell: Cell, rows: usize, columns: usize) -> bool {
    cell.row >= 0
        && cell.column >= 0
        && (cell.row as usize) < rows
        && (cell.column as usize) < columns
}

/// Whether every cell of `item`'s footprint lies inside the grid.
///
/// An empty footprint is vacuously in bounds; callers that care reject it
/// through [`footprint_dimensions`] returning `(0, 0)`.
pub fn is_within_bounds<P>(item: &Item<P>, rows: usize, columns: usize) -> bool {
    item.cells
        .iter()
        .all(|&cell| cell_within_bounds(cell, rows, columns))
}

/// Whether two footprints share at least one cell.
pub fn footprints_overlap(a: &[Cell], b: &[Cell]) -> bool {
    if a.len() * b.len() <= 64 {
        return a.iter().any(|cell| b.contains(cell));
    }
    let lookup: HashSet<&Cell> = a.iter().collect();
    b.iter().any(|cell| lookup.contains(cell))
}

/// First item on `page` whose footprint contains `cell`, skipping the item
/// with id `exclude_id` (typically the one being dragged).
pub fn item_at<'a, P>(
    items: &'a [Item<P>],
    page: usize,
    cell: Cell,
    exclude_id: Option<&str>,
) -> Option<&'a Item<P>> {
    items.iter().find(|item| {
        item.page == page && Some(item.id.as_str()) != exclude_id && item.occupies(cell)
    })
}

/// First item on `page` under the pixel `point`, skipping `exclude_id`.
///
/// Unlike drop targeting this uses the point itself rather than a box
/// center, and does not clamp: a point off the grid hits nothing.
pub fn item_at_pixel<'a, P>(
    items: &'a [Item<P>],
    page: usize,
    point: PixelPoint,
    cell: CellSize,
    exclude_id: Option<&str>,
) -> Option<&'a Item<P>> {
    if cell.width <= 0 || cell.height <= 0 {
        return None;
    }
    let target = Cell::new(point.y.div_euclid(cell.height), point.x.div_euclid(cell.width));
    item_at(items, page, target, exclude_id)
}

/// Whether a free rectangle with `item`'s dimensions exists anywhere on
/// `page`, treating every other item on that page as an obstacle.
pub fn can_fit_anywhere<P>(
    items: &[Item<P>],
    item: &Item<P>,
    page: usize,
    rows: usize,
    columns: usize,
) -> bool {
    let (req_rows, req_cols) = footprint_dimensions(&item.cells);
    if req_rows == 0 || req_rows > rows || req_cols > columns {
        return false;
    }
    let grid = OccupancyGrid::for_page(items, page, rows, columns, Some(item.id.as_str()));
    grid.first_free_region(req_rows, req_cols).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_grid_is_within_bounds() {
        let item = Item::rect("a", 0, Cell::new(2, 2), 2, 2);
        assert!(is_within_bounds(&item, 4, 4));
    }

    #[test]
    fn overhanging_footprint_is_out_of_bounds() {
        let item = Item::rect("a", 0, Cell::new(3, 2), 2, 2);
        assert!(!is_within_bounds(&item, 4, 4));
    }

    #[test]
    fn negative_cells_are_out_of_bounds() {
        let item = Item::new("a", 0, vec![Cell::new(-1, 0)], ());
        assert!(!is_within_bounds(&item, 4, 4));
    }

    #[test]
    fn overlap_requires_a_shared_cell() {
        let a = Item::rect("a", 0, Cell::new(0, 0), 2, 2);
        let b = Item::rect("b", 0, Cell::new(1, 1), 1, 1);
        let c = Item::rect("c", 0, Cell::new(2, 2), 1, 1);
        assert!(footprints_overlap(&a.cells, &b.cells));
        assert!(!footprints_overlap(&a.cells, &c.cells));
    }

    #[test]
    fn large_footprints_overlap() {
        let a = Item::rect("a", 0, Cell::new(0, 0), 9, 9);
        let b = Item::rect("b", 0, Cell::new(8, 8), 9, 9);
        let c = Item::rect("c", 0, Cell::new(9, 0), 9, 9);
        assert!(footprints_overlap(&a.cells, &b.cells));
        assert!(!footprints_overlap(&a.cells, &c.cells));
    }

    #[test]
    fn item_at_respects_page_and_exclusion() {
        let items = vec![
            Item::rect("dragged", 0, Cell::new(0, 0), 1, 1),
            Item::rect("other-page", 1, Cell::new(0, 0), 1, 1),
            Item::rect("target", 0, Cell::new(0, 0), 2, 2),
        ];
        let hit = item_at(&items, 0, Cell::new(0, 0), Some("dragged")).unwrap();
        assert_eq!(hit.id, "target");
        assert!(item_at(&items, 0, Cell::new(3, 3), None).is_none());
    }

    #[test]
    fn item_at_pixel_maps_point_to_cell() {
        let items = vec![
            Item::rect("dragged", 0, Cell::new(1, 1), 1, 1),
            Item::rect("wide", 0, Cell::new(1, 1), 1, 2),
        ];
        let cell = CellSize { width: 100, height: 50 };
        let hit = item_at_pixel(&items, 0, PixelPoint { x: 250, y: 60 }, cell, Some("dragged"));
        assert_eq!(hit.map(|item| item.id.as_str()), Some("wide"));

        let miss = item_at_pixel(&items, 0, PixelPoint { x: -10, y: 60 }, cell, None);
        assert!(miss.is_none());
    }

    #[test]
    fn item_at_pixel_with_zero_cell_size_hits_nothing() {
        let items = vec![Item::rect("a", 0, Cell::new(0, 0), 1, 1)];
        let cell = CellSize { width: 0, height: 100 };
        assert!(item_at_pixel(&items, 0, PixelPoint { x: 0, y: 0 }, cell, None).is_none());
    }

    #[test]
    fn can_fit_anywhere_ignores_the_item_itself() {
        let items = vec![
            Item::rect("a", 0, Cell::new(0, 0), 1, 2),
            Item::rect("b", 0, Cell::new(1, 0), 1, 2),
        ];
        // The only free space is the cells `a` already occupies.
        assert!(can_fit_anywhere(&items, &items[0], 0, 2, 2));
        let wide = Item::rect("c", 0, Cell::new(0, 0), 1, 2);
        assert!(!can_fit_anywhere(&items, &wide, 0, 2, 2));
    }

    #[test]
    fn can_fit_anywhere_rejects_oversized_item() {
        let big = Item::rect("big", 0, Cell::new(0, 0), 5, 1);
        assert!(!can_fit_anywhere(&[], &big, 0, 4, 4));
    }
}
