//! Footprint transforms that turn a gesture into a candidate mover.
//!
//! These only compute the new cells.  Whether the result is acceptable is
//! decided afterwards by the [`resolver`](crate::resolver).

use crate::geometry::{bounding_box, pixel_to_cell, pixels_to_span};
use crate::model::{Cell, CellSize, Item, PixelPoint, PixelSize, Region};
use serde::{Deserialize, Serialize};

/// Corner that stays fixed while an item is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    TopStart,
    TopEnd,
    BottomStart,
    BottomEnd,
}

/// Edge that stays fixed while an item is resized from the opposite
/// handle.  The other axis keeps its top or start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideAnchor {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl SideAnchor {
    /// Corner that behaves the same as this edge.
    fn as_corner(self) -> Anchor {
        match self {
            SideAnchor::Top | SideAnchor::Left => Anchor::TopStart,
            SideAnchor::Bottom => Anchor::BottomStart,
            SideAnchor::Right => Anchor::TopEnd,
        }
    }
}

/// Shift `cells` so the footprint's top-left lands on `target`.
pub fn translate_cells(cells: &[Cell], target: Cell) -> Vec<Cell> {
    let Some(min_row) = cells.iter().map(|c| c.row).min() else {
        return Vec::new();
    };
    let min_col = cells.iter().map(|c| c.column).min().unwrap_or(0);
    let dr = target.row.saturating_sub(min_row);
    let dc = target.column.saturating_sub(min_col);
    cells.iter().map(|c| c.offset(dr, dc)).collect()
}

/// Copy of `item` moved so its top-left lands on `target`; shape is kept.
pub fn move_to_cell<P: Clone>(item: &Item<P>, target: Cell) -> Item<P> {
    item.with_cells(translate_cells(&item.cells, target))
}

/// Copy of `item` moved to the cell under the center of its bounding box
/// when that box's top-left is dragged to `point`.
pub fn move_with_pixels<P: Clone>(
    item: &Item<P>,
    point: PixelPoint,
    cell: CellSize,
    rows: usize,
    columns: usize,
) -> Item<P> {
    let size = bounding_box(&item.cells, cell);
    let target = pixel_to_cell(point, size, cell, rows, columns);
    move_to_cell(item, target)
}

/// New rectangular footprint of `rows × columns` cells with `anchor`'s
/// corner of the old footprint held in place.
///
/// An empty footprint stays empty.  The result may leave the grid; the
/// bounds validator rejects it later.
pub fn resize_cells(cells: &[Cell], rows: usize, columns: usize, anchor: Anchor) -> Vec<Cell> {
    if cells.is_empty() {
        return Vec::new();
    }
    let min_row = cells.iter().map(|c| c.row).min().unwrap_or(0);
    let max_row = cells.iter().map(|c| c.row).max().unwrap_or(0);
    let min_col = cells.iter().map(|c| c.column).min().unwrap_or(0);
    let max_col = cells.iter().map(|c| c.column).max().unwrap_or(0);
    let row_start = |held_bottom: bool| {
        if held_bottom {
            far_edge_start(max_row, rows)
        } else {
            min_row
        }
    };
    let column_start = |held_end: bool| {
        if held_end {
            far_edge_start(max_col, columns)
        } else {
            min_col
        }
    };

    let top_left = match anchor {
        Anchor::TopStart => Cell::new(row_start(false), column_start(false)),
        Anchor::TopEnd => Cell::new(row_start(false), column_start(true)),
        Anchor::BottomStart => Cell::new(row_start(true), column_start(false)),
        Anchor::BottomEnd => Cell::new(row_start(true), column_start(true)),
    };
    Region::new(top_left, rows, columns).cells()
}

/// First index of a `span`-long run that ends at `last`.
fn far_edge_start(last: i32, span: usize) -> i32 {
    let back = i32::try_from(span.saturating_sub(1)).unwrap_or(i32::MAX);
    last.saturating_sub(back)
}

/// Like [`resize_cells`], holding one edge instead of a corner.
pub fn resize_cells_by_side(
    cells: &[Cell],
    rows: usize,
    columns: usize,
    side: SideAnchor,
) -> Vec<Cell> {
    resize_cells(cells, rows, columns, side.as_corner())
}

/// Copy of `item` resized to `rows × columns` around `anchor`.
pub fn resize_item<P: Clone>(
    item: &Item<P>,
    rows: usize,
    columns: usize,
    anchor: Anchor,
) -> Item<P> {
    item.with_cells(resize_cells(&item.cells, rows, columns, anchor))
}

/// Copy of `item` resized to the whole number of cells covered by a
/// `size`-pixel resize handle (at least 1×1).
pub fn resize_with_pixels<P: Clone>(
    item: &Item<P>,
    size: PixelSize,
    cell: CellSize,
    anchor: Anchor,
) -> Item<P> {
    let (rows, columns) = pixels_to_span(size, cell);
    resize_item(item, rows, columns, anchor)
}

/// Copy of `item` resized to the cells covered by a `size`-pixel edge
/// handle, keeping `side` in place.
pub fn resize_with_pixels_by_side<P: Clone>(
    item: &Item<P>,
    size: PixelSize,
    cell: CellSize,
    side: SideAnchor,
) -> Item<P> {
    let (rows, columns) = pixels_to_span(size, cell);
    item.with_cells(resize_cells_by_side(&item.cells, rows, columns, side))
}
