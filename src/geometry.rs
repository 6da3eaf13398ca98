//! Conversions between pixel space and grid space.
//!
//! Everything here is a pure function over plain values.  Cell sizes use
//! integer division and the pixel remainder is simply left unused.

use crate::model::{Cell, CellSize, PixelPoint, PixelSize};

/// Pixel size of one cell for a `rows × columns` grid drawn into a
/// `screen_width × screen_height` area.
///
/// A zero row or column count yields a zero dimension on that axis.
pub fn cell_size(screen_width: i32, screen_height: i32, rows: usize, columns: usize) -> CellSize {
    CellSize {
        width: checked_div(screen_width, columns),
        height: checked_div(screen_height, rows),
    }
}

fn checked_div(pixels: i32, count: usize) -> i32 {
    i32::try_from(count)
        .ok()
        .and_then(|count| pixels.checked_div(count))
        .unwrap_or(0)
}

/// Map a dragged bounding box to the cell under its *center*.
///
/// `point` is the box's top-left corner.  The result is clamped into
/// `[0, rows) × [0, columns)`, so a box dragged past an edge snaps to the
/// nearest border cell.
pub fn pixel_to_cell(
    point: PixelPoint,
    bounding_box: PixelSize,
    cell: CellSize,
    rows: usize,
    columns: usize,
) -> Cell {
    let center_x = point.x.saturating_add(bounding_box.width / 2);
    let center_y = point.y.saturating_add(bounding_box.height / 2);

    let row = axis_index(center_y, cell.height, rows);
    let column = axis_index(center_x, cell.width, columns);
    Cell::new(row, column)
}

fn axis_index(pixel: i32, cell_pixels: i32, count: usize) -> i32 {
    if cell_pixels <= 0 || count == 0 {
        return 0;
    }
    let max = i32::try_from(count - 1).unwrap_or(i32::MAX);
    pixel.div_euclid(cell_pixels).clamp(0, max)
}

/// Row and column span of a footprint: `(max - min + 1)` on each axis.
///
/// Returns `(0, 0)` for an empty footprint.  Spans wider than `usize` can
/// hold saturate.
pub fn footprint_dimensions(cells: &[Cell]) -> (usize, usize) {
    let Some(first) = cells.first() else {
        return (0, 0);
    };
    let (mut min_row, mut max_row) = (first.row, first.row);
    let (mut min_col, mut max_col) = (first.column, first.column);
    for cell in &cells[1..] {
        min_row = min_row.min(cell.row);
        max_row = max_row.max(cell.row);
        min_col = min_col.min(cell.column);
        max_col = max_col.max(cell.column);
    }
    (span(min_row, max_row), span(min_col, max_col))
}

fn span(min: i32, max: i32) -> usize {
    usize::try_from(max.abs_diff(min))
        .unwrap_or(usize::MAX)
        .saturating_add(1)
}

fn scale(count: usize, per_cell: i32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX).saturating_mul(per_cell)
}

/// Pixel size of the rectangle spanned by `cells`.
///
/// Computed from the cells actually occupied rather than a stored span, so
/// it works for any footprint shape.
pub fn bounding_box(cells: &[Cell], cell: CellSize) -> PixelSize {
    let (rows, columns) = footprint_dimensions(cells);
    PixelSize {
        width: scale(columns, cell.width),
        height: scale(rows, cell.height),
    }
}

/// Pixel position of the footprint's top-left corner.
///
/// An empty footprint maps to the origin.
pub fn top_left_coordinates(cells: &[Cell], cell: CellSize) -> PixelPoint {
    let min_row = cells.iter().map(|c| c.row).min().unwrap_or(0);
    let min_col = cells.iter().map(|c| c.column).min().unwrap_or(0);
    PixelPoint {
        x: min_col.saturating_mul(cell.width),
        y: min_row.saturating_mul(cell.height),
    }
}

/// Convert a pixel size into a `(rows, columns)` span, never below one cell
/// on either axis.
pub fn pixels_to_span(size: PixelSize, cell: CellSize) -> (usize, usize) {
    let span = |pixels: i32, per_cell: i32| -> usize {
        if per_cell <= 0 {
            return 1;
        }
        (pixels / per_cell).max(1) as usize
    };
    (span(size.height, cell.height), span(size.width, cell.width))
}

/// Span a widget needs on the grid, as `(rows, columns)`.
///
/// A non-zero target span from the widget provider wins; otherwise the
/// minimum pixel size is rounded *up* to whole cells.
pub fn widget_span(
    cell: CellSize,
    min_size: PixelSize,
    target_rows: usize,
    target_columns: usize,
) -> (usize, usize) {
    let ceil_cells = |pixels: i32, per_cell: i32| -> usize {
        if per_cell <= 0 || pixels <= 0 {
            return 1;
        }
        let whole = pixels / per_cell;
        let cells = if pixels % per_cell == 0 { whole } else { whole + 1 };
        cells as usize
    };
    let rows = if target_rows > 0 {
        target_rows
    } else {
        ceil_cells(min_size.height, cell.height)
    };
    let columns = if target_columns > 0 {
        target_columns
    } else {
        ceil_cells(min_size.width, cell.width)
    };
    (rows, columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL_100: CellSize = CellSize {
        width: 100,
        height: 100,
    };

    #[test]
    fn cell_size_divides_by_columns_for_width() {
        let size = cell_size(1080, 2000, 5, 4);
        assert_eq!(size, CellSize { width: 270, height: 400 });
    }

    #[test]
    fn cell_size_drops_remainder() {
        let size = cell_size(1001, 1002, 3, 3);
        assert_eq!(size, CellSize { width: 333, height: 334 });
    }

    #[test]
    fn cell_size_with_zero_dimensions_is_zero() {
        assert_eq!(cell_size(1000, 1000, 0, 0), CellSize { width: 0, height: 0 });
    }

    #[test]
    fn pixel_to_cell_uses_box_center() {
        // Top-left at (100, 100) with a 100×100 box puts the center at (150, 150).
        let cell = pixel_to_cell(
            PixelPoint { x: 100, y: 100 },
            PixelSize { width: 100, height: 100 },
            CELL_100,
            4,
            4,
        );
        assert_eq!(cell, Cell::new(1, 1));
    }

    #[test]
    fn pixel_to_cell_center_not_top_left() {
        // Top-left lands in column 0 but more than half the box is in column 1.
        let cell = pixel_to_cell(
            PixelPoint { x: 60, y: 0 },
            PixelSize { width: 100, height: 100 },
            CELL_100,
            4,
            4,
        );
        assert_eq!(cell, Cell::new(0, 1));
    }

    #[test]
    fn pixel_to_cell_clamps_past_edges() {
        let far = pixel_to_cell(
            PixelPoint { x: 5000, y: 5000 },
            PixelSize { width: 100, height: 100 },
            CELL_100,
            4,
            3,
        );
        assert_eq!(far, Cell::new(3, 2));

        let negative = pixel_to_cell(
            PixelPoint { x: -400, y: -250 },
            PixelSize { width: 100, height: 100 },
            CELL_100,
            4,
            3,
        );
        assert_eq!(negative, Cell::new(0, 0));
    }

    #[test]
    fn pixel_to_cell_with_zero_cell_size_is_origin() {
        let cell = pixel_to_cell(
            PixelPoint { x: 300, y: 300 },
            PixelSize { width: 10, height: 10 },
            CellSize { width: 0, height: 0 },
            4,
            4,
        );
        assert_eq!(cell, Cell::new(0, 0));
    }

    #[test]
    fn footprint_dimensions_of_rectangle() {
        let cells = [Cell::new(1, 1), Cell::new(1, 2), Cell::new(2, 1), Cell::new(2, 2)];
        assert_eq!(footprint_dimensions(&cells), (2, 2));
    }

    #[test]
    fn footprint_dimensions_of_sparse_shape_uses_extent() {
        let cells = [Cell::new(0, 0), Cell::new(2, 3)];
        assert_eq!(footprint_dimensions(&cells), (3, 4));
    }

    #[test]
    fn footprint_dimensions_of_empty_is_zero() {
        assert_eq!(footprint_dimensions(&[]), (0, 0));
    }

    #[test]
    fn footprint_dimensions_of_extreme_cells_saturate() {
        let cells = [Cell::new(i32::MIN, 0), Cell::new(i32::MAX, 0)];
        let (rows, columns) = footprint_dimensions(&cells);
        assert_eq!(rows, usize::try_from(u32::MAX).unwrap() + 1);
        assert_eq!(columns, 1);
    }

    #[test]
    fn pixel_to_cell_with_extreme_point_clamps() {
        let cell = pixel_to_cell(
            PixelPoint { x: i32::MAX, y: i32::MIN },
            PixelSize { width: i32::MAX, height: 100 },
            CELL_100,
            4,
            4,
        );
        assert_eq!(cell, Cell::new(0, 3));
    }

    #[test]
    fn bounding_box_of_huge_span_saturates() {
        let cells = [Cell::new(i32::MIN, 0), Cell::new(i32::MAX, 0)];
        let size = bounding_box(&cells, CELL_100);
        assert_eq!(size, PixelSize { width: 100, height: i32::MAX });
    }

    #[test]
    fn top_left_coordinates_saturate() {
        let point = top_left_coordinates(&[Cell::new(i32::MIN, i32::MAX)], CELL_100);
        assert_eq!(point, PixelPoint { x: i32::MAX, y: i32::MIN });
    }

    #[test]
    fn widget_span_with_huge_min_size() {
        let span = widget_span(CELL_100, PixelSize { width: i32::MAX, height: 1 }, 0, 0);
        assert_eq!(span, (1, 21_474_837));
    }

    #[test]
    fn bounding_box_scales_span_by_cell_size() {
        let cells = [Cell::new(0, 1), Cell::new(0, 2), Cell::new(0, 3)];
        let size = bounding_box(&cells, CellSize { width: 80, height: 120 });
        assert_eq!(size, PixelSize { width: 240, height: 120 });
    }

    #[test]
    fn top_left_coordinates_use_min_row_and_column() {
        let cells = [Cell::new(2, 3), Cell::new(3, 1)];
        let point = top_left_coordinates(&cells, CellSize { width: 80, height: 120 });
        assert_eq!(point, PixelPoint { x: 80, y: 240 });
    }

    #[test]
    fn pixels_to_span_is_at_least_one() {
        let span = pixels_to_span(PixelSize { width: 20, height: 350 }, CELL_100);
        assert_eq!(span, (3, 1));
    }

    #[test]
    fn widget_span_prefers_target_span() {
        let span = widget_span(CELL_100, PixelSize { width: 50, height: 50 }, 2, 4);
        assert_eq!(span, (2, 4));
    }

    #[test]
    fn widget_span_rounds_min_size_up() {
        let span = widget_span(CELL_100, PixelSize { width: 201, height: 100 }, 0, 0);
        assert_eq!(span, (1, 3));
    }
}
