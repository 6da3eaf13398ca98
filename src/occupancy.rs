//! Per-page occupancy matrix.
//!
//! An [`OccupancyGrid`] is rebuilt from the caller's items for every
//! operation.  Pages hold tens of items, so there is no incremental index.

use crate::bounds::cell_within_bounds;
use crate::model::{Cell, Item, Region};

/// A `rows × columns` boolean matrix; `true` means the cell is taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: usize,
    columns: usize,
    occupied: Vec<bool>,
}

impl OccupancyGrid {
    /// Create an empty grid.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            occupied: vec![false; rows * columns],
        }
    }

    /// Build a grid from every item on `page`, optionally skipping the item
    /// with id `exclude_id`.
    pub fn for_page<P>(
        items: &[Item<P>],
        page: usize,
        rows: usize,
        columns: usize,
        exclude_id: Option<&str>,
    ) -> Self {
        let mut grid = Self::new(rows, columns);
        for item in items
            .iter()
            .filter(|item| item.page == page && Some(item.id.as_str()) != exclude_id)
        {
            grid.mark(&item.cells);
        }
        grid
    }

    //  Accessors

    /// Grid dimensions as `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Number of unoccupied cells.
    pub fn free_cells(&self) -> usize {
        self.occupied.iter().filter(|taken| !**taken).count()
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        cell_within_bounds(cell, self.rows, self.columns)
            .then(|| cell.row as usize * self.columns + cell.column as usize)
    }

    /// Whether `cell` is in bounds and taken.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.occupied[i])
    }

    //  Mutation

    /// Mark `cells` as taken.  Cells outside the grid are ignored.
    pub fn mark(&mut self, cells: &[Cell]) {
        for &cell in cells {
            if let Some(i) = self.index(cell) {
                self.occupied[i] = true;
            }
        }
    }

    /// Mark every cell of `region` as taken.
    pub fn mark_region(&mut self, region: &Region) {
        self.mark(&region.cells());
    }

    //  Queries

    /// Whether every cell is in bounds and unoccupied.
    pub fn is_free(&self, cells: &[Cell]) -> bool {
        cells
            .iter()
            .all(|&cell| self.index(cell).is_some_and(|i| !self.occupied[i]))
    }

    /// Whether the `rows × columns` rectangle anchored at `top_left` is
    /// entirely in bounds and unoccupied.  Stops at the first taken or
    /// out-of-bounds cell.
    pub fn is_region_free(&self, top_left: Cell, rows: usize, columns: usize) -> bool {
        for dr in 0..rows as i32 {
            for dc in 0..columns as i32 {
                match self.index(top_left.offset(dr, dc)) {
                    Some(i) if !self.occupied[i] => {}
                    _ => return false,
                }
            }
        }
        true
    }

    /// First free `rows × columns` rectangle scanning anchors in row-major
    /// order, or `None` if the rectangle fits nowhere.
    pub fn first_free_region(&self, rows: usize, columns: usize) -> Option<Region> {
        if rows == 0 || columns == 0 || rows > self.rows || columns > self.columns {
            return None;
        }
        for row in 0..=(self.rows - rows) as i32 {
            for column in 0..=(self.columns - columns) as i32 {
                let top_left = Cell::new(row, column);
                if self.is_region_free(top_left, rows, columns) {
                    return Some(Region::new(top_left, rows, columns));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_entirely_free() {
        let grid = OccupancyGrid::new(3, 4);
        assert_eq!(grid.dimensions(), (3, 4));
        assert_eq!(grid.free_cells(), 12);
        assert!(grid.is_region_free(Cell::new(0, 0), 3, 4));
    }

    #[test]
    fn mark_ignores_out_of_bounds_cells() {
        let mut grid = OccupancyGrid::new(2, 2);
        grid.mark(&[Cell::new(0, 0), Cell::new(5, 5), Cell::new(-1, 0)]);
        assert_eq!(grid.free_cells(), 3);
        assert!(grid.is_occupied(Cell::new(0, 0)));
        assert!(!grid.is_occupied(Cell::new(5, 5)));
    }

    #[test]
    fn region_hanging_off_the_edge_is_not_free() {
        let grid = OccupancyGrid::new(3, 3);
        assert!(!grid.is_region_free(Cell::new(2, 2), 2, 1));
        assert!(!grid.is_region_free(Cell::new(-1, 0), 1, 1));
    }

    #[test]
    fn region_with_one_taken_cell_is_not_free() {
        let mut grid = OccupancyGrid::new(3, 3);
        grid.mark(&[Cell::new(1, 1)]);
        assert!(!grid.is_region_free(Cell::new(0, 0), 2, 2));
        assert!(grid.is_region_free(Cell::new(0, 0), 1, 3));
        assert!(!grid.is_free(&[Cell::new(0, 0), Cell::new(1, 1)]));
        assert!(grid.is_free(&[Cell::new(0, 0), Cell::new(2, 2)]));
    }

    #[test]
    fn for_page_only_marks_that_page() {
        let items = vec![
            Item::rect("a", 0, Cell::new(0, 0), 1, 1),
            Item::rect("b", 1, Cell::new(1, 1), 1, 1),
            Item::rect("c", 0, Cell::new(2, 2), 1, 1),
        ];
        let grid = OccupancyGrid::for_page(&items, 0, 3, 3, Some("c"));
        assert!(grid.is_occupied(Cell::new(0, 0)));
        assert!(!grid.is_occupied(Cell::new(1, 1)));
        assert!(!grid.is_occupied(Cell::new(2, 2)));
    }

    #[test]
    fn first_free_region_scans_row_major() {
        let mut grid = OccupancyGrid::new(3, 3);
        grid.mark(&[Cell::new(0, 0), Cell::new(0, 2)]);
        let region = grid.first_free_region(1, 1).unwrap();
        assert_eq!(region.top_left, Cell::new(0, 1));
        let region = grid.first_free_region(2, 2).unwrap();
        assert_eq!(region.top_left, Cell::new(1, 0));
    }

    #[test]
    fn first_free_region_none_when_full() {
        let mut grid = OccupancyGrid::new(2, 2);
        grid.mark_region(&Region::new(Cell::new(0, 0), 2, 2));
        assert_eq!(grid.free_cells(), 0);
        assert!(grid.first_free_region(1, 1).is_none());
    }
}
