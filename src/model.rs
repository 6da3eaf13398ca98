//! Value types shared by every part of the engine.
//!
//! [`Cell`] and [`Region`] describe grid space, [`Item`] is anything that
//! occupies cells on a page.  The pixel-space types ([`CellSize`],
//! [`PixelSize`], [`PixelPoint`]) are only used by the
//! [`geometry`](crate::geometry) helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of the grid, addressed as `(row, column)`.
///
/// Coordinates are signed: a footprint that was translated or re-anchored
/// past the top or left edge is still representable, and the bounds
/// validator rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub column: i32,
}

impl Cell {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Offset this cell by `(dr, dc)`, saturating at the `i32` limits.
    pub fn offset(self, dr: i32, dc: i32) -> Self {
        Self::new(self.row.saturating_add(dr), self.column.saturating_add(dc))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Something placed on the grid: an icon, a widget, a folder, …
///
/// The engine only reads `id`, `page` and `cells`.  `payload` is carried
/// through untouched so callers can keep their own tagged data next to the
/// footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<P = ()> {
    /// Stable identifier, unique across all pages.
    pub id: String,
    /// Page (grid instance) the item lives on.
    pub page: usize,
    /// Occupied cells.  Placement treats this as a rectangle but nothing
    /// here enforces it.
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub payload: P,
}

impl<P> Item<P> {
    pub fn new(id: impl Into<String>, page: usize, cells: Vec<Cell>, payload: P) -> Self {
        Self {
            id: id.into(),
            page,
            cells,
            payload,
        }
    }

    /// Whether the footprint contains `cell`.
    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Top-left cell of the footprint's bounding rectangle, or `None` for an
    /// empty footprint.
    pub fn top_left(&self) -> Option<Cell> {
        let row = self.cells.iter().map(|c| c.row).min()?;
        let column = self.cells.iter().map(|c| c.column).min()?;
        Some(Cell::new(row, column))
    }

    /// Return a copy of this item with `cells` replaced.
    pub fn with_cells(&self, cells: Vec<Cell>) -> Self
    where
        P: Clone,
    {
        Self {
            id: self.id.clone(),
            page: self.page,
            cells,
            payload: self.payload.clone(),
        }
    }
}

impl Item<()> {
    /// Build a payload-less rectangular item.  Mostly useful in tests.
    pub fn rect(
        id: impl Into<String>,
        page: usize,
        top_left: Cell,
        rows: usize,
        columns: usize,
    ) -> Self {
        Self::new(id, page, Region::new(top_left, rows, columns).cells(), ())
    }
}

/// A `rows × columns` rectangle of cells identified by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub top_left: Cell,
    pub rows: usize,
    pub columns: usize,
}

impl Region {
    pub fn new(top_left: Cell, rows: usize, columns: usize) -> Self {
        Self {
            top_left,
            rows,
            columns,
        }
    }

    /// The region's cells in row-major order.
    ///
    /// Allocates `rows * columns` cells, so regions built from untrusted
    /// spans must be checked against the grid first.
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.rows * self.columns);
        for dr in 0..self.rows as i32 {
            for dc in 0..self.columns as i32 {
                cells.push(self.top_left.offset(dr, dc));
            }
        }
        cells
    }

    /// Whether `cell` lies inside the rectangle.
    pub fn contains(&self, cell: Cell) -> bool {
        let dr = i64::from(cell.row) - i64::from(self.top_left.row);
        let dc = i64::from(cell.column) - i64::from(self.top_left.column);
        dr >= 0 && dc >= 0 && (dr as u64) < self.rows as u64 && (dc as u64) < self.columns as u64
    }
}

//  Pixel space

/// Pixel dimensions of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: i32,
    pub height: i32,
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: i32,
    pub height: i32,
}

/// A point in pixels, origin at the grid's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}
