//! Informed search for the nearest free rectangle.
//!
//! Every visited cell is a candidate *anchor* for the rectangle's top-left
//! corner.  Traversal ignores occupancy entirely: an occupied cell is still
//! a valid stepping stone, only the rectangle-fit test at each popped anchor
//! looks at the [`OccupancyGrid`].  The first anchor whose rectangle fits is
//! returned.
//!
//! Both distance policies share the same loop and differ only in their
//! neighbour set and distance function, see [`Heuristic`].

use crate::model::{Cell, Region};
use crate::normalize_name;
use crate::occupancy::OccupancyGrid;
use log::trace;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const ALL_EIGHT: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Distance policy for the anchor search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heuristic {
    /// `|dr| + |dc|` with 4-directional expansion.
    #[default]
    Manhattan,
    /// `max(|dr|, |dc|)` with 8-directional expansion.
    Chebyshev,
}

impl Heuristic {
    /// Distance between two cells under this policy.
    pub fn distance(self, a: Cell, b: Cell) -> u32 {
        let dr = a.row.abs_diff(b.row);
        let dc = a.column.abs_diff(b.column);
        match self {
            Heuristic::Manhattan => dr + dc,
            Heuristic::Chebyshev => dr.max(dc),
        }
    }

    /// Step offsets used to expand a node.
    pub fn neighbours(self) -> &'static [(i32, i32)] {
        match self {
            Heuristic::Manhattan => &ORTHOGONAL,
            Heuristic::Chebyshev => &ALL_EIGHT,
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heuristic::Manhattan => write!(f, "manhattan"),
            Heuristic::Chebyshev => write!(f, "chebyshev"),
        }
    }
}

/// Parse a heuristic name (case-insensitive; accepts "manhattan", "4-way",
/// "Chebyshev", "8_way", etc.).
pub fn parse_heuristic(s: &str) -> Option<Heuristic> {
    match normalize_name(s).as_str() {
        "manhattan" | "4way" | "orthogonal" => Some(Heuristic::Manhattan),
        "chebyshev" | "8way" | "diagonal" => Some(Heuristic::Chebyshev),
        _ => None,
    }
}

impl Serialize for Heuristic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Heuristic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_heuristic(&s).ok_or_else(|| DeError::custom(format!("invalid heuristic: {:?}", s)))
    }
}

/// Find the nearest free `rows × columns` rectangle, searching anchors
/// outward from `start`.
///
/// A start cell outside the grid is clamped onto the nearest border cell.
/// Returns `None` when the rectangle is empty, larger than the grid, or fits
/// nowhere.
pub fn find_free_region(
    grid: &OccupancyGrid,
    rows: usize,
    columns: usize,
    start: Cell,
    heuristic: Heuristic,
) -> Option<Region> {
    let (grid_rows, grid_cols) = grid.dimensions();
    if rows == 0 || columns == 0 || rows > grid_rows || columns > grid_cols {
        return None;
    }

    let start = Cell::new(
        start.row.clamp(0, grid_rows as i32 - 1),
        start.column.clamp(0, grid_cols as i32 - 1),
    );
    let index = |cell: Cell| cell.row as usize * grid_cols + cell.column as usize;

    // Best known path cost per anchor.
    let mut cost: Vec<Option<u32>> = vec![None; grid_rows * grid_cols];
    // Ordered by f, then discovery sequence so equal-f nodes pop FIFO.
    let mut open: BinaryHeap<Reverse<(u32, u64, i32, i32)>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    cost[index(start)] = Some(0);
    open.push(Reverse((0, seq, start.row, start.column)));

    while let Some(Reverse((f, _, row, column))) = open.pop() {
        let current = Cell::new(row, column);
        let Some(g) = cost[index(current)] else {
            continue;
        };
        // Stale entry: a cheaper path was queued after this one.
        if f != g + heuristic.distance(current, start) {
            continue;
        }

        if grid.is_region_free(current, rows, columns) {
            trace!("anchor {} accepted after {} discoveries", current, seq);
            return Some(Region::new(current, rows, columns));
        }

        for &(dr, dc) in heuristic.neighbours() {
            let next = current.offset(dr, dc);
            if next.row < 0
                || next.column < 0
                || next.row as usize >= grid_rows
                || next.column as usize >= grid_cols
            {
                continue;
            }
            let next_g = g + 1;
            let slot = &mut cost[index(next)];
            if slot.is_some_and(|known| known <= next_g) {
                continue;
            }
            *slot = Some(next_g);
            seq += 1;
            let next_f = next_g + heuristic.distance(next, start);
            open.push(Reverse((next_f, seq, next.row, next.column)));
        }
    }

    trace!("no free {}x{} region reachable from {}", rows, columns, start);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_grid(rows: usize, columns: usize) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(rows, columns);
        grid.mark_region(&Region::new(Cell::new(0, 0), rows, columns));
        grid
    }

    #[test]
    fn distances() {
        let a = Cell::new(0, 0);
        let b = Cell::new(2, -3);
        assert_eq!(Heuristic::Manhattan.distance(a, b), 5);
        assert_eq!(Heuristic::Chebyshev.distance(a, b), 3);
    }

    #[test]
    fn neighbour_sets() {
        assert_eq!(Heuristic::Manhattan.neighbours().len(), 4);
        assert_eq!(Heuristic::Chebyshev.neighbours().len(), 8);
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(parse_heuristic("Manhattan"), Some(Heuristic::Manhattan));
        assert_eq!(parse_heuristic("4-way"), Some(Heuristic::Manhattan));
        assert_eq!(parse_heuristic(" CHEBYSHEV "), Some(Heuristic::Chebyshev));
        assert_eq!(parse_heuristic("8_way"), Some(Heuristic::Chebyshev));
        assert_eq!(parse_heuristic("euclid"), None);
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&Heuristic::Chebyshev).unwrap();
        assert_eq!(json, r#""chebyshev""#);
        let h: Heuristic = serde_json::from_str(r#""4-way""#).unwrap();
        assert_eq!(h, Heuristic::Manhattan);
        assert!(serde_json::from_str::<Heuristic>(r#""nope""#).is_err());
    }

    #[test]
    fn free_start_is_returned_immediately() {
        let grid = OccupancyGrid::new(4, 4);
        for heuristic in [Heuristic::Manhattan, Heuristic::Chebyshev] {
            let region = find_free_region(&grid, 2, 2, Cell::new(1, 1), heuristic).unwrap();
            assert_eq!(region.top_left, Cell::new(1, 1));
        }
    }

    #[test]
    fn occupied_start_moves_to_adjacent_cell() {
        let mut grid = OccupancyGrid::new(4, 4);
        grid.mark(&[Cell::new(0, 0)]);
        for heuristic in [Heuristic::Manhattan, Heuristic::Chebyshev] {
            let region = find_free_region(&grid, 1, 1, Cell::new(0, 0), heuristic).unwrap();
            assert!(
                region.top_left == Cell::new(0, 1) || region.top_left == Cell::new(1, 0),
                "{heuristic}: got {}",
                region.top_left
            );
        }
    }

    #[test]
    fn traversal_crosses_occupied_cells() {
        // Row 0 and row 1 are full; the only free cell is far away at (2, 3).
        let mut grid = OccupancyGrid::new(3, 4);
        grid.mark_region(&Region::new(Cell::new(0, 0), 2, 4));
        grid.mark(&[Cell::new(2, 0), Cell::new(2, 1), Cell::new(2, 2)]);
        let region = find_free_region(&grid, 1, 1, Cell::new(0, 0), Heuristic::Manhattan).unwrap();
        assert_eq!(region.top_left, Cell::new(2, 3));
    }

    #[test]
    fn anchor_next_to_obstacle_extends_into_free_space() {
        // Column 0 is taken; a 2x2 must anchor at column 1 or later.
        let mut grid = OccupancyGrid::new(3, 3);
        grid.mark(&[Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]);
        let region = find_free_region(&grid, 2, 2, Cell::new(0, 0), Heuristic::Manhattan).unwrap();
        assert_eq!(region.top_left.column, 1);
        assert!(grid.is_region_free(region.top_left, 2, 2));
    }

    #[test]
    fn returned_region_is_always_free() {
        let mut grid = OccupancyGrid::new(5, 5);
        grid.mark(&[Cell::new(1, 1), Cell::new(2, 3), Cell::new(3, 0), Cell::new(4, 4)]);
        for heuristic in [Heuristic::Manhattan, Heuristic::Chebyshev] {
            for row in 0..5 {
                for column in 0..5 {
                    let start = Cell::new(row, column);
                    let region = find_free_region(&grid, 2, 2, start, heuristic).unwrap();
                    assert!(grid.is_region_free(region.top_left, 2, 2));
                }
            }
        }
    }

    #[test]
    fn full_grid_yields_none() {
        let grid = full_grid(3, 3);
        assert!(find_free_region(&grid, 1, 1, Cell::new(1, 1), Heuristic::Manhattan).is_none());
        assert!(find_free_region(&grid, 1, 1, Cell::new(1, 1), Heuristic::Chebyshev).is_none());
    }

    #[test]
    fn oversized_or_empty_request_yields_none() {
        let grid = OccupancyGrid::new(3, 3);
        assert!(find_free_region(&grid, 4, 1, Cell::new(0, 0), Heuristic::Manhattan).is_none());
        assert!(find_free_region(&grid, 0, 0, Cell::new(0, 0), Heuristic::Manhattan).is_none());
    }

    #[test]
    fn start_outside_grid_is_clamped() {
        let grid = OccupancyGrid::new(3, 3);
        let region = find_free_region(&grid, 1, 1, Cell::new(9, -4), Heuristic::Chebyshev).unwrap();
        assert_eq!(region.top_left, Cell::new(2, 0));
    }

    #[test]
    fn heuristic_choice_changes_the_result() {
        // Only (0, 1), two steps straight up, and (1, 0), one diagonal step, are free.
        let mut grid = OccupancyGrid::new(3, 3);
        for row in 0..3 {
            for column in 0..3 {
                let cell = Cell::new(row, column);
                if cell != Cell::new(0, 1) && cell != Cell::new(1, 0) {
                    grid.mark(&[cell]);
                }
            }
        }
        let start = Cell::new(2, 1);
        let chebyshev = find_free_region(&grid, 1, 1, start, Heuristic::Chebyshev).unwrap();
        assert_eq!(chebyshev.top_left, Cell::new(1, 0));
        let manhattan = find_free_region(&grid, 1, 1, start, Heuristic::Manhattan).unwrap();
        assert_eq!(manhattan.top_left, Cell::new(0, 1));
    }

    #[test]
    fn nearest_region_is_preferred_over_first_in_scan_order() {
        // Only (0, 3) and (3, 3) are free; starting at (3, 2) the latter is one step away.
        let mut grid = OccupancyGrid::new(4, 4);
        for row in 0..4 {
            for column in 0..4 {
                let cell = Cell::new(row, column);
                if cell != Cell::new(0, 3) && cell != Cell::new(3, 3) {
                    grid.mark(&[cell]);
                }
            }
        }
        assert_eq!(grid.first_free_region(1, 1).unwrap().top_left, Cell::new(0, 3));
        let region = find_free_region(&grid, 1, 1, Cell::new(3, 2), Heuristic::Manhattan).unwrap();
        assert_eq!(region.top_left, Cell::new(3, 3));
    }
}
