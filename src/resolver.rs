//! Per-page conflict resolution.
//!
//! When an item (the *mover*) is moved, inserted or resized it always wins
//! its target cells.  Every other item on the page that shares a cell with
//! it is relocated to the nearest free rectangle of its own size via
//! [`find_free_region`].  What happens when no such rectangle exists is
//! decided by [`RelocationPolicy`].
//!
//! [`ResolveStrategy::Shift`] swaps the search for the push rules in
//! [`shift`](crate::shift).
//!
//! The resolver is a pure function of its inputs: nothing is cached between
//! calls and the input slice is never modified.

use crate::bounds::{footprints_overlap, is_within_bounds};
use crate::geometry::footprint_dimensions;
use crate::model::{Cell, Item};
use crate::normalize_name;
use crate::occupancy::OccupancyGrid;
use crate::search::{find_free_region, Heuristic};
use crate::shift::{shift_conflicts, ResolveDirection};
use log::{debug, warn};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Why a placement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// The mover's footprint leaves the grid.
    #[error("item {id} does not fit inside a {rows}x{columns} grid")]
    OutOfBounds { id: String, rows: usize, columns: usize },

    /// No free rectangle exists for a displaced item.
    #[error("no free {rows}x{columns} region for item {id}")]
    NoRegionFound { id: String, rows: usize, columns: usize },

    /// The item occupies no cells at all.
    #[error("item {0} has an empty footprint")]
    EmptyFootprint(String),

    /// A displaced item could not be pushed out of the way.
    #[error("item {id} cannot be pushed out of the way")]
    Blocked { id: String },
}

/// What to do when a displaced item cannot be relocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelocationPolicy {
    /// Abort the whole operation; nothing is committed.
    #[default]
    Strict,
    /// Leave the item where it was (possibly overlapping) and carry on.
    BestEffort,
}

impl fmt::Display for RelocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelocationPolicy::Strict => write!(f, "strict"),
            RelocationPolicy::BestEffort => write!(f, "best-effort"),
        }
    }
}

/// Parse a policy name (case-insensitive; accepts "strict", "atomic",
/// "best-effort", "best_effort", "BestEffort").
pub fn parse_policy(s: &str) -> Option<RelocationPolicy> {
    match normalize_name(s).as_str() {
        "strict" | "atomic" => Some(RelocationPolicy::Strict),
        "besteffort" | "lenient" => Some(RelocationPolicy::BestEffort),
        _ => None,
    }
}

impl Serialize for RelocationPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RelocationPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_policy(&s)
            .ok_or_else(|| DeError::custom(format!("invalid relocation policy: {:?}", s)))
    }
}

/// How displaced items are moved out of the mover's way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolveStrategy {
    /// Each displaced item goes to the nearest free rectangle.
    #[default]
    Nearest,
    /// Displaced items are pushed beside the mover, cascading; always
    /// all-or-nothing.
    Shift,
}

impl fmt::Display for ResolveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveStrategy::Nearest => write!(f, "nearest"),
            ResolveStrategy::Shift => write!(f, "shift"),
        }
    }
}

/// Parse a strategy name (case-insensitive; "nearest", "astar", "shift",
/// "push").
pub fn parse_strategy(s: &str) -> Option<ResolveStrategy> {
    match normalize_name(s).as_str() {
        "nearest" | "astar" | "search" => Some(ResolveStrategy::Nearest),
        "shift" | "push" => Some(ResolveStrategy::Shift),
        _ => None,
    }
}

impl Serialize for ResolveStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResolveStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_strategy(&s).ok_or_else(|| DeError::custom(format!("invalid strategy: {:?}", s)))
    }
}

/// Search strategy plus failure policy for one kind of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    pub strategy: ResolveStrategy,
    pub heuristic: Heuristic,
    pub on_relocation_failure: RelocationPolicy,
}

impl ResolveOptions {
    pub fn new(heuristic: Heuristic, on_relocation_failure: RelocationPolicy) -> Self {
        Self {
            strategy: ResolveStrategy::Nearest,
            heuristic,
            on_relocation_failure,
        }
    }

    /// Same options with `strategy` swapped in.
    pub fn with_strategy(self, strategy: ResolveStrategy) -> Self {
        Self { strategy, ..self }
    }

    /// Defaults for a user drag: 4-directional search, all-or-nothing.
    pub fn for_move() -> Self {
        Self::new(Heuristic::Manhattan, RelocationPolicy::Strict)
    }

    /// Defaults for a resize: 8-directional search, all-or-nothing.
    pub fn for_resize() -> Self {
        Self::new(Heuristic::Chebyshev, RelocationPolicy::Strict)
    }
}

/// Place `mover` on `page`, relocating every same-page item it collides
/// with.
///
/// On success the result holds the mover (re-homed to `page`), the
/// untouched items of that page, the relocated items in input order, and
/// finally every item from other pages unchanged.  Any previous copy of the
/// mover is dropped, wherever it lived.
pub fn resolve_conflicts<P: Clone>(
    items: &[Item<P>],
    mover: &Item<P>,
    page: usize,
    rows: usize,
    columns: usize,
    options: ResolveOptions,
) -> Result<Vec<Item<P>>, PlacementError> {
    resolve_conflicts_toward(items, mover, page, rows, columns, options, None)
}

/// [`resolve_conflicts`] with an explicit push direction, usually taken
/// from the pointer.  `direction` only matters for
/// [`ResolveStrategy::Shift`].
pub fn resolve_conflicts_toward<P: Clone>(
    items: &[Item<P>],
    mover: &Item<P>,
    page: usize,
    rows: usize,
    columns: usize,
    options: ResolveOptions,
    direction: Option<ResolveDirection>,
) -> Result<Vec<Item<P>>, PlacementError> {
    if mover.cells.is_empty() {
        return Err(PlacementError::EmptyFootprint(mover.id.clone()));
    }
    if !is_within_bounds(mover, rows, columns) {
        return Err(PlacementError::OutOfBounds {
            id: mover.id.clone(),
            rows,
            columns,
        });
    }

    if options.strategy == ResolveStrategy::Shift {
        return shift_conflicts(items, mover, page, rows, columns, direction);
    }

    let mut grid = OccupancyGrid::new(rows, columns);
    let mut placed = mover.clone();
    placed.page = page;
    grid.mark(&placed.cells);

    let (conflicting, non_conflicting): (Vec<&Item<P>>, Vec<&Item<P>>) = items
        .iter()
        .filter(|item| item.page == page && item.id != mover.id)
        .partition(|item| footprints_overlap(&item.cells, &mover.cells));

    let mut resolved = Vec::with_capacity(items.len());
    resolved.push(placed);

    for item in non_conflicting {
        grid.mark(&item.cells);
        resolved.push(item.clone());
    }

    for item in conflicting {
        let (req_rows, req_cols) = footprint_dimensions(&item.cells);
        // A conflicting item shares a cell with the mover, so its footprint is non-empty.
        let start = item.top_left().unwrap_or(Cell::new(0, 0));

        match find_free_region(&grid, req_rows, req_cols, start, options.heuristic) {
            Some(region) => {
                debug!("relocating {} from {} to {}", item.id, start, region.top_left);
                grid.mark_region(&region);
                resolved.push(item.with_cells(region.cells()));
            }
            None => match options.on_relocation_failure {
                RelocationPolicy::Strict => {
                    debug!(
                        "no {}x{} region for {}, rejecting placement of {}",
                        req_rows, req_cols, item.id, mover.id
                    );
                    return Err(PlacementError::NoRegionFound {
                        id: item.id.clone(),
                        rows: req_rows,
                        columns: req_cols,
                    });
                }
                RelocationPolicy::BestEffort => {
                    warn!(
                        "no {}x{} region for {}, leaving it overlapping {}",
                        req_rows, req_cols, item.id, mover.id
                    );
                    grid.mark(&item.cells);
                    resolved.push(item.clone());
                }
            },
        }
    }

    resolved.extend(
        items
            .iter()
            .filter(|item| item.page != page && item.id != mover.id)
            .cloned(),
    );
    Ok(resolved)
}

/// Resolve a drag of `moving_item` onto `page` with the move defaults.
///
/// Returns `None` when the gesture must be rejected.
pub fn find_region_for_move<P: Clone>(
    items: &[Item<P>],
    moving_item: &Item<P>,
    page: usize,
    rows: usize,
    columns: usize,
) -> Option<Vec<Item<P>>> {
    resolve_or_reject(items, moving_item, page, rows, columns, ResolveOptions::for_move())
}

/// Resolve a resize of `resizing_item` on `page` with the resize defaults.
pub fn find_region_for_resize<P: Clone>(
    items: &[Item<P>],
    resizing_item: &Item<P>,
    page: usize,
    rows: usize,
    columns: usize,
) -> Option<Vec<Item<P>>> {
    resolve_or_reject(items, resizing_item, page, rows, columns, ResolveOptions::for_resize())
}

/// [`resolve_conflicts`] with the error logged and flattened to `None`.
pub fn resolve_or_reject<P: Clone>(
    items: &[Item<P>],
    mover: &Item<P>,
    page: usize,
    rows: usize,
    columns: usize,
    options: ResolveOptions,
) -> Option<Vec<Item<P>>> {
    match resolve_conflicts(items, mover, page, rows, columns, options) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            debug!("placement rejected: {}", e);
            None
        }
    }
}

/// Find a home for a brand-new item: try each page in order and return the
/// item re-homed to the first free rectangle of its size.
///
/// Anchors are scanned row-major within a page, so the item lands as close
/// to the top-left as possible.  Nothing is displaced.
pub fn find_available_region_by_page<P: Clone>(
    items: &[Item<P>],
    new_item: &Item<P>,
    page_count: usize,
    rows: usize,
    columns: usize,
) -> Option<Item<P>> {
    let (req_rows, req_cols) = footprint_dimensions(&new_item.cells);
    if req_rows == 0 {
        debug!("item {} has an empty footprint, nowhere to put it", new_item.id);
        return None;
    }

    for page in 0..page_count {
        let grid = OccupancyGrid::for_page(items, page, rows, columns, Some(new_item.id.as_str()));
        if let Some(region) = grid.first_free_region(req_rows, req_cols) {
            debug!("placing {} on page {} at {}", new_item.id, page, region.top_left);
            let mut placed = new_item.with_cells(region.cells());
            placed.page = page;
            return Some(placed);
        }
    }

    debug!("no page has a free {}x{} region for {}", req_rows, req_cols, new_item.id);
    None
}

//  Tests
