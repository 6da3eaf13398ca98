//! Push-style conflict resolution.
//!
//! Instead of searching for the nearest hole, every item the mover lands on
//! is pushed to the side of the mover (after it in reading order, or before
//! it), wrapping onto the next or previous row when it runs off the edge.
//! A pushed item that lands on another item pushes that one in turn.
//!
//! The push direction either comes from the pointer position over the item
//! being dropped on (see [`resolve_direction_by_x`]) or is derived per pair
//! from their relative position (see [`relative_resolve_direction`]).

use crate::bounds::{footprints_overlap, is_within_bounds};
use crate::geometry::{bounding_box, footprint_dimensions, top_left_coordinates};
use crate::model::{Cell, CellSize, Item};
use crate::resolver::PlacementError;
use crate::transform::translate_cells;
use log::debug;
use serde::{Deserialize, Serialize};

/// Which way a displaced item is pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveDirection {
    /// Before the mover: to its left, wrapping to the end of the row above.
    Start,
    /// Dropped onto the middle of an item; nothing is pushed.
    Center,
    /// After the mover: to its right, wrapping to the row below it.
    End,
}

/// Direction implied by the pointer's `x` over `target`, split into thirds.
///
/// Left third pushes `target` towards the end, right third towards the
/// start, the middle third is [`ResolveDirection::Center`].
pub fn resolve_direction_by_x<P>(target: &Item<P>, x: i32, cell: CellSize) -> ResolveDirection {
    let left = i64::from(top_left_coordinates(&target.cells, cell).x);
    let width = i64::from(bounding_box(&target.cells, cell).width);
    let offset = i64::from(x) - left;

    if offset < width / 3 {
        ResolveDirection::End
    } else if offset < 2 * width / 3 {
        ResolveDirection::Center
    } else {
        ResolveDirection::Start
    }
}

/// Direction to push `other` given where `mover` starts relative to it.
pub fn relative_resolve_direction<P>(mover: &Item<P>, other: &Item<P>) -> ResolveDirection {
    let (Some(m), Some(o)) = (mover.top_left(), other.top_left()) else {
        return ResolveDirection::Center;
    };
    if m.column < o.column {
        ResolveDirection::End
    } else if m.column > o.column {
        ResolveDirection::Start
    } else if m.row > o.row {
        ResolveDirection::Start
    } else if m.row < o.row {
        ResolveDirection::End
    } else {
        ResolveDirection::Center
    }
}

/// Copy of `other` pushed out from under `mover`, or `None` when the push
/// would leave the grid or `direction` is [`ResolveDirection::Center`].
pub fn shift_item<P: Clone>(
    mover: &Item<P>,
    other: &Item<P>,
    direction: ResolveDirection,
    rows: usize,
    columns: usize,
) -> Option<Item<P>> {
    let m = mover.top_left()?;
    let o = other.top_left()?;
    let (m_rows, m_cols) = footprint_dimensions(&mover.cells);
    let (o_rows, o_cols) = footprint_dimensions(&other.cells);
    if o_rows > rows || o_cols > columns {
        return None;
    }

    let (rows, columns) = (rows as i64, columns as i64);
    let (o_rows, o_cols) = (o_rows as i64, o_cols as i64);

    let (new_row, new_col) = match direction {
        ResolveDirection::Center => return None,
        ResolveDirection::End => {
            let col = i64::from(m.column) + m_cols as i64;
            if col + o_cols > columns {
                (i64::from(m.row) + m_rows as i64, 0)
            } else {
                (i64::from(o.row), col)
            }
        }
        ResolveDirection::Start => {
            let col = i64::from(m.column) - o_cols;
            if col < 0 {
                (i64::from(o.row) - 1, columns - o_cols)
            } else {
                (i64::from(o.row), col)
            }
        }
    };

    if new_row < 0 || new_col < 0 || new_row + o_rows > rows {
        return None;
    }
    let target = Cell::new(i32::try_from(new_row).ok()?, i32::try_from(new_col).ok()?);
    Some(other.with_cells(translate_cells(&other.cells, target)))
}

/// Place an already validated `mover` on `page` by pushing what it covers.
///
/// With `direction` unset each push picks its own direction from
/// [`relative_resolve_direction`], treating a tie as
/// [`ResolveDirection::End`].  The whole operation fails if any push leaves
/// the grid or a pushed item comes to rest on the mover.
///
/// Result order: mover, the page's other items in input order (pushed ones
/// in their new place), then every item from other pages.
pub(crate) fn shift_conflicts<P: Clone>(
    items: &[Item<P>],
    mover: &Item<P>,
    page: usize,
    rows: usize,
    columns: usize,
    direction: Option<ResolveDirection>,
) -> Result<Vec<Item<P>>, PlacementError> {
    let mut placed = mover.clone();
    placed.page = page;

    let mut page_items: Vec<Item<P>> = items
        .iter()
        .filter(|item| item.page == page && item.id != mover.id)
        .cloned()
        .collect();

    // Each push moves one item; a chain longer than n² is cycling.
    let mut budget = page_items.len().saturating_mul(page_items.len()) + page_items.len();
    push(&mut page_items, &placed, direction, rows, columns, &mut budget)?;

    if let Some(stuck) = page_items
        .iter()
        .find(|item| footprints_overlap(&item.cells, &placed.cells))
    {
        debug!("{} was pushed back onto {}", stuck.id, placed.id);
        return Err(PlacementError::Blocked {
            id: stuck.id.clone(),
        });
    }

    let mut resolved = Vec::with_capacity(items.len());
    resolved.push(placed);
    resolved.extend(page_items);
    resolved.extend(
        items
            .iter()
            .filter(|item| item.page != page && item.id != mover.id)
            .cloned(),
    );
    Ok(resolved)
}

fn push<P: Clone>(
    page_items: &mut [Item<P>],
    pusher: &Item<P>,
    direction: Option<ResolveDirection>,
    rows: usize,
    columns: usize,
    budget: &mut usize,
) -> Result<(), PlacementError> {
    for i in 0..page_items.len() {
        let other = &page_items[i];
        if other.id == pusher.id || !footprints_overlap(&other.cells, &pusher.cells) {
            continue;
        }
        let blocked = || PlacementError::Blocked {
            id: other.id.clone(),
        };
        if *budget == 0 {
            return Err(blocked());
        }
        *budget -= 1;

        let dir = direction.unwrap_or_else(|| match relative_resolve_direction(pusher, other) {
            ResolveDirection::Center => ResolveDirection::End,
            dir => dir,
        });
        let shifted = shift_item(pusher, other, dir, rows, columns).ok_or_else(blocked)?;
        if !is_within_bounds(&shifted, rows, columns) {
            return Err(blocked());
        }
        debug!(
            "pushed {} {:?} to {:?} by {}",
            other.id,
            dir,
            shifted.top_left(),
            pusher.id
        );

        page_items[i] = shifted.clone();
        push(page_items, &shifted, direction, rows, columns, budget)?;
    }
    Ok(())
}
