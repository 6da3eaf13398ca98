//! The facade that ties configuration, geometry and the resolver together.
//!
//! [`PlacementEngine`] owns nothing but its [`Config`].  Every call takes
//! the caller's current items and returns a fresh result, so one engine can
//! be shared freely between threads and called once per drag event.

use crate::bounds::item_at_pixel;
use crate::command::{Request, Response, WireItem};
use crate::config::Config;
use crate::geometry::{bounding_box, cell_size, footprint_dimensions, pixel_to_cell, pixels_to_span};
use crate::model::{Cell, CellSize, Item, PixelPoint, PixelSize};
use crate::resolver::{
    find_available_region_by_page, resolve_conflicts, resolve_conflicts_toward, PlacementError,
    ResolveStrategy,
};
use crate::shift::{resolve_direction_by_x, ResolveDirection};
use crate::transform::{
    move_with_pixels, resize_with_pixels, resize_with_pixels_by_side, Anchor, SideAnchor,
};
use log::{debug, info};

/// Stateless placement front end configured for one grid shape.
///
/// # Typical usage
///
/// ```ignore
/// let engine = PlacementEngine::new(Config::default());
/// let items = engine.move_item(&items, &dragged, page)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    config: Config,
}

impl PlacementEngine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Grid dimensions as `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.config.grid.rows, self.config.grid.columns)
    }

    /// Cell size for a grid drawn into `screen`.
    pub fn cell_size(&self, screen: PixelSize) -> CellSize {
        let (rows, columns) = self.dimensions();
        cell_size(screen.width, screen.height, rows, columns)
    }

    //  Placement

    /// Place `item` at its current cells on `page`, displacing whatever it
    /// lands on.
    pub fn move_item<P: Clone>(
        &self,
        items: &[Item<P>],
        item: &Item<P>,
        page: usize,
    ) -> Result<Vec<Item<P>>, PlacementError> {
        let (rows, columns) = self.dimensions();
        resolve_conflicts(items, item, page, rows, columns, self.config.on_move)
    }

    /// Drop `item` with its bounding box's top-left at `point`.
    ///
    /// With the shift strategy the push direction comes from where the
    /// box's center sits over the item it is dropped on.
    pub fn move_item_to_pixel<P: Clone>(
        &self,
        items: &[Item<P>],
        item: &Item<P>,
        page: usize,
        point: PixelPoint,
        screen: PixelSize,
    ) -> Result<Vec<Item<P>>, PlacementError> {
        let (rows, columns) = self.dimensions();
        let cell = self.cell_size(screen);
        let moved = move_with_pixels(item, point, cell, rows, columns);
        debug!("{} dragged to {:?} -> {:?}", item.id, point, moved.top_left());

        let options = self.config.on_move;
        let direction = match options.strategy {
            ResolveStrategy::Shift => pointer_direction(items, item, page, point, cell),
            ResolveStrategy::Nearest => None,
        };
        resolve_conflicts_toward(items, &moved, page, rows, columns, options, direction)
    }

    /// Place an already-resized `item` on `page`.
    pub fn resize_item<P: Clone>(
        &self,
        items: &[Item<P>],
        item: &Item<P>,
        page: usize,
    ) -> Result<Vec<Item<P>>, PlacementError> {
        let (rows, columns) = self.dimensions();
        resolve_conflicts(items, item, page, rows, columns, self.config.on_resize)
    }

    /// Resize `item` to the cells covered by a `size` pixel handle.
    pub fn resize_item_to_pixels<P: Clone>(
        &self,
        items: &[Item<P>],
        item: &Item<P>,
        page: usize,
        size: PixelSize,
        anchor: Anchor,
        screen: PixelSize,
    ) -> Result<Vec<Item<P>>, PlacementError> {
        let cell = self.cell_size(screen);
        self.check_span(item, size, cell)?;
        let resized = resize_with_pixels(item, size, cell, anchor);
        debug!(
            "{} resized to {:?} around {:?}",
            item.id,
            footprint_dimensions(&resized.cells),
            anchor
        );
        self.resize_item(items, &resized, page)
    }

    /// Resize `item` from an edge handle, keeping `side` in place.
    pub fn resize_item_edge_to_pixels<P: Clone>(
        &self,
        items: &[Item<P>],
        item: &Item<P>,
        page: usize,
        size: PixelSize,
        side: SideAnchor,
        screen: PixelSize,
    ) -> Result<Vec<Item<P>>, PlacementError> {
        let cell = self.cell_size(screen);
        self.check_span(item, size, cell)?;
        let resized = resize_with_pixels_by_side(item, size, cell, side);
        debug!(
            "{} resized to {:?} holding {:?}",
            item.id,
            footprint_dimensions(&resized.cells),
            side
        );
        self.resize_item(items, &resized, page)
    }

    /// Reject a pixel size spanning more cells than the grid has.
    fn check_span<P>(
        &self,
        item: &Item<P>,
        size: PixelSize,
        cell: CellSize,
    ) -> Result<(), PlacementError> {
        let (rows, columns) = self.dimensions();
        let (span_rows, span_cols) = pixels_to_span(size, cell);
        if span_rows > rows || span_cols > columns {
            return Err(PlacementError::OutOfBounds {
                id: item.id.clone(),
                rows,
                columns,
            });
        }
        Ok(())
    }

    /// Find the first page with room for `item`.
    pub fn insert_item<P: Clone>(
        &self,
        items: &[Item<P>],
        item: &Item<P>,
    ) -> Result<Item<P>, PlacementError> {
        let (rows, columns) = self.dimensions();
        let (req_rows, req_cols) = footprint_dimensions(&item.cells);
        if req_rows == 0 {
            return Err(PlacementError::EmptyFootprint(item.id.clone()));
        }
        let pages = self.config.grid.pages;
        find_available_region_by_page(items, item, pages, rows, columns).ok_or_else(|| {
            PlacementError::NoRegionFound {
                id: item.id.clone(),
                rows: req_rows,
                columns: req_cols,
            }
        })
    }

    //  Geometry

    /// Cell under the center of a dragged `bounding_box` at `point`.
    pub fn pixel_to_cell(&self, point: PixelPoint, bounding: PixelSize, screen: PixelSize) -> Cell {
        let (rows, columns) = self.dimensions();
        pixel_to_cell(point, bounding, self.cell_size(screen), rows, columns)
    }

    /// Pixel size of the rectangle spanned by `cells`.
    pub fn bounding_box(&self, cells: &[Cell], screen: PixelSize) -> PixelSize {
        bounding_box(cells, self.cell_size(screen))
    }

    /// Item on `page` under the pixel `point`, ignoring `exclude_id`.
    pub fn item_at_pixel<'a, P>(
        &self,
        items: &'a [Item<P>],
        page: usize,
        point: PixelPoint,
        screen: PixelSize,
        exclude_id: Option<&str>,
    ) -> Option<&'a Item<P>> {
        item_at_pixel(items, page, point, self.cell_size(screen), exclude_id)
    }

    //  Requests

    /// Process a single [`Request`].
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::Move { items, item, page } => {
                info!("move {} on page {}", item.id, page);
                placed(self.move_item(&items, &item, page))
            }

            Request::MoveToPixel {
                items,
                item,
                page,
                x,
                y,
                screen_width,
                screen_height,
            } => {
                info!("move {} to pixel ({}, {}) on page {}", item.id, x, y, page);
                let screen = PixelSize {
                    width: screen_width,
                    height: screen_height,
                };
                placed(self.move_item_to_pixel(&items, &item, page, PixelPoint { x, y }, screen))
            }

            Request::Resize { items, item, page } => {
                info!("resize {} on page {}", item.id, page);
                placed(self.resize_item(&items, &item, page))
            }

            Request::ResizeToPixels {
                items,
                item,
                page,
                width,
                height,
                anchor,
                screen_width,
                screen_height,
            } => {
                info!("resize {} to {}x{} px on page {}", item.id, width, height, page);
                let screen = PixelSize {
                    width: screen_width,
                    height: screen_height,
                };
                let size = PixelSize { width, height };
                placed(self.resize_item_to_pixels(&items, &item, page, size, anchor, screen))
            }

            Request::ResizeEdgeToPixels {
                items,
                item,
                page,
                width,
                height,
                side,
                screen_width,
                screen_height,
            } => {
                info!("edge resize {} to {}x{} px on page {}", item.id, width, height, page);
                let screen = PixelSize {
                    width: screen_width,
                    height: screen_height,
                };
                let size = PixelSize { width, height };
                placed(self.resize_item_edge_to_pixels(&items, &item, page, size, side, screen))
            }

            Request::Insert { items, item } => {
                info!("insert {}", item.id);
                match self.insert_item(&items, &item) {
                    Ok(item) => Response::Inserted(item),
                    Err(e) => rejected(e),
                }
            }

            Request::PixelToCell {
                x,
                y,
                width,
                height,
                screen_width,
                screen_height,
            } => {
                let screen = PixelSize {
                    width: screen_width,
                    height: screen_height,
                };
                let point = PixelPoint { x, y };
                Response::Cell(self.pixel_to_cell(point, PixelSize { width, height }, screen))
            }

            Request::BoundingBox {
                cells,
                screen_width,
                screen_height,
            } => {
                let screen = PixelSize {
                    width: screen_width,
                    height: screen_height,
                };
                Response::Size(self.bounding_box(&cells, screen))
            }

            Request::ItemAtPixel {
                items,
                page,
                x,
                y,
                exclude,
                screen_width,
                screen_height,
            } => {
                let screen = PixelSize {
                    width: screen_width,
                    height: screen_height,
                };
                let point = PixelPoint { x, y };
                let hit = self.item_at_pixel(&items, page, point, screen, exclude.as_deref());
                Response::Hit(hit.cloned())
            }
        }
    }
}

/// Push direction for a shift drop: where the dragged box's center falls
/// over the item underneath it, if any.
fn pointer_direction<P>(
    items: &[Item<P>],
    dragged: &Item<P>,
    page: usize,
    point: PixelPoint,
    cell: CellSize,
) -> Option<ResolveDirection> {
    let size = bounding_box(&dragged.cells, cell);
    let pointer = PixelPoint {
        x: point.x.saturating_add(size.width / 2),
        y: point.y.saturating_add(size.height / 2),
    };
    let target = item_at_pixel(items, page, pointer, cell, Some(dragged.id.as_str()))?;
    Some(resolve_direction_by_x(target, pointer.x, cell))
}

fn placed(result: Result<Vec<WireItem>, PlacementError>) -> Response {
    match result {
        Ok(items) => Response::Placed(items),
        Err(e) => rejected(e),
    }
}

fn rejected(e: PlacementError) -> Response {
    debug!("rejected: {}", e);
    Response::Rejected { reason: e.to_string() }
}

//  Tests
