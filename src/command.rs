//! Requests and responses understood by the engine.
//!
//! Hosts that drive the engine over a pipe send one [`Request`] per line and
//! receive one [`Response`] per line, both externally-tagged JSON.  Item
//! payloads travel as opaque JSON values.
//!
//! ```json
//! {"Move":{"items":[...],"item":{"id":"clock","page":0,"cells":[{"row":0,"column":0}]},"page":0}}
//! {"PixelToCell":{"x":100,"y":100,"width":100,"height":100,"screen_width":400,"screen_height":400}}
//! ```

use crate::model::{Cell, Item, PixelSize};
use crate::transform::{Anchor, SideAnchor};
use serde::{Deserialize, Serialize};

/// An item as it travels on the wire.
pub type WireItem = Item<serde_json::Value>;

/// Every operation the engine exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    /// Place `item` (already carrying its target cells) on `page`.
    Move {
        items: Vec<WireItem>,
        item: WireItem,
        page: usize,
    },

    /// Drop `item` with its bounding box's top-left at pixel `(x, y)`.
    MoveToPixel {
        items: Vec<WireItem>,
        item: WireItem,
        page: usize,
        x: i32,
        y: i32,
        screen_width: i32,
        screen_height: i32,
    },

    /// Place `item` (already carrying its resized cells) on `page`.
    Resize {
        items: Vec<WireItem>,
        item: WireItem,
        page: usize,
    },

    /// Resize `item` to cover a `width × height` pixel handle, keeping
    /// `anchor` fixed.
    ResizeToPixels {
        items: Vec<WireItem>,
        item: WireItem,
        page: usize,
        width: i32,
        height: i32,
        #[serde(default)]
        anchor: Anchor,
        screen_width: i32,
        screen_height: i32,
    },

    /// Resize `item` from an edge handle to cover `width × height` pixels,
    /// keeping `side` fixed.
    ResizeEdgeToPixels {
        items: Vec<WireItem>,
        item: WireItem,
        page: usize,
        width: i32,
        height: i32,
        side: SideAnchor,
        screen_width: i32,
        screen_height: i32,
    },

    /// Find a page and position for a brand-new item.
    Insert { items: Vec<WireItem>, item: WireItem },

    /// Cell under the center of a dragged `width × height` box at `(x, y)`.
    PixelToCell {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        screen_width: i32,
        screen_height: i32,
    },

    /// Pixel size of the rectangle spanned by `cells`.
    BoundingBox {
        cells: Vec<Cell>,
        screen_width: i32,
        screen_height: i32,
    },

    /// Item on `page` under the pixel `(x, y)`, skipping `exclude`.
    ItemAtPixel {
        items: Vec<WireItem>,
        page: usize,
        x: i32,
        y: i32,
        #[serde(default)]
        exclude: Option<String>,
        screen_width: i32,
        screen_height: i32,
    },
}

/// Result of one [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// The full updated item list after a move or resize.
    Placed(Vec<WireItem>),
    /// The new item, re-homed to its page and cells.
    Inserted(WireItem),
    Cell(Cell),
    Size(PixelSize),
    /// Result of a hit test; `None` when the point is over empty space.
    Hit(Option<WireItem>),
    /// The operation was understood but cannot be carried out; the caller
    /// should keep its previous state.
    Rejected { reason: String },
    /// The request line could not be parsed.
    Invalid { message: String },
}
