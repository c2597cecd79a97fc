//! Preview and sync scrolling module for Inkwell
//!
//! This module provides synchronized scrolling between the markdown source
//! view and the rendered preview, so that scrolling either pane moves the
//! other to the same relative position.

mod surface;
mod sync_scroll;

pub use surface::{ScrollGeometry, ScrollSurface};
pub use sync_scroll::{
    ScrollOrigin, ScrollSynchronizer, SurfaceId, SurfaceState, SyncOutcome, SyncScrollConfig,
};
