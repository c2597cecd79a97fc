//! Scrollable surfaces
//!
//! The synchronizer never talks to a widget directly. Host views implement
//! [`ScrollSurface`] to report their geometry and accept programmatic
//! scroll commands.

/// A view that can be scrolled vertically.
pub trait ScrollSurface {
    /// Current distance scrolled from the top, in pixels.
    fn scroll_offset(&self) -> f32;

    /// How far the view can scroll: content height minus viewport height.
    /// Zero or negative when the content fits in the viewport.
    fn scrollable_extent(&self) -> f32;

    /// Programmatically scroll to `offset` pixels from the top.
    fn set_scroll_offset(&mut self, offset: f32);

    /// Relative scroll position in `[0, 1]`, or `None` when the view is not
    /// scrollable.
    fn scroll_fraction(&self) -> Option<f32> {
        let extent = self.scrollable_extent();
        if !is_scrollable(extent) {
            return None;
        }
        let fraction = self.scroll_offset() / extent;
        fraction.is_finite().then(|| fraction.clamp(0.0, 1.0))
    }
}

/// Whether an extent describes a view that can actually scroll.
pub(crate) fn is_scrollable(extent: f32) -> bool {
    extent.is_finite() && extent > 0.0
}

/// Plain scroll geometry, for hosts that track offsets themselves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollGeometry {
    /// Current scroll offset in pixels
    pub offset: f32,
    /// Total height of the content in pixels
    pub content_height: f32,
    /// Visible height in pixels
    pub viewport_height: f32,
}

impl ScrollGeometry {
    /// Geometry scrolled to the top.
    pub fn new(content_height: f32, viewport_height: f32) -> Self {
        Self {
            offset: 0.0,
            content_height,
            viewport_height,
        }
    }

    /// Same geometry at a different offset.
    pub fn at(mut self, offset: f32) -> Self {
        self.set_scroll_offset(offset);
        self
    }

    /// Update the content height, e.g. after the preview re-renders.
    pub fn resize_content(&mut self, content_height: f32) {
        self.content_height = content_height;
        let max = self.scrollable_extent().max(0.0);
        self.offset = self.offset.clamp(0.0, max);
    }
}

impl ScrollSurface for ScrollGeometry {
    fn scroll_offset(&self) -> f32 {
        self.offset
    }

    fn scrollable_extent(&self) -> f32 {
        self.content_height - self.viewport_height
    }

    fn set_scroll_offset(&mut self, offset: f32) {
        let max = self.scrollable_extent().max(0.0);
        self.offset = if offset.is_finite() {
            offset.clamp(0.0, max)
        } else {
            0.0
        };
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
