//! Bidirectional Sync Scrolling for Source and Rendered Views
//!
//! This module keeps the markdown source view and the rendered preview at
//! the same relative scroll position. It provides:
//!
//! - A single shared scroll position, expressed as a fraction in `[0, 1]`
//! - Authority tracking: the surface the user is scrolling leads
//! - Echo suppression: scroll events caused by our own programmatic
//!   scrolling are discarded instead of being fed back
//!
//! # Architecture
//!
//! Each surface is in one of three named states ([`SurfaceState`]):
//!
//! - `Idle`: may become the leader on its next genuine scroll
//! - `Leading`: the authoritative surface; it is never scrolled
//!   programmatically. Expires after the authority quiescence window
//!   following its last genuine event.
//! - `Following`: was just scrolled programmatically; its scroll events are
//!   echoes and are ignored until the echo suppression window expires.
//!
//! Deadlines are plain `Instant`s owned by the synchronizer. Scheduling a
//! new deadline of the same kind replaces the old one. Callers pass `now`
//! in, so the state machine runs the same under a real clock and in tests.
//!
//! # Usage
//!
//! ```ignore
//! let mut sync = ScrollSynchronizer::new();
//!
//! // The user scrolled the source view
//! let outcome = sync.handle_scroll(SurfaceId::Source, &editor, &mut preview, Instant::now());
//!
//! // The preview re-rendered with a new height
//! sync.resync(SurfaceId::Rendered, &mut preview, Instant::now());
//! ```

use super::surface::{is_scrollable, ScrollSurface};
use crate::config::Settings;
use log::{debug, trace};
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for sync scrolling behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncScrollConfig {
    /// How long a programmatically scrolled surface ignores its own scroll
    /// events (default: 50ms)
    pub echo_suppression: Duration,
    /// How long a surface stays authoritative after its last genuine scroll
    /// (default: 150ms)
    pub authority_quiescence: Duration,
}

impl Default for SyncScrollConfig {
    fn default() -> Self {
        Self {
            echo_suppression: Duration::from_millis(50),
            authority_quiescence: Duration::from_millis(150),
        }
    }
}

impl SyncScrollConfig {
    /// Build the timing windows from user settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            echo_suppression: Duration::from_millis(settings.echo_suppression_ms),
            authority_quiescence: Duration::from_millis(settings.authority_quiescence_ms),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Surfaces and Origins
// ─────────────────────────────────────────────────────────────────────────────

/// One of the two synchronized surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    /// The raw markdown text view
    Source,
    /// The rendered HTML preview
    Rendered,
}

impl SurfaceId {
    /// The surface on the other side.
    pub fn other(self) -> Self {
        match self {
            SurfaceId::Source => SurfaceId::Rendered,
            SurfaceId::Rendered => SurfaceId::Source,
        }
    }
}

/// Which surface is the authority for the shared scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOrigin {
    /// The source view is leading
    Source,
    /// The rendered view is leading
    Rendered,
    /// No surface is leading (idle state)
    None,
}

impl From<SurfaceId> for ScrollOrigin {
    fn from(id: SurfaceId) -> Self {
        match id {
            SurfaceId::Source => ScrollOrigin::Source,
            SurfaceId::Rendered => ScrollOrigin::Rendered,
        }
    }
}

/// Synchronization state of a single surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    /// Neither leading nor suppressing echoes
    #[default]
    Idle,
    /// Authoritative until the deadline
    Leading { until: Instant },
    /// Ignoring scroll events until the deadline
    Following { until: Instant },
}

impl SurfaceState {
    /// Resolve expired deadlines.
    fn settle(self, now: Instant) -> Self {
        match self {
            SurfaceState::Leading { until } | SurfaceState::Following { until }
                if now >= until =>
            {
                SurfaceState::Idle
            }
            state => state,
        }
    }

    /// Whether this surface is the authority.
    pub fn is_leading(self) -> bool {
        matches!(self, SurfaceState::Leading { .. })
    }

    /// Whether scroll events from this surface are being discarded.
    pub fn is_echo_suppressed(self) -> bool {
        matches!(self, SurfaceState::Following { .. })
    }
}

/// What a scroll event led to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// Sync scrolling is turned off
    Disabled,
    /// The event was an echo of a programmatic scroll and was dropped
    Ignored,
    /// The scrolled surface cannot scroll, nothing was published
    Degenerate,
    /// The position was published but the other surface could not follow
    Published { fraction: f32 },
    /// The position was published and the other surface was scrolled
    Synced { fraction: f32, target_offset: f32 },
}

// ─────────────────────────────────────────────────────────────────────────────
// Synchronizer
// ─────────────────────────────────────────────────────────────────────────────

/// State machine coordinating the source and rendered scroll positions.
#[derive(Debug, Clone)]
pub struct ScrollSynchronizer {
    /// Whether sync scrolling is enabled
    enabled: bool,
    /// Timing configuration
    config: SyncScrollConfig,
    /// Shared scroll position, overwritten by every published event
    position: f32,
    /// State of the source view
    source: SurfaceState,
    /// State of the rendered view
    rendered: SurfaceState,
}

impl Default for ScrollSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSynchronizer {
    /// Create a synchronizer with default timings.
    pub fn new() -> Self {
        Self::with_config(SyncScrollConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: SyncScrollConfig) -> Self {
        Self {
            enabled: true,
            config,
            position: 0.0,
            source: SurfaceState::Idle,
            rendered: SurfaceState::Idle,
        }
    }

    /// The timing configuration in use.
    pub fn config(&self) -> &SyncScrollConfig {
        &self.config
    }

    /// Whether sync scrolling is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set whether sync scrolling is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.source = SurfaceState::Idle;
            self.rendered = SurfaceState::Idle;
        }
    }

    /// Toggle sync scrolling on/off.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Return to the neutral state at the top of the document.
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.source = SurfaceState::Idle;
        self.rendered = SurfaceState::Idle;
    }

    /// The shared scroll position.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// The state of one surface at `now`.
    pub fn state(&self, id: SurfaceId, now: Instant) -> SurfaceState {
        self.slot(id).settle(now)
    }

    /// The authoritative surface at `now`.
    pub fn origin(&self, now: Instant) -> ScrollOrigin {
        [SurfaceId::Source, SurfaceId::Rendered]
            .into_iter()
            .find(|&id| self.state(id, now).is_leading())
            .map_or(ScrollOrigin::None, ScrollOrigin::from)
    }

    /// Expire any deadlines that have passed.
    pub fn tick(&mut self, now: Instant) {
        self.source = self.source.settle(now);
        self.rendered = self.rendered.settle(now);
    }

    fn slot(&self, id: SurfaceId) -> SurfaceState {
        match id {
            SurfaceId::Source => self.source,
            SurfaceId::Rendered => self.rendered,
        }
    }

    fn slot_mut(&mut self, id: SurfaceId) -> &mut SurfaceState {
        match id {
            SurfaceId::Source => &mut self.source,
            SurfaceId::Rendered => &mut self.rendered,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event Handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a scroll event reported by surface `id`.
    ///
    /// Echoes are dropped. A genuine event makes `id` the authority and
    /// publishes its fraction as the shared position.
    pub fn on_user_scroll<S>(&mut self, id: SurfaceId, surface: &S, now: Instant) -> SyncOutcome
    where
        S: ScrollSurface + ?Sized,
    {
        self.tick(now);
        if !self.enabled {
            return SyncOutcome::Disabled;
        }

        if self.slot(id).is_echo_suppressed() {
            trace!("Dropping echo scroll event from {:?}", id);
            return SyncOutcome::Ignored;
        }

        let Some(fraction) = surface.scroll_fraction() else {
            return SyncOutcome::Degenerate;
        };

        *self.slot_mut(id) = SurfaceState::Leading {
            until: now + self.config.authority_quiescence,
        };
        let other = self.slot_mut(id.other());
        if other.is_leading() {
            *other = SurfaceState::Idle;
        }

        self.position = fraction;
        SyncOutcome::Published { fraction }
    }

    /// Apply the shared position to surface `target`.
    ///
    /// Does nothing when `target` is the authority or cannot scroll.
    /// Otherwise scrolls it and suppresses its echoes for the echo window.
    /// Returns the offset that was applied.
    pub fn propagate<T>(&mut self, target: SurfaceId, surface: &mut T, now: Instant) -> Option<f32>
    where
        T: ScrollSurface + ?Sized,
    {
        self.tick(now);
        if !self.enabled || self.slot(target).is_leading() {
            return None;
        }

        let extent = surface.scrollable_extent();
        if !is_scrollable(extent) {
            return None;
        }

        let offset = self.position * extent;
        *self.slot_mut(target) = SurfaceState::Following {
            until: now + self.config.echo_suppression,
        };
        surface.set_scroll_offset(offset);
        Some(offset)
    }

    /// Handle a scroll on `id` and carry it over to the other surface.
    ///
    /// The other surface receives at most one programmatic scroll per event.
    pub fn handle_scroll<S, T>(
        &mut self,
        id: SurfaceId,
        scrolled: &S,
        other: &mut T,
        now: Instant,
    ) -> SyncOutcome
    where
        S: ScrollSurface + ?Sized,
        T: ScrollSurface + ?Sized,
    {
        match self.on_user_scroll(id, scrolled, now) {
            SyncOutcome::Published { fraction } => match self.propagate(id.other(), other, now) {
                Some(target_offset) => SyncOutcome::Synced {
                    fraction,
                    target_offset,
                },
                None => SyncOutcome::Published { fraction },
            },
            outcome => outcome,
        }
    }

    /// Re-apply the shared position to `target` after its geometry changed,
    /// e.g. when the preview re-rendered or a pane was resized.
    pub fn resync<T>(&mut self, target: SurfaceId, surface: &mut T, now: Instant) -> Option<f32>
    where
        T: ScrollSurface + ?Sized,
    {
        let applied = self.propagate(target, surface, now);
        if let Some(offset) = applied {
            debug!("Resynced {:?} to offset {:.1}", target, offset);
        }
        applied
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
