//! User settings and preferences for Inkwell
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::error::{Error, Result};
use crate::markdown::RenderOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether the rendered preview pane is shown next to the editor
    pub show_preview: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Sync Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether synchronized scrolling between source and preview is enabled
    pub sync_scroll_enabled: bool,

    /// How long a programmatically scrolled pane ignores its scroll events
    pub echo_suppression_ms: u64,

    /// How long a pane stays the scroll authority after the user stops
    pub authority_quiescence_ms: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether preview links open in a new window
    pub links_open_in_new_window: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Directory for exported documents (system temp dir when unset)
    pub export_directory: Option<PathBuf>,

    /// Whether to open exported documents for printing after export
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_preview: true,

            sync_scroll_enabled: true,
            echo_suppression_ms: 50,
            authority_quiescence_ms: 150,

            links_open_in_new_window: true,

            export_directory: None,
            open_after_export: true,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum echo suppression window.
    pub const MIN_ECHO_SUPPRESSION_MS: u64 = 10;
    /// Maximum echo suppression window.
    pub const MAX_ECHO_SUPPRESSION_MS: u64 = 500;
    /// Minimum authority quiescence window.
    pub const MIN_AUTHORITY_QUIESCENCE_MS: u64 = 50;
    /// Maximum authority quiescence window.
    pub const MAX_AUTHORITY_QUIESCENCE_MS: u64 = 2000;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.echo_suppression_ms = self
            .echo_suppression_ms
            .clamp(Self::MIN_ECHO_SUPPRESSION_MS, Self::MAX_ECHO_SUPPRESSION_MS);

        self.authority_quiescence_ms = self.authority_quiescence_ms.clamp(
            Self::MIN_AUTHORITY_QUIESCENCE_MS,
            Self::MAX_AUTHORITY_QUIESCENCE_MS,
        );

        // Authority must outlive the echo window it hands off to
        if self.authority_quiescence_ms < self.echo_suppression_ms {
            self.authority_quiescence_ms = self.echo_suppression_ms;
        }

        // An empty export directory means "use the default"
        if self
            .export_directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.export_directory = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Set one field by its `config.json` key.
    ///
    /// `value` is read as JSON when it parses (`false`, `80`, `null`) and as
    /// a plain string otherwise, so paths need no quoting. The result is
    /// sanitized; on error `self` is left untouched.
    pub fn set_from_str(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let fields = json
            .as_object_mut()
            .ok_or_else(|| Error::Application("Settings are not a JSON object".to_string()))?;
        if !fields.contains_key(key) {
            return Err(Error::Application(format!("Unknown setting '{}'", key)));
        }

        let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        fields.insert(key.to_string(), parsed);

        let mut updated: Settings = serde_json::from_value(json)?;
        updated.sanitize();
        *self = updated;
        Ok(())
    }

    /// Render options for the preview pane.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            links_open_in_new_window: self.links_open_in_new_window,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
