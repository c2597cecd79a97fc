//! Editor session state for Inkwell
//!
//! This module defines `EditorSession`, the parent controller that ties the
//! note store, the rendered preview and the scroll synchronizer together.
//! Host views feed it edits and scroll events; it keeps the rendered HTML
//! for the active note current and moves the other pane when one scrolls.

use crate::config::{ConfigStore, Settings};
use crate::error::Result;
use crate::export::{self, ExportOptions};
use crate::markdown::MarkdownRenderer;
use crate::notes::{Note, NoteId, NoteStore};
use crate::preview::{ScrollSurface, ScrollSynchronizer, SurfaceId, SyncOutcome, SyncScrollConfig};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

// ─────────────────────────────────────────────────────────────────────────────
// Editor Session
// ─────────────────────────────────────────────────────────────────────────────

/// Central editor state.
///
/// Holds:
/// - The notes and which one is open
/// - The HTML rendered from the open note
/// - Preview visibility and the scroll synchronizer
/// - User settings the above were built from
///
/// # Example
///
/// ```
/// use inkwell::state::EditorSession;
///
/// let mut session = EditorSession::new();
/// session.update_active("# Hello\n\nWorld");
/// assert_eq!(session.rendered_html(), "<h1>Hello</h1>\n<p>World</p>");
/// assert_eq!(session.active_note().title, "Hello");
/// ```
#[derive(Debug, Clone)]
pub struct EditorSession {
    notes: NoteStore,
    settings: Settings,
    renderer: MarkdownRenderer,
    sync: ScrollSynchronizer,
    show_preview: bool,
    rendered_html: String,
    settings_dirty: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Create a session with default settings and the welcome note.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create a session from user settings, seeded with the welcome note.
    pub fn with_settings(settings: Settings) -> Self {
        Self::with_notes(NoteStore::new(), settings)
    }

    /// Create a session around an existing note store.
    ///
    /// Settings are sanitized first, so hand-built values get the same
    /// bounds as loaded ones.
    pub fn with_notes(notes: NoteStore, mut settings: Settings) -> Self {
        settings.sanitize();
        let mut session = Self {
            notes,
            renderer: MarkdownRenderer::with_options(settings.render_options()),
            sync: Self::build_sync(&settings),
            show_preview: settings.show_preview,
            settings,
            rendered_html: String::new(),
            settings_dirty: false,
        };
        session.refresh_render();
        session
    }

    fn build_sync(settings: &Settings) -> ScrollSynchronizer {
        let mut sync = ScrollSynchronizer::with_config(SyncScrollConfig::from_settings(settings));
        sync.set_enabled(settings.sync_scroll_enabled);
        sync
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The note store.
    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    /// The note open in the editor.
    pub fn active_note(&self) -> &Note {
        self.notes.active()
    }

    /// HTML rendered from the active note.
    pub fn rendered_html(&self) -> &str {
        &self.rendered_html
    }

    /// The settings this session was built from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The scroll synchronizer.
    pub fn sync_scroll(&self) -> &ScrollSynchronizer {
        &self.sync
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Note Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the active note's text, re-rendering when it changed.
    ///
    /// Returns `true` if the content changed.
    pub fn update_active(&mut self, content: impl Into<String>) -> bool {
        let id = self.notes.active_id();
        let changed = self.notes.update(id, content);
        if changed {
            self.refresh_render();
        }
        changed
    }

    /// Create a new note and open it.
    pub fn create_note(&mut self) -> NoteId {
        let id = self.notes.create();
        self.open_active();
        id
    }

    /// Open another note.
    ///
    /// Returns `true` if the note exists.
    pub fn select_note(&mut self, id: NoteId) -> bool {
        if id == self.notes.active_id() {
            return self.notes.get(id).is_some();
        }
        let selected = self.notes.select(id);
        if selected {
            self.open_active();
        }
        selected
    }

    /// Delete a note, opening whichever note becomes active.
    ///
    /// Returns `true` if the note existed.
    pub fn delete_note(&mut self, id: NoteId) -> bool {
        let previous = self.notes.active_id();
        let deleted = self.notes.delete(id);
        if deleted && self.notes.active_id() != previous {
            self.open_active();
        }
        deleted
    }

    /// A different document is in the panes: start from the top.
    fn open_active(&mut self) {
        self.sync.reset();
        self.refresh_render();
    }

    fn refresh_render(&mut self) {
        self.rendered_html = self.renderer.render(&self.notes.active().content);
        debug!(
            "Rendered note {} ({} bytes of HTML)",
            self.notes.active_id(),
            self.rendered_html.len()
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preview and Scrolling
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether the preview pane is visible.
    pub fn is_preview_visible(&self) -> bool {
        self.show_preview
    }

    /// Show or hide the preview pane.
    pub fn set_preview_visible(&mut self, visible: bool) {
        self.show_preview = visible;
    }

    /// Toggle the preview pane, returning the new visibility.
    ///
    /// The choice is remembered in the settings.
    pub fn toggle_preview(&mut self) -> bool {
        self.show_preview = !self.show_preview;
        self.settings.show_preview = self.show_preview;
        self.settings_dirty = true;
        debug!("Preview visible: {}", self.show_preview);
        self.show_preview
    }

    /// Toggle sync scrolling, returning whether it is now enabled.
    pub fn toggle_sync_scroll(&mut self) -> bool {
        let enabled = self.sync.toggle();
        self.settings.sync_scroll_enabled = enabled;
        self.settings_dirty = true;
        enabled
    }

    /// The user scrolled the editor.
    ///
    /// With the preview hidden the position is still tracked, so showing the
    /// preview again can [`resync_preview`](Self::resync_preview) to it.
    pub fn on_editor_scroll<S, T>(&mut self, editor: &S, preview: &mut T, now: Instant) -> SyncOutcome
    where
        S: ScrollSurface + ?Sized,
        T: ScrollSurface + ?Sized,
    {
        if self.show_preview {
            self.sync.handle_scroll(SurfaceId::Source, editor, preview, now)
        } else {
            self.sync.on_user_scroll(SurfaceId::Source, editor, now)
        }
    }

    /// The user scrolled the preview.
    pub fn on_preview_scroll<S, T>(&mut self, preview: &S, editor: &mut T, now: Instant) -> SyncOutcome
    where
        S: ScrollSurface + ?Sized,
        T: ScrollSurface + ?Sized,
    {
        if !self.show_preview {
            return SyncOutcome::Ignored;
        }
        self.sync.handle_scroll(SurfaceId::Rendered, preview, editor, now)
    }

    /// Re-apply the shared position after the preview's layout changed.
    pub fn resync_preview<T>(&mut self, preview: &mut T, now: Instant) -> Option<f32>
    where
        T: ScrollSurface + ?Sized,
    {
        if !self.show_preview {
            return None;
        }
        self.sync.resync(SurfaceId::Rendered, preview, now)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Change settings and apply them to the live session.
    ///
    /// The renderer and synchronizer are rebuilt, so the shared scroll
    /// position starts over at the top.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings.sanitize();
        self.renderer = MarkdownRenderer::with_options(self.settings.render_options());
        self.sync = Self::build_sync(&self.settings);
        self.show_preview = self.settings.show_preview;
        self.settings_dirty = true;
        self.refresh_render();
    }

    /// Whether settings changed since they were last saved.
    pub fn has_unsaved_settings(&self) -> bool {
        self.settings_dirty
    }

    /// Save settings to `store` if they changed.
    ///
    /// Returns `true` if settings were written. Failures are logged and
    /// the settings stay dirty so a later call can retry.
    pub fn save_settings_if_dirty(&mut self, store: &ConfigStore) -> bool {
        if !self.settings_dirty {
            return false;
        }
        match store.save(&self.settings) {
            Ok(()) => {
                self.settings_dirty = false;
                true
            }
            Err(e) => {
                warn!("Failed to save settings: {}", e);
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Export options derived from the current settings.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::from_settings(&self.settings)
    }

    /// Write the active note as a printable document.
    pub fn export_active(&self, options: &ExportOptions) -> Result<PathBuf> {
        let note = self.notes.active();
        info!("Exporting note '{}'", note.title);
        export::export_document(&note.content, &note.title, options)
    }

    /// Copy the active note's rendered HTML to the clipboard.
    pub fn copy_active_html(&self) -> Result<()> {
        export::copy_html_to_clipboard(&self.notes.active().content)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::UNTITLED;
    use crate::preview::{ScrollGeometry, ScrollOrigin};
    use std::time::Duration;
    use tempfile::TempDir;

    fn panes() -> (ScrollGeometry, ScrollGeometry) {
        (ScrollGeometry::new(1100.0, 100.0), ScrollGeometry::new(2100.0, 100.0))
    }

    #[test]
    fn test_new_session_renders_welcome() {
        let session = EditorSession::new();
        assert_eq!(session.active_note().title, "Welcome to Inkwell");
        assert!(session.rendered_html().starts_with("<h1>Welcome to Inkwell</h1>"));
        assert!(session.is_preview_visible());
    }

    #[test]
    fn test_edit_rerenders() {
        let mut session = EditorSession::new();
        assert!(session.update_active("**bold**"));
        assert_eq!(session.rendered_html(), "<p><strong>bold</strong></p>");
        assert!(!session.update_active("**bold**"));
    }

    #[test]
    fn test_settings_shape_rendering() {
        let settings = Settings {
            links_open_in_new_window: false,
            show_preview: false,
            ..Settings::default()
        };
        let mut session = EditorSession::with_settings(settings);
        session.update_active("[a](https://a.example)");

        assert_eq!(
            session.rendered_html(),
            "<p><a href=\"https://a.example\">a</a></p>"
        );
        assert!(!session.is_preview_visible());
    }

    #[test]
    fn test_select_switches_rendered_note() {
        let mut session = EditorSession::new();
        let welcome = session.notes().active_id();
        let id = session.create_note();
        assert_eq!(session.rendered_html(), "<h1>Untitled</h1>\n<p>Start writing...</p>");

        assert!(session.select_note(welcome));
        assert!(session.rendered_html().starts_with("<h1>Welcome to Inkwell</h1>"));
        assert!(session.select_note(id));
        assert!(session.rendered_html().starts_with("<h1>Untitled</h1>"));
        assert!(!session.select_note(999));
    }

    #[test]
    fn test_delete_active_rerenders_next() {
        let mut session = EditorSession::new();
        let id = session.create_note();
        session.update_active("# Scratch");

        assert!(session.delete_note(id));
        assert!(session.rendered_html().starts_with("<h1>Welcome to Inkwell</h1>"));
    }

    #[test]
    fn test_delete_last_note() {
        let mut session = EditorSession::new();
        let welcome = session.notes().active_id();

        assert!(session.delete_note(welcome));
        assert_eq!(session.active_note().title, UNTITLED);
        assert!(session.rendered_html().starts_with("<h1>Untitled</h1>"));
    }

    #[test]
    fn test_editor_scroll_moves_preview() {
        let mut session = EditorSession::new();
        let (editor, mut preview) = panes();
        let editor = editor.at(500.0);
        let now = Instant::now();

        let outcome = session.on_editor_scroll(&editor, &mut preview, now);
        assert_eq!(
            outcome,
            SyncOutcome::Synced {
                fraction: 0.5,
                target_offset: 1000.0
            }
        );
        assert_eq!(preview.offset, 1000.0);

        // The preview's echo of that scroll goes nowhere
        let mut editor = editor;
        let echo = session.on_preview_scroll(&preview, &mut editor, now + Duration::from_millis(10));
        assert_eq!(echo, SyncOutcome::Ignored);
        assert_eq!(editor.offset, 500.0);
    }

    #[test]
    fn test_hidden_preview_tracks_position() {
        let settings = Settings {
            show_preview: false,
            ..Settings::default()
        };
        let mut session = EditorSession::with_settings(settings);
        let (editor, mut preview) = panes();
        let editor = editor.at(250.0);
        let now = Instant::now();

        let outcome = session.on_editor_scroll(&editor, &mut preview, now);
        assert_eq!(outcome, SyncOutcome::Published { fraction: 0.25 });
        assert_eq!(preview.offset, 0.0);

        // Showing the preview later lands it on the tracked position
        assert!(session.toggle_preview());
        let later = now + Duration::from_millis(500);
        assert_eq!(session.resync_preview(&mut preview, later), Some(500.0));
        assert_eq!(preview.offset, 500.0);
    }

    #[test]
    fn test_hidden_preview_ignores_its_events() {
        let mut session = EditorSession::new();
        session.set_preview_visible(false);
        let (mut editor, preview) = panes();

        let outcome = session.on_preview_scroll(&preview.at(100.0), &mut editor, Instant::now());
        assert_eq!(outcome, SyncOutcome::Ignored);
    }

    #[test]
    fn test_switching_notes_resets_scroll() {
        let mut session = EditorSession::new();
        let (editor, mut preview) = panes();
        let now = Instant::now();
        session.on_editor_scroll(&editor.at(800.0), &mut preview, now);
        assert_eq!(session.sync_scroll().origin(now), ScrollOrigin::Source);

        session.create_note();
        assert_eq!(session.sync_scroll().position(), 0.0);
        assert_eq!(session.sync_scroll().origin(now), ScrollOrigin::None);
    }

    #[test]
    fn test_toggle_sync_scroll() {
        let mut session = EditorSession::new();
        assert!(!session.toggle_sync_scroll());
        assert!(!session.settings().sync_scroll_enabled);

        let (editor, mut preview) = panes();
        let outcome = session.on_editor_scroll(&editor.at(100.0), &mut preview, Instant::now());
        assert_eq!(outcome, SyncOutcome::Disabled);
        assert_eq!(preview.offset, 0.0);
    }

    #[test]
    fn test_hand_built_settings_are_bounded() {
        let settings = Settings {
            echo_suppression_ms: 0,
            authority_quiescence_ms: 0,
            ..Settings::default()
        };
        let session = EditorSession::with_settings(settings);

        let config = session.sync_scroll().config();
        assert_eq!(
            config.echo_suppression,
            Duration::from_millis(Settings::MIN_ECHO_SUPPRESSION_MS)
        );
        assert_eq!(
            config.authority_quiescence,
            Duration::from_millis(Settings::MIN_AUTHORITY_QUIESCENCE_MS)
        );
        assert_eq!(session.settings().authority_quiescence_ms, 50);
    }

    #[test]
    fn test_authority_survives_zero_quiescence_setting() {
        let settings = Settings {
            authority_quiescence_ms: 0,
            ..Settings::default()
        };
        let mut session = EditorSession::with_settings(settings);
        let (editor, mut preview) = panes();
        let now = Instant::now();

        session.on_editor_scroll(&editor.at(300.0), &mut preview, now);
        let soon = now + Duration::from_millis(20);
        assert_eq!(session.sync_scroll().origin(soon), ScrollOrigin::Source);
    }

    #[test]
    fn test_toggles_are_saved() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::in_dir(temp.path());
        let mut session = EditorSession::new();
        assert!(!session.save_settings_if_dirty(&store));
        assert!(!store.file_path().exists());

        session.toggle_preview();
        session.toggle_sync_scroll();
        assert!(session.has_unsaved_settings());
        assert!(session.save_settings_if_dirty(&store));
        assert!(!session.has_unsaved_settings());

        let saved = store.load().unwrap();
        assert!(!saved.show_preview);
        assert!(!saved.sync_scroll_enabled);

        let restored = EditorSession::with_settings(saved);
        assert!(!restored.is_preview_visible());
        assert!(!restored.sync_scroll().is_enabled());
    }

    #[test]
    fn test_failed_save_stays_dirty() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = ConfigStore::in_dir(&blocker);

        let mut session = EditorSession::new();
        session.toggle_preview();
        assert!(!session.save_settings_if_dirty(&store));
        assert!(session.has_unsaved_settings());
    }

    #[test]
    fn test_update_settings_applies_live() {
        let mut session = EditorSession::new();
        session.update_active("[a](https://a.example)");
        session.update_settings(|s| s.links_open_in_new_window = false);

        assert_eq!(
            session.rendered_html(),
            "<p><a href=\"https://a.example\">a</a></p>"
        );
        assert!(session.has_unsaved_settings());
    }

    #[test]
    fn test_export_active() {
        let dir = TempDir::new().unwrap();
        let mut session = EditorSession::new();
        session.update_active("# Trip Plan\n\n- pack");
        let options = session
            .export_options()
            .with_directory(dir.path())
            .with_open_after_export(false);

        let path = session.export_active(&options).unwrap();
        assert_eq!(path.file_name().unwrap(), "trip-plan.html");
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("<title>Trip Plan</title>"));
    }
}
