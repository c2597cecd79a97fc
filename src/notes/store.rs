//! In-memory note collection
//!
//! This module defines `Note` and `NoteStore`. The store always holds at
//! least one note and always has exactly one active note.

use log::{debug, warn};
use std::time::SystemTime;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Title used when a note has no usable first line.
pub const UNTITLED: &str = "Untitled";

/// Content of freshly created notes.
const NEW_NOTE_CONTENT: &str = "# Untitled\n\nStart writing...";

/// Content of the note a new store is seeded with.
pub const WELCOME_CONTENT: &str = r#"# Welcome to Inkwell

A sleek, distraction-free markdown note-taking app.

## Features

- **Live Preview** - See your markdown rendered in real-time
- **Clean Interface** - Focus on what matters: your words
- **Synced Scrolling** - Editor and preview stay on the same spot

## Getting Started

Start typing in the editor on the left. Your formatted preview appears on the right.

### Markdown Basics

Here's what you can do:

- Create **bold** and *italic* text
- Add `inline code` and code blocks
- Create [links](https://example.com)
- Build lists and quotes

> "The first draft is just you telling yourself the story." — Terry Pratchett

```javascript
const greeting = "Hello, World!";
console.log(greeting);
```

---

Happy writing! ✨
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Title Derivation
// ─────────────────────────────────────────────────────────────────────────────

/// Derive a note title from its content.
///
/// The title is the first line with any leading `#` markers and the
/// whitespace after them removed. Falls back to [`UNTITLED`].
///
/// # Example
/// ```
/// use inkwell::notes::derive_title;
///
/// assert_eq!(derive_title("## Groceries\n- milk"), "Groceries");
/// assert_eq!(derive_title(""), "Untitled");
/// ```
pub fn derive_title(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    let title = first_line.trim_start_matches('#').trim();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Note
// ─────────────────────────────────────────────────────────────────────────────

/// Stable identifier of a note within a store.
pub type NoteId = usize;

/// A single markdown note.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Unique identifier for this note
    pub id: NoteId,
    /// Display title, derived from the first line of the content
    pub title: String,
    /// Markdown source
    pub content: String,
    /// When the note was created
    pub created_at: SystemTime,
    /// When the content last changed
    pub updated_at: SystemTime,
}

impl Note {
    /// Create a note, deriving its title from `content`.
    pub fn new(id: NoteId, content: impl Into<String>) -> Self {
        let content = content.into();
        let now = SystemTime::now();
        Self {
            id,
            title: derive_title(&content),
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the content, re-deriving the title.
    ///
    /// Returns `false` without touching the timestamp when nothing changed.
    pub fn set_content(&mut self, content: String) -> bool {
        if content == self.content {
            return false;
        }
        self.title = derive_title(&content);
        self.content = content;
        self.updated_at = SystemTime::now();
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Note Store
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered collection of notes, newest first.
#[derive(Debug, Clone)]
pub struct NoteStore {
    notes: Vec<Note>,
    active_id: NoteId,
    next_id: NoteId,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore {
    /// Create a store holding only the welcome note.
    pub fn new() -> Self {
        Self::with_content(WELCOME_CONTENT)
    }

    /// Create a store holding a single note with `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        let note = Note::new(1, content);
        Self {
            active_id: note.id,
            notes: vec![note],
            next_id: 2,
        }
    }

    /// All notes, newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Number of notes in the store.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always `false`: the store never becomes empty.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Get a note by id.
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Id of the active note.
    pub fn active_id(&self) -> NoteId {
        self.active_id
    }

    /// The active note.
    pub fn active(&self) -> &Note {
        // Falls back to the first note so a stale id can never panic
        self.get(self.active_id).unwrap_or(&self.notes[0])
    }

    /// Create a fresh "Untitled" note at the top and make it active.
    pub fn create(&mut self) -> NoteId {
        let note = Note::new(self.next_id, NEW_NOTE_CONTENT);
        self.next_id += 1;
        let id = note.id;
        self.notes.insert(0, note);
        self.active_id = id;
        debug!("Created note {}", id);
        id
    }

    /// Make a note active.
    ///
    /// Returns `true` if the note exists.
    pub fn select(&mut self, id: NoteId) -> bool {
        if self.get(id).is_some() {
            self.active_id = id;
            debug!("Selected note {}", id);
            true
        } else {
            warn!("Cannot select unknown note {}", id);
            false
        }
    }

    /// Replace a note's content and re-derive its title.
    ///
    /// Returns `true` if the note exists and its content changed.
    pub fn update(&mut self, id: NoteId, content: impl Into<String>) -> bool {
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => note.set_content(content.into()),
            None => {
                warn!("Cannot update unknown note {}", id);
                false
            }
        }
    }

    /// Remove a note.
    ///
    /// Deleting the active note activates the first remaining one. Deleting
    /// the last note replaces it with a fresh "Untitled" note.
    /// Returns `true` if the note existed.
    pub fn delete(&mut self, id: NoteId) -> bool {
        let Some(index) = self.notes.iter().position(|n| n.id == id) else {
            return false;
        };
        self.notes.remove(index);
        debug!("Deleted note {}", id);

        if self.notes.is_empty() {
            self.create();
        } else if id == self.active_id {
            self.active_id = self.notes[0].id;
        }
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title() {
        assert_eq!(derive_title("# Hello"), "Hello");
        assert_eq!(derive_title("###   Deep\nbody"), "Deep");
        assert_eq!(derive_title("Plain first line"), "Plain first line");
        assert_eq!(derive_title("#\nbody"), UNTITLED);
        assert_eq!(derive_title("\n# Second"), UNTITLED);
        assert_eq!(derive_title("# Windows\r\nbody"), "Windows");
    }

    #[test]
    fn test_new_store_has_welcome_note() {
        let store = NoteStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.active().title, "Welcome to Inkwell");
        assert_eq!(store.active().content, WELCOME_CONTENT);
    }

    #[test]
    fn test_create_prepends_and_activates() {
        let mut store = NoteStore::new();
        let first = store.active_id();
        let id = store.create();

        assert_ne!(id, first);
        assert_eq!(store.active_id(), id);
        assert_eq!(store.notes()[0].id, id);
        assert_eq!(store.active().title, UNTITLED);
        assert_eq!(store.active().content, "# Untitled\n\nStart writing...");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = NoteStore::new();
        let a = store.create();
        store.delete(a);
        let b = store.create();
        assert_ne!(a, b);
    }

    #[test]
    fn test_select() {
        let mut store = NoteStore::new();
        let welcome = store.active_id();
        store.create();

        assert!(store.select(welcome));
        assert_eq!(store.active_id(), welcome);
        assert!(!store.select(999));
        assert_eq!(store.active_id(), welcome);
    }

    #[test]
    fn test_update_rederives_title() {
        let mut store = NoteStore::new();
        let id = store.create();

        assert!(store.update(id, "## Shopping\n- eggs"));
        let note = store.get(id).unwrap();
        assert_eq!(note.title, "Shopping");
        assert!(note.updated_at >= note.created_at);

        assert!(store.update(id, ""));
        assert_eq!(store.get(id).unwrap().title, UNTITLED);
    }

    #[test]
    fn test_update_unchanged_content() {
        let mut store = NoteStore::with_content("# Same");
        let id = store.active_id();
        assert!(!store.update(id, "# Same"));
        assert!(!store.update(999, "x"));
    }

    #[test]
    fn test_delete_active_selects_first_remaining() {
        let mut store = NoteStore::new();
        let welcome = store.active_id();
        let a = store.create();
        let b = store.create();

        assert!(store.delete(b));
        assert_eq!(store.active_id(), a);
        assert!(store.get(b).is_none());
        assert!(store.get(welcome).is_some());
    }

    #[test]
    fn test_delete_inactive_keeps_selection() {
        let mut store = NoteStore::new();
        let welcome = store.active_id();
        let a = store.create();

        assert!(store.delete(welcome));
        assert_eq!(store.active_id(), a);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_last_creates_fresh_note() {
        let mut store = NoteStore::new();
        let welcome = store.active_id();

        assert!(store.delete(welcome));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_ne!(store.active_id(), welcome);
        assert_eq!(store.active().title, UNTITLED);
    }

    #[test]
    fn test_delete_unknown() {
        let mut store = NoteStore::new();
        assert!(!store.delete(42));
        assert_eq!(store.len(), 1);
    }
}
