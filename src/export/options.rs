//! Export Options
//!
//! Where exported documents are written and what happens afterwards.

use crate::config::Settings;
use std::path::PathBuf;

/// Options controlling document export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Output directory; the system temp directory when `None`
    pub directory: Option<PathBuf>,
    /// Hand the written document to the system viewer for printing
    pub open_after_export: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            directory: None,
            open_after_export: true,
        }
    }
}

impl ExportOptions {
    /// Build export options from user settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            directory: settings.export_directory.clone(),
            open_after_export: settings.open_after_export,
        }
    }

    /// Set the output directory.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Set whether the document is opened after writing.
    pub fn with_open_after_export(mut self, open: bool) -> Self {
        self.open_after_export = open;
        self
    }

    /// The directory exported documents are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(std::env::temp_dir)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_temp_dir() {
        let options = ExportOptions::default();
        assert!(options.open_after_export);
        assert_eq!(options.output_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            export_directory: Some(PathBuf::from("/tmp/prints")),
            open_after_export: false,
            ..Settings::default()
        };
        let options = ExportOptions::from_settings(&settings);

        assert_eq!(options.output_dir(), PathBuf::from("/tmp/prints"));
        assert!(!options.open_after_export);
    }

    #[test]
    fn test_builders() {
        let options = ExportOptions::default()
            .with_directory("/out")
            .with_open_after_export(false);
        assert_eq!(options.directory, Some(PathBuf::from("/out")));
        assert!(!options.open_after_export);
    }
}
