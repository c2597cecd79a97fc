//! Inkwell - Command-line Entry Point
//!
//! Renders, exports and copies markdown notes without the editor UI.

use clap::{Parser, Subcommand};
use inkwell::config::{load_config, ConfigStore, Settings};
use inkwell::error::{Error, Result};
use inkwell::export::{self, ClipboardHold, ExportOptions};
use inkwell::markdown::MarkdownRenderer;
use inkwell::notes::derive_title;
use log::{debug, info};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "inkwell")]
#[command(author, version, about = "A distraction-free markdown note editor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to an HTML fragment on stdout
    Render {
        /// Markdown file to render (reads stdin when omitted or `-`)
        path: Option<PathBuf>,
    },
    /// Write a printable HTML document and open it for printing
    Export {
        /// Markdown file to export
        path: PathBuf,
        /// Document title (defaults to the note's first line)
        #[arg(short = 't', long)]
        title: Option<String>,
        /// Output directory (defaults to the configured export directory)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Write the document without opening it
        #[arg(long)]
        no_open: bool,
    },
    /// Copy rendered HTML to the clipboard
    ///
    /// On Linux the command keeps running until another application
    /// takes over the clipboard, so the copied note stays pasteable.
    Copy {
        /// Markdown file to copy
        path: PathBuf,
    },
    /// Inspect or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the saved settings as JSON
    Show,
    /// Print the settings file location
    Path,
    /// Change one setting, e.g. `set open_after_export false`
    Set {
        /// Setting name as it appears in config.json
        key: String,
        /// New value (JSON, or a plain string)
        value: String,
    },
    /// Restore every setting to its default
    Reset,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render { path } => {
            let markdown = match path.as_deref() {
                Some(p) if p != Path::new("-") => read_note(p)?,
                _ => read_stdin()?,
            };
            let settings = load_config();
            let html = MarkdownRenderer::with_options(settings.render_options()).render(&markdown);
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", html)?;
            Ok(())
        }
        Commands::Export {
            path,
            title,
            output,
            no_open,
        } => {
            let markdown = read_note(&path)?;
            let title = title.unwrap_or_else(|| derive_title(&markdown));

            let mut options = ExportOptions::from_settings(&load_config());
            if let Some(dir) = output {
                options = options.with_directory(dir);
            }
            if no_open {
                options = options.with_open_after_export(false);
            }

            let written = export::export_document(&markdown, &title, &options)?;
            println!("{}", written.display());
            Ok(())
        }
        Commands::Copy { path } => {
            let markdown = read_note(&path)?;
            export::copy_html_to_clipboard_with(&markdown, ClipboardHold::UntilReplaced)?;
            info!("Copied rendered HTML of {} to clipboard", path.display());
            Ok(())
        }
        Commands::Config { action } => run_config(action, &ConfigStore::locate()?),
    }
}

fn run_config(action: ConfigAction, store: &ConfigStore) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = store.load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Path => println!("{}", store.file_path().display()),
        ConfigAction::Set { key, value } => {
            let mut settings = store.load()?;
            settings.set_from_str(&key, &value)?;
            store.save(&settings)?;
        }
        ConfigAction::Reset => store.save(&Settings::default())?,
    }
    Ok(())
}

/// Read a markdown note from disk.
fn read_note(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_stdin() -> Result<String> {
    let mut markdown = String::new();
    io::stdin().read_to_string(&mut markdown)?;
    Ok(markdown)
}
