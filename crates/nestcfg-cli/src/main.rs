//! `nestcfg` — query and edit hierarchical config files from the shell.
//!
//! # Usage
//!
//! ```text
//! nestcfg [--settings <FILE>] [--indent <S>] <COMMAND>
//!
//! Commands:
//!   get            <FILE> <PATH>                     Print a value or list a header
//!   set            <FILE> <PATH> <VALUE> [--string] [--parents]
//!   create-header  <FILE> <PATH>                     Create headers along a path
//!   fmt            <FILE> [--output <OUT>]           Re-indent a file
//!   tree           <FILE>                            Print an outline with kinds
//!   settings       [--init]                          Show or create the settings file
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable           | Description                                  |
//! |--------------------|----------------------------------------------|
//! | `NESTCFG_SETTINGS` | Settings file location                       |
//! | `NESTCFG_INDENT`   | Indentation used when writing config files   |
//! | `RUST_LOG`         | Log filter; overrides `[logging] level`      |

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nestcfg_cli::commands::{Commands, SetOptions};
use nestcfg_cli::settings::{self, CliSettings};
use nestcfg_core::FileStorage;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Query and edit hierarchical `[Header]` ... `/Header]` config files.
#[derive(Debug, Parser)]
#[command(name = "nestcfg", version)]
struct Cli {
    /// Settings file to use instead of the platform default.
    #[arg(long, global = true, env = "NESTCFG_SETTINGS")]
    settings: Option<PathBuf>,

    /// Indentation unit for written files (overrides `[format] indent`).
    #[arg(long, global = true, env = "NESTCFG_INDENT")]
    indent: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a number or string, or list the children of a header.
    Get { file: PathBuf, path: String },

    /// Store a value and save the file.
    Set {
        file: PathBuf,
        path: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Store the value as a string even if it looks like a number.
        #[arg(long)]
        string: bool,
        /// Create missing parent headers.
        #[arg(long)]
        parents: bool,
    },

    /// Create headers along a path and save the file.
    CreateHeader { file: PathBuf, path: String },

    /// Re-write a file with regenerated indentation.
    Fmt {
        file: PathBuf,
        /// Write here instead of overwriting the input.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print an outline of the tree with entry kinds.
    Tree { file: PathBuf },

    /// Print the effective settings.
    Settings {
        /// Write the effective settings to the settings file.
        #[arg(long)]
        init: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = settings::load_settings(cli.settings.as_deref())
        .context("failed to load nestcfg settings")?;

    // Logs go to stderr so `get` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let indent = cli
        .indent
        .clone()
        .unwrap_or_else(|| settings.format.indent.clone());
    debug!("write indent: {indent:?}");

    let storage = FileStorage;
    let commands = Commands::new(&storage, indent);

    match cli.command {
        Command::Get { file, path } => {
            let output = commands
                .get(&file, &path)
                .with_context(|| format!("failed to read '{path}' from {}", file.display()))?;
            print!("{output}");
        }
        Command::Set {
            file,
            path,
            value,
            string,
            parents,
        } => {
            let options = SetOptions {
                force_string: string,
                create_parents: parents,
            };
            commands
                .set(&file, &path, &value, options)
                .with_context(|| format!("failed to set '{path}' in {}", file.display()))?;
        }
        Command::CreateHeader { file, path } => {
            commands.create_header(&file, &path).with_context(|| {
                format!("failed to create header '{path}' in {}", file.display())
            })?;
        }
        Command::Fmt { file, output } => {
            commands
                .fmt(&file, output.as_deref())
                .with_context(|| format!("failed to format {}", file.display()))?;
        }
        Command::Tree { file } => {
            let outline = commands
                .outline(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            print!("{outline}");
        }
        Command::Settings { init } => {
            let path = settings_path(cli.settings)?;
            show_settings(&path, &settings, init)?;
        }
    }

    Ok(())
}

fn settings_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => settings::settings_file_path().context("no settings location available"),
    }
}

fn show_settings(path: &Path, settings: &CliSettings, init: bool) -> anyhow::Result<()> {
    if init {
        settings::save_settings_to(settings, path)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", settings::render_settings(settings)?);
    Ok(())
}
