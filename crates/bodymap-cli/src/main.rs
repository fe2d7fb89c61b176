//! Body Map CLI - annotate pain locations on an anatomical front view.
//!
//! Regions are picked by id, by search or by a free-text command such as
//! `Brachialis rechts Schmerz 6/10`. Annotations are kept per session in a
//! JSON store under the configured data directory.

use std::path::PathBuf;

use anyhow::Result;
use bodymap_core::{Isolation, Layer};
use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;
mod config;

use commands::annotate::{self, AnnotateOptions};
use commands::render::{OutputFormat, RenderOptions};
use commands::{config as config_cmd, list, render, repl};
use config::Config;

/// Body Map CLI - annotate pain locations on a body diagram.
#[derive(Parser, Debug)]
#[command(
    name = "bodymap",
    author,
    version,
    about = "Body Map: annotate pain locations on an anatomical diagram",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a free-text command and select the named region.
    ///
    /// Example: bodymap voice "Brachialis rechts Schmerz 6/10" --save
    Voice {
        /// Command text (structure, optional side, optional intensity).
        text: String,

        /// Session to work in (1-6).
        #[arg(short, long)]
        session: Option<u8>,

        /// Note to attach instead of the auto-filled one.
        #[arg(short, long)]
        note: Option<String>,

        /// Save the annotation.
        #[arg(long)]
        save: bool,
    },

    /// Select a region by id.
    Select {
        /// Region id (see `bodymap regions`).
        id: String,

        /// Session to work in (1-6).
        #[arg(short, long)]
        session: Option<u8>,

        /// Intensity to record (1-10).
        #[arg(short, long)]
        intensity: Option<u8>,

        /// Note to attach.
        #[arg(short, long)]
        note: Option<String>,

        /// Save the annotation.
        #[arg(long)]
        save: bool,
    },

    /// Select the first region matching a search query.
    Find {
        /// Search text, matched against ids, structures and labels.
        query: String,

        /// Session to work in (1-6).
        #[arg(short, long)]
        session: Option<u8>,

        /// Intensity to record (1-10).
        #[arg(short, long)]
        intensity: Option<u8>,

        /// Note to attach.
        #[arg(short, long)]
        note: Option<String>,

        /// Save the annotation.
        #[arg(long)]
        save: bool,
    },

    /// Delete the annotation of a region.
    Delete {
        /// Region id.
        id: String,

        /// Session to delete from (1-6).
        #[arg(short, long)]
        session: Option<u8>,
    },

    /// List annotations of a session, newest first.
    List {
        /// Session to list (1-6).
        #[arg(short, long)]
        session: Option<u8>,

        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List diagram regions with their pin positions.
    Regions,

    /// Render the body map.
    Render {
        /// Session to render (1-6).
        #[arg(short, long)]
        session: Option<u8>,

        /// Region to show as selected.
        #[arg(long)]
        select: Option<String>,

        /// Live intensity for the selected region (1-10).
        #[arg(short, long)]
        intensity: Option<u8>,

        /// Isolation mode: mix or a layer name.
        #[arg(long)]
        isolate: Option<Isolation>,

        /// Layers to hide (can be specified multiple times).
        #[arg(long)]
        hide: Vec<Layer>,

        /// Output format: svg or json.
        #[arg(short, long, default_value = "svg")]
        format: String,

        /// Output file path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive session reading one action per line from stdin.
    Repl,

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = Config::load()?;

    match cli.command {
        Commands::Voice {
            text,
            session,
            note,
            save,
        } => {
            let options = AnnotateOptions {
                session,
                intensity: None,
                note,
                save,
            };
            annotate::voice(&config, &text, &options)?;
        }

        Commands::Select {
            id,
            session,
            intensity,
            note,
            save,
        } => {
            let options = AnnotateOptions {
                session,
                intensity,
                note,
                save,
            };
            annotate::select(&config, &id, &options)?;
        }

        Commands::Find {
            query,
            session,
            intensity,
            note,
            save,
        } => {
            let options = AnnotateOptions {
                session,
                intensity,
                note,
                save,
            };
            annotate::find(&config, &query, &options)?;
        }

        Commands::Delete { id, session } => {
            annotate::delete(&config, &id, session)?;
        }

        Commands::List { session, json } => {
            list::execute(&config, session, json)?;
        }

        Commands::Regions => {
            list::regions(&config)?;
        }

        Commands::Render {
            session,
            select,
            intensity,
            isolate,
            hide,
            format,
            output,
        } => {
            let format: OutputFormat = format.parse()?;
            let options = RenderOptions {
                session,
                select,
                intensity,
                isolate,
                hide,
                format,
                output,
            };
            render::execute(&config, &options)?;
        }

        Commands::Repl => {
            repl::execute(&config)?;
        }

        Commands::Config(config_cmd_inner) => {
            match config_cmd_inner {
                ConfigCommands::Show => {
                    config_cmd::show(&config)?;
                }
                ConfigCommands::Set { key, value } => {
                    // Environment overrides must not leak into the file.
                    let mut stored = Config::load_file()?;
                    config_cmd::set(&mut stored, &key, &value)?;
                }
                ConfigCommands::Get { key } => {
                    config_cmd::get(&config, &key)?;
                }
                ConfigCommands::Reset => {
                    config_cmd::reset()?;
                }
                ConfigCommands::Path => {
                    if let Some(path) = Config::config_file_path() {
                        println!("{}", path.display());
                    } else {
                        println!("(no config file path available)");
                    }
                }
            }
        }
    }

    Ok(())
}
