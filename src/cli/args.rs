//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// File-based route generator
#[derive(Parser)]
#[command(
    name = "routegen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate route names, paths and trees from a page directory",
    long_about = "Synthesize route names, paths and a route tree from page files, \
                  and keep a hand-editable routes file in sync with the page directory.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .routegen directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Scan pages once and write the routes file and manifest
    #[command(about = "Generate routes from the page directory")]
    Generate,

    /// Generate, then regenerate whenever pages are added or removed
    #[command(
        about = "Watch the page directory and regenerate on changes",
        after_help = "Examples:\n  routegen watch\n  ROUTEGEN_WATCH__DEBOUNCE_MS=250 routegen watch"
    )]
    Watch,

    /// Print synthesized routes without writing anything
    #[command(about = "Show synthesized route names and paths")]
    Routes {
        /// Print the route tree as JSON instead of name/path entries
        #[arg(long)]
        tree: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .routegen/settings.toml")]
    Config,
}
