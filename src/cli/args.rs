//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::ItemId;

/// Hierarchical navigation menus from parent-linked content items
#[derive(Parser, Debug)]
#[command(name = "postnav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.postnav.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the navigation menu for an item
    Render(RenderArgs),

    /// Show all items of a site as an outline
    Items {
        /// Site file (TOML)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        site: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Id of the current item
    #[arg(short = 'p', long)]
    pub current: ItemId,

    /// Site file (TOML)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub site: Option<PathBuf>,

    /// Root the menu at the current item
    #[arg(long)]
    pub only_descendants: bool,

    /// Show all branches
    #[arg(long)]
    pub full_tree: bool,

    /// class value of the current item's link
    #[arg(long)]
    pub marker: Option<String>,

    /// Meta key that hides items
    #[arg(long)]
    pub hidden_key: Option<String>,

    /// Fail instead of showing a hidden root item
    #[arg(long)]
    pub fail_on_hidden_root: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Nested <ul> markup
    Html,
    /// Plain-text outline
    Tree,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
