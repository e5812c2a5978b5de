//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Stele static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Site root holding stele.yaml, posts/ and notes/
    #[arg(short, long, global = true, default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub root: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the site into a static directory
    #[command(visible_alias = "b")]
    Build {
        /// Output directory (relative to the site root); wiped before building
        #[arg(short, long, default_value = "public", value_hint = clap::ValueHint::DirPath)]
        output: PathBuf,

        /// Override the configured base URL
        #[arg(short = 'U', long = "base-url", value_hint = clap::ValueHint::Url)]
        base_url: Option<String>,

        /// Include draft posts
        #[arg(short, long)]
        drafts: bool,

        /// Build the notes section
        #[arg(short, long)]
        notes: bool,
    },

    /// Start development server with live reload
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable file watching for auto-rebuild
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,

        /// Serve the notes section
        #[arg(short, long)]
        notes: bool,
    },
}
