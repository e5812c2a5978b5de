//! Stele - A static site generator for markdown blogs.

mod cli;
mod compiler;
mod config;
mod content;
mod core;
mod embed;
mod logger;
mod reload;
mod render;
mod site;
mod utils;

#[cfg(test)]
mod test_helpers;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, serve::ServeArgs};
use site::SiteOptions;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            base_url,
            drafts,
            notes,
        } => {
            let options = SiteOptions {
                include_drafts: drafts,
                enable_notes: notes,
                base_url,
            };
            cli::build::build_site(&cli.root, &output, &options)
        }
        Commands::Serve {
            interface,
            port,
            watch,
            notes,
        } => cli::serve::serve_site(
            &cli.root,
            &ServeArgs {
                interface,
                port,
                watch,
                notes,
            },
        ),
    }
}
