//! CLI definitions for Carryover.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Carryover CLI.
#[derive(Parser)]
#[command(name = "carryover")]
#[command(about = "Carry chat context from one assistant page into another")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// A saved chat page and the address it was loaded from.
#[derive(Args, Debug, Clone)]
pub(crate) struct PageArgs {
    /// Saved HTML of the chat page
    #[arg(short, long)]
    pub page: PathBuf,

    /// Address of the page (selects the site)
    #[arg(short, long)]
    pub url: String,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Extract the conversation from a page and save it
    Extract {
        #[command(flatten)]
        page: PageArgs,

        /// Save a summary from the context service instead of the raw text
        #[arg(long)]
        summarize: bool,
    },

    /// Inject the saved conversation into the page editor
    Inject {
        #[command(flatten)]
        page: PageArgs,

        /// Write the edited page here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Inject the saved user context (or the conversation) into the page editor
    InjectContext {
        #[command(flatten)]
        page: PageArgs,

        /// Write the edited page here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Scrape another page and inject its text into the page editor
    AddContext {
        #[command(flatten)]
        page: PageArgs,

        /// Page to scrape
        #[arg(long)]
        source: String,

        /// Ask the context service for a summary
        #[arg(long)]
        summarize: bool,

        /// Word limit of the summary
        #[arg(long)]
        word_limit: Option<u32>,

        /// Write the edited page here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Save free-text user context
    SaveContext {
        /// Context text (empty clears it)
        text: String,
    },

    /// Print the saved state
    Show,
}
