//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use quire_core::{BlogStatus, DraftKey, POPULAR_LIMIT};

/// Quire blog client
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// API base URL (overrides QUIRE_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Local data file for the token and drafts (overrides QUIRE_DATA_PATH)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and log in
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Repeat the password
        #[arg(short, long)]
        confirm: String,
    },

    /// Forget the stored session
    Logout,

    /// List blogs, newest first
    List {
        /// Case-insensitive text to find in titles and excerpts
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        tag: Option<String>,
        /// Number of pages to reveal
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },

    /// Most viewed blogs
    Popular {
        #[arg(short = 'n', long, default_value_t = POPULAR_LIMIT)]
        limit: usize,
    },

    /// Category names in use
    Categories,

    /// Totals for the dashboard
    Stats,

    /// Show one blog and count the view
    Show { id: String },

    /// Like a blog
    Like { id: String },

    /// Delete a blog
    Delete { id: String },

    /// Manage locally saved drafts
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Publish the saved draft: `new` creates a blog, a blog id updates it
    Publish { key: DraftKey },
}

#[derive(Subcommand, Debug, Clone)]
pub enum DraftAction {
    /// Save editor fields as a draft (`new` or a blog id)
    Save {
        key: DraftKey,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "")]
        excerpt: String,
        /// Comma-separated tag names
        #[arg(long)]
        tags: Option<String>,
        /// Comma-separated category names
        #[arg(long)]
        categories: Option<String>,
        #[arg(long)]
        status: Option<BlogStatus>,
        #[arg(long)]
        image: Option<String>,
    },

    /// Start editing an existing blog: copy it into its draft slot
    Edit { id: String },

    /// Print a saved draft
    Show { key: DraftKey },

    /// Discard a saved draft
    Clear { key: DraftKey },
}
