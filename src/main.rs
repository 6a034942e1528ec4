use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shoplist::config::EventOrdering;

mod cli_exec;
mod cli_runtime;

#[derive(Parser)]
#[command(name = "shoplist")]
#[command(about = "Shared shopping list client", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone, Debug)]
pub(crate) struct GlobalOpts {
    /// Server address (host[:port], no scheme)
    #[arg(long, env = "SHOPLIST_SERVER", global = true)]
    server: Option<String>,

    /// Use plaintext ws/http instead of wss/https
    #[arg(long, env = "SHOPLIST_UNSECURE", global = true)]
    insecure: bool,

    /// Directory for persisted client state (defaults to the platform config dir)
    #[arg(long, env = "SHOPLIST_STATE_DIR", global = true)]
    state_dir: Option<PathBuf>,

    /// What to do with item events that arrive before the initial list
    #[arg(long, value_enum, default_value_t = EventOrdering::BufferUntilSnapshot, global = true)]
    ordering: EventOrdering,

    /// Append new-item events even when the id is already listed
    #[arg(long, global = true)]
    no_dedupe: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SHOPLIST_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SHOPLIST_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        password_confirm: String,
        /// Accept the terms of service and privacy policy
        #[arg(long)]
        accept_terms: bool,
    },

    /// End the session
    Logoff,

    /// Show or set the display theme
    Theme {
        /// light or dark
        theme: Option<String>,
    },

    /// Print the list once
    List {
        /// Show trashed items instead
        #[arg(long)]
        trash: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow the list live until interrupted
    Watch {
        /// Show trashed items instead
        #[arg(long)]
        trash: bool,
        /// Emit JSON (one array per change)
        #[arg(long)]
        json: bool,
    },

    /// Add an item
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        count: u32,
        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Edit an item
    Edit {
        /// Item id (or unique prefix)
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        count: Option<u32>,
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Move an item to the trash
    Trash {
        /// Item id (or unique prefix)
        id: String,
    },

    /// Bring an item back from the trash
    Restore {
        /// Item id (or unique prefix)
        id: String,
    },

    /// Permanently delete an item
    Delete {
        /// Item id (or unique prefix)
        id: String,
    },
}

fn main() {
    if let Err(err) = cli_runtime::run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
