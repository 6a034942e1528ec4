use anyhow::{Context, Result};
use clap::Parser;

use shoplist::config::{ClientConfig, default_state_dir};

use crate::{Cli, GlobalOpts};

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    shoplist::logging::init(cli.global.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(crate::cli_exec::handle_command(&cli.global, cli.command))
}

pub(crate) fn build_config(opts: &GlobalOpts) -> Result<ClientConfig> {
    let server = require_server(opts)?;
    let state_dir = match &opts.state_dir {
        Some(dir) => dir.clone(),
        None => default_state_dir()?,
    };
    let mut cfg = ClientConfig::new(server, state_dir);
    cfg.insecure = opts.insecure;
    cfg.ordering = opts.ordering;
    cfg.dedupe_created = !opts.no_dedupe;
    Ok(cfg)
}

pub(crate) fn require_server(opts: &GlobalOpts) -> Result<String> {
    opts.server
        .clone()
        .filter(|s| !s.trim().is_empty())
        .context("no server configured (pass --server or set SHOPLIST_SERVER)")
}
