//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod resolve;

use std::path::PathBuf;

use clap::Args;
use locnav_config::{CliSettings, RawSiteConfig, RoutingMode};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use resolve::ResolveArgs;

/// Where the site document comes from and how to override it.
#[derive(Args, Debug)]
pub(crate) struct SourceArgs {
    /// Path to the site document (default: auto-discover locnav.toml).
    #[arg(short, long, env = "LOCNAV_CONFIG")]
    config: Option<PathBuf>,

    /// Base path override (e.g., /my-project/).
    #[arg(long)]
    base: Option<String>,

    /// Force hash routing.
    #[arg(long)]
    hash: bool,
}

impl SourceArgs {
    /// Load the raw document with CLI overrides applied.
    pub(crate) fn load(&self) -> Result<RawSiteConfig, CliError> {
        let cli_settings = CliSettings {
            base: self.base.clone(),
            routing_mode: self.hash.then_some(RoutingMode::Hash),
        };
        Ok(locnav_config::load(
            self.config.as_deref(),
            Some(&cli_settings),
        )?)
    }
}
