//! `locnav resolve` command implementation.

use clap::{Args, ValueEnum};
use locnav_site::SiteConfig;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Output format of the resolve command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Resolved navigation model as JSON.
    #[default]
    Json,
    /// Canonical site document as TOML.
    Toml,
}

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,
}

impl ResolveArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let raw = self.source.load()?;
        let site = locnav_site::resolve(&raw)?;

        output.data(&render(&site, self.format)?)?;
        Ok(())
    }
}

/// Render the resolved site in the requested format.
fn render(site: &SiteConfig, format: Format) -> Result<String, CliError> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(site)?,
        Format::Toml => toml::to_string_pretty(&site.as_raw())?,
    })
}
