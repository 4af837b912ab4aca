//! Terminal output for locnav commands.
//!
//! Reports go to stderr; [`Output::data`] writes result documents to stdout
//! so they can be piped.

use std::fmt::Display;
use std::io;

use console::{Style, Term};
use locnav_site::{LocaleConfig, SiteConfig};

/// Writer for command reports and result documents.
pub(crate) struct Output {
    report: Term,
    data: Term,
    heading_style: Style,
    notice_style: Style,
    done_style: Style,
    error_style: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            report: Term::stderr(),
            data: Term::stdout(),
            heading_style: Style::new().cyan().bold(),
            notice_style: Style::new().yellow(),
            done_style: Style::new().green(),
            error_style: Style::new().red(),
        }
    }

    /// Site heading: title, routing mode and base path.
    pub(crate) fn site(&self, site: &SiteConfig) {
        self.styled(&self.heading_style, &site_heading(site));
    }

    /// One summary line per locale, flagging locales without nav entries.
    pub(crate) fn locales(&self, site: &SiteConfig) {
        let default_key = &site.default_locale().key;
        for locale in site.locales() {
            let _ = self
                .report
                .write_line(&locale_line(locale, &locale.key == default_key));
            if locale.nav.is_empty() {
                self.styled(
                    &self.notice_style,
                    &format!("  locale {} has an empty nav bar", locale.key),
                );
            }
        }
    }

    pub(crate) fn resolved(&self, site: &SiteConfig) {
        self.styled(
            &self.done_style,
            &format!("Navigation resolved: {} locale(s)", site.locales().len()),
        );
    }

    pub(crate) fn failure(&self, err: &impl Display) {
        self.styled(&self.error_style, &format!("Error: {err}"));
    }

    /// Write a result document to stdout.
    pub(crate) fn data(&self, text: &str) -> io::Result<()> {
        self.data.write_line(text.trim_end())
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.report.write_line(&style.apply_to(msg).to_string());
    }
}

fn site_heading(site: &SiteConfig) -> String {
    let title = if site.title().is_empty() {
        "Untitled site"
    } else {
        site.title()
    };
    format!(
        "{title} ({} routing, base {})",
        site.routing_mode(),
        site.base_path()
    )
}

/// Prefix, language and entry counts of one locale.
fn locale_line(locale: &LocaleConfig, is_default: bool) -> String {
    let pages: usize = locale
        .sidebar
        .values()
        .flatten()
        .map(|group| group.children.len())
        .sum();
    format!(
        "  {}{} [{}]: {} nav, {} section(s), {} page(s)",
        locale.prefix,
        if is_default { " (default)" } else { "" },
        locale.lang,
        locale.nav.len(),
        locale.sidebar.len(),
        pages
    )
}
