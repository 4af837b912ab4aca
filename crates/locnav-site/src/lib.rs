//! Locale-aware navigation and sidebar resolution for locnav.
//!
//! This crate provides:
//! - [`resolve`]: turns a [`RawSiteConfig`] into a validated [`SiteConfig`]
//! - [`SiteConfig`]: the immutable navigation model handed to a renderer
//!
//! Authors may write any path-bearing field bare (`/guide/`), base-prefixed
//! (`/proj/en/guide/`) or hash-prefixed (`#/en/guide/`). All forms converge to
//! one canonical absolute path per page: `base + locale key + page`.
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use locnav_config::{DocumentFormat, parse};
//!
//! let raw = parse(
//!     r#"
//! base = "/proj/"
//!
//! [locales."/"]
//! nav = [{ text = "Guide", link = "/guide/" }]
//!
//! [locales."/zh/"]
//! lang = "zh-CN"
//! "#,
//!     DocumentFormat::Toml,
//! )?;
//!
//! let site = locnav_site::resolve(&raw)?;
//! let zh = site.locale("/zh/").unwrap();
//! assert_eq!(zh.nav[0].link.as_deref(), Some("/proj/zh/guide/"));
//! # Ok(())
//! # }
//! ```

mod error;
mod model;
mod path;
mod resolve;

pub use error::{ConfigError, ConfigErrorKind};
pub use model::{LocaleConfig, NavLink, SidebarGroup, SiteConfig};
pub use resolve::resolve;

// Re-export the raw document types for convenience
pub use locnav_config::{RawSiteConfig, RoutingMode};
