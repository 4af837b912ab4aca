//! Raw site document schema.
//!
//! These types mirror the document exactly as an author writes it. Nothing
//! here is normalized: base paths, locale keys, nav links and sidebar keys may
//! be bare, base-prefixed or hash-prefixed. Resolution into a canonical model
//! happens in `locnav-site`.
//!
//! Field names are `snake_case` in TOML; the camelCase spellings used by
//! JavaScript site generators (`basePath`, `routerMode`, `selectText`, ...)
//! are accepted as aliases so existing JSON configs load unchanged.
//!
//! # Example
//!
//! ```toml
//! base = "/tank-websocket-go-server/"
//! routing_mode = "hash"
//!
//! [locales."/"]
//! lang = "en-US"
//! title = "Tank WebSocket"
//! nav = [{ text = "Guide", link = "/guide/" }]
//!
//! [[locales."/".sidebar."/guide/"]]
//! title = "Guide"
//! collapsable = false
//! children = ["", "installation"]
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from section path to its sidebar groups.
pub type RawSidebar = IndexMap<String, Vec<RawSidebarGroup>>;

/// How the renderer interprets resolved paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Paths are literal URL paths (`/base/zh/guide/`).
    #[default]
    Path,
    /// Paths are same-document hash fragments (`/base/#/zh/guide/`).
    Hash,
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => f.write_str("path"),
            Self::Hash => f.write_str("hash"),
        }
    }
}

/// Site document as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSiteConfig {
    /// URL prefix the site is served under. `None` means `/`.
    #[serde(alias = "basePath", skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Routing mode.
    #[serde(alias = "routingMode", alias = "routerMode")]
    pub routing_mode: RoutingMode,
    /// Site-wide title, used when a locale sets none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Site-wide description, used when a locale sets none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Site-wide language tag, used when a locale sets none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Site-level nav and sidebar underneath the default locale.
    #[serde(alias = "themeConfig", skip_serializing_if = "RawTheme::is_empty")]
    pub theme: RawTheme,
    /// Locales in authoring order.
    pub locales: IndexMap<String, RawLocale>,
}

/// Site-level navigation shared by every locale through the default locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTheme {
    /// Top navigation bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav: Option<Vec<RawNavLink>>,
    /// Sidebars keyed by section path.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub sidebar: RawSidebar,
    /// Per-locale theme settings, layered under the site locale with the
    /// same key.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub locales: IndexMap<String, RawLocale>,
}

impl RawTheme {
    /// True when nothing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nav.is_none() && self.sidebar.is_empty() && self.locales.is_empty()
    }
}

/// One language variant of the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLocale {
    /// IETF language tag (e.g., `en-US`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name shown in the language switcher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Language switcher caption.
    #[serde(alias = "selectText", skip_serializing_if = "Option::is_none")]
    pub select_text: Option<String>,
    #[serde(alias = "ariaLabel", skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(alias = "editLinkText", skip_serializing_if = "Option::is_none")]
    pub edit_link_text: Option<String>,
    #[serde(alias = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Top navigation bar. Entries overlay the default locale's nav by target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav: Option<Vec<RawNavLink>>,
    /// Sidebars keyed by section path. Missing sections are inherited.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub sidebar: RawSidebar,
}

impl RawLocale {
    /// Fill every field this locale leaves unset from `under`.
    ///
    /// A set `nav` replaces the one underneath; sidebar sections overlay by key.
    #[must_use]
    pub fn layered_over(&self, under: &RawLocale) -> RawLocale {
        fn pick(own: Option<&String>, under: Option<&String>) -> Option<String> {
            own.or(under).cloned()
        }

        let mut sidebar = under.sidebar.clone();
        for (section, groups) in &self.sidebar {
            sidebar.insert(section.clone(), groups.clone());
        }

        RawLocale {
            lang: pick(self.lang.as_ref(), under.lang.as_ref()),
            title: pick(self.title.as_ref(), under.title.as_ref()),
            description: pick(self.description.as_ref(), under.description.as_ref()),
            label: pick(self.label.as_ref(), under.label.as_ref()),
            select_text: pick(self.select_text.as_ref(), under.select_text.as_ref()),
            aria_label: pick(self.aria_label.as_ref(), under.aria_label.as_ref()),
            edit_link_text: pick(self.edit_link_text.as_ref(), under.edit_link_text.as_ref()),
            last_updated: pick(self.last_updated.as_ref(), under.last_updated.as_ref()),
            nav: self.nav.as_ref().or(under.nav.as_ref()).cloned(),
            sidebar,
        }
    }
}

/// Navigation bar entry, optionally a dropdown of further entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNavLink {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Dropdown entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<RawNavLink>,
}

impl RawNavLink {
    /// Create a plain link entry.
    #[must_use]
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(link.into()),
            items: Vec::new(),
        }
    }

    /// Create a dropdown entry without a link of its own.
    #[must_use]
    pub fn dropdown(text: impl Into<String>, items: Vec<RawNavLink>) -> Self {
        Self {
            text: text.into(),
            link: None,
            items,
        }
    }
}

/// Titled group of pages inside a sidebar section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSidebarGroup {
    pub title: String,
    #[serde(default = "default_collapsable", alias = "collapsible")]
    pub collapsable: bool,
    /// Page slugs relative to the section path (`""` is the section index),
    /// or absolute paths.
    #[serde(default)]
    pub children: Vec<String>,
}

impl RawSidebarGroup {
    /// Create a collapsable group.
    #[must_use]
    pub fn new<I, S>(title: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            collapsable: true,
            children: children.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_collapsable() -> bool {
    true
}
