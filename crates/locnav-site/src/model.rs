//! Resolved navigation model.
//!
//! A [`SiteConfig`] is only produced by [`resolve`](crate::resolve) and is
//! immutable afterwards. Every path it holds is absolute and ready for direct
//! use: `base + locale key + page`, with a `#` separator after the base in
//! hash routing. External links are kept verbatim.

use indexmap::IndexMap;
use locnav_config::{
    RawLocale, RawNavLink, RawSidebarGroup, RawSiteConfig, RawTheme, RoutingMode,
};
use serde::Serialize;

use crate::path::{PathContext, is_external, is_within};

/// Resolved site navigation model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    base_path: String,
    routing_mode: RoutingMode,
    title: String,
    description: String,
    /// Key of the default locale.
    default_locale: String,
    locales: Vec<LocaleConfig>,
    #[serde(skip)]
    default_index: usize,
    #[serde(skip)]
    keys: Vec<String>,
}

/// One resolved language variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleConfig {
    /// Locale key relative to the base path (e.g., "/zh/").
    pub key: String,
    /// Absolute prefix of every path in this locale (e.g., "/proj/#/zh/").
    pub prefix: String,
    /// IETF language tag.
    pub lang: String,
    pub title: String,
    pub description: String,
    /// Name shown in the language switcher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Top navigation bar.
    pub nav: Vec<NavLink>,
    /// Sidebars keyed by absolute section path, in display order.
    pub sidebar: IndexMap<String, Vec<SidebarGroup>>,
}

/// Navigation bar entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Display text.
    pub text: String,
    /// Absolute path or external URL. `None` for pure dropdowns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Dropdown entries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NavLink>,
}

impl NavLink {
    /// True if the entry links outside the site.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.link.as_deref().is_some_and(is_external)
    }

    /// This entry followed by all nested dropdown entries, depth-first.
    pub fn flatten(&self) -> Box<dyn Iterator<Item = &NavLink> + '_> {
        Box::new(std::iter::once(self).chain(self.items.iter().flat_map(NavLink::flatten)))
    }
}

/// Titled group of pages in a sidebar section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    pub title: String,
    pub collapsable: bool,
    /// Absolute page paths. The section index is the section path itself.
    pub children: Vec<String>,
}

impl SiteConfig {
    pub(crate) fn new(
        base_path: String,
        routing_mode: RoutingMode,
        title: String,
        description: String,
        locales: Vec<LocaleConfig>,
        default_index: usize,
    ) -> Self {
        let keys = locales.iter().map(|l| l.key.clone()).collect();
        let default_locale = locales[default_index].key.clone();
        Self {
            base_path,
            routing_mode,
            title,
            description,
            default_locale,
            locales,
            default_index,
            keys,
        }
    }

    /// Canonical base path, always starting and ending with `/`.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    #[must_use]
    pub fn routing_mode(&self) -> RoutingMode {
        self.routing_mode
    }

    /// Site-wide title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Site-wide description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Locales in authoring order.
    #[must_use]
    pub fn locales(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// Get a locale by its normalized key (e.g., "/zh/").
    #[must_use]
    pub fn locale(&self, key: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|l| l.key == key)
    }

    /// The default locale.
    #[must_use]
    pub fn default_locale(&self) -> &LocaleConfig {
        &self.locales[self.default_index]
    }

    fn paths(&self) -> PathContext<'_> {
        PathContext::new(&self.base_path, self.routing_mode, &self.keys)
    }

    /// Find the locale owning an absolute resolved path.
    ///
    /// Returns `None` if the path is not under the base path or is external.
    #[must_use]
    pub fn locale_for_path(&self, path: &str) -> Option<&LocaleConfig> {
        if is_external(path) {
            return None;
        }
        let paths = self.paths();
        let local = paths.local_of(path)?;
        let key = paths.owner_of(local)?;
        self.locale(key)
    }

    /// Find the sidebar for an absolute page path.
    ///
    /// Picks the longest section path of the owning locale that contains the
    /// page. Returns the section path and its groups.
    #[must_use]
    pub fn sidebar_for(&self, path: &str) -> Option<(&str, &[SidebarGroup])> {
        let locale = self.locale_for_path(path)?;
        let page = path.strip_prefix(&locale.prefix).unwrap_or_default();
        let page = if path == locale.prefix.trim_end_matches('/') {
            ""
        } else {
            page
        };

        locale
            .sidebar
            .iter()
            .filter_map(|(section, groups)| {
                let relative = section.strip_prefix(&locale.prefix)?;
                is_within(page, relative).then_some((section, relative.len(), groups))
            })
            .max_by_key(|(_, len, _)| *len)
            .map(|(section, _, groups)| (section.as_str(), groups.as_slice()))
    }

    /// Canonical raw form of this model.
    ///
    /// Every locale spells out its nav and sidebar with absolute paths, so
    /// resolving the result reproduces this model exactly.
    #[must_use]
    pub fn as_raw(&self) -> RawSiteConfig {
        RawSiteConfig {
            base: Some(self.base_path.clone()),
            routing_mode: self.routing_mode,
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            lang: None,
            theme: RawTheme::default(),
            locales: self
                .locales
                .iter()
                .map(|l| (l.key.clone(), l.as_raw()))
                .collect(),
        }
    }
}

impl LocaleConfig {
    fn as_raw(&self) -> RawLocale {
        RawLocale {
            lang: Some(self.lang.clone()),
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            label: self.label.clone(),
            select_text: self.select_text.clone(),
            aria_label: self.aria_label.clone(),
            edit_link_text: self.edit_link_text.clone(),
            last_updated: self.last_updated.clone(),
            nav: Some(self.nav.iter().map(NavLink::as_raw).collect()),
            sidebar: self
                .sidebar
                .iter()
                .map(|(section, groups)| {
                    let groups = groups
                        .iter()
                        .map(|g| RawSidebarGroup {
                            title: g.title.clone(),
                            collapsable: g.collapsable,
                            children: g.children.clone(),
                        })
                        .collect();
                    (section.clone(), groups)
                })
                .collect(),
        }
    }
}

impl NavLink {
    fn as_raw(&self) -> RawNavLink {
        RawNavLink {
            text: self.text.clone(),
            link: self.link.clone(),
            items: self.items.iter().map(NavLink::as_raw).collect(),
        }
    }
}
