//! Site document resolution.
//!
//! Turns a [`RawSiteConfig`] into a validated [`SiteConfig`] in three steps:
//!
//! 1. **Normalize**: every path-bearing field is stripped to its
//!    locale-relative form (base first, then locale key).
//! 2. **Merge**: per-locale theme settings sit under their site locale. The
//!    site-level theme is the bottom layer of the default locale, and the resolved default locale is the template for every other
//!    locale. Sidebar sections overlay by section path, nav entries by target.
//! 3. **Validate and expand**: ownership and orphan checks run on the merged
//!    drafts, then every path is re-expanded under its locale prefix.
//!
//! Resolution is all-or-nothing: the first error aborts it.

use indexmap::IndexMap;
use locnav_config::{RawLocale, RawNavLink, RawSidebar, RawSiteConfig, RoutingMode};

use crate::error::ConfigError;
use crate::model::{LocaleConfig, NavLink, SidebarGroup, SiteConfig};
use crate::path::{self, PathContext, ROOT, is_external, is_within};

/// Language tag used when neither the locale nor the site sets one.
const DEFAULT_LANG: &str = "en-US";

/// Link target after normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Target {
    /// Locale-relative path.
    Internal(String),
    /// URL kept verbatim.
    External(String),
}

#[derive(Clone, Debug)]
struct DraftLink {
    text: String,
    target: Option<Target>,
    items: Vec<DraftLink>,
    field: String,
}

impl DraftLink {
    /// Two entries match when they lead to the same target; dropdowns without
    /// a target match by text.
    fn matches(&self, other: &Self) -> bool {
        match (&self.target, &other.target) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.text == other.text,
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
struct DraftGroup {
    title: String,
    collapsable: bool,
    /// Locale-relative page paths with their document field.
    children: Vec<(String, String)>,
}

#[derive(Clone, Debug)]
struct DraftSection {
    /// Section key as authored.
    raw: String,
    field: String,
    groups: Vec<DraftGroup>,
}

/// Sections keyed by locale-relative section path.
type DraftSidebar = IndexMap<String, DraftSection>;

#[derive(Clone, Debug, Default)]
struct DraftLocale {
    nav: Option<Vec<DraftLink>>,
    sidebar: DraftSidebar,
}

/// Resolve a raw site document into a validated navigation model.
///
/// The document is only read; the returned model shares nothing with it.
///
/// # Errors
///
/// - [`ConfigError::MalformedPath`] if a path-bearing field is empty,
///   unanchored, or of the wrong kind
/// - [`ConfigError::DuplicateLocaleKey`] if two locale keys normalize to the
///   same key
/// - [`ConfigError::AmbiguousDefaultLocale`] if no default locale exists
/// - [`ConfigError::DuplicateSectionPath`] if two sidebar keys of one locale
///   normalize to the same section
/// - [`ConfigError::OrphanSidebar`] if a sidebar section has no nav entry
///   leading into it
pub fn resolve(raw: &RawSiteConfig) -> Result<SiteConfig, ConfigError> {
    let base = path::normalize_base(raw.base.as_deref())
        .map_err(|reason| ConfigError::malformed("base", raw.base.as_deref().unwrap_or(""), reason))?;

    let keys = normalize_keys(raw, &base)?;
    let default_index = default_locale_index(&keys, raw.routing_mode)?;
    let default_key = keys[default_index].clone();
    let authored = layer_theme_locales(raw, &base, &keys)?;

    let paths = PathContext::new(&base, raw.routing_mode, &keys);
    let resolver = Resolver { paths: &paths };

    let theme = DraftLocale {
        nav: raw
            .theme
            .nav
            .as_deref()
            .map(|nav| resolver.draft_nav(nav, &default_key, "theme.nav"))
            .transpose()?,
        sidebar: resolver.draft_sidebar(&raw.theme.sidebar, &default_key, "theme.sidebar")?,
    };

    let mut drafts = Vec::with_capacity(keys.len());
    for ((raw_key, locale), key) in raw.locales.keys().zip(&authored).zip(&keys) {
        drafts.push(resolver.draft_locale(locale, key, &format!("locales.{raw_key}"))?);
    }

    let default_draft = overlay(&theme, &drafts[default_index]);
    let default_locale = resolver.finish(
        &default_key,
        &authored[default_index],
        &default_draft,
        &Fallback {
            lang: raw.lang.as_deref().unwrap_or(DEFAULT_LANG),
            title: raw.title.as_deref().unwrap_or_default(),
            description: raw.description.as_deref().unwrap_or_default(),
        },
    )?;

    let mut locales = Vec::with_capacity(keys.len());
    for (i, (key, draft)) in keys.iter().zip(&drafts).enumerate() {
        if i == default_index {
            locales.push(default_locale.clone());
            continue;
        }
        let merged = overlay(&default_draft, draft);
        let fallback = Fallback {
            lang: raw.lang.as_deref().unwrap_or(&default_locale.lang),
            title: &default_locale.title,
            description: &default_locale.description,
        };
        locales.push(resolver.finish(key, &authored[i], &merged, &fallback)?);
    }

    let title = raw.title.clone().unwrap_or_else(|| default_locale.title.clone());
    let description = raw
        .description
        .clone()
        .unwrap_or_else(|| default_locale.description.clone());

    tracing::info!(
        base = %base,
        routing_mode = %raw.routing_mode,
        locales = locales.len(),
        default_locale = %default_key,
        "Resolved site navigation"
    );

    Ok(SiteConfig::new(
        base,
        raw.routing_mode,
        title,
        description,
        locales,
        default_index,
    ))
}

/// Normalize locale keys in authoring order, rejecting duplicates.
fn normalize_keys(raw: &RawSiteConfig, base: &str) -> Result<Vec<String>, ConfigError> {
    let mut seen: IndexMap<String, &str> = IndexMap::with_capacity(raw.locales.len());
    for raw_key in raw.locales.keys() {
        let key = path::normalize_locale_key(raw_key, base).map_err(|reason| {
            ConfigError::malformed(format!("locales.{raw_key}"), raw_key, reason)
        })?;
        if let Some(first) = seen.get(&key) {
            return Err(ConfigError::DuplicateLocaleKey {
                key,
                first: (*first).to_owned(),
                second: raw_key.clone(),
            });
        }
        seen.insert(key, raw_key);
    }
    Ok(seen.into_keys().collect())
}

/// Site locales with their `theme.locales` entry layered underneath, in
/// authoring order.
fn layer_theme_locales(
    raw: &RawSiteConfig,
    base: &str,
    keys: &[String],
) -> Result<Vec<RawLocale>, ConfigError> {
    let mut locales: Vec<RawLocale> = raw.locales.values().cloned().collect();
    let mut seen: IndexMap<usize, &str> = IndexMap::with_capacity(raw.theme.locales.len());
    for (raw_key, theme_locale) in &raw.theme.locales {
        let field = format!("theme.locales.{raw_key}");
        let key = path::normalize_locale_key(raw_key, base)
            .map_err(|reason| ConfigError::malformed(&field, raw_key, reason))?;
        let Some(i) = keys.iter().position(|k| *k == key) else {
            return Err(ConfigError::malformed(
                field,
                raw_key,
                "theme locale has no matching site locale",
            ));
        };
        if let Some(first) = seen.insert(i, raw_key) {
            return Err(ConfigError::DuplicateLocaleKey {
                key,
                first: first.to_owned(),
                second: raw_key.clone(),
            });
        }
        locales[i] = locales[i].layered_over(theme_locale);
    }
    Ok(locales)
}

/// The `/` locale, or the first locale in hash routing.
fn default_locale_index(keys: &[String], mode: RoutingMode) -> Result<usize, ConfigError> {
    if let Some(i) = keys.iter().position(|k| k == ROOT) {
        return Ok(i);
    }
    if mode == RoutingMode::Hash && !keys.is_empty() {
        return Ok(0);
    }
    Err(ConfigError::AmbiguousDefaultLocale { routing_mode: mode })
}

/// Lay `top` over `template`: nav entries by target, sidebar sections by key.
///
/// Entries already in the template keep their position; new entries are
/// appended in authoring order.
fn overlay(template: &DraftLocale, top: &DraftLocale) -> DraftLocale {
    let mut sidebar = template.sidebar.clone();
    for (section, draft) in &top.sidebar {
        sidebar.insert(section.clone(), draft.clone());
    }
    let nav = match (&template.nav, &top.nav) {
        (Some(template), Some(top)) => Some(overlay_nav(template, top)),
        (template, top) => top.clone().or_else(|| template.clone()),
    };
    DraftLocale { nav, sidebar }
}

fn overlay_nav(template: &[DraftLink], top: &[DraftLink]) -> Vec<DraftLink> {
    let mut nav: Vec<DraftLink> = template
        .iter()
        .map(|link| top.iter().find(|own| own.matches(link)).unwrap_or(link).clone())
        .collect();
    nav.extend(
        top.iter()
            .filter(|own| !template.iter().any(|link| link.matches(own)))
            .cloned(),
    );
    nav
}

/// Text values inherited by a locale that does not set its own.
struct Fallback<'a> {
    lang: &'a str,
    title: &'a str,
    description: &'a str,
}

struct Resolver<'r, 'a> {
    paths: &'r PathContext<'a>,
}

impl Resolver<'_, '_> {
    fn draft_locale(
        &self,
        locale: &RawLocale,
        key: &str,
        field: &str,
    ) -> Result<DraftLocale, ConfigError> {
        Ok(DraftLocale {
            nav: locale
                .nav
                .as_deref()
                .map(|nav| self.draft_nav(nav, key, &format!("{field}.nav")))
                .transpose()?,
            sidebar: self.draft_sidebar(&locale.sidebar, key, &format!("{field}.sidebar"))?,
        })
    }

    /// Strip an internal path, mapping failures to `MalformedPath`.
    fn relative(&self, raw: &str, owner: &str, field: &str) -> Result<String, ConfigError> {
        let stripped = self
            .paths
            .strip(raw, owner)
            .map_err(|reason| ConfigError::malformed(field, raw, reason))?;
        if let Some(key) = stripped.key
            && key != owner
        {
            tracing::warn!(
                field,
                path = raw,
                from = key,
                to = owner,
                "Path points into another locale; re-homed"
            );
        }
        Ok(stripped.relative)
    }

    fn draft_nav(
        &self,
        links: &[RawNavLink],
        owner: &str,
        field: &str,
    ) -> Result<Vec<DraftLink>, ConfigError> {
        links
            .iter()
            .enumerate()
            .map(|(i, link)| {
                let field = format!("{field}[{i}]");
                let link_field = format!("{field}.link");
                let target = match link.link.as_deref() {
                    Some(url) if is_external(url) => Some(Target::External(url.to_owned())),
                    Some(path) => Some(Target::Internal(self.relative(path, owner, &link_field)?)),
                    None => None,
                };
                let items = self.draft_nav(&link.items, owner, &format!("{field}.items"))?;
                if target.is_none() && items.is_empty() {
                    return Err(ConfigError::malformed(
                        link_field,
                        "",
                        "nav entry needs a link or dropdown items",
                    ));
                }
                Ok(DraftLink {
                    text: link.text.clone(),
                    target,
                    items,
                    field: link_field,
                })
            })
            .collect()
    }

    fn draft_sidebar(
        &self,
        sidebar: &RawSidebar,
        owner: &str,
        field: &str,
    ) -> Result<DraftSidebar, ConfigError> {
        let mut sections = DraftSidebar::with_capacity(sidebar.len());
        for (raw_section, groups) in sidebar {
            let section_field = format!("{field}.{raw_section}");
            let section = self.relative(raw_section, owner, &section_field)?;

            if let Some(existing) = sections.get(&section) {
                return Err(ConfigError::DuplicateSectionPath {
                    locale: owner.to_owned(),
                    section,
                    first: existing.raw.clone(),
                    second: raw_section.clone(),
                });
            }

            let mut draft_groups = Vec::with_capacity(groups.len());
            for (g, group) in groups.iter().enumerate() {
                let mut children = Vec::with_capacity(group.children.len());
                for (c, child) in group.children.iter().enumerate() {
                    let child_field = format!("{section_field}[{g}].children[{c}]");
                    let page = if child.starts_with('/') || child.starts_with("#/") {
                        self.relative(child, owner, &child_field)?
                    } else {
                        path::join_slug(&section, child)
                            .map_err(|reason| ConfigError::malformed(&child_field, child, reason))?
                    };
                    children.push((page, child_field));
                }
                draft_groups.push(DraftGroup {
                    title: group.title.clone(),
                    collapsable: group.collapsable,
                    children,
                });
            }

            sections.insert(
                section,
                DraftSection {
                    raw: raw_section.clone(),
                    field: section_field,
                    groups: draft_groups,
                },
            );
        }
        Ok(sections)
    }

    /// Validate a merged locale and expand it into its resolved form.
    fn finish(
        &self,
        key: &str,
        raw: &RawLocale,
        draft: &DraftLocale,
        fallback: &Fallback<'_>,
    ) -> Result<LocaleConfig, ConfigError> {
        let nav = draft.nav.as_deref().unwrap_or_default();

        let mut internal = Vec::new();
        collect_internal(nav, &mut internal);
        for (relative, field) in &internal {
            self.check_owner(key, relative, field)?;
        }

        for (section, entry) in &draft.sidebar {
            self.check_owner(key, section, &entry.field)?;
            for group in &entry.groups {
                for (page, field) in &group.children {
                    self.check_owner(key, page, field)?;
                }
            }
            if !internal.iter().any(|(link, _)| is_within(link, section)) {
                return Err(ConfigError::OrphanSidebar {
                    locale: key.to_owned(),
                    section: self.paths.expand(key, section),
                });
            }
        }

        let nav = self.expand_nav(key, nav);
        let sidebar: IndexMap<_, _> = draft
            .sidebar
            .iter()
            .map(|(section, entry)| {
                let groups = entry
                    .groups
                    .iter()
                    .map(|group| SidebarGroup {
                        title: group.title.clone(),
                        collapsable: group.collapsable,
                        children: group
                            .children
                            .iter()
                            .map(|(page, _)| self.paths.expand(key, page))
                            .collect(),
                    })
                    .collect();
                (self.paths.expand(key, section), groups)
            })
            .collect();

        tracing::debug!(
            locale = key,
            nav = nav.len(),
            sections = sidebar.len(),
            "Resolved locale"
        );

        Ok(LocaleConfig {
            key: key.to_owned(),
            prefix: self.paths.expand(key, ""),
            lang: raw.lang.as_deref().unwrap_or(fallback.lang).to_owned(),
            title: raw.title.as_deref().unwrap_or(fallback.title).to_owned(),
            description: raw
                .description
                .as_deref()
                .unwrap_or(fallback.description)
                .to_owned(),
            label: raw.label.clone(),
            select_text: raw.select_text.clone(),
            aria_label: raw.aria_label.clone(),
            edit_link_text: raw.edit_link_text.clone(),
            last_updated: raw.last_updated.clone(),
            nav,
            sidebar,
        })
    }

    /// Reject paths whose expanded form belongs to another locale.
    fn check_owner(&self, key: &str, relative: &str, field: &str) -> Result<(), ConfigError> {
        let local = format!("{key}{relative}");
        match self.paths.owner_of(&local) {
            Some(owner) if owner == key => Ok(()),
            Some(owner) => Err(ConfigError::malformed(
                field,
                &self.paths.expand(key, relative),
                &format!("resolves into locale {owner} instead of {key}"),
            )),
            None => Err(ConfigError::malformed(
                field,
                &self.paths.expand(key, relative),
                "path is not owned by any locale",
            )),
        }
    }

    fn expand_nav(&self, key: &str, links: &[DraftLink]) -> Vec<NavLink> {
        links
            .iter()
            .map(|link| NavLink {
                text: link.text.clone(),
                link: link.target.as_ref().map(|target| match target {
                    Target::Internal(relative) => self.paths.expand(key, relative),
                    Target::External(url) => url.clone(),
                }),
                items: self.expand_nav(key, &link.items),
            })
            .collect()
    }
}

/// Gather internal nav targets depth-first with their fields.
fn collect_internal(links: &[DraftLink], out: &mut Vec<(String, String)>) {
    for link in links {
        if let Some(Target::Internal(relative)) = &link.target {
            out.push((relative.clone(), link.field.clone()));
        }
        collect_internal(&link.items, out);
    }
}
