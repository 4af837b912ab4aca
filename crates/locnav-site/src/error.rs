//! Resolution error types.

use locnav_config::RoutingMode;

/// Semantic error categories for resolution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigErrorKind {
    /// Two locales normalize to the same key.
    DuplicateLocaleKey,
    /// No locale can act as the default.
    AmbiguousDefaultLocale,
    /// A sidebar section has no nav entry leading into it.
    OrphanSidebar,
    /// A path-bearing field is empty, unanchored, or of the wrong kind.
    MalformedPath,
    /// Two sidebar keys of one locale normalize to the same section.
    DuplicateSectionPath,
}

/// Error returned when a site document cannot be resolved.
///
/// Every variant names the offending key or field so the author can fix the
/// source document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Duplicate locale key {key}: {first:?} and {second:?} both normalize to it")]
    DuplicateLocaleKey {
        /// Normalized key.
        key: String,
        /// First raw key as authored.
        first: String,
        /// Second raw key as authored.
        second: String,
    },

    #[error("No default locale: expected a \"/\" locale ({routing_mode} routing)")]
    AmbiguousDefaultLocale { routing_mode: RoutingMode },

    #[error("Orphan sidebar {section} in locale {locale}: no nav entry leads into it")]
    OrphanSidebar {
        /// Locale key.
        locale: String,
        /// Resolved section path.
        section: String,
    },

    #[error("Malformed path {path:?} in {field}: {reason}")]
    MalformedPath {
        /// Document field (e.g., "`locales./zh/.nav[1].link`").
        field: String,
        /// Path as authored.
        path: String,
        reason: String,
    },

    #[error("Duplicate sidebar section {section} in locale {locale}: {first:?} and {second:?}")]
    DuplicateSectionPath {
        locale: String,
        /// Normalized, locale-relative section path.
        section: String,
        first: String,
        second: String,
    },
}

impl ConfigError {
    /// Semantic category of this error.
    #[must_use]
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::DuplicateLocaleKey { .. } => ConfigErrorKind::DuplicateLocaleKey,
            Self::AmbiguousDefaultLocale { .. } => ConfigErrorKind::AmbiguousDefaultLocale,
            Self::OrphanSidebar { .. } => ConfigErrorKind::OrphanSidebar,
            Self::MalformedPath { .. } => ConfigErrorKind::MalformedPath,
            Self::DuplicateSectionPath { .. } => ConfigErrorKind::DuplicateSectionPath,
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, path: &str, reason: &str) -> Self {
        Self::MalformedPath {
            field: field.into(),
            path: path.to_owned(),
            reason: reason.to_owned(),
        }
    }
}
