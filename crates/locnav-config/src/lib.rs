//! Site document loading for locnav.
//!
//! Parses `locnav.toml` (or a JSON/YAML equivalent) into a [`RawSiteConfig`]
//! and provides auto-discovery of the document in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! Loading never interprets paths. Base paths, locale keys and links are kept
//! exactly as authored; `locnav-site` owns normalization and validation.
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `base`
//! - `title`, `description`, `lang`
//! - `locales.<key>.title`, `locales.<key>.description`

mod document;
mod expand;

use std::path::{Path, PathBuf};

pub use document::{
    RawLocale, RawNavLink, RawSidebar, RawSidebarGroup, RawSiteConfig, RawTheme, RoutingMode,
};

/// CLI settings that override document values.
///
/// All fields are optional. Only non-None values override the loaded document.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override base path.
    pub base: Option<String>,
    /// Override routing mode.
    pub routing_mode: Option<RoutingMode>,
}

/// Document filename to search for.
pub const CONFIG_FILENAME: &str = "locnav.toml";

/// Serialization format of a site document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension. Files without an extension are TOML.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Validation` for unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        match path.extension().and_then(|e| e.to_str()) {
            None | Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some(other) => Err(LoadError::Validation(format!(
                "unsupported document extension .{other} (expected .toml, .json, .yaml or .yml)"
            ))),
        }
    }
}

/// Document loading error.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File not found.
    #[error("Site document not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Validation error.
    #[error("Site document error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Document field path (e.g., "`locales./zh/.title`").
        field: String,
        /// Error message (e.g., "${`SITE_TITLE`} not set").
        message: String,
    },
}

/// Parse a site document from a string.
///
/// # Errors
///
/// Returns the parse error of the given format.
pub fn parse(content: &str, format: DocumentFormat) -> Result<RawSiteConfig, LoadError> {
    let doc = match format {
        DocumentFormat::Toml => toml::from_str(content)?,
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(doc)
}

/// Load the site document with optional CLI settings.
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, searches for `locnav.toml` in current directory and parents.
///
/// CLI settings are applied after loading and environment expansion, allowing
/// CLI arguments to take precedence over document values.
///
/// # Errors
///
/// Returns error if no document can be found, or reading, parsing or
/// expansion fails.
pub fn load(
    config_path: Option<&Path>,
    cli_settings: Option<&CliSettings>,
) -> Result<RawSiteConfig, LoadError> {
    let path = if let Some(path) = config_path {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir()?;
        discover_from(&cwd).ok_or_else(|| LoadError::NotFound(cwd.join(CONFIG_FILENAME)))?
    };

    let mut doc = load_from_file(&path)?;

    if let Some(settings) = cli_settings {
        apply_cli_settings(&mut doc, settings);
    }

    Ok(doc)
}

/// Search for the document file in `start` and its parents.
#[must_use]
pub fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load the document from a specific file.
fn load_from_file(path: &Path) -> Result<RawSiteConfig, LoadError> {
    let format = DocumentFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let mut doc = parse(&content, format)?;
    expand_env_vars(&mut doc)?;
    Ok(doc)
}

/// Apply CLI settings to the document.
fn apply_cli_settings(doc: &mut RawSiteConfig, settings: &CliSettings) {
    if let Some(base) = &settings.base {
        doc.base = Some(base.clone());
    }
    if let Some(mode) = settings.routing_mode {
        doc.routing_mode = mode;
    }
}

/// Expand environment variable references in document strings.
fn expand_env_vars(doc: &mut RawSiteConfig) -> Result<(), LoadError> {
    expand_opt(&mut doc.base, "base")?;
    expand_opt(&mut doc.title, "title")?;
    expand_opt(&mut doc.description, "description")?;
    expand_opt(&mut doc.lang, "lang")?;

    for (key, locale) in &mut doc.locales {
        expand_opt(&mut locale.title, &format!("locales.{key}.title"))?;
        expand_opt(&mut locale.description, &format!("locales.{key}.description"))?;
    }
    for (key, locale) in &mut doc.theme.locales {
        expand_opt(&mut locale.title, &format!("theme.locales.{key}.title"))?;
        expand_opt(
            &mut locale.description,
            &format!("theme.locales.{key}.description"),
        )?;
    }

    Ok(())
}

fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), LoadError> {
    if let Some(v) = value {
        *v = expand::expand_env(v, field)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    const SITE_TOML: &str = r#"
base = "/tank-websocket-go-server/"
routing_mode = "hash"
title = "Tank WebSocket"

[locales."/"]
lang = "en-US"
nav = [{ text = "Guide", link = "/guide/" }]

[locales."/zh/"]
lang = "zh-CN"
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("locnav.toml")).unwrap(),
            DocumentFormat::Toml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("site.json")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("site.yml")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("site")).unwrap(),
            DocumentFormat::Toml
        );
    }

    #[test]
    fn test_format_unknown_extension() {
        let err = DocumentFormat::from_path(Path::new("config.js")).unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
        assert!(err.to_string().contains(".js"));
    }

    #[test]
    fn test_parse_toml() {
        let doc = parse(SITE_TOML, DocumentFormat::Toml).unwrap();
        assert_eq!(doc.base.as_deref(), Some("/tank-websocket-go-server/"));
        assert_eq!(doc.routing_mode, RoutingMode::Hash);
        assert_eq!(doc.locales.len(), 2);
        assert_eq!(
            doc.locales["/"].nav,
            Some(vec![RawNavLink::new("Guide", "/guide/")])
        );
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
base: /proj/
locales:
  /:
    lang: en-US
    sidebar:
      /guide/:
        - title: Guide
          collapsable: false
          children: ["", installation]
"#;
        let doc = parse(yaml, DocumentFormat::Yaml).unwrap();
        let groups = &doc.locales["/"].sidebar["/guide/"];
        assert_eq!(groups[0].title, "Guide");
        assert!(!groups[0].collapsable);
        assert_eq!(groups[0].children, vec!["", "installation"]);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = parse("base = ", DocumentFormat::Toml).unwrap_err();
        assert!(matches!(err, LoadError::Toml(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(&path, SITE_TOML).unwrap();

        let doc = load(Some(&path), None).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Tank WebSocket"));
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = load(Some(&path), None).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        fs::write(
            &path,
            r#"{ "base": "/proj/", "locales": { "/": { "lang": "en-US" } } }"#,
        )
        .unwrap();

        let doc = load(Some(&path), None).unwrap();
        assert_eq!(doc.base.as_deref(), Some("/proj/"));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locnav.toml");
        fs::write(&path, SITE_TOML).unwrap();

        let settings = CliSettings {
            base: Some("/preview/".to_owned()),
            routing_mode: Some(RoutingMode::Path),
        };
        let doc = load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(doc.base.as_deref(), Some("/preview/"));
        assert_eq!(doc.routing_mode, RoutingMode::Path);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut doc = parse(SITE_TOML, DocumentFormat::Toml).unwrap();
        let before = doc.clone();
        apply_cli_settings(&mut doc, &CliSettings::default());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs/guide");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), SITE_TOML).unwrap();

        let found = discover_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_discover_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), SITE_TOML).unwrap();
        fs::write(nested.join(CONFIG_FILENAME), SITE_TOML).unwrap();

        assert_eq!(discover_from(&nested).unwrap(), nested.join(CONFIG_FILENAME));
    }

    #[test]
    fn test_expand_env_vars_locale_fields() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("LOCNAV_TEST_ZH_TITLE", "坦克");
        }

        let toml = r#"
base = "${LOCNAV_TEST_BASE_UNSET:-/docs/}"

[locales."/zh/"]
title = "${LOCNAV_TEST_ZH_TITLE}"
"#;
        let mut doc = parse(toml, DocumentFormat::Toml).unwrap();
        expand_env_vars(&mut doc).unwrap();

        assert_eq!(doc.base.as_deref(), Some("/docs/"));
        assert_eq!(doc.locales["/zh/"].title.as_deref(), Some("坦克"));

        unsafe {
            std::env::remove_var("LOCNAV_TEST_ZH_TITLE");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("LOCNAV_TEST_MISSING_DESC");
        }

        let toml = r#"
[locales."/en/"]
description = "${LOCNAV_TEST_MISSING_DESC}"
"#;
        let mut doc = parse(toml, DocumentFormat::Toml).unwrap();
        let err = expand_env_vars(&mut doc).unwrap_err();

        assert!(matches!(err, LoadError::EnvVar { .. }));
        assert!(err.to_string().contains("LOCNAV_TEST_MISSING_DESC"));
        assert!(err.to_string().contains("locales./en/.description"));
    }
}
