//! Path normalization and expansion.
//!
//! Every path-bearing field passes through two forms:
//!
//! - **Relative**: locale-relative, no leading slash (`"guide/"`, `""` for the
//!   locale root). This is the form the merge pass works on.
//! - **Absolute**: `base + locale key + relative`, with a `#` separator after
//!   the base in hash routing (`/proj/zh/guide/` or `/proj/#/zh/guide/`).
//!
//! Stripping always removes the base path first and the locale key second.
//! Locale keys are relative to the base, so the base must be consumed before
//! a key can be recognized.

use locnav_config::RoutingMode;

/// Root path, used both as the empty base and as the default locale key.
pub(crate) const ROOT: &str = "/";

/// True for `http://` and `https://` URLs.
pub(crate) fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Validate a base path and bring it into canonical form.
///
/// `None`, `""` and `"/"` all mean the site is served from the root.
pub(crate) fn normalize_base(raw: Option<&str>) -> Result<String, &'static str> {
    let base = raw.unwrap_or(ROOT);
    if base.is_empty() || base == ROOT {
        return Ok(ROOT.to_owned());
    }
    if is_external(base) {
        return Err("base must be a path, not a URL");
    }
    if !base.starts_with('/') || !base.ends_with('/') {
        return Err("base must start and end with /");
    }
    check_segments(base)?;
    if base.contains('#') {
        return Err("base cannot contain #");
    }
    Ok(base.to_owned())
}

/// Validate a locale key and strip a base prefix or hash marker from it.
///
/// A key equal to the base is kept as written; only keys that extend the base
/// are treated as base-prefixed.
pub(crate) fn normalize_locale_key(raw: &str, base: &str) -> Result<String, &'static str> {
    if raw.is_empty() {
        return Err("locale key is empty");
    }
    if is_external(raw) {
        return Err("locale key must be a path, not a URL");
    }

    let mut key = raw;
    if base != ROOT && key.len() > base.len() && key.starts_with(base) {
        key = &key[base.len() - 1..];
    }
    key = strip_hash_marker(key);

    if !key.starts_with('/') || !key.ends_with('/') {
        return Err("locale key must start and end with /");
    }
    check_segments(key)?;
    if key.contains('#') {
        return Err("locale key cannot contain #");
    }
    Ok(key.to_owned())
}

/// Reject empty, `.` and `..` segments and whitespace.
fn check_segments(path: &str) -> Result<(), &'static str> {
    if path.contains("//") {
        return Err("path contains an empty segment");
    }
    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err("path contains a . or .. segment");
    }
    if path.chars().any(char::is_whitespace) {
        return Err("path contains whitespace");
    }
    Ok(())
}

/// Drop a leading hash-routing marker (`#/...` or `/#/...`).
fn strip_hash_marker(path: &str) -> &str {
    if path == "#" || path == "/#" {
        return ROOT;
    }
    path.strip_prefix("/#/")
        .or_else(|| path.strip_prefix("#/"))
        .map_or(path, |rest| &path[path.len() - rest.len() - 1..])
}

/// Join a relative page slug onto a relative section path.
pub(crate) fn join_slug(section: &str, slug: &str) -> Result<String, &'static str> {
    if is_external(slug) {
        return Err("expected an internal page, found a URL");
    }
    check_segments(slug)?;
    if section.is_empty() || section.ends_with('/') {
        Ok(format!("{section}{slug}"))
    } else if slug.is_empty() {
        Ok(section.to_owned())
    } else {
        Ok(format!("{section}/{slug}"))
    }
}

/// True if `path` lies under `key`, including the slash-less form of the key.
fn under_key(path: &str, key: &str) -> bool {
    key != ROOT && (path.starts_with(key) || path == key.trim_end_matches('/'))
}

/// True if `link` points at `section` or at a page inside it.
///
/// Both are relative paths. The empty section is the locale root and contains
/// every internal link.
pub(crate) fn is_within(link: &str, section: &str) -> bool {
    let trimmed = section.trim_end_matches('/');
    if trimmed.is_empty() {
        return true;
    }
    link == trimmed || link.starts_with(&format!("{trimmed}/")) || {
        // Fragments and queries on the section index itself.
        link.strip_prefix(trimmed)
            .is_some_and(|rest| rest.starts_with('#') || rest.starts_with('?'))
    }
}

/// Result of stripping a path down to its relative form.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Stripped<'a> {
    /// Locale key that prefixed the path, if any.
    pub(crate) key: Option<&'a str>,
    /// Locale-relative path.
    pub(crate) relative: String,
}

/// Base path, routing mode and known locale keys of one resolution run.
#[derive(Debug)]
pub(crate) struct PathContext<'a> {
    base: &'a str,
    mode: RoutingMode,
    keys: &'a [String],
}

impl<'a> PathContext<'a> {
    pub(crate) fn new(base: &'a str, mode: RoutingMode, keys: &'a [String]) -> Self {
        Self { base, mode, keys }
    }

    /// Remove a leading base path, returning an absolute site-local path.
    pub(crate) fn strip_base<'p>(&self, path: &'p str) -> &'p str {
        if self.base == ROOT {
            return path;
        }
        if path.starts_with(self.base) {
            return &path[self.base.len() - 1..];
        }
        if path == self.base.trim_end_matches('/') {
            return ROOT;
        }
        path
    }

    /// Normalize an internal path to its locale-relative form.
    ///
    /// The `owner` key is preferred; otherwise the longest other locale key
    /// prefixing the path is stripped.
    pub(crate) fn strip(&self, path: &str, owner: &str) -> Result<Stripped<'a>, &'static str> {
        if path.is_empty() {
            return Err("path is empty");
        }
        if is_external(path) {
            return Err("expected an internal path, found a URL");
        }

        let local = strip_hash_marker(self.strip_base(path));
        if !local.starts_with('/') {
            return Err("path must start with /");
        }

        let key = if under_key(local, owner) {
            self.keys.iter().find(|k| k.as_str() == owner)
        } else {
            self.keys
                .iter()
                .filter(|k| under_key(local, k))
                .max_by_key(|k| k.len())
        };

        let relative = match key {
            Some(k) => local.get(k.len()..).unwrap_or_default(),
            None => &local[1..],
        };
        if relative.starts_with('/') {
            return Err("path contains an empty segment");
        }
        check_segments(relative)?;

        Ok(Stripped {
            key: key.map(String::as_str),
            relative: relative.to_owned(),
        })
    }

    /// Build the absolute form of a relative path under a locale key.
    pub(crate) fn expand(&self, key: &str, relative: &str) -> String {
        let base = self.base.trim_end_matches('/');
        match self.mode {
            RoutingMode::Path => format!("{base}{key}{relative}"),
            RoutingMode::Hash => format!("{base}/#{key}{relative}"),
        }
    }

    /// Locale key owning a site-local path (longest matching key).
    pub(crate) fn owner_of(&self, local: &str) -> Option<&'a str> {
        self.keys
            .iter()
            .filter(|k| k.as_str() == ROOT || under_key(local, k))
            .max_by_key(|k| k.len())
            .map(String::as_str)
    }

    /// Site-local form of an absolute resolved path, if it lies under the base.
    pub(crate) fn local_of<'p>(&self, absolute: &'p str) -> Option<&'p str> {
        let under_base = self.base == ROOT
            || absolute.starts_with(self.base)
            || absolute == self.base.trim_end_matches('/');
        if !under_base {
            return None;
        }
        Some(strip_hash_marker(self.strip_base(absolute)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| (*k).to_owned()).collect()
    }

    #[test]
    fn test_normalize_base_root_forms() {
        assert_eq!(normalize_base(None).unwrap(), "/");
        assert_eq!(normalize_base(Some("")).unwrap(), "/");
        assert_eq!(normalize_base(Some("/")).unwrap(), "/");
        assert_eq!(normalize_base(Some("/proj/")).unwrap(), "/proj/");
    }

    #[test]
    fn test_normalize_base_rejects_malformed() {
        assert!(normalize_base(Some("proj/")).is_err());
        assert!(normalize_base(Some("/proj")).is_err());
        assert!(normalize_base(Some("https://example.com/")).is_err());
        assert!(normalize_base(Some("/a//b/")).is_err());
        assert!(normalize_base(Some("/#/")).is_err());
    }

    #[test]
    fn test_normalize_locale_key() {
        assert_eq!(normalize_locale_key("/", "/proj/").unwrap(), "/");
        assert_eq!(normalize_locale_key("/zh/", "/proj/").unwrap(), "/zh/");
        assert_eq!(normalize_locale_key("/proj/zh/", "/proj/").unwrap(), "/zh/");
        assert_eq!(normalize_locale_key("/#/zh/", "/").unwrap(), "/zh/");
        // Equal to the base: kept as a base-relative key
        assert_eq!(normalize_locale_key("/x/", "/x/").unwrap(), "/x/");
    }

    #[test]
    fn test_normalize_locale_key_rejects_malformed() {
        assert!(normalize_locale_key("", "/").is_err());
        assert!(normalize_locale_key("zh/", "/").is_err());
        assert!(normalize_locale_key("/zh", "/").is_err());
        assert!(normalize_locale_key("https://zh.example.com/", "/").is_err());
    }

    #[test]
    fn test_strip_base_round_trip() {
        let k = keys(&["/"]);
        for base in ["/", "/proj/", "/a/b/"] {
            let ctx = PathContext::new(base, RoutingMode::Path, &k);
            for path in ["/", "/guide/", "/guide/installation", "/api/#client"] {
                let prefixed = format!("{}{path}", base.trim_end_matches('/'));
                assert_eq!(ctx.strip_base(&prefixed), path, "base {base}");
            }
        }
    }

    #[test]
    fn test_strip_base_without_trailing_slash() {
        let k = keys(&["/"]);
        let ctx = PathContext::new("/proj/", RoutingMode::Path, &k);
        assert_eq!(ctx.strip_base("/proj"), "/");
        assert_eq!(ctx.strip_base("/project/"), "/project/");
    }

    #[test]
    fn test_strip_bare_and_prefixed_forms_converge() {
        let k = keys(&["/", "/en/"]);
        let ctx = PathContext::new("/proj/", RoutingMode::Path, &k);

        let bare = ctx.strip("/en/guide/", "/en/").unwrap();
        let prefixed = ctx.strip("/proj/en/guide/", "/en/").unwrap();
        assert_eq!(bare, prefixed);
        assert_eq!(bare.relative, "guide/");
        assert_eq!(bare.key, Some("/en/"));
    }

    #[test]
    fn test_strip_root_relative_form() {
        let k = keys(&["/zh/"]);
        let ctx = PathContext::new("/", RoutingMode::Hash, &k);
        let stripped = ctx.strip("/guide/", "/zh/").unwrap();
        assert_eq!(stripped.key, None);
        assert_eq!(stripped.relative, "guide/");
    }

    #[test]
    fn test_strip_hash_forms() {
        let k = keys(&["/", "/zh/"]);
        let ctx = PathContext::new("/proj/", RoutingMode::Hash, &k);
        for path in ["/proj/#/zh/guide/", "#/zh/guide/", "/#/zh/guide/", "/zh/guide/"] {
            let stripped = ctx.strip(path, "/zh/").unwrap();
            assert_eq!(stripped.relative, "guide/", "path {path}");
        }
    }

    #[test]
    fn test_strip_base_before_locale_key() {
        // Base and locale key share the same spelling
        let k = keys(&["/", "/x/"]);
        let ctx = PathContext::new("/x/", RoutingMode::Path, &k);

        let stripped = ctx.strip("/x/x/guide/", "/x/").unwrap();
        assert_eq!(stripped.key, Some("/x/"));
        assert_eq!(stripped.relative, "guide/");

        let stripped = ctx.strip("/x/guide/", "/x/").unwrap();
        assert_eq!(stripped.key, None);
        assert_eq!(stripped.relative, "guide/");
    }

    #[test]
    fn test_strip_prefers_owner_then_longest_key() {
        let k = keys(&["/", "/en/", "/en/us/"]);
        let ctx = PathContext::new("/", RoutingMode::Path, &k);

        let stripped = ctx.strip("/en/us/guide/", "/").unwrap();
        assert_eq!(stripped.key, Some("/en/us/"));
        assert_eq!(stripped.relative, "guide/");

        let stripped = ctx.strip("/en/us/guide/", "/en/").unwrap();
        assert_eq!(stripped.key, Some("/en/"));
        assert_eq!(stripped.relative, "us/guide/");
    }

    #[test]
    fn test_strip_locale_root_without_trailing_slash() {
        let k = keys(&["/", "/zh/"]);
        let ctx = PathContext::new("/", RoutingMode::Path, &k);
        let stripped = ctx.strip("/zh", "/zh/").unwrap();
        assert_eq!(stripped.relative, "");
    }

    #[test]
    fn test_strip_rejects_malformed() {
        let k = keys(&["/"]);
        let ctx = PathContext::new("/", RoutingMode::Path, &k);
        assert!(ctx.strip("", "/").is_err());
        assert!(ctx.strip("guide/", "/").is_err());
        assert!(ctx.strip("https://github.com/", "/").is_err());
        assert!(ctx.strip("//guide/", "/").is_err());
        assert!(ctx.strip("/guide//x", "/").is_err());
    }

    #[test]
    fn test_expand_path_and_hash() {
        let k = keys(&["/", "/zh/"]);
        let ctx = PathContext::new("/proj/", RoutingMode::Path, &k);
        assert_eq!(ctx.expand("/", "guide/"), "/proj/guide/");
        assert_eq!(ctx.expand("/zh/", ""), "/proj/zh/");

        let ctx = PathContext::new("/proj/", RoutingMode::Hash, &k);
        assert_eq!(ctx.expand("/zh/", "guide/"), "/proj/#/zh/guide/");

        let ctx = PathContext::new("/", RoutingMode::Path, &k);
        assert_eq!(ctx.expand("/", ""), "/");
        assert_eq!(ctx.expand("/zh/", "api/"), "/zh/api/");
    }

    #[test]
    fn test_canonical_paths_are_fixed_points() {
        let k = keys(&["/", "/zh/"]);
        for mode in [RoutingMode::Path, RoutingMode::Hash] {
            for base in ["/", "/proj/"] {
                let ctx = PathContext::new(base, mode, &k);
                for (key, rel) in [("/", ""), ("/", "guide/"), ("/zh/", "api/client")] {
                    let expanded = ctx.expand(key, rel);
                    let stripped = ctx.strip(&expanded, key).unwrap();
                    assert_eq!(stripped.relative, rel, "{expanded}");
                }
            }
        }
    }

    #[test]
    fn test_owner_of() {
        let k = keys(&["/", "/zh/"]);
        let ctx = PathContext::new("/", RoutingMode::Path, &k);
        assert_eq!(ctx.owner_of("/zh/guide/"), Some("/zh/"));
        assert_eq!(ctx.owner_of("/guide/"), Some("/"));

        let k = keys(&["/en/"]);
        let ctx = PathContext::new("/", RoutingMode::Hash, &k);
        assert_eq!(ctx.owner_of("/guide/"), None);
    }

    #[test]
    fn test_local_of() {
        let k = keys(&["/"]);
        let ctx = PathContext::new("/proj/", RoutingMode::Hash, &k);
        assert_eq!(ctx.local_of("/proj/#/guide/"), Some("/guide/"));
        assert_eq!(ctx.local_of("/other/guide/"), None);
    }

    #[test]
    fn test_join_slug() {
        assert_eq!(join_slug("guide/", "").unwrap(), "guide/");
        assert_eq!(join_slug("guide/", "installation").unwrap(), "guide/installation");
        assert_eq!(join_slug("guide", "installation").unwrap(), "guide/installation");
        assert_eq!(join_slug("", "faq").unwrap(), "faq");
        assert!(join_slug("guide/", "https://example.com/").is_err());
        assert!(join_slug("guide/", "a//b").is_err());
    }

    #[test]
    fn test_dot_segments_rejected() {
        assert!(join_slug("g/", "../../etc").is_err());
        assert!(join_slug("g/", "./intro").is_err());
        assert!(join_slug("g/", "a/..").is_err());
        assert_eq!(join_slug("g/", "v1.2").unwrap(), "g/v1.2");
        assert_eq!(join_slug("g/", ".hidden").unwrap(), "g/.hidden");

        let k = keys(&["/"]);
        let ctx = PathContext::new("/proj/", RoutingMode::Path, &k);
        assert!(ctx.strip("/proj/../etc", "/").is_err());
        assert!(ctx.strip("/guide/./x", "/").is_err());
        assert!(normalize_base(Some("/a/../")).is_err());
        assert!(normalize_locale_key("/../", "/").is_err());
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("guide/", "guide/"));
        assert!(is_within("guide", "guide/"));
        assert!(is_within("guide/installation", "guide/"));
        assert!(is_within("guide/#setup", "guide/"));
        assert!(is_within("guide#setup", "guide/"));
        assert!(is_within("anything/", ""));
        assert!(!is_within("guides/", "guide/"));
        assert!(!is_within("api/", "guide/"));
    }
}
