//! URL templating and filename extraction.
//!
//! All functions here are pure and never fail: input they cannot make sense of
//! comes back unchanged or as `None`, which callers treat as "cannot compare".

/// Placeholder substituted with a dependency's version.
pub const VERSION_PLACEHOLDER: &str = "{vers}";

/// Replaces every [`VERSION_PLACEHOLDER`] in `template` with `version`.
///
/// Without a version the template is returned unchanged, placeholder included.
///
/// # Example
///
/// ```
/// use umbed_deps::resolve_url;
///
/// assert_eq!(
///     resolve_url("https://cdn.example.com/lib@{vers}/lib-{vers}.js", Some("1.2.3")),
///     "https://cdn.example.com/lib@1.2.3/lib-1.2.3.js"
/// );
/// assert_eq!(resolve_url("/lib-{vers}.js", None), "/lib-{vers}.js");
/// ```
#[must_use]
pub fn resolve_url(template: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => template.replace(VERSION_PLACEHOLDER, version),
        None => template.to_string(),
    }
}

/// Returns the final path segment of `url` if it is a `*.<extension>` file.
///
/// The extension is matched case-insensitively. The segment must follow a `/`.
///
/// # Example
///
/// ```
/// use umbed_deps::filename_suffix;
///
/// assert_eq!(
///     filename_suffix("https://cdn.example.com/x/lib-1.2.3.js", "js"),
///     Some("lib-1.2.3.js")
/// );
/// assert_eq!(filename_suffix("https://cdn.example.com/x/", "js"), None);
/// ```
#[must_use]
pub fn filename_suffix<'a>(url: &'a str, extension: &str) -> Option<&'a str> {
    let (_, filename) = url.rsplit_once('/')?;
    let split = filename.len().checked_sub(extension.len() + 1)?;
    let suffix = filename.get(split..)?;
    suffix
        .strip_prefix('.')
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        .then_some(filename)
}

/// Strips a trailing `.<extension>` from `url`.
///
/// Module loaders append their own extension, so configured paths must not
/// carry one. The match is case-sensitive.
#[must_use]
pub fn module_path_for(url: &str, extension: &str) -> String {
    url.strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(url)
        .to_string()
}

/// Returns `true` if `url` ends with `filename`.
///
/// Empty inputs never match.
#[must_use]
pub fn ends_with_filename(url: &str, filename: &str) -> bool {
    !url.is_empty() && !filename.is_empty() && url.ends_with(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn resolve_replaces_every_placeholder() {
        assert_eq!(
            resolve_url("/{vers}/a-{vers}.js", Some("2.0")),
            "/2.0/a-2.0.js"
        );
    }

    #[test]
    fn resolve_without_placeholder_is_identity() {
        assert_eq!(resolve_url("/a.js", Some("2.0")), "/a.js");
    }

    #[test]
    fn filename_suffix_is_case_insensitive() {
        assert_eq!(filename_suffix("/static/App.JS", "js"), Some("App.JS"));
        assert_eq!(filename_suffix("/static/theme.Css", "css"), Some("theme.Css"));
    }

    #[test]
    fn filename_suffix_rejects_other_extensions() {
        assert_eq!(filename_suffix("/static/app.json", "js"), None);
        assert_eq!(filename_suffix("/static/app.css", "js"), None);
        assert_eq!(filename_suffix("/static/appjs", "js"), None);
    }

    #[test]
    fn filename_suffix_requires_a_path_separator() {
        assert_eq!(filename_suffix("app.js", "js"), None);
        assert_eq!(filename_suffix("", "js"), None);
    }

    #[test]
    fn filename_suffix_ignores_query_strings() {
        assert_eq!(filename_suffix("/app.js?v=2", "js"), None);
    }

    #[test]
    fn module_path_strips_only_trailing_extension() {
        assert_eq!(
            module_path_for("https://cdn.example.com/leaflet.js", "js"),
            "https://cdn.example.com/leaflet"
        );
        assert_eq!(module_path_for("/js/app", "js"), "/js/app");
        assert_eq!(module_path_for("/vendor/appjs", "js"), "/vendor/appjs");
        assert_eq!(module_path_for("/app.JS", "js"), "/app.JS");
    }

    #[test]
    fn ends_with_filename_rejects_empty_inputs() {
        assert!(ends_with_filename("https://a/lib.js", "lib.js"));
        assert!(!ends_with_filename("", "lib.js"));
        assert!(!ends_with_filename("https://a/lib.js", ""));
    }

    proptest! {
        #[test]
        fn resolve_substitutes_all_occurrences(
            prefix in "[a-z/:.-]{0,12}",
            middle in "[a-z/.-]{0,12}",
            suffix in "[a-z/.-]{0,12}",
            version in "[0-9][0-9.]{0,7}",
        ) {
            let template = format!("{prefix}{VERSION_PLACEHOLDER}{middle}{VERSION_PLACEHOLDER}{suffix}");
            let resolved = resolve_url(&template, Some(&version));

            prop_assert!(!resolved.contains(VERSION_PLACEHOLDER));
            prop_assert_eq!(resolved, format!("{prefix}{version}{middle}{version}{suffix}"));
        }

        #[test]
        fn resolve_without_version_is_identity(template in "[a-z/{}.]{0,24}") {
            prop_assert_eq!(resolve_url(&template, None), template);
        }

        #[test]
        fn filename_suffix_is_final_segment(dir in "[a-z]{1,8}", stem in "[a-z0-9.-]{0,10}") {
            let url = format!("https://cdn.example.com/{dir}/{stem}.js");
            let expected = format!("{stem}.js");
            prop_assert_eq!(filename_suffix(&url, "js"), Some(expected.as_str()));
        }
    }
}
