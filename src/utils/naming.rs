use std::sync::LazyLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("static regex")
});

const SLUG_PLACEHOLDER: &str = "report";
const HOST_PLACEHOLDER: &str = "site";
pub const BASENAME_SUFFIX: &str = "a11y";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// Lower-case, collapse every run of non-alphanumerics into one hyphen, trim hyphens.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let slug = NON_ALNUM.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        SLUG_PLACEHOLDER.to_string()
    } else {
        slug.to_string()
    }
}

/// The part of a URL that names the site: its authority, else its path.
pub fn url_label(url: &str) -> &str {
    let (has_scheme, rest) = match url.split_once("://") {
        Some((_, rest)) => (true, rest),
        None => (false, url),
    };
    let authority = if has_scheme {
        rest.split(['/', '?', '#']).next().unwrap_or("")
    } else {
        ""
    };

    if !authority.is_empty() {
        authority
    } else if !rest.is_empty() {
        rest
    } else {
        HOST_PLACEHOLDER
    }
}

/// The URL without scheme or fragment: host, path and query.
pub fn url_location(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let rest = rest.split('#').next().unwrap_or("");
    if rest.is_empty() {
        HOST_PLACEHOLDER
    } else {
        rest
    }
}

/// `{timestamp}_{slug}_a11y` for archived reports.
pub fn dated_basename<Tz: TimeZone>(url: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}_{}",
        now.format(TIMESTAMP_FORMAT),
        slugify(url_label(url)),
        BASENAME_SUFFIX
    )
}

/// `{slug}_a11y`, used when output naming must not depend on the clock.
///
/// Without a timestamp the host alone would make every page of a site share
/// one file, so the slug covers the path and query as well.
pub fn fixed_basename(url: &str) -> String {
    format!("{}_{}", slugify(url_location(url)), BASENAME_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("Example.COM:8080"), "example-com-8080");
        assert_eq!(slugify("a -- b__c"), "a-b-c");
        assert_eq!(slugify("--edge--"), "edge");
    }

    #[test]
    fn test_slugify_placeholder() {
        assert_eq!(slugify(""), "report");
        assert_eq!(slugify("///"), "report");
        assert_eq!(slugify("日本"), "report");
    }

    #[test]
    fn test_url_label_prefers_host() {
        assert_eq!(url_label("https://www.example.com/path?q=1"), "www.example.com");
        assert_eq!(url_label("http://localhost:3000"), "localhost:3000");
    }

    #[test]
    fn test_url_label_falls_back_to_path() {
        assert_eq!(url_label("file:///tmp/page.html"), "/tmp/page.html");
        assert_eq!(url_label("example.com/about"), "example.com/about");
        assert_eq!(url_label(""), "site");
    }

    #[test]
    fn test_dated_basename_format() {
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(
            dated_basename("https://www.example.com/", &now),
            "2026-03-07_090502_www-example-com_a11y"
        );
    }

    #[test]
    fn test_fixed_basename_has_no_clock() {
        assert_eq!(fixed_basename("https://example.org"), "example-org_a11y");
        assert_eq!(fixed_basename("https://example.org/"), "example-org_a11y");
    }

    #[test]
    fn test_fixed_basename_distinguishes_pages_of_one_site() {
        assert_eq!(fixed_basename("https://example.com/about"), "example-com-about_a11y");
        assert_eq!(fixed_basename("https://example.com/search?q=shoes#top"), "example-com-search-q-shoes_a11y");
        assert_ne!(fixed_basename("https://example.com/"), fixed_basename("https://example.com/about"));
    }

    #[test]
    fn test_url_location() {
        assert_eq!(url_location("https://example.com/a?b=1#frag"), "example.com/a?b=1");
        assert_eq!(url_location("file:///tmp/x.html"), "/tmp/x.html");
        assert_eq!(url_location("https://"), "site");
    }
}
