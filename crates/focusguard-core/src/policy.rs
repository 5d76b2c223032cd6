//! Allowlist policy: hostname normalization and domain matching.
//!
//! Matching is exact-or-subdomain only. There is no wildcard, prefix, or path
//! matching, and every function here is total: unmatched or odd input simply
//! yields "not allowed".

use url::Url;

const WWW_LABEL: &str = "www.";

/// Lowercase a hostname and strip one leading `www.` label.
///
/// Dotless names, IP literals, and the empty string go through the same rule
/// with no special-casing.
pub fn normalize_hostname(hostname: &str) -> String {
    let lower = hostname.to_lowercase();
    match lower.strip_prefix(WWW_LABEL) {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Decide whether `hostname` is covered by `allow_list`.
///
/// A host is allowed when it equals a normalized entry or is a strict
/// subdomain of one. An empty list allows nothing; whether blocking is active
/// at all is the caller's decision.
pub fn is_allowed<S: AsRef<str>>(hostname: &str, allow_list: &[S]) -> bool {
    let host = normalize_hostname(hostname);
    allow_list.iter().any(|entry| {
        let entry = normalize_hostname(entry.as_ref());
        host == entry || is_strict_subdomain(&host, &entry)
    })
}

fn is_strict_subdomain(host: &str, entry: &str) -> bool {
    host.strip_suffix(entry)
        .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Normalize what a user typed into the settings surface.
///
/// Accepts bare domains (`Wikipedia.org`) as well as full URLs
/// (`https://www.wikipedia.org/wiki/Rust`). Returns `None` when nothing
/// host-shaped is left, which the settings controller reports as invalid input.
pub fn normalize_domain_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if trimmed.contains("//") {
        trimmed
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?;
    let domain = normalize_hostname(host);
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_one_www_label() {
        assert_eq!(normalize_hostname("WWW.Example.COM"), "example.com");
        assert_eq!(normalize_hostname("www.www.example.com"), "www.example.com");
        assert_eq!(normalize_hostname("wwwexample.com"), "wwwexample.com");
        assert_eq!(normalize_hostname(""), "");
    }

    #[test]
    fn subdomain_needs_a_label_boundary() {
        assert!(is_strict_subdomain("a.example.com", "example.com"));
        assert!(!is_strict_subdomain("notexample.com", "example.com"));
        assert!(!is_strict_subdomain("example.com", "example.com"));
        assert!(!is_strict_subdomain("a.example.com.evil.net", "example.com"));
    }

    #[test]
    fn empty_entry_only_matches_empty_host() {
        assert!(is_allowed("", &[""]));
        assert!(!is_allowed("example.com", &[""]));
    }

    #[test]
    fn input_normalization() {
        assert_eq!(normalize_domain_input("  Wikipedia.org "), Some("wikipedia.org".into()));
        assert_eq!(
            normalize_domain_input("https://WWW.Wikipedia.org/wiki/Rust"),
            Some("wikipedia.org".into())
        );
        assert_eq!(
            normalize_domain_input("news.ycombinator.com:8080"),
            Some("news.ycombinator.com".into())
        );
        assert_eq!(normalize_domain_input(""), None);
        assert_eq!(normalize_domain_input("   "), None);
        assert_eq!(normalize_domain_input("http://"), None);
        assert_eq!(normalize_domain_input("not a domain"), None);
    }
}
