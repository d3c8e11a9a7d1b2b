// src/validator.rs
// =============================================================================
// This module turns whatever the user typed into a well-formed absolute URL.
//
// Steps, in order:
// 1. Trim whitespace; nothing left means EmptyInput
// 2. Reject explicit non-web schemes (ftp://, file://, ...)
// 3. Prepend https:// when no http/https prefix is present
// 4. Check the overall shape with a regex (scheme + host + optional path)
// 5. Parse with the `url` crate and check scheme, host and hostname shape
//
// No network access happens here. The same module also provides the
// internal/external classification primitive used by the document walk.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::AnalysisError;

// scheme? + dotted host + TLD + optional port + path + optional query/fragment
static URL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})(:\d{1,5})?([/\w .~%+-]*)/?(\?[^\s#]*)?(#\S*)?$",
    )
    .expect("URL shape regex is valid")
});

// labels of alphanumerics/hyphens separated by dots, TLD of 2+ letters
static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$")
        .expect("hostname regex is valid")
});

// An explicit "<scheme>://" prefix, used to catch ftp:// and friends early
static EXPLICIT_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.-]*)://").expect("scheme regex is valid")
});

// Validates and normalizes a raw URL string
//
// Returns the URL as serialized by the `url` crate, so the host is
// lower-cased and an empty path becomes "/".
//
// Examples:
//   "example.com"          -> Ok("https://example.com/")
//   "http://a.org/x"       -> Ok("http://a.org/x")
//   "ftp://files.org"      -> Err(UnsupportedScheme)
//   ""                     -> Err(EmptyInput)
pub fn validate(raw: &str) -> Result<String, AnalysisError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    if let Some(caps) = EXPLICIT_SCHEME.captures(input) {
        let scheme = caps[1].to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(AnalysisError::UnsupportedScheme(scheme));
        }
    }

    let candidate = if has_web_prefix(input) {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    if !URL_SHAPE.is_match(&candidate) {
        return Err(AnalysisError::MalformedUrl(input.to_string()));
    }

    let parsed =
        Url::parse(&candidate).map_err(|_| AnalysisError::MalformedUrl(input.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AnalysisError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return Err(AnalysisError::MissingHost),
    };

    if !is_valid_host(host) {
        return Err(AnalysisError::InvalidHost(host.to_string()));
    }

    Ok(parsed.to_string())
}

// Checks the hostname shape; a trailing ":port" is ignored
pub fn is_valid_host(host: &str) -> bool {
    let bare = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    HOSTNAME.is_match(bare)
}

// Compares only the host (and explicit port) of two absolute URLs
//
// Scheme and path are ignored, so http://a.com/x and https://a.com/y are
// the same host. If either side fails to parse the answer is false.
pub fn is_same_host(link_url: &str, base_url: &str) -> bool {
    match (Url::parse(link_url), Url::parse(base_url)) {
        (Ok(link), Ok(base)) => same_host(&link, &base),
        _ => false,
    }
}

// Same check for URLs that are already parsed
pub(crate) fn same_host(link: &Url, base: &Url) -> bool {
    link.host_str() == base.host_str() && link.port() == base.port()
}

fn has_web_prefix(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepends_https() {
        assert_eq!(validate("example.com").unwrap(), "https://example.com/");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate("  https://www.rust-lang.org/learn  ").unwrap(),
            "https://www.rust-lang.org/learn"
        );
    }

    #[test]
    fn test_keeps_http_and_port() {
        assert_eq!(
            validate("http://example.com:8080/docs").unwrap(),
            "http://example.com:8080/docs"
        );
    }

    #[test]
    fn test_query_string_allowed() {
        assert!(validate("https://example.com/search?q=rust").is_ok());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(validate("   "), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn test_unsupported_scheme() {
        assert_eq!(
            validate("ftp://files.example.com"),
            Err(AnalysisError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_no_dotted_host_is_malformed() {
        assert!(matches!(
            validate("not-a-url"),
            Err(AnalysisError::MalformedUrl(_))
        ));
        assert!(matches!(
            validate("localhost"),
            Err(AnalysisError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_hostname_shape() {
        assert!(is_valid_host("example.com"));
        assert!(is_valid_host("sub.example.co.uk"));
        assert!(is_valid_host("example.com:8080"));
        assert!(!is_valid_host("-bad-.com"));
        assert!(!is_valid_host("example.c"));
        assert!(!is_valid_host("192.168.0.1"));
    }

    #[test]
    fn test_same_host_ignores_scheme_and_path() {
        assert!(is_same_host("http://example.com/a", "https://example.com/b"));
        assert!(!is_same_host("https://other.com/", "https://example.com/"));
        assert!(!is_same_host("https://example.com:8443/", "https://example.com/"));
        assert!(!is_same_host("not a url", "https://example.com/"));
    }
}
