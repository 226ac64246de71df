//! URL validation gate for the task pipeline.
//!
//! Purely syntactic: no DNS lookup, no network access. An invalid URL is a
//! skip, not an error; see [`crate::processor::UrlProcessor::process`].

use url::{Host, Url};

const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// Returns `true` when `input` is an absolute URL with a supported scheme and
/// a usable host.
///
/// Domain hosts must be `localhost` or contain at least one dot; bare words
/// such as `http://intranet` are rejected. IP literals are accepted.
pub fn is_valid_url(input: &str) -> bool {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return false;
    }

    let Ok(parsed) = Url::parse(input) else {
        return false;
    };

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return false;
    }

    match parsed.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.');
            domain == "localhost"
                || (domain.contains('.') && domain.split('.').all(|label| !label.is_empty()))
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_urls() {
        assert!(is_valid_url("https://example.com/doc"));
        assert!(is_valid_url("http://docs.example.org/a/b?c=d#e"));
        assert!(is_valid_url("http://localhost:8080/docs"));
        assert!(is_valid_url("http://127.0.0.1/x"));
        assert!(is_valid_url("https://[::1]/x"));
        assert!(is_valid_url("ftp://files.example.com/pub"));
    }

    #[test]
    fn rejects_non_urls() {
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("/docs/page"));
        assert!(!is_valid_url("example.com/doc"));
        assert!(!is_valid_url("https://"));
    }

    #[test]
    fn rejects_unsupported_schemes_and_hosts() {
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("file:///etc/passwd"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("http://intranet/page"));
        assert!(!is_valid_url("http://example..com/"));
    }

    #[test]
    fn rejects_embedded_whitespace() {
        assert!(!is_valid_url("https://example.com/a b"));
        assert!(!is_valid_url(" https://example.com/"));
    }
}
