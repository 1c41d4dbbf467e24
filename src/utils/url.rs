//! Helpers for building endpoint URLs from a configured base URL.

/// Strip trailing slashes so endpoints can be appended with a single `/`.
///
/// ```
/// use chat_console::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://api.anthropic.com/v1/"), "https://api.anthropic.com/v1");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path without doubling slashes.
///
/// ```
/// use chat_console::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.anthropic.com/v1/", "/messages"),
///     "https://api.anthropic.com/v1/messages"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalize_base_url(base_url), endpoint)
}

/// Whether `value` looks like an absolute http(s) URL with a host.
pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"].iter().any(|scheme| {
        value
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_removed() {
        assert_eq!(
            normalize_base_url("https://api.anthropic.com/v1///"),
            "https://api.anthropic.com/v1"
        );
        assert_eq!(normalize_base_url("  http://localhost:3001 "), "http://localhost:3001");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn messages_endpoint_is_joined_cleanly() {
        for base in ["https://api.anthropic.com/v1", "https://api.anthropic.com/v1/"] {
            for endpoint in ["messages", "/messages", "///messages"] {
                assert_eq!(
                    construct_api_url(base, endpoint),
                    "https://api.anthropic.com/v1/messages"
                );
            }
        }
    }

    #[test]
    fn only_absolute_http_urls_are_accepted() {
        assert!(is_http_url("https://api.anthropic.com/v1"));
        assert!(is_http_url("http://127.0.0.1:3001/api"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("https:///path"));
        assert!(!is_http_url("api.anthropic.com"));
    }
}
