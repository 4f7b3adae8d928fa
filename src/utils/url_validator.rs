//! Admission policy for URLs submitted for shortening.
//!
//! A candidate is admitted when it parses as an absolute `http`/`https` URL
//! with a host that is neither loopback (outside development mode) nor matched
//! by the configured denylist. Validation is pure: it depends only on the input
//! and the [`UrlPolicy`].

use std::str::FromStr;
use url::{Host, Url};

/// Errors explaining why a URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlRejection {
    #[error("URL is required")]
    Empty,

    #[error("URL must not contain control characters")]
    ControlCharacter,

    #[error("Invalid URL format: {0}")]
    Malformed(String),

    #[error("Only HTTP and HTTPS URLs are allowed")]
    UnsupportedScheme,

    #[error("URL must include a host")]
    MissingHost,

    #[error("Loopback addresses are not allowed")]
    LoopbackHost,

    #[error("Host is not allowed: {0}")]
    DeniedHost(String),
}

/// Deployment mode of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!(
                "expected 'production' or 'development', got '{other}'"
            )),
        }
    }
}

/// Validation policy applied to every URL before it is stored.
#[derive(Debug, Clone, Default)]
pub struct UrlPolicy {
    allow_loopback: bool,
    denylist: Vec<String>,
}

impl UrlPolicy {
    /// Builds a policy for `environment` with the given denylist.
    ///
    /// Denylist entries are trimmed and lowercased; blank entries are dropped.
    pub fn new<I, S>(environment: Environment, denylist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let denylist = denylist
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_ascii_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();

        Self {
            allow_loopback: environment == Environment::Development,
            denylist,
        }
    }

    /// Returns true if `candidate` may be shortened.
    pub fn validate(&self, candidate: &str) -> bool {
        self.check(candidate).is_ok()
    }

    /// Checks `candidate` and explains a rejection.
    ///
    /// # Errors
    ///
    /// Returns the first [`UrlRejection`] that applies, checked in order:
    /// emptiness, control characters, syntax, scheme, host presence, loopback,
    /// denylist.
    ///
    /// The URL parser silently strips tabs and newlines, so they are rejected
    /// up front: the stored URL must be usable verbatim as a `Location` header.
    pub fn check(&self, candidate: &str) -> Result<(), UrlRejection> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(UrlRejection::Empty);
        }

        if trimmed.chars().any(|c| c.is_ascii_control()) {
            return Err(UrlRejection::ControlCharacter);
        }

        let url = Url::parse(trimmed).map_err(|e| UrlRejection::Malformed(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(UrlRejection::UnsupportedScheme);
        }

        let host = url.host().ok_or(UrlRejection::MissingHost)?;

        if !self.allow_loopback && is_loopback(&host) {
            return Err(UrlRejection::LoopbackHost);
        }

        let hostname = host_name(&host);
        if let Some(entry) = self.denylist.iter().find(|e| hostname.contains(e.as_str())) {
            tracing::debug!(host = %hostname, rule = %entry, "URL rejected by denylist");
            return Err(UrlRejection::DeniedHost(hostname));
        }

        Ok(())
    }
}

/// Lowercased host for denylist matching; IPv6 addresses without brackets.
fn host_name(host: &Host<&str>) -> String {
    match host {
        Host::Domain(domain) => domain.to_ascii_lowercase(),
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => ip.to_string(),
    }
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Host::Ipv4(ip) => ip.is_loopback(),
        Host::Ipv6(ip) => ip.is_loopback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production() -> UrlPolicy {
        UrlPolicy::new(Environment::Production, Vec::<String>::new())
    }

    #[test]
    fn test_accepts_http_and_https() {
        let policy = production();
        assert!(policy.validate("http://example.com"));
        assert!(policy.validate("https://example.com/page"));
        assert!(policy.validate("https://example.com/search?q=rust&lang=en#top"));
        assert!(policy.validate("http://192.168.1.1:8080/api"));
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        let policy = production();
        assert_eq!(policy.check(""), Err(UrlRejection::Empty));
        assert_eq!(policy.check("   \t\n"), Err(UrlRejection::Empty));
    }

    #[test]
    fn test_rejects_malformed() {
        let policy = production();
        assert!(matches!(
            policy.check("not a valid url"),
            Err(UrlRejection::Malformed(_))
        ));
        assert!(matches!(
            policy.check("example.com"),
            Err(UrlRejection::Malformed(_))
        ));
        assert!(matches!(
            policy.check("https://"),
            Err(UrlRejection::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_control_characters() {
        let policy = production();
        for url in [
            "https://example.com/a\nb",
            "https://example.com/a\r\nSet-Cookie: x=1",
            "https://exa\tmple.com/",
            "https://example.com/\u{7f}",
            "https://example.com/\0",
        ] {
            assert_eq!(
                policy.check(url),
                Err(UrlRejection::ControlCharacter),
                "{url:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_not_a_control_character() {
        let policy = production();
        assert!(policy.validate("\t https://example.com/page \n"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        let policy = production();
        for url in [
            "ftp://example.com",
            "file:///etc/passwd",
            "javascript:alert('xss')",
            "data:text/plain,Hello",
            "mailto:test@example.com",
        ] {
            assert_eq!(
                policy.check(url),
                Err(UrlRejection::UnsupportedScheme),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_loopback_in_production() {
        let policy = production();
        assert_eq!(
            policy.check("http://localhost:3000/test"),
            Err(UrlRejection::LoopbackHost)
        );
        assert_eq!(
            policy.check("http://127.0.0.1/"),
            Err(UrlRejection::LoopbackHost)
        );
        assert_eq!(
            policy.check("http://LOCALHOST/"),
            Err(UrlRejection::LoopbackHost)
        );
        assert_eq!(policy.check("http://[::1]/"), Err(UrlRejection::LoopbackHost));
    }

    #[test]
    fn test_allows_loopback_in_development() {
        let policy = UrlPolicy::new(Environment::Development, Vec::<String>::new());
        assert!(policy.validate("http://localhost:3000/test"));
        assert!(policy.validate("http://127.0.0.1/"));
    }

    #[test]
    fn test_denylist_matches_hostname_substring() {
        let policy = UrlPolicy::new(Environment::Production, ["evil.com", " Tracker "]);
        assert!(matches!(
            policy.check("https://evil.com/landing"),
            Err(UrlRejection::DeniedHost(_))
        ));
        assert!(matches!(
            policy.check("https://cdn.evil.com.example.org/"),
            Err(UrlRejection::DeniedHost(_))
        ));
        assert!(matches!(
            policy.check("https://ad-TRACKER.net/"),
            Err(UrlRejection::DeniedHost(_))
        ));
        assert!(policy.validate("https://example.com/evil.com"));
    }

    #[test]
    fn test_denylist_matches_ipv6_without_brackets() {
        let policy = UrlPolicy::new(Environment::Development, ["2001:db8:"]);
        assert_eq!(
            policy.check("http://[2001:db8::1]:8080/"),
            Err(UrlRejection::DeniedHost("2001:db8::1".to_string()))
        );

        let bracketed = UrlPolicy::new(Environment::Development, ["::1]"]);
        assert!(bracketed.validate("http://[::1]/"));
    }

    #[test]
    fn test_denylist_applies_in_development() {
        let policy = UrlPolicy::new(Environment::Development, ["blocked"]);
        assert!(!policy.validate("https://blocked.example/"));
    }

    #[test]
    fn test_blank_denylist_entries_are_ignored() {
        let policy = UrlPolicy::new(Environment::Production, ["", "  "]);
        assert!(policy.validate("https://example.com"));
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "production".parse::<Environment>(),
            Ok(Environment::Production)
        );
        assert_eq!("DEV".parse::<Environment>(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }
}
