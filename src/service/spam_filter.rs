//! Abuse gate: origin allow-list, honeypot, and rate limiting.

use std::sync::Arc;

use url::Url;

use super::RateLimiter;

/// Everything the filter needs to judge one request.
#[derive(Debug)]
pub struct SpamCheckInput<'a> {
    /// Client IP (rate-limit key), `"unknown"` when not reported.
    pub ip: &'a str,
    /// Client user agent, captured for provenance.
    pub user_agent: &'a str,
    /// Raw `Origin` header value, empty when absent.
    pub origin: &'a str,
    /// Parsed request body.
    pub body: &'a serde_json::Value,
    /// Project's origin allow-list; empty disables the origin check.
    pub allowed_domains: &'a [String],
    /// Name of the reserved honeypot field.
    pub honeypot_field: &'a str,
}

/// Accept/reject decision with the first failing check's reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpamVerdict {
    /// `true` when any check failed.
    pub is_spam: bool,
    /// Reason of the first failing check, `None` when clean.
    pub reason: Option<String>,
}

impl SpamVerdict {
    fn clean() -> Self {
        Self {
            is_spam: false,
            reason: None,
        }
    }

    fn spam(reason: &str) -> Self {
        Self {
            is_spam: true,
            reason: Some(reason.to_string()),
        }
    }
}

/// Composite spam gate.
///
/// Runs three independent checks in fixed order (origin allow-list,
/// honeypot, rate limit), short-circuiting on the first failure. The only
/// side effect is the rate limiter's last-accepted update, which happens
/// solely when the first two checks pass.
#[derive(Debug, Clone)]
pub struct SpamFilter {
    rate_limiter: Arc<RateLimiter>,
}

impl SpamFilter {
    /// Creates a filter delegating throttle decisions to `rate_limiter`.
    #[must_use]
    pub fn new(rate_limiter: Arc<RateLimiter>) -> Self {
        Self { rate_limiter }
    }

    /// Judges one request.
    pub fn check(&self, input: &SpamCheckInput<'_>) -> SpamVerdict {
        if !input.allowed_domains.is_empty() {
            let origin_host = Url::parse(input.origin)
                .ok()
                .and_then(|url| url.host_str().map(str::to_owned));

            let allowed = match &origin_host {
                Some(host) => {
                    input.allowed_domains.iter().any(|d| d == host)
                        || host == "localhost"
                        || host == "127.0.0.1"
                }
                // Missing or unparsable Origin with a non-empty
                // allow-list is rejected.
                None => false,
            };

            if !allowed {
                return SpamVerdict::spam("Origin not allowed");
            }
        }

        if input
            .body
            .get(input.honeypot_field)
            .is_some_and(is_truthy)
        {
            return SpamVerdict::spam("Honeypot filled");
        }

        if !self.rate_limiter.allow(input.ip) {
            return SpamVerdict::spam("Rate limit exceeded");
        }

        SpamVerdict::clean()
    }
}

/// JavaScript-style truthiness for honeypot values: null, false, 0 and ""
/// are falsy; every other JSON value is truthy.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
