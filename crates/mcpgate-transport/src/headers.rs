//! HTTP header names and the forwarded-header whitelist.
//!
//! Only whitelisted request headers ever reach a capability handler. Keys are
//! lower-cased so lookups are case-insensitive.

use std::collections::HashMap;

/// Header carrying the session id.
pub const SESSION_ID_HEADER: &str = "mcp-session-id";

/// Header carrying the protocol version.
pub const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

/// Request headers forwarded to capability handlers.
pub const FORWARDED_HEADERS: [&str; 6] = [
    "authorization",
    "x-request-id",
    "x-forwarded-for",
    "user-agent",
    "accept-language",
    "content-type",
];

/// Check whether a header name is on the forwarding whitelist.
#[must_use]
pub fn is_forwarded(name: &str) -> bool {
    FORWARDED_HEADERS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(name))
}

/// Keep only whitelisted headers, with lower-cased names.
///
/// When a name repeats, the last value wins.
pub fn forwarded_headers<'a, I>(headers: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .filter(|(name, _)| is_forwarded(name))
        .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
        .collect()
}

/// Extract the token from an `Authorization: Bearer <token>` value.
#[must_use]
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
