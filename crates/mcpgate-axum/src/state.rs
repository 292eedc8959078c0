//! Shared state for the axum handlers.

use mcpgate_server::Server;
use std::sync::Arc;

/// Predicate deciding whether a bearer token is acceptable.
pub type TokenValidator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate deciding whether an `Origin` header value is acceptable.
pub type OriginValidator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// State handed to every handler.
///
/// Both predicates are optional; when unset the corresponding check passes.
#[derive(Clone)]
pub struct McpState {
    /// The server all adapters dispatch into.
    pub server: Server,
    /// Bearer token check for `/mcp`, `/sse` and `/ws`.
    pub token_validator: Option<TokenValidator>,
    /// Origin check applied to every route.
    pub origin_validator: Option<OriginValidator>,
}

impl McpState {
    /// Create state with no auth or origin checks.
    #[must_use]
    pub const fn new(server: Server) -> Self {
        Self {
            server,
            token_validator: None,
            origin_validator: None,
        }
    }

    /// Check a presented token. Passes when no validator is configured.
    #[must_use]
    pub fn token_allowed(&self, token: Option<&str>) -> bool {
        match &self.token_validator {
            None => true,
            Some(validator) => token.is_some_and(|t| validator(t)),
        }
    }

    /// Check an origin. Passes when no validator is configured.
    #[must_use]
    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.origin_validator
            .as_ref()
            .is_none_or(|validator| validator(origin))
    }
}

impl std::fmt::Debug for McpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpState")
            .field("server", &self.server.info().name)
            .field("token_validator", &self.token_validator.is_some())
            .field("origin_validator", &self.origin_validator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpgate_server::ServerBuilder;

    #[test]
    fn test_checks_pass_without_validators() {
        let state = McpState::new(ServerBuilder::new("s", "0.1.0").build());
        assert!(state.token_allowed(None));
        assert!(state.origin_allowed("https://anywhere.example"));
    }

    #[test]
    fn test_token_validator() {
        let mut state = McpState::new(ServerBuilder::new("s", "0.1.0").build());
        state.token_validator = Some(Arc::new(|token| token == "secret"));

        assert!(state.token_allowed(Some("secret")));
        assert!(!state.token_allowed(Some("wrong")));
        assert!(!state.token_allowed(None));
    }
}
