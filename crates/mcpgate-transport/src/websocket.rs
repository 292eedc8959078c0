//! WebSocket close codes and control messages.

/// Normal closure.
pub const CLOSE_NORMAL: u16 = 1000;

/// The server is going away (shutdown).
pub const CLOSE_GOING_AWAY: u16 = 1001;

/// Authentication failed.
pub const CLOSE_UNAUTHORIZED: u16 = 4001;

/// Method of the notification sent when a socket is accepted.
pub const WELCOME_METHOD: &str = "notifications/welcome";

/// Human-readable reason for a close code.
#[must_use]
pub const fn close_reason(code: u16) -> &'static str {
    match code {
        CLOSE_NORMAL => "normal closure",
        CLOSE_GOING_AWAY => "server shutting down",
        CLOSE_UNAUTHORIZED => "unauthorized",
        _ => "closed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_reasons() {
        assert_eq!(close_reason(CLOSE_UNAUTHORIZED), "unauthorized");
        assert_eq!(close_reason(CLOSE_GOING_AWAY), "server shutting down");
        assert_eq!(close_reason(4999), "closed");
    }
}
