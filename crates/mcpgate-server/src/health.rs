//! Health and status reports.
//!
//! These are the payloads behind `GET /health` and `GET /status`. They are
//! plain data so any transport can render them.

use mcpgate_core::capability::ServerInfo;
use serde::{Deserialize, Serialize};

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Always `"ok"` while the server answers.
    pub status: String,
    /// Number of tracked sessions.
    pub sessions: usize,
    /// Number of live connections.
    pub connections: usize,
    /// RFC 3339 timestamp of the report.
    pub timestamp: String,
}

impl HealthReport {
    /// Build a report stamped with the current time.
    #[must_use]
    pub fn ok(sessions: usize, connections: usize) -> Self {
        Self {
            status: "ok".to_string(),
            sessions,
            connections,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Names of the registered capabilities, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityNames {
    /// Tool names.
    pub tools: Vec<String>,
    /// Resource URIs.
    pub resources: Vec<String>,
    /// Prompt names.
    pub prompts: Vec<String>,
}

/// Server identity and load report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// Server identity.
    pub server: ServerInfo,
    /// Registered capability names.
    pub capabilities: CapabilityNames,
    /// Number of live connections.
    pub connections: usize,
    /// Number of tracked sessions.
    pub sessions: usize,
    /// Whole seconds since the server was built.
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_report_shape() {
        let json = serde_json::to_value(HealthReport::ok(2, 1)).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["sessions"], 2);
        assert_eq!(json["connections"], 1);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_status_report_shape() {
        let report = StatusReport {
            server: ServerInfo::new("demo", "1.0.0"),
            capabilities: CapabilityNames {
                tools: vec!["greet".to_string()],
                ..CapabilityNames::default()
            },
            connections: 0,
            sessions: 0,
            uptime_seconds: 12,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["uptimeSeconds"], 12);
        assert_eq!(json["capabilities"]["tools"], json!(["greet"]));
        assert_eq!(json["server"]["name"], "demo");
    }
}
