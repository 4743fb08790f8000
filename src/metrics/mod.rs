//! Prometheus metrics for monitoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics collector.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Requests dispatched (messages carrying an id)
    pub requests_total: AtomicU64,
    /// Requests answered with a result
    pub requests_success: AtomicU64,
    /// Requests answered with an error
    pub requests_failed: AtomicU64,
    /// Notifications dispatched
    pub notifications_total: AtomicU64,
    /// Tool calls
    pub tool_calls: AtomicU64,
    /// Completion provider failures
    pub provider_failures: AtomicU64,
    /// Duplex connections accepted since start
    pub connections_opened: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_requests(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_success(&self) {
        self.requests_success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_notifications(&self) {
        self.notifications_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_tool_calls(&self) {
        self.tool_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_provider_failures(&self) {
        self.provider_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_connections(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot. The connection gauge is owned by the
    /// connection manager, so the caller supplies it.
    pub fn snapshot(&self, active_connections: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            notifications_total: self.notifications_total.load(Ordering::Relaxed),
            tool_calls: self.tool_calls.load(Ordering::Relaxed),
            provider_failures: self.provider_failures.load(Ordering::Relaxed),
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            active_connections: active_connections as u64,
        }
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub requests_success: u64,
    pub requests_failed: u64,
    pub notifications_total: u64,
    pub tool_calls: u64,
    pub provider_failures: u64,
    pub connections_opened: u64,
    pub active_connections: u64,
}

impl MetricsSnapshot {
    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        format!(
            r#"# HELP agent_hub_mcp_requests_total Total number of requests
# TYPE agent_hub_mcp_requests_total counter
agent_hub_mcp_requests_total {}

# HELP agent_hub_mcp_requests_success Requests answered with a result
# TYPE agent_hub_mcp_requests_success counter
agent_hub_mcp_requests_success {}

# HELP agent_hub_mcp_requests_failed Requests answered with an error
# TYPE agent_hub_mcp_requests_failed counter
agent_hub_mcp_requests_failed {}

# HELP agent_hub_mcp_notifications_total Notifications received
# TYPE agent_hub_mcp_notifications_total counter
agent_hub_mcp_notifications_total {}

# HELP agent_hub_mcp_tool_calls Tool calls count
# TYPE agent_hub_mcp_tool_calls counter
agent_hub_mcp_tool_calls {}

# HELP agent_hub_mcp_provider_failures Completion provider failures
# TYPE agent_hub_mcp_provider_failures counter
agent_hub_mcp_provider_failures {}

# HELP agent_hub_mcp_connections_opened Duplex connections accepted
# TYPE agent_hub_mcp_connections_opened counter
agent_hub_mcp_connections_opened {}

# HELP agent_hub_mcp_active_connections Open duplex connections
# TYPE agent_hub_mcp_active_connections gauge
agent_hub_mcp_active_connections {}
"#,
            self.requests_total,
            self.requests_success,
            self.requests_failed,
            self.notifications_total,
            self.tool_calls,
            self.provider_failures,
            self.connections_opened,
            self.active_connections
        )
    }
}
