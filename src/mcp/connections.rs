//! Open duplex connection tracking.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// One open duplex connection.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionInfo {
    pub id: Uuid,
    pub connected_at: DateTime<Utc>,
}

/// Set of open duplex connections. Cheap to clone; clones share the set.
#[derive(Debug, Clone, Default)]
pub struct ConnectionManager {
    connections: Arc<DashMap<Uuid, ConnectionInfo>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the open set. It stays there until the returned
    /// guard is dropped.
    pub fn register(&self) -> ConnectionGuard {
        let info = ConnectionInfo {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
        };
        let id = info.id;
        self.connections.insert(id, info);
        debug!("Connection {} opened ({} open)", id, self.connections.len());

        ConnectionGuard {
            id,
            connections: self.connections.clone(),
        }
    }

    /// Number of open connections.
    pub fn count(&self) -> usize {
        self.connections.len()
    }

    /// Snapshot of the open connections.
    pub fn list(&self) -> Vec<ConnectionInfo> {
        self.connections.iter().map(|e| e.value().clone()).collect()
    }
}

/// Removes its connection from the open set when dropped, whichever way the
/// session ended.
#[derive(Debug)]
pub struct ConnectionGuard {
    id: Uuid,
    connections: Arc<DashMap<Uuid, ConnectionInfo>>,
}

impl ConnectionGuard {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.connections.remove(&self.id);
        debug!("Connection {} closed", self.id);
    }
}
