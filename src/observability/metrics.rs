//! Metrics registry for arbordb
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics registry containing all operational counters
///
/// Uses Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Commands answered with an ok response
    commands_executed: AtomicU64,
    /// Commands answered with an error response
    commands_rejected: AtomicU64,
    /// Requests whose credentials failed
    auth_failures: AtomicU64,
    /// Connections accepted
    connections_accepted: AtomicU64,
    /// Connections dropped on a malformed request
    decode_failures: AtomicU64,
    /// Users registered
    users_registered: AtomicU64,
    /// Pools, schemas and collections created
    entities_created: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment commands executed
    pub fn increment_commands_executed(&self) {
        self.commands_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment commands rejected
    pub fn increment_commands_rejected(&self) {
        self.commands_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment authentication failures
    pub fn increment_auth_failures(&self) {
        self.auth_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment connections accepted
    pub fn increment_connections(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment decode failures
    pub fn increment_decode_failures(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment users registered
    pub fn increment_users(&self) {
        self.users_registered.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment namespace entities created
    pub fn increment_entities(&self) {
        self.entities_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"auth_failures":{},"commands_executed":{},"commands_rejected":{},"connections":{},"decode_failures":{},"entities_created":{},"users_registered":{}}}"#,
            s.auth_failures,
            s.commands_executed,
            s.commands_rejected,
            s.connections,
            s.decode_failures,
            s.entities_created,
            s.users_registered,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_executed: self.commands_executed.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            auth_failures: self.auth_failures.load(Ordering::Relaxed),
            connections: self.connections_accepted.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            users_registered: self.users_registered.load(Ordering::Relaxed),
            entities_created: self.entities_created.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub commands_executed: u64,
    pub commands_rejected: u64,
    pub auth_failures: u64,
    pub connections: u64,
    pub decode_failures: u64,
    pub users_registered: u64,
    pub entities_created: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let registry = MetricsRegistry::new();
        assert_eq!(registry.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_commands_executed();
        registry.increment_commands_executed();
        registry.increment_commands_rejected();
        registry.increment_auth_failures();
        registry.increment_connections();
        registry.increment_users();
        registry.increment_entities();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.commands_executed, 2);
        assert_eq!(snapshot.commands_rejected, 1);
        assert_eq!(snapshot.auth_failures, 1);
        assert_eq!(snapshot.connections, 1);
        assert_eq!(snapshot.decode_failures, 0);
        assert_eq!(snapshot.users_registered, 1);
        assert_eq!(snapshot.entities_created, 1);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.increment_commands_executed();
        registry.increment_decode_failures();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["commands_executed"], 1);
        assert_eq!(parsed["decode_failures"], 1);
        assert_eq!(parsed["connections"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_commands_executed();
                    reg.increment_connections();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.commands_executed, 1000);
        assert_eq!(snapshot.connections, 1000);
    }
}
