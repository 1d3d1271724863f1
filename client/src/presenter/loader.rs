use async_trait::async_trait;

/// Re-fetches the data a degraded dashboard could not populate
/// (proposals, registered politicians).
///
/// The presenter schedules this once per degraded outcome; it performs
/// no network I/O itself.
#[async_trait]
pub trait DashboardLoader: Send + Sync {
    async fn load_dependents(&self);
}
