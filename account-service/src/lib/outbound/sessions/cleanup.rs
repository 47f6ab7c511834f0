use std::sync::Arc;
use std::time::Duration;

use crate::domain::session::ports::SessionStore;

/// Remove expired sessions once.
pub async fn run_cleanup(store: &dyn SessionStore) {
    match store.delete_expired().await {
        Ok(count) if count > 0 => tracing::info!(count, "Cleaned up expired sessions"),
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "Failed to clean up expired sessions"),
    }
}

/// Spawn a background task that removes expired sessions every `period`.
///
/// The first run happens immediately.
pub fn spawn_cleanup_scheduler(
    store: Arc<dyn SessionStore>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            run_cleanup(store.as_ref()).await;
        }
    })
}
