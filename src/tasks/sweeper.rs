//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired entries from a map.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheValue, ExpiringMap};

/// Spawns a background task that purges expired entries every
/// `check_period_secs` seconds.
///
/// The map is internally synchronized, so the task never blocks readers for
/// longer than one purge. Abort the returned handle to stop it.
///
/// # Example
/// ```ignore
/// let map = Arc::new(ExpiringMap::<String>::new(&MapConfig::default(), None));
/// let sweeper = spawn_sweeper(map.clone(), 600);
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper<V: CacheValue>(
    map: Arc<ExpiringMap<V>>,
    check_period_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(check_period_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {} seconds",
            check_period_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = map.purge_expired();

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
