//! Load-once cache for the map provider.
//!
//! Every caller awaits the same in-flight load. A failed load leaves the cell
//! empty so the next user-triggered attempt loads again.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use dharti_core::ExternalServiceError;

pub struct ProviderCache<P> {
    cell: OnceCell<Arc<P>>,
    attempts: AtomicUsize,
}

impl<P> Default for ProviderCache<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ProviderCache<P> {
    pub const fn new() -> Self {
        Self { cell: OnceCell::const_new(), attempts: AtomicUsize::new(0) }
    }

    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<P>, ExternalServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<P, ExternalServiceError>>,
    {
        self.cell
            .get_or_try_init(|| async {
                let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                match load().await {
                    Ok(provider) => {
                        info!(attempt, "map provider loaded");
                        Ok(Arc::new(provider))
                    }
                    Err(e) => {
                        warn!(attempt, error = %e, "map provider failed to load");
                        Err(e)
                    }
                }
            })
            .await
            .map(Arc::clone)
    }

    pub fn get(&self) -> Option<Arc<P>> {
        self.cell.get().cloned()
    }

    /// Number of times a load actually ran.
    pub fn load_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}
