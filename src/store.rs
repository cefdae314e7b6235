use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::client::{ApiClient, ApiError};
use crate::model::{Story, StoryId};

/// In-memory story collection, filled from the backend on demand.
pub struct StoryStore {
    client: Arc<ApiClient>,
    stories: RwLock<Vec<Story>>,
    refreshing: AtomicBool,
}

/// Holds the refresh flag for one refresh; clears it when dropped, including
/// when the refreshing future is cancelled mid-fetch.
struct RefreshGuard<'a>(&'a AtomicBool);

impl<'a> RefreshGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard(flag))
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl StoryStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            stories: RwLock::new(Vec::new()),
            refreshing: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    pub async fn stories(&self) -> Vec<Story> {
        self.stories.read().await.clone()
    }

    pub async fn find(&self, id: StoryId) -> Option<Story> {
        self.stories
            .read()
            .await
            .iter()
            .find(|story| story.id == id)
            .cloned()
    }

    /// Return the collection, fetching it first if nothing has been loaded.
    ///
    /// A failed fetch is logged and leaves the collection empty so the next
    /// call tries again.
    pub async fn ensure_loaded(&self) -> Vec<Story> {
        let current = self.stories().await;
        if !current.is_empty() {
            return current;
        }

        if let Err(e) = self.refresh().await {
            warn!("Loading stories from {} failed: {}", self.client.api_host(), e);
        }
        self.stories().await
    }

    /// Replace the collection with a fresh copy from the backend.
    ///
    /// Returns `Ok(None)` when another refresh is already running.
    pub async fn refresh(&self) -> Result<Option<usize>, ApiError> {
        let Some(_guard) = RefreshGuard::acquire(&self.refreshing) else {
            info!("Story refresh already in progress, skipping");
            return Ok(None);
        };

        let fetched = self.client.fetch_stories().await?;
        let count = fetched.len();
        if count == 0 {
            info!("Backend returned no stories");
        }
        *self.stories.write().await = fetched;
        info!("Loaded {} stories", count);
        Ok(Some(count))
    }
}

pub async fn start_background_refresh(store: Arc<StoryStore>, interval_minutes: u64) {
    if interval_minutes == 0 {
        info!("Background refresh disabled");
        return;
    }
    let interval = Duration::from_secs(interval_minutes.saturating_mul(60));

    info!("Starting initial story fetch");
    if let Err(e) = store.refresh().await {
        error!("Initial story fetch failed: {}", e);
    }

    loop {
        tokio::time::sleep(interval).await;
        info!("Starting scheduled story refresh");
        if let Err(e) = store.refresh().await {
            error!("Scheduled story refresh failed: {}", e);
        }
    }
}
