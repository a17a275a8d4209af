pub mod controller;
pub mod feed;
mod handle;
pub mod models;
pub mod normalizer;
pub mod render;
pub mod time;

pub use controller::{RefreshController, RefreshOutcome, RefreshState};
pub use feed::{EventFeed, HttpEventFeed};
pub use handle::WeeklyEventsHandle;
pub use models::{NormalizedEvent, RawEvent, WeekDay, WeekSnapshot};
pub use render::{LogRenderer, RenderingAdapter};

use crate::config::Config;
use crate::error::{component_error, PortalResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Weekly events component: polls the feed and renders the week
pub struct WeeklyEvents {
    handle: RwLock<Option<WeeklyEventsHandle>>,
    renderer: Arc<dyn RenderingAdapter>,
}

impl WeeklyEvents {
    /// Create a new weekly events component rendering through `renderer`
    pub fn new(renderer: Arc<dyn RenderingAdapter>) -> Self {
        Self {
            handle: RwLock::new(None),
            renderer,
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<WeeklyEventsHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

impl Default for WeeklyEvents {
    fn default() -> Self {
        Self::new(Arc::new(LogRenderer::new()))
    }
}

#[async_trait]
impl super::Component for WeeklyEvents {
    fn name(&self) -> &'static str {
        "weekly_events"
    }

    async fn init(&self, config: Arc<RwLock<Config>>) -> PortalResult<()> {
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_some() {
            return Err(component_error("weekly_events is already running"));
        }

        let (feed_url, timeout, period) = {
            let config_read = config.read().await;
            (
                config_read.feed_url.clone(),
                config_read.request_timeout(),
                config_read.refresh_interval(),
            )
        };

        let feed = HttpEventFeed::new(&feed_url, timeout)?;
        let controller = Arc::new(RefreshController::new(
            Arc::new(feed),
            Arc::clone(&self.renderer),
        ));

        *handle_lock = Some(WeeklyEventsHandle::start(controller, period));

        Ok(())
    }

    async fn shutdown(&self) -> PortalResult<()> {
        // Shutdown the handle if it exists
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
