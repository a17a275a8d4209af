use super::controller::{RefreshController, RefreshOutcome, RefreshState};
use super::models::WeekSnapshot;
use crate::error::PortalResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Handle for interacting with the running refresh schedule
#[derive(Clone)]
pub struct WeeklyEventsHandle {
    controller: Arc<RefreshController>,
    cancel: CancellationToken,
    _schedule_task: Arc<JoinHandle<()>>,
}

impl WeeklyEventsHandle {
    /// Start the refresh schedule for the given controller
    pub fn start(controller: Arc<RefreshController>, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let schedule_task = controller.start(period, cancel.clone());

        Self {
            controller,
            cancel,
            _schedule_task: Arc::new(schedule_task),
        }
    }

    /// Manual refresh; a no-op while a cycle is in flight
    pub async fn refresh_now(&self) -> RefreshOutcome {
        self.controller.refresh_now().await
    }

    pub async fn snapshot(&self) -> Option<Arc<WeekSnapshot>> {
        self.controller.snapshot().await
    }

    pub fn state(&self) -> RefreshState {
        self.controller.state()
    }

    /// Stop the refresh schedule
    pub async fn shutdown(&self) -> PortalResult<()> {
        info!("Stopping weekly events schedule");
        self.cancel.cancel();
        Ok(())
    }
}
