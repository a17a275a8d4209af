use super::feed::EventFeed;
use super::models::WeekSnapshot;
use super::normalizer::normalize_week_events;
use super::render::RenderingAdapter;
use crate::error::{Error, PortalResult};
use chrono::{DateTime, Local};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Phase of the refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Fetching,
    Rendering,
    Failed,
}

impl RefreshState {
    pub fn is_busy(self) -> bool {
        self != RefreshState::Idle
    }
}

/// Result of one call to [`RefreshController::refresh_now`]
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Another cycle was in flight; nothing was done
    Skipped,
    Rendered(Arc<WeekSnapshot>),
    /// The cycle failed; the previous snapshot is still current
    Failed(Error),
}

/// Keeps the rendered week in sync with the events feed.
///
/// At most one fetch/normalize/render cycle runs at a time. Triggers that
/// arrive while a cycle is in flight are dropped.
pub struct RefreshController {
    feed: Arc<dyn EventFeed>,
    renderer: Arc<dyn RenderingAdapter>,
    in_flight: AtomicBool,
    snapshot: RwLock<Option<Arc<WeekSnapshot>>>,
    state: watch::Sender<RefreshState>,
}

impl fmt::Debug for RefreshController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshController")
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .field("state", &*self.state.borrow())
            .finish()
    }
}

/// Clears the in-flight flag, then the busy state, on every exit path
struct InFlightGuard<'a> {
    controller: &'a RefreshController,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.controller.in_flight.store(false, Ordering::SeqCst);
        self.controller.state.send_replace(RefreshState::Idle);
        self.controller.renderer.set_busy(false);
    }
}

impl RefreshController {
    pub fn new(feed: Arc<dyn EventFeed>, renderer: Arc<dyn RenderingAdapter>) -> Self {
        let (state, _) = watch::channel(RefreshState::Idle);

        Self {
            feed,
            renderer,
            in_flight: AtomicBool::new(false),
            snapshot: RwLock::new(None),
            state,
        }
    }

    /// Run one refresh cycle unless one is already running.
    ///
    /// Failures are logged and reported in the outcome, never raised.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Refresh already in flight, dropping trigger");
            return RefreshOutcome::Skipped;
        }
        let _guard = InFlightGuard { controller: self };

        self.state.send_replace(RefreshState::Fetching);
        self.renderer.set_busy(true);

        match self.run_cycle().await {
            Ok(snapshot) => {
                info!(
                    "Week refreshed: {} of 7 days with events",
                    snapshot.real_event_count()
                );
                RefreshOutcome::Rendered(snapshot)
            }
            Err(e) => {
                self.state.send_replace(RefreshState::Failed);
                error!("Erro ao buscar eventos: {}", e);
                RefreshOutcome::Failed(e)
            }
        }
    }

    async fn run_cycle(&self) -> PortalResult<Arc<WeekSnapshot>> {
        let raw_events = self.feed.fetch_events().await?;
        let events = normalize_week_events(&raw_events);

        self.state.send_replace(RefreshState::Rendering);
        let snapshot = Arc::new(WeekSnapshot::new(events, Local::now()));
        self.renderer.render(&snapshot)?;

        *self.snapshot.write().await = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Refresh immediately, then once per `period` until `cancel` fires.
    ///
    /// Ticks keep a fixed phase. A tick that fires while a cycle is still
    /// in flight is dropped, and a failed cycle does not change the schedule.
    pub fn start(self: &Arc<Self>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let controller = Arc::clone(self);

        tokio::spawn(async move {
            info!("Refreshing events every {:?}", period);
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Refresh schedule stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        // Cycles run beside the ticker so the in-flight guard sees every tick
                        let cycle = Arc::clone(&controller);
                        tokio::spawn(async move {
                            cycle.refresh_now().await;
                        });
                    }
                }
            }
        })
    }

    /// Week shown by the last successful cycle
    pub async fn snapshot(&self) -> Option<Arc<WeekSnapshot>> {
        self.snapshot.read().await.clone()
    }

    pub async fn last_updated_at(&self) -> Option<DateTime<Local>> {
        self.snapshot.read().await.as_ref().map(|s| s.updated_at)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> RefreshState {
        *self.state.borrow()
    }

    /// Observe busy/idle transitions
    pub fn subscribe_state(&self) -> watch::Receiver<RefreshState> {
        self.state.subscribe()
    }
}
