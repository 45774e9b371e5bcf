// Per-widget refresh scheduling.
//
// One task per widget: fetch immediately on schedule, then on every
// interval tick. Updates flow to the consumer over an unbounded channel.
// A cancelled widget's in-flight cycle is discarded, not emitted. The
// scheduler also drives the periodic cache sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::fetcher::{CacheUse, FetchResult, Fetcher, adaptive_ttl};
use crate::model::WidgetConfig;
use crate::transform::{self, Row};

/// One refresh cycle's outcome for one widget.
#[derive(Debug, Clone)]
pub struct WidgetUpdate {
    pub widget_id: String,
    pub fetched_at: DateTime<Utc>,
    pub payload: UpdatePayload,
}

/// Payload of a [`WidgetUpdate`].
#[derive(Debug, Clone)]
pub enum UpdatePayload {
    /// Shaped rows ready to render.
    Rows { rows: Vec<Row>, cached: bool },
    /// The cycle failed. Keeping or dropping previously rendered rows is
    /// the consumer's policy.
    Error { message: String },
}

struct WidgetTask {
    widget: Arc<WidgetConfig>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runs the per-widget refresh loops and the cache sweeper.
///
/// Cloning shares one scheduler. [`shutdown`](Self::shutdown) stops
/// everything and waits for the tasks to wind down.
#[derive(Clone)]
pub struct RefreshScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    fetcher: Arc<Fetcher>,
    tasks: DashMap<String, WidgetTask>,
    update_tx: mpsc::UnboundedSender<WidgetUpdate>,
    cancel: CancellationToken,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    /// Create a scheduler draining into the returned receiver.
    pub fn new(fetcher: Arc<Fetcher>) -> (Self, mpsc::UnboundedReceiver<WidgetUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            inner: Arc::new(SchedulerInner {
                fetcher,
                tasks: DashMap::new(),
                update_tx,
                cancel: CancellationToken::new(),
                sweeper: Mutex::new(None),
            }),
        };
        (scheduler, update_rx)
    }

    /// Number of scheduled widgets.
    pub fn len(&self) -> usize {
        self.inner.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.tasks.is_empty()
    }

    /// Start (or replace) the refresh loop for `widget`.
    ///
    /// Replacing cancels the previous loop first; when the URL changed,
    /// the old URL's cache entry is dropped with it.
    pub async fn schedule(&self, widget: WidgetConfig) -> Result<(), CoreError> {
        validate(&widget)?;
        self.ensure_sweeper().await;

        let widget = Arc::new(widget);

        if let Some((_, old)) = self.inner.tasks.remove(&widget.id) {
            old.cancel.cancel();
            if old.widget.url != widget.url {
                self.inner.fetcher.cache().invalidate(&old.widget.url);
            }
            debug!(widget = %widget.id, "replacing scheduled widget");
        }

        let cancel = self.inner.cancel.child_token();
        let handle = tokio::spawn(widget_refresh_task(
            Arc::clone(&self.inner.fetcher),
            Arc::clone(&widget),
            self.inner.update_tx.clone(),
            cancel.clone(),
        ));

        info!(
            widget = %widget.id,
            url = %widget.url,
            every = ?widget.refresh_interval,
            "scheduled widget"
        );
        self.inner
            .tasks
            .insert(widget.id.clone(), WidgetTask { widget, cancel, handle });
        Ok(())
    }

    /// Stop refreshing `id` and drop its URL's cache entry.
    pub fn deschedule(&self, id: &str) -> Result<(), CoreError> {
        let Some((_, task)) = self.inner.tasks.remove(id) else {
            return Err(CoreError::UnknownWidget { id: id.to_owned() });
        };
        task.cancel.cancel();
        self.inner.fetcher.cache().invalidate(&task.widget.url);
        info!(widget = %id, "descheduled widget");
        Ok(())
    }

    /// Run one cycle for `id` right now, bypassing the cache.
    pub async fn refresh_now(&self, id: &str) -> Result<(), CoreError> {
        let widget = self
            .inner
            .tasks
            .get(id)
            .map(|task| Arc::clone(&task.widget))
            .ok_or_else(|| CoreError::UnknownWidget { id: id.to_owned() })?;

        let update = run_cycle(&self.inner.fetcher, &widget, CacheUse::Bypass).await;
        let _ = self.inner.update_tx.send(update);
        Ok(())
    }

    /// Cancel every widget loop and the sweeper, then wait for them.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let ids: Vec<String> = self.inner.tasks.iter().map(|task| task.key().clone()).collect();
        for id in ids {
            if let Some((_, task)) = self.inner.tasks.remove(&id) {
                let _ = task.handle.await;
            }
        }

        if let Some(sweeper) = self.inner.sweeper.lock().await.take() {
            let _ = sweeper.await;
        }
        info!("scheduler stopped");
    }

    async fn ensure_sweeper(&self) {
        let mut sweeper = self.inner.sweeper.lock().await;
        if sweeper.is_none() {
            *sweeper = Some(tokio::spawn(sweep_task(
                Arc::clone(&self.inner.fetcher),
                self.inner.cancel.clone(),
            )));
        }
    }
}

fn validate(widget: &WidgetConfig) -> Result<(), CoreError> {
    if widget.id.is_empty() {
        return Err(CoreError::InvalidWidget {
            id: widget.id.clone(),
            reason: "empty id".to_owned(),
        });
    }
    if widget.refresh_interval.is_zero() {
        return Err(CoreError::InvalidWidget {
            id: widget.id.clone(),
            reason: "refresh interval must be positive".to_owned(),
        });
    }
    if let Err(e) = url::Url::parse(&widget.url) {
        return Err(CoreError::InvalidWidget {
            id: widget.id.clone(),
            reason: format!("invalid url: {e}"),
        });
    }
    Ok(())
}

/// Fetch immediately, then on every tick until cancelled.
async fn widget_refresh_task(
    fetcher: Arc<Fetcher>,
    widget: Arc<WidgetConfig>,
    update_tx: mpsc::UnboundedSender<WidgetUpdate>,
    cancel: CancellationToken,
) {
    let ttl = adaptive_ttl(widget.refresh_interval, false);
    let mut interval = tokio::time::interval(widget.refresh_interval);
    // Don't burst ticks if a slow fetch falls behind the cadence
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            update = run_cycle(&fetcher, &widget, CacheUse::Ttl(ttl)) => {
                if cancel.is_cancelled() {
                    debug!(widget = %widget.id, "discarding in-flight result after cancel");
                    break;
                }
                if update_tx.send(update).is_err() {
                    debug!(widget = %widget.id, "update channel closed, stopping");
                    break;
                }
            }
        }
    }
}

/// One fetch-and-shape cycle.
async fn run_cycle(fetcher: &Fetcher, widget: &WidgetConfig, cache: CacheUse) -> WidgetUpdate {
    let payload = match fetcher.fetch(&widget.url, &widget.request, cache).await {
        FetchResult::Success { data, cached } => UpdatePayload::Rows {
            rows: transform::rows(&data, &widget.fields, widget.kind),
            cached,
        },
        FetchResult::Failure { error } => {
            warn!(widget = %widget.id, error = %error, "refresh cycle failed");
            UpdatePayload::Error { message: error }
        }
    };

    WidgetUpdate {
        widget_id: widget.id.clone(),
        fetched_at: Utc::now(),
        payload,
    }
}

/// Periodic cache sweep, one per scheduler.
async fn sweep_task(fetcher: Arc<Fetcher>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(fetcher.sweep_interval());
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                fetcher.cache().sweep();
            }
        }
    }
}
