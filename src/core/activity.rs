//! Active-time tracking with explicit start/pause/flush/stop transitions.
//!
//! Time only accrues while the timer is `Running`. `flush` hands out the
//! accrued time exactly once: the pending amount is taken before delivery, so
//! a report that fails to deliver is dropped rather than sent twice.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::api::{ApiError, ApiRequest, Endpoint};

#[derive(Error, Debug)]
pub enum ActivityError {
    #[error("Activity timer already stopped")]
    Stopped,

    #[error("Failed to write activity report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode activity report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Activity channel closed")]
    ChannelClosed,

    #[error("Failed to build activity request: {0}")]
    Request(#[from] ApiError),
}

/// Body of the "activity time" POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub seq: u64,
    pub page: String,
    pub active_ms: u64,
}

impl ActivityReport {
    /// The "activity time" POST carrying this report.
    pub fn to_request(&self, base_url: &str) -> Result<ApiRequest, ApiError> {
        ApiRequest::new(base_url, Endpoint::ActivityTime).with_body(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running { since: Instant },
    Paused,
    Stopped,
}

#[derive(Debug)]
pub struct ActivityTimer {
    state: TimerState,
    page: String,
    pending: Duration,
    next_seq: u64,
}

impl ActivityTimer {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            state: TimerState::Idle,
            page: page.into(),
            pending: Duration::ZERO,
            next_seq: 0,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Starting a running timer is a no-op; starting a paused one resumes it.
    pub fn start(&mut self, now: Instant) -> Result<(), ActivityError> {
        match self.state {
            TimerState::Stopped => Err(ActivityError::Stopped),
            TimerState::Running { .. } => Ok(()),
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running { since: now };
                Ok(())
            }
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if let TimerState::Running { since } = self.state {
            self.pending += now.saturating_duration_since(since);
            self.state = TimerState::Paused;
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running { since: now };
        }
    }

    /// Takes the whole milliseconds accrued so far. Returns `None` below one millisecond.
    pub fn flush(&mut self, now: Instant) -> Option<ActivityReport> {
        if let TimerState::Running { since } = self.state {
            self.pending += now.saturating_duration_since(since);
            self.state = TimerState::Running { since: now };
        }
        // Whole milliseconds only; the sub-millisecond remainder carries over.
        let active_ms = self.pending.as_millis() as u64;
        if active_ms == 0 {
            return None;
        }
        self.pending -= Duration::from_millis(active_ms);
        let report = ActivityReport {
            seq: self.next_seq,
            page: self.page.clone(),
            active_ms,
        };
        self.next_seq += 1;
        Some(report)
    }

    /// Route change: time so far is attributed to the old page.
    pub fn set_page(&mut self, page: impl Into<String>, now: Instant) -> Option<ActivityReport> {
        let report = self.flush(now);
        self.page = page.into();
        report
    }

    /// Final flush; the timer cannot be restarted afterwards.
    pub fn stop(&mut self, now: Instant) -> Option<ActivityReport> {
        if self.state == TimerState::Stopped {
            return None;
        }
        let report = self.flush(now);
        self.state = TimerState::Stopped;
        report
    }
}

pub type SharedTimer = Arc<Mutex<ActivityTimer>>;

/// Where flushed reports go. Delivery is attempted once per report.
pub trait ActivitySink: Send + Sync {
    fn deliver(&self, report: &ActivityReport) -> Result<(), ActivityError>;
}

/// Appends one ready-to-send `ApiRequest` per line; an outbox a network uploader can drain later.
pub struct JsonLinesSink {
    path: PathBuf,
    base_url: String,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self { path: path.into(), base_url: base_url.into() }
    }
}

impl ActivitySink for JsonLinesSink {
    fn deliver(&self, report: &ActivityReport) -> Result<(), ActivityError> {
        let line = serde_json::to_string(&report.to_request(&self.base_url)?)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

impl ActivitySink for mpsc::UnboundedSender<ActivityReport> {
    fn deliver(&self, report: &ActivityReport) -> Result<(), ActivityError> {
        self.send(report.clone()).map_err(|_| ActivityError::ChannelClosed)
    }
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Cloneable front to the shared timer; every flush it triggers goes straight to the sink.
#[derive(Clone)]
pub struct ActivityHandle {
    timer: SharedTimer,
    sink: Arc<dyn ActivitySink>,
}

impl ActivityHandle {
    pub fn new(timer: ActivityTimer, sink: Arc<dyn ActivitySink>) -> Self {
        Self { timer: Arc::new(Mutex::new(timer)), sink }
    }

    pub fn timer(&self) -> SharedTimer {
        Arc::clone(&self.timer)
    }

    pub async fn start(&self) -> Result<(), ActivityError> {
        self.timer.lock().await.start(now())
    }

    pub async fn pause(&self) {
        self.timer.lock().await.pause(now());
    }

    pub async fn resume(&self) {
        self.timer.lock().await.resume(now());
    }

    pub async fn navigate(&self, page: &str) {
        let report = self.timer.lock().await.set_page(page, now());
        self.deliver(report);
    }

    pub async fn flush(&self) {
        let report = self.timer.lock().await.flush(now());
        self.deliver(report);
    }

    pub async fn stop(&self) {
        let report = self.timer.lock().await.stop(now());
        self.deliver(report);
    }

    fn deliver(&self, report: Option<ActivityReport>) {
        let Some(report) = report else {
            return;
        };
        match self.sink.deliver(&report) {
            Ok(()) => debug!(seq = report.seq, page = %report.page, active_ms = report.active_ms, "activity delivered"),
            Err(e) => warn!(seq = report.seq, error = %e, "activity report dropped"),
        }
    }
}

/// Background task flushing the timer on a fixed period.
pub struct ActivityReporter {
    handle: ActivityHandle,
    task: JoinHandle<()>,
}

pub fn spawn_reporter(handle: ActivityHandle, period: Duration) -> ActivityReporter {
    let task_handle = handle.clone();
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick fires immediately; nothing has accrued yet.
        interval.tick().await;
        loop {
            interval.tick().await;
            task_handle.flush().await;
        }
    });
    ActivityReporter { handle, task }
}

impl ActivityReporter {
    pub fn handle(&self) -> ActivityHandle {
        self.handle.clone()
    }

    /// Stops the periodic task, then stops the timer and delivers the final flush.
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
        self.handle.stop().await;
        info!("activity reporter stopped");
    }
}
