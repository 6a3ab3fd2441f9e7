//! User activity tracking.
//!
//! The tracker owns the single piece of state shared across the subsystem:
//! the timestamp of the most recent qualifying user interaction. Interaction
//! sources register explicitly and record through the returned guard;
//! dropping the guard deregisters the source. The tracker never resets
//! itself and knows nothing about sessions, tokens, or timeouts.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Kinds of interaction that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Pointer,
    Keyboard,
    Touch,
    Scroll,
    /// Lifecycle-driven activity, e.g. the user clicking "stay signed in"
    /// in the warning dialog.
    Lifecycle,
}

impl SourceKind {
    /// Get the canonical string name for this source kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Pointer => "pointer",
            SourceKind::Keyboard => "keyboard",
            SourceKind::Touch => "touch",
            SourceKind::Scroll => "scroll",
            SourceKind::Lifecycle => "lifecycle",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct TrackerInner {
    /// Monotonic reference point; activity is stored as elapsed ms from here.
    epoch: Instant,
    /// Milliseconds since `epoch` of the last recorded activity.
    /// Updated with `fetch_max`, so stored values never decrease.
    last_activity_ms: AtomicU64,
    debounce_ms: u64,
    source_count: AtomicUsize,
}

/// Debounced last-activity clock shared between interaction sources and the
/// lifecycle controller.
///
/// Cheap to clone; clones share state. Construction counts as activity at
/// time zero, which matches a session that begins right after the user
/// authenticated.
#[derive(Clone)]
pub struct ActivityTracker {
    inner: Arc<TrackerInner>,
}

impl ActivityTracker {
    /// Create a tracker with the given debounce window.
    pub fn new(debounce: Duration) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                epoch: Instant::now(),
                last_activity_ms: AtomicU64::new(0),
                debounce_ms: debounce.as_millis() as u64,
                source_count: AtomicUsize::new(0),
            }),
        }
    }

    /// Register an interaction source.
    ///
    /// The returned guard is the only way to record activity. Dropping it
    /// deregisters the source.
    pub fn register(&self, kind: SourceKind) -> ActivitySource {
        let count = self.inner.source_count.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            event = "core.activity.source_registered",
            kind = kind.as_str(),
            source_count = count
        );
        ActivitySource {
            inner: Arc::clone(&self.inner),
            kind,
        }
    }

    /// Time since the last recorded activity.
    pub fn idle_time(&self) -> Duration {
        let now_ms = self.inner.epoch.elapsed().as_millis() as u64;
        let last_ms = self.inner.last_activity_ms.load(Ordering::Relaxed);
        Duration::from_millis(now_ms.saturating_sub(last_ms))
    }

    /// Instant of the last recorded activity.
    pub fn last_activity_at(&self) -> Instant {
        let last_ms = self.inner.last_activity_ms.load(Ordering::Relaxed);
        self.inner.epoch + Duration::from_millis(last_ms)
    }

    /// Number of currently registered sources.
    pub fn source_count(&self) -> usize {
        self.inner.source_count.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for ActivityTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityTracker")
            .field("idle_time", &self.idle_time())
            .field("source_count", &self.source_count())
            .finish()
    }
}

/// Registration guard for one interaction source.
///
/// Records activity into the tracker it was registered with. Deregisters
/// on drop.
pub struct ActivitySource {
    inner: Arc<TrackerInner>,
    kind: SourceKind,
}

impl ActivitySource {
    /// Record a user interaction at the current instant.
    ///
    /// Interactions within the debounce window of the stored timestamp are
    /// coalesced into it. Stored timestamps never move backwards even under
    /// concurrent recording.
    pub fn record(&self) {
        let now_ms = self.inner.epoch.elapsed().as_millis() as u64;
        let last_ms = self.inner.last_activity_ms.load(Ordering::Relaxed);

        if now_ms.saturating_sub(last_ms) < self.inner.debounce_ms {
            return;
        }

        self.inner.last_activity_ms.fetch_max(now_ms, Ordering::Relaxed);
    }

    /// The kind this source registered as.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }
}

impl Drop for ActivitySource {
    fn drop(&mut self) {
        let count = self.inner.source_count.fetch_sub(1, Ordering::Relaxed) - 1;
        debug!(
            event = "core.activity.source_deregistered",
            kind = self.kind.as_str(),
            source_count = count
        );
    }
}

impl std::fmt::Debug for ActivitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivitySource")
            .field("kind", &self.kind)
            .finish()
    }
}
