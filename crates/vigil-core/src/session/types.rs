//! Session lifecycle type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Phase of a supervised session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// User activity is recent; nothing is shown.
    Active,
    /// The logout warning dialog is visible and counting down.
    Warning,
    /// The session has ended. Terminal: there is no way back.
    Terminated,
}

impl SessionPhase {
    /// Get the canonical string name for this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Active => "active",
            SessionPhase::Warning => "warning",
            SessionPhase::Terminated => "terminated",
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, SessionPhase::Terminated)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the warning presenter should currently render.
///
/// Published on the warning watch channel: `is_open` toggles the dialog,
/// `remaining_seconds` is the countdown value to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningState {
    pub is_open: bool,
    pub remaining_seconds: u32,
}

impl WarningState {
    /// Dialog closed.
    pub fn hidden() -> Self {
        Self {
            is_open: false,
            remaining_seconds: 0,
        }
    }

    /// Dialog open with the given countdown value.
    pub fn open(remaining_seconds: u32) -> Self {
        Self {
            is_open: true,
            remaining_seconds,
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The user chose to log out.
    UserLogout,
    /// The warning countdown reached zero with no user response.
    CountdownExpired,
    /// Idle time passed the hard-expiry point without the warning ever
    /// being shown.
    IdleTimeout,
    /// A token refresh failed; the session cannot be assumed valid.
    RefreshFailed,
}

impl TerminationReason {
    /// Get the canonical string name for this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::UserLogout => "user_logout",
            TerminationReason::CountdownExpired => "countdown_expired",
            TerminationReason::IdleTimeout => "idle_timeout",
            TerminationReason::RefreshFailed => "refresh_failed",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notifications emitted on the session event channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A refresh succeeded and the host should persist the rotated token.
    TokenRefreshed {
        token: String,
        rotated_at: DateTime<Utc>,
    },
    /// The warning dialog opened with this initial countdown value.
    /// Subsequent countdown values flow on the warning watch channel.
    WarningOpened { remaining_seconds: u32 },
    /// The session ended. Emitted exactly once.
    Terminated {
        reason: TerminationReason,
        at: DateTime<Utc>,
    },
}

/// Point-in-time view of controller state, for hosts and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleSnapshot {
    pub session_id: String,
    pub phase: SessionPhase,
    pub idle_ms: u64,
    pub since_refresh_ms: u64,
    pub warning_remaining_seconds: u32,
    pub refresh_in_flight: bool,
}

/// Mutable controller state.
///
/// Owned exclusively by the controller task; every mutation happens inside
/// its run loop.
#[derive(Debug)]
pub(crate) struct RuntimeState {
    pub phase: SessionPhase,
    /// Updated only when a refresh succeeds.
    pub last_refresh_at: Instant,
    /// Countdown value; meaningful only while `phase` is `Warning`.
    pub warning_remaining: u32,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Active,
            last_refresh_at: Instant::now(),
            warning_remaining: 0,
        }
    }
}
