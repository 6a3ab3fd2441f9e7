//! Session lifecycle controller.
//!
//! A spawned controller task exclusively owns the session's runtime state
//! and drives it through `active -> warning -> terminated`, with `warning ->
//! active` on renewed user activity. Once per second it evaluates four rules
//! against the tracker's idle time, in fixed order:
//!
//! 1. Silent refresh: the user is comfortably active and the token is at
//!    80% of its refresh interval, so rotate it in the background.
//! 2. Enter warning: idle time crossed the warning threshold; open the
//!    dialog with the remaining seconds until timeout.
//! 3. Return to active: activity resumed during the warning; dismiss it.
//! 4. Hard expiry: idle time passed the timeout plus grace without the
//!    warning ever showing (e.g. the host was suspended); force logout.
//!
//! While in warning, an independent 1-second countdown ticker decrements
//! the displayed value and triggers logout at zero. Its first tick fires
//! immediately on entry, so a dialog opening with 60 reaches zero 59
//! seconds later.
//!
//! User actions, refresh completions, and snapshot requests all arrive over
//! one command channel, so every state mutation happens on the controller
//! task. Teardown cancels the controller's token: in-flight gateway calls
//! are abandoned and their completions become no-ops, with no logout and no
//! event emitted.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::activity::{ActivitySource, ActivityTracker, SourceKind};
use crate::config::LifecycleTimings;
use crate::session::errors::{GatewayError, SessionError};
use crate::session::gateway::{RefreshGateway, RotatedToken};
use crate::session::types::{
    LifecycleSnapshot, RuntimeState, SessionEvent, SessionPhase, TerminationReason, WarningState,
};

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Commands processed by the controller task.
#[derive(Debug)]
enum Command {
    Extend,
    Logout,
    Snapshot(oneshot::Sender<LifecycleSnapshot>),
    RefreshResolved {
        origin: RefreshOrigin,
        result: Result<RotatedToken, GatewayError>,
    },
}

/// Why a refresh was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshOrigin {
    /// The evaluation tick found the token due for rotation.
    Scheduled,
    /// The user asked to stay signed in.
    Extend,
}

impl RefreshOrigin {
    fn as_str(&self) -> &'static str {
        match self {
            RefreshOrigin::Scheduled => "scheduled",
            RefreshOrigin::Extend => "extend",
        }
    }
}

/// The controller task's state and collaborators.
///
/// Constructed by [`SessionController::spawn`] and moved into the run loop;
/// external code interacts through the returned [`SessionHandle`].
pub struct SessionController {
    session_id: String,
    timings: LifecycleTimings,
    tracker: ActivityTracker,
    gateway: Arc<dyn RefreshGateway>,
    state: RuntimeState,
    refresh_in_flight: bool,
    /// An extend arrived while a refresh was outstanding; apply extend
    /// semantics when that refresh resolves.
    extend_pending: bool,
    logout_issued: bool,
    /// The controller's own activity source: a successful extend counts as
    /// a qualifying interaction.
    extend_source: ActivitySource,
    command_tx: mpsc::UnboundedSender<Command>,
    warning_tx: watch::Sender<WarningState>,
    phase_tx: watch::Sender<SessionPhase>,
    event_tx: broadcast::Sender<SessionEvent>,
    cancel: CancellationToken,
}

impl SessionController {
    /// Spawn a controller task for one session.
    ///
    /// The session starts in `active` with the refresh clock at zero (the
    /// host has just authenticated). The returned handle owns the task:
    /// dropping it tears the controller down.
    pub fn spawn(
        timings: LifecycleTimings,
        tracker: ActivityTracker,
        gateway: Arc<dyn RefreshGateway>,
    ) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (warning_tx, warning_rx) = watch::channel(WarningState::hidden());
        let (phase_tx, phase_rx) = watch::channel(SessionPhase::Active);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let session_id = Uuid::new_v4().to_string();
        let extend_source = tracker.register(SourceKind::Lifecycle);

        info!(
            event = "core.session.started",
            session_id = %session_id,
            refresh_interval_ms = timings.refresh_interval.as_millis() as u64,
            warning_threshold_ms = timings.warning_threshold().as_millis() as u64,
            grace_period_ms = timings.grace_period.as_millis() as u64,
        );

        let controller = SessionController {
            session_id: session_id.clone(),
            timings,
            tracker,
            gateway,
            state: RuntimeState::new(),
            refresh_in_flight: false,
            extend_pending: false,
            logout_issued: false,
            extend_source,
            command_tx: command_tx.clone(),
            warning_tx,
            phase_tx,
            event_tx: event_tx.clone(),
            cancel: cancel.clone(),
        };

        let join = tokio::spawn(controller.run(command_rx));

        SessionHandle {
            session_id,
            command_tx,
            warning_rx,
            phase_rx,
            event_tx,
            cancel,
            join: Some(join),
        }
    }

    async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<Command>) {
        let cancel = self.cancel.clone();

        let mut eval = interval(self.timings.tick_period);
        eval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Replaced with a fresh interval on every warning entry; only
        // polled while the phase is warning.
        let mut countdown = interval(self.timings.tick_period);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(
                        event = "core.session.run_loop_cancelled",
                        session_id = %self.session_id
                    );
                    break;
                }
                _ = eval.tick() => {
                    if let Some(fresh) = self.evaluate() {
                        countdown = fresh;
                    }
                }
                _ = countdown.tick(), if self.state.phase == SessionPhase::Warning => {
                    self.countdown_tick();
                }
                Some(command) = command_rx.recv() => {
                    self.handle_command(command);
                }
            }

            if self.state.phase.is_terminated() {
                // Reap any in-flight refresh task.
                self.cancel.cancel();
                break;
            }
        }

        debug!(
            event = "core.session.run_loop_exited",
            session_id = %self.session_id,
            phase = self.state.phase.as_str()
        );
    }

    /// Evaluate the transition rules against current idle time.
    ///
    /// Returns a fresh countdown interval when the warning phase was just
    /// entered.
    fn evaluate(&mut self) -> Option<Interval> {
        let idle = self.tracker.idle_time();
        let since_refresh = self.state.last_refresh_at.elapsed();
        let mut fresh_countdown = None;

        // Rule 1: silent refresh while comfortably active
        if idle < self.timings.warning_threshold()
            && since_refresh >= self.timings.refresh_after()
        {
            self.start_refresh(RefreshOrigin::Scheduled);
        }

        // Rule 2: enter the warning phase
        if self.state.phase == SessionPhase::Active
            && idle >= self.timings.warning_threshold()
            && idle < self.timings.total_idle_timeout()
        {
            let remaining_ms = (self.timings.total_idle_timeout() - idle).as_millis() as u64;
            let remaining =
                u32::try_from(remaining_ms.div_ceil(1_000)).unwrap_or(u32::MAX);

            self.state.phase = SessionPhase::Warning;
            self.state.warning_remaining = remaining;

            info!(
                event = "core.session.warning_entered",
                session_id = %self.session_id,
                idle_ms = idle.as_millis() as u64,
                remaining_seconds = remaining,
            );

            let _ = self.warning_tx.send(WarningState::open(remaining));
            let _ = self.phase_tx.send(SessionPhase::Warning);
            let _ = self.event_tx.send(SessionEvent::WarningOpened {
                remaining_seconds: remaining,
            });

            let mut countdown = interval(self.timings.tick_period);
            countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);
            fresh_countdown = Some(countdown);
        }

        // Rule 3: renewed activity dismisses the warning
        if self.state.phase == SessionPhase::Warning && idle < self.timings.warning_threshold()
        {
            self.return_to_active(idle);
        }

        // Rule 4: hard expiry for sessions that never saw the warning
        if self.state.phase != SessionPhase::Warning && idle >= self.timings.hard_expiry() {
            warn!(
                event = "core.session.hard_expired",
                session_id = %self.session_id,
                idle_ms = idle.as_millis() as u64,
            );
            self.force_logout(TerminationReason::IdleTimeout);
        }

        fresh_countdown
    }

    fn countdown_tick(&mut self) {
        self.state.warning_remaining = self.state.warning_remaining.saturating_sub(1);

        debug!(
            event = "core.session.countdown_tick",
            session_id = %self.session_id,
            remaining_seconds = self.state.warning_remaining,
        );

        let _ = self
            .warning_tx
            .send(WarningState::open(self.state.warning_remaining));

        if self.state.warning_remaining == 0 {
            info!(
                event = "core.session.countdown_expired",
                session_id = %self.session_id
            );
            self.force_logout(TerminationReason::CountdownExpired);
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Extend => {
                info!(
                    event = "core.session.extend_requested",
                    session_id = %self.session_id
                );
                self.start_refresh(RefreshOrigin::Extend);
            }
            Command::Logout => {
                info!(
                    event = "core.session.logout_requested",
                    session_id = %self.session_id
                );
                self.force_logout(TerminationReason::UserLogout);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::RefreshResolved { origin, result } => {
                self.handle_refresh_resolved(origin, result);
            }
        }
    }

    /// Issue a gateway refresh unless one is already in flight.
    ///
    /// The call runs as a cancellable task and reports back over the
    /// command channel, so the controller keeps ticking while the network
    /// call is outstanding. A second scheduled trigger is dropped; an
    /// extend is deferred onto the outstanding call instead.
    fn start_refresh(&mut self, origin: RefreshOrigin) {
        if self.refresh_in_flight {
            if origin == RefreshOrigin::Extend {
                // The outstanding call's result answers the click.
                self.extend_pending = true;
                debug!(
                    event = "core.session.extend_deferred",
                    session_id = %self.session_id,
                );
            } else {
                debug!(
                    event = "core.session.refresh_suppressed",
                    session_id = %self.session_id,
                    origin = origin.as_str(),
                );
            }
            return;
        }
        self.refresh_in_flight = true;

        info!(
            event = "core.session.refresh_started",
            session_id = %self.session_id,
            origin = origin.as_str(),
        );

        let gateway = Arc::clone(&self.gateway);
        let command_tx = self.command_tx.clone();
        let cancel = self.cancel.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = gateway.refresh() => {
                    let _ = command_tx.send(Command::RefreshResolved { origin, result });
                }
            }
        });
    }

    fn handle_refresh_resolved(
        &mut self,
        origin: RefreshOrigin,
        result: Result<RotatedToken, GatewayError>,
    ) {
        self.refresh_in_flight = false;

        match result {
            Ok(rotated) => {
                self.state.last_refresh_at = Instant::now();

                info!(
                    event = "core.session.refresh_completed",
                    session_id = %self.session_id,
                    origin = origin.as_str(),
                );

                if origin == RefreshOrigin::Extend || self.extend_pending {
                    self.extend_pending = false;
                    // The extend click is itself a qualifying interaction,
                    // but only once the backend confirmed the session.
                    self.extend_source.record();
                    if self.state.phase == SessionPhase::Warning {
                        self.return_to_active(self.tracker.idle_time());
                    }
                }

                let _ = self.event_tx.send(SessionEvent::TokenRefreshed {
                    token: rotated.token,
                    rotated_at: Utc::now(),
                });
            }
            Err(e) => {
                error!(
                    event = "core.session.refresh_failed",
                    session_id = %self.session_id,
                    origin = origin.as_str(),
                    error = %e,
                );
                // Fail closed: an unconfirmed session is a dead session.
                self.force_logout(TerminationReason::RefreshFailed);
            }
        }
    }

    fn return_to_active(&mut self, idle: Duration) {
        info!(
            event = "core.session.warning_dismissed",
            session_id = %self.session_id,
            idle_ms = idle.as_millis() as u64,
        );

        self.state.phase = SessionPhase::Active;
        self.state.warning_remaining = 0;
        let _ = self.warning_tx.send(WarningState::hidden());
        let _ = self.phase_tx.send(SessionPhase::Active);
    }

    /// Terminate the session and issue the best-effort backend logout.
    ///
    /// Idempotent: the backend call happens at most once, however many
    /// paths (countdown, user click, hard expiry, failed refresh) race
    /// into this.
    fn force_logout(&mut self, reason: TerminationReason) {
        if self.logout_issued {
            debug!(
                event = "core.session.logout_already_issued",
                session_id = %self.session_id,
                reason = reason.as_str(),
            );
            return;
        }
        self.logout_issued = true;

        info!(
            event = "core.session.logout_started",
            session_id = %self.session_id,
            reason = reason.as_str(),
        );

        self.state.phase = SessionPhase::Terminated;
        self.state.warning_remaining = 0;
        let _ = self.warning_tx.send(WarningState::hidden());
        let _ = self.phase_tx.send(SessionPhase::Terminated);
        let _ = self.event_tx.send(SessionEvent::Terminated {
            reason,
            at: Utc::now(),
        });

        // Detached on purpose: a backend logout already issued should not
        // be aborted by teardown.
        let gateway = Arc::clone(&self.gateway);
        let session_id = self.session_id.clone();
        tokio::spawn(async move {
            match gateway.logout().await {
                Ok(()) => {
                    info!(
                        event = "core.session.logout_completed",
                        session_id = %session_id
                    );
                }
                Err(e) => {
                    warn!(
                        event = "core.session.backend_logout_failed",
                        session_id = %session_id,
                        error = %e,
                    );
                }
            }
        });
    }

    fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            session_id: self.session_id.clone(),
            phase: self.state.phase,
            idle_ms: self.tracker.idle_time().as_millis() as u64,
            since_refresh_ms: self.state.last_refresh_at.elapsed().as_millis() as u64,
            warning_remaining_seconds: self.state.warning_remaining,
            refresh_in_flight: self.refresh_in_flight,
        }
    }
}

/// Owning handle to a spawned controller.
///
/// The warning presenter reads [`SessionHandle::warning_state`] and calls
/// [`SessionHandle::extend`] / [`SessionHandle::logout`] for the user's
/// choice. Hosts subscribe to [`SessionHandle::subscribe`] to persist
/// rotated tokens and react to termination. Dropping the handle cancels
/// the controller task without logging the session out.
pub struct SessionHandle {
    session_id: String,
    command_tx: mpsc::UnboundedSender<Command>,
    warning_rx: watch::Receiver<WarningState>,
    phase_rx: watch::Receiver<SessionPhase>,
    event_tx: broadcast::Sender<SessionEvent>,
    cancel: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The user asked to stay signed in.
    ///
    /// Fire-and-forget: ignored once the session has terminated. If a
    /// refresh is already outstanding, no second call is issued and that
    /// call's result answers this request.
    pub fn extend(&self) {
        if self.command_tx.send(Command::Extend).is_err() {
            debug!(
                event = "core.session.extend_ignored",
                session_id = %self.session_id,
                message = "controller already stopped"
            );
        }
    }

    /// The user asked to log out now.
    ///
    /// Fire-and-forget: ignored once the session has terminated.
    pub fn logout(&self) {
        if self.command_tx.send(Command::Logout).is_err() {
            debug!(
                event = "core.session.logout_ignored",
                session_id = %self.session_id,
                message = "controller already stopped"
            );
        }
    }

    /// Watch channel carrying what the warning dialog should render.
    pub fn warning_state(&self) -> watch::Receiver<WarningState> {
        self.warning_rx.clone()
    }

    /// Watch channel carrying the session phase.
    pub fn phase(&self) -> watch::Receiver<SessionPhase> {
        self.phase_rx.clone()
    }

    /// The phase right now.
    pub fn current_phase(&self) -> SessionPhase {
        *self.phase_rx.borrow()
    }

    /// Subscribe to session events (token rotations, warning entry,
    /// termination).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Ask the controller for a point-in-time state snapshot.
    pub async fn snapshot(&self) -> Result<LifecycleSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Snapshot(reply_tx))
            .map_err(|_| SessionError::Terminated)?;
        reply_rx.await.map_err(|_| SessionError::Terminated)
    }

    /// Tear the controller down and wait for it to finish.
    ///
    /// Not a logout: no backend call is made and no termination event is
    /// emitted. Scheduled work is cancelled and in-flight refresh
    /// completions become no-ops.
    pub async fn shutdown(mut self) -> Result<(), SessionError> {
        info!(
            event = "core.session.shutdown_started",
            session_id = %self.session_id
        );
        self.cancel.cancel();

        if let Some(join) = self.join.take() {
            join.await.map_err(|e| SessionError::ShutdownFailed {
                message: e.to_string(),
            })?;
        }

        info!(
            event = "core.session.shutdown_completed",
            session_id = %self.session_id
        );
        Ok(())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session_id", &self.session_id)
            .field("phase", &*self.phase_rx.borrow())
            .finish()
    }
}
