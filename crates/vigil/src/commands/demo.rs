use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use clap::ArgMatches;
use tracing::{error, info};

use vigil_core::config::LifecycleTimings;
use vigil_core::events;
use vigil_core::{
    ActivityTracker, GatewayError, RefreshGateway, RotatedToken, SessionController, SessionEvent,
    SourceKind, TerminationReason,
};

use super::helpers::load_config_with_warning;

/// In-process gateway backing the demo.
///
/// Rotates numbered fake tokens; `fail_after` makes the Nth refresh fail so
/// the fail-closed path can be watched.
struct DemoGateway {
    refresh_calls: AtomicUsize,
    fail_after: Option<usize>,
}

impl DemoGateway {
    fn new(fail_after: Option<usize>) -> Self {
        Self {
            refresh_calls: AtomicUsize::new(0),
            fail_after,
        }
    }
}

#[async_trait]
impl RefreshGateway for DemoGateway {
    async fn refresh(&self) -> Result<RotatedToken, GatewayError> {
        let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_after == Some(call) {
            return Err(GatewayError::Backend { status: 401 });
        }
        Ok(RotatedToken::new(format!("demo-token-{call:04}")))
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

pub(crate) fn handle_demo_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let interval_override = matches.get_one::<String>("refresh-interval").cloned();
    let fail_after = matches.get_one::<usize>("fail-after").copied();

    info!(
        event = "cli.demo_started",
        interval_override = ?interval_override,
        fail_after = ?fail_after
    );

    let config = load_config_with_warning();
    let timings = match config.resolve_timings(interval_override.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to resolve timings: {}", e);
            error!(event = "cli.demo_failed", error = %e);
            events::log_vigil_error(&e);
            return Err(e.into());
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(run_demo(timings, fail_after)) {
        Ok(()) => {
            info!(event = "cli.demo_completed");
            Ok(())
        }
        Err(e) => {
            eprintln!("Demo failed: {}", e);
            error!(event = "cli.demo_failed", error = %e);
            events::log_app_error(e.as_ref());
            Err(e)
        }
    }
}

async fn run_demo(
    timings: LifecycleTimings,
    fail_after: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = ActivityTracker::new(timings.debounce);
    let keyboard = tracker.register(SourceKind::Keyboard);
    let gateway = Arc::new(DemoGateway::new(fail_after));
    let handle = SessionController::spawn(timings, tracker, gateway);

    println!("Session {} started.", handle.session_id());
    println!(
        "  refresh interval {:?}, warning after {:?} idle, countdown {:?}",
        timings.refresh_interval,
        timings.warning_threshold(),
        timings.warning_duration
    );
    println!("Type anything to record activity, 'e' to extend, 'q' to log out, Ctrl-C to quit.");

    // Stdin stays on a plain detached thread: a blocking read must not keep
    // the runtime from shutting down.
    let (line_tx, mut line_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        use std::io::BufRead;
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut warning = handle.warning_state();
    let mut events_rx = handle.subscribe();
    let mut warning_alive = true;
    let mut warning_open = false;
    let mut stdin_open = true;

    let interrupted = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                break true;
            }
            changed = warning.changed(), if warning_alive => {
                if changed.is_err() {
                    // Controller gone; the terminal event arrives on the
                    // event channel
                    warning_alive = false;
                    continue;
                }
                let state = *warning.borrow_and_update();
                if state.is_open {
                    println!(
                        "⚠️  Logging out in {} seconds ('e' to extend, any input to stay signed in)",
                        state.remaining_seconds
                    );
                    warning_open = true;
                } else if warning_open {
                    println!("✅ Session active again.");
                    warning_open = false;
                }
            }
            event = events_rx.recv() => {
                use tokio::sync::broadcast::error::RecvError;
                match event {
                    Ok(SessionEvent::TokenRefreshed { token, .. }) => {
                        println!("🔄 Token rotated: {}", token);
                    }
                    Ok(SessionEvent::WarningOpened { .. }) => {}
                    Ok(SessionEvent::Terminated { reason, .. }) => {
                        match reason {
                            TerminationReason::UserLogout => println!("✅ Logged out."),
                            other => println!("❌ Session terminated ({})", other),
                        }
                        break false;
                    }
                    Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break false,
                }
            }
            line = line_rx.recv(), if stdin_open => {
                let Some(line) = line else {
                    stdin_open = false;
                    continue;
                };
                match line.trim() {
                    "q" => handle.logout(),
                    "e" => handle.extend(),
                    _ => keyboard.record(),
                }
            }
        }
    };

    if interrupted {
        println!("Interrupted. Tearing down without logging out.");
        events::log_app_shutdown();
        handle.shutdown().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_gateway_rotates_numbered_tokens() {
        let gateway = DemoGateway::new(None);

        let first = gateway.refresh().await.unwrap();
        let second = gateway.refresh().await.unwrap();

        assert_eq!(first.token, "demo-token-0001");
        assert_eq!(second.token, "demo-token-0002");
    }

    #[tokio::test]
    async fn test_demo_gateway_fails_nth_refresh() {
        let gateway = DemoGateway::new(Some(2));

        assert!(gateway.refresh().await.is_ok());
        let err = gateway.refresh().await.unwrap_err();
        assert!(matches!(err, GatewayError::Backend { status: 401 }));
    }

    #[tokio::test]
    async fn test_demo_gateway_logout_succeeds() {
        let gateway = DemoGateway::new(Some(1));
        assert!(gateway.logout().await.is_ok());
    }
}
