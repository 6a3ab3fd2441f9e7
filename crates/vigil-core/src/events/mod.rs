use tracing::{error, info, warn};

use crate::errors::VigilError;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id()
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started", pid = std::process::id());
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}

/// Log an error through the vigil taxonomy.
///
/// User errors (malformed config, bad input) log at warn with their code;
/// everything else logs at error.
pub fn log_vigil_error(error: &dyn VigilError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.user_error_occurred",
            error = %error,
            code = error.error_code()
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %error,
            code = error.error_code()
        );
    }
}
