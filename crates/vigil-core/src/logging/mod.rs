use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize JSON logging on stderr with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted; otherwise
/// info-level and above. The mode directive is added on top of `RUST_LOG`,
/// so the selected mode wins over the environment for `vigil` targets.
pub fn init_logging(quiet: bool) {
    let directive = if quiet { "vigil=error" } else { "vigil=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive(directive.parse().expect("Invalid log directive")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_logging() {
        // A global subscriber can only be installed once per process, so the
        // real coverage lives in the CLI stderr tests (quiet default, -v,
        // RUST_LOG precedence). Nothing to assert in-process.
    }
}
