use clap::ArgMatches;
use tracing::error;

use vigil_core::events;

pub mod helpers;

mod demo;
mod timings;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("timings", sub_matches)) => timings::handle_timings_command(sub_matches),
        Some(("demo", sub_matches)) => demo::handle_demo_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
