use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn build_cli() -> Command {
    Command::new("vigil")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Keep authenticated sessions alive with silent token refresh and idle logout")
        .long_about(
            "Vigil supervises an authenticated session: it watches user activity, \
            silently rotates the auth token before it goes stale, warns the user \
            with a countdown when they have been idle too long, and logs them out \
            when the countdown runs dry. The 'demo' subcommand drives a full \
            session against an in-process gateway so the lifecycle can be watched \
            from a terminal.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("timings")
                .about("Resolve and print the lifecycle timing parameters")
                .arg(
                    Arg::new("refresh-interval")
                        .long("refresh-interval")
                        .short('i')
                        .help("Refresh interval as a duration string, e.g. '5m', '90s', '1h' (overrides config)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("demo")
                .about("Run a live session against a stub token gateway")
                .long_about(
                    "Runs a real lifecycle controller wired to an in-process gateway \
                    that rotates fake tokens. Stdin is the activity source: any input \
                    line records activity, 'e' requests an extension, 'q' logs out. \
                    Warning countdowns and session events are printed as they happen; \
                    the command exits when the session terminates (Ctrl-C tears the \
                    session down without logging out).",
                )
                .arg(
                    Arg::new("refresh-interval")
                        .long("refresh-interval")
                        .short('i')
                        .help("Refresh interval as a duration string, e.g. '5m', '90s', '1h' (overrides config)"),
                )
                .arg(
                    Arg::new("fail-after")
                        .long("fail-after")
                        .help("Make the Nth token refresh fail, demonstrating fail-closed termination")
                        .value_name("N")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
}

#[allow(dead_code)]
pub fn get_matches() -> ArgMatches {
    build_cli().get_matches()
}
