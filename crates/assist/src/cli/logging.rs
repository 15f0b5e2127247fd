//! Diagnostics go to stderr through `tracing`, so they never mix with the
//! output of a command. `ASSIST_LOG` takes an `EnvFilter` directive
//! (e.g. `ASSIST_LOG=assistapp=debug`); without it the level is `warn`, or
//! `debug` with `--verbose`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ASSIST_LOG";

pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
