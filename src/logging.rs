// Log output for the binary. The library only emits events.
use tracing_subscriber::{EnvFilter, fmt};

// Install a stderr subscriber so that command output on stdout stays clean.
// Calling this twice is harmless, the second subscriber is ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::new(format!("league_engine={level},league={level},sqlx=warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
