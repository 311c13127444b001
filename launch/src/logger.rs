use heimdall::tracing::dispatcher::DefaultGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// RUST_LOG selects per-module levels; an unparsable filter degrades to the
// fallback instead of silencing the binary.
fn env_filter(fallback: &str) -> EnvFilter {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives).unwrap_or_else(|err| {
            eprintln!(
                "bad {} value '{}' ({}), logging at '{}'",
                EnvFilter::DEFAULT_ENV,
                directives,
                err,
                fallback
            );
            EnvFilter::new(fallback)
        }),
        Err(_) => EnvFilter::new(fallback),
    }
}

/// Global subscriber for the monitor and cli binaries.
///
/// Session events arrive interleaved with graph updates and planner
/// queries, so every line keeps its emitting module.
pub fn init_logger() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(true))
        .with(env_filter("info"))
        .init();
}

/// Scoped subscriber for tests, torn down with the returned guard.
#[must_use]
pub fn init_test_logger() -> DefaultGuard {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer().without_time())
        .with(env_filter("debug"))
        .set_default()
}
