use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initializes structured logging once at process startup. Level is
/// driven by `RUST_LOG`, defaulting to `info` — mirrors the teacher's
/// logger bootstrap, swapped to `tracing-subscriber` for structured
/// per-request spans (spec ambient stack, §A.2).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global tracing subscriber already set");
    }
}
