//! Tracing setup shared by the binaries.
//!
//! Events go to stderr. `RUST_LOG` overrides the level, which is otherwise
//! `info`, or `debug` with `verbose`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
