//! blogtoc CLI Library
//!
//! Command implementations for the `blogtoc` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, annotate, check)

pub mod cmd;

pub use blogtoc_core::Config;
pub use blogtoc_generator::{BuildStats, Builder};

/// Initialize tracing with the specified verbosity level.
///
/// `0` logs warnings, `1` info, `2` debug and anything higher trace.
/// `RUST_LOG` directives are honoured as well.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
