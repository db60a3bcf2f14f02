use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Install the global subscriber. Messages go to stderr so reports printed
/// on stdout stay clean.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `info` over the
/// default `warn`.
pub fn init_subscriber(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let filter_layer = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    // A second initialisation (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}
