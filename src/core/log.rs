use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Targets enabled for a `-v` count: nothing by default, the app's own
/// events at `-v`, and HTTP client chatter from `-vv` on.
pub fn targets_for(verbosity: u8) -> Targets {
    match verbosity {
        0 => Targets::new(),
        1 => Targets::new().with_target("cambio", LevelFilter::DEBUG),
        _ => Targets::new()
            .with_target("cambio", LevelFilter::TRACE)
            .with_target("reqwest", LevelFilter::DEBUG),
    }
}

/// Installs the global subscriber on stderr so it never mixes with results.
/// `RUST_LOG` narrows what the `-v` count enables.
pub fn init_logging(verbosity: u8) {
    let default_level = if verbosity == 0 { "off" } else { "trace" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(targets_for(verbosity))
        .with(env_filter)
        .init();
}
