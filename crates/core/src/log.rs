use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
    EnvFilter,
};

/// Install a global tracing subscriber for frontends embedding the core.
///
/// `RUST_LOG` wins when set; otherwise `verbose` switches this crate's
/// output between `debug` and off. Returns `false` if a subscriber was
/// already installed.
pub fn init_logging(verbose: bool) -> bool {
    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::OFF, "off")
    };
    let app_filter = Targets::new().with_target("couple_finance_core", level_filter);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(app_filter)
        .with(env_filter)
        .try_init()
        .is_ok()
}
