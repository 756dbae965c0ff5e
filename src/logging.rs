use crate::config::ENV_LOG;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber. The filter comes from `TREEPANEL_LOG`
/// and defaults to `warn`; stdout stays reserved for output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
