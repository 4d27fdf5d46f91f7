// Tracing initialization for the command-line binary

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_tracing(log_level: &str, json_output: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    let subscriber = Registry::default().with(env_filter);

    if json_output {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(subscriber.with(json_layer))?;
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer))?;
    }

    Ok(())
}
