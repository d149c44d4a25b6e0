use crate::config::cli::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins when set; otherwise `verbose` picks debug for this crate.
fn filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "cv_screen=debug,info"
    } else {
        "cv_screen=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs the global subscriber. Logs go to stderr so stdout only carries
/// the final run line.
pub fn init_logger(verbose: bool, format: LogFormat) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter(verbose));
    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        // one object per line for log collectors
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}
