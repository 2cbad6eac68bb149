//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
/// `--verbose`. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};

    #[test]
    fn init_twice_does_not_panic() {
        init(false);
        init(true);

        info!("This is an info message");
        warn!("This is a warning message");
    }
}
