use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug` and the
/// default is `warn`, which still reports a failing stream.
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
