use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber for a console program.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or progress
/// messages as well when `verbose` is on. Logs go to stderr so they never
/// interleave with the program's answers on stdout.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
