use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logs go to stderr so stdout stays clean for `--json` and `--section`.
/// `RUST_LOG` wins over the verbosity flag.
pub fn init(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "vidbrief=info,vidbrief_core=info",
        _ => "vidbrief=debug,vidbrief_core=debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
