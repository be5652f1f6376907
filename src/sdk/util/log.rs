use env_logger::{Builder, Env};

/// Initialises `env_logger`. `RUST_LOG` wins; otherwise each `-v` raises the
/// default from `info` to `debug` and then `trace`.
pub fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}
