//! Diagnostic tracing to stderr.
//!
//! `RUST_LOG` wins when set; otherwise `-v` raises the default level from
//! `warn` to `info`, and `-vv` to `debug`.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
