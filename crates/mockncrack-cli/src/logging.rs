//! Log sink setup
//!
//! Every line passes through the core [`Redactor`] before it is written, so
//! provider keys and the JWT secret never reach the output at any level.

use std::io::Write;

use mockncrack_core::redact::Redactor;
use mockncrack_core::OperatingMode;

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(mode: OperatingMode) -> &'static str {
    if mode.is_development() {
        "debug,sqlx=warn,hyper=info,reqwest=info"
    } else {
        "info,sqlx=warn"
    }
}

/// Install the global logger. Safe to call more than once.
pub fn init(mode: OperatingMode, redactor: Redactor) {
    let env = env_logger::Env::default().default_filter_or(default_filter(mode));

    let _ = env_logger::Builder::from_env(env)
        .format(move |buf, record| {
            let line = redactor.redact(&record.args().to_string());
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                buf.timestamp(),
                record.level(),
                record.target(),
                line
            )
        })
        .try_init();
}
