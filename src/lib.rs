pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod service;
pub mod session;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use tracing_subscriber::EnvFilter;

pub fn init_tracing(log_level: &str, json_format: bool) {
    // Configure logging with environment variable support
    // RUST_LOG environment variable can be used for fine-grained control per module:
    // Examples:
    //   RUST_LOG=debug                         - Set all to debug
    //   RUST_LOG=estate_desk=debug             - Set this crate to debug
    //   RUST_LOG=estate_desk::session=trace    - Set specific module to trace
    //   RUST_LOG=info,estate_desk::api=debug   - Global info, api at debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
