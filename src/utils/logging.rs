// src/utils/logging.rs
//! Logging configuration and utilities
//!
//! Sets up `env_logger` with the node's log line format:
//! `[<unix seconds> <level> <module>:<line>] <message>` on stdout.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;

/// Initializes logging for normal commands
///
/// `RUST_LOG` wins when set; otherwise `level` (typically from the config
/// file) is used, falling back to `info` when absent or unparsable.
pub fn init_logging(level: Option<&str>) {
    let mut builder = common_log_config();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else {
        let filter = level
            .and_then(|l| l.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        builder.filter_level(filter);
    }

    // A second init (tests, embedding) is not an error worth reporting
    let _ = builder.try_init();
}

/// Configures benchmark-specific logging
///
/// Defaults to `debug` so per-thread hash rates are visible.
pub fn init_bench_logging() {
    let mut builder = common_log_config();

    if env::var("RUST_LOG").is_err() {
        builder.filter_level(LevelFilter::Debug);
    } else {
        builder.parse_env("RUST_LOG");
    }

    let _ = builder.try_init();
}

fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            use std::io::Write;
            let ts = buf.timestamp_seconds();
            let level = record.level();
            let module = record.module_path().unwrap_or_default();
            let line = record.line().unwrap_or(0);

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                ts,
                level,
                module,
                line,
                record.args()
            )
        })
        .target(Target::Stdout);

    builder
}
