//! Logger setup.
//!
//! Uses `env_logger` behind the `log` facade. When `RUST_LOG` is set it wins;
//! otherwise this crate logs at DEBUG in debug builds and INFO in release, and
//! every other crate is silenced.

use chrono::Utc;
use env_logger::fmt::Formatter;
use log::{LevelFilter, Record};
use std::io::Write;

const CRATE_TARGET: &str = "roi_configurator";

pub fn setup_logger() {
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else {
        builder.filter(None, LevelFilter::Off);
        if cfg!(debug_assertions) {
            builder.filter(Some(CRATE_TARGET), LevelFilter::Debug);
        } else {
            builder.filter(Some(CRATE_TARGET), LevelFilter::Info);
        }
    }

    builder.format(|buf: &mut Formatter, record: &Record| {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let location = match (record.module_path(), record.line()) {
            (Some(module), Some(line)) => format!("{module}:{line}"),
            (Some(module), None) => module.to_string(),
            _ => "unknown".to_string(),
        };
        writeln!(
            buf,
            "{timestamp} {:<5} {location} {}",
            record.level(),
            record.args()
        )
    });

    // A second init (e.g. from tests) is harmless.
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
