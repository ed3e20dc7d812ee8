//! Initialisation du logging depuis la configuration

use pmoconfig::Config;
use std::io;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Installe le subscriber tracing
///
/// `RUST_LOG` prime sur `host.logger.min_level`. Si la console est
/// désactivée dans la configuration, les logs sont jetés.
pub fn init_tracing(config: &Config) {
    let level = config
        .get_log_min_level()
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = if config.get_log_enable_console().unwrap_or(true) {
        BoxMakeWriter::new(io::stderr)
    } else {
        BoxMakeWriter::new(io::sink)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_target(true)
        .try_init();
}
