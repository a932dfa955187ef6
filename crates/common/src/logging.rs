//! Logging and tracing initialization.
//!
//! Logs go to stderr so the CLI can stream render records on stdout.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Targets that receive the configured level; everything else logs at `warn`.
const EYELINE_TARGETS: [&str; 5] = [
    "eyeline",
    "eyeline_common",
    "eyeline_alignment_core",
    "eyeline_tracking_engine",
    "eyeline_overlay_model",
];

/// Expand a configured level into filter directives.
///
/// A bare level such as `debug` applies to the eyeline crates only. A value
/// that already holds directives (`,` or `=`) is used as written.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return filter_directives("info");
    }
    if level.contains(',') || level.contains('=') {
        return level.to_string();
    }
    let mut directives = String::from("warn");
    for target in EYELINE_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.level)));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.with_target(true).compact().finish())
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_is_scoped_to_eyeline() {
        let directives = filter_directives("debug");
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("eyeline_tracking_engine=debug"));
        assert!(directives.contains("eyeline=debug"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_explicit_directives_pass_through() {
        assert_eq!(filter_directives("tokio=trace,info"), "tokio=trace,info");
    }

    #[test]
    fn test_empty_level_falls_back_to_info() {
        assert!(filter_directives("  ").contains("eyeline_common=info"));
    }
}
