//! Logging initialization for the `loom` binary
//!
//! Log output goes to stderr so that stdout carries only command results.
//! `RUST_LOG` takes precedence over the verbosity flag.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl LoggingConfig {
    fn level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

pub fn init_logging(config: LoggingConfig) {
    let subscriber = tracing_subscriber::registry().with(build_env_filter(config));

    if config.json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    tracing::debug!(json = config.json, "Logging initialized");
}

fn build_env_filter(config: LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "loom={level},loom_models={level},loom_validator={level}",
            level = config.level()
        ))
    })
}
