//! Log subscriber setup and stage timing.

use crate::config::LoggingConfig;
use crate::core::StageName;
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Returns false if a
/// subscriber was already installed, which is harmless.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    result.is_ok()
}

/// Measures how long one stage ran.
#[derive(Debug)]
pub struct StageTimer {
    start: Instant,
    stage: StageName,
}

impl StageTimer {
    /// Starts timing a stage.
    #[must_use]
    pub fn start(stage: StageName) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }

    /// The timed stage.
    #[must_use]
    pub fn stage(&self) -> StageName {
        self.stage
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}
