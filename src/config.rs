//! Command line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::analysis::Pacing;
use crate::controller::{ControllerSettings, DEFAULT_HISTORY_CAP};
use crate::identify::{
    is_confidence_range, IdentificationService, RemoteConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL,
};

/// GreenLens - identify plants and keep track of watering
#[derive(Parser, Debug, Clone)]
#[command(name = "greenlens")]
#[command(about = "Local plant identification and watering tracker")]
pub struct Args {
    /// Address of the local view bridge
    #[arg(long, env = "LISTEN", default_value = "127.0.0.1:3030")]
    pub listen: SocketAddr,

    /// SQLite database file holding saved plants and preferences
    #[arg(long, env = "DATABASE_URL", default_value = "greenlens.db")]
    pub database_url: String,

    /// Gemini API key. Without one, identification uses the bundled catalog
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for recognition
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Base URL of the Gemini API
    #[arg(long, env = "GEMINI_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub gemini_endpoint: String,

    /// Number of waterings kept per plant
    #[arg(long, env = "HISTORY_CAP", default_value_t = DEFAULT_HISTORY_CAP)]
    pub history_cap: usize,

    /// Lower bound of mock identification confidence
    #[arg(long, env = "MOCK_CONFIDENCE_MIN", default_value_t = 0.85)]
    pub mock_confidence_min: f64,

    /// Upper bound (exclusive) of mock identification confidence
    #[arg(long, env = "MOCK_CONFIDENCE_MAX", default_value_t = 0.99)]
    pub mock_confidence_max: f64,

    /// Simulated latency of mock identification in milliseconds
    #[arg(long, env = "MOCK_DELAY_MS", default_value = "2500")]
    pub mock_delay_ms: u64,

    /// Interval between progress steps in milliseconds
    #[arg(long, env = "PROGRESS_TICK_MS", default_value = "150")]
    pub progress_tick_ms: u64,

    /// Time 100% progress stays visible before the result, in milliseconds
    #[arg(long, env = "REVEAL_DELAY_MS", default_value = "500")]
    pub reveal_delay_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if self.history_cap == 0 {
            return Err("HISTORY_CAP must be at least 1".into());
        }
        let (min, max) = (self.mock_confidence_min, self.mock_confidence_max);
        if !is_confidence_range(&(min..max)) {
            return Err(format!(
                "mock confidence range {min}..{max} must be non-empty and within 0..=1"
            ));
        }
        if self.progress_tick_ms == 0 {
            return Err("PROGRESS_TICK_MS must be positive".into());
        }
        Ok(())
    }

    /// Remote recognition settings, if a non-empty API key is configured.
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        let api_key = self.gemini_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(RemoteConfig {
            api_key: api_key.to_owned(),
            model: self.gemini_model.clone(),
            endpoint: self.gemini_endpoint.clone(),
        })
    }

    pub fn identification_service(&self) -> IdentificationService {
        IdentificationService::new(self.remote_config())
            .with_mock_confidence(self.mock_confidence_min..self.mock_confidence_max)
            .with_mock_delay(Duration::from_millis(self.mock_delay_ms))
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            history_cap: self.history_cap,
        }
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            tick: Duration::from_millis(self.progress_tick_ms),
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
        }
    }
}
