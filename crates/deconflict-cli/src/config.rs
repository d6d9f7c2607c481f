//! Analysis configuration from environment.

use deconflict_core::rules::{
    DEFAULT_SAFETY_BUFFER_M, DEFAULT_TEMPORAL_WINDOW_STEPS, DEFAULT_TIME_STEP_S,
};
use deconflict_core::EngineConfig;
use serde::Deserialize;
use std::env;

pub const ENV_SAFETY_BUFFER: &str = "DECONFLICT_SAFETY_BUFFER";
pub const ENV_TIME_STEP: &str = "DECONFLICT_TIME_STEP";
pub const ENV_TEMPORAL_WINDOW_STEPS: &str = "DECONFLICT_TEMPORAL_WINDOW_STEPS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub safety_buffer_m: f64,
    pub time_step_s: f64,
    pub temporal_window_steps: f64,
    pub detect_temporal: bool,
}

/// Optional parameter values layered over a [`Config`], from a scenario
/// file's `parameters` block or from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParameterOverrides {
    #[serde(alias = "safety_buffer_m")]
    pub safety_buffer: Option<f64>,
    #[serde(alias = "time_step_s")]
    pub time_step: Option<f64>,
    pub temporal_window_steps: Option<f64>,
    pub detect_temporal: Option<bool>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or unparsable values
    /// fall back to the engine defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: f64| {
            lookup(key)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .unwrap_or(default)
        };
        Self {
            safety_buffer_m: number(ENV_SAFETY_BUFFER, DEFAULT_SAFETY_BUFFER_M),
            time_step_s: number(ENV_TIME_STEP, DEFAULT_TIME_STEP_S),
            temporal_window_steps: number(ENV_TEMPORAL_WINDOW_STEPS, DEFAULT_TEMPORAL_WINDOW_STEPS),
            detect_temporal: true,
        }
    }

    pub fn apply(mut self, overrides: &ParameterOverrides) -> Self {
        if let Some(v) = overrides.safety_buffer {
            self.safety_buffer_m = v;
        }
        if let Some(v) = overrides.time_step {
            self.time_step_s = v;
        }
        if let Some(v) = overrides.temporal_window_steps {
            self.temporal_window_steps = v;
        }
        if let Some(v) = overrides.detect_temporal {
            self.detect_temporal = v;
        }
        self
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            safety_buffer_m: self.safety_buffer_m,
            time_step_s: self.time_step_s,
            temporal_window_steps: self.temporal_window_steps,
            detect_temporal: self.detect_temporal,
        }
    }
}
