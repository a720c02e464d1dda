use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Parameters of the receptor saturation model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaturationConfig {
    /// Baseline receptor capacity in mg of weekly active dose.
    pub base_capacity: f64,
    /// Weeks of sustained load, driving capacity upregulation.
    pub weeks_elapsed: f64,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            base_capacity: 100.0,
            weeks_elapsed: 0.0,
        }
    }
}

/// Parameters of the competitive displacement model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceptorConfig {
    /// Total daily binding capacity in mg (reference-compound equivalents).
    pub daily_capacity: f64,
}

impl Default for ReceptorConfig {
    fn default() -> Self {
        Self {
            daily_capacity: 150.0,
        }
    }
}

/// Full evaluation configuration consumed by the report workflow.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub saturation: SaturationConfig,
    pub receptor: ReceptorConfig,
    pub cache_capacity: usize,
}

#[derive(Default)]
pub struct EvaluationConfigBuilder {
    base_capacity: Option<f64>,
    weeks_elapsed: Option<f64>,
    daily_capacity: Option<f64>,
    cache_capacity: Option<usize>,
}

impl EvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_capacity(mut self, capacity: f64) -> Self {
        self.base_capacity = Some(capacity);
        self
    }
    pub fn weeks_elapsed(mut self, weeks: f64) -> Self {
        self.weeks_elapsed = Some(weeks);
        self
    }
    pub fn daily_capacity(mut self, capacity: f64) -> Self {
        self.daily_capacity = Some(capacity);
        self
    }
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<EvaluationConfig, ConfigError> {
        let defaults = EvaluationConfig::default();
        let base_capacity = self
            .base_capacity
            .unwrap_or(defaults.saturation.base_capacity);
        if !(base_capacity > 0.0) || !base_capacity.is_finite() {
            return Err(ConfigError::Invalid {
                name: "base_capacity",
                reason: format!("expected a positive finite number, got {base_capacity}"),
            });
        }
        let weeks_elapsed = self.weeks_elapsed.unwrap_or(defaults.saturation.weeks_elapsed);
        if !(weeks_elapsed >= 0.0) || !weeks_elapsed.is_finite() {
            return Err(ConfigError::Invalid {
                name: "weeks_elapsed",
                reason: format!("expected a non-negative finite number, got {weeks_elapsed}"),
            });
        }
        let daily_capacity = self
            .daily_capacity
            .unwrap_or(defaults.receptor.daily_capacity);
        if !(daily_capacity > 0.0) || !daily_capacity.is_finite() {
            return Err(ConfigError::Invalid {
                name: "daily_capacity",
                reason: format!("expected a positive finite number, got {daily_capacity}"),
            });
        }

        Ok(EvaluationConfig {
            saturation: SaturationConfig {
                base_capacity,
                weeks_elapsed,
            },
            receptor: ReceptorConfig { daily_capacity },
            cache_capacity: self.cache_capacity.unwrap_or(64),
        })
    }
}

impl EvaluationConfig {
    /// The default configuration with a usable cache bound.
    pub fn standard() -> Self {
        Self {
            cache_capacity: 64,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_standard() {
        let built = EvaluationConfigBuilder::new().build().unwrap();
        assert_eq!(built, EvaluationConfig::standard());
        assert_eq!(built.saturation.base_capacity, 100.0);
        assert_eq!(built.receptor.daily_capacity, 150.0);
    }

    #[test]
    fn builder_applies_overrides() {
        let built = EvaluationConfigBuilder::new()
            .base_capacity(250.0)
            .weeks_elapsed(8.0)
            .daily_capacity(200.0)
            .cache_capacity(16)
            .build()
            .unwrap();
        assert_eq!(built.saturation.base_capacity, 250.0);
        assert_eq!(built.saturation.weeks_elapsed, 8.0);
        assert_eq!(built.receptor.daily_capacity, 200.0);
        assert_eq!(built.cache_capacity, 16);
    }

    #[test]
    fn builder_rejects_non_positive_capacity() {
        let result = EvaluationConfigBuilder::new().base_capacity(0.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "base_capacity",
                ..
            })
        ));
    }

    #[test]
    fn builder_rejects_negative_weeks() {
        let result = EvaluationConfigBuilder::new().weeks_elapsed(-1.0).build();
        assert!(result.is_err());
    }
}
