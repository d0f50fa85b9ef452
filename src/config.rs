use crate::constants::{DEFAULT_HISTORY_CAPACITY, DEFAULT_TICK_PERIOD};
use crate::phase::PhaseTable;
use anyhow::{ensure, Result};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use std::time::Duration;

/// Knobs for a [`MissionEngine`](crate::driver::MissionEngine)
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(pattern = "owned", default)]
pub struct EngineConfig {
    /// wall clock time between ticks
    pub tick_period: Duration,

    /// how many samples the history keeps
    pub history_capacity: usize,

    /// seed for the telemetry noise, random if unset
    #[builder(setter(strip_option))]
    pub seed: Option<u64>,

    /// the flight profile
    pub phases: PhaseTable,

    /// stop the mission on its own once the clock reaches this, runs forever if unset
    #[builder(setter(strip_option))]
    pub max_mission_time: Option<u32>,

    /// pin mission time zero to a fixed instant instead of when start is pressed
    #[builder(setter(strip_option))]
    pub launch_epoch: Option<DateTime<Utc>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            seed: None,
            phases: PhaseTable::default(),
            max_mission_time: None,
            launch_epoch: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.history_capacity > 0,
            "The telemetry history must hold at least one sample."
        );
        ensure!(!self.tick_period.is_zero(), "The tick period can't be zero.");
        ensure!(
            self.max_mission_time != Some(0),
            "A mission bound of zero seconds would never tick."
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = EngineConfigBuilder::default().build().unwrap();

        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tick_period, Duration::from_secs(1));
        assert_eq!(config.history_capacity, 200);
        assert_eq!(config.seed, None);
        config.validate().unwrap();
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfigBuilder::default()
            .tick_period(Duration::from_millis(100))
            .history_capacity(20)
            .seed(1047)
            .max_mission_time(300)
            .build()
            .unwrap();

        assert_eq!(config.tick_period, Duration::from_millis(100));
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.seed, Some(1047));
        assert_eq!(config.max_mission_time, Some(300));
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_capacity = EngineConfigBuilder::default()
            .history_capacity(0)
            .build()
            .unwrap();
        zero_capacity.validate().unwrap_err();

        let zero_period = EngineConfigBuilder::default()
            .tick_period(Duration::ZERO)
            .build()
            .unwrap();
        zero_period.validate().unwrap_err();

        let zero_bound = EngineConfigBuilder::default()
            .max_mission_time(0)
            .build()
            .unwrap();
        zero_bound.validate().unwrap_err();
    }
}
