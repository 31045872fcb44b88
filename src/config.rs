use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        consumption::ConsumptionProfile,
        parameters::SystemParameters,
        solver::SolverSettings,
        tariff::TariffSchedule,
    },
    prelude::*,
    quantity::length::Metres,
};

/// Everything a run needs. Missing keys fall back to the built-in system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reservoir level at midnight.
    pub initial_level: Metres,

    /// Hourly energy prices.
    pub tariff: TariffSchedule,

    #[serde(flatten)]
    pub system: SystemParameters,

    pub consumption: ConsumptionProfile,
    pub solver: SolverSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_level: Metres(4.0),
            tariff: TariffSchedule::default(),
            system: SystemParameters::default(),
            consumption: ConsumptionProfile::default(),
            solver: SolverSettings::default(),
        }
    }
}

impl Config {
    /// Read the configuration file, or use the defaults without a path.
    ///
    /// The result is not validated yet, so that the command-line overrides can be applied first.
    #[instrument(skip_all, fields(path = ?path))]
    pub fn read(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("using the built-in configuration");
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!("loaded the configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result {
        self.system.validate().context("invalid system parameters")?;
        self.tariff.validate().context("invalid tariff")?;
        self.consumption.validate().context("invalid consumption profile")?;
        self.solver.validate().context("invalid solver settings")?;
        ensure!(self.initial_level.is_finite(), "initial level must be finite");
        ensure!(
            self.initial_level >= Metres::ZERO
                && self.initial_level <= self.system.reservoir.max_level,
            "initial level must be within [0, {}], got {}",
            self.system.reservoir.max_level,
            self.initial_level,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::solver::ConvergencePolicy,
        quantity::{area::SquareMetres, cost::Cost, rate::KilowattHourRate},
    };

    #[test]
    fn test_defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_overrides() {
        let config: Config = toml::from_str(
            r#"
            initial_level = 3.5

            [reservoir]
            area = 200.0

            [penalty]
            unit = 7.5

            [solver]
            on_non_convergence = "idle"
            "#,
        )
        .unwrap();
        assert_eq!(config.initial_level, Metres(3.5));
        assert_eq!(config.system.reservoir.area, SquareMetres(200.0));
        assert_eq!(config.system.reservoir.max_level, Metres(7.0));
        assert_eq!(config.system.penalty.unit, Cost(7.5));
        assert_eq!(config.solver.on_non_convergence, ConvergencePolicy::Idle);
        assert_eq!(config.solver.max_iterations, 100);
        assert_eq!(config.tariff, TariffSchedule::default());
    }

    #[test]
    fn test_consumption_override() {
        let config: Config = toml::from_str(
            r"
            [consumption]
            outflow = [10.0]
            ",
        )
        .unwrap();
        assert_eq!(config.consumption.outflow.evaluate(12.0), 10.0);
        assert_eq!(config.consumption.auxiliary, ConsumptionProfile::default().auxiliary);
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.tariff = TariffSchedule::from([KilowattHourRate(0.2); 24]);
        config.initial_level = Metres(5.0);
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_initial_level_above_maximum() {
        let config = Config { initial_level: Metres(7.5), ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_initial_level() {
        let config = Config { initial_level: Metres(f64::NAN), ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_reservoir_area() {
        let config: Config = toml::from_str("[reservoir]\narea = nan").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_policy() {
        let result = toml::from_str::<Config>("[solver]\non_non_convergence = \"retry\"");
        assert!(result.is_err());
    }
}
