use serde::{Deserialize, Serialize};

use crate::{
    core::hydraulics::PumpCurve,
    prelude::*,
    quantity::{area::SquareMetres, cost::Cost, length::Metres},
};

/// Physical constants of the pumping system.
///
/// Created once at startup and never mutated afterwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemParameters {
    pub reservoir: Reservoir,
    pub pipe: Pipe,
    pub pump: Pump,
    pub fluid: Fluid,
    pub penalty: Penalty,
}

impl SystemParameters {
    pub fn validate(&self) -> Result {
        let Reservoir { area, min_level, max_level, operational_margin } = self.reservoir;
        ensure!(
            area.is_finite()
                && min_level.is_finite()
                && max_level.is_finite()
                && operational_margin.is_finite(),
            "reservoir dimensions must be finite",
        );
        ensure!(area > SquareMetres::ZERO, "reservoir area must be positive, got {area}");
        ensure!(min_level >= Metres::ZERO, "minimum level must not be negative, got {min_level}");
        ensure!(
            min_level < max_level,
            "minimum level ({min_level}) must be below the maximum level ({max_level})",
        );
        ensure!(
            operational_margin >= Metres::ZERO && operational_margin < max_level,
            "operational margin must be within [0, {max_level}), got {operational_margin}",
        );

        let Pipe {
            diameter,
            friction_factor,
            pump_to_reservoir,
            reservoir_to_far_point,
            static_lift,
        } = self.pipe;
        ensure!(
            diameter.is_finite()
                && friction_factor.is_finite()
                && pump_to_reservoir.is_finite()
                && reservoir_to_far_point.is_finite()
                && static_lift.is_finite(),
            "pipe parameters must be finite",
        );
        ensure!(diameter > Metres::ZERO, "pipe diameter must be positive");
        ensure!(friction_factor >= 0.0, "friction factor must not be negative");
        ensure!(
            pump_to_reservoir > Metres::ZERO && reservoir_to_far_point > Metres::ZERO,
            "pipe lengths must be positive",
        );

        let Pump { shut_off_head, curve_coefficient, efficiency } = self.pump;
        ensure!(
            shut_off_head.is_finite() && curve_coefficient.is_finite() && efficiency.is_finite(),
            "pump parameters must be finite",
        );
        ensure!(shut_off_head > Metres::ZERO, "shut-off head must be positive");
        ensure!(
            efficiency > 0.0 && efficiency <= 1.0,
            "pump efficiency must be within (0, 1], got {efficiency}",
        );
        ensure!(curve_coefficient >= 0.0, "pump curve coefficient must not be negative");

        ensure!(
            self.fluid.density.is_finite() && self.fluid.density > 0.0,
            "fluid density must be positive",
        );
        ensure!(
            self.fluid.gravity.is_finite() && self.fluid.gravity > 0.0,
            "gravitational acceleration must be positive",
        );
        ensure!(
            self.penalty.unit.is_finite() && self.penalty.unit >= Cost::ZERO,
            "penalty unit must not be negative",
        );
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reservoir {
    pub area: SquareMetres,

    /// Safety minimum: staying below it with the pump off is penalized.
    pub min_level: Metres,

    /// Physical maximum, the level is clamped to it.
    pub max_level: Metres,

    /// Distance below the maximum at which the pump stops filling in the shoulder hours.
    pub operational_margin: Metres,
}

impl Default for Reservoir {
    fn default() -> Self {
        Self {
            area: SquareMetres(185.0),
            min_level: Metres(2.0),
            max_level: Metres(7.0),
            operational_margin: Metres(0.1),
        }
    }
}

impl Reservoir {
    /// Level above which the pump stays off in the shoulder hours.
    pub fn operational_limit(&self) -> Metres {
        self.max_level - self.operational_margin
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipe {
    pub diameter: Metres,

    /// Darcy friction factor.
    pub friction_factor: f64,

    /// Length of the segment between the pump and the reservoir.
    pub pump_to_reservoir: Metres,

    /// Length of the segment between the reservoir and the far consumption point.
    pub reservoir_to_far_point: Metres,

    /// Elevation the pump has to overcome regardless of the flow.
    pub static_lift: Metres,
}

impl Default for Pipe {
    fn default() -> Self {
        Self {
            diameter: Metres(0.3),
            friction_factor: 0.02,
            pump_to_reservoir: Metres(2500.0),
            reservoir_to_far_point: Metres(5000.0),
            static_lift: Metres(150.0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pump {
    /// Head at zero flow.
    pub shut_off_head: Metres,

    /// Quadratic head drop, in metres per (m³/h)².
    pub curve_coefficient: f64,

    pub efficiency: f64,
}

impl Default for Pump {
    fn default() -> Self {
        Self { shut_off_head: Metres(260.0), curve_coefficient: 0.002, efficiency: 0.65 }
    }
}

impl Pump {
    pub const fn curve(&self) -> PumpCurve {
        PumpCurve { shut_off_head: self.shut_off_head, coefficient: self.curve_coefficient }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fluid {
    /// Kilograms per cubic metre.
    pub density: f64,

    /// Metres per second squared.
    pub gravity: f64,
}

impl Default for Fluid {
    fn default() -> Self {
        Self { density: 1000.0, gravity: 9.81 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Penalty {
    /// Charged per consecutive hour below the minimum level: 1×, 2×, 3×…
    pub unit: Cost,
}

impl Default for Penalty {
    fn default() -> Self {
        Self { unit: Cost(5.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        SystemParameters::default().validate().unwrap();
    }

    #[test]
    fn test_operational_limit() {
        assert_eq!(Reservoir::default().operational_limit(), Metres(7.0) - Metres(0.1));
    }

    #[test]
    fn test_inverted_levels() {
        let mut parameters = SystemParameters::default();
        parameters.reservoir.min_level = Metres(8.0);
        assert!(parameters.validate().is_err());
    }

    #[test]
    fn test_nan_area() {
        let mut parameters = SystemParameters::default();
        parameters.reservoir.area = SquareMetres(f64::NAN);
        assert!(parameters.validate().is_err());
    }

    #[test]
    fn test_nan_max_level() {
        let mut parameters = SystemParameters::default();
        parameters.reservoir.max_level = Metres(f64::NAN);
        assert!(parameters.validate().is_err());
    }

    #[test]
    fn test_nan_from_toml() {
        let parameters: SystemParameters = toml::from_str("[pump]\nshut_off_head = nan").unwrap();
        assert!(parameters.validate().is_err());
    }

    #[test]
    fn test_zero_pipe_length() {
        let mut parameters = SystemParameters::default();
        parameters.pipe.reservoir_to_far_point = Metres::ZERO;
        assert!(parameters.validate().is_err());
    }

    #[test]
    fn test_zero_efficiency() {
        let mut parameters = SystemParameters::default();
        parameters.pump.efficiency = 0.0;
        assert!(parameters.validate().is_err());
    }
}
