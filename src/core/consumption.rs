use serde::{Deserialize, Serialize};

use crate::{
    core::tariff::N_HOURS,
    prelude::*,
    quantity::flow::CubicMetresPerHour,
};

/// Polynomial of time in hours, coefficients in ascending order of power.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial(pub Vec<f64>);

impl Polynomial {
    /// Evaluate with [Horner's method][1].
    ///
    /// [1]: https://en.wikipedia.org/wiki/Horner%27s_method
    pub fn evaluate(&self, t: f64) -> f64 {
        self.0.iter().rev().fold(0.0, |accumulator, coefficient| accumulator * t + coefficient)
    }
}

/// Reservoir draw as functions of the time of day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumptionProfile {
    /// Primary draw from the reservoir.
    pub outflow: Polynomial,

    /// Secondary, independently metered maximum consumption.
    pub auxiliary: Polynomial,
}

impl Default for ConsumptionProfile {
    fn default() -> Self {
        Self {
            outflow: Polynomial(vec![20.0, 0.1335, 0.09, -0.004]),
            auxiliary: Polynomial(vec![
                75.393,
                -1.0124,
                -3.8645,
                1.03965,
                -0.09621,
                3.733e-3,
                -4.90754e-5,
                -1.19333e-7,
            ]),
        }
    }
}

impl ConsumptionProfile {
    pub fn outflow_demand(&self, t: f64) -> CubicMetresPerHour {
        CubicMetresPerHour(self.outflow.evaluate(t))
    }

    pub fn aux_max_consumption(&self, t: f64) -> CubicMetresPerHour {
        CubicMetresPerHour(self.auxiliary.evaluate(t))
    }

    /// Evaluate both demands at every hour of the day.
    #[expect(clippy::cast_precision_loss)]
    pub fn precompute(&self) -> Vec<HourlyDemand> {
        (0..N_HOURS)
            .map(|hour| {
                let t = hour as f64;
                HourlyDemand {
                    outflow: self.outflow_demand(t),
                    auxiliary: self.aux_max_consumption(t),
                }
            })
            .collect()
    }

    pub fn validate(&self) -> Result {
        ensure!(!self.outflow.0.is_empty(), "outflow polynomial must have coefficients");
        ensure!(!self.auxiliary.0.is_empty(), "auxiliary polynomial must have coefficients");
        for (hour, demand) in self.precompute().into_iter().enumerate() {
            ensure!(
                demand.outflow.is_finite() && demand.auxiliary.is_finite(),
                "consumption at hour {hour} is not finite",
            );
            if demand.outflow < CubicMetresPerHour::ZERO
                || demand.auxiliary < CubicMetresPerHour::ZERO
            {
                warn!(
                    hour,
                    outflow = %demand.outflow,
                    auxiliary = %demand.auxiliary,
                    "negative consumption",
                );
            }
        }
        Ok(())
    }
}

/// Demands precomputed for a single hour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HourlyDemand {
    pub outflow: CubicMetresPerHour,
    pub auxiliary: CubicMetresPerHour,
}

impl HourlyDemand {
    pub fn total(&self) -> CubicMetresPerHour {
        self.outflow + self.auxiliary
    }
}
