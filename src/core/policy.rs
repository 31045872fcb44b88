use crate::{
    core::parameters::SystemParameters,
    prelude::*,
    quantity::{cost::Cost, length::Metres},
};

/// Fixed control periods of the day, aligned with the tariff.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum HourBand {
    /// 00:00–06:00, cheapest energy: always fill.
    #[display("off-peak")]
    OffPeak,

    /// 06:00–14:00: keep the reservoir near the top before the prices rise.
    #[display("shoulder")]
    Shoulder,

    /// 14:00–24:00, most expensive energy: never pump.
    #[display("peak")]
    Peak,
}

impl HourBand {
    pub const fn of(hour: usize) -> Self {
        match hour % 24 {
            0..=5 => Self::OffPeak,
            6..=13 => Self::Shoulder,
            _ => Self::Peak,
        }
    }
}

/// Number of consecutive peak hours spent below the minimum level with the pump off.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ViolationCounter(pub u32);

impl ViolationCounter {
    pub const fn reset(&mut self) {
        self.0 = 0;
    }

    pub const fn increment(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

/// Outcome of the policy for one hour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Decision {
    pub band: HourBand,
    pub pump_on: bool,
    pub penalty: Cost,
}

/// Rule-based pump schedule.
#[derive(Copy, Clone, Debug)]
pub struct ControlPolicy {
    /// Below this level the peak hours are penalized.
    min_level: Metres,

    /// In the shoulder hours, the pump only runs below this level.
    operational_limit: Metres,

    /// Penalty for the first violation hour, the n-th consecutive one costs n times as much.
    penalty_unit: Cost,
}

impl From<&SystemParameters> for ControlPolicy {
    fn from(parameters: &SystemParameters) -> Self {
        Self {
            min_level: parameters.reservoir.min_level,
            operational_limit: parameters.reservoir.operational_limit(),
            penalty_unit: parameters.penalty.unit,
        }
    }
}

impl ControlPolicy {
    /// Decide whether to pump given the level at the start of the hour.
    pub fn decide(
        &self,
        hour: usize,
        level: Metres,
        violations: &mut ViolationCounter,
    ) -> Decision {
        let band = HourBand::of(hour);
        let (pump_on, penalty) = match band {
            HourBand::OffPeak => {
                violations.reset();
                (true, Cost::ZERO)
            }
            HourBand::Shoulder => {
                violations.reset();
                (level < self.operational_limit, Cost::ZERO)
            }
            HourBand::Peak if level < self.min_level => {
                let n_hours = violations.increment();
                trace!(hour, n_hours, %level, "below the minimum level");
                (false, self.penalty_unit * f64::from(n_hours))
            }
            HourBand::Peak => {
                violations.reset();
                (false, Cost::ZERO)
            }
        };
        Decision { band, pump_on, penalty }
    }
}
