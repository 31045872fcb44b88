use itertools::{Itertools, MinMaxResult};

use crate::{
    core::step::Step,
    quantity::{cost::Cost, energy::KilowattHours, length::Metres},
};

/// Aggregated costs and events of a simulated day.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub energy_cost: Cost,
    pub penalty_cost: Cost,
    pub energy: KilowattHours,

    /// Hours in which the pump was running.
    pub pumping_hours: Vec<usize>,

    /// Hours charged with a penalty.
    pub penalized_hours: Vec<usize>,

    /// Penalty of every hour, including the zero ones.
    pub penalties: Vec<Cost>,

    pub min_level: Metres,
    pub max_level: Metres,
}

impl Summary {
    pub fn from_steps(steps: &[Step]) -> Self {
        let (min_level, max_level) = match steps.iter().map(|step| step.level_after).minmax() {
            MinMaxResult::NoElements => (Metres::ZERO, Metres::ZERO),
            MinMaxResult::OneElement(level) => (level, level),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        Self {
            energy_cost: steps.iter().map(|step| step.energy_cost).sum(),
            penalty_cost: steps.iter().map(|step| step.penalty).sum(),
            energy: steps.iter().map(|step| step.energy).sum(),
            pumping_hours: steps.iter().filter(|step| step.pump_on).map(|step| step.hour).collect(),
            penalized_hours: steps
                .iter()
                .filter(|step| step.penalty > Cost::ZERO)
                .map(|step| step.hour)
                .collect(),
            penalties: steps.iter().map(|step| step.penalty).collect(),
            min_level,
            max_level,
        }
    }

    pub fn total_cost(&self) -> Cost {
        self.energy_cost + self.penalty_cost
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::policy::HourBand,
        quantity::{flow::CubicMetresPerHour, rate::KilowattHourRate},
    };

    fn step(hour: usize, pump_on: bool, level_after: f64, energy_cost: f64, penalty: f64) -> Step {
        Step {
            hour,
            band: HourBand::of(hour),
            grid_rate: KilowattHourRate(0.1),
            consumption: CubicMetresPerHour(100.0),
            pump_on,
            flow: if pump_on { CubicMetresPerHour(170.0) } else { CubicMetresPerHour::ZERO },
            level_before: Metres(4.0),
            level_after: Metres(level_after),
            energy: KilowattHours(energy_cost * 10.0),
            energy_cost: Cost(energy_cost),
            penalty: Cost(penalty),
        }
    }

    #[test]
    fn test_from_steps() {
        let steps = [
            step(0, true, 4.5, 8.7, 0.0),
            step(1, true, 5.0, 8.6, 0.0),
            step(21, false, 1.8, 0.0, 5.0),
            step(22, false, 1.2, 0.0, 10.0),
        ];
        let summary = Summary::from_steps(&steps);
        assert_abs_diff_eq!(summary.energy_cost.0, 17.3, epsilon = 1e-9);
        assert_eq!(summary.penalty_cost, Cost(15.0));
        assert_abs_diff_eq!(summary.total_cost().0, 32.3, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.energy.0, 173.0, epsilon = 1e-9);
        assert_eq!(summary.pumping_hours, [0, 1]);
        assert_eq!(summary.penalized_hours, [21, 22]);
        assert_eq!(summary.penalties, [0.0, 0.0, 5.0, 10.0].map(Cost));
        assert_eq!(summary.min_level, Metres(1.2));
        assert_eq!(summary.max_level, Metres(5.0));
    }

    #[test]
    fn test_empty() {
        let summary = Summary::from_steps(&[]);
        assert_eq!(summary.total_cost(), Cost::ZERO);
        assert!(summary.pumping_hours.is_empty());
    }
}
