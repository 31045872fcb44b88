use crate::{
    core::policy::HourBand,
    quantity::{
        cost::Cost,
        energy::KilowattHours,
        flow::CubicMetresPerHour,
        length::Metres,
        rate::KilowattHourRate,
    },
};

/// Single-hour simulation record.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    /// Hour of the day, the step covers `hour..hour + 1`.
    pub hour: usize,

    pub band: HourBand,
    pub grid_rate: KilowattHourRate,

    /// Total draw from the reservoir.
    pub consumption: CubicMetresPerHour,

    pub pump_on: bool,

    /// Pump flow, zero when the pump is off.
    pub flow: CubicMetresPerHour,

    pub level_before: Metres,
    pub level_after: Metres,

    /// Electrical energy spent pumping.
    pub energy: KilowattHours,

    pub energy_cost: Cost,
    pub penalty: Cost,
}

impl Step {
    pub fn cost(&self) -> Cost {
        self.energy_cost + self.penalty
    }
}
