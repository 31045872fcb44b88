use serde::{Deserialize, Serialize};

use crate::{prelude::*, quantity::rate::KilowattHourRate};

/// Number of hourly steps in the simulated day.
pub const N_HOURS: usize = 24;

/// Time-of-use energy prices, one per hour of the day.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TariffSchedule([KilowattHourRate; N_HOURS]);

impl Default for TariffSchedule {
    fn default() -> Self {
        Self(
            [
                0.0593, 0.0593, 0.0593, 0.0593, 0.0593, 0.0593, // night
                0.0778, 0.0778, 0.0851, 0.0851, 0.0923, 0.0923, // morning
                0.0968, 0.0968, 0.10094, 0.10094, 0.10132, 0.10132, // afternoon
                0.10230, 0.10230, 0.10189, 0.10189, 0.10132, 0.10132, // evening
            ]
            .map(KilowattHourRate),
        )
    }
}

impl From<[KilowattHourRate; N_HOURS]> for TariffSchedule {
    fn from(rates: [KilowattHourRate; N_HOURS]) -> Self {
        Self(rates)
    }
}

impl TariffSchedule {
    /// Rate applicable to the hour of day.
    ///
    /// # Panics
    ///
    /// When `hour` is outside of the day.
    pub const fn at(&self, hour: usize) -> KilowattHourRate {
        self.0[hour]
    }

    pub fn iter(&self) -> impl Iterator<Item = KilowattHourRate> + '_ {
        self.0.iter().copied()
    }

    #[expect(clippy::cast_precision_loss)]
    pub fn mean(&self) -> KilowattHourRate {
        self.iter().sum::<KilowattHourRate>() / N_HOURS as f64
    }

    pub fn validate(&self) -> Result {
        if let Some((hour, rate)) = self
            .iter()
            .enumerate()
            .find(|(_, rate)| *rate < KilowattHourRate::ZERO || !rate.is_finite())
        {
            bail!("tariff at hour {hour} must be a non-negative number, got {rate}");
        }
        Ok(())
    }
}
