use std::ops::Mul;

use crate::quantity::{time::Hours, volume::CubicMetres};

quantity!(
    /// Volumetric flow rate.
    CubicMetresPerHour,
    suffix: "m³/h",
    precision: 1
);

impl CubicMetresPerHour {
    /// Flow rate in cubic metres per second.
    pub fn per_second(self) -> f64 {
        self.0 / 3600.0
    }
}

impl Mul<Hours> for CubicMetresPerHour {
    type Output = CubicMetres;

    fn mul(self, rhs: Hours) -> Self::Output {
        CubicMetres(self.0 * rhs.0)
    }
}
