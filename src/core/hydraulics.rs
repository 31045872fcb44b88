use std::f64::consts::PI;

use crate::{
    core::parameters::SystemParameters,
    quantity::{energy::KilowattHours, flow::CubicMetresPerHour, length::Metres, time::Hours},
};

/// Quadratic pump characteristic: head drops with the square of the flow.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PumpCurve {
    pub shut_off_head: Metres,
    pub coefficient: f64,
}

impl PumpCurve {
    pub fn head(&self, flow: CubicMetresPerHour) -> Metres {
        self.shut_off_head - Metres(self.coefficient * flow.0 * flow.0)
    }

    /// Flow at which the head drops to zero, infinite for a flat curve.
    pub fn runout_flow(&self) -> CubicMetresPerHour {
        CubicMetresPerHour((self.shut_off_head.0 / self.coefficient).sqrt())
    }

    /// Derivative of the head with respect to the flow.
    pub fn slope(&self, flow: CubicMetresPerHour) -> f64 {
        -2.0 * self.coefficient * flow.0
    }
}

/// Pump and pipe network feeding the reservoir.
///
/// The network is two pipe segments in series: pump to reservoir, carrying the full pump flow,
/// and reservoir to the far point, carrying the pump flow net of the reservoir outflow.
#[derive(Copy, Clone, Debug)]
pub struct Hydraulics {
    pump: PumpCurve,

    /// Darcy–Weisbach constant folded from the pipe diameter, friction factor and gravity.
    friction_coefficient: f64,

    pump_to_reservoir: Metres,
    reservoir_to_far_point: Metres,
    static_lift: Metres,

    /// Converts flow (m³/h) times head (m) into kilowatts.
    power_coefficient: f64,
}

impl From<&SystemParameters> for Hydraulics {
    fn from(parameters: &SystemParameters) -> Self {
        let pipe = &parameters.pipe;
        let fluid = &parameters.fluid;
        Self {
            pump: parameters.pump.curve(),
            friction_coefficient: 32.0 * pipe.friction_factor
                / (pipe.diameter.0.powi(5) * PI * PI * fluid.gravity),
            pump_to_reservoir: pipe.pump_to_reservoir,
            reservoir_to_far_point: pipe.reservoir_to_far_point,
            static_lift: pipe.static_lift,
            power_coefficient: fluid.density * fluid.gravity
                / (parameters.pump.efficiency * 3600.0 * 1000.0),
        }
    }
}

impl Hydraulics {
    pub fn pump_head(&self, flow: CubicMetresPerHour) -> Metres {
        self.pump.head(flow)
    }

    /// Largest flow the pump can deliver.
    pub fn runout_flow(&self) -> CubicMetresPerHour {
        self.pump.runout_flow()
    }

    /// Head loss along a pipe of the given length.
    ///
    /// Sign of the flow does not matter.
    pub fn friction_loss(&self, flow: CubicMetresPerHour, length: Metres) -> Metres {
        Metres(self.friction_coefficient * length.0 * flow.per_second().powi(2))
    }

    /// Head surplus of the pump over the network at the given pump flow.
    ///
    /// Zero at the operating point. The reservoir level acts as back-pressure.
    pub fn residual(
        &self,
        flow: CubicMetresPerHour,
        outflow: CubicMetresPerHour,
        level: Metres,
    ) -> Metres {
        self.pump_head(flow)
            - self.friction_loss(flow, self.pump_to_reservoir)
            - self.friction_loss(flow - outflow, self.reservoir_to_far_point)
            - self.static_lift
            - level
    }

    /// Derivative of [`Hydraulics::residual`] with respect to the pump flow.
    pub fn residual_derivative(
        &self,
        flow: CubicMetresPerHour,
        outflow: CubicMetresPerHour,
    ) -> f64 {
        let scale = 2.0 * self.friction_coefficient / (3600.0 * 3600.0);
        self.pump.slope(flow)
            - scale * self.pump_to_reservoir.0 * flow.0
            - scale * self.reservoir_to_far_point.0 * (flow - outflow).0
    }

    /// Electrical energy drawn by the pump running at the flow for the duration.
    pub fn pump_energy(&self, flow: CubicMetresPerHour, duration: Hours) -> KilowattHours {
        KilowattHours(self.power_coefficient * flow.0 * self.pump_head(flow).0 * duration.0)
    }
}
