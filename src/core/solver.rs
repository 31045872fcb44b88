use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    core::hydraulics::Hydraulics,
    prelude::*,
    quantity::{flow::CubicMetresPerHour, length::Metres},
};

/// Solver tuning and the loop's reaction to a failed solve.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Warm start for the very first solve of a run.
    pub initial_guess: CubicMetresPerHour,

    /// Maximum absolute residual head at the accepted operating point.
    pub tolerance: Metres,

    pub max_iterations: usize,

    pub on_non_convergence: ConvergencePolicy,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            initial_guess: CubicMetresPerHour(50.0),
            tolerance: Metres(1e-6),
            max_iterations: 100,
            on_non_convergence: ConvergencePolicy::default(),
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result {
        ensure!(self.initial_guess.is_finite(), "initial guess must be finite");
        ensure!(
            self.tolerance.is_finite() && self.tolerance > Metres::ZERO,
            "tolerance must be a positive number",
        );
        ensure!(self.max_iterations != 0, "at least one iteration must be allowed");
        Ok(())
    }
}

/// What the simulation does when the equilibrium flow cannot be found.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConvergencePolicy {
    /// Stop the simulation with an error.
    #[default]
    #[display("abort")]
    Abort,

    /// Use the last iterate, clamped at zero.
    #[display("accept")]
    Accept,

    /// Keep the pump off for the hour.
    #[display("idle")]
    Idle,
}

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error(
        "no equilibrium at hour {hour} after {n_iterations} iterations (flow: {flow}, residual: {:.3e} m)",
        .residual.0
    )]
    ConvergenceFailure {
        hour: usize,
        flow: CubicMetresPerHour,
        residual: Metres,
        n_iterations: usize,
    },

    #[error("equilibrium at hour {hour} has a negative flow: {flow}")]
    NegativeFlow { hour: usize, flow: CubicMetresPerHour },
}

impl SolverError {
    /// The best flow estimate when the solver gave up.
    pub const fn last_iterate(&self) -> CubicMetresPerHour {
        match self {
            Self::ConvergenceFailure { flow, .. } | Self::NegativeFlow { flow, .. } => *flow,
        }
    }
}

/// Pump operating point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Equilibrium {
    pub flow: CubicMetresPerHour,
    pub residual: Metres,
    pub n_iterations: usize,
}

/// Newton–Raphson search of the pump flow that balances the network.
///
/// Every successful solve seeds the next one: the inputs change slowly from hour to hour, so the
/// solver is path-dependent across a run. Create a new solver for each run.
#[derive(Builder)]
pub struct EquilibriumSolver<'a> {
    hydraulics: &'a Hydraulics,
    warm_start: CubicMetresPerHour,
    tolerance: Metres,
    max_iterations: usize,
}

impl EquilibriumSolver<'_> {
    pub const fn warm_start(&self) -> CubicMetresPerHour {
        self.warm_start
    }

    /// Override the warm start, for example after accepting an unconverged iterate.
    pub const fn reseed(&mut self, flow: CubicMetresPerHour) {
        self.warm_start = flow;
    }

    /// Find the pump flow at which the pump head meets the network losses, static lift and level.
    #[instrument(skip_all, fields(hour = hour, level = %level, outflow = %outflow))]
    pub fn solve(
        &mut self,
        hour: usize,
        outflow: CubicMetresPerHour,
        level: Metres,
    ) -> Result<Equilibrium, SolverError> {
        let mut flow = self.warm_start;
        let mut n_iterations = 0;

        let residual = loop {
            let residual = self.hydraulics.residual(flow, outflow, level);
            trace!(n_iterations, %flow, residual = residual.0, "iterating…");
            if residual.abs() < self.tolerance {
                break residual;
            }
            if n_iterations == self.max_iterations {
                return Err(SolverError::ConvergenceFailure { hour, flow, residual, n_iterations });
            }
            let slope = self.hydraulics.residual_derivative(flow, outflow);
            if !slope.is_normal() {
                // Flat spot: Newton step is undefined.
                return Err(SolverError::ConvergenceFailure { hour, flow, residual, n_iterations });
            }
            flow -= CubicMetresPerHour(residual.0 / slope);
            n_iterations += 1;
        };

        if flow < CubicMetresPerHour::ZERO {
            return Err(SolverError::NegativeFlow { hour, flow });
        }
        debug!(%flow, n_iterations, "converged");
        self.warm_start = flow;
        Ok(Equilibrium { flow, residual, n_iterations })
    }
}
