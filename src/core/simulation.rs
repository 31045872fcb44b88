use bon::Builder;

use crate::{
    core::{
        consumption::ConsumptionProfile,
        hydraulics::Hydraulics,
        parameters::SystemParameters,
        policy::{ControlPolicy, ViolationCounter},
        solver::{ConvergencePolicy, EquilibriumSolver, SolverError, SolverSettings},
        step::Step,
        tariff::{N_HOURS, TariffSchedule},
    },
    prelude::*,
    quantity::{
        cost::Cost,
        energy::KilowattHours,
        flow::CubicMetresPerHour,
        length::Metres,
        time::Hours,
    },
};

/// Simulation time step.
const STEP: Hours = Hours::ONE;

/// Day-long reservoir simulation.
///
/// Every hour depends on the level left by the previous one and on the solver's warm start,
/// so the steps are strictly sequential.
#[derive(Builder)]
pub struct Simulation<'a> {
    parameters: &'a SystemParameters,
    tariff: &'a TariffSchedule,
    consumption: &'a ConsumptionProfile,
    solver: SolverSettings,
    initial_level: Metres,
}

impl Simulation<'_> {
    #[instrument(skip_all, fields(initial_level = %self.initial_level))]
    pub fn run(&self) -> Result<Vec<Step>> {
        let hydraulics = Hydraulics::from(self.parameters);
        let policy = ControlPolicy::from(self.parameters);
        let demands = self.consumption.precompute();
        let mut solver = EquilibriumSolver::builder()
            .hydraulics(&hydraulics)
            .warm_start(self.solver.initial_guess)
            .tolerance(self.solver.tolerance)
            .max_iterations(self.solver.max_iterations)
            .build();

        let reservoir = &self.parameters.reservoir;
        let mut violations = ViolationCounter::default();
        let mut level = self.initial_level;
        let mut steps = Vec::with_capacity(N_HOURS);

        for (hour, demand) in demands.into_iter().enumerate() {
            let grid_rate = self.tariff.at(hour);
            let consumption = demand.total();
            let decision = policy.decide(hour, level, &mut violations);

            let flow = if decision.pump_on {
                match solver.solve(hour, demand.outflow, level) {
                    Ok(equilibrium) => Some(equilibrium.flow),
                    Err(error) => self.recover(&hydraulics, &mut solver, error)?,
                }
            } else {
                None
            };
            let pump_on = flow.is_some();
            let flow = flow.unwrap_or(CubicMetresPerHour::ZERO);

            // Spill above the maximum and deficit below zero are lost:
            let level_after = (level + (flow - consumption) * STEP / reservoir.area)
                .clamp(Metres::ZERO, reservoir.max_level);

            let energy = if pump_on {
                hydraulics.pump_energy(flow, STEP)
            } else {
                KilowattHours::ZERO
            };
            let step = Step {
                hour,
                band: decision.band,
                grid_rate,
                consumption,
                pump_on,
                flow,
                level_before: level,
                level_after,
                energy,
                energy_cost: if pump_on { energy * grid_rate } else { Cost::ZERO },
                penalty: decision.penalty,
            };
            debug!(
                hour,
                band = %step.band,
                pump_on,
                %flow,
                level = %level_after,
                cost = %step.cost(),
                "simulated",
            );

            steps.push(step);
            level = level_after;
        }

        Ok(steps)
    }

    /// Apply the configured policy to a failed solve.
    ///
    /// An accepted iterate is clamped to the pump's operating range, so that it never draws
    /// negative energy.
    ///
    /// # Returns
    ///
    /// - [`Some`] flow to run the pump with,
    /// - [`None`] to keep the pump off for the hour.
    fn recover(
        &self,
        hydraulics: &Hydraulics,
        solver: &mut EquilibriumSolver<'_>,
        error: SolverError,
    ) -> Result<Option<CubicMetresPerHour>> {
        match self.solver.on_non_convergence {
            ConvergencePolicy::Abort => Err(error).context("failed to find the pump flow"),
            ConvergencePolicy::Accept => {
                let flow =
                    error.last_iterate().clamp(CubicMetresPerHour::ZERO, hydraulics.runout_flow());
                warn!(%error, %flow, "accepting the last iterate");
                solver.reseed(flow);
                Ok(Some(flow))
            }
            ConvergencePolicy::Idle => {
                warn!(%error, "keeping the pump off");
                Ok(None)
            }
        }
    }
}
