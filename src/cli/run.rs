use clap::Parser;

use crate::{
    cli::ConfigArgs,
    config::Config,
    core::{simulation::Simulation, solver::ConvergencePolicy, summary::Summary},
    prelude::*,
    quantity::length::Metres,
    tables::{build_steps_table, build_summary_table},
};

#[derive(Parser)]
pub struct RunArgs {
    #[clap(flatten)]
    pub config: ConfigArgs,

    /// Reservoir level at midnight in metres, overrides the configuration.
    #[clap(long = "initial-level", env = "INITIAL_LEVEL")]
    pub initial_level: Option<Metres>,

    /// What to do when the pump flow cannot be found, overrides the configuration.
    #[clap(long = "on-non-convergence", value_enum, env = "ON_NON_CONVERGENCE")]
    pub on_non_convergence: Option<ConvergencePolicy>,
}

impl RunArgs {
    /// Load the configuration and apply the command-line overrides.
    pub fn config(&self) -> Result<Config> {
        let mut config = self.config.load()?;
        if let Some(initial_level) = self.initial_level {
            config.initial_level = initial_level;
        }
        if let Some(on_non_convergence) = self.on_non_convergence {
            config.solver.on_non_convergence = on_non_convergence;
        }
        config.validate()?;
        Ok(config)
    }
}

#[instrument(skip_all)]
pub fn run(args: &RunArgs) -> Result {
    let config = args.config()?;
    info!(
        initial_level = %config.initial_level,
        on_non_convergence = %config.solver.on_non_convergence,
        "simulating…",
    );

    let steps = Simulation::builder()
        .parameters(&config.system)
        .tariff(&config.tariff)
        .consumption(&config.consumption)
        .solver(config.solver)
        .initial_level(config.initial_level)
        .build()
        .run()?;
    let summary = Summary::from_steps(&steps);
    info!(
        total_cost = %summary.total_cost(),
        energy_cost = %summary.energy_cost,
        penalty_cost = %summary.penalty_cost,
        n_pumping_hours = summary.pumping_hours.len(),
        n_penalized_hours = summary.penalized_hours.len(),
        "simulated",
    );

    println!("{}", build_steps_table(&steps, &config.system.reservoir, config.tariff.mean()));
    println!("{}", build_summary_table(&summary));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = RunArgs {
            config: ConfigArgs { path: None },
            initial_level: Some(Metres(6.0)),
            on_non_convergence: Some(ConvergencePolicy::Accept),
        };
        let config = args.config().unwrap();
        assert_eq!(config.initial_level, Metres(6.0));
        assert_eq!(config.solver.on_non_convergence, ConvergencePolicy::Accept);
    }

    #[test]
    fn test_invalid_override() {
        let args = RunArgs {
            config: ConfigArgs { path: None },
            initial_level: Some(Metres(-1.0)),
            on_non_convergence: None,
        };
        assert!(args.config().is_err());
    }

    #[test]
    fn test_missing_file() {
        let args = RunArgs {
            config: ConfigArgs { path: Some("does-not-exist.toml".into()) },
            initial_level: None,
            on_non_convergence: None,
        };
        assert!(args.config().is_err());
    }
}
