mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use self::run::{RunArgs, run};
use crate::{config::Config, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Simulate the day and print the hourly steps and the summary.
    #[clap(name = "run")]
    Run(Box<RunArgs>),

    /// Print the effective configuration as TOML.
    #[clap(name = "config")]
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// TOML configuration file, the built-in system is used without it.
    #[clap(long = "config", env = "RESERVOIR_SIM_CONFIG")]
    pub path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config> {
        Config::read(self.path.as_deref())
    }

    /// Serialize the validated configuration, filled with the defaults.
    pub fn render(&self) -> Result<String> {
        let config = self.load()?;
        config.validate()?;
        toml::to_string_pretty(&config).context("failed to serialize the configuration")
    }

    pub fn print(&self) -> Result {
        print!("{}", self.render()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;
    use crate::{
        core::solver::{ConvergencePolicy, SolverSettings},
        quantity::length::Metres,
    };

    #[test]
    fn test_rendered_config_reads_back() {
        let source = env::temp_dir().join(format!("reservoir-sim-{}-source.toml", process::id()));
        fs::write(&source, "initial_level = 5.5\n[solver]\non_non_convergence = \"idle\"\n")
            .unwrap();
        let rendered = ConfigArgs { path: Some(source.clone()) }.render().unwrap();
        fs::remove_file(&source).unwrap();
        assert!(rendered.contains("[reservoir]"));

        let target = env::temp_dir().join(format!("reservoir-sim-{}-target.toml", process::id()));
        fs::write(&target, &rendered).unwrap();
        let config = Config::read(Some(&target)).unwrap();
        fs::remove_file(&target).unwrap();

        let expected = Config {
            initial_level: Metres(5.5),
            solver: SolverSettings {
                on_non_convergence: ConvergencePolicy::Idle,
                ..SolverSettings::default()
            },
            ..Config::default()
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn test_render_defaults() {
        let rendered = ConfigArgs { path: None }.render().unwrap();
        let config: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_render_rejects_invalid() {
        let path = env::temp_dir().join(format!("reservoir-sim-{}-invalid.toml", process::id()));
        fs::write(&path, "[reservoir]\narea = nan\n").unwrap();
        let result = ConfigArgs { path: Some(path.clone()) }.render();
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
