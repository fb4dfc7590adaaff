//! Command-line interface for provdeps.
//!
//! # Available Commands
//!
//! - `resolve task-run <FILE>` - resolved dependencies of a leaf execution
//! - `resolve pipeline-run <FILE>` - resolved dependencies of a composite execution
//! - `dedup <FILE>` - deduplicate an existing `resolvedDependencies` list
//!
//! `<FILE>` may be `-` to read from stdin. The result is written to stdout as a
//! `{"resolvedDependencies": [...]}` document.
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output on stderr
//! - `--quiet` - Only report errors
//! - `--config` - Path to a config file (defaults to `$PROVDEPS_CONFIG`, then
//!   `~/.provdeps/config.toml`)
//! - `--format` - Output format, `json` or `yaml`
//!
//! # Example
//!
//! ```bash
//! provdeps resolve pipeline-run --deep-inspection run.yaml
//! kubectl get taskrun build -o json | provdeps resolve task-run -
//! ```

pub mod common;
mod dedup;
mod resolve;

use crate::config::{OutputFormat, ProvdepsConfig};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive, `None` for errors only
    pub log_level: Option<String>,
    pub config_path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

#[derive(Parser)]
#[command(
    name = "provdeps",
    about = "Build the resolvedDependencies list of a provenance document",
    version,
    long_about = "provdeps aggregates the configuration sources, container images, declared inputs and \
                  resources of a task run or pipeline run into an ordered, duplicate-free list of \
                  resource descriptors."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a config file (`PROVDEPS_CONFIG` is consulted when absent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the dependencies of a task run or pipeline run
    Resolve(resolve::ResolveCommand),

    /// Remove duplicates from an existing resolvedDependencies list
    Dedup(dedup::DedupCommand),
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("provdeps=debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("provdeps=info,warn".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
            format: self.format,
        }
    }

    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        init_logging(config.log_level.as_deref());

        let mut settings = ProvdepsConfig::load_with_optional(config.config_path.clone())?;
        if let Some(format) = config.format {
            settings.output.format = format;
        }

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(&settings),
            Commands::Dedup(cmd) => cmd.execute(&settings),
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `level`.
fn init_logging(level: Option<&str>) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(env) if !env.is_empty() => EnvFilter::new(env),
        _ => EnvFilter::new(level.unwrap_or("error")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_build_config_levels() {
        let cli = Cli::parse_from(["provdeps", "--verbose", "dedup", "deps.json"]);
        assert_eq!(cli.build_config().log_level.as_deref(), Some("provdeps=debug"));

        let cli = Cli::parse_from(["provdeps", "--quiet", "dedup", "deps.json"]);
        assert!(cli.build_config().log_level.is_none());

        let cli = Cli::parse_from(["provdeps", "dedup", "deps.json"]);
        assert!(cli.build_config().log_level.is_some());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["provdeps", "-v", "-q", "dedup", "deps.json"]).is_err());
    }

    #[test]
    #[serial]
    fn test_config_env_left_to_loader() {
        // SAFETY: serialized with the other env-touching tests
        unsafe { std::env::set_var(crate::constants::CONFIG_ENV_VAR, "/tmp/elsewhere.toml") };
        let cli = Cli::try_parse_from(["provdeps", "dedup", "deps.json"]);
        unsafe { std::env::remove_var(crate::constants::CONFIG_ENV_VAR) };

        assert!(cli.unwrap().build_config().config_path.is_none());
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::parse_from(["provdeps", "--format", "yaml", "resolve", "task-run", "run.json"]);
        assert_eq!(cli.build_config().format, Some(OutputFormat::Yaml));
    }
}
