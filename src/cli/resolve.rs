//! `provdeps resolve` - resolved dependencies of a task run or pipeline run.

use super::common::{read_document, write_document};
use crate::config::ProvdepsConfig;
use crate::resolver;
use crate::status::{PipelineRun, TaskRun};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct ResolveCommand {
    #[command(subcommand)]
    kind: ResolveKind,
}

#[derive(Subcommand)]
enum ResolveKind {
    /// Resolve a leaf execution (task run)
    TaskRun {
        /// Status snapshot (.json, .yaml, .yml, or - for stdin)
        file: PathBuf,
    },

    /// Resolve a composite execution (pipeline run) with its child task runs
    PipelineRun {
        /// Status snapshot (.json, .yaml, .yml, or - for stdin)
        file: PathBuf,

        /// Also inspect the results of every completed child task run
        #[arg(long)]
        deep_inspection: bool,
    },
}

impl ResolveCommand {
    pub fn execute(self, config: &ProvdepsConfig) -> Result<()> {
        let resolved = match self.kind {
            ResolveKind::TaskRun {
                file,
            } => {
                let run: TaskRun = read_document(&file)?;
                resolver::task_run(&run).with_context(|| {
                    format!("Failed to resolve dependencies of task run '{}'", run.metadata.name)
                })?
            }
            ResolveKind::PipelineRun {
                file,
                deep_inspection,
            } => {
                let run: PipelineRun = read_document(&file)?;
                let mut slsa = config.slsa;
                slsa.deep_inspection |= deep_inspection;
                resolver::pipeline_run(&run, &slsa).with_context(|| {
                    format!("Failed to resolve dependencies of pipeline run '{}'", run.metadata.name)
                })?
            }
        };

        info!("Resolved {} dependencies", resolved.len());
        Ok(write_document(resolved, &config.output)?)
    }
}
