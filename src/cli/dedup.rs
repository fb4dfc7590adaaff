//! `provdeps dedup` - deduplicate an existing resolvedDependencies list.

use super::common::{read_document, write_document};
use crate::config::ProvdepsConfig;
use crate::models::ResolvedDependencies;
use crate::resolver::remove_duplicates;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct DedupCommand {
    /// Document with a resolvedDependencies list (.json, .yaml, .yml, or - for stdin)
    file: PathBuf,
}

impl DedupCommand {
    pub fn execute(self, config: &ProvdepsConfig) -> Result<()> {
        let doc: ResolvedDependencies = read_document(&self.file)?;
        let before = doc.resolved_dependencies.len();
        let deduped = remove_duplicates(doc.resolved_dependencies)?;
        info!("Removed {} duplicate(s)", before - deduped.len());
        Ok(write_document(deduped, &config.output)?)
    }
}
