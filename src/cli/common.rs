//! Input and output helpers shared by the commands.

use crate::config::{OutputConfig, OutputFormat};
use crate::core::ProvdepsError;
use crate::models::{ResolvedDependencies, ResourceDescriptor};
use crate::status::{InputFormat, parse_document};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::io::{Read, Write};
use std::path::Path;

/// Path argument that means "read stdin".
pub const STDIN_PATH: &str = "-";

/// Read and parse a document from `path`, or from stdin when `path` is `-`.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if path.as_os_str() == STDIN_PATH {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content).context("Failed to read from stdin")?;
        return Ok(parse_document(&content, "<stdin>", InputFormat::Detect)?);
    }

    let format = InputFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!("Read {} bytes from {}", content.len(), path.display());

    Ok(parse_document(&content, &path.display().to_string(), format)?)
}

/// Render the resolved-dependency document.
pub fn render(
    descriptors: Vec<ResourceDescriptor>,
    output: &OutputConfig,
) -> Result<String, ProvdepsError> {
    let doc = ResolvedDependencies {
        resolved_dependencies: descriptors,
    };

    let rendered = match (output.format, output.pretty) {
        (OutputFormat::Json, true) => serde_json::to_string_pretty(&doc)?,
        (OutputFormat::Json, false) => serde_json::to_string(&doc)?,
        (OutputFormat::Yaml, _) => serde_yaml::to_string(&doc)?,
    };
    Ok(rendered)
}

/// Render and write the document to stdout.
pub fn write_document(
    descriptors: Vec<ResourceDescriptor>,
    output: &OutputConfig,
) -> Result<(), ProvdepsError> {
    let rendered = render(descriptors, output)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
