//! Resolved-dependency construction for provenance documents.
//!
//! The resolvers gather every artifact that influenced an execution into the
//! `resolvedDependencies` list of a provenance predicate:
//!
//! - [`task_run`] handles a leaf execution: its configuration source, the images of
//!   its step and sidecar containers, type-hinted inputs and bound resources.
//! - [`pipeline_run`] handles a composite execution: its configuration source, the
//!   configuration and images of every stage that ran, and its own type-hinted
//!   inputs.
//!
//! # Ordering
//!
//! Entries are accumulated in a fixed order and deduplicated once at the end with
//! [`remove_duplicates`], so the first occurrence of every `(uri, digest)` identity
//! keeps its position:
//!
//! ```text
//! task_run                         pipeline_run
//! ───────────────────────────      ─────────────────────────────────────
//! "task"           ref source      "pipeline"       ref source
//! (unnamed)        step images     for each stage in tasks ++ finally:
//! (unnamed)        sidecar images      "pipelineTask"   stage ref source
//! "inputs/result"  type hints          (unnamed)        step + sidecar images
//! "pipelineResource" resources     "inputs/result"  type hints
//! ```
//!
//! # Errors
//!
//! An unparseable step or sidecar image aborts the whole call with
//! [`ProvdepsError::ImageReference`]; nothing collected before the failure is
//! returned. [`ProvdepsError::IdentitySerialization`] from deduplication signals an
//! internal bug rather than bad input.
//!
//! # Example
//!
//! ```rust
//! use provdeps::resolver;
//! use provdeps::status::TaskRun;
//!
//! let run: TaskRun = serde_json::from_str(r#"{
//!     "status": {
//!         "provenance": {"refSource": {"uri": "git.example/repo", "digest": {"sha1": "abc"}}},
//!         "steps": [{"name": "build", "imageID": "reg/img@sha256:d1"}]
//!     }
//! }"#)?;
//!
//! let deps = resolver::task_run(&run)?;
//! assert_eq!(deps[0].name(), "task");
//! assert_eq!(deps[1].uri, "oci://reg/img");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`ProvdepsError::ImageReference`]: crate::core::ProvdepsError::ImageReference
//! [`ProvdepsError::IdentitySerialization`]: crate::core::ProvdepsError::IdentitySerialization

mod convert;
mod dedup;


use crate::config::SlsaConfig;
use crate::constants::{
    INPUT_RESULT_NAME, PIPELINE_CONFIG_NAME, PIPELINE_RESOURCE_NAME, PIPELINE_TASK_CONFIG_NAME,
    TASK_CONFIG_NAME,
};
use crate::core::Result;
use crate::material;
use crate::models::ResourceDescriptor;
use crate::status::{PipelineRun, PipelineSpec, RefSource, TaskRun, TaskRunLookup};
use tracing::{debug, info};

pub use convert::convert_materials;
pub use dedup::{identity_key, is_protected, remove_duplicates};

fn config_descriptor(name: &str, source: &RefSource) -> ResourceDescriptor {
    ResourceDescriptor::named(name, source.uri.clone(), source.digest.clone())
}

/// Unnamed descriptors for the step images followed by the sidecar images of `run`.
fn container_images(run: &TaskRun) -> Result<Vec<ResourceDescriptor>> {
    let mut mats = material::from_step_images(&run.status.steps)?;
    mats.extend(material::from_sidecar_images(&run.status.sidecars)?);
    Ok(convert_materials(mats, ""))
}

/// Resolved dependencies of a leaf execution.
pub fn task_run(run: &TaskRun) -> Result<Vec<ResourceDescriptor>> {
    let mut resolved = Vec::new();

    if let Some(source) = run.ref_source() {
        resolved.push(config_descriptor(TASK_CONFIG_NAME, source));
    }

    resolved.extend(container_images(run)?);
    resolved.extend(convert_materials(
        material::from_task_params_and_results(run),
        INPUT_RESULT_NAME,
    ));
    resolved.extend(convert_materials(material::from_task_resources(run), PIPELINE_RESOURCE_NAME));

    remove_duplicates(resolved)
}

/// Resolved dependencies of a composite execution.
///
/// `config` controls how deeply type-hinted inputs are collected; see
/// [`material::from_pipeline_params_and_results`].
pub fn pipeline_run(run: &PipelineRun, config: &SlsaConfig) -> Result<Vec<ResourceDescriptor>> {
    let mut resolved = Vec::new();

    if let Some(source) = run.ref_source() {
        resolved.push(config_descriptor(PIPELINE_CONFIG_NAME, source));
    }

    resolved.extend(from_pipeline_tasks(run.status.pipeline_spec.as_ref(), run)?);
    resolved.extend(convert_materials(
        material::from_pipeline_params_and_results(run, config),
        INPUT_RESULT_NAME,
    ));

    remove_duplicates(resolved)
}

/// Descriptors contributed by the stages of a composite execution, not deduplicated.
///
/// Stages are visited in declared order, regular stages first and `finally` stages
/// after. A stage whose sub-execution is missing or has not completed contributes
/// nothing.
pub fn from_pipeline_tasks<L: TaskRunLookup>(
    spec: Option<&PipelineSpec>,
    lookup: &L,
) -> Result<Vec<ResourceDescriptor>> {
    let Some(spec) = spec else {
        debug!("No pipeline spec recorded, no stages to inspect");
        return Ok(Vec::new());
    };

    let mut resolved = Vec::new();
    for task in spec.all_tasks() {
        let run = match lookup.task_run_for(&task.name) {
            Some(run) if run.is_completed() => run,
            Some(_) => {
                info!("Task run for pipeline task {} has not completed, skipping", task.name);
                continue;
            }
            None => {
                info!("Task run status not found for pipeline task {}", task.name);
                continue;
            }
        };

        if let Some(source) = run.ref_source() {
            resolved.push(config_descriptor(PIPELINE_TASK_CONFIG_NAME, source));
        }
        resolved.extend(container_images(run)?);
    }

    Ok(resolved)
}
