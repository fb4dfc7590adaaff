//! provdeps - resolved dependencies for supply-chain provenance
//!
//! Builds the `resolvedDependencies` section of a provenance predicate: the ordered,
//! duplicate-free list of external artifacts that influenced a task run (leaf
//! execution) or a pipeline run (composite execution).
//!
//! # Architecture Overview
//!
//! ```text
//! status snapshot ──► material ──► resolver::convert_materials ──► resolver::remove_duplicates
//!  (TaskRun /         (images,      (categorize: "task",             (first-seen order,
//!   PipelineRun)       hints,        "pipeline", "inputs/result"...)   "task"/"pipeline" kept)
//!                      resources)
//! ```
//!
//! Everything is synchronous and side-effect free: a resolution is a pure function of
//! the snapshot it is handed, so independent runs can be resolved concurrently.
//!
//! # Modules
//!
//! - [`resolver`] - the two resolvers, the converter and the deduplicator
//! - [`material`] - extraction of materials from images, type hints and resources
//! - [`status`] - execution status snapshots and the stage lookup
//! - [`models`] - [`models::ResourceDescriptor`] and [`models::ProvenanceMaterial`]
//! - [`core`] - error types and user-friendly error reporting
//! - [`config`] - TOML configuration
//! - [`cli`] - the `provdeps` command line
//!
//! # Example
//!
//! ```rust
//! use provdeps::config::SlsaConfig;
//! use provdeps::resolver;
//! use provdeps::status::PipelineRun;
//!
//! let run: PipelineRun = serde_yaml::from_str(r#"
//! status:
//!   provenance:
//!     refSource: {uri: git.example/pipelines, digest: {sha1: p1}}
//!   pipelineSpec:
//!     tasks: [{name: build}, {name: deploy}]
//! taskRuns:
//!   - metadata: {labels: {tekton.dev/pipelineTask: build}}
//!     status:
//!       steps: [{name: compile, imageID: "reg/builder@sha256:b1"}]
//!       completionTime: "2024-01-01T00:00:00Z"
//! "#)?;
//!
//! let deps = resolver::pipeline_run(&run, &SlsaConfig::default())?;
//! assert_eq!(deps.len(), 2); // "deploy" never ran
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod material;
pub mod models;
pub mod resolver;
pub mod status;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
