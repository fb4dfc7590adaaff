//! Wire-level constants shared across the crate.
//!
//! The descriptor names below are read by downstream provenance verifiers and must be
//! reproduced byte for byte.

/// Name of the resolved dependency recording the composite execution's own config.
pub const PIPELINE_CONFIG_NAME: &str = "pipeline";

/// Name of the resolved dependency recording a leaf execution's own config.
pub const TASK_CONFIG_NAME: &str = "task";

/// Name of the resolved dependency recording a stage's config inside a composite.
pub const PIPELINE_TASK_CONFIG_NAME: &str = "pipelineTask";

/// Name given to materials derived from type-hinted parameters or results.
pub const INPUT_RESULT_NAME: &str = "inputs/result";

/// Name given to materials derived from declared external resources.
pub const PIPELINE_RESOURCE_NAME: &str = "pipelineResource";

/// Names exempt from duplicate suppression.
pub const PROTECTED_NAMES: [&str; 2] = [TASK_CONFIG_NAME, PIPELINE_CONFIG_NAME];

/// Type-hint parameter carrying a git repository URL.
pub const GIT_URL_HINT: &str = "CHAINS-GIT_URL";

/// Type-hint parameter carrying a git commit SHA.
pub const GIT_COMMIT_HINT: &str = "CHAINS-GIT_COMMIT";

/// Suffix marking object-typed params/results that describe an input artifact.
pub const ARTIFACT_INPUTS_SUFFIX: &str = "ARTIFACT_INPUTS";

/// Scheme prefix for OCI image material URIs.
pub const OCI_SCHEME: &str = "oci://";

/// Scheme prefix for git material URIs.
pub const GIT_SCHEME: &str = "git+";

/// Digest algorithm used for git commits.
pub const GIT_DIGEST_ALGORITHM: &str = "sha1";

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "PROVDEPS_CONFIG";

/// Label linking a task run to the pipeline task that spawned it.
pub const PIPELINE_TASK_LABEL: &str = "tekton.dev/pipelineTask";
