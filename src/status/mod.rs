//! Execution status snapshots
//!
//! These types mirror the status documents recorded by the orchestrator for a leaf
//! execution ([`TaskRun`]) and a composite execution ([`PipelineRun`]). They are
//! read-only inputs: provdeps deserializes a snapshot once and never mutates it.
//!
//! Field names follow the orchestrator's camelCase wire format so snapshots can be
//! fed in as exported JSON or YAML.
//!
//! ```rust
//! use provdeps::status::TaskRun;
//!
//! let run: TaskRun = serde_json::from_str(r#"{
//!     "metadata": {"name": "build"},
//!     "status": {
//!         "steps": [{"name": "compile", "imageID": "reg/img@sha256:d1"}],
//!         "completionTime": "2024-01-01T00:00:00Z"
//!     }
//! }"#).unwrap();
//! assert!(run.is_completed());
//! ```

pub mod io;

use crate::constants::PIPELINE_TASK_LABEL;
use crate::models::DigestSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub use io::{InputFormat, parse_document};

/// Where a run's own configuration was fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefSource {
    pub uri: String,
    #[serde(default)]
    pub digest: DigestSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_source: Option<RefSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_flags: Option<serde_json::Value>,
}

/// Recorded state of a step container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepState {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "imageID", default)]
    pub image_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

/// Recorded state of a sidecar container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SidecarState {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "imageID", default)]
    pub image_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

/// A parameter or result value: string, array or object.
///
/// Bare numbers and booleans (unquoted YAML scalars such as `value: 1234567`) are
/// read as their string form, at the top level as well as inside arrays and objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Array(Vec<String>),
    Object(BTreeMap<String, String>),
}

/// Scalar as it may appear on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireScalar {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl WireScalar {
    fn into_string(self) -> String {
        match self {
            Self::String(s) => s,
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Uint(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged, expecting = "a string, number, boolean, array or object parameter value")]
enum WireParamValue {
    Scalar(WireScalar),
    Array(Vec<WireScalar>),
    Object(BTreeMap<String, WireScalar>),
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match WireParamValue::deserialize(deserializer)? {
            WireParamValue::Scalar(scalar) => Self::String(scalar.into_string()),
            WireParamValue::Array(items) => {
                Self::Array(items.into_iter().map(WireScalar::into_string).collect())
            }
            WireParamValue::Object(fields) => Self::Object(
                fields.into_iter().map(|(k, v)| (k, v.into_string())).collect(),
            ),
        })
    }
}

impl ParamValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: ParamValue,
}

/// A declared parameter, possibly with a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
}

/// A result emitted by a task run or a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,
    pub value: ParamValue,
}

/// An external resource bound to a task run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceBinding {
    pub name: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub params: Vec<Param>,
    /// Commit the resource resolved to, as reported by the fetcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl ResourceBinding {
    /// Value of a string-typed resource param.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|p| p.name == name).and_then(|p| p.value.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRunSpec {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub resources: Vec<ResourceBinding>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    #[serde(default)]
    pub steps: Vec<StepState>,
    #[serde(default)]
    pub sidecars: Vec<SidecarState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_spec: Option<TaskSpec>,
    #[serde(default, alias = "taskResults")]
    pub results: Vec<RunResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
}

/// A leaf execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRun {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: TaskRunSpec,
    #[serde(default)]
    pub status: TaskRunStatus,
}

impl TaskRun {
    /// Whether the run reached a terminal point with a recorded completion time.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.completion_time.is_some()
    }

    /// The run's own configuration source, if recorded.
    #[must_use]
    pub fn ref_source(&self) -> Option<&RefSource> {
        self.status.provenance.as_ref().and_then(|p| p.ref_source.as_ref())
    }

    /// The pipeline task this run was spawned for, if any.
    #[must_use]
    pub fn pipeline_task(&self) -> Option<&str> {
        self.metadata.labels.get(PIPELINE_TASK_LABEL).map(String::as_str)
    }
}

/// A named stage of a composite execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineTask {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSpec {
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    #[serde(default)]
    pub tasks: Vec<PipelineTask>,
    /// Stages that run after `tasks` regardless of their outcome
    #[serde(default)]
    pub finally: Vec<PipelineTask>,
}

impl PipelineSpec {
    /// Regular stages followed by `finally` stages, each group in declared order.
    #[must_use]
    pub fn all_tasks(&self) -> Vec<&PipelineTask> {
        self.tasks.iter().chain(self.finally.iter()).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineRunSpec {
    #[serde(default)]
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_spec: Option<PipelineSpec>,
    #[serde(default, alias = "pipelineResults")]
    pub results: Vec<RunResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
}

/// A composite execution together with the task runs it spawned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PipelineRunSpec,
    #[serde(default)]
    pub status: PipelineRunStatus,
    #[serde(default)]
    pub task_runs: Vec<TaskRun>,
}

impl PipelineRun {
    /// The run's own configuration source, if recorded.
    #[must_use]
    pub fn ref_source(&self) -> Option<&RefSource> {
        self.status.provenance.as_ref().and_then(|p| p.ref_source.as_ref())
    }
}

/// Lookup from stage name to the sub-execution that ran it.
pub trait TaskRunLookup {
    fn task_run_for(&self, pipeline_task: &str) -> Option<&TaskRun>;
}

impl TaskRunLookup for PipelineRun {
    fn task_run_for(&self, pipeline_task: &str) -> Option<&TaskRun> {
        self.task_runs.iter().find(|tr| tr.pipeline_task() == Some(pipeline_task))
    }
}
