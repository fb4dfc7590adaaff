//! Materials declared through type-hinted parameters and results.
//!
//! Two hint shapes are understood:
//! - a `CHAINS-GIT_URL` / `CHAINS-GIT_COMMIT` pair of string values, and
//! - object values named `*ARTIFACT_INPUTS` with `uri` and `digest` (`alg:hex`) keys.

use crate::config::SlsaConfig;
use crate::constants::{
    ARTIFACT_INPUTS_SUFFIX, GIT_COMMIT_HINT, GIT_DIGEST_ALGORITHM, GIT_SCHEME, GIT_URL_HINT,
};
use crate::models::{ProvenanceMaterial, digest_set};
use crate::status::{ParamValue, PipelineRun, TaskRun, TaskRunLookup};
use tracing::debug;

/// Accumulates hints in precedence order; later values override earlier ones.
#[derive(Debug, Default)]
struct HintCollector {
    git_url: Option<String>,
    git_commit: Option<String>,
    artifacts: Vec<ProvenanceMaterial>,
}

impl HintCollector {
    fn observe(&mut self, name: &str, value: &ParamValue) {
        match (name, value) {
            (GIT_URL_HINT, ParamValue::String(url)) => self.git_url = Some(url.clone()),
            (GIT_COMMIT_HINT, ParamValue::String(commit)) => self.git_commit = Some(commit.clone()),
            (_, ParamValue::Object(fields)) if name.ends_with(ARTIFACT_INPUTS_SUFFIX) => {
                match artifact_material(fields.get("uri"), fields.get("digest")) {
                    Some(mat) => self.artifacts.push(mat),
                    None => debug!("Skipping malformed {} hint '{}'", ARTIFACT_INPUTS_SUFFIX, name),
                }
            }
            _ => {}
        }
    }

    fn observe_all<'a>(&mut self, values: impl IntoIterator<Item = (&'a str, &'a ParamValue)>) {
        for (name, value) in values {
            self.observe(name, value);
        }
    }

    /// Emit the git material (if both halves were seen) followed by artifact inputs.
    fn finish(self) -> Vec<ProvenanceMaterial> {
        let mut mats = Vec::with_capacity(self.artifacts.len() + 1);
        match (self.git_url, self.git_commit) {
            (Some(url), Some(commit)) if !url.is_empty() && !commit.is_empty() => {
                mats.push(git_material(&url, &commit));
            }
            (Some(_), None) | (None, Some(_)) => {
                debug!("Ignoring incomplete git hint: both {} and {} are required", GIT_URL_HINT, GIT_COMMIT_HINT);
            }
            _ => {}
        }
        mats.extend(self.artifacts);
        mats
    }
}

/// `git+<url>.git` pinned to a commit.
pub(crate) fn git_material(url: &str, commit: &str) -> ProvenanceMaterial {
    let uri = if url.ends_with(".git") {
        format!("{GIT_SCHEME}{url}")
    } else {
        format!("{GIT_SCHEME}{url}.git")
    };
    ProvenanceMaterial::new(uri, digest_set([(GIT_DIGEST_ALGORITHM, commit)]))
}

fn artifact_material(uri: Option<&String>, digest: Option<&String>) -> Option<ProvenanceMaterial> {
    let uri = uri.filter(|u| !u.is_empty())?;
    let (algorithm, hex) = digest?.split_once(':')?;
    if algorithm.is_empty() || hex.is_empty() {
        return None;
    }
    Some(ProvenanceMaterial::new(uri.clone(), digest_set([(algorithm, hex)])))
}

/// Materials hinted by a task run's declared param defaults, its params and its results.
pub fn from_task_params_and_results(task_run: &TaskRun) -> Vec<ProvenanceMaterial> {
    let mut hints = HintCollector::default();

    if let Some(spec) = &task_run.status.task_spec {
        hints.observe_all(
            spec.params.iter().filter_map(|p| p.default.as_ref().map(|d| (p.name.as_str(), d))),
        );
    }
    hints.observe_all(task_run.spec.params.iter().map(|p| (p.name.as_str(), &p.value)));
    hints.observe_all(task_run.status.results.iter().map(|r| (r.name.as_str(), &r.value)));

    hints.finish()
}

/// Materials hinted by a pipeline run's params and results.
///
/// With [`SlsaConfig::deep_inspection`] the results of the completed task run behind
/// each declared stage are inspected as well, in stage order (regular stages, then
/// `finally`). Child runs that belong to no declared stage are not looked at.
pub fn from_pipeline_params_and_results(
    pipeline_run: &PipelineRun,
    config: &SlsaConfig,
) -> Vec<ProvenanceMaterial> {
    let mut hints = HintCollector::default();

    if let Some(spec) = &pipeline_run.status.pipeline_spec {
        hints.observe_all(
            spec.params.iter().filter_map(|p| p.default.as_ref().map(|d| (p.name.as_str(), d))),
        );
    }
    hints.observe_all(pipeline_run.spec.params.iter().map(|p| (p.name.as_str(), &p.value)));
    hints.observe_all(pipeline_run.status.results.iter().map(|r| (r.name.as_str(), &r.value)));

    let mut mats = hints.finish();

    if config.deep_inspection {
        let stages = pipeline_run.status.pipeline_spec.as_ref().map(|spec| spec.all_tasks());
        for stage in stages.unwrap_or_default() {
            let Some(task_run) = pipeline_run.task_run_for(&stage.name) else {
                continue;
            };
            if !task_run.is_completed() {
                continue;
            }

            let mut child = HintCollector::default();
            child.observe_all(task_run.status.results.iter().map(|r| (r.name.as_str(), &r.value)));
            let found = child.finish();
            if !found.is_empty() {
                debug!(
                    "Deep inspection found {} material(s) in stage '{}' (task run '{}')",
                    found.len(),
                    stage.name,
                    task_run.metadata.name
                );
            }
            mats.extend(found);
        }
    }

    mats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{InputFormat, Param, ParamSpec, RunResult, TaskSpec, parse_document};
    use crate::test_utils::{PipelineRunBuilder, TaskRunBuilder};
    use std::collections::BTreeMap;

    fn string_param(name: &str, value: &str) -> Param {
        Param {
            name: name.to_string(),
            value: ParamValue::String(value.to_string()),
        }
    }

    fn object_result(name: &str, uri: &str, digest: &str) -> RunResult {
        let mut fields = BTreeMap::new();
        fields.insert("uri".to_string(), uri.to_string());
        fields.insert("digest".to_string(), digest.to_string());
        RunResult {
            name: name.to_string(),
            result_type: Some("object".to_string()),
            value: ParamValue::Object(fields),
        }
    }

    #[test]
    fn test_git_hint_from_params() {
        let mut tr = TaskRun::default();
        tr.spec.params = vec![
            string_param(GIT_URL_HINT, "https://git.example/repo"),
            string_param(GIT_COMMIT_HINT, "abc123"),
        ];

        let mats = from_task_params_and_results(&tr);
        assert_eq!(
            mats,
            vec![ProvenanceMaterial::new(
                "git+https://git.example/repo.git",
                digest_set([("sha1", "abc123")])
            )]
        );
    }

    #[test]
    fn test_run_params_override_spec_defaults() {
        let mut tr = TaskRun::default();
        tr.status.task_spec = Some(TaskSpec {
            params: vec![
                ParamSpec {
                    name: GIT_URL_HINT.to_string(),
                    param_type: None,
                    default: Some(ParamValue::String("https://default/repo.git".to_string())),
                },
                ParamSpec {
                    name: GIT_COMMIT_HINT.to_string(),
                    param_type: None,
                    default: Some(ParamValue::String("000".to_string())),
                },
            ],
        });
        tr.spec.params = vec![string_param(GIT_COMMIT_HINT, "fff")];

        let mats = from_task_params_and_results(&tr);
        assert_eq!(mats.len(), 1);
        assert_eq!(mats[0].uri, "git+https://default/repo.git");
        assert_eq!(mats[0].digest["sha1"], "fff");
    }

    #[test]
    fn test_incomplete_git_hint_is_ignored() {
        let mut tr = TaskRun::default();
        tr.spec.params = vec![string_param(GIT_URL_HINT, "https://git.example/repo")];
        assert!(from_task_params_and_results(&tr).is_empty());
    }

    #[test]
    fn test_artifact_inputs_result() {
        let mut tr = TaskRun::default();
        tr.status.results = vec![
            object_result("source_ARTIFACT_INPUTS", "https://src.example/app.tgz", "sha256:d2"),
            object_result("bad_ARTIFACT_INPUTS", "https://src.example/x", "nodigest"),
            object_result("unrelated", "https://src.example/y", "sha256:00"),
        ];

        let mats = from_task_params_and_results(&tr);
        assert_eq!(
            mats,
            vec![ProvenanceMaterial::new("https://src.example/app.tgz", digest_set([("sha256", "d2")]))]
        );
    }

    #[test]
    fn test_pipeline_hints_and_deep_inspection() {
        let pr = PipelineRunBuilder::new("release")
            .param(GIT_URL_HINT, "https://git.example/pipe")
            .param(GIT_COMMIT_HINT, "p1")
            .task("build")
            .task("test")
            .finally("notify")
            .task_run(
                TaskRunBuilder::new("release-notify")
                    .for_pipeline_task("notify")
                    .artifact_result("cfg_ARTIFACT_INPUTS", "https://cfg.example/n", "sha256:cc")
                    .build(),
            )
            .task_run(
                TaskRunBuilder::new("release-build")
                    .for_pipeline_task("build")
                    .artifact_result("img_ARTIFACT_INPUTS", "oci://reg/base", "sha256:aa")
                    .build(),
            )
            .task_run(
                TaskRunBuilder::new("release-test")
                    .for_pipeline_task("test")
                    .artifact_result("img_ARTIFACT_INPUTS", "oci://reg/other", "sha256:bb")
                    .incomplete()
                    .build(),
            )
            .build();

        let shallow = from_pipeline_params_and_results(&pr, &SlsaConfig::default());
        assert_eq!(shallow.len(), 1);
        assert_eq!(shallow[0].uri, "git+https://git.example/pipe.git");

        let deep = from_pipeline_params_and_results(
            &pr,
            &SlsaConfig {
                deep_inspection: true,
            },
        );
        let uris: Vec<&str> = deep.iter().map(|m| m.uri.as_str()).collect();
        assert_eq!(uris, ["git+https://git.example/pipe.git", "oci://reg/base", "https://cfg.example/n"]);
    }

    #[test]
    fn test_deep_inspection_ignores_undeclared_task_runs() {
        let pr = PipelineRunBuilder::new("release")
            .task("build")
            .task_run(
                TaskRunBuilder::new("release-build")
                    .for_pipeline_task("build")
                    .artifact_result("img_ARTIFACT_INPUTS", "oci://reg/base", "sha256:aa")
                    .build(),
            )
            .task_run(
                TaskRunBuilder::new("stray")
                    .for_pipeline_task("not-in-pipeline")
                    .artifact_result("img_ARTIFACT_INPUTS", "oci://reg/stray", "sha256:ff")
                    .build(),
            )
            .task_run(
                TaskRunBuilder::new("unlabelled")
                    .artifact_result("img_ARTIFACT_INPUTS", "oci://reg/loose", "sha256:ee")
                    .build(),
            )
            .build();

        let deep = from_pipeline_params_and_results(
            &pr,
            &SlsaConfig {
                deep_inspection: true,
            },
        );
        assert_eq!(deep, vec![ProvenanceMaterial::new("oci://reg/base", digest_set([("sha256", "aa")]))]);
    }

    #[test]
    fn test_numeric_git_commit_from_yaml() {
        let yaml = r#"
metadata:
  name: release
spec:
  params:
    - name: CHAINS-GIT_URL
      value: https://git.example/pipe
    - name: CHAINS-GIT_COMMIT
      value: 1234567
status:
  pipelineSpec:
    tasks: []
"#;
        let pr: PipelineRun = parse_document(yaml, "release.yaml", InputFormat::Yaml).unwrap();

        let mats = from_pipeline_params_and_results(&pr, &SlsaConfig::default());
        assert_eq!(
            mats,
            vec![ProvenanceMaterial::new(
                "git+https://git.example/pipe.git",
                digest_set([("sha1", "1234567")])
            )]
        );
    }
}
