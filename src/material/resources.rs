//! Materials from external resources bound to a task run.

use super::hints::git_material;
use crate::models::ProvenanceMaterial;
use crate::status::{ResourceBinding, TaskRun};
use tracing::debug;

const GIT_RESOURCE_TYPE: &str = "git";

fn is_full_sha(revision: &str) -> bool {
    revision.len() == 40 && revision.bytes().all(|b| b.is_ascii_hexdigit())
}

fn resource_material(binding: &ResourceBinding) -> Option<ProvenanceMaterial> {
    if binding.resource_type != GIT_RESOURCE_TYPE {
        return None;
    }

    let url = binding.param("url").filter(|u| !u.is_empty())?;
    let commit = binding
        .commit
        .as_deref()
        .filter(|c| !c.is_empty())
        .or_else(|| binding.param("revision").filter(|r| is_full_sha(r)));

    match commit {
        Some(commit) => Some(git_material(url, commit)),
        None => {
            debug!("Git resource '{}' has no resolved commit, skipping", binding.name);
            None
        }
    }
}

/// Materials for the git resources bound to `task_run`, in binding order.
pub fn from_task_resources(task_run: &TaskRun) -> Vec<ProvenanceMaterial> {
    task_run.spec.resources.iter().filter_map(resource_material).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{Param, ParamValue};

    fn git_binding(name: &str, url: &str, revision: &str, commit: Option<&str>) -> ResourceBinding {
        ResourceBinding {
            name: name.to_string(),
            resource_type: "git".to_string(),
            params: vec![
                Param {
                    name: "url".to_string(),
                    value: ParamValue::String(url.to_string()),
                },
                Param {
                    name: "revision".to_string(),
                    value: ParamValue::String(revision.to_string()),
                },
            ],
            commit: commit.map(str::to_string),
        }
    }

    #[test]
    fn test_git_resource_with_commit() {
        let mut tr = TaskRun::default();
        tr.spec.resources = vec![git_binding("src", "https://git.example/app", "main", Some("c0ffee"))];

        let mats = from_task_resources(&tr);
        assert_eq!(mats.len(), 1);
        assert_eq!(mats[0].uri, "git+https://git.example/app.git");
        assert_eq!(mats[0].digest["sha1"], "c0ffee");
    }

    #[test]
    fn test_full_sha_revision_used_as_commit() {
        let sha = "0123456789abcdef0123456789abcdef01234567";
        let mut tr = TaskRun::default();
        tr.spec.resources = vec![git_binding("src", "https://git.example/app.git", sha, None)];

        let mats = from_task_resources(&tr);
        assert_eq!(mats[0].uri, "git+https://git.example/app.git");
        assert_eq!(mats[0].digest["sha1"], sha);
    }

    #[test]
    fn test_branch_revision_without_commit_is_skipped() {
        let mut tr = TaskRun::default();
        tr.spec.resources = vec![git_binding("src", "https://git.example/app", "main", None)];
        assert!(from_task_resources(&tr).is_empty());
    }

    #[test]
    fn test_non_git_resources_are_ignored() {
        let mut tr = TaskRun::default();
        let mut binding = git_binding("img", "https://reg.example/app", "main", Some("c0ffee"));
        binding.resource_type = "image".to_string();
        tr.spec.resources = vec![binding];
        assert!(from_task_resources(&tr).is_empty());
    }
}
