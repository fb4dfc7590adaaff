//! Reading status snapshots from JSON or YAML.

use crate::core::{ProvdepsError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Serialization format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
    /// Unknown origin (stdin); JSON is tried first, then YAML.
    Detect,
}

impl InputFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            None => Ok(Self::Detect),
            Some(ext) => match ext.to_ascii_lowercase().as_str() {
                "json" => Ok(Self::Json),
                "yaml" | "yml" => Ok(Self::Yaml),
                other => Err(ProvdepsError::UnsupportedFormat {
                    extension: other.to_string(),
                }),
            },
        }
    }
}

/// Deserialize `content` read from `source` (used in error messages).
pub fn parse_document<T: DeserializeOwned>(
    content: &str,
    source: &str,
    format: InputFormat,
) -> Result<T> {
    let parse_err = |reason: String| ProvdepsError::InputParseError {
        file: source.to_string(),
        reason,
    };

    match format {
        InputFormat::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        InputFormat::Yaml => serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string())),
        InputFormat::Detect => match serde_json::from_str(content) {
            Ok(doc) => Ok(doc),
            Err(json_err) => {
                tracing::debug!("{} is not JSON ({}), trying YAML", source, json_err);
                serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{ParamValue, PipelineRun, TaskRun};

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("run.json")).unwrap(), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("run.YML")).unwrap(), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("run")).unwrap(), InputFormat::Detect);
        assert!(matches!(
            InputFormat::from_path(Path::new("run.xml")),
            Err(ProvdepsError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_detect_falls_back_to_yaml() {
        let yaml = "metadata:\n  name: build\nstatus:\n  steps: []\n";
        let run: TaskRun = parse_document(yaml, "<stdin>", InputFormat::Detect).unwrap();
        assert_eq!(run.metadata.name, "build");
    }

    #[test]
    fn test_bare_scalar_values_read_as_strings() {
        let yaml = r#"
metadata:
  name: release
spec:
  params:
    - name: dry-run
      value: true
    - name: CHAINS-GIT_COMMIT
      value: 1234567
    - name: retries
      value: [1, two, false]
    - name: limits
      value: {cpu: 2, burst: true}
"#;
        let run: PipelineRun = parse_document(yaml, "release.yaml", InputFormat::Yaml).unwrap();
        let params = &run.spec.params;
        assert_eq!(params[0].value, ParamValue::String("true".to_string()));
        assert_eq!(params[1].value, ParamValue::String("1234567".to_string()));
        assert_eq!(
            params[2].value,
            ParamValue::Array(vec!["1".to_string(), "two".to_string(), "false".to_string()])
        );
        assert_eq!(params[3].value.as_object().unwrap()["cpu"], "2");

        let json = r#"{"status": {"results": [{"name": "count", "value": -3}]}}"#;
        let run: TaskRun = parse_document(json, "run.json", InputFormat::Json).unwrap();
        assert_eq!(run.status.results[0].value.as_str(), Some("-3"));
    }

    #[test]
    fn test_null_param_value_is_rejected() {
        let yaml = "spec:\n  params:\n    - name: p\n      value: null\n";
        let err = parse_document::<TaskRun>(yaml, "run.yaml", InputFormat::Yaml).unwrap_err();
        assert!(matches!(err, ProvdepsError::InputParseError { .. }));
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = parse_document::<TaskRun>("{not json", "run.json", InputFormat::Json).unwrap_err();
        match err {
            ProvdepsError::InputParseError { file, .. } => assert_eq!(file, "run.json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
