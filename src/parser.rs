//! Component document parser.
//!
//! A component file is one or more YAML documents concatenated: typically a
//! `spec` document declaring typed inputs, followed by a document
//! contributing pipeline jobs. Document separators are blanked first so the
//! whole file decodes as a single top-level mapping, then the key/value
//! pairs are walked once in source order. Descriptions come from the
//! comments attached to the keys in the source text.

use crate::comments::CommentMap;
use crate::model::{Input, Job};
use crate::strip;
use anyhow::{Context, Result};
use serde_yaml::Value;

/// Top-level keywords that are pipeline configuration, never jobs.
const RESERVED_TOP_LEVEL_KEYS: &[&str] = &[
    "stages",
    "default",
    "include",
    "workflow",
    "spec",
    "image",
    "services",
    "cache",
    "before_script",
    "after_script",
];

/// Parsed contents of one component file, before a name is attached.
#[derive(Debug, Default, PartialEq)]
pub struct ComponentConfig {
    pub description: String,
    pub inputs: Vec<Input>,
    pub jobs: Vec<Job>,
}

/// Parse one component document.
///
/// The `spec` key contributes the input declarations and the component
/// description (from its attached comment). Any other top-level key whose
/// value is a mapping and whose name is not reserved is a job; scalar and
/// sequence-valued keys are ignored. Malformed YAML is a hard error with
/// no per-file recovery.
pub fn parse_component(content: &str) -> Result<ComponentConfig> {
    let cleaned = strip::strip_document_separators(content);
    let comments = CommentMap::scan(&cleaned);

    let root: Value = serde_yaml::from_str(&cleaned).context("failed to parse component YAML")?;

    let mut config = ComponentConfig::default();
    if root.is_null() {
        return Ok(config);
    }
    let Some(mapping) = root.as_mapping() else {
        anyhow::bail!("component document root must be a mapping");
    };

    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            continue;
        };
        if key == "spec" {
            config.description = comments.top_level(key).unwrap_or_default().to_string();
            config.inputs = parse_spec_inputs(value, &comments)?;
        } else if is_job_mapping(key, value) {
            config.jobs.push(Job {
                name: key.to_string(),
                comment: comments.top_level(key).unwrap_or_default().to_string(),
            });
        }
    }

    Ok(config)
}

/// Decode the `inputs` mapping of a `spec` value.
///
/// Each entry becomes an [`Input`] named after its key; undeclared fields
/// stay `None`, and a `null`-valued entry declares nothing at all. An
/// explicit `description` field wins over a comment attached to the key.
fn parse_spec_inputs(spec: &Value, comments: &CommentMap) -> Result<Vec<Input>> {
    let Some(entries) = spec.get("inputs").and_then(Value::as_mapping) else {
        return Ok(Vec::new());
    };

    let mut inputs = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let name = key
            .as_str()
            .context("input names must be strings")?
            .to_string();
        let mut input: Input = if value.is_null() {
            Input::default()
        } else {
            serde_yaml::from_value(value.clone())
                .with_context(|| format!("invalid declaration for input `{name}`"))?
        };
        if input.description.is_none() {
            input.description = comments.input(&name).map(str::to_string);
        }
        input.name = name;
        inputs.push(input);
    }

    Ok(inputs)
}

fn is_job_mapping(key: &str, value: &Value) -> bool {
    value.is_mapping() && !RESERVED_TOP_LEVEL_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spec_inputs_and_jobs_across_documents() {
        let content = r#"---
# Spec comment
spec:
  inputs:
    string-input:
      description: "String description"
      type: "string"
      default: "test"
    array-input:
      type: "array"
      default: []
    bool-input:
      description: "Boolean description"
      type: "boolean"
      default: false
    number-input:
      description: "Number description"
      default: 1
    options-input:
      options:
        - 1
    regex-input:
      regex: 'regex'
...
---
# First job comment
first-job: {}
# Second job comment
second-job: {}
"#;

        let config = parse_component(content).unwrap();

        assert_eq!(config.description, "Spec comment");
        assert_eq!(
            config.jobs,
            vec![
                Job {
                    name: "first-job".to_string(),
                    comment: "First job comment".to_string(),
                },
                Job {
                    name: "second-job".to_string(),
                    comment: "Second job comment".to_string(),
                },
            ]
        );

        assert_eq!(
            config.inputs,
            vec![
                Input {
                    name: "string-input".to_string(),
                    description: Some("String description".to_string()),
                    input_type: Some("string".to_string()),
                    default: Some(Value::String("test".to_string())),
                    ..Input::default()
                },
                Input {
                    name: "array-input".to_string(),
                    input_type: Some("array".to_string()),
                    default: Some(Value::Sequence(Vec::new())),
                    ..Input::default()
                },
                Input {
                    name: "bool-input".to_string(),
                    description: Some("Boolean description".to_string()),
                    input_type: Some("boolean".to_string()),
                    default: Some(Value::Bool(false)),
                    ..Input::default()
                },
                Input {
                    name: "number-input".to_string(),
                    description: Some("Number description".to_string()),
                    default: Some(Value::Number(1.into())),
                    ..Input::default()
                },
                Input {
                    name: "options-input".to_string(),
                    options: Some(vec![Value::Number(1.into())]),
                    ..Input::default()
                },
                Input {
                    name: "regex-input".to_string(),
                    regex: Some("regex".to_string()),
                    ..Input::default()
                },
            ]
        );
    }

    #[test]
    fn null_input_declares_nothing() {
        let config = parse_component("spec:\n  inputs:\n    stage:\n").unwrap();
        assert_eq!(config.inputs.len(), 1);
        let input = &config.inputs[0];
        assert_eq!(input.name, "stage");
        assert_eq!(input.description, None);
        assert_eq!(input.input_type, None);
        assert_eq!(input.default, None);
        assert_eq!(input.options, None);
        assert_eq!(input.regex, None);
        assert!(input.is_mandatory());
    }

    #[test]
    fn input_comment_is_a_description_fallback() {
        let content = "spec:\n  inputs:\n    # The deploy stage\n    stage:\n";
        let config = parse_component(content).unwrap();
        assert_eq!(config.inputs[0].description, Some("The deploy stage".to_string()));
    }

    #[test]
    fn explicit_description_wins_over_comment() {
        let content =
            "spec:\n  inputs:\n    # Comment description\n    stage:\n      description: \"Field description\"\n";
        let config = parse_component(content).unwrap();
        assert_eq!(
            config.inputs[0].description,
            Some("Field description".to_string())
        );
    }

    #[test]
    fn reserved_keywords_are_never_jobs() {
        let content = "workflow:\n  rules: []\nimage:\n  name: alpine\nbuild-job:\n  script: echo\n";
        let config = parse_component(content).unwrap();
        assert_eq!(config.jobs.len(), 1);
        assert_eq!(config.jobs[0].name, "build-job");
    }

    #[test]
    fn scalar_and_sequence_keys_are_never_jobs() {
        let content = "variables-file: path.yml\nsome-list:\n  - a\n  - b\nreal-job: {}\n";
        let config = parse_component(content).unwrap();
        assert_eq!(config.jobs.len(), 1);
        assert_eq!(config.jobs[0].name, "real-job");
    }

    #[test]
    fn job_without_comment_gets_empty_comment() {
        let config = parse_component("build-job:\n  script: echo\n").unwrap();
        assert_eq!(config.jobs[0].comment, "");
    }

    #[test]
    fn missing_spec_yields_empty_description_and_inputs() {
        let config = parse_component("build-job: {}\n").unwrap();
        assert_eq!(config.description, "");
        assert!(config.inputs.is_empty());
    }

    #[test]
    fn empty_document_parses_to_empty_config() {
        let config = parse_component("---\n...\n").unwrap();
        assert_eq!(config, ComponentConfig::default());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(parse_component("spec:\n  inputs:\n   bad\n  indent: [\n").is_err());
    }

    #[test]
    fn non_mapping_root_is_an_error() {
        assert!(parse_component("- just\n- a\n- sequence\n").is_err());
    }
}
