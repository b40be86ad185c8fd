//! Documentation rendering through minijinja.
//!
//! The template engine is a black box: template source plus a serialized
//! context in, text out. The context exposes `repo_url`, `version` and
//! `components`; input fields are pre-formatted into display strings so
//! templates never deal with absent values, which arrive as the literal
//! `-` placeholder.

use crate::fs::Filesystem;
use crate::model::{Component, ComponentsDocumentation, Input, Job};
use anyhow::{Context, Result};
use minijinja::Environment;
use serde::Serialize;
use serde_yaml::Value;
use std::path::Path;

/// Sentinel `--template` value selecting the bundled template.
pub const DEFAULT_TEMPLATE: &str = "default";

const DEFAULT_TEMPLATE_SOURCE: &str = include_str!("templates/default.md.j2");

/// Rendered for any input field with no declared value.
const NO_VALUE: &str = "-";

/// Resolve the template source: the [`DEFAULT_TEMPLATE`] sentinel selects
/// the bundled template, anything else is read from the filesystem.
pub fn load_template(filesystem: &dyn Filesystem, template_path: &str) -> Result<String> {
    if template_path == DEFAULT_TEMPLATE {
        tracing::info!("using default template");
        return Ok(DEFAULT_TEMPLATE_SOURCE.to_string());
    }
    tracing::info!(path = template_path, "using custom template");
    filesystem.read_to_string(Path::new(template_path))
}

/// Render the documentation through the given template.
pub fn render_documentation(
    documentation: &ComponentsDocumentation,
    template_source: &str,
) -> Result<String> {
    let env = Environment::new();
    let template = env
        .template_from_str(template_source)
        .context("failed to parse template")?;
    template
        .render(DocumentationView::new(documentation))
        .context("failed to render template")
}

// -- Template context ---------------------------------------------------------

#[derive(Serialize)]
struct DocumentationView {
    repo_url: String,
    version: String,
    components: Vec<ComponentView>,
}

#[derive(Serialize)]
struct ComponentView {
    name: String,
    description: String,
    inputs: Vec<InputView>,
    jobs: Vec<JobView>,
}

#[derive(Serialize)]
struct InputView {
    name: String,
    description: String,
    #[serde(rename = "type")]
    input_type: String,
    default: String,
    options: String,
    regex: String,
    mandatory: String,
}

#[derive(Serialize)]
struct JobView {
    name: String,
    comment: String,
}

impl DocumentationView {
    fn new(documentation: &ComponentsDocumentation) -> Self {
        Self {
            repo_url: documentation.repo_url.clone(),
            version: documentation.version.clone(),
            components: documentation.components.iter().map(component_view).collect(),
        }
    }
}

fn component_view(component: &Component) -> ComponentView {
    ComponentView {
        name: component.name.clone(),
        description: component.description.clone(),
        inputs: component.inputs.iter().map(input_view).collect(),
        jobs: component.jobs.iter().map(job_view).collect(),
    }
}

fn job_view(job: &Job) -> JobView {
    JobView {
        name: job.name.clone(),
        comment: job.comment.clone(),
    }
}

fn input_view(input: &Input) -> InputView {
    InputView {
        name: input.name.clone(),
        description: display_or_placeholder(input.description.clone()),
        input_type: display_or_placeholder(input.input_type.clone()),
        default: input
            .default
            .as_ref()
            .map(format_default)
            .unwrap_or_else(|| NO_VALUE.to_string()),
        options: format_options(input.options.as_deref()),
        regex: display_or_placeholder(input.regex.clone()),
        mandatory: if input.is_mandatory() { "Yes" } else { "No" }.to_string(),
    }
}

fn display_or_placeholder(field: Option<String>) -> String {
    field.unwrap_or_else(|| NO_VALUE.to_string())
}

/// Format a declared default for the documentation table. Strings carry
/// surrounding quotes so an empty-string default is visible as `""`.
fn format_default(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{text}\""),
        other => format_bare(other),
    }
}

/// Declared options render as a bracketed space-separated sequence;
/// an empty declaration falls back to the placeholder.
fn format_options(options: Option<&[Value]>) -> String {
    match options {
        Some(options) if !options.is_empty() => format!(
            "[{}]",
            options.iter().map(format_bare).collect::<Vec<_>>().join(" ")
        ),
        _ => NO_VALUE.to_string(),
    }
}

/// Literal rendering without string quoting, used inside sequences.
fn format_bare(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Sequence(items) => format!(
            "[{}]",
            items.iter().map(format_bare).collect::<Vec<_>>().join(" ")
        ),
        Value::Mapping(entries) => {
            let pairs: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}: {}", format_bare(key), format_bare(value)))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        }
        Value::Tagged(tagged) => format_bare(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> Input {
        Input {
            name: name.to_string(),
            ..Input::default()
        }
    }

    #[test]
    fn absent_fields_render_as_placeholder() {
        let view = input_view(&input("stage"));
        assert_eq!(view.description, "-");
        assert_eq!(view.input_type, "-");
        assert_eq!(view.default, "-");
        assert_eq!(view.options, "-");
        assert_eq!(view.regex, "-");
        assert_eq!(view.mandatory, "Yes");
    }

    #[test]
    fn empty_string_default_renders_quoted() {
        let mut declared = input("name");
        declared.default = Some(Value::String(String::new()));
        let view = input_view(&declared);
        assert_eq!(view.default, "\"\"");
        assert_eq!(view.mandatory, "No");
    }

    #[test]
    fn falsy_defaults_render_literally() {
        for (default, expected) in [
            (Value::Sequence(Vec::new()), "[]"),
            (Value::Bool(false), "false"),
            (Value::Number(0.into()), "0"),
        ] {
            let mut declared = input("name");
            declared.default = Some(default);
            let view = input_view(&declared);
            assert_eq!(view.default, expected);
            assert_eq!(view.mandatory, "No");
        }
    }

    #[test]
    fn options_render_space_separated() {
        let mut declared = input("name");
        declared.options = Some(vec![
            Value::String("one".to_string()),
            Value::String("two".to_string()),
        ]);
        assert_eq!(input_view(&declared).options, "[one two]");
    }

    #[test]
    fn empty_options_fall_back_to_placeholder() {
        let mut declared = input("name");
        declared.options = Some(Vec::new());
        assert_eq!(input_view(&declared).options, "-");
    }

    #[test]
    fn sequence_defaults_nest() {
        let mut declared = input("name");
        declared.default = Some(Value::Sequence(vec![
            Value::String("a".to_string()),
            Value::Sequence(vec![Value::Number(1.into()), Value::Number(2.into())]),
        ]));
        assert_eq!(input_view(&declared).default, "[a [1 2]]");
    }

    #[test]
    fn renders_custom_template() {
        let documentation = ComponentsDocumentation {
            repo_url: "example.com/repo".to_string(),
            version: "1.0.0".to_string(),
            components: vec![Component {
                name: "demo".to_string(),
                description: "A demo component".to_string(),
                ..Component::default()
            }],
        };

        let rendered = render_documentation(
            &documentation,
            "{% for component in components %}Description: {{ component.description }}\n{% endfor %}",
        )
        .unwrap();
        assert_eq!(rendered, "Description: A demo component\n");
    }

    #[test]
    fn default_template_renders_usage_snippet() {
        let documentation = ComponentsDocumentation {
            repo_url: "example.com/repo".to_string(),
            version: "2.1.0".to_string(),
            components: vec![Component {
                name: "demo".to_string(),
                description: "A demo component".to_string(),
                jobs: vec![Job {
                    name: "demo-job".to_string(),
                    comment: "Runs the demo".to_string(),
                }],
                ..Component::default()
            }],
        };

        let template = load_template(&crate::fs::MemoryFilesystem::new(), DEFAULT_TEMPLATE).unwrap();
        let rendered = render_documentation(&documentation, &template).unwrap();

        assert!(rendered.starts_with("# Components Documentation\n"));
        assert!(rendered.contains("component: \"example.com/repo/demo@2.1.0\""));
        assert!(rendered.contains("##### `demo-job`\n\nRuns the demo"));
    }

    #[test]
    fn invalid_template_syntax_is_an_error() {
        let documentation = ComponentsDocumentation::default();
        assert!(render_documentation(&documentation, "{% for %}").is_err());
    }
}
