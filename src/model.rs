//! Data model for parsed components — format-agnostic.

use serde::Deserialize;
use serde_yaml::Value;

/// One declared input parameter of a component.
///
/// Every field except the name is optional and stays `None` when the
/// declaration omits it: "no default declared" must stay distinguishable
/// from "default declared as an empty value". An empty string, `[]`,
/// `false`, and `0` all count as declared defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Input {
    /// Mapping key of the declaration, filled in by the parser.
    #[serde(skip)]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub default: Option<Value>,
    pub options: Option<Vec<Value>>,
    pub regex: Option<String>,
}

impl Input {
    /// An input is mandatory exactly when no default was declared,
    /// regardless of whether the declared default is empty or falsy.
    pub fn is_mandatory(&self) -> bool {
        self.default.is_none()
    }
}

/// One pipeline job contributed by a component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Job {
    /// Top-level mapping key.
    pub name: String,
    /// Formatted leading comment attached to the key, `""` when none.
    pub comment: String,
}

/// One documented component, derived from one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    /// Source file base name with the extension stripped.
    pub name: String,
    /// Formatted comment attached to the `spec` key.
    pub description: String,
    pub inputs: Vec<Input>,
    pub jobs: Vec<Job>,
}

/// Render-time aggregate for one documentation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentsDocumentation {
    pub repo_url: String,
    pub version: String,
    /// Sorted by component name during assembly.
    pub components: Vec<Component>,
}
