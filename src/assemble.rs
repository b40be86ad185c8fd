//! Directory scanning and component aggregation.

use crate::fs::Filesystem;
use crate::model::{Component, ComponentsDocumentation};
use crate::parser::{self, ComponentConfig};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Pattern for component definition files; the scan is non-recursive.
const COMPONENT_FILE_PATTERN: &str = "*.yml";

/// Read every component file in `component_dir`, parse it, and aggregate
/// the results into a sorted [`ComponentsDocumentation`].
///
/// Zero matching files is a configuration error. A single unparsable file
/// aborts the whole run; no partial documentation is ever produced.
pub fn assemble_documentation(
    filesystem: &dyn Filesystem,
    component_dir: &Path,
    repo_url: &str,
    version: &str,
) -> Result<ComponentsDocumentation> {
    let paths = filesystem.glob_files(component_dir, COMPONENT_FILE_PATTERN)?;
    if paths.is_empty() {
        bail!("no component files found in {}", component_dir.display());
    }

    let mut components = Vec::with_capacity(paths.len());
    for path in &paths {
        let content = filesystem.read_to_string(path)?;
        let config = parser::parse_component(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        components.push(component_from_config(config, component_name_from_path(path)));
    }
    tracing::info!(count = components.len(), "found components");

    Ok(build_documentation(components, repo_url, version))
}

/// Derive the component name from its file path.
/// `this/is/my/file.yml` → `file`
pub fn component_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

fn component_from_config(config: ComponentConfig, name: String) -> Component {
    Component {
        name,
        description: config.description,
        inputs: config.inputs,
        jobs: config.jobs,
    }
}

/// Sort components by name, and each component's inputs and jobs by name,
/// then wrap everything up with the repository metadata. Sorting is stable,
/// so duplicate names (not expected) keep their source order.
fn build_documentation(
    mut components: Vec<Component>,
    repo_url: &str,
    version: &str,
) -> ComponentsDocumentation {
    components.sort_by(|a, b| a.name.cmp(&b.name));
    for component in &mut components {
        component.inputs.sort_by(|a, b| a.name.cmp(&b.name));
        component.jobs.sort_by(|a, b| a.name.cmp(&b.name));
    }

    ComponentsDocumentation {
        repo_url: repo_url.to_string(),
        version: version.to_string(),
        components,
    }
}
