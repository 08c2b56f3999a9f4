use serde::Deserialize;
use std::path::Path;

use crate::layout::{WorkspaceLayout, is_plain_relative};

/// Per-project manifest file name.
pub const PROJECT_MANIFEST_FILE: &str = "project.json";

/// Declared configuration of a single project, read from its `project.json`.
///
/// Only `name` and `implicitDependencies` are decoded; the rest of the
/// manifest (targets, tags, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfiguration {
    pub name: String,
    #[serde(default)]
    pub implicit_dependencies: Vec<String>,
}

impl ProjectConfiguration {
    /// Load `<services_root>/<project_name>/project.json` from the workspace.
    pub fn load(
        workspace_root: &Path,
        layout: &WorkspaceLayout,
        project_name: &str,
    ) -> crate::Result<Self> {
        check_project_name(project_name)?;

        let project_dir = workspace_root.join(layout.service_dir(project_name));
        let manifest_path = project_dir.join(PROJECT_MANIFEST_FILE);

        if !project_dir.is_dir() || !manifest_path.is_file() {
            return Err(crate::Error::ProjectNotFound {
                name: project_name.to_owned(),
                path: manifest_path,
            });
        }

        let content = std::fs::read_to_string(&manifest_path).map_err(|e| {
            crate::Error::ManifestRead {
                path: manifest_path.clone(),
                source: e,
            }
        })?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| crate::Error::MalformedManifest {
                path: manifest_path.clone(),
                source: e,
            })?;
        config.check_entries(&manifest_path)?;

        tracing::debug!(
            project = %config.name,
            dependencies = ?config.implicit_dependencies,
            "loaded project configuration"
        );

        Ok(config)
    }

    /// `name` and every dependency are joined under the output root, so each
    /// must stay below it.
    fn check_entries(&self, manifest_path: &Path) -> crate::Result<()> {
        let entries = std::iter::once(("name", &self.name)).chain(
            self.implicit_dependencies
                .iter()
                .map(|dep| ("implicitDependencies entry", dep)),
        );
        for (field, value) in entries {
            if !is_plain_relative(Path::new(value)) {
                return Err(crate::Error::InvalidManifestEntry {
                    path: manifest_path.to_path_buf(),
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Rejects an empty project name, or one that would resolve outside the
/// services root.
pub fn check_project_name(name: &str) -> crate::Result<()> {
    if name.is_empty() {
        return Err(crate::Error::MissingArgument);
    }
    if !is_plain_relative(Path::new(name)) {
        return Err(crate::Error::InvalidProjectName(name.to_owned()));
    }
    Ok(())
}
