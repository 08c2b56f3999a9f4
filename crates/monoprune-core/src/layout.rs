//! Workspace layout discovery from `nx.json`.

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Name of the workspace-level configuration file.
pub const WORKSPACE_CONFIG_FILE: &str = "nx.json";

const DEFAULT_SERVICES_DIR: &str = "services";
const DEFAULT_LIBS_DIR: &str = "libs";

/// Typed view of `nx.json`. Only the layout overrides are read; every other
/// key in the file is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub workspace_layout: Option<LayoutOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOverrides {
    pub apps_dir: Option<String>,
    pub libs_dir: Option<String>,
}

impl WorkspaceConfig {
    /// Load `nx.json` from the workspace root, or return defaults if not found.
    pub fn load(workspace_root: &Path) -> crate::Result<Self> {
        let path = workspace_root.join(WORKSPACE_CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no workspace configuration, using default layout");
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| crate::Error::WorkspaceConfigRead {
                path: path.clone(),
                source: e,
            })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| crate::Error::WorkspaceConfigParse { path, source: e })
    }
}

/// Workspace-relative locations of services and shared libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub services_root: PathBuf,
    pub libraries_root: PathBuf,
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self {
            services_root: PathBuf::from(DEFAULT_SERVICES_DIR),
            libraries_root: PathBuf::from(DEFAULT_LIBS_DIR),
        }
    }
}

impl WorkspaceLayout {
    /// Resolve the layout, falling back to `services` / `libs` for each
    /// override that is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoprune_core::{WorkspaceConfig, WorkspaceLayout};
    /// use std::path::Path;
    ///
    /// let layout = WorkspaceLayout::resolve(&WorkspaceConfig::default());
    /// assert_eq!(layout.services_root, Path::new("services"));
    /// assert_eq!(layout.libraries_root, Path::new("libs"));
    /// ```
    pub fn resolve(config: &WorkspaceConfig) -> Self {
        let overrides = config.workspace_layout.as_ref();

        let services_root = overrides
            .and_then(|o| o.apps_dir.as_deref())
            .unwrap_or(DEFAULT_SERVICES_DIR);
        let libraries_root = overrides
            .and_then(|o| o.libs_dir.as_deref())
            .unwrap_or(DEFAULT_LIBS_DIR);

        Self {
            services_root: PathBuf::from(services_root),
            libraries_root: PathBuf::from(libraries_root),
        }
    }

    /// Workspace-relative directory of a service.
    pub fn service_dir(&self, name: &str) -> PathBuf {
        self.services_root.join(name)
    }

    /// Workspace-relative directory of a shared library.
    pub fn library_dir(&self, name: &str) -> PathBuf {
        self.libraries_root.join(name)
    }
}

/// True for a non-empty relative path made only of plain names, so joining
/// it under a root can never leave that root.
///
/// ```
/// use monoprune_core::layout::is_plain_relative;
/// use std::path::Path;
///
/// assert!(is_plain_relative(Path::new("libs/shared")));
/// assert!(!is_plain_relative(Path::new("../shared")));
/// assert!(!is_plain_relative(Path::new("/tmp/shared")));
/// ```
pub fn is_plain_relative(path: &Path) -> bool {
    let mut components = path.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}
