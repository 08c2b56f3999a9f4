use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the optional tool configuration file at the workspace root.
pub const CONFIG_FILE: &str = "monoprune.toml";

/// Library that is always part of the build context: the build-tooling plugin
/// that the containerized build invokes again.
pub const DEFAULT_SENTINEL: &str = "nx-python";

/// monoprune.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonopruneConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub context: ContextConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output root, relative to the workspace root
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Where code and manifest files land inside the output root
    #[serde(default)]
    pub layout: OutputLayout,
    /// What to do with an output root left over from a previous run
    #[serde(default)]
    pub policy: OutputPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Library appended to every dependency set
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
    /// Workspace files copied in addition to the fixed manifest list
    #[serde(default)]
    pub extra_files: Vec<PathBuf>,
    /// Workspace directories copied in addition to libraries and the service,
    /// e.g. `tools/plugins`
    #[serde(default)]
    pub extra_dirs: Vec<PathBuf>,
}

/// Arrangement of the output root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// Code and manifest files side by side in the output root.
    #[default]
    Flat,
    /// Code under `full/`, manifest files under `nx/`, so the manifest layer
    /// can be cached separately by the image build.
    Split,
}

/// Handling of a pre-existing output root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputPolicy {
    /// Delete and recreate the output root.
    #[default]
    Clean,
    /// Keep the existing output root; stale files may survive.
    Reuse,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            layout: OutputLayout::default(),
            policy: OutputPolicy::default(),
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            extra_files: Vec::new(),
            extra_dirs: Vec::new(),
        }
    }
}

impl MonopruneConfig {
    /// Load from monoprune.toml at the given path, or return defaults if not found.
    pub fn load(workspace_root: &std::path::Path) -> crate::Result<Self> {
        let config_path = workspace_root.join(CONFIG_FILE);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_owned()
}
