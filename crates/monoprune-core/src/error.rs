use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing project name; pass it with `--scope <name>`")]
    MissingArgument,

    #[error("invalid project name '{0}': expected a plain directory name")]
    InvalidProjectName(String),

    // ── monoprune.toml ──
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── nx.json ──
    #[error("failed to read workspace configuration {path}")]
    WorkspaceConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse workspace configuration {path}")]
    WorkspaceConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    // ── project.json ──
    #[error("could not find project '{name}' in workspace (looked in {path})")]
    ProjectNotFound { name: String, path: PathBuf },

    #[error("failed to read project manifest {path}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed project manifest {path}")]
    MalformedManifest {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("project manifest {path} has invalid {field} '{value}': expected a relative path without `..`")]
    InvalidManifestEntry {
        path: PathBuf,
        field: &'static str,
        value: String,
    },
}
