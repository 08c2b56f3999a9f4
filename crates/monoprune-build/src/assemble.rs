use monoprune_core::{
    MonopruneConfig, OutputLayout, OutputPolicy, ProjectConfiguration, WorkspaceConfig,
    WorkspaceLayout, check_project_name, is_plain_relative,
};
use std::path::{Component, Path, PathBuf};

use crate::deps::resolve_dependencies;
use crate::materialize::{CopyStats, CopyUnit, ExcludeSet, MaterializeError, copy_tree};

/// Workspace files the containerized build needs next to the pruned code.
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "pnpm-lock.yaml",
    "nx.json",
    "tsconfig.base.json",
];

/// Subdirectory holding service and library code in [`OutputLayout::Split`].
pub const SPLIT_CODE_DIR: &str = "full";
/// Subdirectory holding workspace manifest files in [`OutputLayout::Split`].
pub const SPLIT_MANIFEST_DIR: &str = "nx";

#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Output root, relative to the workspace root
    pub output_dir: PathBuf,
    pub layout: OutputLayout,
    pub policy: OutputPolicy,
    /// Library appended to every dependency set
    pub sentinel: String,
    /// Copied into the manifest root after [`MANIFEST_FILES`]
    pub extra_files: Vec<PathBuf>,
    /// Copied into the code root after the service
    pub extra_dirs: Vec<PathBuf>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self::from(&MonopruneConfig::default())
    }
}

impl From<&MonopruneConfig> for AssembleOptions {
    fn from(config: &MonopruneConfig) -> Self {
        Self {
            output_dir: config.output.dir.clone(),
            layout: config.output.layout,
            policy: config.output.policy,
            sentinel: config.context.sentinel.clone(),
            extra_files: config.context.extra_files.clone(),
            extra_dirs: config.context.extra_dirs.clone(),
        }
    }
}

/// Outcome of a successful [`ContextAssembler::assemble`] run.
#[derive(Debug, Clone)]
pub struct ContextReport {
    pub output_root: PathBuf,
    /// Libraries copied, in copy order (sentinel last)
    pub dependencies: Vec<String>,
    /// Workspace manifest files copied
    pub manifest_files: Vec<PathBuf>,
    pub stats: CopyStats,
}

/// Builds a pruned build context for one service of a workspace.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    workspace_root: PathBuf,
    options: AssembleOptions,
}

impl ContextAssembler {
    pub fn new(workspace_root: impl Into<PathBuf>, options: AssembleOptions) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            options,
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.workspace_root.join(&self.options.output_dir)
    }

    /// Where service and library trees are mirrored.
    pub fn code_root(&self) -> PathBuf {
        match self.options.layout {
            OutputLayout::Flat => self.output_root(),
            OutputLayout::Split => self.output_root().join(SPLIT_CODE_DIR),
        }
    }

    /// Where workspace manifest files are copied.
    pub fn manifest_root(&self) -> PathBuf {
        match self.options.layout {
            OutputLayout::Flat => self.output_root(),
            OutputLayout::Split => self.output_root().join(SPLIT_MANIFEST_DIR),
        }
    }

    /// Runs the whole pipeline for `project_name`, aborting on the first
    /// failure. An aborted run may leave a partially populated output root.
    pub fn assemble(&self, project_name: &str) -> Result<ContextReport, ContextError> {
        check_project_name(project_name)?;
        let exclude = self.exclude_set()?;

        tracing::info!("getting workspace configuration");
        let workspace_config = WorkspaceConfig::load(&self.workspace_root)?;
        let layout = WorkspaceLayout::resolve(&workspace_config);
        tracing::debug!(
            services = %layout.services_root.display(),
            libs = %layout.libraries_root.display(),
            "resolved workspace layout"
        );
        self.check_paths(&layout)?;

        let service_dir = self.workspace_root.join(layout.service_dir(project_name));
        if !service_dir.is_dir() {
            return Err(monoprune_core::Error::ProjectNotFound {
                name: project_name.to_owned(),
                path: service_dir,
            }
            .into());
        }

        self.prepare_output()?;

        tracing::info!(project = project_name, "found service, getting project configuration");
        let config = ProjectConfiguration::load(&self.workspace_root, &layout, project_name)?;
        if config.name != project_name {
            tracing::warn!(
                project = project_name,
                manifest_name = %config.name,
                "project.json name differs from requested project; output uses the manifest name"
            );
        }

        let dependencies = resolve_dependencies(&config, &self.options.sentinel);
        let code_root = self.code_root();
        let mut stats = CopyStats::default();

        tracing::info!(count = dependencies.len(), "copying implicit dependencies");
        for name in &dependencies {
            let relative = layout.library_dir(name);
            let unit = CopyUnit {
                source: self.workspace_root.join(&relative),
                destination: code_root.join(&relative),
                exclude: &exclude,
            };
            tracing::info!(
                dependency = %name,
                destination = %unit.destination.display(),
                "copying implicit dependency"
            );
            stats += copy_tree(&unit).map_err(|e| match e {
                MaterializeError::SourceNotFound(path)
                | MaterializeError::SourceNotADirectory(path) => ContextError::DependencyNotFound {
                    name: name.clone(),
                    path,
                },
                other => other.into(),
            })?;
        }

        let unit = CopyUnit {
            source: service_dir,
            destination: code_root.join(layout.service_dir(&config.name)),
            exclude: &exclude,
        };
        tracing::info!(
            project = project_name,
            destination = %unit.destination.display(),
            "copying service"
        );
        stats += copy_tree(&unit).map_err(|e| match e {
            MaterializeError::SourceNotFound(path)
            | MaterializeError::SourceNotADirectory(path) => {
                ContextError::from(monoprune_core::Error::ProjectNotFound {
                    name: project_name.to_owned(),
                    path,
                })
            }
            other => other.into(),
        })?;

        for relative in &self.options.extra_dirs {
            let unit = CopyUnit {
                source: self.workspace_root.join(relative),
                destination: code_root.join(relative),
                exclude: &exclude,
            };
            tracing::info!(dir = %relative.display(), "copying extra directory");
            stats += copy_tree(&unit).map_err(|e| match e {
                MaterializeError::SourceNotFound(path)
                | MaterializeError::SourceNotADirectory(path) => {
                    ContextError::ExtraDirNotFound(path)
                }
                other => other.into(),
            })?;
        }

        let manifest_files = self.copy_manifest_files()?;
        stats.files += manifest_files.len();

        tracing::info!(
            output = %self.output_root().display(),
            files = stats.files,
            "pruning complete"
        );

        Ok(ContextReport {
            output_root: self.output_root(),
            dependencies,
            manifest_files,
            stats,
        })
    }

    /// Fixed exclusions plus the output directory's own name, so a custom
    /// output root nested in a copied tree is never copied into itself.
    fn exclude_set(&self) -> Result<ExcludeSet, ContextError> {
        let name = self
            .options
            .output_dir
            .file_name()
            .ok_or_else(|| ContextError::InvalidOutputDir(self.options.output_dir.clone()))?;
        Ok(ExcludeSet::default().with(name.to_string_lossy()))
    }

    /// A clean run deletes the output root, so it must be a plain relative
    /// path that neither contains nor sits inside any tree copied from. Extra
    /// paths and the sentinel are joined under the output root and must stay
    /// below it too.
    fn check_paths(&self, layout: &WorkspaceLayout) -> Result<(), ContextError> {
        let output = without_cur_dir(&self.options.output_dir);
        if !is_plain_relative(&output) {
            return Err(ContextError::InvalidOutputDir(self.options.output_dir.clone()));
        }

        for extra in self.options.extra_dirs.iter().chain(&self.options.extra_files) {
            if !is_plain_relative(&without_cur_dir(extra)) {
                return Err(ContextError::InvalidExtraPath(extra.clone()));
            }
        }
        if !is_plain_relative(Path::new(&self.options.sentinel)) {
            return Err(ContextError::InvalidSentinel(self.options.sentinel.clone()));
        }

        let trees = [&layout.services_root, &layout.libraries_root]
            .into_iter()
            .chain(&self.options.extra_dirs);
        for tree in trees {
            let tree = without_cur_dir(tree);
            if tree.starts_with(&output) || output.starts_with(&tree) {
                return Err(ContextError::OutputOverlapsSource { output, tree });
            }
        }
        Ok(())
    }

    fn prepare_output(&self) -> Result<(), ContextError> {
        let root = self.output_root();

        if root.exists() {
            match self.options.policy {
                OutputPolicy::Clean => {
                    tracing::info!(path = %root.display(), "clearing existing output directory");
                    std::fs::remove_dir_all(&root).map_err(|e| ContextError::PrepareOutput {
                        path: root.clone(),
                        source: e,
                    })?;
                }
                OutputPolicy::Reuse => {
                    tracing::warn!(
                        path = %root.display(),
                        "output directory already exists, pruning may be incomplete"
                    );
                }
            }
        } else {
            tracing::info!(path = %root.display(), "creating output directory");
        }

        for dir in [root, self.code_root(), self.manifest_root()] {
            std::fs::create_dir_all(&dir)
                .map_err(|e| ContextError::PrepareOutput { path: dir, source: e })?;
        }
        Ok(())
    }

    fn copy_manifest_files(&self) -> Result<Vec<PathBuf>, ContextError> {
        let manifest_root = self.manifest_root();
        tracing::info!(
            destination = %manifest_root.display(),
            "copying workspace manifest files"
        );

        let files: Vec<PathBuf> = MANIFEST_FILES
            .iter()
            .map(PathBuf::from)
            .chain(self.options.extra_files.iter().cloned())
            .collect();

        for relative in &files {
            let source = self.workspace_root.join(relative);
            if !source.is_file() {
                return Err(ContextError::ManifestFileMissing(source));
            }

            let target = manifest_root.join(relative);
            copy_file(&source, &target)?;
            tracing::debug!(
                file = %relative.display(),
                destination = %target.display(),
                "copied manifest file"
            );
        }

        Ok(files)
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn copy_file(source: &Path, target: &Path) -> Result<(), ContextError> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ContextError::PrepareOutput {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::copy(source, target).map_err(|e| ContextError::CopyManifest {
        path: source.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Core(#[from] monoprune_core::Error),
    #[error("output directory {0} must name a directory below the workspace root")]
    InvalidOutputDir(PathBuf),
    #[error("output directory {output} overlaps workspace tree {tree}")]
    OutputOverlapsSource { output: PathBuf, tree: PathBuf },
    #[error("extra path {0} must be relative and stay below the workspace root")]
    InvalidExtraPath(PathBuf),
    #[error("invalid sentinel library name '{0}'")]
    InvalidSentinel(String),
    #[error("failed to prepare output directory {path}")]
    PrepareOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not find dependency '{name}' (expected a directory at {path})")]
    DependencyNotFound { name: String, path: PathBuf },
    #[error("could not find extra directory {0}")]
    ExtraDirNotFound(PathBuf),
    #[error("workspace manifest file {0} is missing")]
    ManifestFileMissing(PathBuf),
    #[error("failed to copy manifest file {path}")]
    CopyManifest {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}
