use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names that are never copied into a build context: package
/// caches, previous output, build artifacts and virtual environments.
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", "out", "dist", "venv", ".venv"];

/// Set of directory names skipped while copying a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeSet {
    names: Vec<String>,
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self {
            names: EXCLUDED_DIRS.iter().map(|n| (*n).to_owned()).collect(),
        }
    }
}

impl ExcludeSet {
    /// Adds a directory name to the set. Adding a name twice is a no-op.
    pub fn with(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
        self
    }

    pub fn matches(&self, name: &OsStr) -> bool {
        self.names.iter().any(|n| OsStr::new(n) == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One subtree copy: everything under `source` is mirrored at `destination`.
#[derive(Debug, Clone)]
pub struct CopyUnit<'a> {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub exclude: &'a ExcludeSet,
}

/// What a [`copy_tree`] call wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
}

impl std::ops::AddAssign for CopyStats {
    fn add_assign(&mut self, rhs: Self) {
        self.files += rhs.files;
        self.dirs += rhs.dirs;
    }
}

/// Recursively copies `unit.source` into `unit.destination`.
///
/// Directories below the source root whose name is in `unit.exclude` are
/// skipped without being descended into. Symlinks are followed, so their
/// targets' contents are copied. Files already present at the destination are
/// overwritten; a failure partway leaves whatever was copied so far.
pub fn copy_tree(unit: &CopyUnit<'_>) -> Result<CopyStats, MaterializeError> {
    if !unit.source.exists() {
        return Err(MaterializeError::SourceNotFound(unit.source.clone()));
    }
    if !unit.source.is_dir() {
        return Err(MaterializeError::SourceNotADirectory(unit.source.clone()));
    }

    tracing::debug!(
        source = %unit.source.display(),
        destination = %unit.destination.display(),
        "copying tree"
    );

    let mut stats = CopyStats::default();
    let walker = WalkDir::new(&unit.source)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded_dir(e, unit.exclude));

    for entry in walker {
        let entry = entry.map_err(|e| MaterializeError::Walk {
            path: unit.source.clone(),
            source: e,
        })?;
        let relative =
            entry
                .path()
                .strip_prefix(&unit.source)
                .map_err(|e| MaterializeError::OutsideSource {
                    path: entry.path().to_path_buf(),
                    source: e,
                })?;
        let target = unit.destination.join(relative);

        if entry.file_type().is_dir() {
            create_dir(&target)?;
            stats.dirs += 1;
        } else {
            if let Some(parent) = target.parent() {
                create_dir(parent)?;
            }
            std::fs::copy(entry.path(), &target).map_err(|e| MaterializeError::CopyFile {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            stats.files += 1;
        }
    }

    Ok(stats)
}

fn is_excluded_dir(entry: &walkdir::DirEntry, exclude: &ExcludeSet) -> bool {
    entry.file_type().is_dir() && exclude.matches(entry.file_name())
}

fn create_dir(path: &Path) -> Result<(), MaterializeError> {
    std::fs::create_dir_all(path).map_err(|e| MaterializeError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("source {0} does not exist")]
    SourceNotFound(PathBuf),
    #[error("source {0} is not a directory")]
    SourceNotADirectory(PathBuf),
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("walked path {path} lies outside the source tree")]
    OutsideSource {
        path: PathBuf,
        source: std::path::StripPrefixError,
    },
}
