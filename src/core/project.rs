//! Workspace discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the marker directory at the workspace root
pub const WORKSPACE_DIR: &str = ".bptea";

/// Directory holding persisted studies, relative to the root
pub const STUDIES_DIR: &str = "studies";

/// Represents a bptea workspace
#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory of the workspace (parent of .bptea/)
    root: PathBuf,
}

impl Project {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(WORKSPACE_DIR).is_dir() {
                tracing::debug!(root = %current.display(), "found workspace");
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new workspace at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = Self::resolve_root(path)?;
        if root.join(WORKSPACE_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }
        Self::create_layout(root)
    }

    /// Initialize even if .bptea/ exists, rewriting the default config
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = Self::resolve_root(path)?;
        Self::create_layout(root)
    }

    fn resolve_root(path: &Path) -> Result<PathBuf, ProjectError> {
        std::fs::create_dir_all(path).map_err(|e| ProjectError::IoError(e.to_string()))?;
        Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
    }

    fn create_layout(root: PathBuf) -> Result<Self, ProjectError> {
        let project = Self { root };

        std::fs::create_dir_all(project.workspace_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(project.config_path(), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::create_dir_all(project.studies_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        tracing::info!(root = %project.root.display(), "initialized workspace");
        Ok(project)
    }

    fn default_config() -> &'static str {
        r#"# bptea workspace configuration

# Owner recorded on new studies (default: git user.name, then $USER)
# owner: ""

# Editor to use for `bptea study edit` (default: $EDITOR)
# editor: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .bptea configuration directory
    pub fn workspace_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.workspace_dir().join("config.yaml")
    }

    /// Get the directory holding every owner's studies
    pub fn studies_dir(&self) -> PathBuf {
        self.root.join(STUDIES_DIR)
    }
}

/// Errors that can occur during workspace operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a bptea workspace (searched from {searched_from:?}). Run 'bptea init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("bptea workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.workspace_dir().is_dir());
        assert!(project.config_path().exists());
        assert!(project.studies_dir().is_dir());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_project_init_force_keeps_studies() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let marker = project.studies_dir().join("keep.txt");
        std::fs::write(&marker, "x").unwrap();

        Project::init_force(tmp.path()).unwrap();
        assert!(marker.exists());
    }

    #[test]
    fn test_project_init_creates_missing_directory() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("plant-a");
        let project = Project::init(&target).unwrap();
        assert!(project.studies_dir().is_dir());
    }

    #[test]
    fn test_project_discover_finds_workspace_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_workspace_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
