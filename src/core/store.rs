//! Study persistence
//!
//! [`StudyStore`] is the seam between the CLI and storage; studies are keyed
//! by (owner, id). [`FileStore`] keeps one YAML document per study under
//! `studies/<owner>/<ID>.bptea.yaml` in a workspace.

use miette::Diagnostic;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::error::{ConfigurationError, ValidationError};
use crate::core::identity::StudyId;
use crate::core::project::Project;
use crate::entities::Study;
use crate::yaml::YamlSyntaxError;

/// File suffix of a persisted study
pub const STUDY_SUFFIX: &str = ".bptea.yaml";

/// Failures of a study store
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    #[diagnostic(code(bptea::store::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("could not serialize study: {0}")]
    #[diagnostic(code(bptea::store::serialize))]
    Serialize(String),

    #[error("no study matching '{0}'")]
    #[diagnostic(
        code(bptea::store::not_found),
        help("run `bptea study list` to see available studies")
    )]
    NotFound(String),

    #[error("'{partial}' matches several studies: {matches}")]
    #[diagnostic(code(bptea::store::ambiguous), help("use more characters of the id"))]
    Ambiguous { partial: String, matches: String },

    #[error("{path} holds invalid parameters: {source}")]
    #[diagnostic(code(bptea::store::invalid_parameters))]
    InvalidParameters {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("{path} holds an invalid configuration: {source}")]
    #[diagnostic(code(bptea::store::invalid_configuration))]
    InvalidConfiguration {
        path: PathBuf,
        #[source]
        source: ConfigurationError,
    },
}

/// Persistence of studies keyed by owner and id
pub trait StudyStore {
    /// Write a study, replacing any previous version
    fn save(&self, study: &Study) -> Result<(), StoreError>;

    /// Read one study
    fn load(&self, owner: &str, id: &StudyId) -> Result<Study, StoreError>;

    /// Every readable study of an owner, oldest first
    fn list(&self, owner: &str) -> Result<Vec<Study>, StoreError>;

    /// Remove a study
    fn delete(&self, owner: &str, id: &StudyId) -> Result<(), StoreError>;

    /// Resolve a full or partial id among an owner's studies
    fn resolve(&self, owner: &str, partial: &str) -> Result<StudyId, StoreError> {
        if let Ok(id) = StudyId::parse(partial) {
            return Ok(id);
        }

        let matches: Vec<StudyId> = self
            .list(owner)?
            .into_iter()
            .map(|study| study.id)
            .filter(|id| id.matches_prefix(partial))
            .collect();

        match matches.as_slice() {
            [] => Err(StoreError::NotFound(partial.to_string())),
            [id] => Ok(*id),
            _ => Err(StoreError::Ambiguous {
                partial: partial.to_string(),
                matches: matches
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// YAML files under a studies directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// A store rooted at an arbitrary directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store of a workspace
    pub fn for_project(project: &Project) -> Self {
        Self::new(project.studies_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one owner's studies
    pub fn owner_dir(&self, owner: &str) -> PathBuf {
        self.root.join(owner_slug(owner))
    }

    /// Path of a study file
    pub fn study_path(&self, owner: &str, id: &StudyId) -> PathBuf {
        self.owner_dir(owner).join(format!("{}{}", id, STUDY_SUFFIX))
    }

    /// Read and validate a study file
    pub fn read_file(path: &Path) -> Result<Study, StoreError> {
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let study: Study = serde_yml::from_str(&content)
            .map_err(|e| YamlSyntaxError::from_serde_error(&e, &content, &filename))?;

        study
            .parameters
            .validate()
            .map_err(|source| StoreError::InvalidParameters {
                path: path.to_path_buf(),
                source,
            })?;
        study
            .configuration
            .resolve(&Catalog::standard())
            .map_err(|source| StoreError::InvalidConfiguration {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(study)
    }

    fn study_files(&self, owner: &str) -> impl Iterator<Item = PathBuf> {
        walkdir::WalkDir::new(self.owner_dir(owner))
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_string_lossy().ends_with(STUDY_SUFFIX))
            .map(|e| e.into_path())
    }
}

impl StudyStore for FileStore {
    fn save(&self, study: &Study) -> Result<(), StoreError> {
        let path = self.study_path(&study.owner, &study.id);
        let dir = self.owner_dir(&study.owner);
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let yaml = serde_yml::to_string(study).map_err(|e| StoreError::Serialize(e.to_string()))?;

        // Write then rename so a failed write never truncates the old file
        let staging = path.with_extension("yaml.tmp");
        fs::write(&staging, yaml).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(id = %study.id, path = %path.display(), revision = study.revision, "saved study");
        Ok(())
    }

    fn load(&self, owner: &str, id: &StudyId) -> Result<Study, StoreError> {
        let path = self.study_path(owner, id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tracing::debug!(path = %path.display(), "loading study");
        Self::read_file(&path)
    }

    fn list(&self, owner: &str) -> Result<Vec<Study>, StoreError> {
        let mut studies: Vec<Study> = self
            .study_files(owner)
            .filter_map(|path| match Self::read_file(&path) {
                Ok(study) => Some(study),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable study");
                    None
                }
            })
            .collect();
        studies.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(studies)
    }

    fn delete(&self, owner: &str, id: &StudyId) -> Result<(), StoreError> {
        let path = self.study_path(owner, id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fs::remove_file(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(id = %id, "deleted study");
        Ok(())
    }
}

/// Filesystem-safe directory name for an owner
fn owner_slug(owner: &str) -> String {
    let slug: String = owner
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if slug.is_empty() || slug.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, FileStore) {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("studies"));
        (tmp, store)
    }

    #[test]
    fn test_save_then_load() {
        let (_tmp, store) = store();
        let mut study = Study::new("Plant A", "alice");
        study.configuration.select("captureStep", "Large Resin").unwrap();
        store.save(&study).unwrap();

        let loaded = store.load("alice", &study.id).unwrap();
        assert_eq!(loaded, study);
        assert!(store.study_path("alice", &study.id).exists());
    }

    #[test]
    fn test_studies_are_scoped_by_owner() {
        let (_tmp, store) = store();
        let study = Study::new("Plant A", "alice");
        store.save(&study).unwrap();

        assert!(matches!(
            store.load("bob", &study.id),
            Err(StoreError::NotFound(_))
        ));
        assert!(store.list("bob").unwrap().is_empty());
        assert_eq!(store.list("alice").unwrap().len(), 1);
    }

    #[test]
    fn test_list_orders_by_creation_and_skips_broken_files() {
        let (_tmp, store) = store();
        let first = Study::new("First", "alice");
        let second = Study::new("Second", "alice");
        store.save(&second).unwrap();
        store.save(&first).unwrap();
        fs::write(
            store.owner_dir("alice").join(format!("STDY-BROKEN{}", STUDY_SUFFIX)),
            "name: [",
        )
        .unwrap();

        let names: Vec<_> = store
            .list("alice")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_delete() {
        let (_tmp, store) = store();
        let study = Study::new("Plant A", "alice");
        store.save(&study).unwrap();
        store.delete("alice", &study.id).unwrap();
        assert!(matches!(
            store.delete("alice", &study.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_partial_ids() {
        let (_tmp, store) = store();
        let study = Study::new("Plant A", "alice");
        store.save(&study).unwrap();

        let full = study.id.to_string();
        assert_eq!(store.resolve("alice", &full).unwrap(), study.id);
        assert_eq!(store.resolve("alice", &full[..12]).unwrap(), study.id);
        assert!(matches!(
            store.resolve("alice", "STDY-ZZZ"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_reports_ambiguity() {
        let (_tmp, store) = store();
        store.save(&Study::new("One", "alice")).unwrap();
        store.save(&Study::new("Two", "alice")).unwrap();
        assert!(matches!(
            store.resolve("alice", "STDY-"),
            Err(StoreError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_out_of_domain_file_is_rejected() {
        let (_tmp, store) = store();
        let mut study = Study::new("Plant A", "alice");
        study.parameters.titer = -5.0;
        store.save(&study).unwrap();

        assert!(matches!(
            store.load("alice", &study.id),
            Err(StoreError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_unknown_option_in_file_is_rejected() {
        let (_tmp, store) = store();
        let study = Study::new("Plant A", "alice");
        store.save(&study).unwrap();

        let path = store.study_path("alice", &study.id);
        let yaml = fs::read_to_string(&path)
            .unwrap()
            .replace("Standard Resin", "Huge Resin");
        fs::write(&path, yaml).unwrap();

        assert!(matches!(
            store.load("alice", &study.id),
            Err(StoreError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_malformed_yaml_is_a_syntax_diagnostic() {
        let (_tmp, store) = store();
        let study = Study::new("Plant A", "alice");
        store.save(&study).unwrap();
        fs::write(store.study_path("alice", &study.id), "id: [\n").unwrap();

        assert!(matches!(
            store.load("alice", &study.id),
            Err(StoreError::Syntax(_))
        ));
    }

    #[test]
    fn test_owner_slug() {
        assert_eq!(owner_slug("Jane Doe"), "Jane_Doe");
        assert_eq!(owner_slug("a/b"), "a_b");
        assert_eq!(owner_slug(".."), "_");
        assert_eq!(owner_slug(""), "_");
    }
}
