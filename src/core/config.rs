//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::Project;

/// bptea configuration with layered hierarchy
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Owner of newly created studies
    pub owner: Option<String>,

    /// Editor command for `bptea study edit`
    pub editor: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let project = Project::discover().ok();
        Self::load_for(project.as_ref())
    }

    /// Load configuration for an already discovered workspace
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/bptea/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Workspace config (.bptea/config.yaml)
        if let Some(project) = project {
            if let Some(local) = Self::read_file(&project.config_path()) {
                config.merge(local);
            }
        }

        // 4. Environment variables
        if let Ok(owner) = std::env::var("BPTEA_OWNER") {
            config.owner = Some(owner);
        }
        if let Ok(editor) = std::env::var("BPTEA_EDITOR") {
            config.editor = Some(editor);
        }
        if let Ok(format) = std::env::var("BPTEA_FORMAT") {
            config.default_format = Some(format);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };
        // A freshly initialized config is all comments
        if contents
            .lines()
            .all(|line| line.trim().is_empty() || line.trim_start().starts_with('#'))
        {
            return Some(Config::default());
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bptea")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.owner.is_some() {
            self.owner = other.owner;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Get the owner name, falling back to git config or username
    pub fn owner(&self) -> String {
        if let Some(owner) = self.owner.as_deref().filter(|o| !o.trim().is_empty()) {
            return owner.trim().to_string();
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Get the editor command
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file, properly handling commands with arguments
    /// (e.g., "emacsclient -nw" or "code --wait")
    pub fn run_editor(&self, file_path: &Path) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let mut parts = editor.split_whitespace();

        let Some(cmd) = parts.next() else {
            return std::process::Command::new("vi").arg(file_path).status();
        };

        tracing::debug!(editor = %editor, file = %file_path.display(), "launching editor");
        std::process::Command::new(cmd)
            .args(parts)
            .arg(file_path)
            .status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut base = Config {
            owner: Some("alice".to_string()),
            editor: Some("vi".to_string()),
            default_format: None,
        };
        base.merge(Config {
            owner: Some("bob".to_string()),
            editor: None,
            default_format: Some("json".to_string()),
        });
        assert_eq!(base.owner.as_deref(), Some("bob"));
        assert_eq!(base.editor.as_deref(), Some("vi"));
        assert_eq!(base.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_explicit_owner_wins() {
        let config = Config {
            owner: Some("  process-dev  ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.owner(), "process-dev");
    }

    #[test]
    fn test_workspace_config_is_read() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(project.config_path(), "editor: nano\n").unwrap();

        let config = Config::load_for(Some(&project));
        // BPTEA_EDITOR in the environment would take precedence
        if std::env::var("BPTEA_EDITOR").is_err() {
            assert_eq!(config.editor.as_deref(), Some("nano"));
        }
    }
}
