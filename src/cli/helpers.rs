//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::configuration::ConfigurationState;
use crate::core::identity::StudyId;
use crate::core::parameters::{ParameterField, ParameterSet};
use crate::core::project::Project;
use crate::core::store::{FileStore, StudyStore};
use crate::entities::Study;

/// Discover the workspace, honouring `--project`
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    let project = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    project.map_err(|e| miette::miette!("{}", e))
}

/// Workspace, its configuration and its study store
pub struct Workspace {
    pub project: Project,
    pub config: Config,
    pub store: FileStore,
}

impl Workspace {
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let project = open_project(global)?;
        let config = Config::load_for(Some(&project));
        let store = FileStore::for_project(&project);
        Ok(Self {
            project,
            config,
            store,
        })
    }

    pub fn owner(&self) -> String {
        self.config.owner()
    }

    /// Load a study of the configured owner by full or partial id
    pub fn load_study(&self, partial: &str) -> Result<Study> {
        let owner = self.owner();
        let id = self.store.resolve(&owner, partial)?;
        Ok(self.store.load(&owner, &id)?)
    }

    /// Bump the revision and persist
    pub fn save_changed(&self, study: &mut Study) -> Result<()> {
        study.touch();
        Ok(self.store.save(study)?)
    }
}

/// Parameters and configuration to evaluate: a stored study, or the
/// defaults when no id is given
pub fn load_snapshot(
    global: &GlobalOpts,
    id: Option<&str>,
) -> Result<(Option<Study>, ParameterSet, ConfigurationState)> {
    match id {
        Some(id) => {
            let study = Workspace::open(global)?.load_study(id)?;
            let parameters = study.parameters.clone();
            let configuration = study.configuration.clone();
            Ok((Some(study), parameters, configuration))
        }
        None => Ok((None, ParameterSet::default(), ConfigurationState::default())),
    }
}

/// Resolve `Auto` against the configured default, then against `fallback`
pub fn effective_format(global: &GlobalOpts, fallback: OutputFormat) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    let configured = match &global.project {
        Some(path) => Config::load_for(Project::discover_from(path).ok().as_ref()),
        None => Config::load(),
    }
    .default_format
    .and_then(|f| f.parse::<OutputFormat>().ok())
    .filter(|f| *f != OutputFormat::Auto);

    configured.unwrap_or(fallback)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

pub fn print_yaml<T: Serialize>(value: &T) -> Result<()> {
    let yaml = serde_yml::to_string(value).into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}

/// Split `KEY=VALUE`, trimming both sides
pub fn split_assignment(raw: &str) -> Result<(&str, &str)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| miette::miette!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(miette::miette!("missing name in '{}'", raw));
    }
    Ok((key, value.trim()))
}

/// Parse `FIELD=VALUE` pairs and apply them atomically
pub fn apply_assignments(parameters: &mut ParameterSet, raw: &[String]) -> Result<()> {
    let mut pairs = Vec::with_capacity(raw.len());
    for assignment in raw {
        let (name, value) = split_assignment(assignment)?;
        let field: ParameterField = name.parse()?;
        pairs.push((field, value));
    }
    parameters.apply(pairs)?;
    Ok(())
}

/// Parse `STEP=OPTION` pairs and select them; the state is untouched if any
/// pair is rejected
pub fn apply_selections(configuration: &mut ConfigurationState, raw: &[String]) -> Result<()> {
    let mut next = configuration.clone();
    for selection in raw {
        let (step, option) = split_assignment(selection)?;
        next.select(step, option)?;
    }
    *configuration = next;
    Ok(())
}

/// Format a StudyId for display, truncating if too long
pub fn format_short_id(id: &StudyId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CAPTURE_STEP;

    #[test]
    fn test_format_short_id() {
        let id = StudyId::new();
        let formatted = format_short_id(&id);
        assert!(formatted.len() <= 16);
        assert!(formatted.starts_with("STDY-"));
        assert!(formatted.ends_with("..."));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("µm µm µm µm", 6), "µm ...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(split_assignment("titer=7.5").unwrap(), ("titer", "7.5"));
        assert_eq!(
            split_assignment(" captureStep = Large Resin ").unwrap(),
            ("captureStep", "Large Resin")
        );
        assert!(split_assignment("titer").is_err());
        assert!(split_assignment("=5").is_err());
    }

    #[test]
    fn test_apply_assignments_is_atomic() {
        let mut params = ParameterSet::default();
        let raw = vec!["titer=8".to_string(), "density=-1".to_string()];
        assert!(apply_assignments(&mut params, &raw).is_err());
        assert_eq!(params, ParameterSet::default());

        let raw = vec!["titer=8".to_string(), "microbial-host=yeast".to_string()];
        apply_assignments(&mut params, &raw).unwrap();
        assert_eq!(params.titer, 8.0);
    }

    #[test]
    fn test_apply_selections_is_atomic() {
        let mut config = ConfigurationState::default();
        let raw = vec![
            "captureStep=Large Resin".to_string(),
            "bufferPrep=Glass Jars".to_string(),
        ];
        assert!(apply_selections(&mut config, &raw).is_err());
        assert_eq!(config, ConfigurationState::default());

        apply_selections(&mut config, &raw[..1]).unwrap();
        assert_eq!(config.selected(CAPTURE_STEP), Some("Large Resin"));
    }
}
