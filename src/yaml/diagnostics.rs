//! Source-located diagnostics for malformed study files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A study file that is not valid YAML, or does not match the study layout
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(bptea::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Locate a serde_yml error in `source`
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = suggest(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte offset of a 1-based line/column position
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();

    let within = source[line_start..]
        .char_indices()
        .take_while(|(_, c)| *c != '\n')
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);

    (line_start + within).min(source.len().saturating_sub(1))
}

fn suggest(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    let hint = if msg.contains("tab") {
        "YAML requires spaces for indentation, not tabs"
    } else if msg.contains("duplicate") {
        "Each key can only appear once; remove the duplicate"
    } else if msg.contains("unknown variant") {
        "Enumerated parameters are stored in snake_case, e.g. monoclonal_antibody or e_coli"
    } else if msg.contains("missing field") {
        "A study needs id, name, owner, created and last_modified"
    } else if msg.contains("invalid type") && msg.contains("f64") {
        "Numeric parameters must be plain numbers without units"
    } else if msg.contains("mapping values are not allowed") {
        "You may be missing a space after ':' or have incorrect indentation"
    } else if msg.contains("expected block end") {
        "Check your indentation; it may be inconsistent"
    } else {
        return None;
    };
    Some(hint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Study;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
    }

    #[test]
    fn test_suggestions() {
        assert!(suggest("found tab character").is_some());
        assert!(suggest("unknown variant `mab`").is_some());
        assert!(suggest("something unexpected").is_none());
    }

    #[test]
    fn test_from_serde_error_keeps_message() {
        let source = "id: STDY-01HQ3K4N5M6P7R8S9T0VWXYZAB\nname: [unclosed\n";
        let err = serde_yml::from_str::<Study>(source).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "broken.bptea.yaml");
        assert!(!diag.message().is_empty());
    }
}
