//! Interactive setup wizard for new studies
//!
//! Walks the three parameter groups in order (product, host, process),
//! prompting for every field with its current value as the default. Input
//! is validated against the field's domain before it is accepted.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::core::parameters::{FieldGroup, FieldKind, FieldSpec, ParameterField, ParameterSet};

/// Name and description collected by the wizard
#[derive(Debug, Default)]
pub struct StudyDetails {
    pub name: String,
    pub description: Option<String>,
}

pub struct SetupWizard {
    theme: ColorfulTheme,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Ask for the study name (unless given) and an optional description
    pub fn details(&self, name: Option<String>, description: Option<String>) -> Result<StudyDetails> {
        let name = match name {
            Some(name) => name,
            None => Input::<String>::with_theme(&self.theme)
                .with_prompt("Study name")
                .validate_with(|input: &String| -> Result<(), &str> {
                    if input.trim().is_empty() {
                        Err("a name is required")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()
                .into_diagnostic()?,
        };

        let description = match description {
            Some(description) => Some(description),
            None => {
                let text: String = Input::with_theme(&self.theme)
                    .with_prompt("Description (optional)")
                    .allow_empty(true)
                    .interact_text()
                    .into_diagnostic()?;
                Some(text).filter(|t| !t.trim().is_empty())
            }
        };

        Ok(StudyDetails {
            name: name.trim().to_string(),
            description,
        })
    }

    /// Prompt for every parameter, group by group
    pub fn parameters(&self, parameters: &mut ParameterSet) -> Result<()> {
        let total = FieldGroup::ALL.len();
        for (step, group) in FieldGroup::ALL.into_iter().enumerate() {
            println!();
            println!(
                "{} {}",
                style(format!("Step {} of {}:", step + 1, total)).dim(),
                style(group.title()).bold().cyan()
            );
            for field in ParameterField::in_group(group) {
                self.prompt_field(field, parameters)?;
            }
        }
        Ok(())
    }

    fn prompt_field(&self, field: ParameterField, parameters: &mut ParameterSet) -> Result<()> {
        let spec = field.spec();
        let prompt = format_prompt(&spec);
        let current = parameters.get(field).to_string();

        match spec.kind {
            FieldKind::Choice(labels) => {
                let default_idx = labels.iter().position(|l| *l == current).unwrap_or(0);
                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(labels)
                    .default(default_idx)
                    .interact()
                    .into_diagnostic()?;
                parameters.set(field, labels[selection])?;
            }

            FieldKind::Flag => {
                let items = ["Yes", "No"];
                let default_idx = if current == "yes" { 0 } else { 1 };
                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(&items)
                    .default(default_idx)
                    .interact()
                    .into_diagnostic()?;
                parameters.set(field, if selection == 0 { "true" } else { "false" })?;
            }

            FieldKind::Number(_) => {
                let probe = parameters.clone();
                let raw: String = Input::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .default(current)
                    .validate_with(move |input: &String| -> Result<(), String> {
                        let mut candidate = probe.clone();
                        candidate.set(field, input).map_err(|e| e.to_string())
                    })
                    .interact_text()
                    .into_diagnostic()?;
                parameters.set(field, &raw)?;
            }
        }

        Ok(())
    }
}

fn format_prompt(spec: &FieldSpec) -> String {
    match spec.unit {
        Some(unit) => format!("{} ({})", spec.label, unit),
        None => spec.label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_unit() {
        assert_eq!(
            format_prompt(&ParameterField::Titer.spec()),
            "Titer (g/L)"
        );
        assert_eq!(
            format_prompt(&ParameterField::MicrobialHost.spec()),
            "Microbial Host"
        );
    }
}
