use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Text template with `{name}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub template: String,
    pub input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>, input_variables: &[&str]) -> Self {
        Self {
            template: template.into(),
            input_variables: input_variables.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Substitutes every declared variable in one pass over the template.
    /// Values are inserted verbatim, so braces inside a value are never
    /// expanded again.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, DomainError> {
        let mut bound = Vec::with_capacity(self.input_variables.len());
        for variable in &self.input_variables {
            let value = values
                .iter()
                .find(|(name, _)| name == variable)
                .map(|(_, value)| *value)
                .ok_or_else(|| {
                    DomainError::validation(format!("missing prompt variable: {variable}"))
                })?;
            bound.push((variable.as_str(), value));
        }

        let mut rendered = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let slot = after.find('}').and_then(|close| {
                let name = &after[..close];
                bound
                    .iter()
                    .find(|(variable, _)| *variable == name)
                    .map(|(_, value)| (*value, close))
            });
            match slot {
                Some((value, close)) => {
                    rendered.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = after;
                }
            }
        }
        rendered.push_str(rest);
        Ok(rendered)
    }
}
