//! Prompt template parsing and rendering
//!
//! Variables are written `${var:name}` and every one of them must be supplied
//! at render time.
//!
//! Rendering is a single pass over the template: substituted values are
//! never scanned for further placeholders, so retrieved text that happens
//! to contain `${var:...}` is inserted verbatim.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9_]*)\}").unwrap());

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },

    #[error("Template parsing error: {message}")]
    ParseError { message: String },
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Parse a template string and extract variables
    pub fn parse(content: impl Into<String>) -> Result<Self, TemplateError> {
        let content = content.into();
        let mut variables = Vec::new();
        let mut seen_names = HashSet::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = cap.get(1).unwrap().as_str();
            if seen_names.insert(name) {
                variables.push(name.to_string());
            }
        }

        let stripped = VARIABLE_PATTERN.replace_all(&content, "");
        if stripped.contains("${var:") {
            return Err(TemplateError::ParseError {
                message: "malformed or unterminated ${var:...} placeholder".to_string(),
            });
        }

        Ok(Self { content, variables })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v == name)
    }

    /// Render the template with provided values
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|name| !values.contains_key(name.as_str()))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.clone(),
            });
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &Captures<'_>| {
            values.get(&cap[1]).copied().unwrap_or_default()
        });

        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_variables() {
        let template = PromptTemplate::parse("Hello, world!").unwrap();
        assert!(template.variables().is_empty());
    }

    #[test]
    fn test_parse_collects_each_variable_once() {
        let template =
            PromptTemplate::parse("Q: ${var:question} C: ${var:context} Q: ${var:question}")
                .unwrap();

        assert_eq!(template.variables(), &["question", "context"]);
        assert!(template.has_variable("context"));
    }

    #[test]
    fn test_parse_rejects_default_value_syntax() {
        let result = PromptTemplate::parse("Tone: ${var:tone:polite}");
        assert!(matches!(result, Err(TemplateError::ParseError { .. })));
    }

    #[test]
    fn test_parse_rejects_unterminated_placeholder() {
        let result = PromptTemplate::parse("Question: ${var:question");
        assert!(matches!(result, Err(TemplateError::ParseError { .. })));
    }

    #[test]
    fn test_render_substitutes_every_occurrence() {
        let template = PromptTemplate::parse("${var:name}, hello ${var:name}!").unwrap();
        let values = HashMap::from([("name", "Ada")]);

        assert_eq!(template.render(&values).unwrap(), "Ada, hello Ada!");
    }

    #[test]
    fn test_render_missing_required_variable() {
        let template = PromptTemplate::parse("Question: ${var:question}").unwrap();

        let err = template.render(&HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingVariable {
                name: "question".to_string()
            }
        );
    }

    #[test]
    fn test_render_does_not_expand_placeholders_inside_values() {
        let template = PromptTemplate::parse("C: ${var:context} Q: ${var:question}").unwrap();
        let values = HashMap::from([("context", "see ${var:question}"), ("question", "why?")]);

        assert_eq!(
            template.render(&values).unwrap(),
            "C: see ${var:question} Q: why?"
        );
    }
}
