//! Retrieval-augmented prompt assembly

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use super::template::{PromptTemplate, TemplateError};
use crate::domain::knowledge_base::ScoredChunk;
use crate::domain::llm::Message;
use crate::domain::DomainError;

/// Rule telling the model how to handle questions the context does not cover
pub const OUT_OF_SCOPE_INSTRUCTION: &str = "If a student asks a question that is not covered in the context, inform them that the question is outside the current topic of this session.";

/// Course tutor instructions. `context` and `question` are filled per question.
pub const COURSE_PROMPT_TEMPLATE: &str = "\
Role: You are a helpful assistant for advanced undergraduate students taking the Digital and AI strategy course. Your purpose is to help students understand the provided lecture notes and examples.
Instructions:
1. Answer question only using the provided context. Do not use outside knowledge.
2. Maintain a polite and encouraging tone.
3. If a student asks a question that is not covered in the context, inform them that the question is outside the current topic of this session.
4. Suggest that they can search the web for more information if they are curious.
5. If a question is a duplicate, provide a more concise version of the previous answer.
6. Do not provide any in-text citations in your response without including reference list in the response.
Context:
${var:context}

Question: ${var:question}
";

static COURSE_ASSEMBLER: Lazy<PromptAssembler> = Lazy::new(|| {
    PromptAssembler::new(COURSE_PROMPT_TEMPLATE).expect("course prompt template is valid")
});

/// A fully rendered prompt, sent to the model as one user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    context_chunks: usize,
}

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of retrieved chunks folded into the context block
    pub fn context_chunks(&self) -> usize {
        self.context_chunks
    }

    pub fn to_messages(&self) -> Vec<Message> {
        vec![Message::user(self.text.clone())]
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Builds prompts from retrieved chunks and a question
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    template: PromptTemplate,
}

impl PromptAssembler {
    /// Create an assembler from template text.
    ///
    /// The template must declare both `${var:context}` and `${var:question}`.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        let template = PromptTemplate::parse(template)?;

        for required in ["context", "question"] {
            if !template.has_variable(required) {
                return Err(TemplateError::MissingVariable {
                    name: required.to_string(),
                });
            }
        }

        Ok(Self { template })
    }

    /// The fixed course tutor assembler
    pub fn course() -> &'static PromptAssembler {
        &COURSE_ASSEMBLER
    }

    pub fn build(&self, chunks: &[ScoredChunk], question: &str) -> Result<Prompt, DomainError> {
        let context = chunks
            .iter()
            .map(ScoredChunk::text)
            .collect::<Vec<_>>()
            .join("\n");

        let values = HashMap::from([("context", context.as_str()), ("question", question)]);

        let text = self
            .template
            .render(&values)
            .map_err(|e| DomainError::internal(format!("Prompt rendering failed: {}", e)))?;

        Ok(Prompt {
            text,
            context_chunks: chunks.len(),
        })
    }
}

/// Build the course prompt for one question and its retrieval result
pub fn build_prompt(chunks: &[ScoredChunk], question: &str) -> Result<Prompt, DomainError> {
    PromptAssembler::course().build(chunks, question)
}
