//! Prompt templates and retrieval-augmented prompt assembly

mod assembler;
mod template;

pub use assembler::{
    build_prompt, Prompt, PromptAssembler, COURSE_PROMPT_TEMPLATE, OUT_OF_SCOPE_INSTRUCTION,
};
pub use template::{PromptTemplate, TemplateError};
