//! Course presentation data: banner text and preset questions

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Course : Digital AI strategy";
pub const DEFAULT_SUBTITLE: &str =
    "Week 2: Contemporary Digital Technologies Overview, such as AI, Chatbot, NLP.";
pub const DEFAULT_NOTICE: &str =
    "This is an AI chat bot. Use caution when interpreting its responses.";

/// Shown when a preset question is picked before credentials are entered
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Please enter your API key and choose a provider.";

/// Banner shown above the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub title: String,
    pub subtitle: String,
    pub notice: String,
}

impl Default for CourseInfo {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            notice: DEFAULT_NOTICE.to_string(),
        }
    }
}

/// A preset question offered to get students started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleQuestion {
    pub category: &'static str,
    pub label: &'static str,
    pub question: &'static str,
}

pub const SAMPLE_QUESTIONS: [SampleQuestion; 6] = [
    SampleQuestion {
        category: "Case Study References",
        label: "🎭 Case flow and Explanation",
        question: "What are the chronological flow of events around design and use case of IBM watson in healthcare?",
    },
    SampleQuestion {
        category: "Case Study References",
        label: "Human-AI partnership question",
        question: "In the collaboration between MD Anderson's doctors and IBM Watson, what were the biggest challenges to the human-AI team?",
    },
    SampleQuestion {
        category: "Simple Explanations",
        label: "🧒 Explain to a 13-year-old",
        question: "Explain the learnings from this session to a thirteen year old",
    },
    SampleQuestion {
        category: "Simple Explanations",
        label: "🦸‍♂️ Superhero Team Powers",
        question: "If IBM Watson's cognitive computing was a superpower, what would be its kryptonite?",
    },
    SampleQuestion {
        category: "Class Preparation",
        label: "🧱 Direct question on case decision",
        question: "What were the key factors that led to the failure of the IBM Watson for Oncology project at MD Anderson, and what broader lessons does this case offer for the adoption of AI in high-stakes industries?",
    },
    SampleQuestion {
        category: "Class Preparation",
        label: "Technical Concepts",
        question: "What are the technical concepts covered in this case?",
    },
];

/// Look up a preset question by its 1-based position
pub fn sample_question(number: usize) -> Option<&'static SampleQuestion> {
    number.checked_sub(1).and_then(|i| SAMPLE_QUESTIONS.get(i))
}

/// Text shown when a preset is picked but no session exists yet
pub fn pending_sample_message(question: &str) -> String {
    format!(
        "You selected: '{}' - Please enter your API key above to get an answer!",
        question
    )
}
