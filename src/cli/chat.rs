//! Chat command - interactive terminal session

use std::borrow::Cow;
use std::fmt::Write as _;

use clap::Args;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::history::DefaultHistory;
use rustyline::{ColorMode, Completer, Editor, Helper, Hinter, Validator};
use tracing::warn;

use super::GlobalArgs;
use crate::domain::course::{SAMPLE_QUESTIONS, sample_question};
use crate::domain::{CourseInfo, MessageRole, ProviderKind, RagPipeline, SessionContext};
use crate::infrastructure::llm::LlmProviderFactory;

#[derive(Args, Clone, Debug, Default)]
pub struct ChatArgs {
    /// Provider name; prompted for when omitted
    #[arg(long, short)]
    pub provider: Option<String>,

    /// API key; prompted for (masked) when omitted
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model name; prompted for when omitted
    #[arg(long, short)]
    pub model: Option<String>,
}

const HELP: &str = "Commands: /samples, /sample N, /history, /help, /quit";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Samples,
    Sample(usize),
    History,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if !line.starts_with('/') {
            return Self::Ask(line.to_string());
        }

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        match (command, parts.next()) {
            ("/samples", None) => Self::Samples,
            ("/sample", Some(n)) => n
                .parse()
                .map(Self::Sample)
                .unwrap_or_else(|_| Self::Unknown(line.to_string())),
            ("/history", None) => Self::History,
            ("/help", None) => Self::Help,
            ("/quit" | "/exit", None) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// What the shell wants printed after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// A terminal chat bound to one session
pub struct ChatShell<'a> {
    pipeline: &'a RagPipeline,
    session: SessionContext,
}

impl<'a> ChatShell<'a> {
    pub fn new(pipeline: &'a RagPipeline, session: SessionContext) -> Self {
        Self { pipeline, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn respond(&mut self, line: &str) -> Reply {
        match ReplCommand::parse(line) {
            ReplCommand::Ask(question) => Reply::Text(self.ask(&question).await),
            ReplCommand::Sample(n) => match sample_question(n) {
                Some(sample) => {
                    let answer = self.ask(sample.question).await;
                    Reply::Text(format!("> {}\n\n{}", sample.question, answer))
                }
                None => Reply::Text(format!(
                    "No sample question {}; pick 1-{}",
                    n,
                    SAMPLE_QUESTIONS.len()
                )),
            },
            ReplCommand::Samples => Reply::Text(render_samples()),
            ReplCommand::History => Reply::Text(self.render_history()),
            ReplCommand::Help => Reply::Text(HELP.to_string()),
            ReplCommand::Quit => Reply::Quit,
            ReplCommand::Empty => Reply::Text(String::new()),
            ReplCommand::Unknown(line) => Reply::Text(format!("Unknown command '{}'. {}", line, HELP)),
        }
    }

    async fn ask(&mut self, question: &str) -> String {
        match self.session.ask(self.pipeline, question).await {
            Ok(answer) => answer,
            Err(e) => format!("Error: {}", e.user_message()),
        }
    }

    fn render_history(&self) -> String {
        let entries = self.session.transcript().entries();
        if entries.is_empty() {
            return "No messages yet.".to_string();
        }

        let mut out = String::new();
        for entry in entries {
            let speaker = match entry.role() {
                MessageRole::User => "You",
                _ => "Assistant",
            };
            let _ = writeln!(out, "[{}] {}: {}", entry.at.format("%H:%M:%S"), speaker, entry.content());
        }
        out.trim_end().to_string()
    }
}

pub fn render_banner(course: &CourseInfo) -> String {
    format!("{}\n{}\n\n⚠ {}", course.title, course.subtitle, course.notice)
}

pub fn render_samples() -> String {
    let mut out = String::from("Sample questions:");
    let mut category = "";

    for (i, sample) in SAMPLE_QUESTIONS.iter().enumerate() {
        if sample.category != category {
            category = sample.category;
            let _ = write!(out, "\n  {}", category);
        }
        let _ = write!(out, "\n    {}. {}", i + 1, sample.label);
    }

    out
}

/// Input helper that hides typed characters while `masking` is set
#[derive(Completer, Helper, Hinter, Validator, Default)]
struct ChatHelper {
    masking: bool,
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Cow::Owned("*".repeat(line.chars().count()))
        } else {
            Cow::Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.masking
    }
}

type ChatEditor = Editor<ChatHelper, DefaultHistory>;

pub async fn run(global: GlobalArgs, args: ChatArgs) -> anyhow::Result<()> {
    let config = super::load_config(&global)?;
    let pipeline = crate::build_pipeline(&config).await?;
    let factory = crate::create_llm_factory(&config)?;

    let mut editor = ChatEditor::new()?;
    editor.set_helper(Some(ChatHelper::default()));
    editor.set_color_mode(ColorMode::Forced);
    editor.set_auto_add_history(false);

    println!("{}\n", render_banner(&config.course.info()));
    println!("{}\n", render_samples());

    let Some(session) = open_session(&mut editor, &factory, &args)? else {
        return Ok(());
    };
    println!(
        "Using {} ({}). {}\n",
        session.credentials().provider(),
        session.credentials().effective_model(),
        HELP
    );

    let mut shell = ChatShell::new(&pipeline, session);
    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        match shell.respond(&line).await {
            Reply::Quit => break,
            Reply::Text(text) if text.is_empty() => {}
            Reply::Text(text) => println!("\n{}\n", text),
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Build a session from flags, prompting for anything missing.
///
/// Invalid interactive input is reported and asked again; invalid flags fail.
fn open_session(
    editor: &mut ChatEditor,
    factory: &LlmProviderFactory,
    args: &ChatArgs,
) -> anyhow::Result<Option<SessionContext>> {
    let interactive = args.provider.is_none() || args.api_key.is_none();

    loop {
        let provider = match &args.provider {
            Some(provider) => provider.clone(),
            None => match prompt_provider(editor)? {
                Some(provider) => provider,
                None => return Ok(None),
            },
        };
        let api_key = match &args.api_key {
            Some(key) => key.clone(),
            None => match prompt_masked(editor, "API key: ")? {
                Some(key) => key,
                None => return Ok(None),
            },
        };
        let model = match &args.model {
            Some(model) => Some(model.clone()),
            None if interactive => prompt_line(editor, "Model (Enter for default): ")?
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            None => None,
        };

        match factory.create_from_parts(&provider, &api_key, model) {
            Ok((credentials, client)) => return Ok(Some(SessionContext::new(credentials, client))),
            Err(e) if interactive => {
                warn!(error = %e, "Rejected credentials");
                println!("{}\n", e.user_message());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt_provider(editor: &mut ChatEditor) -> anyhow::Result<Option<String>> {
    let choices = ProviderKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("{}. {}", i + 1, kind))
        .collect::<Vec<_>>()
        .join("  ");
    println!("Providers: {}", choices);

    Ok(prompt_line(editor, "Provider: ")?.map(|answer| {
        answer
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| ProviderKind::ALL.get(i))
            .map(|kind| kind.display_name().to_string())
            .unwrap_or_else(|| answer.trim().to_string())
    }))
}

fn prompt_line(editor: &mut ChatEditor, prompt: &str) -> anyhow::Result<Option<String>> {
    match editor.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn prompt_masked(editor: &mut ChatEditor, prompt: &str) -> anyhow::Result<Option<String>> {
    set_masking(editor, true);
    let result = prompt_line(editor, prompt);
    set_masking(editor, false);
    result
}

fn set_masking(editor: &mut ChatEditor, masking: bool) {
    if let Some(helper) = editor.helper_mut() {
        helper.masking = masking;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::state::test_support::{OPENAI_CHAT_URL, completion, pipeline};
    use crate::infrastructure::llm::{LlmClientOptions, MockHttpClient};

    fn shell_session(http: Arc<MockHttpClient>) -> SessionContext {
        let factory = LlmProviderFactory::with_http_client(http, LlmClientOptions::default());
        let (credentials, client) = factory.create_from_parts("OpenAI", "sk-test", None).unwrap();
        SessionContext::new(credentials, client)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("  "), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("/samples"), ReplCommand::Samples);
        assert_eq!(ReplCommand::parse("/sample 3"), ReplCommand::Sample(3));
        assert_eq!(ReplCommand::parse("/history"), ReplCommand::History);
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
        assert_eq!(
            ReplCommand::parse(" What is NLP? "),
            ReplCommand::Ask("What is NLP?".to_string())
        );
        assert!(matches!(ReplCommand::parse("/sample x"), ReplCommand::Unknown(_)));
        assert!(matches!(ReplCommand::parse("/nope"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn test_samples_are_grouped_and_numbered() {
        let text = render_samples();

        assert!(text.contains("Case Study References"));
        assert!(text.contains("Class Preparation"));
        assert!(text.contains("6. Technical Concepts"));
        assert_eq!(text.matches("Simple Explanations").count(), 1);
    }

    #[test]
    fn test_banner_carries_notice() {
        let banner = render_banner(&CourseInfo::default());

        assert!(banner.starts_with("Course : Digital AI strategy"));
        assert!(banner.contains("Use caution when interpreting its responses."));
    }

    #[tokio::test]
    async fn test_question_and_history() {
        let http = Arc::new(MockHttpClient::new().with_response(OPENAI_CHAT_URL, completion("In 2013.")));
        let pipeline = pipeline();
        let mut shell = ChatShell::new(&pipeline, shell_session(http));

        assert_eq!(
            shell.respond("When was IBM Watson piloted?").await,
            Reply::Text("In 2013.".to_string())
        );

        let Reply::Text(history) = shell.respond("/history").await else {
            panic!("expected text");
        };
        assert!(history.contains("You: When was IBM Watson piloted?"));
        assert!(history.contains("Assistant: In 2013."));
        assert_eq!(shell.session().transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_sample_question_is_asked() {
        let http = Arc::new(MockHttpClient::new().with_response(OPENAI_CHAT_URL, completion("Concepts.")));
        let pipeline = pipeline();
        let mut shell = ChatShell::new(&pipeline, shell_session(http.clone()));

        let Reply::Text(text) = shell.respond("/sample 6").await else {
            panic!("expected text");
        };

        assert!(text.starts_with("> What are the technical concepts covered in this case?"));
        assert!(text.ends_with("Concepts."));
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_sample_makes_no_call() {
        let http = Arc::new(MockHttpClient::new());
        let pipeline = pipeline();
        let mut shell = ChatShell::new(&pipeline, shell_session(http.clone()));

        let Reply::Text(text) = shell.respond("/sample 9").await else {
            panic!("expected text");
        };

        assert!(text.contains("pick 1-6"));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_keeps_shell_alive() {
        let http = Arc::new(MockHttpClient::new().with_error(OPENAI_CHAT_URL, "HTTP 401: Invalid API key"));
        let pipeline = pipeline();
        let mut shell = ChatShell::new(&pipeline, shell_session(http));

        let Reply::Text(text) = shell.respond("What is NLP?").await else {
            panic!("expected text");
        };

        assert!(text.starts_with("Error: Provider error: openai"));
        assert_eq!(shell.respond("/quit").await, Reply::Quit);
    }

    #[test]
    fn test_masking_highlighter() {
        let helper = ChatHelper { masking: true };
        assert_eq!(helper.highlight("sk-abc", 6), "******");
        assert!(helper.highlight_char("sk-abc", 6, false));

        let helper = ChatHelper::default();
        assert_eq!(helper.highlight("hello", 5), "hello");
    }
}
