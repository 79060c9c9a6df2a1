//! Ask command - answer one question and print it

use clap::Args;
use tracing::debug;

use super::GlobalArgs;
use crate::domain::{DomainError, ProviderKind, RagPipeline};
use crate::infrastructure::llm::LlmProviderFactory;

#[derive(Args, Clone, Debug, Default)]
pub struct AskArgs {
    /// Provider name, e.g. `OpenAI`, `groq`, `Hugging Face`
    #[arg(long, short, required_unless_present = "dry_run")]
    pub provider: Option<String>,

    /// API key; defaults to the provider's usual environment variable
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model name; defaults to the provider's default model
    #[arg(long, short)]
    pub model: Option<String>,

    /// Print the assembled prompt without calling a model
    #[arg(long)]
    pub dry_run: bool,

    /// The question
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

pub async fn run(global: GlobalArgs, args: AskArgs) -> anyhow::Result<()> {
    let config = super::load_config(&global)?;
    let pipeline = crate::build_pipeline(&config).await?;
    let question = args.question.join(" ");

    if args.dry_run {
        let prompt = pipeline.prepare(&question).await?;
        println!("{}", prompt);
        return Ok(());
    }

    let factory = crate::create_llm_factory(&config)?;
    let answer = ask_once(&pipeline, &factory, &args, &question, |var| {
        std::env::var(var).ok()
    })
    .await?;

    println!("{}", answer);
    Ok(())
}

async fn ask_once(
    pipeline: &RagPipeline,
    factory: &LlmProviderFactory,
    args: &AskArgs,
    question: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, DomainError> {
    let provider = args
        .provider
        .as_deref()
        .ok_or_else(|| DomainError::configuration("A provider is required"))?;
    let kind: ProviderKind = provider.parse()?;
    let api_key = resolve_api_key(kind, args.api_key.as_deref(), env)?;

    let (credentials, client) = factory.create_from_parts(provider, &api_key, args.model.clone())?;
    debug!(
        provider = credentials.provider().as_str(),
        model = credentials.effective_model(),
        "Answering one-shot question"
    );

    pipeline.answer(question, client.as_ref()).await
}

/// Explicit key first, then the provider's environment variable
fn resolve_api_key(
    kind: ProviderKind,
    explicit: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, DomainError> {
    explicit
        .map(str::to_string)
        .or_else(|| env(kind.api_key_env_var()))
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            DomainError::configuration(format!(
                "No API key for {}: pass --api-key or set {}",
                kind,
                kind.api_key_env_var()
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::state::test_support::{completion, pipeline};
    use crate::infrastructure::llm::{LlmClientOptions, MockHttpClient};

    const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

    fn args(provider: &str) -> AskArgs {
        AskArgs {
            provider: Some(provider.to_string()),
            question: vec!["When was IBM Watson piloted?".to_string()],
            ..Default::default()
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_api_key_prefers_explicit() {
        let key = resolve_api_key(ProviderKind::Groq, Some("gsk_flag"), |_| {
            Some("gsk_env".to_string())
        })
        .unwrap();

        assert_eq!(key, "gsk_flag");
    }

    #[test]
    fn test_resolve_api_key_reads_provider_variable() {
        let key = resolve_api_key(ProviderKind::Perplexity, None, |var| {
            (var == "PPLX_API_KEY").then(|| "pplx-env".to_string())
        })
        .unwrap();

        assert_eq!(key, "pplx-env");
    }

    #[test]
    fn test_missing_key_names_variable() {
        let err = resolve_api_key(ProviderKind::Anthropic, None, no_env).unwrap_err();

        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[tokio::test]
    async fn test_ask_once_uses_env_key() {
        let http = Arc::new(MockHttpClient::new().with_response(GROQ_URL, completion("In 2013.")));
        let factory = LlmProviderFactory::with_http_client(http.clone(), LlmClientOptions::default());

        let answer = ask_once(
            &pipeline(),
            &factory,
            &args("groq"),
            "When was IBM Watson piloted?",
            |_| Some("gsk_env".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(answer, "In 2013.");
        let sent = &http.requests()[0];
        assert_eq!(
            MockHttpClient::header(sent, "authorization"),
            Some("Bearer gsk_env")
        );
    }

    #[tokio::test]
    async fn test_unknown_provider_makes_no_call() {
        let http = Arc::new(MockHttpClient::new());
        let factory = LlmProviderFactory::with_http_client(http.clone(), LlmClientOptions::default());

        let err = ask_once(&pipeline(), &factory, &args("Foo"), "What is NLP?", |_| {
            Some("key".to_string())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(http.requests().is_empty());
    }
}
