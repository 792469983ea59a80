use futures::future::BoxFuture;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

use crate::error::Error;

/// A hosted completion API.
///
/// Object safe so the service context can hold any backend behind an `Arc`.
pub trait Completer: Send + Sync {
    /// Send one system + user prompt pair and return the raw model text.
    fn complete<'a>(&'a self, system: &'a str, prompt: &'a str)
        -> BoxFuture<'a, Result<String, Error>>;
}

#[derive(Debug, Clone, clap::Args)]
pub struct CompletionOptions {
    /// API key for the OpenAI compatible completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name used for generation
    #[arg(long, env = "SITEGEN_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// Base URL of the completion API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub base_url: String,
}

/// OpenAI backed [`Completer`] built on rig.
///
/// Talks to `/chat/completions` so any OpenAI compatible base URL works.
pub struct RigCompleter {
    client: openai::CompletionsClient,
    model: String,
}

impl RigCompleter {
    pub fn new(options: &CompletionOptions) -> color_eyre::Result<Self> {
        let api_key = options
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| color_eyre::eyre::eyre!("OPENAI_API_KEY environment variable not set"))?;

        let client = openai::Client::builder()
            .api_key(api_key)
            .base_url(&options.base_url)
            .build()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create OpenAI client: {}", e))?
            .completions_api();

        Ok(Self {
            client,
            model: options.model.clone(),
        })
    }
}

impl Completer for RigCompleter {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, Error>> {
        Box::pin(async move {
            let agent = self.client.agent(&self.model).preamble(system).build();

            log::debug!(
                "Sending completion request: model={}, prompt={} chars",
                self.model,
                prompt.len()
            );

            agent
                .prompt(prompt)
                .await
                .map_err(|e| Error::Upstream(e.to_string()))
        })
    }
}
