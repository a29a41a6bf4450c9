use crate::shared::config;
use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_TITLE_CHARS: usize = 100;

/// Content generator for marketplace listings.
/// Built from config; None when no API key is configured.
pub struct ContentGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl ContentGenerator {
    pub fn from_config() -> Option<Self> {
        let llm = &config::get().llm;
        let api_key = llm.api_key.clone()?;
        let openai_config = OpenAIConfig::new().with_api_key(api_key);
        Some(Self {
            client: Client::with_config(openai_config),
            model: llm.model.clone().unwrap_or_else(|| DEFAULT_MODEL.into()),
        })
    }

    /// Rewrite a wholesale item name into a marketplace-ready sale title.
    /// Marketplaces cap titles, so the output is truncated defensively too.
    pub async fn generate_sale_title(
        &self,
        source_name: &str,
        category: Option<&str>,
    ) -> Result<String> {
        let system = "You rewrite Korean wholesale product names into concise, searchable \
                      marketplace listing titles. Keep brand and model tokens, drop seller \
                      codes and promotional noise. Answer with the title only.";
        let user = match category {
            Some(cat) => format!("Category: {}\nSource name: {}", cat, source_name),
            None => format!("Source name: {}", source_name),
        };

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(0.4)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let title = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .map(|t| t.trim().trim_matches('"').to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow::anyhow!("LLM returned no title"))?;

        Ok(title.chars().take(MAX_TITLE_CHARS).collect())
    }
}
