use crate::config::{Config, Credential, ModelConfig};
use crate::Result;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Bearer-authenticated client for the provider's OpenAI-compatible surface.
#[derive(Clone)]
pub struct OpenAiHttpClient {
    client: Client,
    credential: Credential,
    endpoint: ModelConfig,
}

impl OpenAiHttpClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_parts(config.credential.clone(), config.model.clone(), config.timeout)
    }

    pub fn with_parts(credential: Credential, endpoint: ModelConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            credential,
            endpoint,
        })
    }

    pub fn model(&self) -> &str {
        &self.endpoint.model
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/openai/chat/completions", self.endpoint.versioned_base())
    }

    pub async fn post_json<Req: Serialize + ?Sized>(
        &self,
        url: &str,
        request: &Req,
    ) -> reqwest::Result<(u16, String)> {
        let response = self
            .client
            .post(url)
            .bearer_auth(self.credential.expose())
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        Ok((status, response.text().await?))
    }
}
