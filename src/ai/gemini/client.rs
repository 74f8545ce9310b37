use crate::config::{AuthPlacement, Config, Credential, ModelConfig};
use crate::Result;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

/// Lightweight Gemini REST client shared by the generate and discovery paths.
///
/// Returns raw `(status, body)` pairs; callers decide what a status means.
#[derive(Clone)]
pub struct GeminiHttpClient {
    client: Client,
    credential: Credential,
    auth: AuthPlacement,
    endpoint: ModelConfig,
}

impl GeminiHttpClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_parts(
            config.credential.clone(),
            config.auth,
            config.model.clone(),
            config.timeout,
        )
    }

    pub fn with_parts(
        credential: Credential,
        auth: AuthPlacement,
        endpoint: ModelConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            credential,
            auth,
            endpoint,
        })
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.endpoint.model
    }

    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.versioned_base(),
            self.endpoint.model
        )
    }

    pub fn models_url(&self) -> String {
        format!("{}/models", self.endpoint.versioned_base())
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.auth {
            AuthPlacement::Query => builder.query(&[("key", self.credential.expose())]),
            AuthPlacement::Header => builder.header("x-goog-api-key", self.credential.expose()),
        }
    }

    pub async fn post_json<Req: Serialize + ?Sized>(
        &self,
        url: &str,
        request: &Req,
    ) -> reqwest::Result<(u16, String)> {
        let builder = self.client.post(url).json(request);
        let response = self.authorize(builder).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.text().await?))
    }

    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> reqwest::Result<(u16, String)> {
        let builder = self.client.get(url).query(query);
        let response = self.authorize(builder).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.text().await?))
    }
}
