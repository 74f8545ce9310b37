use super::client::GeminiHttpClient;
use super::types::ListModelsResponse;
use crate::ai::{DiscoveryError, ModelDiscovery};
use async_trait::async_trait;

const GENERATE_CONTENT: &str = "generateContent";
const PAGE_SIZE: &str = "1000";
const MAX_PAGES: usize = 10;

/// Lists models reachable with the configured key via `GET /models`.
pub struct GeminiModelLister {
    http: GeminiHttpClient,
}

impl GeminiModelLister {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<ListModelsResponse, DiscoveryError> {
        let url = self.http.models_url();
        let mut query = vec![("pageSize", PAGE_SIZE)];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let (status, body) = self
            .http
            .get(&url, &query)
            .await
            .map_err(|e| {
                DiscoveryError(format!(
                    "Could not reach the model listing endpoint: {}",
                    e.without_url()
                ))
            })?;

        if !(200..300).contains(&status) {
            return Err(DiscoveryError(format!(
                "Model listing failed (status {}): {}",
                status, body
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| DiscoveryError(format!("Model listing response was unreadable: {}", e)))
    }
}

#[async_trait]
impl ModelDiscovery for GeminiModelLister {
    async fn list_vision_capable_models(&self) -> Result<Vec<String>, DiscoveryError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = self.fetch_page(page_token.as_deref()).await?;

            models.extend(
                page.models
                    .iter()
                    .filter(|m| m.supports(GENERATE_CONTENT))
                    .map(|m| m.id().to_string()),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => {
                    tracing::info!("Discovered {} generateContent models", models.len());
                    return Ok(models);
                }
            }
        }

        tracing::warn!("Stopped model listing after {} pages", MAX_PAGES);
        Ok(models)
    }
}
