use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
use crate::ai::outcome::{self, Outcome};
use crate::ai::{VisionRequest, VisionTransport};
use async_trait::async_trait;

/// Direct call to the native `generateContent` endpoint.
pub struct GeminiTransport {
    http: GeminiHttpClient,
}

impl GeminiTransport {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    fn build_request<'a>(request: &VisionRequest<'a>) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: request.prompt,
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.image.mime_type,
                            data: &request.image.base64,
                        },
                    },
                ],
            }],
        }
    }

    fn extract_text(body: &str) -> Option<String> {
        let response = serde_json::from_str::<GenerateContentResponse>(body).ok()?;
        let text = response.first_text();
        if text.is_none() {
            if let Some(reason) = response.finish_reason() {
                tracing::warn!("Gemini returned no text (finishReason {})", reason);
            }
        }
        text
    }
}

#[async_trait]
impl VisionTransport for GeminiTransport {
    fn model(&self) -> &str {
        self.http.model()
    }

    async fn send(&self, request: &VisionRequest<'_>) -> Outcome {
        let body = Self::build_request(request);
        let url = self.http.generate_content_url();

        tracing::debug!(
            "Sending {} byte image to Gemini model {}",
            request.image.bytes.len(),
            self.http.model()
        );

        match self.http.post_json(&url, &body).await {
            Ok((status, text)) => outcome::classify(status, text, Self::extract_text),
            Err(e) => outcome::from_request_error(e),
        }
    }
}
