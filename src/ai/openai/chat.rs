use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ImageUrl, MessagePart};
use crate::ai::outcome::{self, Outcome};
use crate::ai::{VisionRequest, VisionTransport};
use async_trait::async_trait;

/// Sends the photo as a single user message with a text part and a `data:`
/// URL image part, the message shape chat-style SDKs produce.
pub struct OpenAiCompatTransport {
    http: OpenAiHttpClient,
}

impl OpenAiCompatTransport {
    pub fn new(http: OpenAiHttpClient) -> Self {
        Self { http }
    }

    fn build_request<'a>(&'a self, request: &VisionRequest<'a>) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: self.http.model(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    MessagePart::Text {
                        text: request.prompt,
                    },
                    MessagePart::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                ],
            }],
        }
    }

    fn extract_text(body: &str) -> Option<String> {
        let response = serde_json::from_str::<ChatCompletionResponse>(body).ok()?;
        let text = response.first_text();
        if text.is_none() {
            if let Some(reason) = response.finish_reason() {
                tracing::warn!("Chat completion returned no text (finish_reason {})", reason);
            }
        }
        text
    }
}

#[async_trait]
impl VisionTransport for OpenAiCompatTransport {
    fn model(&self) -> &str {
        self.http.model()
    }

    async fn send(&self, request: &VisionRequest<'_>) -> Outcome {
        let body = self.build_request(request);
        let url = self.http.chat_completions_url();

        tracing::debug!(
            "Sending {} byte image to OpenAI-compatible endpoint (model {})",
            request.image.bytes.len(),
            self.http.model()
        );

        match self.http.post_json(&url, &body).await {
            Ok((status, text)) => outcome::classify(status, text, Self::extract_text),
            Err(e) => outcome::from_request_error(e),
        }
    }
}
