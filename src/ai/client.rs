use super::outcome::Outcome;
use super::{VisionRequest, VisionTransport};
use crate::config::RetryPolicy;
use crate::image::{EncodedImage, ImageEncoder};
use crate::prompts::PromptVersion;
use crate::{Error, Result};
use image::DynamicImage;
use std::borrow::Cow;
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Encodes a photo, pairs it with the cabinet prompt and dispatches it
/// through the configured transport.
pub struct VisionClient {
    transport: Box<dyn VisionTransport>,
    encoder: ImageEncoder,
    prompt: Cow<'static, str>,
    retry: RetryPolicy,
}

impl VisionClient {
    pub fn new(transport: Box<dyn VisionTransport>) -> Self {
        Self {
            transport,
            encoder: ImageEncoder::default(),
            prompt: Cow::Borrowed(PromptVersion::default().text()),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_encoder(mut self, encoder: ImageEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<Cow<'static, str>>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        self.transport.model()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Analyze one cabinet photo.
    ///
    /// Only an encoding failure is returned as `Err`; in that case no request
    /// is sent. Every network-side result is an [`Outcome`].
    pub async fn analyze(&self, image: &DynamicImage) -> Result<Outcome> {
        let encoded = self.encode(image).await?;
        Ok(self.analyze_encoded(&encoded).await)
    }

    /// Dispatch an already-encoded photo, retrying per the [`RetryPolicy`].
    pub async fn analyze_encoded(&self, image: &EncodedImage) -> Outcome {
        let request = VisionRequest {
            prompt: self.prompt.as_ref(),
            image,
        };
        let transport = self.transport.as_ref();
        let request = &request;

        let result = RetryIf::start(
            self.backoff(),
            move || async move {
                let outcome = transport.send(request).await;
                if outcome.is_retryable() {
                    tracing::warn!("Vision request failed ({}), may retry", outcome);
                    Err(outcome)
                } else {
                    Ok(outcome)
                }
            },
            |outcome: &Outcome| outcome.is_retryable(),
        )
        .await;

        let outcome = match result {
            Ok(outcome) | Err(outcome) => outcome,
        };
        tracing::info!("Vision request finished: {}", outcome);
        outcome
    }

    /// `base, 2*base, 4*base, ...` capped at [`MAX_BACKOFF`], `max_retries` long.
    fn backoff(&self) -> std::iter::Take<ExponentialBackoff> {
        let half_ms = (self.retry.base_delay.as_millis() as u64 / 2).max(1);
        ExponentialBackoff::from_millis(2)
            .factor(half_ms)
            .max_delay(MAX_BACKOFF)
            .take(self.retry.max_retries)
    }

    async fn encode(&self, image: &DynamicImage) -> Result<EncodedImage> {
        let encoder = self.encoder;
        let image = image.clone();
        tokio::task::spawn_blocking(move || encoder.encode(&image))
            .await
            .map_err(|e| Error::Encoding(format!("Image encoding task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockTransport;
    use crate::prompts::CABINET_V1;
    use std::sync::Arc;

    fn photo() -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(16, 16, image::Rgb([10, 10, 10])))
    }

    fn fast_retry(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn test_analyze_sends_prompt_and_jpeg() {
        let transport = Arc::new(
            MockTransport::new().with_outcome(Outcome::Success("03, 08, 12".to_string())),
        );
        let client = VisionClient::new(Box::new(transport.clone()));

        let outcome = client.analyze(&photo()).await.unwrap();
        assert_eq!(outcome, Outcome::Success("03, 08, 12".to_string()));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, PromptVersion::V2.text());
        assert_eq!(requests[0].mime_type, "image/jpeg");
        assert!(requests[0].image_len > 0);
    }

    #[tokio::test]
    async fn test_prompt_can_be_swapped() {
        let transport = Arc::new(MockTransport::new());
        let client = VisionClient::new(Box::new(transport.clone())).with_prompt(CABINET_V1);

        client.analyze(&photo()).await.unwrap();
        assert_eq!(transport.requests()[0].prompt, CABINET_V1);
    }

    #[tokio::test]
    async fn test_encoding_failure_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let client = VisionClient::new(Box::new(transport.clone()));

        let err = client
            .analyze(&DynamicImage::new_rgb8(0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
        assert_eq!(transport.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let transport = Arc::new(MockTransport::new().with_outcome(Outcome::RateLimited));
        let client = VisionClient::new(Box::new(transport.clone()));

        assert_eq!(client.analyze(&photo()).await.unwrap(), Outcome::RateLimited);
        assert_eq!(transport.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_until_success() {
        let transport = Arc::new(
            MockTransport::new()
                .with_outcome(Outcome::RateLimited)
                .with_outcome(Outcome::Success("NONE".to_string())),
        );
        let client = VisionClient::new(Box::new(transport.clone())).with_retry(fast_retry(3));

        let outcome = client.analyze(&photo()).await.unwrap();
        assert_eq!(outcome, Outcome::Success("NONE".to_string()));
        assert_eq!(transport.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let transport = Arc::new(MockTransport::new().with_outcome(Outcome::TransportError {
            status: 503,
            body: "unavailable".to_string(),
        }));
        let client = VisionClient::new(Box::new(transport.clone())).with_retry(fast_retry(2));

        let outcome = client.analyze(&photo()).await.unwrap();
        assert!(matches!(outcome, Outcome::TransportError { status: 503, .. }));
        assert_eq!(transport.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_model_not_found_is_never_retried() {
        let transport = Arc::new(MockTransport::new().with_outcome(Outcome::ModelNotFound));
        let client = VisionClient::new(Box::new(transport.clone())).with_retry(fast_retry(5));

        assert_eq!(client.analyze(&photo()).await.unwrap(), Outcome::ModelNotFound);
        assert_eq!(transport.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let transport = Arc::new(MockTransport::new().with_outcome(Outcome::TransportError {
            status: 400,
            body: "bad request".to_string(),
        }));
        let client = VisionClient::new(Box::new(transport.clone())).with_retry(fast_retry(5));

        client.analyze(&photo()).await.unwrap();
        assert_eq!(transport.get_call_count(), 1);
    }

    #[test]
    fn test_backoff_doubles_from_base_delay() {
        let client = VisionClient::new(Box::new(MockTransport::new())).with_retry(RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        });

        let delays: Vec<Duration> = client.backoff().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000)
            ]
        );
    }
}
