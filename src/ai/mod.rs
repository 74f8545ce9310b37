//! Vision model integration
//!
//! [`VisionClient`] turns a decoded photo into an [`Outcome`] through a
//! pluggable [`VisionTransport`]. [`ModelDiscovery`] lists the models a key
//! can reach, for diagnosing a rejected model ID.

pub mod client;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod outcome;

pub use client::VisionClient;
pub use gemini::{GeminiHttpClient, GeminiModelLister, GeminiTransport};
pub use mock::{MockDiscovery, MockTransport};
pub use openai::OpenAiCompatTransport;
pub use outcome::Outcome;

use crate::image::EncodedImage;
use async_trait::async_trait;
use thiserror::Error;

/// One prompt plus one encoded photo. Built fresh for every attempt.
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub prompt: &'a str,
    pub image: &'a EncodedImage,
}

/// Wire strategy for reaching a multimodal model.
///
/// Implementations own endpoint, model ID and credential, and must fold every
/// failure into an [`Outcome`] rather than returning an error.
#[async_trait]
pub trait VisionTransport: Send + Sync {
    fn model(&self) -> &str;
    async fn send(&self, request: &VisionRequest<'_>) -> Outcome;
}

/// Diagnostic text explaining why models could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DiscoveryError(pub String);

#[async_trait]
pub trait ModelDiscovery: Send + Sync {
    /// Model IDs that support content generation, in provider order.
    async fn list_vision_capable_models(&self) -> Result<Vec<String>, DiscoveryError>;
}

#[async_trait]
impl<T: VisionTransport + ?Sized> VisionTransport for std::sync::Arc<T> {
    fn model(&self) -> &str {
        (**self).model()
    }

    async fn send(&self, request: &VisionRequest<'_>) -> Outcome {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: ModelDiscovery + ?Sized> ModelDiscovery for std::sync::Arc<T> {
    async fn list_vision_capable_models(&self) -> Result<Vec<String>, DiscoveryError> {
        (**self).list_vision_capable_models().await
    }
}
