//! One user action: photo in, message out.

use crate::ai::{
    GeminiHttpClient, GeminiModelLister, GeminiTransport, ModelDiscovery, OpenAiCompatTransport,
    Outcome, VisionClient, VisionTransport,
};
use crate::ai::openai::OpenAiHttpClient;
use crate::config::{Config, TransportKind};
use crate::image::{self, ImageEncoder};
use crate::slots;
use crate::{interpret, Result};
use ::image::DynamicImage;
use tracing::{info, warn};

/// Result of a scan. `message` is always non-empty and is what gets displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// `None` when the photo could not be decoded or encoded, so no call was made.
    pub outcome: Option<Outcome>,
    pub message: String,
}

impl ScanReport {
    pub fn is_success(&self) -> bool {
        self.outcome.as_ref().is_some_and(Outcome::is_success)
    }
}

pub struct CabinetScanner {
    client: VisionClient,
    discovery: Box<dyn ModelDiscovery>,
}

impl CabinetScanner {
    /// Build a scanner from concrete dependencies, e.g. mocks in tests.
    pub fn new(client: VisionClient, discovery: Box<dyn ModelDiscovery>) -> Self {
        Self { client, discovery }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        // Discovery always goes through the native API, whichever transport is used.
        let gemini_http = GeminiHttpClient::new(config)?;

        let transport: Box<dyn VisionTransport> = match config.transport {
            TransportKind::Gemini => Box::new(GeminiTransport::new(gemini_http.clone())),
            TransportKind::OpenAiCompat => {
                Box::new(OpenAiCompatTransport::new(OpenAiHttpClient::new(config)?))
            }
        };
        info!(
            "Vision transport: {:?} (model: {}, api version: {}, prompt: {})",
            config.transport, config.model.model, config.model.api_version, config.prompt_version
        );

        let client = VisionClient::new(transport)
            .with_encoder(ImageEncoder::from_config(config))
            .with_prompt(config.prompt_version.text())
            .with_retry(config.retry);

        Ok(Self::new(
            client,
            Box::new(GeminiModelLister::new(gemini_http)),
        ))
    }

    pub fn client(&self) -> &VisionClient {
        &self.client
    }

    pub async fn scan(&self, image: &DynamicImage) -> ScanReport {
        let outcome = match self.client.analyze(image).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Photo could not be prepared: {}", e);
                return ScanReport {
                    outcome: None,
                    message: format!(
                        "Could not prepare the photo for upload ({}). Please try another photo.",
                        e
                    ),
                };
            }
        };

        if let Outcome::Success(text) = &outcome {
            match slots::parse_empty_slots(text) {
                Ok(list) => info!("Model answer parsed as {:?}", list),
                Err(e) => warn!("Model answer does not follow the requested format: {}", e),
            }
        }

        let message =
            interpret::render(&outcome, self.client.model(), self.discovery.as_ref()).await;

        ScanReport {
            outcome: Some(outcome),
            message,
        }
    }

    /// Decode caller-supplied JPEG/PNG bytes, then [`scan`](Self::scan).
    pub async fn scan_bytes(&self, bytes: &[u8]) -> ScanReport {
        match image::decode(bytes) {
            Ok(decoded) => self.scan(&decoded).await,
            Err(e) => {
                warn!("Photo could not be read: {}", e);
                ScanReport {
                    outcome: None,
                    message: format!("Could not read the photo ({}). Please use a JPEG or PNG.", e),
                }
            }
        }
    }
}
