//! Turns an [`Outcome`] into the text shown to the user.

use crate::ai::{ModelDiscovery, Outcome};
use std::fmt::Write as _;

pub const EMPTY_RESPONSE_MESSAGE: &str =
    "The model returned no readable answer. Please retake the photo and try again.";

pub const RATE_LIMITED_MESSAGE: &str =
    "Too many requests (rate limit reached). Please wait a minute before trying again.";

/// Render `outcome` for display.
///
/// `ModelNotFound` runs `discovery` exactly once so the message can list the
/// models the key can actually use. Nothing here re-queries with another model.
pub async fn render(outcome: &Outcome, model: &str, discovery: &dyn ModelDiscovery) -> String {
    match outcome {
        Outcome::Success(text) => text.clone(),
        Outcome::EmptyOrUnparsable => EMPTY_RESPONSE_MESSAGE.to_string(),
        Outcome::RateLimited => RATE_LIMITED_MESSAGE.to_string(),
        Outcome::ModelNotFound => {
            let discovered = discovery.list_vision_capable_models().await;
            model_not_found_message(model, discovered)
        }
        Outcome::TransportError { status, body } => {
            format!("Request failed with HTTP status {}: {}", status, body)
        }
        Outcome::ClientException(message) => {
            format!("Request could not be completed: {}", message)
        }
    }
}

fn model_not_found_message(
    model: &str,
    discovered: Result<Vec<String>, crate::ai::DiscoveryError>,
) -> String {
    let mut message = format!(
        "Model '{}' was not found (HTTP 404). Please report this message to the maintainer.\n",
        model
    );

    match discovered {
        Ok(models) if models.is_empty() => {
            message.push_str("No models supporting generateContent are available to this API key.");
        }
        Ok(models) => {
            message.push_str("Models available to this API key that support generateContent:");
            for id in models {
                let _ = write!(message, "\n- {}", id);
            }
        }
        Err(e) => {
            tracing::warn!("Model discovery failed: {}", e);
            let _ = write!(message, "Listing available models also failed: {}", e);
        }
    }

    message
}
