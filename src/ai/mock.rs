use super::outcome::Outcome;
use super::{DiscoveryError, ModelDiscovery, VisionRequest, VisionTransport};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// What a [`MockTransport`] saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub prompt: String,
    pub mime_type: String,
    pub image_len: usize,
}

/// Transport stub that replays configured outcomes in order, cycling.
pub struct MockTransport {
    model: String,
    outcomes: Arc<Mutex<Vec<Outcome>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            outcomes: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_outcome(self, outcome: Outcome) -> Self {
        self.outcomes.lock().unwrap().push(outcome);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionTransport for MockTransport {
    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, request: &VisionRequest<'_>) -> Outcome {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            prompt: request.prompt.to_string(),
            mime_type: request.image.mime_type.to_string(),
            image_len: request.image.bytes.len(),
        });

        let outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            // Default mock response
            Outcome::Success("03, 08, 12".to_string())
        } else {
            let index = (requests.len() - 1) % outcomes.len();
            outcomes[index].clone()
        }
    }
}

/// Discovery stub returning a fixed model list or diagnostic.
pub struct MockDiscovery {
    result: Result<Vec<String>, DiscoveryError>,
    call_count: Arc<Mutex<usize>>,
}

impl MockDiscovery {
    pub fn new() -> Self {
        Self {
            result: Ok(Vec::new()),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.result = Ok(models.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn with_failure(mut self, diagnostic: String) -> Self {
        self.result = Err(DiscoveryError(diagnostic));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelDiscovery for MockDiscovery {
    async fn list_vision_capable_models(&self) -> Result<Vec<String>, DiscoveryError> {
        *self.call_count.lock().unwrap() += 1;
        self.result.clone()
    }
}
