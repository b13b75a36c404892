use super::SynthesisService;
use crate::models::{GenerationRequest, TaskHandle};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted synthesis service for tests. Submissions are recorded so
/// assertions can inspect the derived steps and seed.
#[derive(Clone, Default)]
pub struct MockSynthesisClient {
    result_url: Arc<Mutex<Option<String>>>,
    submit_error: Arc<Mutex<Option<String>>>,
    wait_error: Arc<Mutex<Option<String>>>,
    submitted: Arc<Mutex<Vec<GenerationRequest>>>,
    wait_calls: Arc<Mutex<usize>>,
}

impl MockSynthesisClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result_url(self, url: impl Into<String>) -> Self {
        *self.result_url.lock().unwrap() = Some(url.into());
        self
    }

    pub fn with_submit_error(self, message: impl Into<String>) -> Self {
        *self.submit_error.lock().unwrap() = Some(message.into());
        self
    }

    pub fn with_wait_error(self, message: impl Into<String>) -> Self {
        *self.wait_error.lock().unwrap() = Some(message.into());
        self
    }

    pub fn submitted_requests(&self) -> Vec<GenerationRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn wait_call_count(&self) -> usize {
        *self.wait_calls.lock().unwrap()
    }
}

#[async_trait]
impl SynthesisService for MockSynthesisClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle> {
        if let Some(message) = self.submit_error.lock().unwrap().clone() {
            return Err(Error::Api(message));
        }

        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        Ok(TaskHandle {
            task_id: format!("mock-task-{}", submitted.len()),
        })
    }

    async fn wait_for_result(&self, _task: &TaskHandle) -> Result<String> {
        *self.wait_calls.lock().unwrap() += 1;

        if let Some(message) = self.wait_error.lock().unwrap().clone() {
            return Err(Error::Generation(message));
        }

        let url = self.result_url.lock().unwrap().clone();
        Ok(url.unwrap_or_else(|| "https://mock.invalid/image.png".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageFormat;

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "test".to_string(),
            format: ImageFormat::Default,
            model: "flux-dev".to_string(),
            steps: 25,
            seed: 1,
        }
    }

    #[tokio::test]
    async fn test_mock_records_submissions() {
        let client = MockSynthesisClient::new().with_result_url("https://x/y.png");

        let task = client.submit(&request()).await.unwrap();
        let url = client.wait_for_result(&task).await.unwrap();

        assert_eq!(url, "https://x/y.png");
        assert_eq!(client.submitted_requests().len(), 1);
        assert_eq!(client.wait_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_submit_error() {
        let client = MockSynthesisClient::new().with_submit_error("timeout");

        let err = client.submit(&request()).await.unwrap_err();
        assert!(err.to_string().contains("timeout"));
        assert!(client.submitted_requests().is_empty());
    }
}
