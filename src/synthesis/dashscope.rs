use super::SynthesisService;
use crate::models::{
    GenerationRequest, SubmitResponse, SynthesisRequest, TaskHandle, TaskResponse,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";
const SYNTHESIS_PATH: &str = "/services/aigc/text2image/image-synthesis";

const STATUS_PENDING: &str = "PENDING";
const STATUS_RUNNING: &str = "RUNNING";
const STATUS_SUCCEEDED: &str = "SUCCEEDED";

pub struct DashScopeClient {
    client: Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_polls: Option<u32>,
}

impl DashScopeClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30)) // per request; the poll loop itself is unbounded
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(1),
            max_polls: None,
        }
    }

    /// Point the client at a different API root (test servers, proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Override the 1-second cadence between status polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Cap the number of status polls. The default is no cap: a job that
    /// never leaves PENDING keeps the caller waiting indefinitely.
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("DashScope API error (status {}): {}", status, error_text);
            return Err(Error::Api(format!(
                "API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse DashScope response: {}\nBody: {}", e, body);
            Error::MalformedResponse(format!("{}", e))
        })
    }

    async fn fetch_task(&self, task_id: &str) -> Result<TaskResponse> {
        let url = format!("{}/tasks/{}", self.base_url, task_id);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch task status: {}", e);
                e
            })?;

        self.parse_response(response).await
    }
}

#[async_trait]
impl SynthesisService for DashScopeClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle> {
        let body = SynthesisRequest::from_generation(request);
        tracing::debug!(
            "Submitting synthesis job (model: {}, size: {})",
            body.model,
            body.parameters.size
        );

        let url = format!("{}{}", self.base_url, SYNTHESIS_PATH);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-DashScope-Async", "enable")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to submit synthesis job: {}", e);
                e
            })?;

        let parsed: SubmitResponse = self.parse_response(response).await?;
        Ok(TaskHandle {
            task_id: parsed.output.task_id,
        })
    }

    async fn wait_for_result(&self, task: &TaskHandle) -> Result<String> {
        let mut polls: u32 = 0;

        loop {
            let response = self.fetch_task(&task.task_id).await?;
            let status = response.output.task_status;

            if status != STATUS_PENDING && status != STATUS_RUNNING {
                if status == STATUS_SUCCEEDED {
                    return response
                        .output
                        .results
                        .and_then(|results| results.into_iter().next())
                        .map(|result| result.url)
                        .ok_or_else(|| {
                            Error::MalformedResponse(
                                "task succeeded but response has no result URL".to_string(),
                            )
                        });
                }
                return Err(Error::Generation(format!(
                    "task {} finished with status {}",
                    task.task_id, status
                )));
            }

            polls += 1;
            if let Some(max) = self.max_polls {
                if polls >= max {
                    return Err(Error::Generation(format!(
                        "task {} still {} after {} polls",
                        task.task_id, status, max
                    )));
                }
            }

            tracing::debug!("Task {} is {}, polling again", task.task_id, status);
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
