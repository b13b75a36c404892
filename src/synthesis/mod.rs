//! Remote image-synthesis service integration
//!
//! Provides the submit/poll interface to the DashScope text-to-image API and
//! a mock implementation for tests.

pub mod dashscope;
pub mod mock;

pub use dashscope::DashScopeClient;
pub use mock::MockSynthesisClient;

use crate::models::{GenerationRequest, TaskHandle};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SynthesisService: Send + Sync {
    /// Submit a generation job, returning its server-side handle.
    async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle>;

    /// Block (cooperatively) until the job reaches a terminal status and
    /// return the result image URL.
    async fn wait_for_result(&self, task: &TaskHandle) -> Result<String>;
}
