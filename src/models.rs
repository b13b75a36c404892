//! Data models and structures
//!
//! Defines the domain types for a generation job and the wire schemas for the
//! DashScope image-synthesis API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Named aspect-ratio preset mapped to a fixed pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Default,
    Landscape,
    Portrait,
}

impl ImageFormat {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Default => (1024, 1024),
            Self::Landscape => (1024, 576),
            Self::Portrait => (576, 1024),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Self::Default),
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// Everything needed to submit one generation job. Immutable once built.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub format: ImageFormat,
    pub model: String,
    pub steps: u32,
    pub seed: u32,
}

/// Opaque identifier of a server-side generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub task_id: String,
}

// DashScope API request/response models
#[derive(Debug, Serialize)]
pub struct SynthesisRequest {
    pub model: String,
    pub input: SynthesisInput,
    pub parameters: SynthesisParameters,
}

#[derive(Debug, Serialize)]
pub struct SynthesisInput {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct SynthesisParameters {
    pub size: String,
    pub steps: u32,
    pub seed: u32,
}

impl SynthesisRequest {
    pub fn from_generation(request: &GenerationRequest) -> Self {
        let (width, height) = request.format.dimensions();
        Self {
            model: request.model.clone(),
            input: SynthesisInput {
                prompt: request.prompt.clone(),
            },
            parameters: SynthesisParameters {
                size: format!("{}*{}", width, height),
                steps: request.steps,
                seed: request.seed,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub output: SubmitOutput,
}

#[derive(Debug, Deserialize)]
pub struct SubmitOutput {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskResponse {
    pub output: TaskOutput,
}

// `task_status` stays a plain string so unknown terminal values surface
// verbatim in error messages.
#[derive(Debug, Deserialize)]
pub struct TaskOutput {
    pub task_status: String,
    pub results: Option<Vec<TaskResult>>,
}

#[derive(Debug, Deserialize)]
pub struct TaskResult {
    pub url: String,
}

// Configuration. No Debug derive: the API key must never reach logs.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_key: std::env::var("DASHSCOPE_API_KEY")
                .map_err(|_| Error::Config("DASHSCOPE_API_KEY not set".to_string()))?,
        })
    }
}
