//! Image generation tool for chat-assistant hosts, backed by the Aliyun
//! DashScope text-to-image API (Flux models).
//!
//! Submits a generation job, polls it to completion, and streams status and
//! message events to a host-provided sink. The tool never downloads image
//! bytes; it forwards the result URL as a markdown image reference.

pub mod error;
pub mod events;
pub mod models;
pub mod synthesis;
pub mod tool;

pub use error::{Error, Result};
