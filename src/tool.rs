//! Tool orchestration for the chat host
//!
//! The host hands over a prompt, a format name, a model name and an event
//! sink; the tool runs the submit/poll flow, streams notifications, and
//! returns an instruction string for the host's assistant. Errors never cross
//! the host boundary: every failure is folded into the final status event and
//! the returned instruction.

use crate::events::{Event, EventSink};
use crate::models::{GenerationRequest, ImageFormat};
use crate::synthesis::{DashScopeClient, SynthesisService};
use crate::Result;
use rand::Rng;
use std::time::Instant;
use tracing::{debug, error, info};

pub const DEFAULT_MODEL: &str = "flux-dev";
pub const FAST_MODEL: &str = "flux-schnell";

/// Instruction returned to the assistant on success. The message event
/// already carries the image, so the assistant must not repeat it.
pub const SUCCESS_INSTRUCTION: &str = "Notify the user that the image has been \
    successfully generated, DO NOT mention the image or URL or anything else.";

/// The fast model runs far fewer diffusion steps.
pub fn steps_for_model(model: &str) -> u32 {
    if model == FAST_MODEL {
        5
    } else {
        25
    }
}

/// Source of generation seeds, injectable so tests are deterministic.
pub trait SeedSource: Send + Sync {
    /// Returns a seed in `0..=65535`.
    fn next_seed(&self) -> u32;
}

pub struct ThreadRngSeed;

impl SeedSource for ThreadRngSeed {
    fn next_seed(&self) -> u32 {
        rand::thread_rng().gen_range(0..=65535)
    }
}

pub struct FixedSeed(pub u32);

impl SeedSource for FixedSeed {
    fn next_seed(&self) -> u32 {
        self.0
    }
}

/// Drives one image generation end to end on behalf of the host.
pub struct ImageTool {
    synthesis: Box<dyn SynthesisService>,
    seeds: Box<dyn SeedSource>,
}

impl ImageTool {
    pub fn new(api_key: String) -> Self {
        Self::with_services(Box::new(DashScopeClient::new(api_key)), Box::new(ThreadRngSeed))
    }

    /// Build a tool from concrete dependencies. Primarily useful for tests
    /// and harnesses that need to inject mocks.
    pub fn with_services(synthesis: Box<dyn SynthesisService>, seeds: Box<dyn SeedSource>) -> Self {
        Self { synthesis, seeds }
    }

    /// Entry point exposed to the host. Always returns an instruction string
    /// for the assistant; failures are reported through `events` and folded
    /// into that string.
    pub async fn create_image(
        &self,
        prompt: &str,
        image_format: &str,
        model: &str,
        events: &dyn EventSink,
    ) -> String {
        events.emit(Event::status("Creating image...", false)).await;

        match self.generate(prompt, image_format, model, events).await {
            Ok(instruction) => instruction,
            Err(e) => {
                error!("Image generation failed: {}", e);
                events
                    .emit(Event::status(format!("An error occurred: {}", e), true))
                    .await;
                format!("Tell the user error: {}", e)
            }
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        image_format: &str,
        model: &str,
        events: &dyn EventSink,
    ) -> Result<String> {
        let format: ImageFormat = image_format.parse()?;
        let steps = steps_for_model(model);
        let seed = self.seeds.next_seed();

        let request = GenerationRequest {
            prompt: prompt.to_string(),
            format,
            model: model.to_string(),
            steps,
            seed,
        };

        let start = Instant::now();
        let task = self.synthesis.submit(&request).await?;
        debug!("Submitted synthesis task {}", task.task_id);

        let image_url = self.synthesis.wait_for_result(&task).await?;
        let elapsed = start.elapsed();
        info!(
            "Task {} finished in {:.2} seconds",
            task.task_id,
            elapsed.as_secs_f64()
        );

        events.emit(Event::status("Image generated", true)).await;
        events
            .emit(Event::message(format!(
                "![Image]({})\nPrompt: `{}`\nModel: `{}`  Steps: `{}`  Seed: `{}`  \
                 Time Taken: `{:.2} seconds`\n",
                image_url,
                prompt,
                model,
                steps,
                seed,
                elapsed.as_secs_f64()
            )))
            .await;

        Ok(SUCCESS_INSTRUCTION.to_string())
    }
}
