use anyhow::Result;
use clap::Parser;
use flux_image_tool::events::{ChannelSink, Event};
use flux_image_tool::models::Config;
use flux_image_tool::tool::{ImageTool, DEFAULT_MODEL};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Minimal host harness: runs one generation and prints the streamed events.
#[derive(Debug, Parser)]
#[command(name = "flux-image-tool")]
#[command(about = "Generate an image with the DashScope Flux API")]
struct CliArgs {
    /// Text prompt describing the desired image.
    prompt: String,

    /// Format preset: default, landscape, or portrait.
    #[arg(long, default_value = "default")]
    format: String,

    /// Model identifier; flux-schnell trades quality for speed.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flux_image_tool=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let tool = ImageTool::new(config.api_key);
    let (sink, mut rx) = ChannelSink::new();

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                Event::Status { description, done } => {
                    info!("[{}] {}", if done { "done" } else { "..." }, description);
                }
                Event::Message { content } => println!("{}", content),
            }
        }
    });

    let instruction = tool
        .create_image(&args.prompt, &args.format, &args.model, &sink)
        .await;

    drop(sink);
    printer.await?;

    println!("{}", instruction);
    Ok(())
}
