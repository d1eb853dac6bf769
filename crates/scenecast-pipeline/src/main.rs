//! SceneCast command line driver.
//!
//! Reads photos and text inputs, runs one pipeline and prints progress.

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scenecast_avatar::AvatarClient;
use scenecast_imagegen::ImageGenClient;
use scenecast_models::{Action, GenerationRequest, PipelineOutcome, ProgressEvent};
use scenecast_pipeline::{ChannelObserver, Pipeline, PipelineConfig};

type CliPipeline = Pipeline<ImageGenClient, AvatarClient>;

/// Turn photos, a scene description and a script into an avatar video.
#[derive(Debug, Parser)]
#[command(name = "scenecast", version, about)]
struct Args {
    /// Photo file; repeat 3 to 10 times. The first six map to the poses
    /// front, left, right, front_full, left_full, right_full
    #[arg(long = "photo", required = true)]
    photos: Vec<PathBuf>,

    /// Scene description for the background image
    #[arg(long)]
    prompt: String,

    /// Action name (Walking, Running, Dancing, Waving, Talking, Wedding,
    /// Party, Speech, Thinking, Presenting, Fighting, Sports)
    #[arg(long, default_value = "Talking")]
    action: String,

    /// What the avatar says
    #[arg(long)]
    script: String,

    /// Download the finished video to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("rustls crypto provider already installed");
    }

    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let config = match PipelineConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    let pipeline = match build_pipeline(config).await {
        Ok(p) => p,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match run(args, &pipeline).await {
        Ok(PipelineOutcome::Failed { .. }) => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Colored text logs by default, JSON when `LOG_FORMAT=json`.
fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("scenecast=info,scenecast_pipeline=info,scenecast_avatar=info,scenecast_imagegen=info")
    });

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
}

async fn build_pipeline(config: PipelineConfig) -> anyhow::Result<CliPipeline> {
    info!(
        poll_attempts = config.settings.poll.max_attempts,
        poll_interval_secs = config.settings.poll.interval.as_secs(),
        max_poll_wait_secs = config.settings.max_poll_wait().as_secs(),
        "Starting scenecast"
    );

    let images = ImageGenClient::new(config.imagegen).context("building image client")?;
    let avatars = AvatarClient::new(config.avatar).context("building avatar client")?;

    if config.validate_keys && !images.validate_api_key().await {
        anyhow::bail!("image vendor rejected STABILITY_API_KEY");
    }

    Ok(Pipeline::new(images, avatars, config.settings))
}

async fn run(args: Args, pipeline: &CliPipeline) -> anyhow::Result<PipelineOutcome> {
    if Action::from_str(&args.action).is_err() {
        warn!(action = %args.action, "Unknown action, using the default animation");
    }

    let mut photos = Vec::with_capacity(args.photos.len());
    for path in &args.photos {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading photo {}", path.display()))?;
        photos.push(bytes);
    }

    let request = GenerationRequest::new(photos, args.prompt, args.action, args.script);

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, cancelling run");
            signal_token.cancel();
        }
    });

    let (observer, rx) = ChannelObserver::channel();
    let printer = tokio::spawn(print_events(rx));

    let result = pipeline.run(&request, &observer, &cancel).await;
    drop(observer);
    printer.await.ok();

    let outcome = result?;

    if let (PipelineOutcome::Completed { video_url, .. }, Some(output)) = (&outcome, &args.output) {
        let video = pipeline
            .avatars()
            .download_video(video_url)
            .await
            .context("downloading video")?;
        tokio::fs::write(output, &video)
            .await
            .with_context(|| format!("writing {}", output.display()))?;
        println!("Saved {} bytes to {}", video.len(), output.display());
    }

    Ok(outcome)
}

async fn print_events(mut rx: mpsc::UnboundedReceiver<ProgressEvent>) {
    while let Some(event) = rx.recv().await {
        let last = event.is_final();
        match event {
            ProgressEvent::Stage { label, .. } => println!("==> {}", label),
            ProgressEvent::Progress { value } => println!("    {:>3}%", value),
            ProgressEvent::Log { message, .. } => println!("    {}", message),
            ProgressEvent::Completed { video_url } => println!("Video ready: {}", video_url),
            ProgressEvent::Failed { message, .. } => eprintln!("Failed: {}", message),
            ProgressEvent::TimedOut { job_id } => {
                println!("Still rendering, check back later (job {})", job_id)
            }
        }
        if last {
            break;
        }
    }
}
