use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transcribe_backend::utils::validation::sanitize_filename;
use transcribe_backend::widget::client::submit_file;
use transcribe_backend::widget::{WidgetState, is_accepted_media};

#[derive(Parser, Debug)]
#[command(author, version, about = "Upload a media file and print its transcript", long_about = None)]
struct Args {
    /// Audio or video file to transcribe
    file: PathBuf,

    /// Base URL of the transcription backend
    #[arg(short, long, default_value = "http://localhost:3000")]
    server: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transcribe_cli=warn,transcribe_backend=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data = tokio::fs::read(&args.file).await?;

    let mime = match infer::get(&data) {
        Some(kind) if is_accepted_media(kind.mime_type()) => kind.mime_type(),
        Some(kind) => {
            error!("❌ {} is {}, not audio or video", args.file.display(), kind.mime_type());
            std::process::exit(2);
        }
        None => {
            error!("❌ Could not recognise the media type of {}", args.file.display());
            std::process::exit(2);
        }
    };

    let file_name = sanitize_filename(&args.file.to_string_lossy());
    info!("📤 Uploading {} ({}, {} bytes)", file_name, mime, data.len());
    println!("{}", WidgetState::Loading);

    let client = reqwest::Client::new();
    let state = submit_file(&client, &args.server, &file_name, data, mime).await;
    println!("{}", state);

    if matches!(state, WidgetState::Failed(_)) {
        std::process::exit(1);
    }
    Ok(())
}
