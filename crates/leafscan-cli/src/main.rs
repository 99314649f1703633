use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "leafscan", about = "Plant disease analysis backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a config file (defaults to ~/.leafscan/config.json5)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Analyze a plant image file and print the result as JSON
    Analyze {
        /// Path to the image file
        file: PathBuf,

        /// Path to a config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Synthesize speech for a text and write an MP3 file
    Speak {
        /// Text to synthesize
        text: String,

        /// Language tag (e.g. "en", "hi")
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Output file path
        #[arg(short, long, default_value = "speech.mp3")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let config = load(config)?;
                leafscan_gateway::start_gateway(config, port)
                    .await
                    .map_err(|e| anyhow::anyhow!("{e}"))
            })?;
        }
        Commands::Analyze { file, config } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let config = load(config)?;
                let bytes = std::fs::read(&file)?;

                let provider = Arc::new(leafscan_media::GeminiVisionProvider::new(
                    config.vision.resolve_api_key(),
                    config.vision.model.clone(),
                ));
                let pipeline = leafscan_media::AnalysisPipeline::new(provider);

                let outcome = pipeline.analyze(bytes).await?;
                println!("{}", serde_json::to_string_pretty(&outcome.result)?);
                anyhow::Ok(())
            })?;
        }
        Commands::Speak {
            text,
            language,
            output,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let service = leafscan_speech::SpeechService::new(
                    Arc::new(leafscan_speech::GoogleTranslateTts::new()),
                    leafscan_speech::DEFAULT_CACHE_CAPACITY,
                );
                let result = service.synthesize(&text, &language).await?;
                std::fs::write(&output, &result.audio)?;
                tracing::info!(
                    "Wrote {} bytes of audio to {}",
                    result.audio.len(),
                    output.display()
                );
                anyhow::Ok(())
            })?;
        }
    }

    Ok(())
}

fn load(path: Option<PathBuf>) -> anyhow::Result<leafscan_config::LeafscanConfig> {
    let config = match path {
        Some(p) => leafscan_config::load_config_from(&p)?,
        None => leafscan_config::load_config()?,
    };
    Ok(config)
}
