use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use sesame_voice::core::voices::BUILTIN_PRESETS;
use sesame_voice::{AppConfig, AudioResult, RequestClient, VoiceStore};

/// Sesame CSM-1B voice client - speech synthesis and voice cloning
#[derive(Parser, Debug)]
#[command(name = "sesame-voice")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize speech from text
    Speak {
        /// Text to convert to speech
        text: String,

        /// Cloned voice or built-in preset to use
        #[arg(short = 'v', long = "voice")]
        voice: Option<String>,
    },

    /// Clone a voice from a reference audio sample
    Clone {
        /// Name for the cloned voice
        name: String,

        /// Path to the reference audio file
        sample: PathBuf,
    },

    /// List cloned voices and built-in presets
    Voices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let client = Arc::new(RequestClient::new(&config)?);
    let store = VoiceStore::new(&config, client);

    match cli.command {
        Commands::Speak { text, voice } => {
            let audio = store.synthesize(&text, voice.as_deref()).await?;
            let path = write_output(&config.output_dir, voice.as_deref(), &audio).await?;
            println!("Speech saved to {}", path.display());
        }
        Commands::Clone { name, sample } => {
            let bytes = tokio::fs::read(&sample)
                .await
                .with_context(|| format!("reading sample {}", sample.display()))?;
            let profile = store.clone_voice(&name, &bytes).await?;
            println!("Voice '{}' cloned successfully", profile.name);
        }
        Commands::Voices => {
            let cloned = store.list().await?;
            if cloned.is_empty() {
                println!("No cloned voices yet.");
            } else {
                println!("Cloned voices:");
                for name in cloned {
                    println!("  {name}");
                }
            }
            println!("Built-in presets:");
            for preset in BUILTIN_PRESETS {
                println!("  {preset}");
            }
        }
    }

    Ok(())
}

/// Write generated audio under the output directory with the timestamped
/// naming scheme `output[_<voice>]_<ts>.<ext>`.
async fn write_output(
    output_dir: &Path,
    voice: Option<&str>,
    audio: &AudioResult,
) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let extension = extension_for(&audio.content_type);
    let file_name = match voice {
        Some(voice) => format!("output_{voice}_{timestamp}.{extension}"),
        None => format!("output_{timestamp}.{extension}"),
    };

    let path = output_dir.join(file_name);
    tokio::fs::write(&path, &audio.data)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    info!(bytes = audio.data.len(), path = %path.display(), "audio written");
    Ok(path)
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type.split(';').next().unwrap_or("").trim() {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/flac" | "audio/x-flac" => "flac",
        "audio/ogg" => "ogg",
        _ => "wav",
    }
}
