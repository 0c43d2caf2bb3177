use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ohcr_analysis::{Segmenter, analyze_fragments, write_session};
use ohcr_config::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "ohcr=info,ohcr_api=info,ohcr_analysis=info,tower_http=info";

#[derive(Parser)]
#[command(name = "ohcr", about = "Classroom discourse analytics (OHCR)")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to config/default.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve,
    /// Analyse a transcript file (JSON, SRT or TXT) and print the summary
    Analyze {
        /// Fragment file; the format is taken from the extension
        #[arg(long)]
        fragments: PathBuf,
        /// Session directory to write the four artifacts into (must not exist)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Pause in seconds that separates utterances
        #[arg(long)]
        pause_threshold: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;

    match cli.command {
        Commands::Serve => ohcr_api::serve(settings).await,
        Commands::Analyze {
            fragments,
            out,
            pause_threshold,
        } => {
            let threshold = pause_threshold.unwrap_or(settings.analysis.pause_threshold_secs);
            analyze(fragments, out, threshold)
        }
    }
}

fn analyze(fragments_path: PathBuf, out: Option<PathBuf>, pause_threshold: f64) -> Result<()> {
    let fragments = ohcr_transcription::reader::read_transcript(&fragments_path)
        .with_context(|| format!("failed to read {}", fragments_path.display()))?;

    let outcome = analyze_fragments(&fragments, Segmenter::with_pause_threshold(pause_threshold));
    info!(
        fragments = fragments.len(),
        utterances = outcome.utterances.len(),
        kc_score = outcome.summary.metrics.kc_score,
        "Analysis complete"
    );

    if let Some(out_dir) = out {
        write_session(&out_dir, &fragments, &outcome.utterances, &outcome.summary)?;
        info!(out_dir = %out_dir.display(), "Artifacts written");
    }

    println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    Ok(())
}
