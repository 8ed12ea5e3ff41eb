//! facepulse - inspect past emotion-capture sessions from the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use facepulse::reports::ChartSeries;
use facepulse::{
    format_duration, BackendStatus, HttpBackend, SessionReports, SessionStore, SettingsStore,
};

#[derive(Parser, Debug)]
#[command(name = "facepulse", version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Overrides the configured backend base URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show whether the classifier backend is ready.
    Status,
    /// List recorded sessions.
    Sessions,
    /// Print the emotion timeline of one session.
    Timeline { session_id: String },
    /// Delete a session and its captures.
    Delete { session_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    facepulse::init_logging();
    let cli = Cli::parse();

    let path = cli.settings.unwrap_or_else(SettingsStore::default_path);
    let mut settings = SettingsStore::new(path)?.pipeline().with_env_overrides();
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    settings.validate()?;

    let backend = Arc::new(HttpBackend::new(
        &settings.api_base_url,
        settings.capture_timeout(),
    )?);

    match cli.command {
        Commands::Status => {
            let probe = backend.model_status().await;
            println!("backend: {}", BackendStatus::from_probe(&probe).as_str());
            if let Ok(status) = probe {
                println!("model: {}", status.model_name.as_deref().unwrap_or("unknown"));
                println!("status: {}", status.status);
                println!("emotions: {}", status.emotions_supported.join(", "));
            }
        }
        Commands::Sessions => {
            let mut reports = SessionReports::new(backend);
            let sessions = reports.refresh().await.context("failed to list sessions")?;
            if sessions.is_empty() {
                println!("no sessions recorded");
            }
            for session in sessions {
                println!(
                    "{}  {}  {:>8}  {:>4} images  {:<10} {}",
                    session.session_id,
                    session.date,
                    format_duration(session.duration_seconds),
                    session.images_captured,
                    session.dominant_emotion,
                    session.status.as_str()
                );
            }
        }
        Commands::Timeline { session_id } => {
            let mut reports = SessionReports::new(backend);
            let timeline = reports
                .select(&session_id)
                .await
                .with_context(|| format!("failed to load session {session_id}"))?;
            if timeline.series.is_empty() {
                println!("session {} has no captures", session_id);
            }
            for (point, entry) in timeline.series.points.iter().zip(&timeline.gallery) {
                println!(
                    "{:>6}  {:<10} ({})  {}",
                    point.label,
                    ChartSeries::tick_label(point.value),
                    point.value,
                    entry.image_path
                );
            }
        }
        Commands::Delete { session_id } => {
            let mut reports = SessionReports::new(backend);
            reports
                .delete(&session_id)
                .await
                .with_context(|| format!("failed to delete session {session_id}"))?;
            println!("deleted {}", session_id);
        }
    }

    Ok(())
}
