use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use voxbox::cli::{Cli, Commands, ConfigAction};
use voxbox::config::{Config, default_config_path};
use voxbox::pipeline::{Orchestrator, ReplyFlags, spawn_finish_listener};
use voxbox::playback::Player;
use voxbox::ui::LogSink;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.server.as_deref())?;

    match cli.command {
        Commands::Ask { file } => run_ask(&config, &file).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let rendered =
                    toml::to_string_pretty(&config).context("failed to render configuration")?;
                println!("{}", rendered);
            }
            ConfigAction::Path => {
                println!("{}", default_config_path().display());
            }
        },
    }

    Ok(())
}

/// Map `--quiet` / `-v` flags onto an env-filter level; `RUST_LOG` wins.
fn init_tracing(quiet: bool, verbose: u8) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("voxbox={default_level}")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&Path>, server: Option<&str>) -> Result<Config> {
    let path = path.map_or_else(default_config_path, PathBuf::from);
    let mut config = Config::load_or_default(&path).with_env_overrides();
    if let Some(server) = server {
        config.server.base_url = server.to_string();
    }
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Run one orchestration cycle for a captured utterance file.
async fn run_ask(config: &Config, file: &Path) -> Result<()> {
    let audio = std::fs::read(file)
        .with_context(|| format!("failed to read captured audio {}", file.display()))?;
    log_wav_info(file);

    let (finish_tx, finish_rx) = crossbeam_channel::unbounded();
    let flags = ReplyFlags::new();
    let listener = spawn_finish_listener(finish_rx, Arc::clone(&flags));

    let player = build_player(finish_tx);
    let mut orchestrator =
        Orchestrator::new(config, Box::new(LogSink), player, Arc::clone(&flags));

    // Low-priority liveness heartbeat while the cycle runs.
    let heartbeat = tokio::spawn(async {
        let mut tick =
            tokio::time::interval(Duration::from_secs(voxbox::defaults::HEARTBEAT_SECS));
        loop {
            tick.tick().await;
            tracing::debug!("heartbeat: answer cycle in progress");
        }
    });

    let result = orchestrator.answer(&audio).await;
    heartbeat.abort();

    // Drop the orchestrator (and its player's finish sender) so the
    // listener thread can drain and exit before we report.
    drop(orchestrator);
    if listener.join().is_err() {
        tracing::warn!("finish listener exited abnormally");
    }

    result.context("answer cycle failed")?;
    tracing::info!(
        started = flags.audio_started(),
        ended = flags.audio_ended(),
        "answer cycle complete"
    );
    Ok(())
}

/// Sanity-log the captured utterance's WAV header, if it has one.
fn log_wav_info(file: &Path) {
    match hound::WavReader::open(file) {
        Ok(reader) => {
            let spec = reader.spec();
            let secs = f64::from(reader.duration()) / f64::from(spec.sample_rate.max(1));
            tracing::info!(
                sample_rate = spec.sample_rate,
                channels = spec.channels,
                duration_secs = format!("{secs:.1}"),
                "captured utterance"
            );
        }
        Err(e) => {
            // Raw capture buffers are uploaded as-is; a missing WAV header
            // is worth noting but not fatal.
            tracing::warn!(file = %file.display(), error = %e, "not a parseable WAV, uploading raw");
        }
    }
}

#[cfg(feature = "cpal-audio")]
fn build_player(finish_tx: crossbeam_channel::Sender<()>) -> Arc<dyn Player> {
    Arc::new(voxbox::playback::WavPlayer::new(finish_tx))
}

#[cfg(not(feature = "cpal-audio"))]
fn build_player(finish_tx: crossbeam_channel::Sender<()>) -> Arc<dyn Player> {
    Arc::new(voxbox::playback::NullPlayer::new(finish_tx))
}
