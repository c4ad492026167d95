//! ndi-tool: inspect, discover, send to and receive from NDI sources.
//!
//! This is the main entry point of the command-line consumer of the
//! runtime binding.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lib_ndi_ffi::{Binding, Capture, CaptureKinds, Finder, Receiver, Sender};
use lib_ndi_types::{
    FindCreateSettings, FourCC, FrameRate, RecvCreateSettings, SendCreateSettings, Source,
    VideoFrameV2,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ndi-tool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Runtime library to load, overriding discovery
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Show runtime version and resolved entry points
    Info,

    /// List sources on the network
    Find {
        /// How long to wait for sources to appear
        #[arg(short, long, default_value = "5000")]
        timeout_ms: u32,

        /// Leave out sources running on this machine
        #[arg(long)]
        hide_local: bool,

        /// Groups to search, comma separated
        #[arg(short, long)]
        groups: Option<String>,
    },

    /// Publish a moving test pattern
    SendVideo {
        /// Name to publish under
        #[arg(short, long)]
        name: Option<String>,

        #[arg(long, default_value = "720")]
        width: i32,

        #[arg(long, default_value = "480")]
        height: i32,

        /// Pixel layout (BGRX, BGRA, UYVY, ...)
        #[arg(long, default_value = "BGRX", value_parser = parse_video_fourcc)]
        fourcc: FourCC,

        /// Frames to send
        #[arg(long, default_value = "300")]
        frames: u64,
    },

    /// Capture frames from a source and report them
    Recv {
        /// Source name, `MACHINE (Source)`
        #[arg(short, long)]
        source: Option<String>,

        /// Frames to capture before exiting
        #[arg(long, default_value = "100")]
        frames: usize,

        /// Per-capture timeout
        #[arg(short, long, default_value = "5000")]
        timeout_ms: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from {:?}", path);
            config::load_config(path)?
        }
        None => config::CliConfig::default(),
    };

    let library = config::resolve_library_path(cli.library.as_deref(), &config.library)?;
    let binding = load_binding(&library)?;

    match cli.command {
        Commands::Info => {
            show_info(&binding, &library, cli.format)?;
        }
        Commands::Find { timeout_ms, hide_local, groups } => {
            let settings = find_settings(hide_local, groups);
            find_sources(&binding, &settings, timeout_ms, cli.format)?;
        }
        Commands::SendVideo { name, width, height, fourcc, frames } => {
            let mut settings = config
                .sender
                .unwrap_or_else(|| SendCreateSettings::new("ndi-tool"));
            if let Some(name) = name {
                settings.name = name;
            }
            send_video(&binding, &settings, width, height, fourcc, frames)?;
        }
        Commands::Recv { source, frames, timeout_ms } => {
            let mut settings = config.receiver.unwrap_or_default();
            if let Some(name) = source {
                settings.source = Source::new(name);
            }
            if settings.source.is_empty() {
                anyhow::bail!("No source given; pass --source or set receiver.source in the config");
            }
            receive(&binding, &settings, frames, timeout_ms, cli.format)?;
        }
    }

    Ok(())
}

fn find_settings(hide_local: bool, groups: Option<String>) -> FindCreateSettings {
    FindCreateSettings {
        show_local_sources: !hide_local,
        groups,
        ..Default::default()
    }
}

fn parse_video_fourcc(s: &str) -> Result<FourCC, String> {
    let tag: FourCC = s.to_ascii_uppercase().parse().map_err(|e| format!("{e}"))?;
    match tag.frame_size(1, 1) {
        Some(_) => Ok(tag),
        None => Err(format!("{tag} is not a video pixel layout")),
    }
}

fn load_binding(path: &Path) -> Result<Arc<Binding>> {
    tracing::info!("Loading runtime from {:?}", path);
    Binding::load(path).with_context(|| format!("Failed to load NDI runtime from {:?}", path))
}

fn show_info(binding: &Binding, library: &Path, format: OutputFormat) -> Result<()> {
    let info = output::RuntimeInfo {
        library: library.display().to_string(),
        version: binding.version()?.map(str::to_string),
        supported_cpu: binding.is_supported_cpu()?,
        entries: binding
            .table()
            .counts_by_revision()
            .into_iter()
            .map(|(rev, entries)| output::RevisionEntries {
                revision: rev.to_string(),
                entries,
            })
            .collect(),
    };
    output::write_info(&mut std::io::stdout().lock(), &info, format)
}

fn find_sources(
    binding: &Arc<Binding>,
    settings: &FindCreateSettings,
    timeout_ms: u32,
    format: OutputFormat,
) -> Result<()> {
    let finder = Finder::create(binding, settings)?;

    // Keep waiting while the list keeps changing, up to the timeout.
    let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        let wait = u32::try_from(remaining.as_millis()).unwrap_or(u32::MAX);
        if !finder.wait_for_sources(wait)? {
            break;
        }
        tracing::debug!("Source list changed");
    }

    let sources = finder.current_sources()?;
    tracing::info!("Found {} source(s)", sources.len());
    output::write_sources(&mut std::io::stdout().lock(), &sources, format)
}

fn send_video(
    binding: &Arc<Binding>,
    settings: &SendCreateSettings,
    width: i32,
    height: i32,
    fourcc: FourCC,
    frames: u64,
) -> Result<()> {
    if width <= 0 || height <= 0 {
        anyhow::bail!("Frame size must be positive (got {}x{})", width, height);
    }

    let sender = Sender::create(binding, settings)?;
    let mut frame = VideoFrameV2::new();
    frame.set_geometry(width, height, fourcc);
    frame.set_frame_rate(FrameRate::NTSC_2997);

    let len = frame
        .data_len()
        .with_context(|| format!("Cannot size a {}x{} {} frame", width, height, fourcc))?;
    let stride = usize::try_from(frame.line_stride)?;
    let mut pixels = vec![0u8; len];

    tracing::info!("Sending {} frames of {}x{} {} as {:?}", frames, width, height, fourcc, settings.name);
    for index in 0..frames {
        fill_pattern(&mut pixels, stride, index);
        // Clocked to the frame rate, so this paces the loop.
        sender.send_video(&frame, &pixels, None)?;

        if index % 30 == 0 {
            tracing::info!("Frame {}: {} receiver(s) connected", index, sender.connections(0)?);
        }
    }

    println!("Sent {} frames.", frames);
    Ok(())
}

/// Diagonal bars that move one step per frame.
fn fill_pattern(pixels: &mut [u8], stride: usize, index: u64) {
    let shift = (index % 256) as usize;
    for (y, row) in pixels.chunks_mut(stride).enumerate() {
        for (x, byte) in row.iter_mut().enumerate() {
            *byte = ((x / 4 + y + shift) & 0xff) as u8;
        }
    }
}

fn receive(
    binding: &Arc<Binding>,
    settings: &RecvCreateSettings,
    frames: usize,
    timeout_ms: u32,
    format: OutputFormat,
) -> Result<()> {
    let receiver = Receiver::create(binding, settings)?;
    tracing::info!("Receiving from {:?}", settings.source.name);

    let mut reports = Vec::with_capacity(frames);
    while reports.len() < frames {
        let index = reports.len();
        let report = match receiver.capture(CaptureKinds::ALL, timeout_ms)? {
            Capture::None => {
                tracing::info!("No data within {} ms", timeout_ms);
                continue;
            }
            Capture::Video(video) => output::FrameReport {
                index,
                kind: "video".into(),
                detail: format!(
                    "{}x{} {} @ {:.2} fps",
                    video.xres,
                    video.yres,
                    video.fourcc,
                    video.frame_rate().as_f64().unwrap_or(0.0)
                ),
                timecode: Some(video.timecode),
            },
            Capture::Audio(audio) => output::FrameReport {
                index,
                kind: "audio".into(),
                detail: format!(
                    "{} ch x {} samples @ {} Hz",
                    audio.no_channels, audio.no_samples, audio.sample_rate
                ),
                timecode: Some(audio.timecode),
            },
            Capture::Metadata(meta) => output::FrameReport {
                index,
                kind: "metadata".into(),
                detail: format!("{} bytes", meta.declared_len().unwrap_or(0)),
                timecode: Some(meta.timecode),
            },
            Capture::StatusChange => output::FrameReport {
                index,
                kind: "status_change".into(),
                detail: String::new(),
                timecode: None,
            },
            Capture::Error => {
                tracing::warn!("Connection lost");
                break;
            }
        };
        tracing::debug!(?report, "Captured");
        reports.push(report);
    }

    output::write_frames(&mut std::io::stdout().lock(), &reports, format)
}
