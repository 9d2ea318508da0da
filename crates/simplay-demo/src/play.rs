#![forbid(unsafe_code)]

//! Headless playback: drive a controller on a virtual clock and print
//! sampled frames.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde::Deserialize;
use simplay::{
    ActionSequence, DriveReport, FrameDriver, ManualTimeSource, PlaybackController, RowStatus,
    SimulationAction, SimulationConfig, SimulatorView, ViewFrame,
};

use crate::error::{DemoError, Result};
use crate::fixture;

/// How the (absent) preview surface behaves in a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PreviewMode {
    /// The preview reports loaded right after start.
    #[default]
    Loaded,
    /// The preview refuses to frame the page; playback uses the placeholder.
    Blocked,
    /// The preview never reports; the load timeout decides.
    Timeout,
}

#[derive(Debug, Clone, Args)]
pub struct PlayArgs {
    /// Sequence JSON file; the built-in login flow when omitted.
    #[arg(long)]
    pub sequence: Option<PathBuf>,

    /// Configuration file (.toml or .json).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Playback speed multiplier.
    #[arg(long)]
    pub speed: Option<f64>,

    /// Jump to this sequence time (ms) right after start.
    #[arg(long)]
    pub seek: Option<f64>,

    /// Frame interval in ms; the configured value when omitted.
    #[arg(long = "frame-ms")]
    pub frame_ms: Option<u64>,

    /// Print every Nth frame (action changes and the last frame always print).
    #[arg(long, default_value_t = 10)]
    pub every: u64,

    /// Safety cap on frames.
    #[arg(long = "max-frames", default_value_t = 100_000)]
    pub max_frames: u64,

    /// Preview behaviour.
    #[arg(long, value_enum, default_value_t = PreviewMode::Loaded)]
    pub preview: PreviewMode,

    /// Emit one JSON object per line instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Wire shape accepted by `play --sequence` and `validate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSequence {
    actions: Vec<SimulationAction>,
    #[serde(default)]
    total_duration: Option<f64>,
}

/// Parse and validate a sequence file, keeping the typed validation error.
pub fn load_sequence(path: &Path) -> Result<ActionSequence> {
    let content = std::fs::read_to_string(path)?;
    parse_sequence(&content)
}

pub fn parse_sequence(json: &str) -> Result<ActionSequence> {
    let raw: RawSequence = serde_json::from_str(json)?;
    let sequence = match raw.total_duration {
        Some(total) => ActionSequence::with_total_duration(raw.actions, total)?,
        None => ActionSequence::new(raw.actions)?,
    };
    Ok(sequence)
}

pub fn load_config(path: &Path) -> Result<SimulationConfig> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        SimulationConfig::from_json_file(path)?
    } else {
        SimulationConfig::from_toml_file(path)?
    };
    Ok(config)
}

/// Play according to `args`, writing frames and a summary to `out`.
pub fn run_play(args: &PlayArgs, out: &mut impl Write) -> Result<DriveReport> {
    if args.every == 0 {
        return Err(DemoError::Usage("--every must be at least 1".into()));
    }
    let sequence = match &args.sequence {
        Some(path) => load_sequence(path)?,
        None => fixture::login_flow()?,
    };
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(frame_ms) = args.frame_ms {
        config.playback.frame_interval_ms = frame_ms;
    }
    let config = config.validated()?;

    let clock = ManualTimeSource::new();
    let driver = FrameDriver::from_policy(&config.playback).with_max_frames(args.max_frames);
    let mut controller = PlaybackController::with_time_source(config, sequence, clock.clone());

    controller.start();
    match args.preview {
        PreviewMode::Loaded => {
            controller.preview_loaded();
        }
        PreviewMode::Blocked => {
            controller.preview_failed("Preview blocked: the page refuses to be framed");
        }
        PreviewMode::Timeout => {}
    }
    if let Some(speed) = args.speed {
        if !controller.set_speed(speed) {
            return Err(DemoError::Usage(format!(
                "--speed must be finite and positive, got {speed}"
            )));
        }
    }
    if let Some(seek) = args.seek {
        if !controller.seek_to(seek) {
            tracing::warn!(seek_ms = seek, status = %controller.status(), "seek ignored");
        }
    }

    write_frame(out, args.json, 0, &SimulatorView::from_controller(&controller))?;

    let every = args.every;
    let mut last_index = controller.state().current_action_index;
    let mut write_result = Ok(());
    let report = driver.run_observed(
        &mut controller,
        |d| clock.advance(d),
        |frame_no, _outcome, ctl| {
            let index = ctl.state().current_action_index;
            let action_changed = index != last_index;
            last_index = index;
            let last = !ctl.is_driving();
            if write_result.is_ok() && (frame_no % every == 0 || action_changed || last) {
                write_result = write_frame(out, args.json, frame_no, &SimulatorView::from_controller(ctl));
            }
        },
    );
    write_result?;
    write_summary(out, args.json, &report, controller.total_duration())?;
    Ok(report)
}

fn write_frame(out: &mut impl Write, json: bool, frame_no: u64, frame: &ViewFrame) -> Result<()> {
    if json {
        let line = serde_json::json!({ "frame": frame_no, "view": frame });
        writeln!(out, "{line}")?;
        return Ok(());
    }
    let caption = frame
        .timeline
        .iter()
        .find(|row| row.status == RowStatus::Current)
        .map(|row| format!("{} {}: {}", row.icon.glyph(), row.kind.label(), row.description))
        .unwrap_or_else(|| "-".to_string());
    let cursor = frame
        .cursor
        .map(|c| format!("({:.0},{:.0})", c.position.x, c.position.y))
        .unwrap_or_else(|| "(hidden)".to_string());
    writeln!(
        out,
        "{frame_no:>6}  {}  {:>4}  {:<15}  {cursor:<12}  {caption}",
        frame.elapsed_label, frame.progress_label, frame.status_label,
    )?;
    if let Some(banner) = &frame.banner {
        writeln!(out, "        {}", banner.text())?;
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, json: bool, report: &DriveReport, total_ms: f64) -> Result<()> {
    if json {
        let line = serde_json::json!({
            "summary": {
                "frames": report.frames,
                "status": report.final_status,
                "elapsedMs": report.elapsed_ms,
                "totalMs": total_ms,
                "actionChanges": report.action_changes,
            }
        });
        writeln!(out, "{line}")?;
    } else {
        writeln!(
            out,
            "{} after {} frames at {} ({} action changes)",
            report.final_status,
            report.frames,
            simplay::format_clock(report.elapsed_ms),
            report.action_changes,
        )?;
    }
    Ok(())
}
