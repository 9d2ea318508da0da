#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use simplay_core::{ActionKind, ManualTimeSource, SequenceBuilder, SimulationStatus};
use simplay_runtime::{PlaybackController, SimulationConfig};
use std::time::Duration;

#[derive(Debug, Arbitrary)]
enum Command {
    Start,
    Pause,
    Resume,
    Stop,
    Toggle,
    Restart,
    Speed(f64),
    Seek(f64),
    Advance(u16),
    PreviewLoaded,
    PreviewFailed,
}

#[derive(Debug, Arbitrary)]
struct Input {
    durations: Vec<u16>,
    gaps: Vec<u8>,
    needs_preview: bool,
    placeholder_fallback: bool,
    commands: Vec<Command>,
}

fuzz_target!(|input: Input| {
    if input.durations.is_empty() || input.commands.len() > 512 {
        return;
    }
    let mut builder = SequenceBuilder::new();
    for (i, duration) in input.durations.iter().take(32).enumerate() {
        let kind = ActionKind::ALL[i % ActionKind::ALL.len()];
        builder = builder
            .push(kind, f64::from(*duration), "step")
            .at(f64::from(i as u16 * 10), 20.0);
        if let Some(gap) = input.gaps.get(i) {
            builder = builder.gap(f64::from(*gap));
        }
    }
    let Ok(sequence) = builder.build() else {
        return;
    };

    let mut config = SimulationConfig::default();
    config.playback.needs_preview = input.needs_preview;
    config.playback.placeholder_fallback = input.placeholder_fallback;
    let clock = ManualTimeSource::new();
    let mut ctl = PlaybackController::with_time_source(config, sequence, clock.clone());

    for command in input.commands {
        match command {
            Command::Start => {
                ctl.start();
            }
            Command::Pause => {
                ctl.pause();
            }
            Command::Resume => {
                ctl.resume();
            }
            Command::Stop => {
                ctl.stop();
            }
            Command::Toggle => {
                ctl.toggle();
            }
            Command::Restart => {
                ctl.restart();
            }
            Command::Speed(s) => {
                ctl.set_speed(s);
            }
            Command::Seek(t) => {
                ctl.seek_to(t);
            }
            Command::Advance(ms) => {
                clock.advance(Duration::from_millis(u64::from(ms)));
                ctl.tick();
            }
            Command::PreviewLoaded => {
                ctl.preview_loaded();
            }
            Command::PreviewFailed => {
                ctl.preview_failed("fuzz");
            }
        }

        // Post-conditions that must always hold:
        let total = ctl.total_duration();
        let elapsed = ctl.elapsed_time();
        assert!((0.0..=total).contains(&elapsed), "elapsed {elapsed} outside 0..={total}");
        let state = ctl.state();
        assert!((0.0..=100.0).contains(&state.progress), "progress out of range");
        assert!(state.speed.is_finite() && state.speed > 0.0, "speed not positive");
        if let Some(index) = state.current_action_index {
            assert!(index < ctl.sequence().len(), "current index OOB");
        }
        if state.status == SimulationStatus::Completed {
            assert_eq!(elapsed, total, "completed before the end");
        }
        assert_eq!(
            ctl.is_driving(),
            matches!(state.status, SimulationStatus::Loading | SimulationStatus::Running)
        );
    }
});
