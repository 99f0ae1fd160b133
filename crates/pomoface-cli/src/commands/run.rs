use clap::Args;
use pomoface_core::clock::{parse_minutes, MINUTE};
use pomoface_core::{Action, Config, ControlState, Event};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use super::Headless;

/// Refresh period of the headless loop, roughly 60 Hz.
const REFRESH: Duration = Duration::from_millis(16);

#[derive(Args)]
pub struct RunArgs {
    /// Session length in minutes (defaults to the config value)
    #[arg(long)]
    session_minutes: Option<String>,
    /// Break length in minutes (defaults to the config value)
    #[arg(long)]
    break_minutes: Option<String>,
    /// Stop after this many completed session/break cycles
    #[arg(long, default_value = "1")]
    cycles: u32,
    /// Clock speed multiplier
    #[arg(long, default_value = "1.0")]
    speed: f64,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(args.speed.is_finite() && args.speed > 0.0) {
        return Err(format!("--speed must be positive, got {}", args.speed).into());
    }
    let config = Config::load()?;
    let session_ms = args
        .session_minutes
        .as_deref()
        .map_or(config.timer.session_ms(), parse_minutes);
    let break_ms = args
        .break_minutes
        .as_deref()
        .map_or(config.timer.break_ms(), parse_minutes);

    let host = Headless::new(&config, session_ms, break_ms)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(drive(host, &config, args.cycles, args.speed))
}

async fn drive(
    mut host: Headless,
    config: &Config,
    cycles: u32,
    speed: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        session_minutes = host.app.model().session_duration() / MINUTE,
        break_minutes = host.app.model().break_duration() / MINUTE,
        cycles,
        "starting"
    );

    let started = Instant::now();
    let mut ticker = tokio::time::interval(REFRESH);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    host.app.submit(Action::StartSession);
    let mut completed = emit(host.app.drain_events())?;

    while completed < cycles {
        ticker.tick().await;
        let now = started.elapsed().as_secs_f64() * 1000.0 * speed;
        host.frame(now);
        completed += emit(host.app.drain_events())?;

        if !config.timer.auto_cycle && completed < cycles {
            host.advance_ended_phase();
            completed += emit(host.app.drain_events())?;
        }
    }

    host.app.stop();
    info!(completed, "done");
    Ok(())
}

/// Print events as JSON lines; returns how many breaks ended.
fn emit(events: Vec<Event>) -> Result<u32, serde_json::Error> {
    let mut ended_breaks = 0;
    for event in events {
        if matches!(
            event,
            Event::TransitionAccepted {
                to: ControlState::EndedBreak,
                ..
            }
        ) {
            ended_breaks += 1;
        }
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(ended_breaks)
}
