use clap::Args;
use pomoface_core::{Action, Config};
use serde_json::json;

use super::Headless;

#[derive(Args)]
pub struct SimulateArgs {
    /// Session length in milliseconds
    #[arg(long, default_value = "1500")]
    session_ms: f64,
    /// Break length in milliseconds
    #[arg(long, default_value = "500")]
    break_ms: f64,
    /// Stop after this much simulated time
    #[arg(long, default_value = "2000")]
    until_ms: f64,
    /// Simulated time between refreshes
    #[arg(long, default_value = "16")]
    step_ms: f64,
    /// Use built-in defaults instead of the config file
    #[arg(long)]
    no_config: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(args.step_ms.is_finite() && args.step_ms > 0.0) {
        return Err(format!("--step-ms must be positive, got {}", args.step_ms).into());
    }
    let config = if args.no_config {
        Config::default()
    } else {
        Config::load()?
    };

    let mut host = Headless::new(&config, args.session_ms, args.break_ms)?;
    host.app.submit(Action::StartSession);

    let mut frames = 0u64;
    let mut t = 0.0;
    while t < args.until_ms {
        t = (t + args.step_ms).min(args.until_ms);
        if host.frame(t) {
            frames += 1;
        }
        if !config.timer.auto_cycle {
            host.advance_ended_phase();
        }
    }

    let report = json!({
        "events": host.app.drain_events(),
        "state": host.app.state(),
        "readout": host.app.readout(),
        "frames": frames,
        "strokes": host.strokes(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    host.app.stop();
    Ok(())
}
