use pomoface_core::sam::Mode;
use pomoface_core::Config;
use serde_json::json;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let table = config.transition_table();
    let validation = table.validate(&Mode::FOLLOW_UPS);

    let follow_ups: Vec<_> = Mode::FOLLOW_UPS
        .iter()
        .map(|(from, action)| json!({ "from": from, "action": action }))
        .collect();
    let report = json!({
        "source": if config.transitions.is_some() { "config" } else { "default" },
        "transitions": table,
        "follow_ups": follow_ups,
        "valid": validation.is_ok(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    validation?;
    Ok(())
}
