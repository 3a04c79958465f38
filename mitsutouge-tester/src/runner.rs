use std::time::{Duration, Instant};

use colored::Colorize;
use serde::{Serialize, Serializer};

use crate::scenario::{Scenario, ScenarioCtx};

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub key: String,
    pub scenario_name: String,
    pub passed: bool,
    pub failures: Vec<String>,
    #[serde(serialize_with = "duration_ms")]
    pub duration: Duration,
}

#[allow(clippy::cast_precision_loss)]
fn duration_ms<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_micros() as f64 / 1000.0)
}

pub fn run_scenario(scenario: &Scenario, ctx: &ScenarioCtx) -> ScenarioResult {
    log::debug!("running scenario {}", scenario.key);
    let start = Instant::now();
    let outcome = scenario.run(ctx);
    let duration = start.elapsed();

    let failures = match outcome {
        Ok(()) => {
            println!("✅ {} - {:?}", scenario.name.green(), duration);
            Vec::new()
        }
        Err(err) => {
            eprintln!("❌ {} - {:?}: {:#}", scenario.name.red(), duration, err);
            vec![format!("{err:#}")]
        }
    };
    ScenarioResult {
        key: scenario.key.to_string(),
        scenario_name: scenario.name.to_string(),
        passed: failures.is_empty(),
        failures,
        duration,
    }
}

/// Result recorded for a requested key that matches no scenario.
pub fn unknown_scenario(key: &str) -> ScenarioResult {
    eprintln!("⚠️  Unknown scenario: {}", key.yellow());
    ScenarioResult {
        key: key.to_string(),
        scenario_name: key.to_string(),
        passed: false,
        failures: vec![format!("unknown scenario `{key}`")],
        duration: Duration::ZERO,
    }
}
