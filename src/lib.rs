pub mod config;
pub mod error;
pub mod models;
pub mod parse;
pub mod rules;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::models::{DietTag, Snapshot};

pub use crate::error::EngineError;
pub use crate::rules::{
    compute_velocity, diet_signals, safety_signals, today_tasks, toggle_manual_task,
    SafetySignal, Task, Velocity, VelocityOptions, VelocityResult,
};

/// Install the global `fmt` subscriber. A second call is a no-op.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} engine v{}", config::APP_NAME, config::ENGINE_VERSION);
    }
}

/// Snapshot-level consistency repair: takes the snapshot by value and hands
/// back the repaired one.
pub fn ensure_active_program_consistent(mut snapshot: Snapshot) -> Snapshot {
    rules::ensure_active_program_consistent(&mut snapshot.programs);
    snapshot
}

/// Every derived output for one snapshot and one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    pub safety: Vec<SafetySignal>,
    pub diet: Vec<DietTag>,
    pub tasks: Vec<Task>,
    pub height_velocity: Velocity,
}

impl Derived {
    pub fn compute(snapshot: &Snapshot, today: NaiveDate) -> Self {
        let derived = Self {
            safety: safety_signals(snapshot),
            diet: diet_signals(snapshot),
            tasks: today_tasks(snapshot, today),
            height_velocity: compute_velocity(
                &snapshot.vitals.height,
                "cm",
                &VelocityOptions::default(),
            ),
        };
        tracing::debug!(
            signals = derived.safety.len(),
            diet = derived.diet.len(),
            tasks = derived.tasks.len(),
            velocity = derived.height_velocity.is_available(),
            "Derived state computed"
        );
        derived
    }
}
