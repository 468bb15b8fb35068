use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::enums::{Comorbidity, HistoryFilter};
use super::lab::LabPanel;
use super::log::{DialysisSession, MedicationLog, SymptomLog, WaterIntake};
use super::program::{ProgramSelection, ProgramSettings};
use super::vital_sign::{
    BloodPressureRecord, GlucoseRecord, HeightRecord, TemperatureRecord, WeightRecord,
};
use crate::error::EngineError;
use crate::parse::{lenient_enum_or_default, lenient_enum_seq};
use crate::rules::programs::ensure_active_program_consistent;

/// Vital-sign series, one per category. Order is insertion order, not time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(default)]
    pub blood_pressure: Vec<BloodPressureRecord>,
    #[serde(default)]
    pub weight: Vec<WeightRecord>,
    #[serde(default)]
    pub height: Vec<HeightRecord>,
    #[serde(default)]
    pub glucose: Vec<GlucoseRecord>,
    #[serde(default)]
    pub temperature: Vec<TemperatureRecord>,
}

/// Program-specific logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Logs {
    #[serde(default)]
    pub dialysis_sessions: Vec<DialysisSession>,
    #[serde(default)]
    pub water_intake: Vec<WaterIntake>,
    #[serde(default)]
    pub medications: Vec<MedicationLog>,
    #[serde(default)]
    pub symptoms: Vec<SymptomLog>,
}

/// Manually ticked task ids, keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskChecks(pub BTreeMap<String, BTreeSet<String>>);

impl TaskChecks {
    pub fn is_checked(&self, date_key: &str, task_id: &str) -> bool {
        self.0
            .get(date_key)
            .is_some_and(|ids| ids.contains(task_id))
    }

    /// Flip one task on one day. Returns the new state.
    pub fn toggle(&mut self, date_key: &str, task_id: &str) -> bool {
        let ids = self.0.entry(date_key.to_string()).or_default();
        let checked = if ids.remove(task_id) {
            false
        } else {
            ids.insert(task_id.to_string());
            true
        };
        if ids.is_empty() {
            self.0.remove(date_key);
        }
        checked
    }
}

/// User preferences the engine is allowed to update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, deserialize_with = "lenient_enum_or_default")]
    pub history_filter: HistoryFilter,
}

impl Preferences {
    /// Store the last-used history filter. Returns whether it changed.
    pub fn remember_history_filter(&mut self, filter: HistoryFilter) -> bool {
        let changed = self.history_filter != filter;
        self.history_filter = filter;
        changed
    }
}

/// Everything the rules read. Supplied by the caller, never cached here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub programs: ProgramSelection,
    #[serde(default, deserialize_with = "lenient_enum_seq")]
    pub comorbidities: Vec<Comorbidity>,
    #[serde(default)]
    pub labs: Vec<LabPanel>,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub logs: Logs,
    #[serde(default)]
    pub settings: ProgramSettings,
    #[serde(default)]
    pub task_checks: TaskChecks,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Snapshot {
    /// Parse a persisted snapshot and repair the program selection.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let mut snapshot: Snapshot = serde_json::from_str(json)?;
        ensure_active_program_consistent(&mut snapshot.programs);
        tracing::debug!(
            active = %snapshot.programs.active,
            enabled = snapshot.programs.enabled.len(),
            labs = snapshot.labs.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }
}
