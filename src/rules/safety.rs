//! Red-flag evaluation over the latest entries.
//!
//! Every rule is evaluated independently and all matches are returned.
//! Dialysis danger signals come first, then vitals and labs in rule order.
//! Absent values never match. The list is never empty.

use serde::{Deserialize, Serialize};

use crate::config::{
    BP_DIASTOLIC_DANGER, BP_SYSTOLIC_DANGER, CALCIUM_SIGNAL_HIGH, CALCIUM_SIGNAL_LOW,
    GLUCOSE_HIGH_INFO, GLUCOSE_LOW_DANGER, MAGNESIUM_LOW, POTASSIUM_HIGH, SODIUM_LOW,
};
use crate::models::{
    BloodPressureRecord, DialysisModality, DialysisSession, DialysisSettings, LabPanel, Program,
    ProgramSelection, SignalKind, SignalLevel, Snapshot,
};

use super::messages::SignalTemplates;
use super::series::latest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySignal {
    pub level: SignalLevel,
    pub kind: SignalKind,
    pub title: String,
    pub detail: String,
}

impl SafetySignal {
    fn new(level: SignalLevel, kind: SignalKind, (title, detail): (String, String)) -> Self {
        Self {
            level,
            kind,
            title,
            detail,
        }
    }
}

/// The slice of the snapshot the safety rules read.
#[derive(Debug, Clone, Copy)]
pub struct SafetyInputs<'a> {
    pub lab: Option<&'a LabPanel>,
    pub blood_pressure: Option<&'a BloodPressureRecord>,
    /// Latest glucose, already normalised to mmol/L.
    pub glucose_mmol_l: Option<f64>,
    pub programs: &'a ProgramSelection,
    pub dialysis: &'a DialysisSettings,
    pub last_session: Option<&'a DialysisSession>,
}

impl<'a> SafetyInputs<'a> {
    /// Glucose comes from the latest glucose vital, else from the latest panel.
    pub fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        let lab = latest(&snapshot.labs);
        let glucose_mmol_l = match latest(&snapshot.vitals.glucose) {
            Some(record) => record.mmol_l(),
            None => lab.and_then(|l| l.glucose),
        };
        Self {
            lab,
            blood_pressure: latest(&snapshot.vitals.blood_pressure),
            glucose_mmol_l,
            programs: &snapshot.programs,
            dialysis: &snapshot.settings.dialysis,
            last_session: latest(&snapshot.logs.dialysis_sessions),
        }
    }
}

/// Safety signals for a snapshot.
pub fn safety_signals(snapshot: &Snapshot) -> Vec<SafetySignal> {
    evaluate(&SafetyInputs::from_snapshot(snapshot))
}

pub fn evaluate(inputs: &SafetyInputs<'_>) -> Vec<SafetySignal> {
    let mut signals = dialysis_red_flags(inputs);
    signals.extend(vital_signals(inputs));
    signals.extend(lab_signals(inputs.lab));

    if inputs.programs.is_enabled(Program::Stone)
        && inputs.programs.is_enabled(Program::Dialysis)
        && inputs.dialysis.fluid_restricted
    {
        signals.push(SafetySignal::new(
            SignalLevel::Info,
            SignalKind::HydrationConflict,
            SignalTemplates::hydration_conflict(),
        ));
    }

    if signals.is_empty() {
        signals.push(SafetySignal::new(
            SignalLevel::Ok,
            SignalKind::AllClear,
            SignalTemplates::all_clear(),
        ));
    }
    tracing::debug!(count = signals.len(), "Safety signals evaluated");
    signals
}

fn dialysis_red_flags(inputs: &SafetyInputs<'_>) -> Vec<SafetySignal> {
    let mut signals = Vec::new();
    if !inputs.programs.is_enabled(Program::Dialysis) {
        return signals;
    }
    let Some(session) = inputs.last_session else {
        return signals;
    };

    match inputs.dialysis.modality {
        DialysisModality::Peritoneal => {
            if session.has_peritoneal_warning() {
                signals.push(SafetySignal::new(
                    SignalLevel::Danger,
                    SignalKind::PeritonealRedFlag,
                    SignalTemplates::peritoneal_red_flag(
                        session.cloudy_effluent,
                        session.fever,
                        session.abdominal_pain,
                    ),
                ));
            }
        }
        DialysisModality::Hemodialysis => {
            if session.access_issue {
                signals.push(SafetySignal::new(
                    SignalLevel::Danger,
                    SignalKind::AccessRedFlag,
                    SignalTemplates::access_red_flag(),
                ));
            }
        }
    }
    signals
}

fn vital_signals(inputs: &SafetyInputs<'_>) -> Vec<SafetySignal> {
    let mut signals = Vec::new();

    if let Some(bp) = inputs.blood_pressure {
        let systolic_high = bp.systolic.is_some_and(|v| v >= BP_SYSTOLIC_DANGER);
        let diastolic_high = bp.diastolic.is_some_and(|v| v >= BP_DIASTOLIC_DANGER);
        if systolic_high || diastolic_high {
            signals.push(SafetySignal::new(
                SignalLevel::Danger,
                SignalKind::BloodPressureVeryHigh,
                SignalTemplates::blood_pressure_very_high(bp.systolic, bp.diastolic),
            ));
        }
    }

    if let Some(glucose) = inputs.glucose_mmol_l {
        if glucose <= GLUCOSE_LOW_DANGER {
            signals.push(SafetySignal::new(
                SignalLevel::Danger,
                SignalKind::LowGlucose,
                SignalTemplates::low_glucose(glucose),
            ));
        } else if glucose >= GLUCOSE_HIGH_INFO {
            signals.push(SafetySignal::new(
                SignalLevel::Info,
                SignalKind::HighGlucose,
                SignalTemplates::high_glucose(glucose),
            ));
        }
    }

    signals
}

fn lab_signals(lab: Option<&LabPanel>) -> Vec<SafetySignal> {
    let mut signals = Vec::new();
    let Some(lab) = lab else {
        return signals;
    };

    if let Some(k) = lab.potassium.filter(|v| *v >= POTASSIUM_HIGH) {
        signals.push(SafetySignal::new(
            SignalLevel::Danger,
            SignalKind::HighPotassium,
            SignalTemplates::high_potassium(k),
        ));
    }
    if let Some(na) = lab.sodium.filter(|v| *v < SODIUM_LOW) {
        signals.push(SafetySignal::new(
            SignalLevel::Danger,
            SignalKind::LowSodium,
            SignalTemplates::low_sodium(na),
        ));
    }
    if let Some(mg) = lab.magnesium.filter(|v| *v < MAGNESIUM_LOW) {
        signals.push(SafetySignal::new(
            SignalLevel::Danger,
            SignalKind::LowMagnesium,
            SignalTemplates::low_magnesium(mg),
        ));
    }
    if let Some(ca) = lab
        .calcium
        .filter(|v| *v < CALCIUM_SIGNAL_LOW || *v > CALCIUM_SIGNAL_HIGH)
    {
        signals.push(SafetySignal::new(
            SignalLevel::Info,
            SignalKind::AbnormalCalcium,
            SignalTemplates::abnormal_calcium(ca),
        ));
    }

    signals
}
