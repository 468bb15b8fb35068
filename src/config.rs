/// Application-level constants
pub const APP_NAME: &str = "CareJournal";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "carejournal_lib=info"
}

// ---------------------------------------------------------------------------
// Fixed thresholds. Non-personalised heuristics, not clinical targets.
// ---------------------------------------------------------------------------

/// Blood pressure (mmHg) at or above which a danger signal fires.
pub const BP_SYSTOLIC_DANGER: f64 = 180.0;
pub const BP_DIASTOLIC_DANGER: f64 = 120.0;

/// Glucose (mmol/L).
pub const GLUCOSE_LOW_DANGER: f64 = 3.9;
pub const GLUCOSE_HIGH_INFO: f64 = 16.7;
pub const GLUCOSE_DIET_FOCUS: f64 = 7.0;
pub const MG_DL_PER_MMOL_L: f64 = 18.0;

/// HbA1c (%).
pub const HBA1C_DIET_FOCUS: f64 = 6.5;

/// Electrolytes (mmol/L).
pub const POTASSIUM_HIGH: f64 = 5.5;
pub const SODIUM_LOW: f64 = 130.0;
pub const MAGNESIUM_LOW: f64 = 0.65;
pub const PHOSPHATE_HIGH: f64 = 1.6;

/// Calcium (mmol/L): signal band is wider than the diet band.
pub const CALCIUM_SIGNAL_LOW: f64 = 2.0;
pub const CALCIUM_SIGNAL_HIGH: f64 = 2.75;
pub const CALCIUM_DIET_LOW: f64 = 2.1;
pub const CALCIUM_DIET_HIGH: f64 = 2.6;

/// Creatinine conversion (µmol/L per mg/dL).
pub const UMOL_L_PER_MG_DL_CREATININE: f64 = 88.4;

/// Pediatric height is re-requested when nothing was logged in this many days.
pub const HEIGHT_RECHECK_DAYS: i64 = 30;
/// Age at which the transition-training task appears.
pub const TRANSITION_TRAINING_AGE: u32 = 12;

/// Default kidney-stone daily water target (ml).
pub const STONE_DEFAULT_TARGET_ML: u32 = 2500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_carejournal() {
        assert_eq!(APP_NAME, "CareJournal");
    }

    #[test]
    fn engine_version_matches_cargo() {
        assert_eq!(ENGINE_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn calcium_diet_band_inside_signal_band() {
        assert!(CALCIUM_SIGNAL_LOW < CALCIUM_DIET_LOW);
        assert!(CALCIUM_DIET_HIGH < CALCIUM_SIGNAL_HIGH);
    }
}
