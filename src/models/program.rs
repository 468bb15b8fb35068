use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{DialysisModality, KidneyTrack, Program, ScheduleDay};
use crate::config::STONE_DEFAULT_TARGET_ML;
use crate::parse::{
    lenient_enum_or_default, lenient_enum_seq, lenient_flag, lenient_number, lenient_text,
    parse_date,
};

/// Which programs are switched on and which one drives the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSelection {
    #[serde(default, deserialize_with = "lenient_enum_seq")]
    pub enabled: BTreeSet<Program>,
    #[serde(default, deserialize_with = "lenient_enum_or_default")]
    pub active: Program,
}

impl Default for ProgramSelection {
    fn default() -> Self {
        Self {
            enabled: BTreeSet::from([Program::Kidney]),
            active: Program::Kidney,
        }
    }
}

impl ProgramSelection {
    pub fn is_enabled(&self, program: Program) -> bool {
        self.enabled.contains(&program)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KidneySettings {
    #[serde(default, deserialize_with = "lenient_enum_or_default")]
    pub track: KidneyTrack,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HypertensionSettings {
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_systolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_diastolic: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiabetesSettings {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub uses_insulin: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialysisSettings {
    #[serde(default, deserialize_with = "lenient_enum_or_default")]
    pub modality: DialysisModality,
    #[serde(default, deserialize_with = "lenient_enum_seq")]
    pub schedule_days: BTreeSet<ScheduleDay>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub fluid_restricted: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fluid_limit_ml: Option<f64>,
}

impl DialysisSettings {
    /// Peritoneal exchanges happen every day; hemodialysis follows the schedule.
    pub fn is_session_day(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        match self.modality {
            DialysisModality::Peritoneal => true,
            DialysisModality::Hemodialysis => self
                .schedule_days
                .contains(&ScheduleDay::from_weekday(date.weekday())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoneSettings {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub fluid_restricted: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_ml: Option<f64>,
}

impl StoneSettings {
    pub fn target_ml_or_default(&self) -> f64 {
        self.target_ml
            .filter(|ml| *ml > 0.0)
            .unwrap_or(f64::from(STONE_DEFAULT_TARGET_ML))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PediatricSettings {
    #[serde(default, deserialize_with = "lenient_text")]
    pub birth_date: Option<String>,
}

impl PediatricSettings {
    /// Completed years on `today`, `None` without a valid birth date.
    pub fn age_years(&self, today: NaiveDate) -> Option<u32> {
        let birth = parse_date(self.birth_date.as_deref()?)?;
        today.years_since(birth)
    }
}

/// Per-program settings; each program owns its own block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramSettings {
    #[serde(default)]
    pub kidney: KidneySettings,
    #[serde(default)]
    pub hypertension: HypertensionSettings,
    #[serde(default)]
    pub diabetes: DiabetesSettings,
    #[serde(default)]
    pub dialysis: DialysisSettings,
    #[serde(default)]
    pub stone: StoneSettings,
    #[serde(default)]
    pub pediatric: PediatricSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_selection_is_kidney() {
        let sel = ProgramSelection::default();
        assert_eq!(sel.active, Program::Kidney);
        assert!(sel.is_enabled(Program::Kidney));
        assert_eq!(sel.enabled.len(), 1);
    }

    #[test]
    fn hemodialysis_follows_schedule() {
        let settings = DialysisSettings {
            schedule_days: BTreeSet::from([ScheduleDay::Mon, ScheduleDay::Wed, ScheduleDay::Fri]),
            ..Default::default()
        };
        // 2026-10-12 is a Monday.
        assert!(settings.is_session_day(date(2026, 10, 12)));
        assert!(!settings.is_session_day(date(2026, 10, 13)));
    }

    #[test]
    fn peritoneal_every_day() {
        let settings = DialysisSettings {
            modality: DialysisModality::Peritoneal,
            ..Default::default()
        };
        assert!(settings.is_session_day(date(2026, 10, 13)));
    }

    #[test]
    fn stone_target_default() {
        assert_eq!(StoneSettings::default().target_ml_or_default(), 2500.0);
        let s = StoneSettings {
            target_ml: Some(3000.0),
            ..Default::default()
        };
        assert_eq!(s.target_ml_or_default(), 3000.0);
    }

    #[test]
    fn pediatric_age() {
        let s = PediatricSettings {
            birth_date: Some("2014-10-18".into()),
        };
        assert_eq!(s.age_years(date(2026, 10, 17)), Some(11));
        assert_eq!(s.age_years(date(2026, 10, 18)), Some(12));
        assert_eq!(PediatricSettings::default().age_years(date(2026, 1, 1)), None);
        let bad = PediatricSettings {
            birth_date: Some("soon".into()),
        };
        assert_eq!(bad.age_years(date(2026, 1, 1)), None);
    }

    #[test]
    fn settings_parse_leniently() {
        let s: DialysisSettings = serde_json::from_str(
            r#"{
                "modality": "peritoneal",
                "schedule_days": ["mon", "funday"],
                "fluid_restricted": "yes"
            }"#,
        )
        .unwrap();
        assert_eq!(s.modality, DialysisModality::Peritoneal);
        assert_eq!(s.schedule_days, BTreeSet::from([ScheduleDay::Mon]));
        assert!(s.fluid_restricted);
    }
}
