use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DialysisModality, Program};
use super::record::SeriesRecord;
use crate::parse::{lenient_enum, lenient_flag, lenient_number, lenient_string, lenient_uuid};

/// One dialysis session or peritoneal exchange day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialysisSession {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub modality: Option<DialysisModality>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub cloudy_effluent: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub fever: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub abdominal_pain: bool,
    /// Bleeding, redness or loss of thrill at the vascular access.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub access_issue: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub uf_ml: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pre_weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub post_weight_kg: Option<f64>,
}

impl DialysisSession {
    /// Peritonitis warning pattern.
    pub fn has_peritoneal_warning(&self) -> bool {
        self.cloudy_effluent || self.fever || self.abdominal_pain
    }
}

impl SeriesRecord for DialysisSession {
    fn timestamp(&self) -> &str {
        &self.date
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "uf_ml" => self.uf_ml,
            "pre_weight_kg" => self.pre_weight_kg,
            "post_weight_kg" => self.post_weight_kg,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterIntake {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub ml: Option<f64>,
}

impl SeriesRecord for WaterIntake {
    fn timestamp(&self) -> &str {
        &self.date
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "ml" => self.ml,
            _ => None,
        }
    }
}

/// A "taken" mark for a medication, scoped to the program it was logged under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationLog {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub program: Option<Program>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

impl SeriesRecord for MedicationLog {
    fn timestamp(&self) -> &str {
        &self.date
    }

    fn numeric_field(&self, _field: &str) -> Option<f64> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomLog {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub program: Option<Program>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub severity: Option<f64>,
}

impl SeriesRecord for SymptomLog {
    fn timestamp(&self) -> &str {
        &self.date
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "severity" => self.severity,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peritoneal_warning_any_flag() {
        let mut s = DialysisSession {
            date: "2026-02-01".into(),
            ..Default::default()
        };
        assert!(!s.has_peritoneal_warning());
        s.abdominal_pain = true;
        assert!(s.has_peritoneal_warning());
    }

    #[test]
    fn session_flags_from_form_text() {
        let s: DialysisSession = serde_json::from_str(
            r#"{
                "date": "2026-02-01",
                "modality": "peritoneal",
                "cloudy_effluent": "yes",
                "uf_ml": "850"
            }"#,
        )
        .unwrap();
        assert!(s.cloudy_effluent);
        assert!(!s.fever);
        assert_eq!(s.modality, Some(DialysisModality::Peritoneal));
        assert_eq!(s.numeric_field("uf_ml"), Some(850.0));
    }

    #[test]
    fn medication_log_unknown_program_is_absent() {
        let m: MedicationLog =
            serde_json::from_str(r#"{"date": "2026-02-01", "program": "cardio", "name": "x"}"#)
                .unwrap();
        assert_eq!(m.program, None);
    }
}
