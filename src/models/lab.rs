use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::CreatinineUnit;
use super::record::SeriesRecord;
use crate::config::UMOL_L_PER_MG_DL_CREATININE;
use crate::parse::{lenient_enum, lenient_number, lenient_string, lenient_uuid};

/// One blood panel as entered from a lab report.
/// Electrolytes in mmol/L, glucose in mmol/L, HbA1c in %.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabPanel {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub creatinine: Option<f64>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub creatinine_unit: Option<CreatinineUnit>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub egfr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub potassium: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sodium: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub calcium: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub phosphate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub magnesium: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub glucose: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub hba1c: Option<f64>,
}

impl LabPanel {
    /// Creatinine normalised to µmol/L.
    pub fn creatinine_umol_l(&self) -> Option<f64> {
        let value = self.creatinine?;
        Some(match self.creatinine_unit.unwrap_or_default() {
            CreatinineUnit::UmolL => value,
            CreatinineUnit::MgDl => value * UMOL_L_PER_MG_DL_CREATININE,
        })
    }
}

impl SeriesRecord for LabPanel {
    fn timestamp(&self) -> &str {
        &self.date
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "creatinine" => self.creatinine_umol_l(),
            "egfr" => self.egfr,
            "potassium" => self.potassium,
            "sodium" => self.sodium,
            "calcium" => self.calcium,
            "phosphate" => self.phosphate,
            "magnesium" => self.magnesium,
            "glucose" => self.glucose,
            "hba1c" => self.hba1c,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_values_are_absent() {
        let panel: LabPanel = serde_json::from_str(
            r#"{"date": "2026-02-01", "potassium": "5,8", "sodium": "hemolysed", "calcium": ""}"#,
        )
        .unwrap();
        assert_eq!(panel.potassium, Some(5.8));
        assert_eq!(panel.sodium, None);
        assert_eq!(panel.calcium, None);
        assert_eq!(panel.magnesium, None);
    }

    #[test]
    fn creatinine_normalised_to_umol() {
        let panel = LabPanel {
            date: "2026-02-01".into(),
            creatinine: Some(1.5),
            creatinine_unit: Some(CreatinineUnit::MgDl),
            ..Default::default()
        };
        let umol = panel.creatinine_umol_l().unwrap();
        assert!((umol - 132.6).abs() < 1e-9);
        assert_eq!(panel.numeric_field("creatinine"), Some(umol));
    }

    #[test]
    fn creatinine_defaults_to_umol() {
        let panel = LabPanel {
            date: "2026-02-01".into(),
            creatinine: Some(140.0),
            ..Default::default()
        };
        assert_eq!(panel.creatinine_umol_l(), Some(140.0));
    }

    #[test]
    fn unknown_field_is_none() {
        let panel = LabPanel {
            date: "2026-02-01".into(),
            potassium: Some(4.0),
            ..Default::default()
        };
        assert_eq!(panel.numeric_field("potassium"), Some(4.0));
        assert_eq!(panel.numeric_field("ferritin"), None);
    }
}
