use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{GlucoseUnit, MeasurementContext};
use super::record::SeriesRecord;
use crate::config::MG_DL_PER_MMOL_L;
use crate::parse::{lenient_enum, lenient_number, lenient_string, lenient_text, lenient_uuid};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureRecord {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recorded_at: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub systolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub diastolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pulse: Option<f64>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub context: Option<MeasurementContext>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
}

impl SeriesRecord for BloodPressureRecord {
    fn timestamp(&self) -> &str {
        &self.recorded_at
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "systolic" => self.systolic,
            "diastolic" => self.diastolic,
            "pulse" => self.pulse,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recorded_at: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub kg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub context: Option<MeasurementContext>,
}

impl SeriesRecord for WeightRecord {
    fn timestamp(&self) -> &str {
        &self.recorded_at
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "kg" | "weight" => self.kg,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeightRecord {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recorded_at: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cm: Option<f64>,
}

impl SeriesRecord for HeightRecord {
    fn timestamp(&self) -> &str {
        &self.recorded_at
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "cm" | "height" => self.cm,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlucoseRecord {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recorded_at: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub unit: Option<GlucoseUnit>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub context: Option<MeasurementContext>,
}

impl GlucoseRecord {
    /// Value normalised to mmol/L.
    pub fn mmol_l(&self) -> Option<f64> {
        let value = self.value?;
        Some(match self.unit.unwrap_or_default() {
            GlucoseUnit::MmolL => value,
            GlucoseUnit::MgDl => value / MG_DL_PER_MMOL_L,
        })
    }
}

impl SeriesRecord for GlucoseRecord {
    fn timestamp(&self) -> &str {
        &self.recorded_at
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "value" => self.value,
            "mmol_l" | "glucose" => self.mmol_l(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recorded_at: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub celsius: Option<f64>,
}

impl SeriesRecord for TemperatureRecord {
    fn timestamp(&self) -> &str {
        &self.recorded_at
    }

    fn numeric_field(&self, field: &str) -> Option<f64> {
        match field {
            "celsius" | "temperature" => self.celsius,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glucose_mg_dl_normalised() {
        let g = GlucoseRecord {
            recorded_at: "2026-02-01T07:00".into(),
            value: Some(90.0),
            unit: Some(GlucoseUnit::MgDl),
            ..Default::default()
        };
        assert_eq!(g.mmol_l(), Some(5.0));
        assert_eq!(g.numeric_field("value"), Some(90.0));
    }

    #[test]
    fn glucose_defaults_to_mmol() {
        let g: GlucoseRecord =
            serde_json::from_str(r#"{"recorded_at": "2026-02-01", "value": "6,1"}"#).unwrap();
        assert_eq!(g.mmol_l(), Some(6.1));
    }

    #[test]
    fn blood_pressure_fields() {
        let bp: BloodPressureRecord = serde_json::from_str(
            r#"{
                "recorded_at": "2026-02-01 08:10",
                "systolic": 142,
                "diastolic": "88",
                "context": "morning"
            }"#,
        )
        .unwrap();
        assert_eq!(bp.numeric_field("systolic"), Some(142.0));
        assert_eq!(bp.numeric_field("diastolic"), Some(88.0));
        assert_eq!(bp.numeric_field("pulse"), None);
        assert_eq!(bp.context, Some(MeasurementContext::Morning));
        assert!(bp.date().is_some());
    }

    #[test]
    fn height_aliases() {
        let h = HeightRecord {
            recorded_at: "2026-02-01".into(),
            cm: Some(131.5),
            ..Default::default()
        };
        assert_eq!(h.numeric_field("cm"), Some(131.5));
        assert_eq!(h.numeric_field("height"), Some(131.5));
    }
}
