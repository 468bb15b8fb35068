/// Title/detail text for safety signals.
/// Plain wording, no diagnosis: every detail points back to the value that fired
/// and to the care team.
pub struct SignalTemplates;

/// Up to two decimals, trailing zeros dropped.
pub fn format_value(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}

impl SignalTemplates {
    pub fn peritoneal_red_flag(cloudy: bool, fever: bool, pain: bool) -> (String, String) {
        let mut findings = Vec::new();
        if cloudy {
            findings.push("cloudy effluent");
        }
        if fever {
            findings.push("fever");
        }
        if pain {
            findings.push("abdominal pain");
        }
        (
            "Peritoneal red flag".to_string(),
            format!(
                "Your last exchange log notes {}. Contact your dialysis unit today; \
                 keep the drained bag if you can.",
                findings.join(" and "),
            ),
        )
    }

    pub fn access_red_flag() -> (String, String) {
        (
            "Vascular access red flag".to_string(),
            "Your last session log notes a problem at the access site. \
             Contact your dialysis unit before the next session."
                .to_string(),
        )
    }

    pub fn blood_pressure_very_high(
        systolic: Option<f64>,
        diastolic: Option<f64>,
    ) -> (String, String) {
        let reading = match (systolic, diastolic) {
            (Some(s), Some(d)) => format!("{}/{}", format_value(s), format_value(d)),
            (Some(s), None) => format_value(s),
            (None, Some(d)) => format!("?/{}", format_value(d)),
            (None, None) => "?".to_string(),
        };
        (
            "Blood pressure very high".to_string(),
            format!(
                "Latest reading {reading} mmHg. Rest and re-measure; if it stays this high \
                 or you have headache, chest pain or vision changes, seek urgent care."
            ),
        )
    }

    pub fn low_glucose(mmol_l: f64) -> (String, String) {
        (
            "Suspected low glucose".to_string(),
            format!(
                "Latest glucose {} mmol/L. Take fast-acting sugar and re-check in 15 minutes.",
                format_value(mmol_l),
            ),
        )
    }

    pub fn high_glucose(mmol_l: f64) -> (String, String) {
        (
            "High glucose".to_string(),
            format!(
                "Latest glucose {} mmol/L. Re-check, drink water if allowed, \
                 and follow your sick-day plan.",
                format_value(mmol_l),
            ),
        )
    }

    pub fn high_potassium(value: f64) -> (String, String) {
        (
            "High potassium".to_string(),
            format!(
                "Potassium {} mmol/L on your latest panel. Ask your care team \
                 whether it needs a repeat test.",
                format_value(value),
            ),
        )
    }

    pub fn low_sodium(value: f64) -> (String, String) {
        (
            "Low sodium".to_string(),
            format!(
                "Sodium {} mmol/L on your latest panel. Mention confusion, \
                 headache or nausea to your care team.",
                format_value(value),
            ),
        )
    }

    pub fn low_magnesium(value: f64) -> (String, String) {
        (
            "Low magnesium".to_string(),
            format!(
                "Magnesium {} mmol/L on your latest panel. Cramps or palpitations \
                 are worth reporting.",
                format_value(value),
            ),
        )
    }

    pub fn abnormal_calcium(value: f64) -> (String, String) {
        (
            "Abnormal calcium".to_string(),
            format!(
                "Calcium {} mmol/L is outside the usual range. \
                 Bring it up at your next appointment.",
                format_value(value),
            ),
        )
    }

    pub fn hydration_conflict() -> (String, String) {
        (
            "Hydration vs fluid restriction".to_string(),
            "Your stone program asks for high fluid intake while your dialysis plan \
             restricts fluid. The dialysis limit takes priority until your care team \
             agrees on a target."
                .to_string(),
        )
    }

    pub fn all_clear() -> (String, String) {
        (
            "No red flags".to_string(),
            "Nothing in your latest entries matches a warning rule.".to_string(),
        )
    }
}
