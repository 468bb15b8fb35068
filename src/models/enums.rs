use crate::error::EngineError;

/// Macro to generate a closed key enum with as_str + FromStr + string serde.
/// Variant order is significant: it drives `Ord` and `ALL`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(EngineError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// Declaration order is the activation preference order.
str_enum!(Program {
    Kidney => "kidney",
    Hypertension => "hypertension",
    Diabetes => "diabetes",
    Dialysis => "dialysis",
    Stone => "stone",
    Pediatric => "pediatric",
});

impl Default for Program {
    fn default() -> Self {
        Self::Kidney
    }
}

str_enum!(Comorbidity {
    Hypertension => "hypertension",
    HeartFailure => "heart_failure",
    Diabetes => "diabetes",
    CoronaryDisease => "coronary_disease",
    Gout => "gout",
});

str_enum!(DietTag {
    LowSodium => "low_sodium",
    LowPotassium => "low_potassium",
    LowPhosphate => "low_phosphate",
    LowSugar => "low_sugar",
    FluidLimit => "fluid_limit",
    BoneMineral => "calcium_bone",
    FoodSafety => "food_safety",
    DrugFoodInteraction => "drug_food_interaction",
});

str_enum!(SignalLevel {
    Danger => "danger",
    Info => "info",
    Ok => "ok",
});

str_enum!(SignalKind {
    PeritonealRedFlag => "peritoneal_red_flag",
    AccessRedFlag => "access_red_flag",
    BloodPressureVeryHigh => "bp_very_high",
    LowGlucose => "low_glucose",
    HighGlucose => "high_glucose",
    HighPotassium => "high_potassium",
    LowSodium => "low_sodium",
    LowMagnesium => "low_magnesium",
    AbnormalCalcium => "abnormal_calcium",
    HydrationConflict => "hydration_conflict",
    AllClear => "all_clear",
});

str_enum!(GlucoseUnit {
    MmolL => "mmol_l",
    MgDl => "mg_dl",
});

impl Default for GlucoseUnit {
    fn default() -> Self {
        Self::MmolL
    }
}

str_enum!(CreatinineUnit {
    UmolL => "umol_l",
    MgDl => "mg_dl",
});

impl Default for CreatinineUnit {
    fn default() -> Self {
        Self::UmolL
    }
}

str_enum!(MeasurementContext {
    Fasting => "fasting",
    PostMeal => "post_meal",
    Morning => "morning",
    Evening => "evening",
    Other => "other",
});

str_enum!(KidneyTrack {
    Ckd => "ckd",
    Transplant => "transplant",
});

impl Default for KidneyTrack {
    fn default() -> Self {
        Self::Ckd
    }
}

str_enum!(DialysisModality {
    Hemodialysis => "hemodialysis",
    Peritoneal => "peritoneal",
});

impl Default for DialysisModality {
    fn default() -> Self {
        Self::Hemodialysis
    }
}

str_enum!(ScheduleDay {
    Mon => "mon",
    Tue => "tue",
    Wed => "wed",
    Thu => "thu",
    Fri => "fri",
    Sat => "sat",
    Sun => "sun",
});

impl ScheduleDay {
    pub fn from_weekday(day: chrono::Weekday) -> Self {
        use chrono::Weekday;
        match day {
            Weekday::Mon => Self::Mon,
            Weekday::Tue => Self::Tue,
            Weekday::Wed => Self::Wed,
            Weekday::Thu => Self::Thu,
            Weekday::Fri => Self::Fri,
            Weekday::Sat => Self::Sat,
            Weekday::Sun => Self::Sun,
        }
    }
}

str_enum!(TaskCategory {
    BloodPressure => "blood_pressure",
    Weight => "weight",
    Height => "height",
    Glucose => "glucose",
    Temperature => "temperature",
    Medication => "medication",
    DialysisSession => "dialysis_session",
    WaterIntake => "water_intake",
    Symptom => "symptom",
});

str_enum!(HistoryFilter {
    Week => "7d",
    Month => "30d",
    Quarter => "90d",
    Year => "365d",
    All => "all",
});

impl HistoryFilter {
    /// Window length in days, `None` for the unbounded filter.
    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Quarter => Some(90),
            Self::Year => Some(365),
            Self::All => None,
        }
    }
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self::Month
    }
}
