pub mod enums;
pub mod lab;
pub mod log;
pub mod program;
pub mod record;
pub mod snapshot;
pub mod vital_sign;

pub use enums::*;
pub use lab::LabPanel;
pub use log::{DialysisSession, MedicationLog, SymptomLog, WaterIntake};
pub use program::*;
pub use record::SeriesRecord;
pub use snapshot::{Logs, Preferences, Snapshot, TaskChecks, Vitals};
pub use vital_sign::{
    BloodPressureRecord, GlucoseRecord, HeightRecord, TemperatureRecord, WeightRecord,
};
