//! Dietary focus tags from comorbidities, the latest panel and program settings.
//!
//! Each rule appends independently; the result is deduplicated keeping the
//! first occurrence. An empty list means no notable focus.

use std::collections::HashSet;

use crate::config::{
    CALCIUM_DIET_HIGH, CALCIUM_DIET_LOW, GLUCOSE_DIET_FOCUS, HBA1C_DIET_FOCUS, PHOSPHATE_HIGH,
    POTASSIUM_HIGH,
};
use crate::models::{
    Comorbidity, DietTag, KidneyTrack, LabPanel, Program, ProgramSelection, ProgramSettings,
    Snapshot,
};

use super::series::latest;

/// Diet tags for a snapshot.
pub fn diet_signals(snapshot: &Snapshot) -> Vec<DietTag> {
    derive_diet_tags(
        &snapshot.comorbidities,
        latest(&snapshot.labs),
        &snapshot.programs,
        &snapshot.settings,
    )
}

/// Program settings only count for programs that are enabled.
pub fn derive_diet_tags(
    comorbidities: &[Comorbidity],
    lab: Option<&LabPanel>,
    programs: &ProgramSelection,
    settings: &ProgramSettings,
) -> Vec<DietTag> {
    let has = |c: Comorbidity| comorbidities.contains(&c);
    let mut tags = Vec::new();

    if has(Comorbidity::Hypertension) || has(Comorbidity::HeartFailure) {
        tags.push(DietTag::LowSodium);
    }

    let dialysis_restricted =
        programs.is_enabled(Program::Dialysis) && settings.dialysis.fluid_restricted;
    let stone_restricted = programs.is_enabled(Program::Stone) && settings.stone.fluid_restricted;
    if has(Comorbidity::HeartFailure) || dialysis_restricted || stone_restricted {
        tags.push(DietTag::FluidLimit);
    }

    let glucose_high = lab.and_then(|l| l.glucose).is_some_and(|v| v >= GLUCOSE_DIET_FOCUS);
    let hba1c_high = lab.and_then(|l| l.hba1c).is_some_and(|v| v >= HBA1C_DIET_FOCUS);
    if has(Comorbidity::Diabetes) || glucose_high || hba1c_high {
        tags.push(DietTag::LowSugar);
    }

    if lab.and_then(|l| l.potassium).is_some_and(|v| v >= POTASSIUM_HIGH) {
        tags.push(DietTag::LowPotassium);
    }

    let phosphate_high = lab.and_then(|l| l.phosphate).is_some_and(|v| v >= PHOSPHATE_HIGH);
    if phosphate_high {
        tags.push(DietTag::LowPhosphate);
    }

    let calcium_abnormal = lab
        .and_then(|l| l.calcium)
        .is_some_and(|v| !(CALCIUM_DIET_LOW..=CALCIUM_DIET_HIGH).contains(&v));
    if calcium_abnormal || phosphate_high {
        tags.push(DietTag::BoneMineral);
    }

    if programs.is_enabled(Program::Kidney) && settings.kidney.track == KidneyTrack::Transplant {
        tags.push(DietTag::FoodSafety);
        tags.push(DietTag::DrugFoodInteraction);
    }

    dedup_first_seen(&mut tags);
    tags
}

/// Remove repeated tags, keeping the first occurrence in place.
pub fn dedup_first_seen(tags: &mut Vec<DietTag>) {
    let mut seen = HashSet::new();
    tags.retain(|tag| seen.insert(*tag));
}
