//! Daily task checklist for the active program.
//!
//! Catalogs are declarative: each task names a `(category, min_count)` rule.
//! One dispatch table maps a category to its same-day counter, so counting
//! logic lives in a single place. `done = manual_done || auto_done`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{HEIGHT_RECHECK_DAYS, TRANSITION_TRAINING_AGE};
use crate::error::EngineError;
use crate::models::{DialysisModality, KidneyTrack, Program, Snapshot, TaskCategory, TaskChecks};
use crate::parse::{date_key, parse_date_key};

use super::messages::format_value;
use super::programs::ensure_active_program_consistent;
use super::series::{count_on_date, count_on_date_matching, days_since_latest_before};

/// Auto-completion rule: at least `min_count` records of `category` today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoRule {
    pub category: TaskCategory,
    pub min_count: usize,
}

/// Form the UI opens when the task is tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "category", rename_all = "snake_case")]
pub enum TaskAction {
    LogVital(TaskCategory),
    LogMedication,
    LogDialysisSession,
    LogWater,
    LogSymptom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub meta: String,
    pub badge: String,
    /// Key of the help text shown behind the "why" button.
    pub explainer: String,
    pub action: Option<TaskAction>,
    pub rule: Option<AutoRule>,
    pub manual_done: bool,
    pub auto_done: bool,
    pub done: bool,
}

impl Task {
    fn new(program: Program, slug: &str, title: impl Into<String>) -> Self {
        Self {
            id: format!("{}.{slug}", program.as_str()),
            title: title.into(),
            meta: String::new(),
            badge: "Daily".to_string(),
            explainer: format!("{}_{slug}", program.as_str()),
            action: None,
            rule: None,
            manual_done: false,
            auto_done: false,
            done: false,
        }
    }

    fn meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = meta.into();
        self
    }

    fn badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = badge.into();
        self
    }

    fn action(mut self, action: TaskAction) -> Self {
        self.action = Some(action);
        self
    }

    fn auto(mut self, category: TaskCategory, min_count: usize) -> Self {
        self.rule = Some(AutoRule {
            category,
            min_count,
        });
        self
    }
}

// ---------------------------------------------------------------------------
// Same-day counting
// ---------------------------------------------------------------------------

type Counter = fn(&Snapshot, Program, &str) -> usize;

fn count_blood_pressure(s: &Snapshot, _: Program, day: &str) -> usize {
    count_on_date(&s.vitals.blood_pressure, day)
}

fn count_weight(s: &Snapshot, _: Program, day: &str) -> usize {
    count_on_date(&s.vitals.weight, day)
}

fn count_height(s: &Snapshot, _: Program, day: &str) -> usize {
    count_on_date(&s.vitals.height, day)
}

fn count_glucose(s: &Snapshot, _: Program, day: &str) -> usize {
    count_on_date(&s.vitals.glucose, day)
}

fn count_temperature(s: &Snapshot, _: Program, day: &str) -> usize {
    count_on_date(&s.vitals.temperature, day)
}

/// Adherence only counts doses logged under the current program.
fn count_medication(s: &Snapshot, program: Program, day: &str) -> usize {
    count_on_date_matching(&s.logs.medications, day, |m| m.program == Some(program))
}

fn count_dialysis_session(s: &Snapshot, _: Program, day: &str) -> usize {
    count_on_date(&s.logs.dialysis_sessions, day)
}

fn count_water_intake(s: &Snapshot, _: Program, day: &str) -> usize {
    count_on_date(&s.logs.water_intake, day)
}

fn count_symptom(s: &Snapshot, _: Program, day: &str) -> usize {
    count_on_date(&s.logs.symptoms, day)
}

fn counter_for(category: TaskCategory) -> Counter {
    match category {
        TaskCategory::BloodPressure => count_blood_pressure,
        TaskCategory::Weight => count_weight,
        TaskCategory::Height => count_height,
        TaskCategory::Glucose => count_glucose,
        TaskCategory::Temperature => count_temperature,
        TaskCategory::Medication => count_medication,
        TaskCategory::DialysisSession => count_dialysis_session,
        TaskCategory::WaterIntake => count_water_intake,
        TaskCategory::Symptom => count_symptom,
    }
}

/// Same-day record count for one category.
pub fn same_day_count(
    snapshot: &Snapshot,
    program: Program,
    category: TaskCategory,
    date_key: &str,
) -> usize {
    counter_for(category)(snapshot, program, date_key)
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

fn blood_pressure_task(program: Program, meta: &str) -> Task {
    Task::new(program, "bp", "Measure blood pressure")
        .meta(meta)
        .action(TaskAction::LogVital(TaskCategory::BloodPressure))
        .auto(TaskCategory::BloodPressure, 1)
}

fn weight_task(program: Program, meta: &str) -> Task {
    Task::new(program, "weight", "Weigh yourself")
        .meta(meta)
        .action(TaskAction::LogVital(TaskCategory::Weight))
        .auto(TaskCategory::Weight, 1)
}

fn medication_task(program: Program, title: &str, meta: &str) -> Task {
    Task::new(program, "meds", title)
        .meta(meta)
        .action(TaskAction::LogMedication)
        .auto(TaskCategory::Medication, 1)
}

fn symptom_task(program: Program, title: &str, meta: &str) -> Task {
    Task::new(program, "symptoms", title)
        .meta(meta)
        .action(TaskAction::LogSymptom)
        .auto(TaskCategory::Symptom, 1)
}

fn kidney_catalog(snapshot: &Snapshot) -> Vec<Task> {
    let p = Program::Kidney;
    let mut tasks = vec![
        blood_pressure_task(p, "Seated, after 5 minutes of rest"),
        weight_task(p, "Same scale, before breakfast"),
    ];
    match snapshot.settings.kidney.track {
        KidneyTrack::Ckd => {
            tasks.push(medication_task(
                p,
                "Take kidney medications",
                "Mark each dose as taken",
            ));
        }
        KidneyTrack::Transplant => {
            tasks.push(medication_task(
                p,
                "Take immunosuppressants",
                "Same hours every day",
            ));
            tasks.push(
                Task::new(p, "temperature", "Check temperature")
                    .meta("Fever can be an early sign of infection")
                    .action(TaskAction::LogVital(TaskCategory::Temperature))
                    .auto(TaskCategory::Temperature, 1),
            );
        }
    }
    tasks.push(symptom_task(
        p,
        "Symptom check",
        "Swelling, breathlessness, urine changes",
    ));
    tasks
}

fn hypertension_catalog(snapshot: &Snapshot) -> Vec<Task> {
    let p = Program::Hypertension;
    let settings = &snapshot.settings.hypertension;
    let target = match (settings.target_systolic, settings.target_diastolic) {
        (Some(s), Some(d)) => format!("Target below {}/{}", format_value(s), format_value(d)),
        _ => "Morning and evening".to_string(),
    };
    vec![
        Task::new(p, "bp", "Measure blood pressure twice")
            .meta(target)
            .badge("2× daily")
            .action(TaskAction::LogVital(TaskCategory::BloodPressure))
            .auto(TaskCategory::BloodPressure, 2),
        medication_task(p, "Take blood pressure medications", "Mark each dose as taken"),
        weight_task(p, "Same scale, before breakfast"),
    ]
}

fn diabetes_catalog(snapshot: &Snapshot) -> Vec<Task> {
    let p = Program::Diabetes;
    let (checks, meta) = if snapshot.settings.diabetes.uses_insulin {
        (4, "Before meals and at bedtime")
    } else {
        (2, "Fasting and after a meal")
    };
    vec![
        Task::new(p, "glucose", "Check blood glucose")
            .meta(meta)
            .badge(format!("{checks}× daily"))
            .action(TaskAction::LogVital(TaskCategory::Glucose))
            .auto(TaskCategory::Glucose, checks),
        medication_task(p, "Take diabetes medications", "Mark each dose as taken"),
        Task::new(p, "feet", "Check your feet").meta("Cuts, blisters, colour changes"),
    ]
}

fn dialysis_catalog(snapshot: &Snapshot, today: NaiveDate) -> Vec<Task> {
    let p = Program::Dialysis;
    let settings = &snapshot.settings.dialysis;
    let mut tasks = vec![
        blood_pressure_task(p, "Before and after the session if you have one"),
        weight_task(p, "Track weight gain between sessions"),
    ];

    let session_task = match settings.modality {
        DialysisModality::Peritoneal => Task::new(p, "exchanges", "Log today's exchanges")
            .meta("Effluent clarity and ultrafiltration volume")
            .action(TaskAction::LogDialysisSession)
            .auto(TaskCategory::DialysisSession, 1),
        DialysisModality::Hemodialysis if settings.is_session_day(today) => {
            Task::new(p, "session", "Log dialysis session")
                .meta("Pre/post weight and ultrafiltration volume")
                .badge("Session day")
                .action(TaskAction::LogDialysisSession)
                .auto(TaskCategory::DialysisSession, 1)
        }
        DialysisModality::Hemodialysis => {
            let meta = match settings.fluid_limit_ml {
                Some(ml) if settings.fluid_restricted => {
                    format!("Stay within {} ml today", format_value(ml))
                }
                _ => "Watch fluid and salt between sessions".to_string(),
            };
            Task::new(p, "fluids", "Log fluid intake")
                .meta(meta)
                .badge("Off day")
                .action(TaskAction::LogWater)
                .auto(TaskCategory::WaterIntake, 1)
        }
    };
    tasks.push(session_task);

    let access_meta = match settings.modality {
        DialysisModality::Hemodialysis => "Feel the thrill, look for redness or bleeding",
        DialysisModality::Peritoneal => "Exit site clean and dry, no redness",
    };
    tasks.push(Task::new(p, "access", "Access self-check").meta(access_meta));
    tasks
}

fn stone_catalog(snapshot: &Snapshot) -> Vec<Task> {
    let p = Program::Stone;
    let settings = &snapshot.settings.stone;
    let water = if settings.fluid_restricted {
        Task::new(p, "water", "Log water intake").meta("Fluid is restricted: record what you drink")
    } else {
        Task::new(
            p,
            "water",
            format!("Drink {} ml water", format_value(settings.target_ml_or_default())),
        )
        .meta("Spread over the day, aim for pale urine")
    };
    vec![
        water
            .action(TaskAction::LogWater)
            .auto(TaskCategory::WaterIntake, 1),
        symptom_task(p, "Log symptoms or events", "Pain, blood in urine, passed stone"),
    ]
}

fn pediatric_catalog(snapshot: &Snapshot, today: NaiveDate) -> Vec<Task> {
    let p = Program::Pediatric;
    let mut tasks = vec![
        blood_pressure_task(p, "Right arm, child-size cuff"),
        weight_task(p, "Light clothing, no shoes"),
    ];

    let height_due = days_since_latest_before(&snapshot.vitals.height, today)
        .map_or(true, |days| days >= HEIGHT_RECHECK_DAYS);
    if height_due {
        tasks.push(
            Task::new(p, "height", "Measure height")
                .meta("Against a wall, heels together")
                .badge("Monthly")
                .action(TaskAction::LogVital(TaskCategory::Height))
                .auto(TaskCategory::Height, 1),
        );
    }

    tasks.push(symptom_task(
        p,
        "Symptom check",
        "Energy, appetite, swelling, toilet habits",
    ));

    let age = snapshot.settings.pediatric.age_years(today);
    if age.is_some_and(|years| years >= TRANSITION_TRAINING_AGE) {
        tasks.push(
            Task::new(p, "transition", "Transition training")
                .meta("Name your medicines and doses without help")
                .badge("Teen"),
        );
    }
    tasks
}

/// Fresh catalog for a program, nothing marked done.
pub fn catalog(program: Program, snapshot: &Snapshot, today: NaiveDate) -> Vec<Task> {
    match program {
        Program::Kidney => kidney_catalog(snapshot),
        Program::Hypertension => hypertension_catalog(snapshot),
        Program::Diabetes => diabetes_catalog(snapshot),
        Program::Dialysis => dialysis_catalog(snapshot, today),
        Program::Stone => stone_catalog(snapshot),
        Program::Pediatric => pediatric_catalog(snapshot, today),
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Today's checklist for the active program with completion resolved.
/// The program comes from a repaired copy of the selection, so a snapshot
/// that skipped the load-time guard still gets an enabled program.
pub fn today_tasks(snapshot: &Snapshot, today: NaiveDate) -> Vec<Task> {
    let mut selection = snapshot.programs.clone();
    ensure_active_program_consistent(&mut selection);
    let program = selection.active;
    let day = date_key(today);
    let mut tasks = catalog(program, snapshot, today);

    let mut counts: BTreeMap<TaskCategory, usize> = BTreeMap::new();
    for rule in tasks.iter().filter_map(|t| t.rule) {
        counts
            .entry(rule.category)
            .or_insert_with(|| same_day_count(snapshot, program, rule.category, &day));
    }

    for task in &mut tasks {
        task.auto_done = task.rule.is_some_and(|rule| {
            counts.get(&rule.category).copied().unwrap_or(0) >= rule.min_count
        });
        task.manual_done = snapshot.task_checks.is_checked(&day, &task.id);
        task.done = task.manual_done || task.auto_done;
    }

    tracing::debug!(
        program = %program,
        day = %day,
        total = tasks.len(),
        done = tasks.iter().filter(|t| t.done).count(),
        "Daily tasks built"
    );
    tasks
}

/// Flip the manual mark of one task on one day. Returns the new mark.
pub fn toggle_manual_task(checks: &mut TaskChecks, day: NaiveDate, task_id: &str) -> bool {
    checks.toggle(&date_key(day), task_id)
}

/// String-keyed variant for callers that store `YYYY-MM-DD` keys.
pub fn toggle_manual_task_by_key(
    checks: &mut TaskChecks,
    day_key: &str,
    task_id: &str,
) -> Result<bool, EngineError> {
    let day = parse_date_key(day_key)?;
    Ok(toggle_manual_task(checks, day, task_id))
}
