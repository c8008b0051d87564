//! CSV import with merge strategies, and JSON backup restore.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{BackupError, ImportError};
use crate::models::{NewExercise, NewSet, Plan, Store, User, UserId, Workout};
use crate::storage::BlobStore;
use crate::store::WorkoutStore;

const FIELD_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Drop every existing workout and install the imported ones.
    Replace,
    /// Append everything, duplicates included.
    Merge,
    /// Append only workouts whose (date, user, plan) is not already present.
    #[default]
    Smart,
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MergeStrategy::Replace => "replace",
            MergeStrategy::Merge => "merge",
            MergeStrategy::Smart => "smart",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for MergeStrategy {
    type Err = ImportError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(MergeStrategy::Replace),
            "merge" => Ok(MergeStrategy::Merge),
            "smart" => Ok(MergeStrategy::Smart),
            _ => Err(ImportError::UnknownStrategy(s.to_string())),
        }
    }
}

/// A workout rebuilt from CSV rows, before it is tied to a stored user.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedWorkout {
    pub date: NaiveDate,
    /// The user column as written, usually a display name.
    pub user: String,
    pub plan: Plan,
    pub notes: Option<String>,
    pub exercises: Vec<NewExercise>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub replaced: usize,
    pub total: usize,
}

struct Row {
    date: NaiveDate,
    user: String,
    plan: Plan,
    muscle_group: String,
    exercise_name: String,
    set: NewSet,
    notes: String,
}

fn parse_row(record: &csv::StringRecord) -> Result<Row, String> {
    if record.len() < FIELD_COUNT {
        return Err(format!("expected {FIELD_COUNT} fields, found {}", record.len()));
    }
    let field = |idx: usize| record.get(idx).unwrap_or("").trim();

    let date = NaiveDate::parse_from_str(field(0), "%Y-%m-%d")
        .map_err(|e| format!("bad date {:?}: {e}", field(0)))?;
    let plan = field(2).parse::<Plan>()?;
    let weight_kg = field(6)
        .parse::<f64>()
        .map_err(|e| format!("bad weight {:?}: {e}", field(6)))?;
    let reps = field(7)
        .parse::<u32>()
        .map_err(|e| format!("bad reps {:?}: {e}", field(7)))?;
    let set = NewSet::new(weight_kg, reps);
    set.validate().map_err(|e| e.to_string())?;

    let (user, muscle_group, exercise_name) = (field(1), field(3), field(4));
    if user.is_empty() {
        return Err("empty user".into());
    }
    if muscle_group.is_empty() || exercise_name.is_empty() {
        return Err("empty muscle group or exercise".into());
    }

    Ok(Row {
        date,
        user: user.to_string(),
        plan,
        muscle_group: muscle_group.to_string(),
        exercise_name: exercise_name.to_string(),
        set,
        notes: record.get(8).unwrap_or("").to_string(),
    })
}

/// Parse exported CSV back into workouts.
///
/// Rows are grouped into workouts by (date, user, plan) and into exercises by
/// (muscle group, exercise name), keeping first-seen order. Sets keep file
/// order. Malformed rows are skipped with a warning.
pub fn parse_csv(text: &str) -> Result<Vec<ParsedWorkout>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut workouts: Vec<ParsedWorkout> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = match parse_row(&record) {
            Ok(row) => row,
            Err(reason) => {
                log::warn!("Skipping CSV line {line}: {reason}");
                continue;
            }
        };

        let idx = match workouts
            .iter()
            .position(|w| w.date == row.date && w.user == row.user && w.plan == row.plan)
        {
            Some(idx) => idx,
            None => {
                workouts.push(ParsedWorkout {
                    date: row.date,
                    user: row.user,
                    plan: row.plan,
                    notes: (!row.notes.is_empty()).then_some(row.notes),
                    exercises: Vec::new(),
                });
                workouts.len() - 1
            }
        };
        let workout = &mut workouts[idx];

        match workout
            .exercises
            .iter_mut()
            .find(|e| e.muscle_group == row.muscle_group && e.exercise_name == row.exercise_name)
        {
            Some(exercise) => exercise.sets.push(row.set),
            None => workout
                .exercises
                .push(NewExercise::new(row.muscle_group, row.exercise_name).with_sets([row.set])),
        }
    }
    log::info!("Parsed {} workouts from CSV", workouts.len());
    Ok(workouts)
}

/// Map a user column value to a user id, registering unknown users.
fn resolve_or_register(store: &mut Store, name: &str) -> UserId {
    if let Some(user) = store.resolve_user(name) {
        return user.id.clone();
    }
    let id = name.trim().to_lowercase();
    log::info!("Registering user {id} from import");
    store.users.insert(
        id.clone(),
        User {
            id: id.clone(),
            name: name.trim().to_string(),
        },
    );
    id
}

fn install(
    store: &mut Store,
    parsed: Vec<ParsedWorkout>,
    strategy: MergeStrategy,
) -> ImportSummary {
    let total = parsed.len();
    let mut summary = ImportSummary {
        total,
        ..Default::default()
    };
    if strategy == MergeStrategy::Replace {
        summary.replaced = store.workouts.len();
        store.workouts.clear();
    }

    let mut seen: HashSet<(NaiveDate, UserId, Plan)> = store
        .workouts
        .iter()
        .map(|w| (w.date, w.user_id.clone(), w.plan))
        .collect();

    let now = Utc::now();
    for p in parsed {
        let user_id = resolve_or_register(store, &p.user);
        let key = (p.date, user_id.clone(), p.plan);
        if strategy == MergeStrategy::Smart && seen.contains(&key) {
            summary.skipped += 1;
            continue;
        }
        seen.insert(key);
        store.workouts.push(Workout {
            id: Uuid::new_v4(),
            user_id,
            date: p.date,
            plan: p.plan,
            template: None,
            notes: p.notes,
            exercises: p.exercises.into_iter().map(|e| e.into_exercise(now)).collect(),
            created_at: now,
        });
        summary.imported += 1;
    }
    summary
}

/// Import CSV text into `store` using `strategy`.
///
/// The store is written once, after all rows are processed. When nothing
/// parses, the store is left untouched.
pub fn import_csv<B: BlobStore>(
    store: &mut WorkoutStore<B>,
    text: &str,
    strategy: MergeStrategy,
) -> Result<ImportSummary, ImportError> {
    let parsed = parse_csv(text)?;
    if parsed.is_empty() {
        log::warn!("CSV contained no importable rows");
        return Ok(ImportSummary::default());
    }
    let mut next = store.snapshot().clone();
    let summary = install(&mut next, parsed, strategy);
    store.replace_all(next)?;
    log::info!(
        "Imported {} workouts ({strategy}): {} skipped, {} replaced, {} parsed",
        summary.imported,
        summary.skipped,
        summary.replaced,
        summary.total
    );
    Ok(summary)
}

/// Replace the whole store with a JSON backup.
///
/// The backup must be an object with `users` and `workouts`; anything else is
/// refused before the store is touched. Unknown keys are ignored.
pub fn restore_backup<B: BlobStore>(
    store: &mut WorkoutStore<B>,
    json: &str,
) -> Result<(), BackupError> {
    let data = parse_backup(json).inspect_err(|e| log::warn!("Rejected backup: {e}"))?;
    store.replace_all(data)?;
    log::info!("Restored backup with {} workouts", store.snapshot().workouts.len());
    Ok(())
}

fn parse_backup(json: &str) -> Result<Store, BackupError> {
    let mut value: serde_json::Value = serde_json::from_str(json).map_err(BackupError::Malformed)?;
    for key in ["users", "workouts"] {
        if value.get(key).is_none() {
            return Err(BackupError::MissingKey(key));
        }
    }
    if let Some(obj) = value.as_object_mut() {
        obj.entry("currentUser")
            .or_insert_with(|| Store::default().current_user.into());
    }
    serde_json::from_value(value).map_err(BackupError::Structure)
}
