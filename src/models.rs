//! Core records: users, workouts, exercises, sets and templates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::ValidationError;

pub type UserId = String;
pub type TemplateId = String;

/// One of the two alternating muscle-group splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Plan {
    /// Chest, shoulders, triceps and back.
    A,
    /// Arms and legs.
    B,
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plan::A => write!(f, "A"),
            Plan::B => write!(f, "B"),
        }
    }
}

impl std::str::FromStr for Plan {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Plan::A),
            "B" | "b" => Ok(Plan::B),
            other => Err(format!("Unknown plan: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// A single rest-pause mini-set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub set_number: u32,
    pub weight_kg: f64,
    pub reps: u32,
    pub created_at: DateTime<Utc>,
}

impl WorkoutSet {
    pub fn volume(&self) -> f64 {
        self.weight_kg * self.reps as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub muscle_group: String,
    pub exercise_name: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

impl Exercise {
    /// Reassign `set_number` so the sets read `1..=len` in their current order.
    pub(crate) fn renumber_sets(&mut self) {
        for (idx, set) in self.sets.iter_mut().enumerate() {
            set.set_number = idx as u32 + 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub plan: Plan,
    #[serde(default)]
    pub template: Option<TemplateId>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub created_at: DateTime<Utc>,
}

impl Workout {
    pub fn exercise(&self, exercise_id: Uuid) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }

    pub(crate) fn exercise_mut(&mut self, exercise_id: Uuid) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| e.id == exercise_id)
    }
}

/// The durable aggregate: every user, every workout and the active user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub users: BTreeMap<UserId, User>,
    pub workouts: Vec<Workout>,
    #[serde(rename = "currentUser")]
    pub current_user: UserId,
}

impl Default for Store {
    fn default() -> Self {
        let users = [("chris", "Chris"), ("denis", "Denis")]
            .into_iter()
            .map(|(id, name)| {
                (
                    id.to_string(),
                    User {
                        id: id.to_string(),
                        name: name.to_string(),
                    },
                )
            })
            .collect();
        Self {
            users,
            workouts: Vec::new(),
            current_user: "chris".into(),
        }
    }
}

impl Store {
    /// Workouts owned by `user_id`, in storage order.
    pub fn workouts_for(&self, user_id: &str) -> Vec<Workout> {
        self.workouts
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Resolve a user column value (display name or id) to a user id.
    pub fn resolve_user(&self, name_or_id: &str) -> Option<&User> {
        let needle = name_or_id.trim();
        self.users.get(needle).or_else(|| {
            self.users
                .values()
                .find(|u| same_name(&u.name, needle) || same_name(&u.id, needle))
        })
    }

    pub fn display_name(&self, user_id: &str) -> String {
        self.users
            .get(user_id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| user_id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub muscle_group: String,
    pub exercise_name: String,
    pub technique: String,
    pub target_reps: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub plan: Plan,
    pub exercises: Vec<TemplateExercise>,
}

// ---------------------------------------------------------------------------
// Inputs accepted by the store. Each one is validated before any mutation.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub plan: Plan,
    #[serde(default)]
    pub template: Option<TemplateId>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewWorkout {
    pub fn new(user_id: impl Into<UserId>, date: NaiveDate, plan: Plan) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            plan,
            template: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSet {
    pub weight_kg: f64,
    pub reps: u32,
}

impl NewSet {
    pub fn new(weight_kg: f64, reps: u32) -> Self {
        Self { weight_kg, reps }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_weight(self.weight_kg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub muscle_group: String,
    pub exercise_name: String,
    #[serde(default)]
    pub sets: Vec<NewSet>,
}

impl NewExercise {
    pub fn new(muscle_group: impl Into<String>, exercise_name: impl Into<String>) -> Self {
        Self {
            muscle_group: muscle_group.into(),
            exercise_name: exercise_name.into(),
            sets: Vec::new(),
        }
    }

    pub fn with_sets(mut self, sets: impl IntoIterator<Item = NewSet>) -> Self {
        self.sets.extend(sets);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_names(&self.muscle_group, &self.exercise_name)?;
        self.sets.iter().try_for_each(NewSet::validate)
    }

    /// Build the stored exercise with dense set numbers starting at 1.
    pub(crate) fn into_exercise(self, now: DateTime<Utc>) -> Exercise {
        let sets = self
            .sets
            .into_iter()
            .enumerate()
            .map(|(idx, s)| WorkoutSet {
                set_number: idx as u32 + 1,
                weight_kg: s.weight_kg,
                reps: s.reps,
                created_at: now,
            })
            .collect();
        Exercise {
            id: Uuid::new_v4(),
            muscle_group: self.muscle_group.trim().to_string(),
            exercise_name: self.exercise_name.trim().to_string(),
            sets,
        }
    }
}

/// Partial workout update. `user_id` is deliberately absent: ownership never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutUpdate {
    pub date: Option<NaiveDate>,
    pub plan: Option<Plan>,
    pub template: Option<Option<TemplateId>>,
    pub notes: Option<Option<String>>,
}

impl WorkoutUpdate {
    pub(crate) fn apply(self, workout: &mut Workout) {
        if let Some(date) = self.date {
            workout.date = date;
        }
        if let Some(plan) = self.plan {
            workout.plan = plan;
        }
        if let Some(template) = self.template {
            workout.template = template;
        }
        if let Some(notes) = self.notes {
            workout.notes = notes;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseUpdate {
    pub muscle_group: Option<String>,
    pub exercise_name: Option<String>,
}

impl ExerciseUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(group) = &self.muscle_group {
            if group.trim().is_empty() {
                return Err(ValidationError::EmptyMuscleGroup);
            }
        }
        if let Some(name) = &self.exercise_name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyExerciseName);
            }
        }
        Ok(())
    }

    pub(crate) fn apply(self, exercise: &mut Exercise) {
        if let Some(group) = self.muscle_group {
            exercise.muscle_group = group.trim().to_string();
        }
        if let Some(name) = self.exercise_name {
            exercise.exercise_name = name.trim().to_string();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetUpdate {
    pub weight_kg: Option<f64>,
    pub reps: Option<u32>,
}

impl SetUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.weight_kg {
            Some(w) => validate_weight(w),
            None => Ok(()),
        }
    }

    pub(crate) fn apply(self, set: &mut WorkoutSet) {
        if let Some(weight) = self.weight_kg {
            set.weight_kg = weight;
        }
        if let Some(reps) = self.reps {
            set.reps = reps;
        }
    }
}

/// Unicode case-insensitive name comparison, ignoring surrounding whitespace.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

pub(crate) fn validate_names(
    muscle_group: &str,
    exercise_name: &str,
) -> Result<(), ValidationError> {
    if muscle_group.trim().is_empty() {
        return Err(ValidationError::EmptyMuscleGroup);
    }
    if exercise_name.trim().is_empty() {
        return Err(ValidationError::EmptyExerciseName);
    }
    Ok(())
}

fn validate_weight(weight_kg: f64) -> Result<(), ValidationError> {
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(ValidationError::InvalidWeight(weight_kg));
    }
    Ok(())
}
