// Statistics over workouts, exercises and sets
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::models::{Plan, Workout, WorkoutSet};

/// Sum of reps. Zero for no sets.
pub fn total_reps(sets: &[WorkoutSet]) -> u64 {
    sets.iter().map(|s| u64::from(s.reps)).sum()
}

/// Sum of `weight_kg * reps`. Zero for no sets.
pub fn volume(sets: &[WorkoutSet]) -> f64 {
    sets.iter().map(WorkoutSet::volume).sum()
}

/// Heaviest weight used, or 0 when there are no sets.
pub fn max_weight(sets: &[WorkoutSet]) -> f64 {
    sets.iter().map(|s| s.weight_kg).fold(0.0, f64::max)
}

pub fn workout_volume(workout: &Workout) -> f64 {
    workout.exercises.iter().map(|e| volume(&e.sets)).sum()
}

/// Per-workout summary shown in history and session views.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutStats {
    pub exercise_count: usize,
    pub total_sets: usize,
    pub total_reps: u64,
    /// Rounded to the nearest kilogram.
    pub total_volume: u64,
}

pub fn workout_stats(workout: &Workout) -> WorkoutStats {
    WorkoutStats {
        exercise_count: workout.exercises.len(),
        total_sets: workout.exercises.iter().map(|e| e.sets.len()).sum(),
        total_reps: workout.exercises.iter().map(|e| total_reps(&e.sets)).sum(),
        total_volume: workout_volume(workout).round() as u64,
    }
}

/// References to `workouts` ordered by date. Same-day workouts keep their input order.
fn chronological(workouts: &[Workout]) -> Vec<&Workout> {
    let mut sorted: Vec<&Workout> = workouts.iter().collect();
    sorted.sort_by_key(|w| w.date);
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPoint {
    pub date: NaiveDate,
    pub max_weight: f64,
    pub total_reps: u64,
    pub volume: f64,
    pub workout_id: Uuid,
}

/// Every occurrence of `exercise_name`, oldest first.
///
/// An exercise logged twice in one workout, or on two workouts sharing a
/// date, yields one point per occurrence in encounter order.
pub fn exercise_progression(workouts: &[Workout], exercise_name: &str) -> Vec<ProgressionPoint> {
    chronological(workouts)
        .into_iter()
        .flat_map(|w| {
            w.exercises
                .iter()
                .filter(|e| e.exercise_name == exercise_name)
                .map(move |e| ProgressionPoint {
                    date: w.date,
                    max_weight: max_weight(&e.sets),
                    total_reps: total_reps(&e.sets),
                    volume: volume(&e.sets),
                    workout_id: w.id,
                })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub plan: Plan,
    pub volume: f64,
    pub workout_id: Uuid,
}

/// One point per workout, oldest first. Empty workouts contribute a zero.
pub fn volume_progression(workouts: &[Workout]) -> Vec<VolumePoint> {
    chronological(workouts)
        .into_iter()
        .map(|w| VolumePoint {
            date: w.date,
            plan: w.plan,
            volume: workout_volume(w),
            workout_id: w.id,
        })
        .collect()
}

/// Distinct exercise names, sorted.
pub fn unique_exercise_names(workouts: &[Workout]) -> Vec<String> {
    workouts
        .iter()
        .flat_map(|w| w.exercises.iter())
        .map(|e| e.exercise_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// A best value and the date it was first reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub value: T,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub max_weight: Record<f64>,
    pub max_reps: Record<u64>,
    pub max_volume: Record<f64>,
}

pub type PersonalRecords = BTreeMap<String, ExerciseRecord>;

fn raise<T: PartialOrd>(record: &mut Record<T>, value: T, date: NaiveDate) {
    // Strictly greater: the first occurrence keeps a tied record.
    if value > record.value {
        *record = Record { value, date };
    }
}

/// Best weight, total reps and volume per exercise, tracked independently.
///
/// Workouts are visited in the order given; equal values never replace an
/// existing record.
pub fn personal_records(workouts: &[Workout]) -> PersonalRecords {
    let mut records = PersonalRecords::new();
    for w in workouts {
        for e in &w.exercises {
            let weight = max_weight(&e.sets);
            let reps = total_reps(&e.sets);
            let vol = volume(&e.sets);
            match records.get_mut(&e.exercise_name) {
                Some(r) => {
                    raise(&mut r.max_weight, weight, w.date);
                    raise(&mut r.max_reps, reps, w.date);
                    raise(&mut r.max_volume, vol, w.date);
                }
                None => {
                    records.insert(
                        e.exercise_name.clone(),
                        ExerciseRecord {
                            max_weight: Record { value: weight, date: w.date },
                            max_reps: Record { value: reps, date: w.date },
                            max_volume: Record { value: vol, date: w.date },
                        },
                    );
                }
            }
        }
    }
    records
}

/// Totals across a set of workouts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_workouts: usize,
    pub total_volume: f64,
    pub avg_volume: f64,
    pub total_exercises: usize,
    pub total_reps: u64,
}

pub fn aggregate_stats(workouts: &[Workout]) -> AggregateStats {
    if workouts.is_empty() {
        return AggregateStats::default();
    }
    log::debug!("Aggregating statistics for {} workouts", workouts.len());

    let total_workouts = workouts.len();
    let total_volume: f64 = workouts.iter().map(workout_volume).sum();
    let total_exercises = workouts.iter().map(|w| w.exercises.len()).sum();
    let total_reps = workouts
        .iter()
        .flat_map(|w| w.exercises.iter())
        .map(|e| total_reps(&e.sets))
        .sum();

    AggregateStats {
        total_workouts,
        total_volume,
        avg_volume: total_volume / total_workouts as f64,
        total_exercises,
        total_reps,
    }
}

/// Newest first; same-day workouts ordered by newest `created_at`.
fn newest_first(workouts: &[Workout]) -> Vec<Workout> {
    let mut sorted = workouts.to_vec();
    sorted.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    sorted
}

/// Workouts optionally restricted to one plan, newest first.
pub fn workout_history(workouts: &[Workout], plan: Option<Plan>) -> Vec<Workout> {
    let filtered: Vec<Workout> = workouts
        .iter()
        .filter(|w| plan.map_or(true, |p| w.plan == p))
        .cloned()
        .collect();
    newest_first(&filtered)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_workouts: usize,
    pub plan_a_count: usize,
    pub plan_b_count: usize,
    pub total_volume: f64,
    pub recent: Vec<Workout>,
}

/// Headline numbers plus the `recent` newest workouts.
pub fn dashboard_summary(workouts: &[Workout], recent: usize) -> DashboardSummary {
    let mut latest = newest_first(workouts);
    latest.truncate(recent);
    DashboardSummary {
        total_workouts: workouts.len(),
        plan_a_count: workouts.iter().filter(|w| w.plan == Plan::A).count(),
        plan_b_count: workouts.iter().filter(|w| w.plan == Plan::B).count(),
        total_volume: workouts.iter().map(workout_volume).sum(),
        recent: latest,
    }
}
