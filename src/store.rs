//! The workout data store.
//!
//! Every mutation works on a copy of the in-memory state, writes that copy to
//! the blob medium, and only then swaps it in. A failed save therefore leaves
//! both the durable blob and the in-memory view exactly as they were.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Catalog, CatalogExercise, NewCatalogExercise};
use crate::error::StoreError;
use crate::models::{
    Exercise, ExerciseUpdate, NewExercise, NewSet, NewWorkout, Plan, SetUpdate, Store, Template,
    User, Workout, WorkoutSet, WorkoutUpdate,
};
use crate::storage::BlobStore;

pub const STORAGE_KEY: &str = "workout_data";
pub const CUSTOM_EXERCISES_KEY: &str = "custom_exercises";
pub const CUSTOM_TEMPLATES_KEY: &str = "custom_templates";

/// Warning threshold used by [`WorkoutStore::is_near_limit`] unless configured otherwise.
pub const DEFAULT_WARN_THRESHOLD_MB: f64 = 8.0;

/// Most recent use of an exercise together with its parent workout's context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseOccurrence {
    pub workout_id: Uuid,
    pub date: NaiveDate,
    pub plan: Plan,
    pub notes: Option<String>,
    pub exercise: Exercise,
}

pub struct WorkoutStore<B: BlobStore> {
    blobs: B,
    data: Store,
    catalog: Catalog,
    warn_threshold_mb: f64,
}

impl<B: BlobStore> WorkoutStore<B> {
    /// Load the store from `blobs`, initializing and persisting defaults when empty.
    pub fn open(mut blobs: B) -> Result<Self, StoreError> {
        let data = match blobs.load(STORAGE_KEY)? {
            Some(raw) => match serde_json::from_str::<Store>(&raw) {
                Ok(data) => {
                    log::info!(
                        "Loaded {} workouts for {} users",
                        data.workouts.len(),
                        data.users.len()
                    );
                    data
                }
                Err(e) => {
                    log::error!("Stored workout data is unreadable, using defaults: {e}");
                    Store::default()
                }
            },
            None => {
                log::info!("No workout data found, initializing default store");
                let data = Store::default();
                blobs.save(STORAGE_KEY, &serde_json::to_string(&data)?)?;
                data
            }
        };
        let catalog = load_catalog(&blobs);
        Ok(Self {
            blobs,
            data,
            catalog,
            warn_threshold_mb: DEFAULT_WARN_THRESHOLD_MB,
        })
    }

    pub fn with_warn_threshold(mut self, megabytes: f64) -> Self {
        self.warn_threshold_mb = megabytes;
        self
    }

    /// Read-only view of the whole store.
    pub fn snapshot(&self) -> &Store {
        &self.data
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Persist `next` and adopt it. Nothing changes if the save fails.
    fn commit(&mut self, next: Store) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&next)?;
        if let Err(e) = self.blobs.save(STORAGE_KEY, &raw) {
            log::error!("Failed to save workout data: {e}");
            return Err(e.into());
        }
        self.data = next;
        Ok(())
    }

    /// Replace the whole store, e.g. when restoring a backup.
    pub fn replace_all(&mut self, data: Store) -> Result<(), StoreError> {
        self.commit(data)
    }

    /// Restore the default two-user store. Custom catalog entries are kept.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.commit(Store::default())
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn get_user(&self, id: &str) -> Option<&User> {
        self.data.users.get(id)
    }

    pub fn current_user(&self) -> &str {
        &self.data.current_user
    }

    pub fn set_current_user(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.data.users.contains_key(id) {
            return Err(StoreError::UnknownUser(id.to_string()));
        }
        let mut next = self.data.clone();
        next.current_user = id.to_string();
        self.commit(next)
    }

    // -----------------------------------------------------------------------
    // Workouts
    // -----------------------------------------------------------------------

    pub fn list_workouts(&self, user_id: &str) -> Vec<Workout> {
        self.data.workouts_for(user_id)
    }

    pub fn get_workout(&self, id: Uuid) -> Option<&Workout> {
        self.data.workouts.iter().find(|w| w.id == id)
    }

    pub fn create_workout(&mut self, input: NewWorkout) -> Result<Workout, StoreError> {
        input.validate()?;
        if !self.data.users.contains_key(&input.user_id) {
            return Err(StoreError::UnknownUser(input.user_id));
        }
        let workout = Workout {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            date: input.date,
            plan: input.plan,
            template: input.template,
            notes: input.notes,
            exercises: Vec::new(),
            created_at: Utc::now(),
        };
        let mut next = self.data.clone();
        next.workouts.push(workout.clone());
        self.commit(next)?;
        log::info!("Created workout {} for {}", workout.id, workout.user_id);
        Ok(workout)
    }

    /// Apply `f` to the workout with `id` in a copy of the store and commit it.
    fn mutate_workout<T>(
        &mut self,
        id: Uuid,
        f: impl FnOnce(&mut Workout) -> Option<T>,
    ) -> Result<Option<T>, StoreError> {
        let mut next = self.data.clone();
        let Some(workout) = next.workouts.iter_mut().find(|w| w.id == id) else {
            return Ok(None);
        };
        let Some(out) = f(workout) else {
            return Ok(None);
        };
        self.commit(next)?;
        Ok(Some(out))
    }

    pub fn update_workout(
        &mut self,
        id: Uuid,
        update: WorkoutUpdate,
    ) -> Result<Option<Workout>, StoreError> {
        self.mutate_workout(id, |w| {
            update.apply(w);
            Some(w.clone())
        })
    }

    /// Returns `false` when no workout has that id.
    pub fn delete_workout(&mut self, id: Uuid) -> Result<bool, StoreError> {
        if self.get_workout(id).is_none() {
            return Ok(false);
        }
        let mut next = self.data.clone();
        next.workouts.retain(|w| w.id != id);
        self.commit(next)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Exercises
    // -----------------------------------------------------------------------

    pub fn add_exercise(
        &mut self,
        workout_id: Uuid,
        input: NewExercise,
    ) -> Result<Option<Exercise>, StoreError> {
        input.validate()?;
        let exercise = input.into_exercise(Utc::now());
        self.mutate_workout(workout_id, |w| {
            w.exercises.push(exercise.clone());
            Some(exercise)
        })
    }

    pub fn update_exercise(
        &mut self,
        workout_id: Uuid,
        exercise_id: Uuid,
        update: ExerciseUpdate,
    ) -> Result<Option<Exercise>, StoreError> {
        update.validate()?;
        self.mutate_workout(workout_id, |w| {
            let exercise = w.exercise_mut(exercise_id)?;
            update.apply(exercise);
            Some(exercise.clone())
        })
    }

    pub fn delete_exercise(
        &mut self,
        workout_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<bool, StoreError> {
        let removed = self.mutate_workout(workout_id, |w| {
            let before = w.exercises.len();
            w.exercises.retain(|e| e.id != exercise_id);
            (w.exercises.len() < before).then_some(())
        })?;
        Ok(removed.is_some())
    }

    // -----------------------------------------------------------------------
    // Sets
    // -----------------------------------------------------------------------

    /// Append a set numbered `current count + 1`.
    pub fn add_set(
        &mut self,
        workout_id: Uuid,
        exercise_id: Uuid,
        input: NewSet,
    ) -> Result<Option<WorkoutSet>, StoreError> {
        input.validate()?;
        self.mutate_workout(workout_id, |w| {
            let exercise = w.exercise_mut(exercise_id)?;
            let set = WorkoutSet {
                set_number: exercise.sets.len() as u32 + 1,
                weight_kg: input.weight_kg,
                reps: input.reps,
                created_at: Utc::now(),
            };
            exercise.sets.push(set.clone());
            Some(set)
        })
    }

    /// Update the set at zero-based `set_index`.
    pub fn update_set(
        &mut self,
        workout_id: Uuid,
        exercise_id: Uuid,
        set_index: usize,
        update: SetUpdate,
    ) -> Result<Option<WorkoutSet>, StoreError> {
        update.validate()?;
        self.mutate_workout(workout_id, |w| {
            let set = w.exercise_mut(exercise_id)?.sets.get_mut(set_index)?;
            update.apply(set);
            Some(set.clone())
        })
    }

    /// Remove the set at zero-based `set_index` and renumber the rest from 1.
    pub fn delete_set(
        &mut self,
        workout_id: Uuid,
        exercise_id: Uuid,
        set_index: usize,
    ) -> Result<bool, StoreError> {
        let removed = self.mutate_workout(workout_id, |w| {
            let exercise = w.exercise_mut(exercise_id)?;
            if set_index >= exercise.sets.len() {
                return None;
            }
            exercise.sets.remove(set_index);
            exercise.renumber_sets();
            Some(())
        })?;
        Ok(removed.is_some())
    }

    // -----------------------------------------------------------------------
    // History lookups
    // -----------------------------------------------------------------------

    /// Latest workout for `(user_id, plan)` by date; equal dates go to the newest `created_at`.
    pub fn last_workout_for_plan(&self, user_id: &str, plan: Plan) -> Option<&Workout> {
        self.data
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id && w.plan == plan)
            .max_by(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then_with(|| a.created_at.cmp(&b.created_at))
            })
    }

    /// Most recent exercise entry named `exercise_name` across the user's workouts.
    pub fn last_exercise_occurrence(
        &self,
        user_id: &str,
        exercise_name: &str,
    ) -> Option<ExerciseOccurrence> {
        let mut workouts: Vec<&Workout> = self
            .data
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id)
            .collect();
        workouts.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        workouts.into_iter().find_map(|w| {
            w.exercises
                .iter()
                .find(|e| e.exercise_name == exercise_name)
                .map(|e| ExerciseOccurrence {
                    workout_id: w.id,
                    date: w.date,
                    plan: w.plan,
                    notes: w.notes.clone(),
                    exercise: e.clone(),
                })
        })
    }

    // -----------------------------------------------------------------------
    // Custom catalog entries
    // -----------------------------------------------------------------------

    fn commit_catalog(&mut self, next: Catalog) -> Result<(), StoreError> {
        if next.custom_exercises != self.catalog.custom_exercises {
            let raw = serde_json::to_string(&next.custom_exercises)?;
            self.blobs.save(CUSTOM_EXERCISES_KEY, &raw)?;
        }
        if next.custom_templates != self.catalog.custom_templates {
            let raw = serde_json::to_string(&next.custom_templates)?;
            self.blobs.save(CUSTOM_TEMPLATES_KEY, &raw)?;
        }
        self.catalog = next;
        Ok(())
    }

    pub fn add_custom_exercise(
        &mut self,
        input: NewCatalogExercise,
    ) -> Result<CatalogExercise, StoreError> {
        let mut next = self.catalog.clone();
        let added = next.add_custom_exercise(input)?;
        self.commit_catalog(next)?;
        Ok(added)
    }

    pub fn delete_custom_exercise(
        &mut self,
        exercise_name: &str,
        muscle_group: &str,
    ) -> Result<bool, StoreError> {
        let mut next = self.catalog.clone();
        if !next.delete_custom_exercise(exercise_name, muscle_group) {
            return Ok(false);
        }
        self.commit_catalog(next)?;
        Ok(true)
    }

    pub fn save_custom_template(&mut self, template: Template) -> Result<(), StoreError> {
        let mut next = self.catalog.clone();
        next.save_custom_template(template)?;
        self.commit_catalog(next)
    }

    pub fn delete_custom_template(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut next = self.catalog.clone();
        if !next.delete_custom_template(id) {
            return Ok(false);
        }
        self.commit_catalog(next)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Storage usage
    // -----------------------------------------------------------------------

    /// Size of the serialized workout blob in megabytes.
    pub fn storage_size_mb(&self) -> f64 {
        match serde_json::to_string(&self.data) {
            Ok(raw) => raw.len() as f64 / (1024.0 * 1024.0),
            Err(_) => 0.0,
        }
    }

    pub fn is_near_limit(&self) -> bool {
        self.storage_size_mb() > self.warn_threshold_mb
    }
}

fn load_catalog<B: BlobStore>(blobs: &B) -> Catalog {
    fn read<T: serde::de::DeserializeOwned + Default, B: BlobStore>(blobs: &B, key: &str) -> T {
        match blobs.load(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable {key}: {e}");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("Failed to read {key}: {e}");
                T::default()
            }
        }
    }
    Catalog {
        custom_exercises: read(blobs, CUSTOM_EXERCISES_KEY),
        custom_templates: read(blobs, CUSTOM_TEMPLATES_KEY),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::NewCatalogExercise;
    use crate::error::{StorageError, ValidationError};
    use crate::models::TemplateExercise;
    use crate::storage::{FileBlobStore, MemoryBlobStore};

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn open() -> WorkoutStore<MemoryBlobStore> {
        WorkoutStore::open(MemoryBlobStore::new()).unwrap()
    }

    fn workout_with_exercise(
        store: &mut WorkoutStore<MemoryBlobStore>,
        sets: &[(f64, u32)],
    ) -> (Uuid, Uuid) {
        let w = store
            .create_workout(NewWorkout::new("chris", date("2024-01-01"), Plan::A))
            .unwrap();
        let ex = store
            .add_exercise(
                w.id,
                NewExercise::new("Chest", "Bench")
                    .with_sets(sets.iter().map(|(wt, r)| NewSet::new(*wt, *r))),
            )
            .unwrap()
            .unwrap();
        (w.id, ex.id)
    }

    #[test]
    fn open_initializes_and_persists_defaults() {
        let store = open();
        assert_eq!(store.current_user(), "chris");
        assert!(store.get_user("denis").is_some());
        let raw = store.blobs().load(STORAGE_KEY).unwrap().unwrap();
        let persisted: Store = serde_json::from_str(&raw).unwrap();
        assert_eq!(&persisted, store.snapshot());
    }

    #[test]
    fn open_reads_existing_data() {
        let mut blobs = MemoryBlobStore::new();
        let mut data = Store::default();
        data.current_user = "denis".into();
        blobs
            .save(STORAGE_KEY, &serde_json::to_string(&data).unwrap())
            .unwrap();
        let store = WorkoutStore::open(blobs).unwrap();
        assert_eq!(store.current_user(), "denis");
    }

    #[test]
    fn open_falls_back_to_defaults_and_keeps_corrupt_blob() {
        let mut blobs = MemoryBlobStore::new();
        blobs.save(STORAGE_KEY, "{garbage").unwrap();
        let mut store = WorkoutStore::open(blobs).unwrap();
        assert_eq!(store.snapshot(), &Store::default());
        assert_eq!(store.blobs().load(STORAGE_KEY).unwrap().as_deref(), Some("{garbage"));

        store.set_current_user("denis").unwrap();
        let raw = store.blobs().load(STORAGE_KEY).unwrap().unwrap();
        let persisted: Store = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.current_user, "denis");
    }

    #[test]
    fn create_workout_assigns_id_and_empty_exercises() {
        let mut store = open();
        let a = store
            .create_workout(NewWorkout::new("chris", date("2024-01-01"), Plan::A))
            .unwrap();
        let b = store
            .create_workout(NewWorkout::new("chris", date("2024-01-02"), Plan::B))
            .unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.exercises.is_empty());
        assert_eq!(store.list_workouts("chris").len(), 2);
        assert!(store.list_workouts("denis").is_empty());
    }

    #[test]
    fn create_workout_rejects_unknown_or_empty_user() {
        let mut store = open();
        let err = store
            .create_workout(NewWorkout::new("ghost", date("2024-01-01"), Plan::A))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser(_)));
        let err = store
            .create_workout(NewWorkout::new(" ", date("2024-01-01"), Plan::A))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyUserId)));
        assert!(store.snapshot().workouts.is_empty());
    }

    #[test]
    fn update_workout_keeps_owner_and_reports_missing() {
        let mut store = open();
        let w = store
            .create_workout(NewWorkout::new("chris", date("2024-01-01"), Plan::A))
            .unwrap();
        let updated = store
            .update_workout(
                w.id,
                WorkoutUpdate {
                    notes: Some(Some("felt strong".into())),
                    plan: Some(Plan::B),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.user_id, "chris");
        assert_eq!(updated.plan, Plan::B);
        assert_eq!(updated.notes.as_deref(), Some("felt strong"));

        let missing = store
            .update_workout(Uuid::new_v4(), WorkoutUpdate::default())
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn delete_workout_removes_only_that_workout() {
        let mut store = open();
        let (keep, _) = workout_with_exercise(&mut store, &[(50.0, 10)]);
        let (gone, _) = workout_with_exercise(&mut store, &[(60.0, 10)]);
        assert!(store.delete_workout(gone).unwrap());
        assert!(!store.delete_workout(gone).unwrap());
        assert!(store.get_workout(keep).is_some());
        assert_eq!(store.snapshot().workouts.len(), 1);
    }

    #[test]
    fn exercises_keep_insertion_order() {
        let mut store = open();
        let w = store
            .create_workout(NewWorkout::new("chris", date("2024-01-01"), Plan::A))
            .unwrap();
        for name in ["Bench", "Press", "Dips"] {
            store
                .add_exercise(w.id, NewExercise::new("Chest", name))
                .unwrap();
        }
        let names: Vec<String> = store
            .get_workout(w.id)
            .unwrap()
            .exercises
            .iter()
            .map(|e| e.exercise_name.clone())
            .collect();
        assert_eq!(names, vec!["Bench", "Press", "Dips"]);
    }

    #[test]
    fn add_exercise_validates_and_handles_missing_workout() {
        let mut store = open();
        let err = store
            .add_exercise(Uuid::new_v4(), NewExercise::new("", "Bench"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyMuscleGroup)));
        let none = store
            .add_exercise(Uuid::new_v4(), NewExercise::new("Chest", "Bench"))
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn update_and_delete_exercise() {
        let mut store = open();
        let (w, ex) = workout_with_exercise(&mut store, &[(100.0, 8)]);
        let updated = store
            .update_exercise(
                w,
                ex,
                ExerciseUpdate {
                    exercise_name: Some("Incline Bench".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.exercise_name, "Incline Bench");
        assert_eq!(updated.sets.len(), 1);
        assert!(store
            .update_exercise(w, Uuid::new_v4(), ExerciseUpdate::default())
            .unwrap()
            .is_none());

        assert!(store.delete_exercise(w, ex).unwrap());
        assert!(!store.delete_exercise(w, ex).unwrap());
        assert!(store.get_workout(w).unwrap().exercises.is_empty());
    }

    #[test]
    fn add_set_numbers_after_existing() {
        let mut store = open();
        let (w, ex) = workout_with_exercise(&mut store, &[(100.0, 8), (100.0, 4)]);
        let set = store
            .add_set(w, ex, NewSet::new(100.0, 2))
            .unwrap()
            .unwrap();
        assert_eq!(set.set_number, 3);
        assert!(store
            .add_set(w, Uuid::new_v4(), NewSet::new(1.0, 1))
            .unwrap()
            .is_none());
    }

    #[test]
    fn delete_set_renumbers_remaining() {
        let mut store = open();
        let (w, ex) = workout_with_exercise(
            &mut store,
            &[(100.0, 8), (100.0, 5), (100.0, 3), (100.0, 2)],
        );
        assert!(store.delete_set(w, ex, 1).unwrap());
        let sets = &store.get_workout(w).unwrap().exercise(ex).unwrap().sets;
        let numbers: Vec<u32> = sets.iter().map(|s| s.set_number).collect();
        let reps: Vec<u32> = sets.iter().map(|s| s.reps).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(reps, vec![8, 3, 2]);
        assert!(!store.delete_set(w, ex, 3).unwrap());
    }

    #[test]
    fn update_set_by_index() {
        let mut store = open();
        let (w, ex) = workout_with_exercise(&mut store, &[(100.0, 8), (100.0, 5)]);
        let set = store
            .update_set(
                w,
                ex,
                1,
                SetUpdate {
                    reps: Some(6),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(set.reps, 6);
        assert_eq!(set.set_number, 2);
        assert!(store
            .update_set(w, ex, 9, SetUpdate::default())
            .unwrap()
            .is_none());
        assert!(store
            .update_set(w, ex, 0, SetUpdate { weight_kg: Some(-1.0), reps: None })
            .is_err());
    }

    #[test]
    fn last_workout_for_plan_prefers_latest_date_then_created_at() {
        use crate::analysis::tests::workout;
        use chrono::TimeZone;

        let at = |h: u32| Utc.with_ymd_and_hms(2024, 3, 5, h, 0, 0).unwrap();
        let older = workout("chris", "2024-03-01", Plan::A, vec![]);
        let mut later_same_day = workout("chris", "2024-03-05", Plan::A, vec![]);
        later_same_day.created_at = at(18);
        let mut earlier_same_day = workout("chris", "2024-03-05", Plan::A, vec![]);
        earlier_same_day.created_at = at(7);
        let other_plan = workout("chris", "2024-04-01", Plan::B, vec![]);
        let other_user = workout("denis", "2024-05-01", Plan::A, vec![]);

        let mut data = Store::default();
        // Storage order puts the later-created workout first.
        data.workouts = vec![
            older,
            later_same_day.clone(),
            earlier_same_day,
            other_plan,
            other_user,
        ];
        let mut store = open();
        store.replace_all(data).unwrap();

        let last = store.last_workout_for_plan("chris", Plan::A).unwrap();
        assert_eq!(last.id, later_same_day.id);
        assert!(store.last_workout_for_plan("denis", Plan::B).is_none());
    }

    #[test]
    fn last_exercise_occurrence_scans_newest_first() {
        let mut store = open();
        let old = store
            .create_workout(NewWorkout::new("chris", date("2024-01-01"), Plan::A))
            .unwrap();
        let new = store
            .create_workout(NewWorkout {
                notes: Some("heavy day".into()),
                ..NewWorkout::new("chris", date("2024-02-01"), Plan::A)
            })
            .unwrap();
        store
            .add_exercise(
                old.id,
                NewExercise::new("Chest", "Bench").with_sets([NewSet::new(80.0, 10)]),
            )
            .unwrap();
        store
            .add_exercise(
                new.id,
                NewExercise::new("Chest", "Bench").with_sets([NewSet::new(90.0, 8)]),
            )
            .unwrap();

        let hit = store.last_exercise_occurrence("chris", "Bench").unwrap();
        assert_eq!(hit.workout_id, new.id);
        assert_eq!(hit.date, date("2024-02-01"));
        assert_eq!(hit.notes.as_deref(), Some("heavy day"));
        assert_eq!(hit.exercise.sets[0].weight_kg, 90.0);

        assert!(store.last_exercise_occurrence("chris", "Squat").is_none());
        assert!(store.last_exercise_occurrence("denis", "Bench").is_none());
    }

    #[test]
    fn failed_save_leaves_state_untouched() {
        let mut store = open();
        let (w, ex) = workout_with_exercise(&mut store, &[(100.0, 8)]);
        let before = store.snapshot().clone();

        store.blobs.set_limit(Some(10));
        let err = store.add_set(w, ex, NewSet::new(100.0, 4)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Storage(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(store.snapshot(), &before);
        let raw = store.blobs().load(STORAGE_KEY).unwrap().unwrap();
        let persisted: Store = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, before);
    }

    #[test]
    fn current_user_switch_is_validated_and_persisted() {
        let mut store = open();
        store.set_current_user("denis").unwrap();
        assert!(matches!(
            store.set_current_user("ghost"),
            Err(StoreError::UnknownUser(_))
        ));
        assert_eq!(store.current_user(), "denis");
        let reopened = WorkoutStore::open(store.blobs().clone()).unwrap();
        assert_eq!(reopened.current_user(), "denis");
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = open();
        workout_with_exercise(&mut store, &[(100.0, 8)]);
        store.set_current_user("denis").unwrap();
        store.reset().unwrap();
        assert_eq!(store.snapshot(), &Store::default());
    }

    #[test]
    fn custom_catalog_entries_survive_reopen() {
        let mut store = open();
        store
            .add_custom_exercise(NewCatalogExercise::new("Chest", "Svend Press"))
            .unwrap();
        store
            .save_custom_template(Template {
                id: "quick".into(),
                name: "Quick".into(),
                description: "Short session".into(),
                plan: Plan::A,
                exercises: vec![TemplateExercise {
                    muscle_group: "Chest".into(),
                    exercise_name: "Svend Press".into(),
                    technique: "Rest-Pause".into(),
                    target_reps: "11-15 total".into(),
                    alternatives: vec![],
                }],
            })
            .unwrap();

        let mut reopened = WorkoutStore::open(store.blobs().clone()).unwrap();
        assert!(reopened.catalog().find_exercise("svend press").is_some());
        assert!(reopened.catalog().template("quick").is_some());

        assert!(reopened.delete_custom_exercise("Svend Press", "Chest").unwrap());
        assert!(!reopened.delete_custom_exercise("Svend Press", "Chest").unwrap());
        assert!(reopened.delete_custom_template("quick").unwrap());
        let again = WorkoutStore::open(reopened.blobs().clone()).unwrap();
        assert!(again.catalog().custom_exercises.is_empty());
        assert!(again.catalog().custom_templates.is_empty());
    }

    #[test]
    fn storage_size_and_near_limit() {
        let store = open();
        assert!(store.storage_size_mb() > 0.0);
        assert!(!store.is_near_limit());
        let tiny = open().with_warn_threshold(0.0);
        assert!(tiny.is_near_limit());
    }

    #[test]
    fn file_backed_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WorkoutStore::open(FileBlobStore::new(dir.path())).unwrap();
        let w = store
            .create_workout(NewWorkout::new("denis", date("2024-06-01"), Plan::B))
            .unwrap();
        let reopened = WorkoutStore::open(FileBlobStore::new(dir.path())).unwrap();
        assert_eq!(reopened.get_workout(w.id).unwrap().plan, Plan::B);
    }
}
