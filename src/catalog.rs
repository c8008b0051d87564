//! Exercise and template catalog.
//!
//! The built-in part is static: ten muscle groups split into two plans, an
//! exercise list per group and six templates. Users can extend it with
//! custom exercises and templates which are stored next to the workout data.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use phf::phf_ordered_map;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::ValidationError;
use crate::models::{same_name, validate_names, Plan, Template, TemplateExercise, TemplateId};

pub const MUSCLE_GROUPS: [&str; 10] = [
    "Chest",
    "Shoulders",
    "Triceps",
    "Back Width",
    "Back Thickness",
    "Biceps",
    "Forearms",
    "Quads",
    "Hamstrings",
    "Calves",
];

pub const PLAN_A_MUSCLES: [&str; 5] = [
    "Chest",
    "Shoulders",
    "Triceps",
    "Back Width",
    "Back Thickness",
];
pub const PLAN_B_MUSCLES: [&str; 5] = ["Biceps", "Forearms", "Quads", "Hamstrings", "Calves"];

pub const DEFAULT_TECHNIQUE: &str = "Rest-Pause";
pub const DEFAULT_TARGET_REPS: &str = "11-15 total";

const CHEST: &[&str] = &[
    "Flat Barbell Bench Press",
    "Incline Barbell Bench Press",
    "Flat Dumbbell Press",
    "Incline Dumbbell Press",
    "Dumbbell Flyes",
    "Cable Crossovers",
    "Dips (Chest)",
    "Push-ups (Weighted)",
];

const SHOULDERS: &[&str] = &[
    "Barbell Overhead Press",
    "Dumbbell Overhead Press",
    "Arnold Press",
    "Lateral Raises",
    "Front Raises",
    "Rear Delt Flyes",
    "Face Pulls",
    "Upright Rows",
];

const TRICEPS: &[&str] = &[
    "Close-Grip Bench Press",
    "Tricep Dips",
    "Skull Crushers",
    "Cable Pushdowns",
    "Overhead Tricep Extension",
    "Diamond Push-ups",
];

const BACK_WIDTH: &[&str] = &[
    "Pull-ups",
    "Lat Pulldowns",
    "Wide-Grip Rows",
    "T-Bar Rows",
    "Cable Rows",
    "Straight-Arm Pulldowns",
];

const BACK_THICKNESS: &[&str] = &[
    "Barbell Rows",
    "Dumbbell Rows",
    "Deadlifts",
    "Rack Pulls",
    "Seated Cable Rows",
    "Chest-Supported Rows",
];

const BICEPS: &[&str] = &[
    "Barbell Curls",
    "Dumbbell Curls",
    "Hammer Curls",
    "Preacher Curls",
    "Concentration Curls",
    "Cable Curls",
    "Incline Dumbbell Curls",
];

const FOREARMS: &[&str] = &[
    "Wrist Curls",
    "Reverse Wrist Curls",
    "Hammer Curls",
    "Farmer Walks",
    "Reverse Curls",
    "Plate Pinches",
];

const QUADS: &[&str] = &[
    "Barbell Squats",
    "Front Squats",
    "Leg Press",
    "Hack Squats",
    "Lunges",
    "Bulgarian Split Squats",
    "Leg Extensions",
];

const HAMSTRINGS: &[&str] = &[
    "Romanian Deadlifts",
    "Leg Curls",
    "Stiff-Leg Deadlifts",
    "Good Mornings",
    "Glute-Ham Raises",
    "Nordic Curls",
];

const CALVES: &[&str] = &[
    "Standing Calf Raises",
    "Seated Calf Raises",
    "Donkey Calf Raises",
    "Calf Press on Leg Press",
    "Single-Leg Calf Raises",
];

pub static EXERCISE_DATABASE: phf::OrderedMap<&'static str, &'static [&'static str]> = phf_ordered_map! {
    "Chest" => CHEST,
    "Shoulders" => SHOULDERS,
    "Triceps" => TRICEPS,
    "Back Width" => BACK_WIDTH,
    "Back Thickness" => BACK_THICKNESS,
    "Biceps" => BICEPS,
    "Forearms" => FOREARMS,
    "Quads" => QUADS,
    "Hamstrings" => HAMSTRINGS,
    "Calves" => CALVES,
};

/// Static form of a template entry.
#[derive(Debug, Clone, Copy)]
pub struct TemplateExerciseDef {
    pub muscle_group: &'static str,
    pub exercise_name: &'static str,
    pub technique: &'static str,
    pub target_reps: &'static str,
    pub alternatives: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateDef {
    pub name: &'static str,
    pub description: &'static str,
    pub plan: Plan,
    pub exercises: &'static [TemplateExerciseDef],
}

const fn ex(
    muscle_group: &'static str,
    exercise_name: &'static str,
    technique: &'static str,
    target_reps: &'static str,
    alternatives: &'static [&'static str],
) -> TemplateExerciseDef {
    TemplateExerciseDef {
        muscle_group,
        exercise_name,
        technique,
        target_reps,
        alternatives,
    }
}

pub static BUILT_IN_TEMPLATES: phf::OrderedMap<&'static str, TemplateDef> = phf_ordered_map! {
    "A1" => TemplateDef {
        name: "Plan A1",
        description: "Upper Body - Incline Focus",
        plan: Plan::A,
        exercises: &[
            ex("Chest", "Incline Barbell Bench Press", "Rest-Pause (3 mini-sets)", "11-15 total", &["Incline DB Press", "Incline Smith Machine Press"]),
            ex("Shoulders", "Dumbbell Shoulder Press", "Rest-Pause", "11-15 total", &["Barbell Military Press", "Machine Shoulder Press"]),
            ex("Triceps", "Close-Grip Bench Press", "Rest-Pause", "11-15 total", &["Dips", "Reverse Grip Bench Press"]),
            ex("Back Width", "Pull-ups", "Rest-Pause", "11-15 total", &["Wide-Grip Lat Pulldowns", "Hammer Strength Pulldown"]),
            ex("Back Thickness", "Deadlifts", "1-2 Straight Sets", "6-12", &["Barbell Rows", "T-Bar Rows"]),
        ],
    },
    "A2" => TemplateDef {
        name: "Plan A2",
        description: "Upper Body - Flat Focus",
        plan: Plan::A,
        exercises: &[
            ex("Chest", "Flat Barbell Bench Press", "Rest-Pause", "11-15 total", &["Flat DB Press", "Hammer Strength Chest Press"]),
            ex("Shoulders", "Cable Lateral Raises", "Rest-Pause", "11-20 total", &["Dumbbell Lateral Raises", "Machine Laterals"]),
            ex("Triceps", "Skull Crushers", "Rest-Pause", "15-30 total", &["Overhead Extensions", "Crossbody Extensions"]),
            ex("Back Width", "Close-Grip Pulldowns", "Rest-Pause", "11-15 total", &["Neutral-Grip Pulldowns", "Low-to-High Cable Row"]),
            ex("Back Thickness", "Barbell Rows", "1-2 Straight Sets", "6-12", &["Dumbbell Rows", "Hammer Strength Row"]),
        ],
    },
    "A3" => TemplateDef {
        name: "Plan A3",
        description: "Upper Body - Machine Focus",
        plan: Plan::A,
        exercises: &[
            ex("Chest", "Incline Machine Press", "Rest-Pause", "11-15 total", &["Incline Hammer Strength", "Cable Flyes Incline"]),
            ex("Shoulders", "Standing Shoulder Press Machine", "Rest-Pause", "11-15 total", &["Seated Shoulder Press", "Smith Machine Press"]),
            ex("Triceps", "EZ-Bar Lying Extensions", "Rest-Pause", "11-15 total", &["Cable Overhead Extension", "Machine Dips"]),
            ex("Back Width", "Lat Pulldown Machine", "Rest-Pause", "11-15 total", &["Assisted Pull-ups", "Cable Pulldowns"]),
            ex("Back Thickness", "Seated Row Machine", "Rest-Pause", "6-12", &["Cable Rows", "T-Bar Rows"]),
        ],
    },
    "B1" => TemplateDef {
        name: "Plan B1",
        description: "Legs & Arms - Squat Focus",
        plan: Plan::B,
        exercises: &[
            ex("Biceps", "Standing Barbell Curls", "Rest-Pause", "11-15 total", &["Dumbbell Curls", "Preacher Curls"]),
            ex("Forearms", "Hammer Curls", "1 Straight Set", "12-20", &["Reverse Curls", "Wrist Curls"]),
            ex("Quads", "Squats", "1 heavy set + 1 Widowmaker", "6-10 + 20 reps", &["Leg Press", "Hack Squats"]),
            ex("Hamstrings", "Romanian Deadlifts", "Rest-Pause", "15-30 total", &["Lying Leg Curls", "Good Mornings"]),
            ex("Calves", "Standing Calf Raises", "1 set with slow negatives", "10-12", &["Seated Calf Raises", "Donkey Raises"]),
        ],
    },
    "B2" => TemplateDef {
        name: "Plan B2",
        description: "Legs & Arms - Leg Press Focus",
        plan: Plan::B,
        exercises: &[
            ex("Biceps", "Alternating Dumbbell Curls", "Rest-Pause", "11-15 total", &["Cable Curls", "Concentration Curls"]),
            ex("Forearms", "Reverse Cable Curls", "1 Straight Set", "12-20", &["Zottman Curls", "Behind-Back Wrist Curls"]),
            ex("Quads", "Leg Press", "1 heavy set + 1 Widowmaker", "6-10 + 20 reps", &["Hack Squats", "Front Squats"]),
            ex("Hamstrings", "Lying Leg Curls", "Rest-Pause", "15-30 total", &["Seated Leg Curls", "Nordic Ham Curls"]),
            ex("Calves", "Seated Calf Raises", "1 set with slow negatives", "10-12", &["Leg Press Calf Raises", "Single Leg Raises"]),
        ],
    },
    "B3" => TemplateDef {
        name: "Plan B3",
        description: "Legs & Arms - Machine Variation",
        plan: Plan::B,
        exercises: &[
            ex("Biceps", "Standing Dumbbell Curls", "Rest-Pause", "11-15 total", &["Cable Curls", "Machine Curls"]),
            ex("Forearms", "Hammer Preacher Curls", "1 Straight Set", "12-20", &["Reverse Preacher", "Cable Reverse Curls"]),
            ex("Quads", "Leg Press", "1 heavy set + 1 Widowmaker", "6-10 + 20 reps", &["Smith Machine Squats", "Hack Squats"]),
            ex("Hamstrings", "Seated Leg Curls", "Rest-Pause", "15-30 total", &["Lying Leg Curls", "Single Leg Curls"]),
            ex("Calves", "Calf Press Machine", "1 set with slow negatives", "10-12", &["Standing Calf Raises", "Seated Calf Raises"]),
        ],
    },
};

impl TemplateExerciseDef {
    fn to_owned_exercise(self) -> TemplateExercise {
        TemplateExercise {
            muscle_group: self.muscle_group.to_string(),
            exercise_name: self.exercise_name.to_string(),
            technique: self.technique.to_string(),
            target_reps: self.target_reps.to_string(),
            alternatives: self.alternatives.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl TemplateDef {
    fn to_template(self, id: &str) -> Template {
        Template {
            id: id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            plan: self.plan,
            exercises: self.exercises.iter().map(|e| e.to_owned_exercise()).collect(),
        }
    }
}

/// Exercise names listed for a muscle group. Unknown groups yield an empty slice.
pub fn exercises_for_muscle(muscle_group: &str) -> &'static [&'static str] {
    EXERCISE_DATABASE.get(muscle_group).copied().unwrap_or(&[])
}

pub fn muscles_for_plan(plan: Plan) -> &'static [&'static str] {
    match plan {
        Plan::A => &PLAN_A_MUSCLES,
        Plan::B => &PLAN_B_MUSCLES,
    }
}

/// Every listed exercise in catalog order. Names shared by two groups appear twice.
pub fn all_exercise_names() -> Vec<&'static str> {
    EXERCISE_DATABASE.values().flat_map(|v| v.iter().copied()).collect()
}

/// Case-insensitive substring search over the exercise lists, as `(muscle, exercise)`.
pub fn search_exercises(query: &str) -> Vec<(&'static str, &'static str)> {
    let needle = query.to_lowercase();
    EXERCISE_DATABASE
        .entries()
        .flat_map(|(muscle, list)| list.iter().map(move |ex| (*muscle, *ex)))
        .filter(|(_, ex)| ex.to_lowercase().contains(&needle))
        .collect()
}

pub fn built_in_template(id: &str) -> Option<Template> {
    BUILT_IN_TEMPLATES.get(id).map(|def| def.to_template(id))
}

/// Registry entry for a selectable exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogExercise {
    pub muscle_group: String,
    pub exercise_name: String,
    pub technique: String,
    pub target_reps: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub is_built_in: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for a user-defined exercise; missing hints fall back to the rest-pause defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatalogExercise {
    pub muscle_group: String,
    pub exercise_name: String,
    #[serde(default)]
    pub technique: Option<String>,
    #[serde(default)]
    pub target_reps: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl NewCatalogExercise {
    pub fn new(muscle_group: impl Into<String>, exercise_name: impl Into<String>) -> Self {
        Self {
            muscle_group: muscle_group.into(),
            exercise_name: exercise_name.into(),
            ..Default::default()
        }
    }
}

/// Exercises referenced by the built-in templates, de-duplicated by group and name.
static BUILT_IN_EXERCISES: Lazy<Vec<CatalogExercise>> = Lazy::new(|| {
    let mut seen = HashSet::new();
    BUILT_IN_TEMPLATES
        .values()
        .flat_map(|t| t.exercises.iter())
        .filter(|e| seen.insert(format!("{}|{}", e.muscle_group, e.exercise_name).to_lowercase()))
        .map(|e| CatalogExercise {
            muscle_group: e.muscle_group.to_string(),
            exercise_name: e.exercise_name.to_string(),
            technique: e.technique.to_string(),
            target_reps: e.target_reps.to_string(),
            alternatives: e.alternatives.iter().map(|a| a.to_string()).collect(),
            is_built_in: true,
            created_at: None,
        })
        .collect()
});

pub fn built_in_exercises() -> &'static [CatalogExercise] {
    &BUILT_IN_EXERCISES
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub exercise_count: usize,
    pub muscle_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_exercises: usize,
    pub built_in_exercises: usize,
    pub custom_exercises: usize,
    pub by_muscle_group: BTreeMap<String, usize>,
}

/// Built-in catalog plus the user's custom exercises and templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub custom_exercises: Vec<CatalogExercise>,
    #[serde(default)]
    pub custom_templates: BTreeMap<TemplateId, Template>,
}

impl Catalog {
    pub fn all_exercises(&self) -> Vec<CatalogExercise> {
        built_in_exercises()
            .iter()
            .chain(self.custom_exercises.iter())
            .cloned()
            .collect()
    }

    fn exercises(&self) -> impl Iterator<Item = &CatalogExercise> {
        built_in_exercises().iter().chain(self.custom_exercises.iter())
    }

    pub fn exercises_by_muscle_group(&self, muscle_group: &str) -> Vec<CatalogExercise> {
        self.exercises()
            .filter(|e| e.muscle_group == muscle_group)
            .cloned()
            .collect()
    }

    pub fn find_exercise(&self, exercise_name: &str) -> Option<CatalogExercise> {
        self.exercises()
            .find(|e| same_name(&e.exercise_name, exercise_name))
            .cloned()
    }

    /// Case-insensitive name check, optionally restricted to one group.
    pub fn exercise_exists(&self, exercise_name: &str, muscle_group: Option<&str>) -> bool {
        self.exercises().any(|e| {
            same_name(&e.exercise_name, exercise_name)
                && muscle_group.map_or(true, |g| e.muscle_group == g)
        })
    }

    pub fn add_custom_exercise(
        &mut self,
        input: NewCatalogExercise,
    ) -> Result<CatalogExercise, ValidationError> {
        validate_names(&input.muscle_group, &input.exercise_name)?;
        let muscle_group = input.muscle_group.trim().to_string();
        let exercise_name = input.exercise_name.trim().to_string();
        if self.exercise_exists(&exercise_name, Some(&muscle_group)) {
            return Err(ValidationError::DuplicateExercise {
                name: exercise_name,
                muscle_group,
            });
        }
        let entry = CatalogExercise {
            muscle_group,
            exercise_name,
            technique: input
                .technique
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TECHNIQUE.to_string()),
            target_reps: input
                .target_reps
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TARGET_REPS.to_string()),
            alternatives: input.alternatives,
            is_built_in: false,
            created_at: Some(Utc::now()),
        };
        self.custom_exercises.push(entry.clone());
        Ok(entry)
    }

    /// Remove a custom exercise. Returns `true` when something was deleted.
    pub fn delete_custom_exercise(&mut self, exercise_name: &str, muscle_group: &str) -> bool {
        let before = self.custom_exercises.len();
        self.custom_exercises.retain(|e| {
            !(same_name(&e.exercise_name, exercise_name) && e.muscle_group == muscle_group)
        });
        self.custom_exercises.len() < before
    }

    pub fn stats(&self) -> CatalogStats {
        let by_muscle_group = MUSCLE_GROUPS
            .iter()
            .filter_map(|group| {
                let count = self.exercises().filter(|e| e.muscle_group == *group).count();
                (count > 0).then(|| (group.to_string(), count))
            })
            .collect();
        CatalogStats {
            total_exercises: built_in_exercises().len() + self.custom_exercises.len(),
            built_in_exercises: built_in_exercises().len(),
            custom_exercises: self.custom_exercises.len(),
            by_muscle_group,
        }
    }

    /// Sorted distinct groups, including ones only custom exercises use.
    pub fn all_muscle_groups(&self) -> Vec<String> {
        self.exercises()
            .map(|e| e.muscle_group.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn suggested_alternatives(&self, muscle_group: &str, exclude: Option<&str>) -> Vec<String> {
        self.exercises()
            .filter(|e| e.muscle_group == muscle_group)
            .filter(|e| exclude.map_or(true, |x| e.exercise_name != x))
            .map(|e| e.exercise_name.clone())
            .collect()
    }

    /// Built-in templates in catalog order followed by custom ones.
    pub fn all_templates(&self) -> Vec<Template> {
        BUILT_IN_TEMPLATES
            .entries()
            .map(|(id, def)| def.to_template(id))
            .chain(self.custom_templates.values().cloned())
            .collect()
    }

    pub fn template(&self, id: &str) -> Option<Template> {
        built_in_template(id).or_else(|| self.custom_templates.get(id).cloned())
    }

    pub fn template_ids(&self) -> Vec<TemplateId> {
        self.all_templates().into_iter().map(|t| t.id).collect()
    }

    pub fn templates_for_plan(&self, plan: Plan) -> Vec<Template> {
        self.all_templates()
            .into_iter()
            .filter(|t| t.plan == plan)
            .collect()
    }

    pub fn template_info(&self, id: &str) -> Option<TemplateInfo> {
        let template = self.template(id)?;
        let mut muscle_groups: Vec<String> = Vec::new();
        for e in &template.exercises {
            if !muscle_groups.contains(&e.muscle_group) {
                muscle_groups.push(e.muscle_group.clone());
            }
        }
        Some(TemplateInfo {
            id: template.id,
            name: template.name,
            description: template.description,
            exercise_count: template.exercises.len(),
            muscle_groups,
        })
    }

    /// Insert or replace a custom template. Built-in ids are reserved.
    pub fn save_custom_template(&mut self, template: Template) -> Result<(), ValidationError> {
        let id = template.id.trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::EmptyTemplateId);
        }
        if BUILT_IN_TEMPLATES.contains_key(id.as_str()) {
            return Err(ValidationError::BuiltInTemplate(id));
        }
        if template.exercises.is_empty() {
            return Err(ValidationError::EmptyTemplate(id));
        }
        for e in &template.exercises {
            validate_names(&e.muscle_group, &e.exercise_name)?;
        }
        self.custom_templates.insert(id.clone(), Template { id, ..template });
        Ok(())
    }

    pub fn delete_custom_template(&mut self, id: &str) -> bool {
        self.custom_templates.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_template(id: &str) -> Template {
        Template {
            id: id.into(),
            name: "Pump".into(),
            description: "Arms only".into(),
            plan: Plan::B,
            exercises: vec![TemplateExercise {
                muscle_group: "Biceps".into(),
                exercise_name: "Spider Curls".into(),
                technique: "Rest-Pause".into(),
                target_reps: "11-15 total".into(),
                alternatives: vec![],
            }],
        }
    }

    #[test]
    fn plans_cover_all_ten_groups() {
        let mut groups: Vec<&str> = muscles_for_plan(Plan::A).to_vec();
        groups.extend_from_slice(muscles_for_plan(Plan::B));
        assert_eq!(groups, MUSCLE_GROUPS.to_vec());
        assert_eq!(EXERCISE_DATABASE.len(), 10);
        let keys: Vec<&str> = EXERCISE_DATABASE.keys().copied().collect();
        assert_eq!(keys, MUSCLE_GROUPS.to_vec());
    }

    #[test]
    fn exercise_lookup_and_search() {
        assert!(exercises_for_muscle("Calves").contains(&"Seated Calf Raises"));
        assert!(exercises_for_muscle("Neck").is_empty());
        let hits = search_exercises("hammer");
        assert_eq!(hits, vec![("Biceps", "Hammer Curls"), ("Forearms", "Hammer Curls")]);
        assert_eq!(all_exercise_names().len(), 65);
    }

    #[test]
    fn built_in_exercises_are_deduplicated() {
        // Leg Press appears in B2 and B3 for Quads.
        let leg_press = built_in_exercises()
            .iter()
            .filter(|e| e.exercise_name == "Leg Press")
            .count();
        assert_eq!(leg_press, 1);
        assert_eq!(built_in_exercises().len(), 29);
        assert!(built_in_exercises().iter().all(|e| e.is_built_in));
    }

    #[test]
    fn templates_by_plan_and_info() {
        let catalog = Catalog::default();
        let a: Vec<String> = catalog
            .templates_for_plan(Plan::A)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(a, vec!["A1", "A2", "A3"]);
        let info = catalog.template_info("B1").unwrap();
        assert_eq!(info.exercise_count, 5);
        assert_eq!(info.muscle_groups[0], "Biceps");
        assert!(catalog.template_info("Z9").is_none());
    }

    #[test]
    fn add_custom_exercise_applies_defaults_and_rejects_duplicates() {
        let mut catalog = Catalog::default();
        let added = catalog
            .add_custom_exercise(NewCatalogExercise::new("Chest", "Svend Press"))
            .unwrap();
        assert_eq!(added.technique, DEFAULT_TECHNIQUE);
        assert_eq!(added.target_reps, DEFAULT_TARGET_REPS);
        assert!(!added.is_built_in);
        assert!(added.created_at.is_some());

        let dup = catalog.add_custom_exercise(NewCatalogExercise::new("Chest", "svend press"));
        assert!(matches!(dup, Err(ValidationError::DuplicateExercise { .. })));
        // Same name in another group is allowed.
        assert!(catalog
            .add_custom_exercise(NewCatalogExercise::new("Shoulders", "Svend Press"))
            .is_ok());
        // Built-in names count as existing.
        assert!(catalog
            .add_custom_exercise(NewCatalogExercise::new("Quads", "LEG PRESS"))
            .is_err());
        assert_eq!(
            catalog.add_custom_exercise(NewCatalogExercise::new("", "Thing")),
            Err(ValidationError::EmptyMuscleGroup)
        );
    }

    #[test]
    fn delete_custom_exercise_reports_removal() {
        let mut catalog = Catalog::default();
        catalog
            .add_custom_exercise(NewCatalogExercise::new("Neck", "Neck Curls"))
            .unwrap();
        assert!(catalog.all_muscle_groups().contains(&"Neck".to_string()));
        assert!(catalog.find_exercise("neck curls").is_some());
        assert!(!catalog.delete_custom_exercise("Neck Curls", "Chest"));
        assert!(catalog.delete_custom_exercise("neck curls", "Neck"));
        assert!(catalog.find_exercise("Neck Curls").is_none());
    }

    #[test]
    fn non_ascii_names_fold_the_same_everywhere() {
        let mut catalog = Catalog::default();
        catalog
            .add_custom_exercise(NewCatalogExercise::new("Neck", "Übung"))
            .unwrap();
        let dup = catalog.add_custom_exercise(NewCatalogExercise::new("Neck", "übung"));
        assert!(matches!(dup, Err(ValidationError::DuplicateExercise { .. })));
        assert!(catalog.exercise_exists("ÜBUNG", Some("Neck")));
        assert_eq!(catalog.find_exercise("übung").map(|e| e.exercise_name), Some("Übung".into()));
        assert!(catalog.delete_custom_exercise("übung", "Neck"));
        assert!(!catalog.exercise_exists("Übung", None));
    }

    #[test]
    fn stats_count_builtin_and_custom() {
        let mut catalog = Catalog::default();
        catalog
            .add_custom_exercise(NewCatalogExercise::new("Calves", "Tibialis Raises"))
            .unwrap();
        let stats = catalog.stats();
        assert_eq!(stats.built_in_exercises, 29);
        assert_eq!(stats.custom_exercises, 1);
        assert_eq!(stats.total_exercises, 30);
        assert_eq!(stats.by_muscle_group.get("Calves"), Some(&4));
    }

    #[test]
    fn suggested_alternatives_excludes_current() {
        let catalog = Catalog::default();
        let alts = catalog.suggested_alternatives("Quads", Some("Leg Press"));
        assert_eq!(alts, vec!["Squats".to_string()]);
    }

    #[test]
    fn custom_templates_cannot_shadow_built_ins() {
        let mut catalog = Catalog::default();
        assert!(matches!(
            catalog.save_custom_template(custom_template("A1")),
            Err(ValidationError::BuiltInTemplate(_))
        ));
        catalog.save_custom_template(custom_template("arms")).unwrap();
        assert_eq!(catalog.template("arms").unwrap().name, "Pump");
        assert_eq!(catalog.templates_for_plan(Plan::B).len(), 4);
        assert_eq!(catalog.template_ids().last().map(String::as_str), Some("arms"));
        assert!(catalog.delete_custom_template("arms"));
        assert!(!catalog.delete_custom_template("arms"));

        let mut empty = custom_template("empty");
        empty.exercises.clear();
        assert!(matches!(
            catalog.save_custom_template(empty),
            Err(ValidationError::EmptyTemplate(_))
        ));
    }
}
