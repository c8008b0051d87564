//! Head-to-head comparison of two users' personal records.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::{AggregateStats, PersonalRecords};
use crate::catalog::MUSCLE_GROUPS;
use crate::models::UserId;

/// Outcome of a single comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    User(UserId),
    Tie,
}

impl Winner {
    pub fn user(&self) -> Option<&str> {
        match self {
            Winner::User(id) => Some(id),
            Winner::Tie => None,
        }
    }
}

/// One side of a comparison: a user and their records.
#[derive(Debug, Clone, Copy)]
pub struct Contender<'a> {
    pub user_id: &'a str,
    pub records: &'a PersonalRecords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseComparison {
    pub exercise: String,
    pub a_user: UserId,
    pub b_user: UserId,
    pub a_weight: Option<f64>,
    pub b_weight: Option<f64>,
    pub a_reps: Option<u64>,
    pub b_reps: Option<u64>,
    /// `a_weight - b_weight`, only when both sides have a record.
    pub diff: Option<f64>,
    /// `diff / b_weight * 100`; `None` when `b_weight` is zero.
    pub percent_diff: Option<f64>,
    pub winner: Option<Winner>,
}

fn pick(a_user: &str, a: f64, b_user: &str, b: f64) -> Winner {
    if a > b {
        Winner::User(a_user.to_string())
    } else if b > a {
        Winner::User(b_user.to_string())
    } else {
        Winner::Tie
    }
}

/// Compare max-weight records for each exercise name.
///
/// A side without a record loses by default; when neither side has one the
/// winner is `None`.
pub fn compare_exercises(
    exercise_names: &[String],
    a: Contender<'_>,
    b: Contender<'_>,
) -> Vec<ExerciseComparison> {
    exercise_names
        .iter()
        .map(|name| {
            let a_rec = a.records.get(name);
            let b_rec = b.records.get(name);
            let a_weight = a_rec.map(|r| r.max_weight.value);
            let b_weight = b_rec.map(|r| r.max_weight.value);

            let (diff, percent_diff, winner) = match (a_weight, b_weight) {
                (Some(aw), Some(bw)) => {
                    let diff = aw - bw;
                    let percent = (bw != 0.0).then(|| diff / bw * 100.0);
                    (Some(diff), percent, Some(pick(a.user_id, aw, b.user_id, bw)))
                }
                (Some(_), None) => (None, None, Some(Winner::User(a.user_id.to_string()))),
                (None, Some(_)) => (None, None, Some(Winner::User(b.user_id.to_string()))),
                (None, None) => (None, None, None),
            };

            ExerciseComparison {
                exercise: name.clone(),
                a_user: a.user_id.to_string(),
                b_user: b.user_id.to_string(),
                a_weight,
                b_weight,
                a_reps: a_rec.map(|r| r.max_reps.value),
                b_reps: b_rec.map(|r| r.max_reps.value),
                diff,
                percent_diff,
                winner,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideScore {
    pub user_id: UserId,
    pub wins: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub a: SideScore,
    pub b: SideScore,
}

impl Scorecard {
    pub fn leader(&self) -> Winner {
        pick(&self.a.user_id, self.a.wins as f64, &self.b.user_id, self.b.wins as f64)
    }
}

fn count_wins<'c>(
    comparisons: impl Iterator<Item = &'c ExerciseComparison>,
    a: &str,
    b: &str,
) -> (usize, usize) {
    comparisons.fold((0, 0), |(wa, wb), c| match c.winner.as_ref().and_then(Winner::user) {
        Some(id) if id == a => (wa + 1, wb),
        Some(id) if id == b => (wa, wb + 1),
        _ => (wa, wb),
    })
}

/// Exercises won by each side. Ties and empty comparisons count for nobody.
pub fn tally(comparisons: &[ExerciseComparison], a_user: &str, b_user: &str) -> Scorecard {
    let (a_wins, b_wins) = count_wins(comparisons.iter(), a_user, b_user);
    Scorecard {
        a: SideScore {
            user_id: a_user.to_string(),
            wins: a_wins,
        },
        b: SideScore {
            user_id: b_user.to_string(),
            wins: b_wins,
        },
    }
}

/// Case-insensitive substring matchers, one per standard muscle group.
static GROUP_MATCHERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    MUSCLE_GROUPS
        .iter()
        .filter_map(|group| {
            match Regex::new(&format!("(?i){}", regex::escape(group))) {
                Ok(re) => Some((*group, re)),
                Err(e) => {
                    log::error!("Invalid matcher for {group}: {e}");
                    None
                }
            }
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroupResult {
    pub muscle_group: String,
    pub a_wins: usize,
    pub b_wins: usize,
    pub winner: Winner,
}

/// Wins per muscle group, matching groups by keyword in the exercise name.
///
/// Groups where neither side won anything are left out.
pub fn muscle_group_champions(
    comparisons: &[ExerciseComparison],
    a_user: &str,
    b_user: &str,
) -> Vec<MuscleGroupResult> {
    GROUP_MATCHERS
        .iter()
        .filter_map(|(group, re)| {
            let matching = comparisons.iter().filter(|c| re.is_match(&c.exercise));
            let (a_wins, b_wins) = count_wins(matching, a_user, b_user);
            if a_wins == 0 && b_wins == 0 {
                return None;
            }
            Some(MuscleGroupResult {
                muscle_group: group.to_string(),
                a_wins,
                b_wins,
                winner: pick(a_user, a_wins as f64, b_user, b_wins as f64),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub a: f64,
    pub b: f64,
    pub winner: Winner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallMatchup {
    pub total_workouts: MetricResult,
    pub total_volume: MetricResult,
    pub avg_volume: MetricResult,
    pub total_exercises: MetricResult,
    pub total_reps: MetricResult,
}

/// Compare two users' aggregate stats metric by metric.
pub fn overall_matchup(
    a_user: &str,
    a: &AggregateStats,
    b_user: &str,
    b: &AggregateStats,
) -> OverallMatchup {
    let metric = |av: f64, bv: f64| MetricResult {
        a: av,
        b: bv,
        winner: pick(a_user, av, b_user, bv),
    };
    OverallMatchup {
        total_workouts: metric(a.total_workouts as f64, b.total_workouts as f64),
        total_volume: metric(a.total_volume, b.total_volume),
        avg_volume: metric(a.avg_volume, b.avg_volume),
        total_exercises: metric(a.total_exercises as f64, b.total_exercises as f64),
        total_reps: metric(a.total_reps as f64, b.total_reps as f64),
    }
}
