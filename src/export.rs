use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::Store;

pub const CSV_HEADER: &str = "Date,User,Plan,Muscle Group,Exercise,Set Number,Weight (kg),Reps,Notes";

/// The whole store as pretty-printed JSON.
pub fn export_backup(store: &Store) -> serde_json::Result<String> {
    serde_json::to_string_pretty(store)
}

/// Stream the backup JSON straight into a file at `path`.
pub fn write_backup<P: AsRef<Path>>(store: &Store, path: P) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, store).map_err(std::io::Error::other)?;
    file.flush()?;
    log::info!("Wrote backup with {} workouts", store.workouts.len());
    Ok(())
}

/// Quote a plain column only when it would otherwise break the row.
fn plain(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quoted(value)
    } else {
        value.to_string()
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// One row per set, for `user_id` only or for everyone.
///
/// The notes column is always quoted. Workouts and exercises without sets
/// produce no rows.
pub fn export_csv(store: &Store, user_id: Option<&str>) -> String {
    let mut rows = vec![CSV_HEADER.to_string()];
    let workouts = store
        .workouts
        .iter()
        .filter(|w| user_id.is_none_or(|id| w.user_id == id));

    for workout in workouts {
        let user = store.display_name(&workout.user_id);
        let notes = quoted(workout.notes.as_deref().unwrap_or(""));
        for exercise in &workout.exercises {
            for set in &exercise.sets {
                rows.push(format!(
                    "{},{},{},{},{},{},{},{},{}",
                    workout.date,
                    plain(&user),
                    workout.plan,
                    plain(&exercise.muscle_group),
                    plain(&exercise.exercise_name),
                    set.set_number,
                    set.weight_kg,
                    set.reps,
                    notes
                ));
            }
        }
    }
    log::info!("Exported {} set rows", rows.len() - 1);
    rows.join("\n")
}

pub fn csv_file_name(user_id: Option<&str>, date: NaiveDate) -> String {
    format!("workouts_{}_{}.csv", user_id.unwrap_or("all"), date.format("%Y-%m-%d"))
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("backup_{}.json", date.format("%Y-%m-%d"))
}
