//! Maintenance tool for the workout store: summaries, exports and imports.

use chrono::Local;
use log::info;
use std::error::Error;

use duo_workout_tracker::analysis::{
    aggregate_stats, dashboard_summary, personal_records, unique_exercise_names,
};
use duo_workout_tracker::competition::{
    Contender, compare_exercises, muscle_group_champions, overall_matchup, tally,
};
use duo_workout_tracker::export::{backup_file_name, csv_file_name, export_csv, write_backup};
use duo_workout_tracker::import::{import_csv, restore_backup};
use duo_workout_tracker::{Config, FileBlobStore, MergeStrategy, WorkoutStore};

const USAGE: &str = "usage: duo_workout_tracker <command>

commands:
  summary                      totals and recent workouts per user
  compare [user_a] [user_b]    head-to-head personal records
  export-csv [user]            write workouts_<user|all>_<date>.csv
  backup                       write backup_<date>.json
  restore <file>               replace all data with a JSON backup
  import-csv <file> [strategy] import CSV rows (replace | merge | smart)
  set-user <id>                change the current user
  reset                        restore the default empty store";

type Store = WorkoutStore<FileBlobStore>;

fn summary(store: &Store) {
    let data = store.snapshot();
    for user in data.users.values() {
        let workouts = data.workouts_for(&user.id);
        let s = dashboard_summary(&workouts, 5);
        println!(
            "{} ({}): {} workouts (A {}, B {}), {:.0} kg total volume",
            user.name, user.id, s.total_workouts, s.plan_a_count, s.plan_b_count, s.total_volume
        );
        for w in &s.recent {
            println!("  {} plan {} - {} exercises", w.date, w.plan, w.exercises.len());
        }
    }
    println!(
        "storage: {:.2} MB{}",
        store.storage_size_mb(),
        if store.is_near_limit() { " (near limit, export a backup)" } else { "" }
    );
}

fn compare(store: &Store, a: &str, b: &str) -> Result<(), Box<dyn Error>> {
    let data = store.snapshot();
    for id in [a, b] {
        if !data.users.contains_key(id) {
            return Err(format!("unknown user: {id}").into());
        }
    }
    let (a_workouts, b_workouts) = (data.workouts_for(a), data.workouts_for(b));
    let (a_prs, b_prs) = (personal_records(&a_workouts), personal_records(&b_workouts));

    let mut all = a_workouts.clone();
    all.extend(b_workouts.iter().cloned());
    let names = unique_exercise_names(&all);

    let comparisons = compare_exercises(
        &names,
        Contender { user_id: a, records: &a_prs },
        Contender { user_id: b, records: &b_prs },
    );
    for c in &comparisons {
        let fmt = |w: Option<f64>| w.map_or("-".to_string(), |w| format!("{w} kg"));
        let winner = c.winner.as_ref().map_or("-".to_string(), |w| match w.user() {
            Some(id) => data.display_name(id),
            None => "tie".to_string(),
        });
        println!("{:<32} {:>10} {:>10}  {}", c.exercise, fmt(c.a_weight), fmt(c.b_weight), winner);
    }

    let card = tally(&comparisons, a, b);
    println!(
        "score: {} {} - {} {}",
        data.display_name(a),
        card.a.wins,
        card.b.wins,
        data.display_name(b)
    );
    for g in muscle_group_champions(&comparisons, a, b) {
        println!("  {:<16} {} - {}", g.muscle_group, g.a_wins, g.b_wins);
    }

    let (a_stats, b_stats) = (aggregate_stats(&a_workouts), aggregate_stats(&b_workouts));
    let overall = overall_matchup(a, &a_stats, b, &b_stats);
    println!(
        "volume: {:.0} vs {:.0}, workouts: {} vs {}",
        overall.total_volume.a,
        overall.total_volume.b,
        overall.total_workouts.a,
        overall.total_workouts.b
    );
    Ok(())
}

fn run(config: &Config, args: &[String]) -> Result<(), Box<dyn Error>> {
    let blobs = config.blob_store().ok_or("no data directory available")?;
    info!("Using data directory {}", blobs.dir().display());
    let mut store = WorkoutStore::open(blobs)?.with_warn_threshold(config.warn_threshold_mb);
    let today = Local::now().date_naive();

    let arg = |idx: usize| args.get(idx).map(String::as_str);
    match arg(0) {
        Some("summary") => summary(&store),
        Some("compare") => {
            let mut ids = store.snapshot().users.keys().cloned();
            let a = arg(1)
                .map(str::to_string)
                .or_else(|| ids.next())
                .ok_or("need two users")?;
            let b = arg(2)
                .map(str::to_string)
                .or_else(|| ids.find(|id| *id != a))
                .ok_or("need two users")?;
            compare(&store, &a, &b)?;
        }
        Some("export-csv") => {
            let user = arg(1);
            let path = csv_file_name(user, today);
            std::fs::write(&path, export_csv(store.snapshot(), user))?;
            println!("wrote {path}");
        }
        Some("backup") => {
            let path = backup_file_name(today);
            write_backup(store.snapshot(), &path)?;
            println!("wrote {path}");
        }
        Some("restore") => {
            let file = arg(1).ok_or(USAGE)?;
            restore_backup(&mut store, &std::fs::read_to_string(file)?)?;
            println!("restored {} workouts", store.snapshot().workouts.len());
        }
        Some("import-csv") => {
            let file = arg(1).ok_or(USAGE)?;
            let strategy = match arg(2) {
                Some(s) => s.parse::<MergeStrategy>()?,
                None => config.default_import_strategy,
            };
            let s = import_csv(&mut store, &std::fs::read_to_string(file)?, strategy)?;
            println!(
                "imported {}, skipped {}, replaced {} ({} parsed)",
                s.imported, s.skipped, s.replaced, s.total
            );
        }
        Some("set-user") => {
            let id = arg(1).unwrap_or(config.default_user.as_str());
            store.set_current_user(id)?;
            println!("current user: {id}");
        }
        Some("reset") => {
            store.reset()?;
            println!("store reset");
        }
        _ => println!("{USAGE}"),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let config = Config::load();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&config, &args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
