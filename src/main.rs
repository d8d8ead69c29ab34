//! Command-line front end for the training log.
//!
//! Usage:
//! ```bash
//! overload-log log --exercise "Bench Press" --weight 60 --unit kg --reps 5
//! overload-log quick-log --exercise "Bench Press" --reps 6
//! overload-log detail "Bench Press" --ai
//! overload-log prs --json
//! overload-log delete 12 13
//! ```

use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use overload_log_lib::analysis::Overview;
use overload_log_lib::commands::{self, DeleteReport, ExerciseDetailView, SetInput};
use overload_log_lib::config::AppConfig;
use overload_log_lib::llm::{ClaudeAdvisor, ClaudeClient};
use overload_log_lib::models::{LoggedSet, PersonalRecord};
use overload_log_lib::view::ViewState;
use overload_log_lib::{AppError, GoalAdvisor, RuleBasedAdvisor, Session, WeightUnit};

#[derive(Parser)]
#[command(
  name = "overload-log",
  about = "Progressive overload training log",
  long_about = "Log weightlifting sets, track top sets and PRs, and get next-session targets"
)]
struct Cli {
  /// Print results as JSON
  #[arg(long, global = true)]
  json: bool,

  /// Enable verbose logging
  #[arg(long, short = 'v', global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Log a set
  Log {
    #[arg(long)]
    exercise: String,
    #[arg(long)]
    weight: f64,
    /// lb or kg (defaults to OVERLOAD_DEFAULT_UNIT, then lb)
    #[arg(long)]
    unit: Option<WeightUnit>,
    #[arg(long)]
    reps: u32,
    #[arg(long)]
    rpe: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// YYYY-MM-DD, defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
  },
  /// Repeat the last session's top-set weight
  QuickLog {
    #[arg(long)]
    exercise: String,
    /// Defaults to the reps of the last top set
    #[arg(long)]
    reps: Option<u32>,
    #[arg(long)]
    date: Option<NaiveDate>,
  },
  /// List logged exercises
  Exercises,
  /// Overview, exercises and PRs
  Dashboard,
  /// Top-set history and next-goal suggestion for one exercise
  Detail {
    exercise: String,
    /// Ask Claude for the suggestion (needs ANTHROPIC_API_KEY)
    #[arg(long)]
    ai: bool,
  },
  /// Lifetime personal records
  Prs,
  /// Delete sets by id
  Delete {
    #[arg(required = true)]
    ids: Vec<i64>,
  },
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let log_level = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(log_level)
    .with_writer(std::io::stderr)
    .init();

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("Error: {}", e);
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> Result<(), AppError> {
  let config = AppConfig::load()?;
  let session = Session::open(&config).await?;
  let today = Local::now().date_naive();

  match cli.command {
    Command::Log {
      exercise,
      weight,
      unit,
      reps,
      rpe,
      notes,
      date,
    } => {
      let input = SetInput {
        date: date.unwrap_or(today),
        exercise,
        weight,
        unit: unit.unwrap_or(config.default_unit),
        reps,
        rpe,
        notes,
      };
      let stored = commands::log_set(&session, input).await?;
      emit(cli.json, &stored, print_logged);
    }
    Command::QuickLog {
      exercise,
      reps,
      date,
    } => {
      let stored = commands::quick_log(&session, &exercise, reps, date.unwrap_or(today)).await?;
      emit(cli.json, &stored, print_logged);
    }
    Command::Exercises => {
      let exercises = commands::list_exercises(&session).await?;
      emit(cli.json, &exercises, |list| {
        if list.is_empty() {
          println!("Log data to see exercises.");
        }
        for name in list {
          println!("{}", name);
        }
      });
    }
    Command::Dashboard => {
      let state = ViewState::load(&session, &RuleBasedAdvisor, None).await?;
      emit(cli.json, &state, |s| {
        print_overview(&s.overview);
        println!();
        print_records(&s.records);
      });
    }
    Command::Detail { exercise, ai } => {
      let advisor: Box<dyn GoalAdvisor> = if ai {
        let client = ClaudeClient::from_key(config.anthropic_api_key.as_deref())
          .map_err(|e| AppError::Config(e.to_string()))?;
        Box::new(ClaudeAdvisor::new(client))
      } else {
        Box::new(RuleBasedAdvisor)
      };
      info!(advisor = advisor.name(), exercise = %exercise, "Building exercise detail");
      let view = commands::exercise_detail(&session, &exercise, advisor.as_ref()).await?;
      emit(cli.json, &view, print_detail);
    }
    Command::Prs => {
      let records = commands::personal_records_view(&session).await?;
      emit(cli.json, &records, |r| print_records(r));
    }
    Command::Delete { ids } => {
      let report = commands::delete_sets(&session, &ids).await?;
      emit(cli.json, &report, print_delete_report);
    }
  }

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Output
/// ---------------------------------------------------------------------------

fn emit<T: Serialize>(json: bool, value: &T, print: impl FnOnce(&T)) {
  if json {
    match serde_json::to_string_pretty(value) {
      Ok(text) => println!("{}", text),
      Err(e) => eprintln!("Failed to encode JSON: {}", e),
    }
  } else {
    print(value);
  }
}

fn format_set(set: &LoggedSet) -> String {
  let mut line = format!(
    "#{:<5} {}  {:<20} {:>7.1} lb x {}",
    set.id, set.date, set.exercise, set.weight, set.reps
  );
  if let Some(rpe) = &set.rpe {
    line.push_str(&format!("  @RPE {}", rpe));
  }
  if let Some(notes) = &set.notes {
    line.push_str(&format!("  ({})", notes));
  }
  line
}

fn print_logged(set: &LoggedSet) {
  println!("Logged {}: {:.1} lb x {}", set.exercise, set.weight, set.reps);
}

fn print_overview(overview: &Overview) {
  if overview.total_sets == 0 {
    println!("No data yet. Log your first set with `overload-log log`.");
    return;
  }

  println!("Total sets:  {}", overview.total_sets);
  println!("Exercises:   {}", overview.exercise_count);
  if let Some(last) = overview.last_logged {
    println!("Last logged: {}", last);
  }
  println!();
  println!("Recent entries:");
  for set in &overview.recent {
    println!("  {}", format_set(set));
  }
}

fn print_records(records: &[PersonalRecord]) {
  if records.is_empty() {
    println!("No data yet.");
    return;
  }

  println!("{:<24} {:>12} {:>12}", "Exercise", "Best (lb)", "Best e1RM");
  for pr in records {
    println!(
      "{:<24} {:>12.1} {:>12.1}",
      pr.exercise, pr.best_weight, pr.best_estimated_one_rep_max
    );
  }
}

fn print_detail(view: &ExerciseDetailView) {
  if view.sets.is_empty() {
    println!("No sets yet for {}.", view.exercise);
    return;
  }

  println!("{}", view.exercise);
  if let Some(last) = &view.last_top_set {
    println!("Last top set on {}: {:.0} lb x {}", last.date, last.weight, last.reps);
  }

  println!();
  println!("Top set per day:");
  for top in &view.top_sets {
    println!("  {}  {:>7.1} lb", top.date, top.top_weight);
  }

  println!();
  println!("Suggestion ({}): {}", view.suggestion.source, view.suggestion.text);

  println!();
  println!("All sets:");
  for set in &view.sets {
    println!("  {}", format_set(set));
  }
}

fn print_delete_report(report: &DeleteReport) {
  println!("Deleted {} record(s).", report.deleted_count());
  for failure in &report.failures {
    println!("  Error deleting entry {}: {}", failure.id, failure.reason);
  }
}
