//! Command-line surface: argument definitions and dispatch to commands

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::commands::{self, exercise as exercise_cmd, split as split_cmd, workout};
use crate::db::AppState;
use crate::session::WorkingSetDraft;

#[derive(Debug, Parser)]
#[command(
  name = "lift-log",
  version,
  about = "Progressive-overload coach: e1RM estimates, working-set loads and warm-up ramps"
)]
pub struct Cli {
  /// SQLite file (overrides LIFT_LOG_DB)
  #[arg(long, global = true)]
  pub db: Option<PathBuf>,

  /// Whose history and exercises to use
  #[arg(long, short, env = "LIFT_LOG_USER", default_value = "local", global = true)]
  pub user: String,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Manage the exercise catalog
  #[command(subcommand)]
  Exercise(ExerciseCommand),

  /// Manage training splits and pick the active one
  #[command(subcommand)]
  Split(SplitCommand),

  /// Today's workout on the active split
  #[command(subcommand)]
  Workout(WorkoutCommand),

  /// Log working sets, e.g. `--set 185x5 --set 185x4`
  Log {
    #[arg(long)]
    exercise: i64,
    #[arg(long = "set", value_parser = parse_set_arg, required = true)]
    sets: Vec<WorkingSetDraft>,
  },

  /// Delete one logged set
  Unlog {
    #[arg(long)]
    set_id: i64,
  },

  /// Working-set load and warm-up ramp for an exercise
  Recommend {
    #[arg(long)]
    exercise: i64,
  },

  /// Best estimated max per day for an exercise
  Progress {
    #[arg(long)]
    exercise: i64,
  },
}

#[derive(Debug, Subcommand)]
pub enum ExerciseCommand {
  Add {
    #[arg(long)]
    name: String,
    /// Split day id to place the exercise on
    #[arg(long)]
    day: Option<i64>,
    #[arg(long, default_value = "")]
    warmups: String,
    #[arg(long, default_value = "")]
    working: String,
    /// "8" or "6-8"
    #[arg(long, default_value = "")]
    reps: String,
    /// Target effort, 6-10
    #[arg(long, default_value = "")]
    rpe: String,
  },
  /// Import `name, warmups, working, reps, rpe` lines from a file
  Import {
    file: PathBuf,
    /// Split day id to place the exercises on
    #[arg(long)]
    day: Option<i64>,
  },
  List,
  Edit {
    #[arg(long)]
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    warmups: Option<String>,
    #[arg(long)]
    working: Option<String>,
    #[arg(long)]
    reps: Option<String>,
    #[arg(long)]
    rpe: Option<String>,
    /// Move to the end of this split day
    #[arg(long)]
    day: Option<i64>,
  },
  Remove {
    #[arg(long)]
    id: i64,
  },
}

#[derive(Debug, Subcommand)]
pub enum SplitCommand {
  Create {
    #[arg(long)]
    name: String,
    /// 1-7
    #[arg(long)]
    days: String,
  },
  List,
  Show {
    #[arg(long)]
    id: i64,
  },
  RenameDay {
    #[arg(long)]
    split: i64,
    #[arg(long)]
    day: i32,
    #[arg(long)]
    name: String,
  },
  /// Make a split active and restart at day 1
  Use {
    #[arg(long)]
    id: i64,
  },
  Remove {
    #[arg(long)]
    id: i64,
  },
}

#[derive(Debug, Subcommand)]
pub enum WorkoutCommand {
  /// Current day, its exercises and the open session
  Status,
  /// Open a session for the current day
  Start,
  /// Complete the session and advance to the next day
  Finish,
}

/// `WEIGHTxREPS`, e.g. `185x5`. Values are validated when the sets are logged.
pub fn parse_set_arg(s: &str) -> Result<WorkingSetDraft, String> {
  let (weight, reps) = s
    .split_once(['x', 'X'])
    .ok_or_else(|| format!("expected WEIGHTxREPS, got '{}'", s))?;

  Ok(WorkingSetDraft {
    weight: weight.trim().to_string(),
    reps: reps.trim().to_string(),
  })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
  let json = serde_json::to_string_pretty(value)
    .map_err(|e| format!("Failed to serialize output: {}", e))?;
  println!("{}", json);
  Ok(())
}

/// Run one parsed command against the store
pub async fn dispatch(state: &AppState, user_id: &str, command: Command) -> Result<(), String> {
  match command {
    Command::Exercise(cmd) => match cmd {
      ExerciseCommand::Add {
        name,
        day,
        warmups,
        working,
        reps,
        rpe,
      } => {
        let fields = exercise_cmd::ExerciseFields {
          name,
          warmups,
          working,
          reps,
          rpe,
        };
        print_json(&exercise_cmd::add_exercise(state, user_id, day, &fields).await?)
      }
      ExerciseCommand::Import { file, day } => {
        let text = std::fs::read_to_string(&file)
          .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
        print_json(&exercise_cmd::import_exercises(state, user_id, day, &text).await?)
      }
      ExerciseCommand::List => print_json(&exercise_cmd::list_exercises(state, user_id).await?),
      ExerciseCommand::Edit {
        id,
        name,
        warmups,
        working,
        reps,
        rpe,
        day,
      } => {
        let edit = exercise_cmd::ExerciseEdit {
          name,
          warmups,
          working,
          reps,
          rpe,
          split_day_id: day,
        };
        print_json(&exercise_cmd::edit_exercise(state, user_id, id, edit).await?)
      }
      ExerciseCommand::Remove { id } => exercise_cmd::remove_exercise(state, user_id, id).await,
    },
    Command::Split(cmd) => match cmd {
      SplitCommand::Create { name, days } => {
        print_json(&split_cmd::create_split(state, user_id, &name, &days).await?)
      }
      SplitCommand::List => print_json(&split_cmd::list_splits(state, user_id).await?),
      SplitCommand::Show { id } => print_json(&split_cmd::show_split(state, user_id, id).await?),
      SplitCommand::RenameDay { split, day, name } => {
        print_json(&split_cmd::rename_day(state, user_id, split, day, &name).await?)
      }
      SplitCommand::Use { id } => print_json(&split_cmd::use_split(state, user_id, id).await?),
      SplitCommand::Remove { id } => split_cmd::remove_split(state, user_id, id).await,
    },
    Command::Workout(cmd) => match cmd {
      WorkoutCommand::Status => print_json(&workout::workout_status(state, user_id).await?),
      WorkoutCommand::Start => print_json(&workout::start_workout(state, user_id).await?),
      WorkoutCommand::Finish => print_json(&workout::finish_workout(state, user_id).await?),
    },
    Command::Log { exercise, sets } => {
      print_json(&commands::log_sets(state, user_id, exercise, &sets).await?)
    }
    Command::Unlog { set_id } => commands::delete_logged_set(state, user_id, set_id).await,
    Command::Recommend { exercise } => {
      print_json(&commands::get_recommendation(state, user_id, exercise).await?)
    }
    Command::Progress { exercise } => {
      print_json(&commands::get_progress(state, user_id, exercise).await?)
    }
  }
}
