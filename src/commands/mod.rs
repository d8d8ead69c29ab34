pub mod sets;
pub mod views;

pub use sets::{delete_sets, log_set, quick_log, DeleteFailure, DeleteReport, SetInput};
pub use views::{
  dashboard, exercise_detail, list_exercises, personal_records_view, ExerciseDetailView, Suggestion,
};
