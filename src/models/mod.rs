pub mod exercise;
pub mod lift;
pub mod recommendation;
pub mod split;

pub use exercise::{Exercise, ExerciseRow, ExerciseTarget, NewExercise};
pub use lift::{LiftRow, LoggedSet};
pub use recommendation::{DailyBest, MaxEstimate, Recommendation, WarmupSet};
pub use split::{Split, SplitDay, UserInfo, WorkoutSession};
