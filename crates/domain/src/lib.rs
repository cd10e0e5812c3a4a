#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
mod error;
mod exercise;
mod name;
mod rest_timer;
mod routine;
mod service;
mod session;
mod settings;
mod statistics;
mod workout;

pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use exercise::{
    Category, Equipment, Exercise, ExerciseFilter, ExerciseID, ExerciseRepository,
    ExerciseService, NewExercise, Property,
};
pub use name::{Name, NameError, optional_text};
pub use rest_timer::{DEFAULT_REST_SECONDS, EXTRA_REST_SECONDS, RestTimer};
pub use routine::{
    Routine, RoutineDraft, RoutineExercise, RoutineID, RoutineRepository, RoutineService,
    SaveError, TargetReps, TargetRepsError,
};
pub use service::Service;
pub use session::{ActiveWorkout, SessionError, SessionState, WorkoutSession};
pub use settings::{AppSettings, Language, SettingsRepository, SettingsService, WeightUnit};
pub use statistics::{
    Dashboard, ExerciseHistoryEntry, ExerciseStats, HISTORY_ENTRIES, RECENT_WORKOUTS,
    StatisticsService, WorkoutDetail, exercise_history, personal_record, volume, week_start,
    weekly_volume, workouts_since,
};
pub use workout::{
    ExerciseSets, NewWorkoutSet, RPE, RPEError, Reps, RepsError, Weight, WeightError, Workout,
    WorkoutID, WorkoutRepository, WorkoutService, WorkoutSet, WorkoutSetID, group_by_exercise,
};
