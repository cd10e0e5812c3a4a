use std::fmt;

use chrono::{DateTime, Utc};
use derive_more::{Deref, Display, Into};

use crate::{CreateError, DeleteError, ExerciseID, ReadError, RoutineID, UpdateError};

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    async fn get_workout(&self, id: WorkoutID) -> Result<Option<Workout>, ReadError>;
    async fn get_active_workout(&self) -> Result<Option<Workout>, ReadError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
    async fn get_sets(&self, workout_id: WorkoutID) -> Result<Vec<WorkoutSet>, ReadError>;
    async fn replace_set(&self, set: WorkoutSet) -> Result<WorkoutSet, UpdateError>;
    async fn delete_set(&self, id: WorkoutSetID) -> Result<WorkoutSetID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    /// All workouts, most recently started first.
    async fn read_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    async fn read_workout(&self, id: WorkoutID) -> Result<Option<Workout>, ReadError>;
    /// The most recently started workout without end time.
    async fn read_active_workout(&self) -> Result<Option<Workout>, ReadError>;
    /// Fails with a conflict if another workout is still active.
    async fn create_workout(
        &self,
        routine_id: Option<RoutineID>,
        start_time: DateTime<Utc>,
    ) -> Result<Workout, CreateError>;
    async fn finish_workout(
        &self,
        id: WorkoutID,
        end_time: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<Workout, UpdateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
    /// Sets of a workout in the order they were logged.
    async fn read_sets(&self, workout_id: WorkoutID) -> Result<Vec<WorkoutSet>, ReadError>;
    async fn read_exercise_sets(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<Vec<WorkoutSet>, ReadError>;
    /// The set number is one more than the number of sets already logged for the exercise in
    /// the workout.
    async fn create_set(&self, set: NewWorkoutSet) -> Result<WorkoutSet, CreateError>;
    /// Replace weight, reps and RPE of a logged set.
    async fn replace_set(&self, set: WorkoutSet) -> Result<WorkoutSet, UpdateError>;
    async fn delete_set(&self, id: WorkoutSetID) -> Result<WorkoutSetID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub routine_id: Option<RoutineID>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Workout {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    #[must_use]
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end_time| end_time - self.start_time)
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(i64);

impl From<i64> for WorkoutID {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutSet {
    pub id: WorkoutSetID,
    pub workout_id: WorkoutID,
    pub exercise_id: ExerciseID,
    pub set_number: u32,
    pub weight: Weight,
    pub reps: Reps,
    pub rpe: Option<RPE>,
}

impl WorkoutSet {
    /// Weight times reps.
    #[must_use]
    pub fn volume(&self) -> f64 {
        f64::from(f32::from(self.weight)) * f64::from(u32::from(self.reps))
    }
}

/// Set that has not been stored yet. The set number is assigned when storing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewWorkoutSet {
    pub workout_id: WorkoutID,
    pub exercise_id: ExerciseID,
    pub weight: Weight,
    pub reps: Reps,
    pub rpe: Option<RPE>,
}

impl NewWorkoutSet {
    #[must_use]
    pub fn with_id(self, id: WorkoutSetID, set_number: u32) -> WorkoutSet {
        WorkoutSet {
            id,
            workout_id: self.workout_id,
            exercise_id: self.exercise_id,
            set_number,
            weight: self.weight,
            reps: self.reps,
            rpe: self.rpe,
        }
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutSetID(i64);

impl From<i64> for WorkoutSetID {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Sets of one exercise within a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSets {
    pub exercise_id: ExerciseID,
    pub sets: Vec<WorkoutSet>,
}

impl ExerciseSets {
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(WorkoutSet::volume).sum()
    }
}

/// Group sets by exercise in order of the first appearance of each exercise.
#[must_use]
pub fn group_by_exercise(sets: &[WorkoutSet]) -> Vec<ExerciseSets> {
    let mut groups: Vec<ExerciseSets> = vec![];
    for set in sets {
        match groups.iter_mut().find(|g| g.exercise_id == set.exercise_id) {
            Some(group) => group.sets.push(*set),
            None => groups.push(ExerciseSets {
                exercise_id: set.exercise_id,
                sets: vec![*set],
            }),
        }
    }
    for group in &mut groups {
        group.sets.sort_by_key(|s| s.set_number);
    }
    groups
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// Weight in the unit chosen by the user.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !value.is_finite() || !(0.0..10000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0 to 9999.9")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// Rating of perceived exertion.
#[derive(Debug, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct RPE(u8);

impl RPE {
    pub fn new(value: u8) -> Result<Self, RPEError> {
        if !(1..=10).contains(&value) {
            return Err(RPEError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for RPE {
    type Error = RPEError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u8>() {
            Ok(parsed_value) => RPE::new(parsed_value),
            Err(_) => Err(RPEError::ParseError),
        }
    }
}

impl fmt::Display for RPE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPE {}", self.0)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RPEError {
    #[error("RPE must be in the range 1 to 10")]
    OutOfRange,
    #[error("RPE must be an integer")]
    ParseError,
}
