use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};

use crate::{
    CreateError, DeleteError, ExerciseID, Name, NameError, ReadError, UpdateError, optional_text,
};

#[allow(async_fn_in_trait)]
pub trait RoutineService {
    async fn get_routines(&self) -> Result<Vec<Routine>, ReadError>;
    async fn get_routine(&self, id: RoutineID) -> Result<Option<Routine>, ReadError>;
    async fn create_routine(
        &self,
        name: Name,
        description: Option<String>,
    ) -> Result<Routine, CreateError>;
    async fn replace_routine(&self, routine: Routine) -> Result<Routine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;
    async fn add_routine_exercise(
        &self,
        id: RoutineID,
        exercise_id: ExerciseID,
    ) -> Result<Routine, UpdateError>;
    async fn remove_routine_exercise(
        &self,
        id: RoutineID,
        exercise_id: ExerciseID,
    ) -> Result<Routine, UpdateError>;
    async fn replace_routine_exercises(
        &self,
        id: RoutineID,
        exercises: Vec<RoutineExercise>,
    ) -> Result<Routine, UpdateError>;

    /// Store the draft as a new routine or as an update of an existing one.
    async fn save_routine(&self, draft: &RoutineDraft) -> Result<RoutineID, SaveError> {
        if draft.name.trim().is_empty() {
            return Err(SaveError::MissingName);
        }
        let name = Name::new(&draft.name)?;
        let description = optional_text(&draft.description);
        let id = match draft.id {
            Some(id) => {
                let Some(routine) = self.get_routine(id).await.map_err(UpdateError::from)?
                else {
                    return Err(SaveError::Update(UpdateError::NotFound));
                };
                self.replace_routine(Routine {
                    name,
                    description,
                    ..routine
                })
                .await?
                .id
            }
            None => self.create_routine(name, description).await?.id,
        };
        self.replace_routine_exercises(id, draft.exercises.clone())
            .await?;
        Ok(id)
    }
}

#[allow(async_fn_in_trait)]
pub trait RoutineRepository {
    /// All routines with their exercises, newest first.
    async fn read_routines(&self) -> Result<Vec<Routine>, ReadError>;
    async fn read_routine(&self, id: RoutineID) -> Result<Option<Routine>, ReadError>;
    async fn create_routine(
        &self,
        name: Name,
        description: Option<String>,
    ) -> Result<Routine, CreateError>;
    /// Change name and description. The exercise list is left untouched.
    async fn replace_routine(&self, routine: Routine) -> Result<Routine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;
    /// Append the exercise with default targets.
    async fn add_routine_exercise(
        &self,
        id: RoutineID,
        exercise_id: ExerciseID,
    ) -> Result<Routine, UpdateError>;
    async fn remove_routine_exercise(
        &self,
        id: RoutineID,
        exercise_id: ExerciseID,
    ) -> Result<Routine, UpdateError>;
    /// Replace all exercises of the routine. The order indices are reassigned from 0.
    async fn replace_routine_exercises(
        &self,
        id: RoutineID,
        exercises: Vec<RoutineExercise>,
    ) -> Result<Routine, UpdateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub id: RoutineID,
    pub name: Name,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub exercises: Vec<RoutineExercise>,
}

impl Routine {
    #[must_use]
    pub fn num_exercises(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn num_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.target_sets).sum()
    }

    #[must_use]
    pub fn contains(&self, exercise_id: ExerciseID) -> bool {
        self.exercises.iter().any(|e| e.exercise_id == exercise_id)
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutineID(i64);

impl From<i64> for RoutineID {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineExercise {
    pub exercise_id: ExerciseID,
    pub order_index: u32,
    pub target_sets: u32,
    pub target_reps: TargetReps,
}

impl RoutineExercise {
    pub const DEFAULT_TARGET_SETS: u32 = 3;

    #[must_use]
    pub fn new(exercise_id: ExerciseID, order_index: u32) -> Self {
        Self {
            exercise_id,
            order_index,
            target_sets: Self::DEFAULT_TARGET_SETS,
            target_reps: TargetReps::default(),
        }
    }
}

/// Number of repetitions a routine aims for in each set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetReps {
    Exact(u32),
    Range { min: u32, max: u32 },
    Amrap,
}

impl Default for TargetReps {
    fn default() -> Self {
        TargetReps::Range { min: 8, max: 12 }
    }
}

impl fmt::Display for TargetReps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetReps::Exact(reps) => write!(f, "{reps}"),
            TargetReps::Range { min, max } => write!(f, "{min}-{max}"),
            TargetReps::Amrap => write!(f, "AMRAP"),
        }
    }
}

impl FromStr for TargetReps {
    type Err = TargetRepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("amrap") {
            return Ok(TargetReps::Amrap);
        }

        let parse = |value: &str| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| TargetRepsError::ParseError)
        };

        match s.split_once('-') {
            Some((min, max)) => {
                let (min, max) = (parse(min)?, parse(max)?);
                if min > max {
                    return Err(TargetRepsError::InvalidRange);
                }
                Ok(TargetReps::Range { min, max })
            }
            None => Ok(TargetReps::Exact(parse(s)?)),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TargetRepsError {
    #[error("Target reps must be a number, a range like 8-12 or AMRAP")]
    ParseError,
    #[error("Lower bound of target reps must not exceed upper bound")]
    InvalidRange,
}

/// Unsaved state of a routine being edited.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoutineDraft {
    pub id: Option<RoutineID>,
    pub name: String,
    pub description: String,
    pub exercises: Vec<RoutineExercise>,
}

impl RoutineDraft {
    #[must_use]
    pub fn from_routine(routine: &Routine) -> Self {
        let mut draft = Self {
            id: Some(routine.id),
            name: routine.name.to_string(),
            description: routine.description.clone().unwrap_or_default(),
            exercises: routine.exercises.clone(),
        };
        draft.exercises.sort_by_key(|e| e.order_index);
        draft.renumber();
        draft
    }

    /// Append the exercise with default targets unless it is already part of the draft.
    pub fn add_exercise(&mut self, exercise_id: ExerciseID) {
        if self.exercises.iter().any(|e| e.exercise_id == exercise_id) {
            return;
        }
        self.exercises
            .push(RoutineExercise::new(exercise_id, self.next_index()));
    }

    pub fn remove_exercise(&mut self, exercise_id: ExerciseID) {
        self.exercises.retain(|e| e.exercise_id != exercise_id);
        self.renumber();
    }

    pub fn set_target_sets(&mut self, index: usize, target_sets: u32) {
        if let Some(exercise) = self.exercises.get_mut(index) {
            exercise.target_sets = target_sets;
        }
    }

    pub fn set_target_reps(&mut self, index: usize, target_reps: TargetReps) {
        if let Some(exercise) = self.exercises.get_mut(index) {
            exercise.target_reps = target_reps;
        }
    }

    pub fn move_exercise_up(&mut self, index: usize) {
        if index == 0 || index >= self.exercises.len() {
            return;
        }
        self.exercises.swap(index - 1, index);
        self.renumber();
    }

    pub fn move_exercise_down(&mut self, index: usize) {
        if index >= self.exercises.len().saturating_sub(1) {
            return;
        }
        self.exercises.swap(index, index + 1);
        self.renumber();
    }

    /// Reassign order indices according to the position in the list.
    pub fn renumber(&mut self) {
        for (index, exercise) in (0..).zip(self.exercises.iter_mut()) {
            exercise.order_index = index;
        }
    }

    fn next_index(&self) -> u32 {
        u32::try_from(self.exercises.len()).unwrap_or(u32::MAX)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("Please enter a routine name")]
    MissingName,
    #[error(transparent)]
    Name(#[from] NameError),
    #[error("Failed to save routine: {0}")]
    Create(#[from] CreateError),
    #[error("Failed to save routine: {0}")]
    Update(#[from] UpdateError),
}
