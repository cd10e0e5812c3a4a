use chrono::Utc;
use log::{debug, info};

use crate::{
    CreateError, DeleteError, ExerciseID, ExerciseSets, NewWorkoutSet, RPE, ReadError, Reps,
    Routine, RoutineID, RoutineRepository, UpdateError, Weight, Workout, WorkoutID,
    WorkoutRepository, WorkoutSet, WorkoutSetID, group_by_exercise, optional_text,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    NoActiveWorkout,
    Active(ActiveWorkout),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveWorkout {
    pub workout: Workout,
    pub routine: Option<Routine>,
    /// Logged sets in the order they were added.
    pub sets: Vec<WorkoutSet>,
}

impl ActiveWorkout {
    #[must_use]
    pub fn exercises(&self) -> Vec<ExerciseSets> {
        group_by_exercise(&self.sets)
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(WorkoutSet::volume).sum()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("No active workout")]
    NoActiveWorkout,
    #[error("A workout is already active")]
    AlreadyActive,
    #[error("Routine not found")]
    RoutineNotFound,
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error(transparent)]
    Delete(#[from] DeleteError),
}

/// Owner of the single current workout.
///
/// All changes of the active workout go through this type, so that at most one workout is
/// active at any time.
pub struct WorkoutSession<R> {
    repository: R,
    state: SessionState,
}

impl<R> WorkoutSession<R>
where
    R: WorkoutRepository + RoutineRepository,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            state: SessionState::Loading,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn active(&self) -> Option<&ActiveWorkout> {
        match &self.state {
            SessionState::Active(active) => Some(active),
            SessionState::Loading | SessionState::NoActiveWorkout => None,
        }
    }

    /// Load the unfinished workout left by a previous run, if any.
    pub async fn restore(&mut self) -> Result<&SessionState, ReadError> {
        self.state = match self.repository.read_active_workout().await? {
            Some(workout) => {
                debug!("restoring workout {}", workout.id);
                let sets = self.repository.read_sets(workout.id).await?;
                let routine = match workout.routine_id {
                    Some(routine_id) => self.repository.read_routine(routine_id).await?,
                    None => None,
                };
                SessionState::Active(ActiveWorkout {
                    workout,
                    routine,
                    sets,
                })
            }
            None => SessionState::NoActiveWorkout,
        };
        Ok(&self.state)
    }

    pub async fn start_workout(
        &mut self,
        routine_id: Option<RoutineID>,
    ) -> Result<&ActiveWorkout, SessionError> {
        if matches!(self.state, SessionState::Loading) {
            self.restore().await?;
        }

        if self.active().is_some() {
            return Err(SessionError::AlreadyActive);
        }

        let routine = match routine_id {
            Some(id) => Some(
                self.repository
                    .read_routine(id)
                    .await?
                    .ok_or(SessionError::RoutineNotFound)?,
            ),
            None => None,
        };

        let workout = self
            .repository
            .create_workout(routine_id, Utc::now())
            .await?;
        info!("started workout {}", workout.id);

        self.state = SessionState::Active(ActiveWorkout {
            workout,
            routine,
            sets: vec![],
        });

        self.active().ok_or(SessionError::NoActiveWorkout)
    }

    pub async fn add_set(
        &mut self,
        exercise_id: ExerciseID,
        weight: Weight,
        reps: Reps,
        rpe: Option<RPE>,
    ) -> Result<WorkoutSet, SessionError> {
        let workout_id = self.active_workout_id()?;
        let set = self
            .repository
            .create_set(NewWorkoutSet {
                workout_id,
                exercise_id,
                weight,
                reps,
                rpe,
            })
            .await?;
        debug!(
            "logged set {} of exercise {exercise_id} in workout {workout_id}",
            set.set_number
        );
        if let SessionState::Active(active) = &mut self.state {
            active.sets.push(set);
        }
        Ok(set)
    }

    pub async fn update_set(&mut self, set: WorkoutSet) -> Result<WorkoutSet, SessionError> {
        let workout_id = self.active_workout_id()?;
        if set.workout_id != workout_id {
            return Err(UpdateError::NotFound.into());
        }
        let set = self.repository.replace_set(set).await?;
        if let SessionState::Active(active) = &mut self.state {
            if let Some(s) = active.sets.iter_mut().find(|s| s.id == set.id) {
                *s = set;
            }
        }
        Ok(set)
    }

    pub async fn delete_set(&mut self, id: WorkoutSetID) -> Result<WorkoutSetID, SessionError> {
        let workout_id = self.active_workout_id()?;
        if !self
            .active()
            .is_some_and(|active| active.sets.iter().any(|s| s.id == id))
        {
            return Err(UpdateError::NotFound.into());
        }
        self.repository.delete_set(id).await?;
        let sets = self.repository.read_sets(workout_id).await?;
        if let SessionState::Active(active) = &mut self.state {
            active.sets = sets;
        }
        Ok(id)
    }

    /// Complete the workout. Blank notes are stored as absent.
    pub async fn finish_workout(&mut self, notes: &str) -> Result<Workout, SessionError> {
        let workout_id = self.active_workout_id()?;
        let workout = self
            .repository
            .finish_workout(workout_id, Utc::now(), optional_text(notes))
            .await?;
        info!("finished workout {workout_id}");
        self.state = SessionState::NoActiveWorkout;
        Ok(workout)
    }

    /// Discard the workout together with all its sets.
    pub async fn cancel_workout(&mut self) -> Result<WorkoutID, SessionError> {
        let workout_id = self.active_workout_id()?;
        self.repository.delete_workout(workout_id).await?;
        info!("cancelled workout {workout_id}");
        self.state = SessionState::NoActiveWorkout;
        Ok(workout_id)
    }

    fn active_workout_id(&self) -> Result<WorkoutID, SessionError> {
        self.active()
            .map(|active| active.workout.id)
            .ok_or(SessionError::NoActiveWorkout)
    }
}
