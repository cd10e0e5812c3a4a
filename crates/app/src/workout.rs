use gymtracker_domain::{self as domain, RoutineRepository, WorkoutRepository};
use tokio::sync::watch;

use crate::timer::RestTimerDriver;

/// Active workout together with the rest timer between its sets.
pub struct WorkoutController<R> {
    session: domain::WorkoutSession<R>,
    timer: RestTimerDriver,
    rest_seconds: u32,
}

impl<R> WorkoutController<R>
where
    R: WorkoutRepository + RoutineRepository,
{
    pub fn new(repository: R, rest_seconds: u32) -> Self {
        Self {
            session: domain::WorkoutSession::new(repository),
            timer: RestTimerDriver::new(),
            rest_seconds,
        }
    }

    pub fn state(&self) -> &domain::SessionState {
        self.session.state()
    }

    pub fn active(&self) -> Option<&domain::ActiveWorkout> {
        self.session.active()
    }

    pub fn rest_timer(&self) -> watch::Receiver<domain::RestTimer> {
        self.timer.subscribe()
    }

    pub async fn restore(&mut self) -> Result<&domain::SessionState, domain::ReadError> {
        self.session.restore().await
    }

    pub async fn start_workout(
        &mut self,
        routine_id: Option<domain::RoutineID>,
    ) -> Result<&domain::ActiveWorkout, domain::SessionError> {
        self.session.start_workout(routine_id).await
    }

    /// Log a set and start the rest period after it.
    pub async fn add_set(
        &mut self,
        exercise_id: domain::ExerciseID,
        weight: domain::Weight,
        reps: domain::Reps,
        rpe: Option<domain::RPE>,
    ) -> Result<domain::WorkoutSet, domain::SessionError> {
        let set = self
            .session
            .add_set(exercise_id, weight, reps, rpe)
            .await?;
        self.timer.start(self.rest_seconds);
        Ok(set)
    }

    pub async fn update_set(
        &mut self,
        set: domain::WorkoutSet,
    ) -> Result<domain::WorkoutSet, domain::SessionError> {
        self.session.update_set(set).await
    }

    pub async fn delete_set(
        &mut self,
        id: domain::WorkoutSetID,
    ) -> Result<domain::WorkoutSetID, domain::SessionError> {
        self.session.delete_set(id).await
    }

    pub fn extend_rest(&mut self) {
        self.timer.add(domain::EXTRA_REST_SECONDS);
    }

    pub fn skip_rest(&mut self) {
        self.timer.stop();
    }

    pub async fn finish_workout(
        &mut self,
        notes: &str,
    ) -> Result<domain::Workout, domain::SessionError> {
        let workout = self.session.finish_workout(notes).await?;
        self.timer.stop();
        Ok(workout)
    }

    pub async fn cancel_workout(&mut self) -> Result<domain::WorkoutID, domain::SessionError> {
        let id = self.session.cancel_workout().await?;
        self.timer.stop();
        Ok(id)
    }
}
