use chrono::Local;
use log::{debug, error, info};

use crate::{
    AppSettings, CreateError, Dashboard, DeleteError, Exercise, ExerciseID, ExerciseRepository,
    ExerciseService, ExerciseStats, Language, Name, NewExercise, ReadError, Routine,
    RoutineExercise, RoutineID, RoutineRepository, RoutineService, SettingsRepository,
    SettingsService, StatisticsService, UpdateError, WeightUnit, Workout, WorkoutDetail,
    WorkoutID, WorkoutRepository, WorkoutService, WorkoutSet, WorkoutSetID, catalog, week_start,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::Unavailable) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn get_exercise(&self, id: ExerciseID) -> Result<Option<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercise(id),
            ReadError,
            "get",
            "exercise"
        )
    }

    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, CreateError> {
        log_on_error!(
            async {
                self.repository
                    .create_exercises(vec![exercise])
                    .await?
                    .pop()
                    .ok_or(CreateError::Other("no exercise created".into()))
            },
            CreateError,
            "create",
            "exercise"
        )
    }

    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
        log_on_error!(
            self.repository.replace_exercise(exercise),
            UpdateError,
            "replace",
            "exercise"
        )
    }

    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(id),
            DeleteError,
            "delete",
            "exercise"
        )
    }

    async fn seed_default_exercises(&self) -> Result<usize, CreateError> {
        let result = log_on_error!(
            async {
                if !self.repository.read_exercises().await?.is_empty() {
                    return Ok(0);
                }
                Ok::<_, CreateError>(self
                    .repository
                    .create_exercises(catalog::default_exercises())
                    .await?
                    .len())
            },
            CreateError,
            "seed",
            "exercises"
        );
        if let Ok(count @ 1..) = result {
            info!("seeded {count} exercises");
        }
        result
    }
}

impl<R: RoutineRepository> RoutineService for Service<R> {
    async fn get_routines(&self) -> Result<Vec<Routine>, ReadError> {
        log_on_error!(
            self.repository.read_routines(),
            ReadError,
            "get",
            "routines"
        )
    }

    async fn get_routine(&self, id: RoutineID) -> Result<Option<Routine>, ReadError> {
        log_on_error!(
            self.repository.read_routine(id),
            ReadError,
            "get",
            "routine"
        )
    }

    async fn create_routine(
        &self,
        name: Name,
        description: Option<String>,
    ) -> Result<Routine, CreateError> {
        log_on_error!(
            self.repository.create_routine(name, description),
            CreateError,
            "create",
            "routine"
        )
    }

    async fn replace_routine(&self, routine: Routine) -> Result<Routine, UpdateError> {
        log_on_error!(
            self.repository.replace_routine(routine),
            UpdateError,
            "replace",
            "routine"
        )
    }

    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError> {
        log_on_error!(
            self.repository.delete_routine(id),
            DeleteError,
            "delete",
            "routine"
        )
    }

    async fn add_routine_exercise(
        &self,
        id: RoutineID,
        exercise_id: ExerciseID,
    ) -> Result<Routine, UpdateError> {
        log_on_error!(
            self.repository.add_routine_exercise(id, exercise_id),
            UpdateError,
            "add",
            "routine exercise"
        )
    }

    async fn remove_routine_exercise(
        &self,
        id: RoutineID,
        exercise_id: ExerciseID,
    ) -> Result<Routine, UpdateError> {
        log_on_error!(
            self.repository.remove_routine_exercise(id, exercise_id),
            UpdateError,
            "remove",
            "routine exercise"
        )
    }

    async fn replace_routine_exercises(
        &self,
        id: RoutineID,
        exercises: Vec<RoutineExercise>,
    ) -> Result<Routine, UpdateError> {
        log_on_error!(
            self.repository.replace_routine_exercises(id, exercises),
            UpdateError,
            "replace",
            "routine exercises"
        )
    }
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        log_on_error!(
            self.repository.read_workouts(),
            ReadError,
            "get",
            "workouts"
        )
    }

    async fn get_workout(&self, id: WorkoutID) -> Result<Option<Workout>, ReadError> {
        log_on_error!(
            self.repository.read_workout(id),
            ReadError,
            "get",
            "workout"
        )
    }

    async fn get_active_workout(&self) -> Result<Option<Workout>, ReadError> {
        log_on_error!(
            self.repository.read_active_workout(),
            ReadError,
            "get",
            "active workout"
        )
    }

    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }

    async fn get_sets(&self, workout_id: WorkoutID) -> Result<Vec<WorkoutSet>, ReadError> {
        log_on_error!(
            self.repository.read_sets(workout_id),
            ReadError,
            "get",
            "workout sets"
        )
    }

    async fn replace_set(&self, set: WorkoutSet) -> Result<WorkoutSet, UpdateError> {
        log_on_error!(
            self.repository.replace_set(set),
            UpdateError,
            "replace",
            "workout set"
        )
    }

    async fn delete_set(&self, id: WorkoutSetID) -> Result<WorkoutSetID, DeleteError> {
        log_on_error!(
            self.repository.delete_set(id),
            DeleteError,
            "delete",
            "workout set"
        )
    }
}

impl<R: WorkoutRepository> StatisticsService for Service<R> {
    async fn get_dashboard(&self) -> Result<Dashboard, ReadError> {
        log_on_error!(
            async {
                let now = Local::now();
                let since = week_start(&now);
                let workouts = self.repository.read_workouts().await?;
                let mut sets = vec![];
                for workout in workouts
                    .iter()
                    .filter(|w| !w.is_active() && w.start_time >= since)
                {
                    sets.extend(self.repository.read_sets(workout.id).await?);
                }
                Ok::<_, ReadError>(Dashboard::new(&workouts, &sets, &now))
            },
            ReadError,
            "get",
            "dashboard"
        )
    }

    async fn get_exercise_stats(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<ExerciseStats, ReadError> {
        log_on_error!(
            async {
                let workouts = self.repository.read_workouts().await?;
                let sets = self.repository.read_exercise_sets(exercise_id).await?;
                Ok::<_, ReadError>(ExerciseStats::new(&workouts, &sets))
            },
            ReadError,
            "get",
            "exercise stats"
        )
    }

    async fn get_workout_detail(&self, id: WorkoutID) -> Result<Option<WorkoutDetail>, ReadError> {
        log_on_error!(
            async {
                let Some(workout) = self.repository.read_workout(id).await? else {
                    return Ok(None);
                };
                let sets = self.repository.read_sets(id).await?;
                Ok::<_, ReadError>(Some(WorkoutDetail::new(workout, &sets)))
            },
            ReadError,
            "get",
            "workout detail"
        )
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    async fn get_settings(&self) -> Result<AppSettings, ReadError> {
        log_on_error!(
            self.repository.read_settings(),
            ReadError,
            "get",
            "settings"
        )
    }

    async fn set_language(&self, language: Language) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_language(language),
            UpdateError,
            "set",
            "language"
        )
    }

    async fn set_weight_unit(&self, weight_unit: WeightUnit) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_weight_unit(weight_unit),
            UpdateError,
            "set",
            "weight unit"
        )
    }
}
