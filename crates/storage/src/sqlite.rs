use std::{collections::BTreeMap, path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use gymtracker_domain::{self as domain, ExerciseRepository, RoutineRepository, WorkoutRepository};
use log::debug;
use sqlx::{
    Sqlite, SqliteConnection,
    pool::Pool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio::sync::watch;

use crate::{
    Table, Watch,
    changes::Changes,
    models::{self, RowError, muscle_groups},
    schema::SQLITE_INIT,
};

pub type SqlitePool = Pool<Sqlite>;

const EXERCISE_COLUMNS: &str = "id, name, category, muscle_groups, equipment, is_custom";
const ROUTINE_COLUMNS: &str = "id, name, description, created_at";
const ROUTINE_EXERCISE_COLUMNS: &str =
    "routine_id, exercise_id, order_index, target_sets, target_reps";
const WORKOUT_COLUMNS: &str = "id, routine_id, start_time, end_time, notes";
const WORKOUT_SET_COLUMNS: &str = "id, workout_id, exercise_id, set_number, weight, reps, rpe";

/// Local database holding all records and preferences.
///
/// Clones share the same connection pool and the same subscriptions.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    pub(crate) changes: Changes,
    settings: Arc<watch::Sender<domain::AppSettings>>,
}

impl SqliteStore {
    /// Open the database file, creating it if necessary.
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        debug!("opening database {}", path.display());
        Self::connect(
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true),
        )
        .await
    }

    /// Open a database that only lives as long as the store.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        Self::connect("sqlite::memory:".parse::<SqliteConnectOptions>()?).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self, sqlx::Error> {
        // A single connection serializes all writes and keeps an in-memory database alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options.foreign_keys(true))
            .await?;
        init_schema(&pool).await?;
        let settings = fetch_settings(&pool).await?;
        Ok(Self {
            pool,
            changes: Changes::new(),
            settings: Arc::new(watch::Sender::new(settings)),
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[must_use]
    pub fn watch_exercises(&self) -> Watch<domain::Exercise> {
        Watch::new(self.clone(), &[Table::Exercises], |store| {
            store.read_exercises().boxed_local()
        })
    }

    #[must_use]
    pub fn watch_routines(&self) -> Watch<domain::Routine> {
        Watch::new(self.clone(), &[Table::Routines], |store| {
            store.read_routines().boxed_local()
        })
    }

    #[must_use]
    pub fn watch_workouts(&self) -> Watch<domain::Workout> {
        Watch::new(self.clone(), &[Table::Workouts], |store| {
            store.read_workouts().boxed_local()
        })
    }

    #[must_use]
    pub fn watch_sets(&self, workout_id: domain::WorkoutID) -> Watch<domain::WorkoutSet> {
        Watch::new(self.clone(), &[Table::WorkoutSets], move |store| {
            store.read_sets(workout_id).boxed_local()
        })
    }

    /// The current settings, updated on every write.
    #[must_use]
    pub fn watch_settings(&self) -> watch::Receiver<domain::AppSettings> {
        self.settings.subscribe()
    }

    async fn fetch_routine_exercises(
        &self,
        routine_id: Option<i64>,
    ) -> Result<Vec<models::RoutineExercise>, sqlx::Error> {
        match routine_id {
            Some(routine_id) => {
                sqlx::query_as(&format!(
                    "SELECT {ROUTINE_EXERCISE_COLUMNS} FROM routine_exercises \
                     WHERE routine_id = ? ORDER BY order_index"
                ))
                .bind(routine_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {ROUTINE_EXERCISE_COLUMNS} FROM routine_exercises \
                     ORDER BY routine_id, order_index"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn fetch_routine(
        &self,
        id: domain::RoutineID,
    ) -> Result<domain::Routine, domain::UpdateError> {
        self.read_routine(id)
            .await?
            .ok_or(domain::UpdateError::NotFound)
    }
}

async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // sqlx executes one statement per query
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

async fn fetch_settings(pool: &SqlitePool) -> Result<domain::AppSettings, sqlx::Error> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT key, value FROM preferences WHERE key IN (?, ?)")
            .bind(domain::AppSettings::LANGUAGE_KEY)
            .bind(domain::AppSettings::WEIGHT_UNIT_KEY)
            .fetch_all(pool)
            .await?;
    let value = |key: &str| {
        rows.iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    };
    Ok(domain::AppSettings::from_codes(
        value(domain::AppSettings::LANGUAGE_KEY),
        value(domain::AppSettings::WEIGHT_UNIT_KEY),
    ))
}

/// Reassign contiguous order indices to the exercises of a routine.
async fn renumber_routine_exercises(
    conn: &mut SqliteConnection,
    routine_id: i64,
) -> Result<(), sqlx::Error> {
    let rows: Vec<models::RoutineExercise> = sqlx::query_as(&format!(
        "SELECT {ROUTINE_EXERCISE_COLUMNS} FROM routine_exercises \
         WHERE routine_id = ? ORDER BY order_index"
    ))
    .bind(routine_id)
    .fetch_all(&mut *conn)
    .await?;
    sqlx::query("DELETE FROM routine_exercises WHERE routine_id = ?")
        .bind(routine_id)
        .execute(&mut *conn)
        .await?;
    for (index, row) in (0_i64..).zip(rows) {
        insert_routine_exercise(
            conn,
            routine_id,
            index,
            row.exercise_id,
            row.target_sets,
            &row.target_reps,
        )
        .await?;
    }
    Ok(())
}

async fn insert_routine_exercise(
    conn: &mut SqliteConnection,
    routine_id: i64,
    order_index: i64,
    exercise_id: i64,
    target_sets: i64,
    target_reps: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO routine_exercises \
         (routine_id, exercise_id, order_index, target_sets, target_reps) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(routine_id)
    .bind(exercise_id)
    .bind(order_index)
    .bind(target_sets)
    .bind(target_reps)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Reassign set numbers from 1 to the sets of an exercise in a workout, in logging order.
async fn renumber_sets(
    conn: &mut SqliteConnection,
    workout_id: i64,
    exercise_id: i64,
) -> Result<(), sqlx::Error> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT id FROM workout_sets WHERE workout_id = ? AND exercise_id = ? ORDER BY id",
    )
    .bind(workout_id)
    .bind(exercise_id)
    .fetch_all(&mut *conn)
    .await?;
    for (set_number, id) in (1_i64..).zip(ids) {
        sqlx::query("UPDATE workout_sets SET set_number = ? WHERE id = ?")
            .bind(set_number)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn routine_exists(conn: &mut SqliteConnection, routine_id: i64) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routines WHERE id = ?")
        .bind(routine_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

fn millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

fn storage_error(err: sqlx::Error) -> domain::StorageError {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            domain::StorageError::Unavailable
        }
        err => domain::StorageError::Other(Box::new(err)),
    }
}

fn is_conflict(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.is_foreign_key_violation() || db.is_unique_violation()
    )
}

fn read_error(err: sqlx::Error) -> domain::ReadError {
    domain::ReadError::Storage(storage_error(err))
}

fn create_error(err: sqlx::Error) -> domain::CreateError {
    if is_conflict(&err) {
        return domain::CreateError::Conflict;
    }
    domain::CreateError::Storage(storage_error(err))
}

fn update_error(err: sqlx::Error) -> domain::UpdateError {
    if is_conflict(&err) {
        return domain::UpdateError::Conflict;
    }
    domain::UpdateError::Storage(storage_error(err))
}

fn delete_error(err: sqlx::Error) -> domain::DeleteError {
    domain::DeleteError::Storage(storage_error(err))
}

impl domain::ExerciseRepository for SqliteStore {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let rows: Vec<models::Exercise> =
            sqlx::query_as(&format!("SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(read_error)?;
        Ok(rows
            .into_iter()
            .map(domain::Exercise::try_from)
            .collect::<Result<Vec<_>, RowError>>()?)
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<Option<domain::Exercise>, domain::ReadError> {
        let row: Option<models::Exercise> =
            sqlx::query_as(&format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = ?"))
                .bind(*id)
                .fetch_optional(&self.pool)
                .await
                .map_err(read_error)?;
        Ok(row.map(domain::Exercise::try_from).transpose()?)
    }

    async fn create_exercises(
        &self,
        exercises: Vec<domain::NewExercise>,
    ) -> Result<Vec<domain::Exercise>, domain::CreateError> {
        let mut tx = self.pool.begin().await.map_err(create_error)?;
        let mut created = Vec::with_capacity(exercises.len());

        for exercise in exercises {
            let id = sqlx::query(
                "INSERT INTO exercises (name, category, muscle_groups, equipment, is_custom) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(exercise.name.as_ref())
            .bind(exercise.category.as_ref())
            .bind(muscle_groups(&exercise.muscle_groups)?)
            .bind(exercise.equipment.as_ref())
            .bind(exercise.custom)
            .execute(&mut *tx)
            .await
            .map_err(create_error)?
            .last_insert_rowid();
            created.push(exercise.with_id(id.into()));
        }

        tx.commit().await.map_err(create_error)?;
        self.changes.publish(&[Table::Exercises]);
        Ok(created)
    }

    async fn replace_exercise(
        &self,
        exercise: domain::Exercise,
    ) -> Result<domain::Exercise, domain::UpdateError> {
        let result = sqlx::query(
            "UPDATE exercises \
             SET name = ?, category = ?, muscle_groups = ?, equipment = ?, is_custom = ? \
             WHERE id = ?",
        )
        .bind(exercise.name.as_ref())
        .bind(exercise.category.as_ref())
        .bind(muscle_groups(&exercise.muscle_groups)?)
        .bind(exercise.equipment.as_ref())
        .bind(exercise.custom)
        .bind(*exercise.id)
        .execute(&self.pool)
        .await
        .map_err(update_error)?;

        if result.rows_affected() == 0 {
            return Err(domain::UpdateError::NotFound);
        }

        self.changes.publish(&[Table::Exercises]);
        Ok(exercise)
    }

    async fn delete_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        let mut tx = self.pool.begin().await.map_err(delete_error)?;

        let routine_ids: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT routine_id FROM routine_exercises WHERE exercise_id = ?",
        )
        .bind(*id)
        .fetch_all(&mut *tx)
        .await
        .map_err(delete_error)?;

        sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(*id)
            .execute(&mut *tx)
            .await
            .map_err(delete_error)?;

        for routine_id in routine_ids {
            renumber_routine_exercises(&mut tx, routine_id)
                .await
                .map_err(delete_error)?;
        }

        tx.commit().await.map_err(delete_error)?;
        self.changes
            .publish(&[Table::Exercises, Table::Routines, Table::WorkoutSets]);
        Ok(id)
    }
}

impl domain::RoutineRepository for SqliteStore {
    async fn read_routines(&self) -> Result<Vec<domain::Routine>, domain::ReadError> {
        let rows: Vec<models::Routine> = sqlx::query_as(&format!(
            "SELECT {ROUTINE_COLUMNS} FROM routines ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        let mut exercises: BTreeMap<i64, Vec<models::RoutineExercise>> = BTreeMap::new();
        for exercise in self
            .fetch_routine_exercises(None)
            .await
            .map_err(read_error)?
        {
            exercises
                .entry(exercise.routine_id)
                .or_default()
                .push(exercise);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let routine_exercises = exercises.remove(&row.id).unwrap_or_default();
                row.with_exercises(routine_exercises)
            })
            .collect::<Result<Vec<_>, RowError>>()?)
    }

    async fn read_routine(
        &self,
        id: domain::RoutineID,
    ) -> Result<Option<domain::Routine>, domain::ReadError> {
        let row: Option<models::Routine> =
            sqlx::query_as(&format!("SELECT {ROUTINE_COLUMNS} FROM routines WHERE id = ?"))
                .bind(*id)
                .fetch_optional(&self.pool)
                .await
                .map_err(read_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let exercises = self
            .fetch_routine_exercises(Some(*id))
            .await
            .map_err(read_error)?;

        Ok(Some(row.with_exercises(exercises)?))
    }

    async fn create_routine(
        &self,
        name: domain::Name,
        description: Option<String>,
    ) -> Result<domain::Routine, domain::CreateError> {
        let created_at = Utc::now();
        let id =
            sqlx::query("INSERT INTO routines (name, description, created_at) VALUES (?, ?, ?)")
                .bind(name.as_ref())
                .bind(&description)
                .bind(millis(created_at))
                .execute(&self.pool)
                .await
                .map_err(create_error)?
                .last_insert_rowid();

        self.changes.publish(&[Table::Routines]);
        Ok(domain::Routine {
            id: id.into(),
            name,
            description,
            created_at: models::timestamp(millis(created_at))?,
            exercises: vec![],
        })
    }

    async fn replace_routine(
        &self,
        routine: domain::Routine,
    ) -> Result<domain::Routine, domain::UpdateError> {
        let result = sqlx::query("UPDATE routines SET name = ?, description = ? WHERE id = ?")
            .bind(routine.name.as_ref())
            .bind(&routine.description)
            .bind(*routine.id)
            .execute(&self.pool)
            .await
            .map_err(update_error)?;

        if result.rows_affected() == 0 {
            return Err(domain::UpdateError::NotFound);
        }

        self.changes.publish(&[Table::Routines]);
        self.fetch_routine(routine.id).await
    }

    async fn delete_routine(
        &self,
        id: domain::RoutineID,
    ) -> Result<domain::RoutineID, domain::DeleteError> {
        sqlx::query("DELETE FROM routines WHERE id = ?")
            .bind(*id)
            .execute(&self.pool)
            .await
            .map_err(delete_error)?;

        self.changes.publish(&[Table::Routines, Table::Workouts]);
        Ok(id)
    }

    async fn add_routine_exercise(
        &self,
        id: domain::RoutineID,
        exercise_id: domain::ExerciseID,
    ) -> Result<domain::Routine, domain::UpdateError> {
        let mut tx = self.pool.begin().await.map_err(update_error)?;

        if !routine_exists(&mut tx, *id).await.map_err(update_error)? {
            return Err(domain::UpdateError::NotFound);
        }

        let (count, present): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(exercise_id = ?), 0) \
             FROM routine_exercises WHERE routine_id = ?",
        )
        .bind(*exercise_id)
        .bind(*id)
        .fetch_one(&mut *tx)
        .await
        .map_err(update_error)?;

        if present == 0 {
            let defaults = domain::RoutineExercise::new(exercise_id, 0);
            insert_routine_exercise(
                &mut tx,
                *id,
                count,
                *exercise_id,
                i64::from(defaults.target_sets),
                &defaults.target_reps.to_string(),
            )
            .await
            .map_err(update_error)?;
        }

        tx.commit().await.map_err(update_error)?;
        self.changes.publish(&[Table::Routines]);
        self.fetch_routine(id).await
    }

    async fn remove_routine_exercise(
        &self,
        id: domain::RoutineID,
        exercise_id: domain::ExerciseID,
    ) -> Result<domain::Routine, domain::UpdateError> {
        let mut tx = self.pool.begin().await.map_err(update_error)?;

        if !routine_exists(&mut tx, *id).await.map_err(update_error)? {
            return Err(domain::UpdateError::NotFound);
        }

        sqlx::query("DELETE FROM routine_exercises WHERE routine_id = ? AND exercise_id = ?")
            .bind(*id)
            .bind(*exercise_id)
            .execute(&mut *tx)
            .await
            .map_err(update_error)?;
        renumber_routine_exercises(&mut tx, *id)
            .await
            .map_err(update_error)?;

        tx.commit().await.map_err(update_error)?;
        self.changes.publish(&[Table::Routines]);
        self.fetch_routine(id).await
    }

    async fn replace_routine_exercises(
        &self,
        id: domain::RoutineID,
        exercises: Vec<domain::RoutineExercise>,
    ) -> Result<domain::Routine, domain::UpdateError> {
        let mut tx = self.pool.begin().await.map_err(update_error)?;

        if !routine_exists(&mut tx, *id).await.map_err(update_error)? {
            return Err(domain::UpdateError::NotFound);
        }

        sqlx::query("DELETE FROM routine_exercises WHERE routine_id = ?")
            .bind(*id)
            .execute(&mut *tx)
            .await
            .map_err(update_error)?;

        for (index, exercise) in (0_i64..).zip(exercises) {
            insert_routine_exercise(
                &mut tx,
                *id,
                index,
                *exercise.exercise_id,
                i64::from(exercise.target_sets),
                &exercise.target_reps.to_string(),
            )
            .await
            .map_err(update_error)?;
        }

        tx.commit().await.map_err(update_error)?;
        self.changes.publish(&[Table::Routines]);
        self.fetch_routine(id).await
    }
}

impl domain::WorkoutRepository for SqliteStore {
    async fn read_workouts(&self) -> Result<Vec<domain::Workout>, domain::ReadError> {
        let rows: Vec<models::Workout> = sqlx::query_as(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts ORDER BY start_time DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;
        Ok(rows
            .into_iter()
            .map(domain::Workout::try_from)
            .collect::<Result<Vec<_>, RowError>>()?)
    }

    async fn read_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<Option<domain::Workout>, domain::ReadError> {
        let row: Option<models::Workout> =
            sqlx::query_as(&format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?"))
                .bind(*id)
                .fetch_optional(&self.pool)
                .await
                .map_err(read_error)?;
        Ok(row.map(domain::Workout::try_from).transpose()?)
    }

    async fn read_active_workout(&self) -> Result<Option<domain::Workout>, domain::ReadError> {
        let row: Option<models::Workout> = sqlx::query_as(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE end_time IS NULL \
             ORDER BY start_time DESC, id DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?;
        Ok(row.map(domain::Workout::try_from).transpose()?)
    }

    async fn create_workout(
        &self,
        routine_id: Option<domain::RoutineID>,
        start_time: DateTime<Utc>,
    ) -> Result<domain::Workout, domain::CreateError> {
        let mut tx = self.pool.begin().await.map_err(create_error)?;

        let active: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE end_time IS NULL")
                .fetch_one(&mut *tx)
                .await
                .map_err(create_error)?;

        if active > 0 {
            return Err(domain::CreateError::Conflict);
        }

        let id = sqlx::query("INSERT INTO workouts (routine_id, start_time) VALUES (?, ?)")
            .bind(routine_id.map(|id| *id))
            .bind(millis(start_time))
            .execute(&mut *tx)
            .await
            .map_err(create_error)?
            .last_insert_rowid();

        tx.commit().await.map_err(create_error)?;
        self.changes.publish(&[Table::Workouts]);
        Ok(domain::Workout {
            id: id.into(),
            routine_id,
            start_time: models::timestamp(millis(start_time))?,
            end_time: None,
            notes: None,
        })
    }

    async fn finish_workout(
        &self,
        id: domain::WorkoutID,
        end_time: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<domain::Workout, domain::UpdateError> {
        let result = sqlx::query("UPDATE workouts SET end_time = ?, notes = ? WHERE id = ?")
            .bind(millis(end_time))
            .bind(notes)
            .bind(*id)
            .execute(&self.pool)
            .await
            .map_err(update_error)?;

        if result.rows_affected() == 0 {
            return Err(domain::UpdateError::NotFound);
        }

        self.changes.publish(&[Table::Workouts]);
        self.read_workout(id)
            .await?
            .ok_or(domain::UpdateError::NotFound)
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(*id)
            .execute(&self.pool)
            .await
            .map_err(delete_error)?;

        self.changes.publish(&[Table::Workouts, Table::WorkoutSets]);
        Ok(id)
    }

    async fn read_sets(
        &self,
        workout_id: domain::WorkoutID,
    ) -> Result<Vec<domain::WorkoutSet>, domain::ReadError> {
        let rows: Vec<models::WorkoutSet> = sqlx::query_as(&format!(
            "SELECT {WORKOUT_SET_COLUMNS} FROM workout_sets WHERE workout_id = ? ORDER BY id"
        ))
        .bind(*workout_id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;
        Ok(rows
            .into_iter()
            .map(domain::WorkoutSet::try_from)
            .collect::<Result<Vec<_>, RowError>>()?)
    }

    async fn read_exercise_sets(
        &self,
        exercise_id: domain::ExerciseID,
    ) -> Result<Vec<domain::WorkoutSet>, domain::ReadError> {
        let rows: Vec<models::WorkoutSet> = sqlx::query_as(&format!(
            "SELECT {WORKOUT_SET_COLUMNS} FROM workout_sets WHERE exercise_id = ? ORDER BY id"
        ))
        .bind(*exercise_id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;
        Ok(rows
            .into_iter()
            .map(domain::WorkoutSet::try_from)
            .collect::<Result<Vec<_>, RowError>>()?)
    }

    async fn create_set(
        &self,
        set: domain::NewWorkoutSet,
    ) -> Result<domain::WorkoutSet, domain::CreateError> {
        let mut tx = self.pool.begin().await.map_err(create_error)?;

        let previous: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM workout_sets WHERE workout_id = ? AND exercise_id = ?",
        )
        .bind(*set.workout_id)
        .bind(*set.exercise_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(create_error)?;
        let set_number = previous + 1;

        let id = sqlx::query(
            "INSERT INTO workout_sets (workout_id, exercise_id, set_number, weight, reps, rpe) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(*set.workout_id)
        .bind(*set.exercise_id)
        .bind(set_number)
        .bind(f32::from(set.weight))
        .bind(i64::from(u32::from(set.reps)))
        .bind(set.rpe.map(|rpe| i64::from(u8::from(rpe))))
        .execute(&mut *tx)
        .await
        .map_err(create_error)?
        .last_insert_rowid();

        tx.commit().await.map_err(create_error)?;
        self.changes.publish(&[Table::WorkoutSets]);
        Ok(set.with_id(id.into(), u32::try_from(set_number).map_err(RowError::from)?))
    }

    async fn replace_set(
        &self,
        set: domain::WorkoutSet,
    ) -> Result<domain::WorkoutSet, domain::UpdateError> {
        let result =
            sqlx::query("UPDATE workout_sets SET weight = ?, reps = ?, rpe = ? WHERE id = ?")
                .bind(f32::from(set.weight))
                .bind(i64::from(u32::from(set.reps)))
                .bind(set.rpe.map(|rpe| i64::from(u8::from(rpe))))
                .bind(*set.id)
                .execute(&self.pool)
                .await
                .map_err(update_error)?;

        if result.rows_affected() == 0 {
            return Err(domain::UpdateError::NotFound);
        }

        self.changes.publish(&[Table::WorkoutSets]);

        let row: models::WorkoutSet = sqlx::query_as(&format!(
            "SELECT {WORKOUT_SET_COLUMNS} FROM workout_sets WHERE id = ?"
        ))
        .bind(*set.id)
        .fetch_one(&self.pool)
        .await
        .map_err(update_error)?;
        Ok(domain::WorkoutSet::try_from(row)?)
    }

    async fn delete_set(
        &self,
        id: domain::WorkoutSetID,
    ) -> Result<domain::WorkoutSetID, domain::DeleteError> {
        let mut tx = self.pool.begin().await.map_err(delete_error)?;

        let set: Option<(i64, i64)> =
            sqlx::query_as("SELECT workout_id, exercise_id FROM workout_sets WHERE id = ?")
                .bind(*id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(delete_error)?;

        sqlx::query("DELETE FROM workout_sets WHERE id = ?")
            .bind(*id)
            .execute(&mut *tx)
            .await
            .map_err(delete_error)?;

        if let Some((workout_id, exercise_id)) = set {
            renumber_sets(&mut tx, workout_id, exercise_id)
                .await
                .map_err(delete_error)?;
        }

        tx.commit().await.map_err(delete_error)?;
        self.changes.publish(&[Table::WorkoutSets]);
        Ok(id)
    }
}

impl domain::SettingsRepository for SqliteStore {
    async fn read_settings(&self) -> Result<domain::AppSettings, domain::ReadError> {
        fetch_settings(&self.pool).await.map_err(read_error)
    }

    async fn write_language(&self, language: domain::Language) -> Result<(), domain::UpdateError> {
        self.write_preference(domain::AppSettings::LANGUAGE_KEY, language.as_ref())
            .await?;
        self.settings
            .send_modify(|settings| settings.language = language);
        Ok(())
    }

    async fn write_weight_unit(
        &self,
        weight_unit: domain::WeightUnit,
    ) -> Result<(), domain::UpdateError> {
        self.write_preference(domain::AppSettings::WEIGHT_UNIT_KEY, weight_unit.as_ref())
            .await?;
        self.settings
            .send_modify(|settings| settings.weight_unit = weight_unit);
        Ok(())
    }
}

impl SqliteStore {
    async fn write_preference(&self, key: &str, value: &str) -> Result<(), domain::UpdateError> {
        sqlx::query(
            "INSERT INTO preferences (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(update_error)?;
        Ok(())
    }
}
