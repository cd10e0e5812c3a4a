use std::sync::Arc;

use futures_util::future::LocalBoxFuture;
use gymtracker_domain as domain;
use log::trace;
use strum::EnumCount;
use tokio::sync::watch;

use crate::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumCount)]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    Exercises,
    Routines,
    Workouts,
    WorkoutSets,
}

/// Number of changes per table since the store was opened.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Revisions([u64; Table::COUNT]);

impl Revisions {
    #[must_use]
    pub fn get(&self, table: Table) -> u64 {
        self.0[table as usize]
    }

    fn bump(&mut self, table: Table) {
        self.0[table as usize] += 1;
    }
}

#[derive(Clone)]
pub(crate) struct Changes {
    sender: Arc<watch::Sender<Revisions>>,
}

impl Changes {
    pub fn new() -> Self {
        Self {
            sender: Arc::new(watch::Sender::new(Revisions::default())),
        }
    }

    /// Notify all subscribers of the given tables.
    pub fn publish(&self, tables: &[Table]) {
        trace!(
            "publish changes of {}",
            tables
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .join(", ")
        );
        self.sender.send_modify(|revisions| {
            for table in tables {
                revisions.bump(*table);
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<Revisions> {
        self.sender.subscribe()
    }
}

type Query<T> =
    Box<dyn for<'a> Fn(&'a SqliteStore) -> LocalBoxFuture<'a, Result<Vec<T>, domain::ReadError>>>;

/// Result of a query that is re-run whenever one of its tables changes.
pub struct Watch<T> {
    store: SqliteStore,
    tables: Vec<Table>,
    receiver: watch::Receiver<Revisions>,
    seen: Revisions,
    initial: bool,
    query: Query<T>,
}

impl<T> Watch<T> {
    pub(crate) fn new<F>(store: SqliteStore, tables: &[Table], query: F) -> Self
    where
        F: for<'a> Fn(&'a SqliteStore) -> LocalBoxFuture<'a, Result<Vec<T>, domain::ReadError>>
            + 'static,
    {
        let mut receiver = store.changes.subscribe();
        let seen = *receiver.borrow_and_update();
        Self {
            store,
            tables: tables.to_vec(),
            receiver,
            seen,
            initial: true,
            query: Box::new(query),
        }
    }

    /// The current result on the first call, afterwards the result after the next relevant
    /// change.
    ///
    /// Changes that happen while the previous result is processed are coalesced, so only the
    /// latest state is returned.
    pub async fn next(&mut self) -> Option<Result<Vec<T>, domain::ReadError>> {
        if self.initial {
            self.initial = false;
        } else {
            loop {
                self.receiver.changed().await.ok()?;
                let current = *self.receiver.borrow_and_update();
                let relevant = self
                    .tables
                    .iter()
                    .any(|table| current.get(*table) != self.seen.get(*table));
                self.seen = current;
                if relevant {
                    break;
                }
            }
        }
        Some((self.query)(&self.store).await)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gymtracker_domain::{ExerciseRepository, RoutineRepository};
    use pretty_assertions::assert_eq;

    use crate::tests::data::{NEW_EXERCISE, NEW_EXERCISE_2, ROUTINE_NAME};

    use super::*;

    #[test]
    fn test_publish() {
        let changes = Changes::new();
        let mut receiver = changes.subscribe();
        assert!(!receiver.has_changed().unwrap());

        changes.publish(&[Table::Routines, Table::Workouts]);
        assert!(receiver.has_changed().unwrap());

        let revisions = *receiver.borrow_and_update();
        assert_eq!(revisions.get(Table::Exercises), 0);
        assert_eq!(revisions.get(Table::Routines), 1);
        assert_eq!(revisions.get(Table::Workouts), 1);
        assert_eq!(revisions.get(Table::WorkoutSets), 0);
    }

    #[test]
    fn test_table_name() {
        assert_eq!(Table::WorkoutSets.as_ref(), "workout_sets");
    }

    #[tokio::test]
    async fn test_watch_exercises() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut watch = store.watch_exercises();

        assert_eq!(watch.next().await.unwrap().unwrap(), vec![]);

        let created = store
            .create_exercises(vec![NEW_EXERCISE.clone()])
            .await
            .unwrap();

        assert_eq!(watch.next().await.unwrap().unwrap(), created);
    }

    #[tokio::test]
    async fn test_watch_ignores_other_tables() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut watch = store.watch_exercises();
        watch.next().await.unwrap().unwrap();

        store
            .create_routine(ROUTINE_NAME.clone(), None)
            .await
            .unwrap();

        assert!(
            tokio::time::timeout(Duration::from_millis(50), watch.next())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_watch_coalesces_changes() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut watch = store.watch_exercises();
        watch.next().await.unwrap().unwrap();

        store
            .create_exercises(vec![NEW_EXERCISE.clone()])
            .await
            .unwrap();
        store
            .create_exercises(vec![NEW_EXERCISE_2.clone()])
            .await
            .unwrap();

        assert_eq!(watch.next().await.unwrap().unwrap().len(), 2);
        assert!(
            tokio::time::timeout(Duration::from_millis(50), watch.next())
                .await
                .is_err()
        );
    }
}
