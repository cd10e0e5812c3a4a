use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeZone, Utc};

use crate::{
    ExerciseID, ExerciseSets, ReadError, Weight, Workout, WorkoutID, WorkoutSet,
    group_by_exercise,
};

pub const RECENT_WORKOUTS: usize = 5;
pub const HISTORY_ENTRIES: usize = 10;

#[allow(async_fn_in_trait)]
pub trait StatisticsService {
    async fn get_dashboard(&self) -> Result<Dashboard, ReadError>;
    async fn get_exercise_stats(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<ExerciseStats, ReadError>;
    async fn get_workout_detail(&self, id: WorkoutID) -> Result<Option<WorkoutDetail>, ReadError>;
}

/// Summary shown on the home screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Most recently started completed workouts.
    pub recent_workouts: Vec<Workout>,
    pub workouts_this_week: usize,
    pub has_active_workout: bool,
    pub weekly_volume: f64,
}

impl Dashboard {
    /// `sets` must contain at least the sets of all workouts of the current week.
    #[must_use]
    pub fn new<Tz: TimeZone>(workouts: &[Workout], sets: &[WorkoutSet], now: &DateTime<Tz>) -> Self {
        let since = week_start(now);
        let mut recent_workouts = workouts
            .iter()
            .filter(|w| !w.is_active())
            .cloned()
            .collect::<Vec<_>>();
        recent_workouts.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        recent_workouts.truncate(RECENT_WORKOUTS);
        Self {
            recent_workouts,
            workouts_this_week: workouts_since(workouts, since),
            has_active_workout: workouts.iter().any(Workout::is_active),
            weekly_volume: weekly_volume(workouts, sets, since),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseStats {
    pub personal_record: Option<Weight>,
    /// Number of distinct workouts containing the exercise.
    pub workout_count: usize,
    pub total_volume: f64,
    /// Most recent entries first.
    pub history: Vec<ExerciseHistoryEntry>,
}

impl ExerciseStats {
    /// `sets` are all sets of a single exercise.
    #[must_use]
    pub fn new(workouts: &[Workout], sets: &[WorkoutSet]) -> Self {
        let mut history = exercise_history(workouts, sets);
        let workout_count = history.len();
        history.truncate(HISTORY_ENTRIES);
        Self {
            personal_record: personal_record(sets),
            workout_count,
            total_volume: volume(sets),
            history,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseHistoryEntry {
    pub workout_id: WorkoutID,
    pub date: DateTime<Utc>,
    pub sets: Vec<WorkoutSet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDetail {
    pub workout: Workout,
    pub exercises: Vec<ExerciseSets>,
    pub total_volume: f64,
    pub total_sets: usize,
}

impl WorkoutDetail {
    #[must_use]
    pub fn new(workout: Workout, sets: &[WorkoutSet]) -> Self {
        Self {
            workout,
            exercises: group_by_exercise(sets),
            total_volume: volume(sets),
            total_sets: sets.len(),
        }
    }
}

/// Monday 00:00 of the week containing `now`, in the time zone of `now`.
#[must_use]
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let date = now.date_naive();
    let monday = date
        .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(date);
    now.timezone()
        .from_local_datetime(&monday.and_time(NaiveTime::MIN))
        .earliest()
        .map_or_else(
            || monday.and_time(NaiveTime::MIN).and_utc(),
            |start| start.with_timezone(&Utc),
        )
}

/// Heaviest weight ever logged.
#[must_use]
pub fn personal_record(sets: &[WorkoutSet]) -> Option<Weight> {
    sets.iter().map(|s| s.weight).fold(None, |max, weight| match max {
        Some(max) if max >= weight => Some(max),
        _ => Some(weight),
    })
}

#[must_use]
pub fn volume(sets: &[WorkoutSet]) -> f64 {
    sets.iter().map(WorkoutSet::volume).sum()
}

/// Volume of all sets of completed workouts started at or after `since`.
#[must_use]
pub fn weekly_volume(workouts: &[Workout], sets: &[WorkoutSet], since: DateTime<Utc>) -> f64 {
    let completed = workouts
        .iter()
        .filter(|w| !w.is_active() && w.start_time >= since)
        .map(|w| w.id)
        .collect::<Vec<_>>();
    sets.iter()
        .filter(|s| completed.contains(&s.workout_id))
        .map(WorkoutSet::volume)
        .sum()
}

#[must_use]
pub fn workouts_since(workouts: &[Workout], since: DateTime<Utc>) -> usize {
    workouts.iter().filter(|w| w.start_time >= since).count()
}

/// Sets grouped by workout, most recently started workout first.
#[must_use]
pub fn exercise_history(workouts: &[Workout], sets: &[WorkoutSet]) -> Vec<ExerciseHistoryEntry> {
    let mut sets_per_workout: BTreeMap<WorkoutID, Vec<WorkoutSet>> = BTreeMap::new();
    for set in sets {
        sets_per_workout.entry(set.workout_id).or_default().push(*set);
    }
    let mut history = workouts
        .iter()
        .filter_map(|w| {
            sets_per_workout.remove(&w.id).map(|mut sets| {
                sets.sort_by_key(|s| s.set_number);
                ExerciseHistoryEntry {
                    workout_id: w.id,
                    date: w.start_time,
                    sets,
                }
            })
        })
        .collect::<Vec<_>>();
    history.sort_by(|a, b| b.date.cmp(&a.date));
    history
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::{Duration, FixedOffset};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::Reps;

    use super::*;

    fn time(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn workout(id: i64, start_time: DateTime<Utc>, completed: bool) -> Workout {
        Workout {
            id: id.into(),
            routine_id: None,
            start_time,
            end_time: completed.then(|| start_time + Duration::hours(1)),
            notes: None,
        }
    }

    fn set(id: i64, workout_id: i64, set_number: u32, weight: f32, reps: u32) -> WorkoutSet {
        WorkoutSet {
            id: id.into(),
            workout_id: workout_id.into(),
            exercise_id: 1.into(),
            set_number,
            weight: Weight::new(weight).unwrap(),
            reps: Reps::new(reps).unwrap(),
            rpe: None,
        }
    }

    // 2024-01-01 is a Monday.
    static WORKOUTS: std::sync::LazyLock<Vec<Workout>> = std::sync::LazyLock::new(|| {
        vec![
            workout(1, time(5, 18), true),
            workout(2, time(8, 7), true),
            workout(3, time(10, 18), true),
            workout(4, time(11, 18), false),
        ]
    });

    static SETS: std::sync::LazyLock<Vec<WorkoutSet>> = std::sync::LazyLock::new(|| {
        vec![
            set(1, 1, 1, 100.0, 5),
            set(2, 2, 1, 105.0, 5),
            set(3, 3, 2, 102.5, 3),
            set(4, 3, 1, 100.0, 5),
            set(5, 4, 1, 110.0, 1),
        ]
    });

    #[rstest]
    #[case::monday_midnight(time(8, 0), time(8, 0))]
    #[case::wednesday(time(10, 13), time(8, 0))]
    #[case::sunday_evening(time(14, 23), time(8, 0))]
    #[case::previous_sunday(time(7, 23), time(1, 0))]
    fn test_week_start(#[case] now: DateTime<Utc>, #[case] expected: DateTime<Utc>) {
        assert_eq!(week_start(&now), expected);
    }

    #[test]
    fn test_week_start_local_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        // Monday 01:00 at UTC+2 is still Sunday in UTC.
        let now = offset.with_ymd_and_hms(2024, 1, 8, 1, 0, 0).unwrap();
        assert_eq!(week_start(&now), time(7, 22));
    }

    #[test]
    fn test_personal_record() {
        assert_eq!(personal_record(&SETS), Some(Weight::new(110.0).unwrap()));
        assert_eq!(personal_record(&[]), None);
    }

    #[test]
    fn test_weekly_volume_excludes_active_and_previous_weeks() {
        assert_approx_eq!(weekly_volume(&WORKOUTS, &SETS, time(8, 0)), 525.0 + 307.5 + 500.0);
        assert_approx_eq!(weekly_volume(&WORKOUTS, &SETS, time(15, 0)), 0.0);
        assert_approx_eq!(weekly_volume(&[], &SETS, time(1, 0)), 0.0);
    }

    #[test]
    fn test_workouts_since() {
        assert_eq!(workouts_since(&WORKOUTS, time(8, 0)), 3);
        assert_eq!(workouts_since(&WORKOUTS, time(1, 0)), 4);
    }

    #[test]
    fn test_exercise_history() {
        assert_eq!(
            exercise_history(&WORKOUTS, &SETS)
                .iter()
                .map(|e| (
                    *e.workout_id,
                    e.sets.iter().map(|s| *s.id).collect::<Vec<_>>()
                ))
                .collect::<Vec<_>>(),
            vec![
                (4, vec![5]),
                (3, vec![4, 3]),
                (2, vec![2]),
                (1, vec![1])
            ]
        );
    }

    #[test]
    fn test_exercise_stats() {
        let stats = ExerciseStats::new(&WORKOUTS, &SETS);
        assert_eq!(stats.personal_record, Some(Weight::new(110.0).unwrap()));
        assert_eq!(stats.workout_count, 4);
        assert_approx_eq!(stats.total_volume, 500.0 + 525.0 + 307.5 + 500.0 + 110.0);
        assert_eq!(stats.history.len(), 4);

        let stats = ExerciseStats::new(&WORKOUTS, &[]);
        assert_eq!(stats.personal_record, None);
        assert_eq!(stats.workout_count, 0);
        assert!(stats.history.is_empty());
    }

    #[test]
    fn test_dashboard() {
        let dashboard = Dashboard::new(&WORKOUTS, &SETS, &time(12, 9));
        assert_eq!(
            dashboard
                .recent_workouts
                .iter()
                .map(|w| *w.id)
                .collect::<Vec<_>>(),
            vec![3, 2, 1]
        );
        assert_eq!(dashboard.workouts_this_week, 3);
        assert!(dashboard.has_active_workout);
        assert_approx_eq!(dashboard.weekly_volume, 1332.5);
    }

    #[test]
    fn test_dashboard_recent_workouts_limit() {
        let workouts = (1..=7)
            .map(|i| workout(i, time(u32::try_from(i).unwrap(), 10), true))
            .collect::<Vec<_>>();
        let dashboard = Dashboard::new(&workouts, &[], &time(8, 12));
        assert_eq!(
            dashboard
                .recent_workouts
                .iter()
                .map(|w| *w.id)
                .collect::<Vec<_>>(),
            vec![7, 6, 5, 4, 3]
        );
        assert!(!dashboard.has_active_workout);
    }

    #[test]
    fn test_workout_detail() {
        let detail = WorkoutDetail::new(WORKOUTS[2].clone(), &SETS[2..4]);
        assert_eq!(detail.total_sets, 2);
        assert_approx_eq!(detail.total_volume, 807.5);
        assert_eq!(detail.exercises.len(), 1);
        assert_eq!(
            detail.exercises[0]
                .sets
                .iter()
                .map(|s| s.set_number)
                .collect::<Vec<_>>(),
            vec![1, 2]
        );
    }
}
