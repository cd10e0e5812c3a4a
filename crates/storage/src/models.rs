use std::num::TryFromIntError;

use chrono::{DateTime, Utc};
use gymtracker_domain as domain;

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub muscle_groups: String,
    pub equipment: String,
    pub is_custom: bool,
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = RowError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            category: value
                .category
                .parse()
                .map_err(|_| RowError::InvalidCategory(value.category.clone()))?,
            muscle_groups: serde_json::from_str(&value.muscle_groups)?,
            equipment: value
                .equipment
                .parse()
                .map_err(|_| RowError::InvalidEquipment(value.equipment.clone()))?,
            custom: value.is_custom,
        })
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Routine {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
}

impl Routine {
    /// Combine the routine with its exercises, which must already be ordered.
    pub fn with_exercises(
        self,
        exercises: Vec<RoutineExercise>,
    ) -> Result<domain::Routine, RowError> {
        Ok(domain::Routine {
            id: self.id.into(),
            name: domain::Name::new(&self.name)?,
            description: self.description,
            created_at: timestamp(self.created_at)?,
            exercises: exercises
                .into_iter()
                .map(domain::RoutineExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct RoutineExercise {
    pub routine_id: i64,
    pub exercise_id: i64,
    pub order_index: i64,
    pub target_sets: i64,
    pub target_reps: String,
}

impl TryFrom<RoutineExercise> for domain::RoutineExercise {
    type Error = RowError;

    fn try_from(value: RoutineExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            exercise_id: value.exercise_id.into(),
            order_index: u32::try_from(value.order_index)?,
            target_sets: u32::try_from(value.target_sets)?,
            target_reps: value.target_reps.parse()?,
        })
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: i64,
    pub routine_id: Option<i64>,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub notes: Option<String>,
}

impl TryFrom<Workout> for domain::Workout {
    type Error = RowError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            routine_id: value.routine_id.map(domain::RoutineID::from),
            start_time: timestamp(value.start_time)?,
            end_time: value.end_time.map(timestamp).transpose()?,
            notes: value.notes,
        })
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub set_number: i64,
    pub weight: f32,
    pub reps: i64,
    pub rpe: Option<i64>,
}

impl TryFrom<WorkoutSet> for domain::WorkoutSet {
    type Error = RowError;

    fn try_from(value: WorkoutSet) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            workout_id: value.workout_id.into(),
            exercise_id: value.exercise_id.into(),
            set_number: u32::try_from(value.set_number)?,
            weight: domain::Weight::new(value.weight)?,
            reps: domain::Reps::new(u32::try_from(value.reps)?)?,
            rpe: value
                .rpe
                .map(|rpe| Ok::<_, RowError>(domain::RPE::new(u8::try_from(rpe)?)?))
                .transpose()?,
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RowError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    #[error("invalid equipment: {0}")]
    InvalidEquipment(String),
    #[error("invalid muscle groups: {0}")]
    InvalidMuscleGroups(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidTargetReps(#[from] domain::TargetRepsError),
    #[error(transparent)]
    InvalidWeight(#[from] domain::WeightError),
    #[error(transparent)]
    InvalidReps(#[from] domain::RepsError),
    #[error(transparent)]
    InvalidRPE(#[from] domain::RPEError),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),
    #[error(transparent)]
    OutOfRange(#[from] TryFromIntError),
}

impl From<RowError> for domain::ReadError {
    fn from(value: RowError) -> Self {
        domain::ReadError::Other(Box::new(value))
    }
}

impl From<RowError> for domain::CreateError {
    fn from(value: RowError) -> Self {
        domain::CreateError::Other(Box::new(value))
    }
}

impl From<RowError> for domain::UpdateError {
    fn from(value: RowError) -> Self {
        domain::UpdateError::Other(Box::new(value))
    }
}

pub fn timestamp(millis: i64) -> Result<DateTime<Utc>, RowError> {
    DateTime::from_timestamp_millis(millis).ok_or(RowError::InvalidTimestamp(millis))
}

pub fn muscle_groups(muscle_groups: &[String]) -> Result<String, RowError> {
    Ok(serde_json::to_string(muscle_groups)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn exercise() -> Exercise {
        Exercise {
            id: 1,
            name: "Bench Press".to_string(),
            category: "PUSH".to_string(),
            muscle_groups: r#"["Chest","Triceps"]"#.to_string(),
            equipment: "BARBELL".to_string(),
            is_custom: false,
        }
    }

    fn workout_set() -> WorkoutSet {
        WorkoutSet {
            id: 3,
            workout_id: 2,
            exercise_id: 1,
            set_number: 2,
            weight: 102.5,
            reps: 3,
            rpe: Some(8),
        }
    }

    #[test]
    fn test_exercise_try_from() {
        assert_eq!(
            domain::Exercise::try_from(exercise()).unwrap(),
            domain::Exercise {
                id: 1.into(),
                name: domain::Name::new("Bench Press").unwrap(),
                category: domain::Category::Push,
                muscle_groups: vec!["Chest".to_string(), "Triceps".to_string()],
                equipment: domain::Equipment::Barbell,
                custom: false,
            }
        );
    }

    #[rstest]
    #[case::category(Exercise { category: "ARMS".to_string(), ..exercise() }, "invalid category: ARMS")]
    #[case::equipment(Exercise { equipment: "ROPE".to_string(), ..exercise() }, "invalid equipment: ROPE")]
    #[case::name(Exercise { name: " ".to_string(), ..exercise() }, "Name must not be empty")]
    fn test_exercise_try_from_invalid(#[case] row: Exercise, #[case] message: &str) {
        assert_eq!(
            domain::Exercise::try_from(row).unwrap_err().to_string(),
            message
        );
    }

    #[test]
    fn test_exercise_try_from_invalid_muscle_groups() {
        assert!(matches!(
            domain::Exercise::try_from(Exercise {
                muscle_groups: "Chest".to_string(),
                ..exercise()
            }),
            Err(RowError::InvalidMuscleGroups(_))
        ));
    }

    #[test]
    fn test_routine_with_exercises() {
        let routine = Routine {
            id: 4,
            name: "Push Day".to_string(),
            description: Some("Chest focus".to_string()),
            created_at: 1_700_000_000_000,
        }
        .with_exercises(vec![RoutineExercise {
            routine_id: 4,
            exercise_id: 1,
            order_index: 0,
            target_sets: 5,
            target_reps: "AMRAP".to_string(),
        }])
        .unwrap();
        assert_eq!(routine.id, 4.into());
        assert_eq!(routine.created_at, timestamp(1_700_000_000_000).unwrap());
        assert_eq!(
            routine.exercises,
            vec![domain::RoutineExercise {
                exercise_id: 1.into(),
                order_index: 0,
                target_sets: 5,
                target_reps: domain::TargetReps::Amrap,
            }]
        );
    }

    #[test]
    fn test_workout_try_from() {
        let workout = domain::Workout::try_from(Workout {
            id: 2,
            routine_id: None,
            start_time: 1_700_000_000_000,
            end_time: Some(1_700_003_600_000),
            notes: Some("good".to_string()),
        })
        .unwrap();
        assert!(!workout.is_active());
        assert_eq!(workout.duration(), Some(chrono::Duration::hours(1)));
    }

    #[test]
    fn test_workout_set_try_from() {
        let set = domain::WorkoutSet::try_from(workout_set()).unwrap();
        assert_eq!(set.set_number, 2);
        assert_eq!(f32::from(set.weight), 102.5);
        assert_eq!(u32::from(set.reps), 3);
        assert_eq!(set.rpe, Some(domain::RPE::new(8).unwrap()));
    }

    #[rstest]
    #[case::negative_reps(WorkoutSet { reps: -1, ..workout_set() })]
    #[case::rpe(WorkoutSet { rpe: Some(11), ..workout_set() })]
    #[case::weight(WorkoutSet { weight: -5.0, ..workout_set() })]
    #[case::set_number(WorkoutSet { set_number: -2, ..workout_set() })]
    fn test_workout_set_try_from_invalid(#[case] row: WorkoutSet) {
        assert!(domain::WorkoutSet::try_from(row).is_err());
    }

    #[test]
    fn test_muscle_groups() {
        assert_eq!(
            muscle_groups(&["Back".to_string(), "Biceps".to_string()]).unwrap(),
            r#"["Back","Biceps"]"#
        );
        assert_eq!(muscle_groups(&[]).unwrap(), "[]");
    }
}
