use std::collections::BTreeMap;

use crate::{Category, Equipment, Name, NewExercise};

#[derive(Clone, Debug)]
pub struct Exercise {
    pub name: &'static str,
    pub category: Category,
    pub muscle_groups: &'static [&'static str],
    pub equipment: Equipment,
}

impl From<BaseExercise> for Exercise {
    fn from(value: BaseExercise) -> Self {
        Exercise {
            name: value.name,
            category: value.category,
            muscle_groups: value.muscle_groups,
            equipment: value.equipment,
        }
    }
}

impl TryFrom<&Exercise> for NewExercise {
    type Error = crate::NameError;

    fn try_from(value: &Exercise) -> Result<Self, Self::Error> {
        Ok(NewExercise {
            name: Name::new(value.name)?,
            category: value.category,
            muscle_groups: value
                .muscle_groups
                .iter()
                .map(ToString::to_string)
                .collect(),
            equipment: value.equipment,
            custom: false,
        })
    }
}

#[derive(Clone)]
struct BaseExercise {
    pub name: &'static str,
    pub category: Category,
    pub muscle_groups: &'static [&'static str],
    pub equipment: Equipment,
    pub variants: &'static [ExerciseVariant],
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct ExerciseVariant {
    pub name: &'static str,
    pub muscle_groups: Option<&'static [&'static str]>,
    pub equipment: Option<Equipment>,
}

impl ExerciseVariant {
    const fn default() -> Self {
        Self {
            name: "",
            muscle_groups: None,
            equipment: None,
        }
    }
}

pub(crate) static EXERCISES: std::sync::LazyLock<BTreeMap<&'static str, Exercise>> =
    std::sync::LazyLock::new(|| {
        EXERCISE_VARIANTS
            .into_iter()
            .map(std::convert::Into::into)
            .chain(EXERCISE_VARIANTS.iter().flat_map(|e| {
                e.variants.iter().map(|v| Exercise {
                    name: v.name,
                    category: e.category,
                    muscle_groups: v.muscle_groups.unwrap_or(e.muscle_groups),
                    equipment: v.equipment.unwrap_or(e.equipment),
                })
            }))
            .map(|e: Exercise| (e.name, e))
            .collect::<BTreeMap<_, _>>()
    });

/// The predefined exercises that are stored when the catalog is empty.
#[must_use]
pub fn default_exercises() -> Vec<NewExercise> {
    EXERCISES
        .values()
        .filter_map(|e| NewExercise::try_from(e).ok())
        .collect()
}

const CHEST_TRICEPS_SHOULDERS: &[&str] = &["Chest", "Triceps", "Shoulders"];
const BACK_BICEPS: &[&str] = &["Back", "Biceps"];
const QUADS_GLUTES_HAMSTRINGS: &[&str] = &["Quads", "Glutes", "Hamstrings"];
const LEGS_CARDIO: &[&str] = &["Legs", "Cardio"];
const FULL_BODY_CARDIO: &[&str] = &["Full Body", "Cardio"];

const EXERCISE_VARIANTS: [BaseExercise; 36] = [
    // Push
    BaseExercise {
        name: "Bench Press",
        category: Category::Push,
        muscle_groups: CHEST_TRICEPS_SHOULDERS,
        equipment: Equipment::Barbell,
        variants: &[
            ExerciseVariant {
                name: "Incline Bench Press",
                muscle_groups: Some(&["Upper Chest", "Triceps", "Shoulders"]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Dumbbell Bench Press",
                equipment: Some(Equipment::Dumbbell),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Overhead Press",
        category: Category::Push,
        muscle_groups: &["Shoulders", "Triceps"],
        equipment: Equipment::Barbell,
        variants: &[ExerciseVariant {
            name: "Dumbbell Shoulder Press",
            equipment: Some(Equipment::Dumbbell),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Push-ups",
        category: Category::Push,
        muscle_groups: CHEST_TRICEPS_SHOULDERS,
        equipment: Equipment::Bodyweight,
        variants: &[],
    },
    BaseExercise {
        name: "Dips",
        category: Category::Push,
        muscle_groups: CHEST_TRICEPS_SHOULDERS,
        equipment: Equipment::Bodyweight,
        variants: &[],
    },
    BaseExercise {
        name: "Tricep Pushdown",
        category: Category::Push,
        muscle_groups: &["Triceps"],
        equipment: Equipment::Cable,
        variants: &[],
    },
    BaseExercise {
        name: "Lateral Raises",
        category: Category::Push,
        muscle_groups: &["Shoulders"],
        equipment: Equipment::Dumbbell,
        variants: &[],
    },
    BaseExercise {
        name: "Chest Fly",
        category: Category::Push,
        muscle_groups: &["Chest"],
        equipment: Equipment::Dumbbell,
        variants: &[],
    },
    // Pull
    BaseExercise {
        name: "Deadlift",
        category: Category::Pull,
        muscle_groups: &["Back", "Hamstrings", "Glutes"],
        equipment: Equipment::Barbell,
        variants: &[],
    },
    BaseExercise {
        name: "Barbell Row",
        category: Category::Pull,
        muscle_groups: BACK_BICEPS,
        equipment: Equipment::Barbell,
        variants: &[ExerciseVariant {
            name: "Dumbbell Row",
            equipment: Some(Equipment::Dumbbell),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Pull-ups",
        category: Category::Pull,
        muscle_groups: BACK_BICEPS,
        equipment: Equipment::Bodyweight,
        variants: &[ExerciseVariant {
            name: "Chin-ups",
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Lat Pulldown",
        category: Category::Pull,
        muscle_groups: BACK_BICEPS,
        equipment: Equipment::Cable,
        variants: &[],
    },
    BaseExercise {
        name: "Seated Cable Row",
        category: Category::Pull,
        muscle_groups: BACK_BICEPS,
        equipment: Equipment::Cable,
        variants: &[],
    },
    BaseExercise {
        name: "Face Pulls",
        category: Category::Pull,
        muscle_groups: &["Rear Delts", "Upper Back"],
        equipment: Equipment::Cable,
        variants: &[],
    },
    BaseExercise {
        name: "Barbell Curl",
        category: Category::Pull,
        muscle_groups: &["Biceps"],
        equipment: Equipment::Barbell,
        variants: &[
            ExerciseVariant {
                name: "Dumbbell Curl",
                equipment: Some(Equipment::Dumbbell),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Hammer Curl",
                muscle_groups: Some(&["Biceps", "Forearms"]),
                equipment: Some(Equipment::Dumbbell),
            },
        ],
    },
    // Legs
    BaseExercise {
        name: "Squat",
        category: Category::Legs,
        muscle_groups: QUADS_GLUTES_HAMSTRINGS,
        equipment: Equipment::Barbell,
        variants: &[ExerciseVariant {
            name: "Front Squat",
            muscle_groups: Some(&["Quads", "Glutes", "Core"]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Leg Press",
        category: Category::Legs,
        muscle_groups: QUADS_GLUTES_HAMSTRINGS,
        equipment: Equipment::Machine,
        variants: &[],
    },
    BaseExercise {
        name: "Romanian Deadlift",
        category: Category::Legs,
        muscle_groups: &["Hamstrings", "Glutes", "Lower Back"],
        equipment: Equipment::Barbell,
        variants: &[],
    },
    BaseExercise {
        name: "Lunges",
        category: Category::Legs,
        muscle_groups: QUADS_GLUTES_HAMSTRINGS,
        equipment: Equipment::Dumbbell,
        variants: &[ExerciseVariant {
            name: "Bulgarian Split Squat",
            muscle_groups: Some(&["Quads", "Glutes"]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Leg Extension",
        category: Category::Legs,
        muscle_groups: &["Quads"],
        equipment: Equipment::Machine,
        variants: &[],
    },
    BaseExercise {
        name: "Leg Curl",
        category: Category::Legs,
        muscle_groups: &["Hamstrings"],
        equipment: Equipment::Machine,
        variants: &[],
    },
    BaseExercise {
        name: "Calf Raises",
        category: Category::Legs,
        muscle_groups: &["Calves"],
        equipment: Equipment::Machine,
        variants: &[],
    },
    BaseExercise {
        name: "Hip Thrust",
        category: Category::Legs,
        muscle_groups: &["Glutes", "Hamstrings"],
        equipment: Equipment::Barbell,
        variants: &[],
    },
    // Core
    BaseExercise {
        name: "Plank",
        category: Category::Core,
        muscle_groups: &["Core"],
        equipment: Equipment::Bodyweight,
        variants: &[],
    },
    BaseExercise {
        name: "Crunches",
        category: Category::Core,
        muscle_groups: &["Abs"],
        equipment: Equipment::Bodyweight,
        variants: &[],
    },
    BaseExercise {
        name: "Leg Raises",
        category: Category::Core,
        muscle_groups: &["Lower Abs"],
        equipment: Equipment::Bodyweight,
        variants: &[],
    },
    BaseExercise {
        name: "Russian Twist",
        category: Category::Core,
        muscle_groups: &["Obliques"],
        equipment: Equipment::Bodyweight,
        variants: &[],
    },
    BaseExercise {
        name: "Cable Woodchop",
        category: Category::Core,
        muscle_groups: &["Obliques", "Core"],
        equipment: Equipment::Cable,
        variants: &[],
    },
    BaseExercise {
        name: "Ab Rollout",
        category: Category::Core,
        muscle_groups: &["Core"],
        equipment: Equipment::Other,
        variants: &[],
    },
    BaseExercise {
        name: "Dead Bug",
        category: Category::Core,
        muscle_groups: &["Core"],
        equipment: Equipment::Bodyweight,
        variants: &[],
    },
    BaseExercise {
        name: "Mountain Climbers",
        category: Category::Core,
        muscle_groups: &["Core", "Shoulders"],
        equipment: Equipment::Bodyweight,
        variants: &[],
    },
    // Cardio
    BaseExercise {
        name: "Treadmill Running",
        category: Category::Cardio,
        muscle_groups: LEGS_CARDIO,
        equipment: Equipment::Machine,
        variants: &[],
    },
    BaseExercise {
        name: "Cycling",
        category: Category::Cardio,
        muscle_groups: LEGS_CARDIO,
        equipment: Equipment::Machine,
        variants: &[],
    },
    BaseExercise {
        name: "Rowing Machine",
        category: Category::Cardio,
        muscle_groups: FULL_BODY_CARDIO,
        equipment: Equipment::Machine,
        variants: &[],
    },
    BaseExercise {
        name: "Stair Climber",
        category: Category::Cardio,
        muscle_groups: LEGS_CARDIO,
        equipment: Equipment::Machine,
        variants: &[],
    },
    BaseExercise {
        name: "Jump Rope",
        category: Category::Cardio,
        muscle_groups: FULL_BODY_CARDIO,
        equipment: Equipment::Other,
        variants: &[],
    },
    BaseExercise {
        name: "Burpees",
        category: Category::Cardio,
        muscle_groups: FULL_BODY_CARDIO,
        equipment: Equipment::Bodyweight,
        variants: &[],
    },
];
