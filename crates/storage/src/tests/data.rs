use gymtracker_domain as domain;

pub static NEW_EXERCISES: std::sync::LazyLock<Vec<domain::NewExercise>> =
    std::sync::LazyLock::new(|| {
        vec![
            NEW_EXERCISE.clone(),
            NEW_EXERCISE_2.clone(),
            NEW_EXERCISE_3.clone(),
        ]
    });

pub static NEW_EXERCISE: std::sync::LazyLock<domain::NewExercise> =
    std::sync::LazyLock::new(|| domain::NewExercise {
        name: domain::Name::new("Bench Press").unwrap(),
        category: domain::Category::Push,
        muscle_groups: vec![
            "Chest".to_string(),
            "Triceps".to_string(),
            "Shoulders".to_string(),
        ],
        equipment: domain::Equipment::Barbell,
        custom: false,
    });

pub static NEW_EXERCISE_2: std::sync::LazyLock<domain::NewExercise> =
    std::sync::LazyLock::new(|| domain::NewExercise {
        name: domain::Name::new("Overhead Press").unwrap(),
        category: domain::Category::Push,
        muscle_groups: vec!["Shoulders".to_string(), "Triceps".to_string()],
        equipment: domain::Equipment::Barbell,
        custom: false,
    });

pub static NEW_EXERCISE_3: std::sync::LazyLock<domain::NewExercise> =
    std::sync::LazyLock::new(|| domain::NewExercise {
        name: domain::Name::new("Tricep Pushdown").unwrap(),
        category: domain::Category::Push,
        muscle_groups: vec!["Triceps".to_string()],
        equipment: domain::Equipment::Cable,
        custom: true,
    });

pub static ROUTINE_NAME: std::sync::LazyLock<domain::Name> =
    std::sync::LazyLock::new(|| domain::Name::new("Push Day").unwrap());

pub fn weight(value: f32) -> domain::Weight {
    domain::Weight::new(value).unwrap()
}

pub fn reps(value: u32) -> domain::Reps {
    domain::Reps::new(value).unwrap()
}

pub fn rpe(value: u8) -> domain::RPE {
    domain::RPE::new(value).unwrap()
}
