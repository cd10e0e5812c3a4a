use std::slice::Iter;

use derive_more::{Deref, Display};

use crate::{CreateError, DeleteError, Name, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn get_exercise(&self, id: ExerciseID) -> Result<Option<Exercise>, ReadError>;
    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, CreateError>;
    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;

    /// Insert the predefined catalog if no exercise exists yet.
    ///
    /// Returns the number of inserted exercises.
    async fn seed_default_exercises(&self) -> Result<usize, CreateError>;

    async fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>, ReadError> {
        let exercises = self.get_exercises().await?;
        Ok(filter
            .exercises(exercises.iter())
            .into_iter()
            .cloned()
            .collect())
    }
}

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn read_exercise(&self, id: ExerciseID) -> Result<Option<Exercise>, ReadError>;
    async fn create_exercises(
        &self,
        exercises: Vec<NewExercise>,
    ) -> Result<Vec<Exercise>, CreateError>;
    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub category: Category,
    pub muscle_groups: Vec<String>,
    pub equipment: Equipment,
    pub custom: bool,
}

/// Exercise that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub name: Name,
    pub category: Category,
    pub muscle_groups: Vec<String>,
    pub equipment: Equipment,
    pub custom: bool,
}

impl NewExercise {
    #[must_use]
    pub fn with_id(self, id: ExerciseID) -> Exercise {
        Exercise {
            id,
            name: self.name,
            category: self.category,
            muscle_groups: self.muscle_groups,
            equipment: self.equipment,
            custom: self.custom,
        }
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(i64);

impl From<i64> for ExerciseID {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, strum::AsRefStr, strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Push,
    Pull,
    Legs,
    Core,
    Cardio,
}

impl Property for Category {
    fn iter() -> Iter<'static, Category> {
        static CATEGORY: [Category; 5] = [
            Category::Push,
            Category::Pull,
            Category::Legs,
            Category::Core,
            Category::Cardio,
        ];
        CATEGORY.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Category::Push => "Push",
            Category::Pull => "Pull",
            Category::Legs => "Legs",
            Category::Core => "Core",
            Category::Cardio => "Cardio",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::AsRefStr, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Machine,
    Cable,
    Bodyweight,
    Kettlebell,
    Bands,
    Other,
}

impl Property for Equipment {
    fn iter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 8] = [
            Equipment::Barbell,
            Equipment::Dumbbell,
            Equipment::Machine,
            Equipment::Cable,
            Equipment::Bodyweight,
            Equipment::Kettlebell,
            Equipment::Bands,
            Equipment::Other,
        ];
        EQUIPMENT.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Equipment::Barbell => "Barbell",
            Equipment::Dumbbell => "Dumbbell",
            Equipment::Machine => "Machine",
            Equipment::Cable => "Cable",
            Equipment::Bodyweight => "Bodyweight",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::Bands => "Resistance Bands",
            Equipment::Other => "Other",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExerciseFilter {
    pub name: String,
    pub category: Option<Category>,
}

impl ExerciseFilter {
    /// Matching exercises ordered by category and name.
    #[must_use]
    pub fn exercises<'a>(
        &self,
        exercises: impl Iterator<Item = &'a Exercise>,
    ) -> Vec<&'a Exercise> {
        let mut result = exercises
            .filter(|e| {
                e.name.matches(&self.name)
                    && self.category.is_none_or(|category| category == e.category)
            })
            .collect::<Vec<_>>();
        result.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        result
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.category.is_none()
    }

    #[must_use]
    pub fn category_list(&self) -> Vec<(Category, bool)> {
        Category::iter()
            .map(|c| (*c, self.category == Some(*c)))
            .collect::<Vec<_>>()
    }

    pub fn toggle_category(&mut self, category: Category) {
        if self.category == Some(category) {
            self.category = None;
        } else {
            self.category = Some(category);
        }
    }
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
}
