use std::slice::Iter;

use crate::{Property, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<AppSettings, ReadError>;
    async fn set_language(&self, language: Language) -> Result<(), UpdateError>;
    async fn set_weight_unit(&self, weight_unit: WeightUnit) -> Result<(), UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<AppSettings, ReadError>;
    async fn write_language(&self, language: Language) -> Result<(), UpdateError>;
    async fn write_weight_unit(&self, weight_unit: WeightUnit) -> Result<(), UpdateError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppSettings {
    pub language: Language,
    pub weight_unit: WeightUnit,
}

impl AppSettings {
    pub const LANGUAGE_KEY: &'static str = "language";
    pub const WEIGHT_UNIT_KEY: &'static str = "weight_unit";

    /// Settings from stored codes. Missing or unknown codes fall back to the defaults.
    #[must_use]
    pub fn from_codes(language: Option<&str>, weight_unit: Option<&str>) -> Self {
        Self {
            language: language
                .and_then(|code| code.parse().ok())
                .unwrap_or_default(),
            weight_unit: weight_unit
                .and_then(|code| code.parse().ok())
                .unwrap_or_default(),
        }
    }
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString,
)]
pub enum Language {
    #[default]
    #[strum(serialize = "en")]
    English,
    #[strum(serialize = "es")]
    Spanish,
}

impl Property for Language {
    fn iter() -> Iter<'static, Language> {
        static LANGUAGE: [Language; 2] = [Language::English, Language::Spanish];
        LANGUAGE.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
        }
    }
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString,
)]
pub enum WeightUnit {
    #[default]
    #[strum(serialize = "kg")]
    Kg,
    #[strum(serialize = "lb")]
    Lb,
}

impl Property for WeightUnit {
    fn iter() -> Iter<'static, WeightUnit> {
        static WEIGHT_UNIT: [WeightUnit; 2] = [WeightUnit::Kg, WeightUnit::Lb];
        WEIGHT_UNIT.iter()
    }

    fn name(self) -> &'static str {
        match self {
            WeightUnit::Kg => "Kilograms (kg)",
            WeightUnit::Lb => "Pounds (lb)",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, None, Language::English, WeightUnit::Kg)]
    #[case(Some("es"), Some("lb"), Language::Spanish, WeightUnit::Lb)]
    #[case(Some("fr"), Some("stone"), Language::English, WeightUnit::Kg)]
    #[case(Some("en"), Some("lb"), Language::English, WeightUnit::Lb)]
    fn test_app_settings_from_codes(
        #[case] language: Option<&str>,
        #[case] weight_unit: Option<&str>,
        #[case] expected_language: Language,
        #[case] expected_weight_unit: WeightUnit,
    ) {
        assert_eq!(
            AppSettings::from_codes(language, weight_unit),
            AppSettings {
                language: expected_language,
                weight_unit: expected_weight_unit,
            }
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(Language::Spanish.as_ref(), "es");
        assert_eq!(WeightUnit::Lb.as_ref(), "lb");
        assert_eq!(
            Language::iter().map(|l| l.name()).collect::<Vec<_>>(),
            vec!["English", "Español"]
        );
        assert_eq!(
            WeightUnit::iter().map(|u| u.as_ref()).collect::<Vec<_>>(),
            vec!["kg", "lb"]
        );
    }
}
