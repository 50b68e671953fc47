pub mod catalog;
pub mod types;

pub use catalog::{find_question, validate_catalog, DEFAULT_RECOVERY_MENU, QUESTION_DEFINITIONS};
pub use types::{InputType, QuestionDefinition, Section, SelectOption};

use crate::config::Settings;

/// Questions to ask today: enabled ones, minus those set to be skipped on
/// days off when `day_off` is true.
pub fn active_questions(settings: &Settings, day_off: bool) -> Vec<QuestionDefinition> {
    QUESTION_DEFINITIONS
        .iter()
        .filter(|q| settings.is_enabled(q.id))
        .filter(|q| !(day_off && settings.skips_on_holiday(q.id)))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_questions_by_default() {
        let settings = Settings::default();
        assert_eq!(active_questions(&settings, false).len(), QUESTION_DEFINITIONS.len());
        assert_eq!(active_questions(&settings, true).len(), QUESTION_DEFINITIONS.len());
    }

    #[test]
    fn test_disabled_question_is_dropped() {
        let mut settings = Settings::default();
        settings.questions_enabled.insert("B2".to_string(), false);
        let ids: Vec<_> = active_questions(&settings, false).iter().map(|q| q.id).collect();
        assert!(!ids.contains(&"B2"));
        assert_eq!(ids.len(), QUESTION_DEFINITIONS.len() - 1);
    }

    #[test]
    fn test_skip_holiday_only_applies_on_days_off() {
        let mut settings = Settings::default();
        settings.questions_skip_holiday.insert("B1".to_string(), true);
        settings.questions_skip_holiday.insert("B2".to_string(), true);

        let workday: Vec<_> = active_questions(&settings, false).iter().map(|q| q.id).collect();
        assert!(workday.contains(&"B1"));

        let day_off: Vec<_> = active_questions(&settings, true).iter().map(|q| q.id).collect();
        assert!(!day_off.contains(&"B1"));
        assert!(!day_off.contains(&"B2"));
        assert_eq!(day_off.len(), QUESTION_DEFINITIONS.len() - 2);
    }

    #[test]
    fn test_order_follows_catalog() {
        let settings = Settings::default();
        let ids: Vec<_> = active_questions(&settings, false).iter().map(|q| q.id).collect();
        let catalog: Vec<_> = QUESTION_DEFINITIONS.iter().map(|q| q.id).collect();
        assert_eq!(ids, catalog);
    }
}
