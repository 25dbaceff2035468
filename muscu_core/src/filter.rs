//! Filtering of a session log by category and exercise.

use crate::Logged;

/// Wildcard selector value shown to the user
pub const ALL: &str = "Tout";

/// A category or exercise selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    All,
    Only(String),
}

impl Selector {
    /// Blank text and `"Tout"` mean no filter
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == ALL {
            Selector::All
        } else {
            Selector::Only(s.to_string())
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
        }
    }
}

impl From<Option<&str>> for Selector {
    fn from(value: Option<&str>) -> Self {
        value.map(Selector::parse).unwrap_or(Selector::All)
    }
}

/// Records matching the selectors, newest first
///
/// The exercise selector only applies when a category is selected. Records
/// sharing a date keep their log order.
pub fn filter<R: Logged + Clone>(log: &[R], category: &Selector, exercise: &Selector) -> Vec<R> {
    let by_exercise = matches!(category, Selector::Only(_));

    let mut matching: Vec<R> = log
        .iter()
        .filter(|r| category.matches(r.category()))
        .filter(|r| !by_exercise || exercise.matches(r.exercise()))
        .cloned()
        .collect();

    // Stable sort: ties stay in insertion order
    matching.sort_by(|a, b| b.date().cmp(&a.date()));

    tracing::debug!(
        "Filter {:?} / {:?}: {} of {} records",
        category,
        exercise,
        matching.len(),
        log.len()
    );
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardioRecord, Difficulty, StrengthRecord, NO_SUPERSET};
    use chrono::NaiveDate;

    fn record(category: &str, exercise: &str, date: &str) -> StrengthRecord {
        StrengthRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            exercise: exercise.into(),
            category: category.into(),
            load: None,
            difficulty: Difficulty::Unset,
            repetitions: 10,
            series: 4,
            rest: 90,
            superset: NO_SUPERSET.into(),
        }
    }

    fn dates(records: &[StrengthRecord]) -> Vec<String> {
        records.iter().map(|r| r.date.to_string()).collect()
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!(Selector::parse(""), Selector::All);
        assert_eq!(Selector::parse("Tout"), Selector::All);
        assert_eq!(Selector::parse(" Dos "), Selector::Only("Dos".into()));
        assert_eq!(Selector::from(None), Selector::All);
    }

    #[test]
    fn test_filter_category_only() {
        let log = vec![
            record("Cardio", "Vélo", "2024-03-01"),
            record("Dos", "Tirage", "2024-03-02"),
            record("Dos", "Rowing", "2024-03-03"),
        ];

        let result = filter(&log, &Selector::parse("Dos"), &Selector::parse("Tout"));
        assert_eq!(dates(&result), vec!["2024-03-03", "2024-03-02"]);
    }

    #[test]
    fn test_filter_all_sorts_whole_log() {
        let log = vec![
            record("Dos", "Tirage", "2024-03-02"),
            record("Jambes", "Squat", "2024-03-05"),
            record("Dos", "Tirage", "2024-03-01"),
        ];

        let result = filter(&log, &Selector::All, &Selector::All);
        assert_eq!(dates(&result), vec!["2024-03-05", "2024-03-02", "2024-03-01"]);
    }

    #[test]
    fn test_exercise_ignored_without_category() {
        let log = vec![
            record("Dos", "Tirage", "2024-03-02"),
            record("Jambes", "Squat", "2024-03-05"),
        ];

        let result = filter(&log, &Selector::All, &Selector::parse("Squat"));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_filter_category_and_exercise() {
        let log = vec![
            record("Dos", "Tirage", "2024-03-01"),
            record("Dos", "Rowing", "2024-03-02"),
            record("Bras", "Tirage", "2024-03-03"),
            record("Dos", "Tirage", "2024-03-04"),
        ];

        let result = filter(&log, &Selector::parse("Dos"), &Selector::parse("Tirage"));
        assert_eq!(dates(&result), vec!["2024-03-04", "2024-03-01"]);
        assert!(result.iter().all(|r| r.category == "Dos" && r.exercise == "Tirage"));
    }

    #[test]
    fn test_same_day_keeps_insertion_order() {
        let log = vec![
            record("Dos", "Tirage", "2024-03-01"),
            record("Dos", "Rowing", "2024-03-02"),
            record("Dos", "Pull-over", "2024-03-02"),
        ];

        let result = filter(&log, &Selector::parse("Dos"), &Selector::All);
        let names: Vec<_> = result.iter().map(|r| r.exercise.as_str()).collect();
        assert_eq!(names, vec!["Rowing", "Pull-over", "Tirage"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let log = vec![record("Dos", "Tirage", "2024-03-01")];
        assert!(filter(&log, &Selector::parse("Jambes"), &Selector::All).is_empty());

        let empty: Vec<CardioRecord> = vec![];
        assert!(filter(&empty, &Selector::All, &Selector::All).is_empty());
    }

    #[test]
    fn test_filter_is_deterministic() {
        let log = vec![
            record("Dos", "Tirage", "2024-03-02"),
            record("Dos", "Rowing", "2024-03-02"),
        ];
        let a = filter(&log, &Selector::parse("Dos"), &Selector::All);
        let b = filter(&log, &Selector::parse("Dos"), &Selector::All);
        assert_eq!(a, b);
    }
}
