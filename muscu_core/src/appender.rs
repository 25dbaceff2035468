//! Validation of new session entries.
//!
//! Form values arrive untyped enough to be wrong (fractional repetitions,
//! zero rest, an exercise from another category). Each entry is checked in a
//! fixed order and the first violated constraint is reported; nothing is
//! ever rounded or defaulted behind the user's back.

use crate::catalog::Catalog;
use crate::store::SessionStore;
use crate::{
    is_cardio, CardioRecord, Difficulty, Result, SessionRecord, StrengthRecord, ValidationError,
    CARDIO_CATEGORY, NO_SUPERSET,
};
use chrono::NaiveDate;

/// Shortest cardio session that can be logged, in minutes
pub const MIN_CARDIO_DURATION: f64 = 5.0;

/// Raw values of the new strength session form
#[derive(Clone, Debug, PartialEq)]
pub struct StrengthEntry {
    pub date: NaiveDate,
    pub category: String,
    pub exercise: String,
    pub load: Option<f64>,
    pub difficulty: Difficulty,
    pub repetitions: f64,
    pub series: f64,
    pub rest: f64,
    pub superset: String,
}

/// Raw values of the new cardio session form
#[derive(Clone, Debug, PartialEq)]
pub struct CardioEntry {
    pub date: NaiveDate,
    pub exercise: String,
    pub duration: f64,
    pub difficulty: Difficulty,
    pub splits: String,
    pub levels: String,
}

/// Parse a form date, day-first or ISO
pub fn parse_entry_date(text: &str) -> std::result::Result<NaiveDate, ValidationError> {
    crate::workbook::parse_date(text).ok_or_else(|| ValidationError::InvalidDate(text.to_string()))
}

/// Parse a form difficulty: a label, a rating, or blank for unset
pub fn parse_entry_difficulty(text: &str) -> std::result::Result<Difficulty, ValidationError> {
    Difficulty::parse(text).ok_or_else(|| ValidationError::UnknownDifficulty(text.trim().to_string()))
}

/// Validate a strength entry and append it; returns its position in the log
pub fn append_strength(
    store: &mut SessionStore,
    catalog: &Catalog,
    entry: StrengthEntry,
) -> Result<usize> {
    check_strength_category(&entry.category)?;
    check_pair(&entry.category, &entry.exercise, catalog)?;
    check_load(entry.load)?;
    let record = StrengthRecord {
        date: entry.date,
        load: entry.load,
        difficulty: entry.difficulty,
        repetitions: whole("repetitions", entry.repetitions)?,
        series: whole("series", entry.series)?,
        rest: whole("rest", entry.rest)?,
        category: entry.category,
        exercise: entry.exercise,
        superset: entry.superset,
    };
    store.append(SessionRecord::Strength(record), catalog)
}

/// Validate a cardio entry and append it; returns its position in the log
pub fn append_cardio(store: &mut SessionStore, catalog: &Catalog, entry: CardioEntry) -> Result<usize> {
    let record = CardioRecord {
        date: entry.date,
        exercise: entry.exercise,
        category: CARDIO_CATEGORY.to_string(),
        duration: entry.duration,
        difficulty: entry.difficulty,
        splits: entry.splits,
        levels: entry.levels,
    };
    store.append(SessionRecord::Cardio(record), catalog)
}

fn whole(field: &'static str, value: f64) -> std::result::Result<u32, ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    if value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(ValidationError::NotInteger { field, value });
    }
    Ok(value as u32)
}

fn check_strength_category(category: &str) -> std::result::Result<(), ValidationError> {
    if is_cardio(category) {
        return Err(ValidationError::CardioInStrengthLog(category.to_string()));
    }
    Ok(())
}

fn check_load(load: Option<f64>) -> std::result::Result<(), ValidationError> {
    match load {
        Some(value) if !value.is_finite() || value <= 0.0 => Err(ValidationError::NotPositive {
            field: "load",
            value,
        }),
        _ => Ok(()),
    }
}

fn check_pair(category: &str, exercise: &str, catalog: &Catalog) -> std::result::Result<(), ValidationError> {
    if !catalog.has_category(category) {
        return Err(ValidationError::UnknownCategory(category.to_string()));
    }
    if !catalog.contains(category, exercise) {
        return Err(ValidationError::UnknownExercise {
            category: category.to_string(),
            exercise: exercise.to_string(),
        });
    }
    Ok(())
}

fn check_difficulty(difficulty: Difficulty) -> std::result::Result<(), ValidationError> {
    match difficulty {
        Difficulty::Rating(r) if !difficulty.is_valid() => Err(ValidationError::DifficultyOutOfRange(r)),
        _ => Ok(()),
    }
}

fn check_sequence(field: &'static str, serialized: &str) -> std::result::Result<(), ValidationError> {
    serde_json::from_str::<Vec<serde_json::Value>>(serialized)
        .map(|_| ())
        .map_err(|e| ValidationError::MalformedSequence {
            field,
            reason: e.to_string(),
        })
}

/// Invariants of a strength record about to join `log`
pub(crate) fn check_strength(
    record: &StrengthRecord,
    catalog: &Catalog,
    log: &[StrengthRecord],
) -> std::result::Result<(), ValidationError> {
    check_strength_category(&record.category)?;
    check_pair(&record.category, &record.exercise, catalog)?;
    check_load(record.load)?;

    for (field, value) in [
        ("repetitions", record.repetitions),
        ("series", record.series),
        ("rest", record.rest),
    ] {
        if value == 0 {
            return Err(ValidationError::NotPositive {
                field,
                value: f64::from(value),
            });
        }
    }

    check_difficulty(record.difficulty)?;

    let partner_logged = log
        .iter()
        .any(|r| r.date == record.date && r.exercise == record.superset);
    if record.superset != NO_SUPERSET && !partner_logged {
        return Err(ValidationError::UnknownSuperset(record.superset.clone()));
    }

    Ok(())
}

/// Invariants of a cardio record
pub(crate) fn check_cardio(record: &CardioRecord, catalog: &Catalog) -> std::result::Result<(), ValidationError> {
    if !is_cardio(&record.category) {
        return Err(ValidationError::NotCardio(record.category.clone()));
    }
    check_pair(&record.category, &record.exercise, catalog)?;

    if !record.duration.is_finite() || record.duration < MIN_CARDIO_DURATION {
        return Err(ValidationError::DurationTooShort {
            value: record.duration,
            min: MIN_CARDIO_DURATION,
        });
    }

    check_difficulty(record.difficulty)?;
    check_sequence("splits", &record.splits)?;
    check_sequence("levels", &record.levels)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add("Jambes", "Squat", None).unwrap();
        catalog.add("Jambes", "Fentes", None).unwrap();
        catalog.add("Dos", "Tirage", None).unwrap();
        catalog.add("Cardio", "Vélo", None).unwrap();
        catalog
    }

    fn squat() -> StrengthEntry {
        StrengthEntry {
            date: day(1),
            category: "Jambes".into(),
            exercise: "Squat".into(),
            load: Some(80.0),
            difficulty: Difficulty::Keep,
            repetitions: 8.0,
            series: 5.0,
            rest: 120.0,
            superset: NO_SUPERSET.into(),
        }
    }

    fn ride() -> CardioEntry {
        CardioEntry {
            date: day(1),
            exercise: "Vélo".into(),
            duration: 30.0,
            difficulty: Difficulty::Rating(3),
            splits: "[\"10:00\", \"20:00\"]".into(),
            levels: "[4, 6]".into(),
        }
    }

    fn rejects(entry: StrengthEntry) -> ValidationError {
        let mut store = SessionStore::new();
        match append_strength(&mut store, &catalog(), entry) {
            Err(Error::Validation(e)) => {
                assert!(store.is_empty());
                e
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn rejects_cardio(entry: CardioEntry) -> ValidationError {
        let mut store = SessionStore::new();
        match append_cardio(&mut store, &catalog(), entry) {
            Err(Error::Validation(e)) => {
                assert!(store.is_empty());
                e
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_strength_entry() {
        let mut store = SessionStore::new();
        let position = append_strength(&mut store, &catalog(), squat()).unwrap();

        assert_eq!(position, 0);
        let record = &store.strength()[0];
        assert_eq!((record.repetitions, record.series, record.rest), (8, 5, 120));
        assert_eq!(record.difficulty, Difficulty::Keep);
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        let entry = StrengthEntry {
            repetitions: 0.0,
            ..squat()
        };
        assert_eq!(
            rejects(entry),
            ValidationError::NotPositive {
                field: "repetitions",
                value: 0.0
            }
        );
    }

    #[test]
    fn test_fractional_series_rejected() {
        let entry = StrengthEntry {
            series: 3.5,
            ..squat()
        };
        assert!(matches!(
            rejects(entry),
            ValidationError::NotInteger { field: "series", .. }
        ));
    }

    #[test]
    fn test_negative_load_rejected() {
        let entry = StrengthEntry {
            load: Some(-5.0),
            ..squat()
        };
        assert!(matches!(
            rejects(entry),
            ValidationError::NotPositive { field: "load", .. }
        ));
    }

    #[test]
    fn test_load_checked_before_counts() {
        let entry = StrengthEntry {
            load: Some(-5.0),
            repetitions: 2.5,
            ..squat()
        };
        assert!(matches!(
            rejects(entry),
            ValidationError::NotPositive { field: "load", .. }
        ));
    }

    #[test]
    fn test_cardio_routing_checked_first() {
        let entry = StrengthEntry {
            category: "Cardio".into(),
            exercise: "Vélo".into(),
            repetitions: 0.0,
            ..squat()
        };
        assert_eq!(
            rejects(entry),
            ValidationError::CardioInStrengthLog("Cardio".into())
        );
    }

    #[test]
    fn test_parse_entry_difficulty() {
        assert_eq!(parse_entry_difficulty("augmenter"), Ok(Difficulty::Increase));
        assert_eq!(parse_entry_difficulty("4"), Ok(Difficulty::Rating(4)));
        assert_eq!(
            parse_entry_difficulty("hard"),
            Err(ValidationError::UnknownDifficulty("hard".into()))
        );
    }

    #[test]
    fn test_missing_load_accepted() {
        let mut store = SessionStore::new();
        let entry = StrengthEntry { load: None, ..squat() };
        append_strength(&mut store, &catalog(), entry).unwrap();
        assert_eq!(store.strength()[0].load, None);
    }

    #[test]
    fn test_unknown_category_and_mismatched_pair() {
        let entry = StrengthEntry {
            category: "Bras".into(),
            ..squat()
        };
        assert_eq!(rejects(entry), ValidationError::UnknownCategory("Bras".into()));

        let entry = StrengthEntry {
            category: "Dos".into(),
            ..squat()
        };
        assert!(matches!(rejects(entry), ValidationError::UnknownExercise { .. }));
    }

    #[test]
    fn test_catalog_checked_before_numbers() {
        let entry = StrengthEntry {
            category: "Bras".into(),
            repetitions: 0.0,
            ..squat()
        };
        assert!(matches!(rejects(entry), ValidationError::UnknownCategory(_)));
    }

    #[test]
    fn test_cardio_category_rejected_for_strength() {
        let entry = StrengthEntry {
            category: "Cardio".into(),
            exercise: "Vélo".into(),
            ..squat()
        };
        assert!(matches!(rejects(entry), ValidationError::CardioInStrengthLog(_)));
    }

    #[test]
    fn test_difficulty_out_of_range() {
        let entry = StrengthEntry {
            difficulty: Difficulty::Rating(7),
            ..squat()
        };
        assert_eq!(rejects(entry), ValidationError::DifficultyOutOfRange(7));
    }

    #[test]
    fn test_superset_requires_same_day_partner() {
        let catalog = catalog();
        let mut store = SessionStore::new();
        append_strength(&mut store, &catalog, squat()).unwrap();

        let paired = StrengthEntry {
            exercise: "Fentes".into(),
            superset: "Squat".into(),
            ..squat()
        };
        assert_eq!(append_strength(&mut store, &catalog, paired.clone()).unwrap(), 1);

        let next_day = StrengthEntry {
            date: day(2),
            ..paired
        };
        let err = append_strength(&mut store, &catalog, next_day).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownSuperset(_))
        ));
        assert_eq!(store.strength().len(), 2);
    }

    #[test]
    fn test_valid_cardio_entry() {
        let mut store = SessionStore::new();
        assert_eq!(append_cardio(&mut store, &catalog(), ride()).unwrap(), 0);
        assert_eq!(store.cardio()[0].category, CARDIO_CATEGORY);
    }

    #[test]
    fn test_fractional_duration_accepted() {
        let mut store = SessionStore::new();
        let entry = CardioEntry {
            duration: 5.5,
            ..ride()
        };
        append_cardio(&mut store, &catalog(), entry).unwrap();
        assert_eq!(store.cardio()[0].duration, 5.5);
    }

    #[test]
    fn test_short_cardio_rejected() {
        let entry = CardioEntry {
            duration: 4.9,
            ..ride()
        };
        assert!(matches!(
            rejects_cardio(entry),
            ValidationError::DurationTooShort { .. }
        ));
    }

    #[test]
    fn test_malformed_splits_rejected() {
        let entry = CardioEntry {
            splits: "10:00, 20:00".into(),
            ..ride()
        };
        assert!(matches!(
            rejects_cardio(entry),
            ValidationError::MalformedSequence { field: "splits", .. }
        ));
    }

    #[test]
    fn test_unknown_cardio_exercise() {
        let entry = CardioEntry {
            exercise: "Natation".into(),
            ..ride()
        };
        assert!(matches!(
            rejects_cardio(entry),
            ValidationError::UnknownExercise { .. }
        ));
    }

    #[test]
    fn test_parse_entry_date() {
        assert_eq!(parse_entry_date("2024-01-05").unwrap(), day(5));
        assert_eq!(parse_entry_date("05/01/2024").unwrap(), day(5));
        assert!(matches!(
            parse_entry_date("05/13/2024"),
            Err(ValidationError::InvalidDate(_))
        ));
    }
}
