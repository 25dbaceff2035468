//! Pre-filled values for the new-session form.
//!
//! A new entry repeats the last performance logged for the exact same
//! exercise. Without history the configured per-category fallbacks apply:
//! leg exercises start at a higher repetition count than the rest.

use crate::config::DefaultsConfig;
use crate::filter::{filter, Selector};
use crate::store::SessionStore;
use crate::{Difficulty, StrengthRecord, CARDIO_CATEGORY, NO_SUPERSET};
use chrono::NaiveDate;

/// Form defaults for a strength entry
#[derive(Clone, Debug, PartialEq)]
pub struct StrengthDefaults {
    pub series: u32,
    pub repetitions: u32,
    pub load: Option<f64>,
    pub rest: u32,
    pub difficulty: Difficulty,
    /// `NO_SUPERSET` followed by the exercises already logged that day
    pub superset_options: Vec<String>,
}

/// Form defaults for a cardio entry
#[derive(Clone, Debug, PartialEq)]
pub struct CardioDefaults {
    pub duration: f64,
    pub difficulty: Difficulty,
    pub splits: String,
    pub levels: String,
}

/// Resolve strength defaults for `(category, exercise)` logged on `date`
///
/// Superset options list the exercises already logged on that same date,
/// which is today unless the session is logged after the fact.
pub fn resolve_strength(
    category: &str,
    exercise: &str,
    store: &SessionStore,
    date: NaiveDate,
    config: &DefaultsConfig,
) -> StrengthDefaults {
    let history = filter(
        store.strength(),
        &Selector::Only(category.to_string()),
        &Selector::Only(exercise.to_string()),
    );

    let superset_options = superset_options(store.strength(), date);

    match history.first() {
        Some(last) => {
            tracing::debug!(
                "Defaults for {} / {} copied from session of {}",
                category,
                exercise,
                last.date
            );
            StrengthDefaults {
                series: last.series,
                repetitions: last.repetitions,
                load: last.load,
                rest: last.rest,
                difficulty: last.difficulty,
                superset_options,
            }
        }
        None => {
            let repetitions = if category == config.legs_category {
                config.legs_repetitions
            } else {
                config.repetitions
            };
            tracing::debug!("No history for {} / {}, using fallbacks", category, exercise);
            StrengthDefaults {
                series: config.series,
                repetitions,
                load: None,
                rest: config.rest,
                difficulty: Difficulty::Unset,
                superset_options,
            }
        }
    }
}

/// Resolve cardio defaults for one cardio exercise
pub fn resolve_cardio(exercise: &str, store: &SessionStore, config: &DefaultsConfig) -> CardioDefaults {
    let history = filter(
        store.cardio(),
        &Selector::Only(CARDIO_CATEGORY.to_string()),
        &Selector::Only(exercise.to_string()),
    );

    match history.first() {
        Some(last) => CardioDefaults {
            duration: last.duration,
            difficulty: last.difficulty,
            splits: "[]".into(),
            levels: "[]".into(),
        },
        None => CardioDefaults {
            duration: config.cardio_duration,
            difficulty: Difficulty::Unset,
            splits: "[]".into(),
            levels: "[]".into(),
        },
    }
}

/// Superset partners available on `date`: "Non" plus each exercise logged that day
///
/// Dates are compared as values, never through their formatted text.
pub fn superset_options(strength_log: &[StrengthRecord], date: NaiveDate) -> Vec<String> {
    let mut options = vec![NO_SUPERSET.to_string()];
    for record in strength_log.iter().filter(|r| r.date == date) {
        if !options.contains(&record.exercise) {
            options.push(record.exercise.clone());
        }
    }
    options
}
