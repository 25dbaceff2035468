//! Category catalog: the known (category, exercise) combinations.
//!
//! Entries keep their insertion order so that category and exercise
//! listings come out in first-seen order, the way the spreadsheet lists them.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One (category, exercise) pair, optionally tagged with a muscle group
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub category: String,
    pub exercise: String,
    pub muscle: Option<String>,
}

/// The master list of valid category/exercise combinations
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    /// The catalog table carries a `Muscle` column, even if every cell is blank
    muscle_column: bool,
}

/// Cached starter catalog used for brand new workbooks
static STARTER_CATALOG: Lazy<Catalog> = Lazy::new(build_starter_catalog);

/// Get a reference to the cached starter catalog
pub fn starter_catalog() -> &'static Catalog {
    &STARTER_CATALOG
}

fn build_starter_catalog() -> Catalog {
    const STARTER: &[(&str, &[(&str, &str)])] = &[
        (
            "Dos",
            &[("Tirage vertical", "Grand dorsal"), ("Rowing barre", "Grand dorsal")],
        ),
        (
            "Pectoraux",
            &[("Développé couché", "Pectoraux"), ("Pompes", "Pectoraux")],
        ),
        (
            "Epaules",
            &[("Développé militaire", "Deltoïdes"), ("Élévations latérales", "Deltoïdes")],
        ),
        ("Bras", &[("Curl biceps", "Biceps"), ("Dips", "Triceps")]),
        ("Jambes", &[("Squat", "Quadriceps"), ("Soulevé de terre", "Ischios")]),
        ("Cardio", &[("Vélo", "Cardio"), ("Rameur", "Cardio")]),
    ];

    let entries = STARTER
        .iter()
        .flat_map(|(category, exercises)| {
            exercises.iter().map(move |(exercise, muscle)| CatalogEntry {
                category: (*category).into(),
                exercise: (*exercise).into(),
                muscle: Some((*muscle).into()),
            })
        })
        .collect();

    Catalog {
        entries,
        muscle_column: true,
    }
}

impl Catalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries, rejecting duplicate pairs
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self> {
        let mut catalog = Catalog::new();
        for entry in entries {
            catalog.add(&entry.category, &entry.exercise, entry.muscle.as_deref())?;
        }
        Ok(catalog)
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct category names in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(&entry.category);
            }
        }
        seen
    }

    /// Exercise names of one category in first-seen order; empty for an unknown category
    pub fn exercises(&self, category: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.exercise.as_str())
            .collect()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.entries.iter().any(|e| e.category == category)
    }

    /// Whether the exact (category, exercise) pair is known
    pub fn contains(&self, category: &str, exercise: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.category == category && e.exercise == exercise)
    }

    /// Whether exports write the `Muscle` column
    ///
    /// Set once any entry carries a muscle tag, or when the imported table
    /// had the column.
    pub fn has_muscle_column(&self) -> bool {
        self.muscle_column
    }

    pub(crate) fn keep_muscle_column(&mut self) {
        self.muscle_column = true;
    }

    /// Add a new (category, exercise) pair
    pub fn add(&mut self, category: &str, exercise: &str, muscle: Option<&str>) -> Result<()> {
        let category = category.trim();
        let exercise = exercise.trim();

        if category.is_empty() {
            return Err(Error::InvalidInput("category name is empty".into()));
        }
        if exercise.is_empty() {
            return Err(Error::InvalidInput("exercise name is empty".into()));
        }
        if self.contains(category, exercise) {
            return Err(Error::DuplicateEntry {
                category: category.into(),
                exercise: exercise.into(),
            });
        }

        let muscle = muscle.map(str::trim).filter(|m| !m.is_empty());
        self.muscle_column |= muscle.is_some();
        self.entries.push(CatalogEntry {
            category: category.into(),
            exercise: exercise.into(),
            muscle: muscle.map(Into::into),
        });

        tracing::debug!("Catalog: added {} / {}", category, exercise);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CARDIO_CATEGORY;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add("Dos", "Tirage", None).unwrap();
        catalog.add("Jambes", "Squat", Some("Quadriceps")).unwrap();
        catalog.add("Dos", "Rowing", None).unwrap();
        catalog.add("Cardio", "Vélo", None).unwrap();
        catalog
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(sample().categories(), vec!["Dos", "Jambes", "Cardio"]);
    }

    #[test]
    fn test_exercises_for_category() {
        let catalog = sample();
        assert_eq!(catalog.exercises("Dos"), vec!["Tirage", "Rowing"]);
        assert!(catalog.exercises("Bras").is_empty());
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut catalog = Catalog::new();
        catalog.add("Dos", "Tirage", None).unwrap();

        let err = catalog.add("Dos", "Tirage", None).unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { .. }));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_same_exercise_in_two_categories_allowed() {
        let mut catalog = Catalog::new();
        catalog.add("Dos", "Tirage", None).unwrap();
        catalog.add("Bras", "Tirage", None).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_add_empty_exercise_rejected() {
        let mut catalog = Catalog::new();
        let err = catalog.add("Dos", "  ", None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_added_exercise_visible() {
        let mut catalog = sample();
        catalog.add("Dos", "Pull-over", Some("")).unwrap();
        assert_eq!(catalog.exercises("Dos"), vec!["Tirage", "Rowing", "Pull-over"]);
        assert_eq!(catalog.entries().last().unwrap().muscle, None);
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let entry = CatalogEntry {
            category: "Dos".into(),
            exercise: "Tirage".into(),
            muscle: None,
        };
        assert!(Catalog::from_entries(vec![entry.clone(), entry]).is_err());
    }

    #[test]
    fn test_starter_catalog() {
        let catalog = starter_catalog();
        assert!(catalog.has_category(CARDIO_CATEGORY));
        assert!(catalog.contains("Jambes", "Squat"));
        assert!(catalog.has_muscle_column());
    }

    #[test]
    fn test_muscle_column_follows_tags() {
        let mut catalog = Catalog::new();
        catalog.add("Dos", "Tirage", None).unwrap();
        assert!(!catalog.has_muscle_column());

        catalog.add("Dos", "Rowing", Some("Grand dorsal")).unwrap();
        assert!(catalog.has_muscle_column());
    }
}
