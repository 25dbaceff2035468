//! Per-user workout state.
//!
//! `WorkoutState` bundles the catalog and the session store. It is owned by
//! the caller and handed to each operation explicitly. Queries borrow it;
//! commands mutate it and report what changed so the front end can decide
//! what to redraw.

use crate::appender::{self, CardioEntry, StrengthEntry};
use crate::catalog::Catalog;
use crate::config::DefaultsConfig;
use crate::defaults::{self, CardioDefaults, StrengthDefaults};
use crate::filter::{filter, Selector};
use crate::store::SessionStore;
use crate::workbook::{self, Document};
use crate::{is_cardio, CardioRecord, Result, StrengthRecord};
use chrono::NaiveDate;
use std::path::Path;

/// What a command changed
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    Loaded {
        strength: usize,
        cardio: usize,
        catalog: usize,
    },
    StrengthAppended {
        position: usize,
    },
    CardioAppended {
        position: usize,
    },
    ExerciseAdded {
        category: String,
        exercise: String,
    },
    Cleared,
}

/// Filtered slice of whichever log the category routes to
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    Strength(Vec<StrengthRecord>),
    Cardio(Vec<CardioRecord>),
}

impl View {
    pub fn len(&self) -> usize {
        match self {
            View::Strength(records) => records.len(),
            View::Cardio(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Catalog plus both session logs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkoutState {
    catalog: Catalog,
    store: SessionStore,
}

impl WorkoutState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            store: SessionStore::new(),
        }
    }

    /// Build state from an uploaded document
    pub fn from_document(document: &Document) -> Result<Self> {
        let mut state = Self::default();
        state.load(document)?;
        Ok(state)
    }

    /// Read a workbook file into fresh state
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_document(&workbook::read_workbook(path)?)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Replace everything with the document's content
    ///
    /// The catalog and both logs are built before anything is swapped in, so
    /// a malformed document leaves the current state as it was.
    pub fn load(&mut self, document: &Document) -> Result<Change> {
        let catalog = workbook::read_catalog(&document.catalog)?;
        let mut store = SessionStore::new();
        store.load(&document.strength, &document.cardio)?;

        self.catalog = catalog;
        self.store = store;

        Ok(Change::Loaded {
            strength: self.store.strength().len(),
            cardio: self.store.cardio().len(),
            catalog: self.catalog.len(),
        })
    }

    pub fn add_exercise(&mut self, category: &str, exercise: &str, muscle: Option<&str>) -> Result<Change> {
        self.catalog.add(category, exercise, muscle)?;
        tracing::info!("Added exercise {} / {} to catalog", category.trim(), exercise.trim());
        Ok(Change::ExerciseAdded {
            category: category.trim().to_string(),
            exercise: exercise.trim().to_string(),
        })
    }

    pub fn append_strength(&mut self, entry: StrengthEntry) -> Result<Change> {
        let position = appender::append_strength(&mut self.store, &self.catalog, entry)?;
        Ok(Change::StrengthAppended { position })
    }

    pub fn append_cardio(&mut self, entry: CardioEntry) -> Result<Change> {
        let position = appender::append_cardio(&mut self.store, &self.catalog, entry)?;
        Ok(Change::CardioAppended { position })
    }

    /// Drop all state at session end
    pub fn clear(&mut self) -> Change {
        *self = Self::default();
        tracing::info!("Cleared workout state");
        Change::Cleared
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Filtered view, newest first
    ///
    /// A `Cardio` category, or `cardio = true` with no category, reads the
    /// cardio log; anything else reads the strength log.
    pub fn view(&self, category: &Selector, exercise: &Selector, cardio: bool) -> View {
        let cardio_log = match category {
            Selector::Only(c) => is_cardio(c),
            Selector::All => cardio,
        };

        if cardio_log {
            View::Cardio(filter(self.store.cardio(), category, exercise))
        } else {
            View::Strength(filter(self.store.strength(), category, exercise))
        }
    }

    pub fn strength_defaults(
        &self,
        category: &str,
        exercise: &str,
        date: NaiveDate,
        config: &DefaultsConfig,
    ) -> StrengthDefaults {
        defaults::resolve_strength(category, exercise, &self.store, date, config)
    }

    pub fn cardio_defaults(&self, exercise: &str, config: &DefaultsConfig) -> CardioDefaults {
        defaults::resolve_cardio(exercise, &self.store, config)
    }

    /// Flatten into the three-table document
    pub fn export(&self) -> Document {
        workbook::export_document(&self.catalog, &self.store)
    }

    /// Write the workbook, replacing `path` atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        workbook::write_workbook(path, &self.export())
    }
}
