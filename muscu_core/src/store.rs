//! Session store: the strength and cardio logs.
//!
//! Both logs are append-only. They are replaced wholesale on load and only
//! grow through `append`, which validates against the catalog first.

use crate::appender;
use crate::catalog::Catalog;
use crate::workbook::{self, Table};
use crate::{CardioRecord, Result, SessionRecord, StrengthRecord, NO_SUPERSET};

/// The two session logs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionStore {
    strength: Vec<StrengthRecord>,
    cardio: Vec<CardioRecord>,
    /// The strength table carries a `Superset` column
    superset_column: bool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both logs with the rows of the given tables
    ///
    /// Every row is checked structurally. A single malformed row fails the
    /// whole load and leaves the store untouched.
    pub fn load(&mut self, strength_rows: &Table, cardio_rows: &Table) -> Result<()> {
        let strength = workbook::read_strength(strength_rows)?;
        let cardio = workbook::read_cardio(cardio_rows)?;
        let superset_column = workbook::has_superset_column(strength_rows);

        tracing::info!(
            "Loaded {} strength and {} cardio sessions",
            strength.len(),
            cardio.len()
        );

        self.strength = strength;
        self.cardio = cardio;
        self.superset_column = superset_column;
        Ok(())
    }

    /// Validate and append a record to the log its category routes to
    ///
    /// Returns the position of the new record, i.e. the log length before insertion.
    pub fn append(&mut self, record: SessionRecord, catalog: &Catalog) -> Result<usize> {
        match record {
            SessionRecord::Strength(record) => {
                appender::check_strength(&record, catalog, &self.strength)?;
                let position = self.strength.len();
                tracing::info!(
                    "Appending strength session {} / {} on {} at {}",
                    record.category,
                    record.exercise,
                    record.date,
                    position
                );
                self.superset_column |= record.superset != NO_SUPERSET;
                self.strength.push(record);
                Ok(position)
            }
            SessionRecord::Cardio(record) => {
                appender::check_cardio(&record, catalog)?;
                let position = self.cardio.len();
                tracing::info!(
                    "Appending cardio session {} on {} at {}",
                    record.exercise,
                    record.date,
                    position
                );
                self.cardio.push(record);
                Ok(position)
            }
        }
    }

    /// Read-only copies of both logs, in insertion order
    pub fn snapshot(&self) -> (Vec<StrengthRecord>, Vec<CardioRecord>) {
        (self.strength.clone(), self.cardio.clone())
    }

    pub fn strength(&self) -> &[StrengthRecord] {
        &self.strength
    }

    pub fn cardio(&self) -> &[CardioRecord] {
        &self.cardio
    }

    /// Whether exports write the `Superset` column
    ///
    /// Set by loading a table that had the column, or by appending a
    /// session that belongs to a superset.
    pub fn has_superset_column(&self) -> bool {
        self.superset_column
    }

    pub fn len(&self) -> usize {
        self.strength.len() + self.cardio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strength.is_empty() && self.cardio.is_empty()
    }
}
