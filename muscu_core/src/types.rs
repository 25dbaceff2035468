//! Core domain types for the workout log.
//!
//! This module defines the fundamental types used throughout the system:
//! - Difficulty markers
//! - Strength and cardio session records
//! - The tagged `SessionRecord` variant routed by category

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category name that routes records to the cardio log
pub const CARDIO_CATEGORY: &str = "Cardio";

/// Superset value meaning "not part of a superset"
pub const NO_SUPERSET: &str = "Non";

/// Returns true if the category belongs to the cardio log
pub fn is_cardio(category: &str) -> bool {
    category == CARDIO_CATEGORY
}

// ============================================================================
// Difficulty
// ============================================================================

/// How the session felt, either as a next-time instruction or a 1-5 rating
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Unset,
    Increase,
    Keep,
    Decrease,
    Rating(u8),
}

impl Difficulty {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    /// Parse a difficulty from form or spreadsheet text
    ///
    /// Accepts the French labels written by the exporter, their English
    /// equivalents, a bare rating, or blank for unset.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Some(Difficulty::Unset);
        }

        match s.to_lowercase().as_str() {
            "augmenter" | "increase" => Some(Difficulty::Increase),
            "maintenir" | "keep" => Some(Difficulty::Keep),
            "diminuer" | "decrease" => Some(Difficulty::Decrease),
            other => other.parse::<u8>().ok().map(Difficulty::Rating),
        }
    }

    /// Spreadsheet label for the enumerated values, None for unset and ratings
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Difficulty::Increase => Some("Augmenter"),
            Difficulty::Keep => Some("Maintenir"),
            Difficulty::Decrease => Some("Diminuer"),
            Difficulty::Unset | Difficulty::Rating(_) => None,
        }
    }

    /// Whether the value lies in its enumerated set
    pub fn is_valid(&self) -> bool {
        match self {
            Difficulty::Rating(r) => (Self::MIN_RATING..=Self::MAX_RATING).contains(r),
            _ => true,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Unset => Ok(()),
            Difficulty::Rating(r) => write!(f, "{}", r),
            other => f.write_str(other.label().unwrap_or_default()),
        }
    }
}

// ============================================================================
// Session Records
// ============================================================================

/// One strength exercise performed on a given day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StrengthRecord {
    pub date: NaiveDate,
    pub exercise: String,
    pub category: String,
    /// Load in kilograms; bodyweight work has none
    pub load: Option<f64>,
    pub difficulty: Difficulty,
    pub repetitions: u32,
    pub series: u32,
    /// Rest between series, in seconds
    pub rest: u32,
    /// `NO_SUPERSET` or the exercise this one was paired with
    pub superset: String,
}

/// One cardio session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CardioRecord {
    pub date: NaiveDate,
    pub exercise: String,
    pub category: String,
    /// Total duration in minutes
    pub duration: f64,
    pub difficulty: Difficulty,
    /// Serialized sequence of interval times, kept verbatim
    pub splits: String,
    /// Serialized sequence of intensity levels, kept verbatim
    pub levels: String,
}

/// A record for either log
#[derive(Clone, Debug, PartialEq)]
pub enum SessionRecord {
    Strength(StrengthRecord),
    Cardio(CardioRecord),
}

/// Common view over records of either log, used by filtering
pub trait Logged {
    fn date(&self) -> NaiveDate;
    fn category(&self) -> &str;
    fn exercise(&self) -> &str;
}

impl Logged for StrengthRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn exercise(&self) -> &str {
        &self.exercise
    }
}

impl Logged for CardioRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn exercise(&self) -> &str {
        &self.exercise
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_difficulty() {
        assert_eq!(Difficulty::parse(""), Some(Difficulty::Unset));
        assert_eq!(Difficulty::parse("  "), Some(Difficulty::Unset));
        assert_eq!(Difficulty::parse("Augmenter"), Some(Difficulty::Increase));
        assert_eq!(Difficulty::parse("keep"), Some(Difficulty::Keep));
        assert_eq!(Difficulty::parse("DIMINUER"), Some(Difficulty::Decrease));
        assert_eq!(Difficulty::parse("3"), Some(Difficulty::Rating(3)));
        assert_eq!(Difficulty::parse("hard"), None);
    }

    #[test]
    fn test_difficulty_range() {
        assert!(Difficulty::Rating(1).is_valid());
        assert!(Difficulty::Rating(5).is_valid());
        assert!(!Difficulty::Rating(0).is_valid());
        assert!(!Difficulty::Rating(6).is_valid());
        assert!(Difficulty::Unset.is_valid());
    }

    #[test]
    fn test_difficulty_display_matches_parse() {
        for d in [
            Difficulty::Unset,
            Difficulty::Increase,
            Difficulty::Keep,
            Difficulty::Decrease,
            Difficulty::Rating(4),
        ] {
            assert_eq!(Difficulty::parse(&d.to_string()), Some(d));
        }
    }

    #[test]
    fn test_cardio_routing() {
        assert!(is_cardio("Cardio"));
        assert!(!is_cardio("cardio"));
        assert!(!is_cardio("Jambes"));
    }
}
