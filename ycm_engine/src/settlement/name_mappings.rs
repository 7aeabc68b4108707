//! Vendor name reconciliation tables.
//!
//! FareHarbor listing titles are free text that the club edits over time (boat lengths get added, historical names
//! linger). Rather than hard-coding the translation, the tables are loaded from a TOML file so that operators can add
//! a row when a listing is renamed. The built-in defaults are used when no file is configured.
//!
//! ```toml
//! version = "2024-10-01"
//!
//! [yachts]
//! "KYC - Wanderlust" = "Wanderlust"
//!
//! [charter_yachts]
//! "Kokomo Charters - Sea Breeze" = "Sea Breeze"
//!
//! [[tour_types]]
//! kind = "split_by_start"
//! pattern = "HALF DAY"
//! morning = "Half Day Morning Tour"
//! afternoon = "Half Day Afternoon Tour"
//!
//! [[tour_types]]
//! kind = "fixed"
//! pattern = "FULL DAY"
//! name = "1 Full Day"
//! ```
use std::{collections::BTreeMap, path::Path};

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Half-day tours starting before this local hour are morning tours.
const AFTERNOON_STARTS_AT: u32 = 12;

#[derive(Debug, Clone, Error)]
pub enum NameMappingError {
    #[error("Could not read name mappings file {path}. {reason}")]
    ReadError { path: String, reason: String },
    #[error("Invalid name mappings. {0}")]
    ParseError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TourRule {
    /// Headlines containing `pattern` map to `name`.
    Fixed { pattern: String, name: String },
    /// Headlines containing `pattern` map to `morning` or `afternoon`, depending on the local start hour.
    SplitByStart { pattern: String, morning: String, afternoon: String },
}

impl TourRule {
    fn pattern(&self) -> &str {
        match self {
            TourRule::Fixed { pattern, .. } => pattern,
            TourRule::SplitByStart { pattern, .. } => pattern,
        }
    }

    fn canonical_name(&self, start_at: &DateTime<FixedOffset>) -> &str {
        match self {
            TourRule::Fixed { name, .. } => name,
            TourRule::SplitByStart { morning, afternoon, .. } => {
                if start_at.hour() < AFTERNOON_STARTS_AT {
                    morning
                } else {
                    afternoon
                }
            },
        }
    }
}

/// How a vendor listing title was translated into a canonical yacht name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YachtNameMatch {
    Club(String),
    Charter(String),
    /// The listing is in neither table. The trimmed title is used as a best guess at the canonical name.
    Unmapped(String),
}

impl YachtNameMatch {
    pub fn canonical_name(&self) -> &str {
        match self {
            YachtNameMatch::Club(name) | YachtNameMatch::Charter(name) | YachtNameMatch::Unmapped(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameMappings {
    pub version: String,
    /// Club fleet: listing title -> canonical yacht name
    pub yachts: BTreeMap<String, String>,
    /// Charter fleet: listing title -> canonical yacht name
    pub charter_yachts: BTreeMap<String, String>,
    /// Evaluated in order; the first rule whose pattern appears in the headline wins
    pub tour_types: Vec<TourRule>,
}

impl Default for NameMappings {
    fn default() -> Self {
        let yachts = [
            ("KYC - Wanderlust", "Wanderlust"),
            ("KYC- 43' - Giddy Up", "Giddy Up"),
            ("KYC - Top Shelf", "Top Shelf"),
            ("KYC - 35' Ocean Rode- Half Day Outing", "Aviara"),
            ("KYC - The Life - 29' - Up to 6 People -OSPREY pickup", "The Life"),
            ("KYC - 42' Outrage - Anna Maria Half Day Outing", "Outrage"),
            ("KYC - 50' Lil' Bit Nauti - Bradenton", "Lil' Bit Nauti"),
            ("KYC - Memories Not Dreams", "Memories Not Dreams"),
            ("KYC - Congetta - The Vinoy in St. Pete", "Congetta"),
            ("KYC- 40' Aviara - Thirst Trap", "Thirst Trap"),
            ("KYC- 63' Prestige - Peace - Reservation", "Peace"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let tour_types = vec![
            TourRule::SplitByStart {
                pattern: "HALF DAY".into(),
                morning: "Half Day Morning Tour".into(),
                afternoon: "Half Day Afternoon Tour".into(),
            },
            TourRule::Fixed { pattern: "FULL DAY".into(), name: "1 Full Day".into() },
            TourRule::Fixed { pattern: "SUNSET".into(), name: "Sunset Tour".into() },
        ];
        Self { version: "builtin".into(), yachts, charter_yachts: BTreeMap::new(), tour_types }
    }
}

impl NameMappings {
    pub fn from_toml_str(s: &str) -> Result<Self, NameMappingError> {
        toml::from_str(s).map_err(|e| NameMappingError::ParseError(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NameMappingError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| NameMappingError::ReadError { path: path.display().to_string(), reason: e.to_string() })?;
        Self::from_toml_str(&contents)
    }

    /// Translates a listing title. The trimmed title is tried first, then the title exactly as received.
    pub fn match_yacht(&self, listing: &str) -> YachtNameMatch {
        let trimmed = listing.trim();
        let lookup = |table: &BTreeMap<String, String>| table.get(trimmed).or_else(|| table.get(listing)).cloned();
        if let Some(name) = lookup(&self.yachts) {
            YachtNameMatch::Club(name)
        } else if let Some(name) = lookup(&self.charter_yachts) {
            YachtNameMatch::Charter(name)
        } else {
            YachtNameMatch::Unmapped(trimmed.to_string())
        }
    }

    /// Maps a vendor headline to a canonical tour type name by case-insensitive substring match.
    pub fn match_tour_type(&self, headline: &str, start_at: &DateTime<FixedOffset>) -> Option<String> {
        let headline = headline.to_uppercase();
        self.tour_types
            .iter()
            .find(|rule| headline.contains(&rule.pattern().to_uppercase()))
            .map(|rule| rule.canonical_name(start_at).to_string())
    }
}
