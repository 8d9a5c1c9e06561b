//! # Section Store Module
//!
//! ## Purpose
//! Ordered store of commercial code section records loaded once from a static
//! JSON dataset, supporting exact section lookup and staged keyword search.
//!
//! ## Input/Output Specification
//! - **Input**: JSON array of `{section, title, text}` records; free-text queries
//! - **Output**: The first matching record, or `None`
//! - **Matching**: Three stages tried in strict order, first stage with a match wins
//!
//! ## Search Stages
//! 1. `section <number>` in the query: exact match on the section identifier
//! 2. Licensing/penalty vocabulary against record text, or any query word
//!    appearing in record text
//! 3. Raw query substring in record text or title
//!
//! This is ordered, first-match, linear-scan logic over the full record
//! sequence, not a ranked search.

use crate::errors::{NavigatorError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Domain vocabulary tested against record text in stage 2
const SEARCH_KEYWORDS: &[&str] = &[
    "driving without a license",
    "unlicensed driver",
    "license required",
    "penalty",
    "penalties",
    "fine",
    "fines",
    "suspended license",
    "revoked license",
    "operating without a license",
    "valid license",
    "violation",
    "infraction",
];

/// One numbered provision of the commercial code. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Section identifier, may include letters and dots (e.g. "12.3a")
    pub section: String,
    /// Section title
    pub title: String,
    /// Full body text
    pub text: String,
}

/// Ordered sequence of section records with staged lookup
pub struct SectionStore {
    records: Vec<SectionRecord>,
    section_pattern: Regex,
}

impl SectionStore {
    pub fn new(records: Vec<SectionRecord>) -> Self {
        Self {
            records,
            section_pattern: section_number_pattern(),
        }
    }

    /// Load records from a JSON dataset file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| NavigatorError::DatasetLoad {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;

        let records: Vec<SectionRecord> =
            serde_json::from_str(&content).map_err(|e| NavigatorError::DatasetLoad {
                path: path.display().to_string(),
                details: e.to_string(),
            })?;

        tracing::info!("Loaded {} section records from {:?}", records.len(), path);
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[SectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Staged, first-match search over the record sequence
    pub fn search(&self, query: &str) -> Option<&SectionRecord> {
        let query_lower = query.to_lowercase();

        // Stage 1: exact section-number lookup
        if let Some(captures) = self.section_pattern.captures(query) {
            let number = &captures[1];
            for record in &self.records {
                if record.section == number {
                    return Some(record);
                }
            }
        }

        // Stage 2: domain vocabulary in record text, or any query word in record text
        for record in &self.records {
            let text_lower = record.text.to_lowercase();
            let vocabulary_hit = SEARCH_KEYWORDS.iter().any(|kw| text_lower.contains(kw));
            let word_hit = query_lower
                .split_whitespace()
                .any(|word| text_lower.contains(word));
            if vocabulary_hit || word_hit {
                return Some(record);
            }
        }

        // Stage 3: raw query substring in text or title
        for record in &self.records {
            if record.text.to_lowercase().contains(&query_lower)
                || record.title.to_lowercase().contains(&query_lower)
            {
                return Some(record);
            }
        }

        None
    }
}

/// Pattern for "section <number>" where the number may include letters and dots
pub fn section_number_pattern() -> Regex {
    Regex::new(r"(?i)section\s*(\d[\w.]*)").expect("section pattern is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SectionStore {
        SectionStore::new(vec![
            SectionRecord {
                section: "2101".to_string(),
                title: "Warehouse receipts".to_string(),
                text: "A warehouse receipt may be issued by any warehouse.".to_string(),
            },
            SectionRecord {
                section: "12345".to_string(),
                title: "Operation under suspension".to_string(),
                text: "Operating a vehicle with a suspended license is an infraction \
                       subject to penalties under this division."
                    .to_string(),
            },
            SectionRecord {
                section: "14601.1".to_string(),
                title: "Negotiable instruments".to_string(),
                text: "An instrument is negotiable when endorsed by the holder.".to_string(),
            },
        ])
    }

    #[test]
    fn test_section_lookup_takes_precedence() {
        let store = store();
        // Keyword stage would match record 12345, but stage 1 must win
        let result = store.search("Section 2101 penalty").unwrap();
        assert_eq!(result.section, "2101");

        let result = store.search("What does Section 12345 say?").unwrap();
        assert_eq!(result.section, "12345");
    }

    #[test]
    fn test_section_lookup_with_dotted_identifier() {
        let store = store();
        let result = store.search("explain section 14601.1 to me").unwrap();
        assert_eq!(result.section, "14601.1");
    }

    #[test]
    fn test_unknown_section_falls_through_to_keywords() {
        let store = store();
        // Section 99999 does not exist; the penalty vocabulary still matches
        let result = store.search("section 99999 penalty filings").unwrap();
        assert_eq!(result.section, "12345");
    }

    #[test]
    fn test_keyword_stage_matches_vocabulary() {
        let store = store();
        let result = store.search("consequences of suspended licenses").unwrap();
        assert_eq!(result.section, "12345");
    }

    #[test]
    fn test_substring_stage_matches_title() {
        let store = SectionStore::new(vec![SectionRecord {
            section: "9".to_string(),
            title: "Bulk transfers".to_string(),
            text: "Rules governing movement of goods.".to_string(),
        }]);
        let result = store.search("bulk transfers").unwrap();
        assert_eq!(result.section, "9");
    }

    #[test]
    fn test_no_match_returns_none() {
        let store = SectionStore::new(vec![SectionRecord {
            section: "1".to_string(),
            title: "General provisions".to_string(),
            text: "Short title.".to_string(),
        }]);
        assert!(store.search("xylophone quotas").is_none());
    }

    #[test]
    fn test_empty_store_returns_none() {
        let store = SectionStore::new(Vec::new());
        assert!(store.search("section 1").is_none());
    }
}
