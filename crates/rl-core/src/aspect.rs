//! Aspect (dimension) definitions.
//!
//! The definition table is a CSV with a `Dimension` column and a `Keywords`
//! column holding a `;`-delimited keyword list:
//!
//! ```text
//! Dimension,Keywords
//! Combat,combat;fight;boss
//! Story,story;plot;narrative
//! ```
//!
//! Rows with a blank dimension or no usable keyword are omitted. A table that
//! cannot be opened, has an unreadable header row, or lacks either column
//! yields an empty dictionary and a warning.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

pub const DIMENSION_COLUMN: &str = "Dimension";
pub const KEYWORDS_COLUMN: &str = "Keywords";
pub const KEYWORD_DELIMITER: char = ';';

/// Aspect name → lowercase trigger keywords. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AspectDictionary {
    aspects: BTreeMap<String, BTreeSet<String>>,
}

impl AspectDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an aspect. Keywords are trimmed and lowercased;
    /// blank keywords are dropped. An aspect left with no keyword is not
    /// inserted and `false` is returned.
    pub fn insert<I, S>(&mut self, name: &str, keywords: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let set: BTreeSet<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if set.is_empty() {
            return false;
        }
        self.aspects.insert(name.to_string(), set);
        true
    }

    /// Parse a `;`-delimited keyword string into an aspect entry.
    pub fn insert_delimited(&mut self, name: &str, keywords: &str) -> bool {
        self.insert(name, keywords.split(KEYWORD_DELIMITER))
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aspects.keys().map(String::as_str)
    }

    pub fn keywords(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.aspects.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.aspects.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Load a definition table from a CSV file.
    ///
    /// A missing or unopenable file is a configuration gap, not an error:
    /// the dictionary comes back empty and no aspect is computed.
    pub fn load_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "aspect table not found; aspect scoring disabled");
            return Ok(Self::new());
        }
        let file = match std::fs::File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "aspect table unreadable; aspect scoring disabled");
                return Ok(Self::new());
            }
        };
        Self::from_csv_reader(file)
    }

    /// Parse a definition table from any CSV source.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = match rdr.headers() {
            Ok(h) => h.clone(),
            Err(e) => {
                warn!(error = %e, "aspect table header unreadable; aspect scoring disabled");
                return Ok(Self::new());
            }
        };
        let dim_idx = headers.iter().position(|h| h == DIMENSION_COLUMN);
        let kw_idx = headers.iter().position(|h| h == KEYWORDS_COLUMN);
        let (dim_idx, kw_idx) = match (dim_idx, kw_idx) {
            (Some(d), Some(k)) => (d, k),
            _ => {
                warn!("aspect table lacks Dimension/Keywords columns; aspect scoring disabled");
                return Ok(Self::new());
            }
        };

        let mut dict = Self::new();
        for (line, record) in rdr.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!(line = line + 2, error = %e, "skipping unreadable aspect row");
                    continue;
                }
            };
            let name = record.get(dim_idx).unwrap_or("");
            let keywords = record.get(kw_idx).unwrap_or("");
            if !dict.insert_delimited(name, keywords) {
                debug!(line = line + 2, dimension = name, "aspect row omitted");
            }
        }
        Ok(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_semicolon_keywords() {
        let csv = "Dimension,Keywords\nCombat, Combat ; fight;;boss\nStory,story;plot\n";
        let dict = AspectDictionary::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(dict.len(), 2);
        let combat = dict.keywords("Combat").unwrap();
        assert!(combat.contains("combat"));
        assert!(combat.contains("fight"));
        assert!(combat.contains("boss"));
        assert_eq!(combat.len(), 3);
    }

    #[test]
    fn rows_without_keywords_are_omitted() {
        let csv = "Dimension,Keywords\nCombat,combat\nAudio,\n,orphan\nPrice, ; \n";
        let dict = AspectDictionary::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(dict.names().collect::<Vec<_>>(), vec!["Combat"]);
    }

    #[test]
    fn missing_columns_yield_empty_dictionary() {
        let csv = "Name,Words\nCombat,combat\n";
        let dict = AspectDictionary::from_csv_reader(csv.as_bytes()).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn missing_file_yields_empty_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let dict = AspectDictionary::load_csv(&dir.path().join("nope.csv")).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn unreadable_header_yields_empty_dictionary() {
        let bytes: &[u8] = b"Dimension,Keywords\xff\nCombat,combat\n";
        let dict = AspectDictionary::from_csv_reader(bytes).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn directory_path_yields_empty_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let dict = AspectDictionary::load_csv(dir.path()).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aspects.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Dimension,Keywords").unwrap();
        writeln!(f, "Graphics,graphics;visual;art style").unwrap();
        drop(f);

        let dict = AspectDictionary::load_csv(&path).unwrap();
        assert!(dict.keywords("Graphics").unwrap().contains("art style"));
    }
}
