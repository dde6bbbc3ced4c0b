//! Acronym detection and definition resolution.
//!
//! The resolver scans processed paragraph text for parenthesized acronym
//! tokens and accumulates a symbol-to-definition map over its lifetime.
//! Text is never rewritten; the map feeds the `AcronymTable` tag processor.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::TableGrid;

/// Parenthesized run of two or more uppercase letters.
const ACRONYM_PATTERN: &str = r"\(([A-Z]{2,})\)";

/// Provenance of a resolved acronym definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcronymOrigin {
    /// Supplied by the configured known-acronym table
    Known,
    /// Heuristically extracted from the surrounding text
    ExtractedFromText,
    /// No definition found; the symbol is recorded with an empty definition
    Unresolved,
}

/// A resolved acronym.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcronymEntry {
    /// Uppercase acronym token
    pub symbol: String,

    /// Definition text, possibly empty
    pub definition: String,

    /// Where the definition came from
    pub origin: AcronymOrigin,
}

/// Acronym configuration: the known-definition table and the ignore set.
///
/// Supplied at resolver construction and not reloaded mid-session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcronymConfig {
    /// Symbol -> definition table consulted when extraction finds nothing
    #[serde(default)]
    pub known: HashMap<String, String>,

    /// Symbols that must never be added to the map
    #[serde(default)]
    pub ignored: HashSet<String>,
}

impl AcronymConfig {
    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Detects acronym tokens in text and resolves their definitions.
///
/// Owned exclusively by one document-processing session; construct a fresh
/// resolver per session.
#[derive(Debug)]
pub struct AcronymResolver {
    entries: BTreeMap<String, AcronymEntry>,
    known: HashMap<String, String>,
    ignored: HashSet<String>,
    pattern: Regex,
}

impl AcronymResolver {
    /// Create a resolver seeded from the given configuration.
    pub fn new(config: AcronymConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            known: config.known,
            ignored: config.ignored,
            pattern: Regex::new(ACRONYM_PATTERN).unwrap(),
        }
    }

    /// Scan text for acronym tokens, growing the resolver's map.
    ///
    /// The text itself is returned unchanged; acronym expansions are never
    /// written back. Each symbol is resolved at most once per resolver
    /// lifetime, and ignored symbols never enter the map.
    pub fn resolve_and_annotate(&mut self, text: String) -> String {
        // Collect first: the borrow of `text` through the regex ends before
        // the map grows.
        let candidates: Vec<(String, usize)> = self
            .pattern
            .captures_iter(&text)
            .filter_map(|caps| {
                let m = caps.get(0)?;
                let symbol = caps.get(1)?.as_str().to_string();
                Some((symbol, m.start()))
            })
            .collect();

        for (symbol, start) in candidates {
            if self.ignored.contains(&symbol) || self.entries.contains_key(&symbol) {
                continue;
            }

            let (definition, origin) = match extract_definition(&text[..start]) {
                Some(def) => (def, AcronymOrigin::ExtractedFromText),
                None => match self.known.get(&symbol) {
                    Some(def) => (def.clone(), AcronymOrigin::Known),
                    None => (String::new(), AcronymOrigin::Unresolved),
                },
            };

            log::debug!("resolved acronym {} ({:?})", symbol, origin);
            self.entries.insert(
                symbol.clone(),
                AcronymEntry {
                    symbol,
                    definition,
                    origin,
                },
            );
        }

        text
    }

    /// Check whether any acronyms have been resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolved entries in lexicographic symbol order.
    pub fn entries(&self) -> impl Iterator<Item = &AcronymEntry> {
        self.entries.values()
    }

    /// Look up a resolved entry.
    pub fn get(&self, symbol: &str) -> Option<&AcronymEntry> {
        self.entries.get(symbol)
    }

    /// Render the accumulated map as a grid: a header row plus one row per
    /// resolved symbol, sorted lexicographically.
    pub fn table_grid(&self) -> TableGrid {
        let mut grid = vec![vec!["Acronym".to_string(), "Definition".to_string()]];
        for entry in self.entries.values() {
            grid.push(vec![entry.symbol.clone(), entry.definition.clone()]);
        }
        grid
    }
}

/// Backward extraction: collect the contiguous run of capitalized words
/// nearest before the acronym, in original order.
///
/// Lowercase words between the acronym and the run are skipped; the scan
/// stops at the first non-capitalized word only once the run has started.
fn extract_definition(prefix: &str) -> Option<String> {
    let mut collected: Vec<&str> = Vec::new();
    for word in prefix.split_whitespace().rev() {
        if word.chars().next().is_some_and(|c| c.is_uppercase()) {
            collected.push(word);
        } else if !collected.is_empty() {
            break;
        }
    }

    if collected.is_empty() {
        None
    } else {
        collected.reverse();
        Some(collected.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AcronymResolver {
        AcronymResolver::new(AcronymConfig::default())
    }

    #[test]
    fn test_backward_extraction() {
        let mut r = resolver();
        let text = "...the Example Definition (ED) was...".to_string();
        let out = r.resolve_and_annotate(text.clone());
        assert_eq!(out, text);

        let entry = r.get("ED").unwrap();
        assert_eq!(entry.definition, "Example Definition");
        assert_eq!(entry.origin, AcronymOrigin::ExtractedFromText);
    }

    #[test]
    fn test_known_fallback() {
        let mut config = AcronymConfig::default();
        config
            .known
            .insert("API".to_string(), "Application Programming Interface".to_string());
        let mut r = AcronymResolver::new(config);

        r.resolve_and_annotate("the api endpoint (API) responded".to_string());
        let entry = r.get("API").unwrap();
        assert_eq!(entry.definition, "Application Programming Interface");
        assert_eq!(entry.origin, AcronymOrigin::Known);
    }

    #[test]
    fn test_unresolved_recorded_with_empty_definition() {
        let mut r = resolver();
        r.resolve_and_annotate("an unknown thing (XYZ) appeared".to_string());
        let entry = r.get("XYZ").unwrap();
        assert_eq!(entry.definition, "");
        assert_eq!(entry.origin, AcronymOrigin::Unresolved);
    }

    #[test]
    fn test_ignored_symbol_never_added() {
        let mut config = AcronymConfig::default();
        config.ignored.insert("ID".to_string());
        let mut r = AcronymResolver::new(config);

        r.resolve_and_annotate("the Item Descriptor (ID) field".to_string());
        assert!(r.get("ID").is_none());
        assert!(r.is_empty());
        assert_eq!(r.table_grid().len(), 1);
    }

    #[test]
    fn test_resolution_is_idempotent_per_symbol() {
        let mut r = resolver();
        r.resolve_and_annotate("the Example Definition (ED) was".to_string());
        // A later occurrence with different context must not overwrite.
        r.resolve_and_annotate("something lowercase before (ED) again".to_string());

        assert_eq!(r.get("ED").unwrap().definition, "Example Definition");
    }

    #[test]
    fn test_single_uppercase_letter_not_matched() {
        let mut r = resolver();
        r.resolve_and_annotate("a single (A) letter and (lower) case".to_string());
        assert!(r.is_empty());
    }

    #[test]
    fn test_extraction_stops_at_lowercase_word() {
        let mut r = resolver();
        r.resolve_and_annotate("we use the Widget Factory Service (WFS) here".to_string());
        assert_eq!(r.get("WFS").unwrap().definition, "Widget Factory Service");
    }

    #[test]
    fn test_extraction_skips_lowercase_words_before_the_run() {
        let mut r = resolver();
        r.resolve_and_annotate("the Example Definition appears here (ED)".to_string());
        let entry = r.get("ED").unwrap();
        assert_eq!(entry.definition, "Example Definition");
        assert_eq!(entry.origin, AcronymOrigin::ExtractedFromText);
    }

    #[test]
    fn test_extraction_stops_once_the_run_has_started() {
        let mut r = resolver();
        r.resolve_and_annotate("Alpha beta Gamma Delta thing (GD)".to_string());
        assert_eq!(r.get("GD").unwrap().definition, "Gamma Delta");
    }

    #[test]
    fn test_table_grid_sorted() {
        let mut r = resolver();
        r.resolve_and_annotate("Zeta Thing (ZT) and Alpha Thing (AT)".to_string());
        let grid = r.table_grid();
        assert_eq!(grid[0], vec!["Acronym".to_string(), "Definition".to_string()]);
        assert_eq!(grid[1][0], "AT");
        assert_eq!(grid[2][0], "ZT");
    }

    #[test]
    fn test_config_from_json() {
        let config = AcronymConfig::from_json_str(
            r#"{"known": {"CPU": "Central Processing Unit"}, "ignored": ["OK"]}"#,
        )
        .unwrap();
        assert_eq!(config.known["CPU"], "Central Processing Unit");
        assert!(config.ignored.contains("OK"));
    }
}
