//! Pairwise plant compatibility scores.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Plant;

/// Source of signed compatibility scores between two plants.
///
/// Scores are symmetric and unknown pairs score 0.
pub trait SymbiosisLookup {
    fn score(&self, a: &Plant, b: &Plant) -> i32;
}

impl<F> SymbiosisLookup for F
where
    F: Fn(&Plant, &Plant) -> i32,
{
    fn score(&self, a: &Plant, b: &Plant) -> i32 {
        self(a, b)
    }
}

/// In-memory symmetric score table.
#[derive(Debug, Clone, Default)]
pub struct SymbiosisTable {
    scores: HashMap<(Plant, Plant), i32>,
}

/// One table row as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbiosisEntry {
    pub a: Plant,
    pub b: Plant,
    pub score: i32,
}

impl SymbiosisTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score for an unordered pair, replacing any previous value.
    /// Returns the replaced score.
    pub fn insert(&mut self, a: impl Into<Plant>, b: impl Into<Plant>, score: i32) -> Option<i32> {
        let (a, b) = (a.into(), b.into());
        let key = if a <= b { (a, b) } else { (b, a) };
        self.scores.insert(key, score)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// All rows in a stable order.
    pub fn entries(&self) -> Vec<SymbiosisEntry> {
        let mut entries: Vec<_> = self
            .scores
            .iter()
            .map(|((a, b), score)| SymbiosisEntry {
                a: a.clone(),
                b: b.clone(),
                score: *score,
            })
            .collect();
        entries.sort_by(|x, y| (&x.a, &x.b).cmp(&(&y.a, &y.b)));
        entries
    }

    /// Build from rows. Later rows win when a pair repeats.
    pub fn from_entries(entries: impl IntoIterator<Item = SymbiosisEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            let (a, b) = (entry.a.clone(), entry.b.clone());
            if let Some(previous) = table.insert(entry.a, entry.b, entry.score)
                && previous != entry.score
            {
                log::warn!(
                    "Conflicting symbiosis scores for {a} / {b}: {previous} replaced by {}",
                    entry.score
                );
            }
        }
        table
    }

    /// Write as pretty JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries())?;
        fs::write(path, json)
    }

    /// Read from a JSON list of `{ "a", "b", "score" }` rows.
    pub fn load_json<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let entries: Vec<SymbiosisEntry> = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Self::from_entries(entries))
    }
}

impl SymbiosisLookup for SymbiosisTable {
    fn score(&self, a: &Plant, b: &Plant) -> i32 {
        let key = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        self.scores.get(&key).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garden_table() -> SymbiosisTable {
        let mut table = SymbiosisTable::new();
        table.insert("Carrot", "Beetroot", 1);
        table.insert("Carrot", "Celery", 1);
        table.insert("Celery", "Beetroot", 1);
        table.insert("Cabbage", "Carrot", -1);
        table.insert("Cabbage", "Celery", -1);
        table
    }

    #[test]
    fn test_symmetric_lookup() {
        let table = garden_table();
        let (carrot, cabbage) = (Plant::from("Carrot"), Plant::from("Cabbage"));

        assert_eq!(table.score(&carrot, &cabbage), -1);
        assert_eq!(table.score(&cabbage, &carrot), -1);
    }

    #[test]
    fn test_unknown_pair_is_neutral() {
        let table = garden_table();
        assert_eq!(table.score(&Plant::from("Cabbage"), &Plant::from("Beetroot")), 0);
        assert_eq!(table.score(&Plant::from("Kale"), &Plant::from("Kale")), 0);
    }

    #[test]
    fn test_insert_replaces_either_order() {
        let mut table = garden_table();
        assert_eq!(table.insert("Beetroot", "Carrot", 2), Some(1));
        assert_eq!(table.len(), 5);
        assert_eq!(table.score(&Plant::from("Carrot"), &Plant::from("Beetroot")), 2);
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |a: &Plant, b: &Plant| if a == b { 1 } else { 0 };
        assert_eq!(lookup.score(&Plant::from("Kale"), &Plant::from("Kale")), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symbioses.json");
        let table = garden_table();

        table.save_json(&path).unwrap();
        let loaded = SymbiosisTable::load_json(&path).unwrap();

        assert_eq!(loaded.entries(), table.entries());
    }
}
