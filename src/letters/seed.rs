//! Seed store - the read-only letters loaded once at startup

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::types::Letter;

/// Letters shipped with the binary
const BUNDLED_LETTERS: &str = include_str!("../../data/letters.json");

/// Immutable list of pre-existing letters
#[derive(Debug, Clone, Default)]
pub struct SeedStore {
    letters: Vec<Letter>,
}

impl SeedStore {
    /// Parse the letters compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_LETTERS).context("Failed to parse bundled seed letters")
    }

    /// Read a JSON array of letters from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        let store = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse seed file {}", path.display()))?;
        info!("Loaded {} seed letters from {}", store.len(), path.display());
        Ok(store)
    }

    /// Use the file at `path` if given, otherwise the bundled letters
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::bundled(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let letters: Vec<Letter> = serde_json::from_str(json)?;
        Self::from_letters(letters)
    }

    /// Build from an in-memory list. Ids must be unique.
    pub fn from_letters(letters: Vec<Letter>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(letters.len());
        for letter in &letters {
            if !seen.insert(letter.id.as_str()) {
                bail!("Duplicate seed letter id '{}'", letter.id);
            }
            if letter.created_at_utc().is_none() {
                debug!("Seed letter {} has unparseable createdAt '{}'", letter.id, letter.created_at);
            }
        }
        Ok(Self { letters })
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.letters.iter().any(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use std::io::Write;

    #[test]
    fn test_bundled_seed_parses() {
        let store = SeedStore::bundled().unwrap();
        assert!(!store.is_empty());
        for letter in store.letters() {
            assert!(!letter.content.trim().is_empty());
            assert!(letter.created_at_utc().is_some(), "bad date on {}", letter.id);
            if let Some(category) = &letter.category {
                assert!(Category::from_label(category).is_some(), "unknown category {}", category);
            }
        }
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "a", "content": "Dear failure", "createdAt": "2024-01-01"}},
               {{"id": "b", "content": "Thanks", "category": "Career", "nickname": "Sam", "createdAt": "2024-06-01"}}]"#
        )
        .unwrap();

        let store = SeedStore::from_path(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.letters()[1].nickname.as_deref(), Some("Sam"));
        assert!(store.contains_id("a"));
        assert!(!store.contains_id("c"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[{"id": "a", "content": "one", "createdAt": "2024-01-01"},
                       {"id": "a", "content": "two", "createdAt": "2024-01-02"}]"#;
        let err = SeedStore::from_json(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_malformed_seed_is_an_error() {
        assert!(SeedStore::from_json("{not json").is_err());
        assert!(SeedStore::from_json(r#"[{"id": "a"}]"#).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SeedStore::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read seed file"));
    }
}
