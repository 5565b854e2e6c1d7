//! Letter repository
//!
//! Combined read/write access to the seed letters bundled with the site and
//! the letters submitted while the process is running. Callers only see the
//! [`LetterRepository`] trait, so a persistent backend can replace
//! [`MemoryLetterRepository`] without touching the server or CLI.

pub mod ids;
pub mod memory;
pub mod seed;

pub use ids::{Clock, FixedClock, IdGenerator, SequentialIdGenerator, SystemClock, UuidIdGenerator};
pub use memory::MemoryLetterRepository;
pub use seed::SeedStore;

use crate::error::LetterError;
use crate::types::{Letter, NewLetter};

/// Read/write operations over seed + session letters
pub trait LetterRepository: Send + Sync {
    /// Seed letters followed by submitted letters, in insertion order
    fn list_all(&self) -> Vec<Letter>;

    /// Letters whose category equals `category` exactly, in `list_all` order
    fn list_by_category(&self, category: &str) -> Vec<Letter>;

    /// Up to `limit` letters in shuffled order
    fn sample_shuffled(&self, limit: usize) -> Vec<Letter>;

    /// Up to `limit` letters, newest first
    fn recent(&self, limit: usize) -> Vec<Letter>;

    /// Append a new letter. Fails when the trimmed content is empty.
    fn add(&self, letter: NewLetter) -> Result<Letter, LetterError>;

    /// Number of letters currently visible
    fn len(&self) -> usize {
        self.list_all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Check a submission before handing it to [`LetterRepository::add`]
pub fn validate_content(content: &str) -> Result<&str, LetterError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(LetterError::EmptyContent);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content() {
        assert_eq!(validate_content("  hi \n"), Ok("hi"));
        assert_eq!(validate_content(""), Err(LetterError::EmptyContent));
        assert_eq!(validate_content(" \t\n "), Err(LetterError::EmptyContent));
    }
}
