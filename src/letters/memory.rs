//! In-memory letter repository
//!
//! Seed letters are kept as loaded; submitted letters accumulate in a
//! process-wide list behind a single `RwLock` and are lost on restart.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cmp::Reverse;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use super::ids::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
use super::seed::SeedStore;
use super::{validate_content, LetterRepository};
use crate::error::LetterError;
use crate::types::{format_timestamp, Letter, NewLetter};

/// Collisions tolerated from the injected generator before falling back to UUIDs
const MAX_ID_ATTEMPTS: usize = 16;

pub struct MemoryLetterRepository {
    seed: SeedStore,
    added: RwLock<Vec<Letter>>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl MemoryLetterRepository {
    /// Repository over `seed` with UUID ids, the system clock and an OS-seeded rng
    pub fn new(seed: SeedStore) -> Self {
        Self {
            seed,
            added: RwLock::new(Vec::new()),
            ids: Box::new(UuidIdGenerator),
            clock: Box::new(SystemClock),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Make shuffles reproducible
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn seed(&self) -> &SeedStore {
        &self.seed
    }

    fn added(&self) -> RwLockReadGuard<'_, Vec<Letter>> {
        self.added.read().unwrap_or_else(|e| e.into_inner())
    }

    fn added_mut(&self) -> RwLockWriteGuard<'_, Vec<Letter>> {
        self.added.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Next id not already used by a seed or submitted letter
    fn fresh_id(&self, added: &[Letter]) -> String {
        let is_free = |id: &str| !self.seed.contains_id(id) && !added.iter().any(|l| l.id == id);

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if is_free(&id) {
                return id;
            }
        }

        warn!(
            "Id generator collided {} times, falling back to UUIDs",
            MAX_ID_ATTEMPTS
        );
        loop {
            let id = UuidIdGenerator.next_id();
            if is_free(&id) {
                return id;
            }
        }
    }
}

impl LetterRepository for MemoryLetterRepository {
    fn list_all(&self) -> Vec<Letter> {
        let added = self.added();
        let mut letters = Vec::with_capacity(self.seed.len() + added.len());
        letters.extend_from_slice(self.seed.letters());
        letters.extend_from_slice(&added);
        letters
    }

    fn list_by_category(&self, category: &str) -> Vec<Letter> {
        let added = self.added();
        self.seed
            .letters()
            .iter()
            .chain(added.iter())
            .filter(|l| l.category.as_deref() == Some(category))
            .cloned()
            .collect()
    }

    fn sample_shuffled(&self, limit: usize) -> Vec<Letter> {
        let mut letters = self.list_all();
        {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            letters.shuffle(&mut *rng);
        }
        letters.truncate(limit);
        letters
    }

    fn recent(&self, limit: usize) -> Vec<Letter> {
        let mut letters = self.list_all();
        letters.sort_by_cached_key(|l| Reverse(l.created_at_utc()));
        letters.truncate(limit);
        letters
    }

    fn add(&self, letter: NewLetter) -> Result<Letter, LetterError> {
        let content = validate_content(&letter.content)?.to_string();
        let nickname = letter
            .nickname
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let category = letter.category.filter(|c| !c.trim().is_empty());

        let mut added = self.added_mut();
        let new_letter = Letter {
            id: self.fresh_id(&added),
            content,
            nickname,
            category,
            created_at: format_timestamp(self.clock.now()),
        };
        added.push(new_letter.clone());

        info!(
            "Letter {} added (category: {})",
            new_letter.id,
            new_letter.category.as_deref().unwrap_or("none")
        );
        Ok(new_letter)
    }

    fn len(&self) -> usize {
        self.seed.len() + self.added().len()
    }
}
