//! Integration tests for the letter repository:
//! - submission, validation and id freshness
//! - category filtering, shuffling and recency ordering
//! - end-to-end archive scenarios

use chrono::{TimeZone, Utc};
use dear_failure::letters::{FixedClock, LetterRepository, MemoryLetterRepository, SeedStore};
use dear_failure::{Letter, LetterError, NewLetter};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn seed_letter(id: &str, category: Option<&str>, created_at: &str) -> Letter {
    Letter {
        id: id.to_string(),
        content: format!("Seed letter {}", id),
        nickname: None,
        category: category.map(str::to_string),
        created_at: created_at.to_string(),
    }
}

fn repository(seed: Vec<Letter>) -> MemoryLetterRepository {
    MemoryLetterRepository::new(SeedStore::from_letters(seed).unwrap())
        .with_clock(FixedClock::new(Utc.with_ymd_and_hms(2025, 2, 14, 9, 0, 0).unwrap()))
        .with_rng_seed(1234)
}

fn ids(letters: &[Letter]) -> Vec<&str> {
    letters.iter().map(|l| l.id.as_str()).collect()
}

// =====================================================================
// SUBMISSION
// =====================================================================

#[test]
fn test_add_appends_exactly_one_trimmed_letter() {
    let repo = repository(vec![seed_letter("1", None, "2024-01-01")]);
    let before: HashSet<String> = repo.list_all().into_iter().map(|l| l.id).collect();

    for raw in ["Dear failure", "  padded letter\n", "\tmulti\nline\t"] {
        let count = repo.list_all().len();
        let added = repo.add(NewLetter::new(raw)).unwrap();

        let all = repo.list_all();
        assert_eq!(all.len(), count + 1);
        assert_eq!(all.last().unwrap(), &added);
        assert_eq!(added.content, raw.trim());
        assert!(!before.contains(&added.id));
        assert_eq!(all.iter().filter(|l| l.id == added.id).count(), 1);
    }
}

#[test]
fn test_blank_submissions_rejected() {
    let repo = repository(vec![seed_letter("1", None, "2024-01-01")]);

    for raw in ["", "   ", "\n\t "] {
        assert_eq!(repo.add(NewLetter::new(raw)), Err(LetterError::EmptyContent));
    }
    assert_eq!(repo.list_all().len(), 1);
}

#[test]
fn test_optional_fields_kept() {
    let repo = repository(vec![]);
    let added = repo
        .add(NewLetter::new("Dear failure").with_nickname("Sam").with_category("School"))
        .unwrap();

    assert_eq!(added.nickname.as_deref(), Some("Sam"));
    assert_eq!(added.category.as_deref(), Some("School"));
    assert_eq!(added.created_at, "2025-02-14T09:00:00.000Z");
}

// =====================================================================
// READS
// =====================================================================

#[test]
fn test_list_by_category_subsequence() {
    let repo = repository(vec![
        seed_letter("1", Some("School"), "2024-01-01"),
        seed_letter("2", Some("Career"), "2024-01-02"),
        seed_letter("3", Some("School"), "2024-01-03"),
        seed_letter("4", Some("Personal Growth"), "2024-01-04"),
    ]);
    repo.add(NewLetter::new("new one").with_category("School")).unwrap();

    let all = repo.list_all();
    let school = repo.list_by_category("School");
    assert!(school.iter().all(|l| l.category.as_deref() == Some("School")));

    // order matches list_all
    let positions: Vec<usize> = school
        .iter()
        .map(|l| all.iter().position(|a| a.id == l.id).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(school.len(), 3);

    assert_eq!(ids(&repo.list_by_category("Personal Growth")), vec!["4"]);
    assert!(repo.list_by_category("Unknown").is_empty());
}

#[test]
fn test_sample_shuffled_sizes_and_distinctness() {
    let seed: Vec<Letter> = (0..12).map(|i| seed_letter(&i.to_string(), None, "2024-01-01")).collect();
    let repo = repository(seed);
    let all: HashSet<String> = repo.list_all().into_iter().map(|l| l.id).collect();

    for n in [0, 1, 5, 12, 50] {
        let sample = repo.sample_shuffled(n);
        assert_eq!(sample.len(), n.min(12));
        let sample_ids: HashSet<String> = sample.into_iter().map(|l| l.id).collect();
        assert_eq!(sample_ids.len(), n.min(12));
        assert!(sample_ids.is_subset(&all));
    }
}

#[test]
fn test_recent_sorted_descending() {
    let repo = repository(vec![
        seed_letter("a", None, "2024-03-01"),
        seed_letter("b", None, "2024-01-01"),
        seed_letter("c", None, "2024-02-01"),
    ]);

    for n in 0..5 {
        let recent = repo.recent(n);
        assert_eq!(recent.len(), n.min(3));
    }
    assert_eq!(ids(&repo.recent(3)), vec!["a", "c", "b"]);
}

// =====================================================================
// SCENARIOS
// =====================================================================

#[test]
fn test_recent_then_submit_scenario() {
    let repo = repository(vec![
        seed_letter("first", None, "2024-01-01"),
        seed_letter("second", None, "2024-06-01"),
    ]);

    assert_eq!(ids(&repo.recent(1)), vec!["second"]);

    let added = repo.add(NewLetter::new("Dear failure, thanks.")).unwrap();
    assert_eq!(ids(&repo.recent(1)), vec![added.id.as_str()]);

    let all = repo.list_all();
    assert_eq!(all.len(), 3);
    assert_eq!(&ids(&all)[..2], &["first", "second"]);
    assert_eq!(all[2].id, added.id);
}

#[test]
fn test_single_career_letter_scenario() {
    let repo = repository(vec![seed_letter("only", Some("Career"), "2024-01-01")]);

    assert_eq!(ids(&repo.list_by_category("Career")), vec!["only"]);
    assert!(repo.list_by_category("School").is_empty());
}

// =====================================================================
// CONCURRENCY
// =====================================================================

#[test]
fn test_concurrent_adds_keep_every_letter() {
    let repo: Arc<dyn LetterRepository> = Arc::new(repository(vec![seed_letter("1", None, "2024-01-01")]));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for i in 0..200 {
                    repo.add(NewLetter::new(format!("thread {} letter {}", t, i))).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let all = repo.list_all();
    assert_eq!(all.len(), 1 + 8 * 200);
    let unique: HashSet<&str> = all.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(unique.len(), all.len());
    assert_eq!(all[0].id, "1");
}

#[test]
fn test_bundled_archive_loads() {
    let repo = MemoryLetterRepository::new(SeedStore::bundled().unwrap());
    assert!(!repo.is_empty());
    assert_eq!(repo.recent(3).len(), 3.min(repo.len()));
}
