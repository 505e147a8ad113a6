//! Test utilities shared by unit tests, integration tests and benchmarks
//!
//! Fixtures here build notes directly, without going through a repository, so
//! tests can control ids and timestamps exactly.

use crate::notes::{Note, NoteIcon, NoteId, NoteRepository};
use crate::storage::MockNoteStore;
use chrono::{DateTime, TimeZone, Utc};

/// Midnight UTC on the given day
///
/// Panics on an invalid date; fixtures are expected to be correct.
pub fn utc_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(year, month, day, 0, 0, 0) {
        chrono::LocalResult::Single(date) => date,
        _ => panic!("invalid fixture date {year}-{month}-{day}"),
    }
}

/// A note with a fresh id and the given fields
pub fn note_at(title: &str, description: &str, created_date: DateTime<Utc>) -> Note {
    Note {
        id: NoteId::new(),
        title: title.to_string(),
        description: description.to_string(),
        created_date,
        icon_name: NoteIcon::Note,
    }
}

/// A few notes with distinct dates, oldest first
pub fn sample_notes() -> Vec<Note> {
    vec![
        note_at("Groceries", "<p>milk, eggs and bread</p>", utc_date(2024, 1, 1)),
        note_at("Dentist", "<p>Tuesday at 3pm</p>", utc_date(2024, 1, 2)),
        note_at("Book club", "<p>Finish chapter four</p>", utc_date(2024, 1, 3)),
        note_at("Gym", "<p>milk shake after leg day</p>", utc_date(2024, 1, 4)),
    ]
}

/// `count` generated notes one minute apart, oldest first
pub fn generated_notes(count: usize) -> Vec<Note> {
    const WORDS: [&str; 8] = [
        "milk", "meeting", "dentist", "photography", "travel", "budget", "garden", "recipe",
    ];
    let start = utc_date(2024, 1, 1);

    (0..count)
        .map(|i| {
            let word = WORDS[i % WORDS.len()];
            let other = WORDS[(i * 3 + 1) % WORDS.len()];
            note_at(
                &format!("{word} note {i}"),
                &format!("<p>Remember the {other} plans for week {}</p>", i / 7),
                start + chrono::Duration::minutes(i as i64),
            )
        })
        .collect()
}

/// Empty mock store and a repository over a clone of it
pub fn create_test_repository() -> (NoteRepository<MockNoteStore>, MockNoteStore) {
    let store = MockNoteStore::new();
    (NoteRepository::new(store.clone()), store)
}

/// Install a test-friendly subscriber; safe to call from every test
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
