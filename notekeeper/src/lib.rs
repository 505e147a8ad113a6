//! # notekeeper
//!
//! A small note-taking core: a persistent note collection and fuzzy search over
//! it.
//!
//! ## Features
//!
//! - **Notes**: Create, edit and delete notes; the collection is saved as one
//!   JSON snapshot after every change
//! - **Storage**: Pluggable key-value backends, filesystem and in-memory
//! - **Search**: Typo-tolerant fuzzy matching over titles and descriptions
//! - **Screen state**: Home and calendar view models for front ends
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notekeeper::prelude::*;
//!
//! # async fn example() -> notekeeper::Result<()> {
//! let config = NoteKeeperConfig::from_env();
//! let store = FileSystemNoteStore::from_config(&config);
//! let mut repository = NoteRepository::with_key(store, config.storage_key.clone());
//! repository.load().await;
//!
//! repository
//!     .create("Groceries", "<p>milk, eggs</p>", NoteIcon::Note, None)
//!     .await?;
//!
//! let index = SearchIndex::new(config.search.clone());
//! for note in index.query("milk", &repository.list()) {
//!     println!("{}", note.title);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Shared helpers for environment loading and error context
pub mod common;

/// Configuration loading
pub mod config;

/// Error types used throughout the library
pub mod error;

/// Tracing subscriber setup
pub mod logging;

/// Notes and the note repository
pub mod notes;

/// Fuzzy search
pub mod search;

/// Storage abstractions and implementations
pub mod storage;

/// Screen state for front ends
pub mod view_model;

pub use config::NoteKeeperConfig;
pub use error::{NoteKeeperError, Result};
pub use notes::{Note, NoteDraft, NoteIcon, NoteId, NoteRepository};
pub use search::{SearchIndex, SearchOptions, SearchResult};
pub use storage::{FileSystemNoteStore, MockNoteStore, NoteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        FileSystemNoteStore, MockNoteStore, Note, NoteDraft, NoteIcon, NoteId, NoteKeeperConfig,
        NoteKeeperError, NoteRepository, NoteStore, Result, SearchIndex, SearchOptions,
        SearchResult,
    };

    pub use crate::search::{MatchStrategy, NoMatchBehavior};
    pub use crate::view_model::{CalendarComposer, NoteBrowser};
}

/// Test utilities module for testing support
#[doc(hidden)]
pub mod test_utils;
