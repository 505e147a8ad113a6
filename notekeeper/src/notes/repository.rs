//! In-memory note collection backed by a [`NoteStore`]
//!
//! Every mutation serializes the complete candidate collection and writes it
//! under one key. The in-memory collection only changes once that write has
//! succeeded, so a failed persist leaves the repository exactly as it was.

use crate::error::{ErrorChainExt, NoteKeeperError, Result};
use crate::notes::{timestamp, Note, NoteDraft, NoteIcon, NoteId};
use crate::storage::{NoteStore, NOTES_KEY};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, error, info, instrument, warn};

/// Owner of the authoritative note collection
#[derive(Debug)]
pub struct NoteRepository<S> {
    store: S,
    key: String,
    /// Insertion order; `list` derives the display order
    notes: Vec<Note>,
}

impl<S: NoteStore> NoteRepository<S> {
    /// Repository over `store` using the default [`NOTES_KEY`]
    pub fn new(store: S) -> Self {
        Self::with_key(store, NOTES_KEY)
    }

    /// Repository over `store` using a custom key
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            notes: Vec::new(),
        }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Key the snapshot is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the snapshot, replacing the in-memory collection
    ///
    /// Read and parse failures are logged and yield an empty collection.
    /// Returns the collection in [`list`](Self::list) order.
    pub async fn load(&mut self) -> Vec<Note> {
        match self.load_strict().await {
            Ok(notes) => notes,
            Err(e) => {
                error!("Error loading notes, continuing with none: {}", e.error_chain());
                self.notes.clear();
                Vec::new()
            }
        }
    }

    /// Like [`load`](Self::load) but reports read and parse failures
    ///
    /// On failure the in-memory collection is left untouched.
    pub async fn load_strict(&mut self) -> Result<Vec<Note>> {
        let snapshot = self.store.get(&self.key).await?;

        let notes = match snapshot {
            None => {
                debug!("No snapshot under '{}'", self.key);
                Vec::new()
            }
            Some(json) => Self::parse_snapshot(&json)?,
        };

        info!("Loaded {} notes", notes.len());
        self.notes = notes;
        Ok(self.list())
    }

    fn parse_snapshot(json: &str) -> Result<Vec<Note>> {
        let notes: Vec<Note> = serde_json::from_str(json)
            .map_err(|e| NoteKeeperError::StorageRead(format!("Corrupt notes snapshot: {e}")))?;

        let mut seen = HashSet::with_capacity(notes.len());
        for note in &notes {
            if !seen.insert(&note.id) {
                return Err(NoteKeeperError::StorageRead(format!(
                    "Duplicate note id in snapshot: {}",
                    note.id
                )));
            }
        }

        Ok(notes)
    }

    /// Write `notes` as the new snapshot
    async fn persist(&self, notes: &[Note]) -> Result<()> {
        let json = serde_json::to_string(notes)
            .map_err(|e| NoteKeeperError::StorageWrite(format!("Failed to serialize notes: {e}")))?;

        self.store.set(&self.key, &json).await.map_err(|e| {
            warn!("Failed to persist {} notes: {}", notes.len(), e);
            match e {
                NoteKeeperError::StorageWrite(_) => e,
                other => NoteKeeperError::StorageWrite(other.to_string()),
            }
        })?;

        debug!("Persisted {} notes ({} bytes)", notes.len(), json.len());
        Ok(())
    }

    fn fresh_id(&self) -> NoteId {
        loop {
            let id = NoteId::new();
            if !self.notes.iter().any(|note| note.id == id) {
                return id;
            }
        }
    }

    /// Create a note and persist the collection
    pub async fn create(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: NoteIcon,
        date: Option<DateTime<Utc>>,
    ) -> Result<Note> {
        let title = title.into();
        let description = description.into();
        Note::validate_fields(&title, &description)?;
        let created_date = match date {
            Some(date) => timestamp::check_range(timestamp::truncate(date))?,
            None => timestamp::now(),
        };

        let note = Note {
            id: self.fresh_id(),
            title,
            description,
            created_date,
            icon_name: icon,
        };

        let mut candidate = self.notes.clone();
        candidate.push(note.clone());
        self.persist(&candidate).await?;
        self.notes = candidate;

        info!("Created note {} ({})", note.id, note.icon_name);
        Ok(note)
    }

    /// Create a note from a [`NoteDraft`]
    pub async fn create_from(&mut self, draft: NoteDraft) -> Result<Note> {
        self.create(draft.title, draft.description, draft.icon, draft.date)
            .await
    }

    /// Replace the title and description of an existing note
    ///
    /// The id and icon are kept and `created_date` moves to the update time.
    /// The replacement is appended, so it sorts after any note sharing its
    /// timestamp.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update(
        &mut self,
        id: &NoteId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Note> {
        let title = title.into();
        let description = description.into();
        Note::validate_fields(&title, &description)?;

        let existing = self
            .get(id)
            .ok_or_else(|| NoteKeeperError::NoteNotFound(id.to_string()))?;

        let updated = Note {
            id: existing.id.clone(),
            title,
            description,
            created_date: timestamp::now(),
            icon_name: existing.icon_name,
        };

        let mut candidate: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| note.id != *id)
            .cloned()
            .collect();
        candidate.push(updated.clone());
        self.persist(&candidate).await?;
        self.notes = candidate;

        info!("Updated note");
        Ok(updated)
    }

    /// Remove a note and persist the collection
    ///
    /// Removing an unknown id is not an error; the unchanged collection is
    /// still written. Returns whether a note was removed.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn remove(&mut self, id: &NoteId) -> Result<bool> {
        let candidate: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| note.id != *id)
            .cloned()
            .collect();
        let removed = candidate.len() != self.notes.len();

        self.persist(&candidate).await?;
        self.notes = candidate;

        if removed {
            info!("Removed note");
        } else {
            debug!("No note to remove");
        }
        Ok(removed)
    }

    /// Notes ordered newest first
    ///
    /// The sort is stable: notes with equal timestamps keep insertion order.
    pub fn list(&self) -> Vec<Note> {
        let mut notes = self.notes.clone();
        notes.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        notes
    }

    /// Notes in insertion order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Look up a note by id
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == *id)
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True when the collection is empty
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
