//! Notes and their persistence
//!
//! A [`Note`] is the only persisted entity. The whole collection is stored as a
//! single JSON array under one key of a [`NoteStore`](crate::storage::NoteStore);
//! [`NoteRepository`] owns the in-memory copy and is the only writer.
//!
//! ## Basic Usage
//!
//! ```rust
//! use notekeeper::notes::{NoteIcon, NoteRepository};
//! use notekeeper::storage::MockNoteStore;
//!
//! # async fn example() -> notekeeper::Result<()> {
//! let mut repository = NoteRepository::new(MockNoteStore::new());
//! repository.load().await;
//!
//! let note = repository
//!     .create("Groceries", "<p>milk</p>", NoteIcon::Note, None)
//!     .await?;
//!
//! assert_eq!(repository.list()[0].id, note.id);
//! # Ok(())
//! # }
//! ```

use crate::error::{NoteKeeperError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

pub mod repository;
pub mod timestamp;

pub use repository::NoteRepository;

/// Opaque note identifier
///
/// New ids are ULIDs. Ids read back from storage are accepted as any non-empty
/// string so snapshots written with other id schemes still load.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    /// Generate a new ULID-based note id
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Wrap an existing id, rejecting empty or whitespace-only strings
    pub fn from_string(id: String) -> Result<Self> {
        if id.trim().is_empty() {
            return Err(NoteKeeperError::invalid_note_id(&id));
        }
        Ok(Self(id))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NoteId {
    type Err = NoteKeeperError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s.to_string())
    }
}

impl TryFrom<String> for NoteId {
    type Error = NoteKeeperError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_string(value)
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.0
    }
}

/// Context a note was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteIcon {
    /// Freeform note from the note list
    Note,
    /// Note attached to a day picked on the calendar
    Calendar,
}

impl NoteIcon {
    /// Name used in the persisted snapshot
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteIcon::Note => "note",
            NoteIcon::Calendar => "calendar",
        }
    }
}

impl std::fmt::Display for NoteIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NoteIcon {
    type Err = NoteKeeperError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "note" => Ok(NoteIcon::Note),
            "calendar" => Ok(NoteIcon::Calendar),
            other => Err(NoteKeeperError::validation(
                "iconName",
                format!("unknown icon '{other}', expected 'note' or 'calendar'"),
            )),
        }
    }
}

/// A stored note
///
/// Field names follow the snapshot format: `id`, `title`, `description`,
/// `createdDate`, `iconName`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier, immutable once assigned
    pub id: NoteId,
    /// Title shown in the note list
    pub title: String,
    /// Rich-text (HTML) body
    pub description: String,
    /// Creation time, also the default sort key
    #[serde(with = "timestamp")]
    pub created_date: DateTime<Utc>,
    /// Creation context
    pub icon_name: NoteIcon,
}

impl Note {
    /// Check the fields every saved note must carry
    pub fn validate_fields(title: &str, description: &str) -> Result<()> {
        if title.is_empty() {
            return Err(NoteKeeperError::validation("title", "must not be empty"));
        }
        if description.is_empty() {
            return Err(NoteKeeperError::validation(
                "description",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Input for creating a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    /// Title for the new note
    pub title: String,
    /// Rich-text body for the new note
    pub description: String,
    /// Creation context
    pub icon: NoteIcon,
    /// Explicit creation date; `None` means "now"
    pub date: Option<DateTime<Utc>>,
}

impl NoteDraft {
    /// Draft for a freeform note stamped at save time
    pub fn note(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            icon: NoteIcon::Note,
            date: None,
        }
    }

    /// Draft for a note attached to a calendar date
    pub fn calendar(
        title: impl Into<String>,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            icon: NoteIcon::Calendar,
            date: Some(date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_note_id_generation() {
        let id1 = NoteId::new();
        let id2 = NoteId::new();

        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 26); // ULID length
    }

    #[test]
    fn test_note_id_accepts_foreign_ids() {
        let uuid = "9b2f6a8e-0c3e-4f5a-9d61-2b7e4c1a0f11".to_string();
        let id = NoteId::from_string(uuid.clone()).unwrap();
        assert_eq!(id.as_str(), uuid);
    }

    #[test]
    fn test_note_id_rejects_empty() {
        assert!(NoteId::from_string(String::new()).is_err());
        assert!(NoteId::from_string("   ".to_string()).is_err());
    }

    #[test]
    fn test_icon_parsing() {
        assert_eq!("note".parse::<NoteIcon>().unwrap(), NoteIcon::Note);
        assert_eq!("calendar".parse::<NoteIcon>().unwrap(), NoteIcon::Calendar);
        assert!("star".parse::<NoteIcon>().unwrap_err().is_validation());
    }

    #[test]
    fn test_snapshot_field_names() {
        let note = Note {
            id: NoteId::from_string("abc".to_string()).unwrap(),
            title: "Groceries".to_string(),
            description: "<p>milk</p>".to_string(),
            created_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            icon_name: NoteIcon::Calendar,
        };

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["createdDate"], "2024-01-01T00:00:00.000Z");
        assert_eq!(value["iconName"], "calendar");

        let back: Note = serde_json::from_value(value).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_malformed_records_are_rejected() {
        let missing_title = r#"{"id":"a","description":"d","createdDate":"2024-01-01T00:00:00Z","iconName":"note"}"#;
        assert!(serde_json::from_str::<Note>(missing_title).is_err());

        let bad_icon = r#"{"id":"a","title":"t","description":"d","createdDate":"2024-01-01T00:00:00Z","iconName":"star"}"#;
        assert!(serde_json::from_str::<Note>(bad_icon).is_err());

        let empty_id = r#"{"id":"","title":"t","description":"d","createdDate":"2024-01-01T00:00:00Z","iconName":"note"}"#;
        assert!(serde_json::from_str::<Note>(empty_id).is_err());
    }

    #[test]
    fn test_validate_fields() {
        assert!(Note::validate_fields("t", "d").is_ok());

        let err = Note::validate_fields("", "d").unwrap_err();
        assert!(matches!(err, NoteKeeperError::Validation { ref field, .. } if field == "title"));

        let err = Note::validate_fields("t", "").unwrap_err();
        assert!(
            matches!(err, NoteKeeperError::Validation { ref field, .. } if field == "description")
        );

        // whitespace counts as content
        assert!(Note::validate_fields(" ", "<p>x</p>").is_ok());
        assert!(Note::validate_fields("t", "  ").is_ok());
    }

    #[test]
    fn test_draft_constructors() {
        let draft = NoteDraft::note("a", "b");
        assert_eq!(draft.icon, NoteIcon::Note);
        assert!(draft.date.is_none());

        let day = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let draft = NoteDraft::calendar("a", "b", day);
        assert_eq!(draft.icon, NoteIcon::Calendar);
        assert_eq!(draft.date, Some(day));
    }
}
