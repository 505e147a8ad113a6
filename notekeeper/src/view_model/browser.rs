use crate::error::Result;
use crate::notes::{Note, NoteDraft, NoteId, NoteRepository};
use crate::search::{SearchIndex, SearchOptions};
use crate::storage::NoteStore;
use tracing::debug;

/// Home screen state: the visible notes and the active query
///
/// Every mutation re-applies the current query, so the visible list never
/// shows a note that has been deleted or misses one that was just saved.
#[derive(Debug)]
pub struct NoteBrowser<S> {
    repository: NoteRepository<S>,
    index: SearchIndex,
    query: String,
    visible: Vec<Note>,
}

impl<S: NoteStore> NoteBrowser<S> {
    /// Create a browser over `repository` with default search options
    pub fn new(repository: NoteRepository<S>) -> Self {
        Self::with_options(repository, SearchOptions::default())
    }

    /// Create a browser with custom search options
    pub fn with_options(repository: NoteRepository<S>, options: SearchOptions) -> Self {
        let visible = repository.list();
        Self {
            repository,
            index: SearchIndex::new(options),
            query: String::new(),
            visible,
        }
    }

    /// Load the collection and show all of it
    pub async fn open(&mut self) -> &[Note] {
        self.repository.load().await;
        self.query.clear();
        self.refresh();
        &self.visible
    }

    /// Visible notes, newest first unless a query ranks them
    pub fn notes(&self) -> &[Note] {
        &self.visible
    }

    /// Size of the whole collection, regardless of the query
    pub fn total(&self) -> usize {
        self.repository.len()
    }

    /// True when the collection holds no notes
    pub fn is_empty(&self) -> bool {
        self.repository.is_empty()
    }

    /// Set the query text and filter the visible list
    pub fn search(&mut self, text: impl Into<String>) -> &[Note] {
        self.query = text.into();
        self.refresh();
        &self.visible
    }

    /// Current query text
    pub fn search_text(&self) -> &str {
        &self.query
    }

    /// Drop the query and show the whole collection
    pub fn clear_search(&mut self) -> &[Note] {
        self.search(String::new())
    }

    /// Save a new note
    pub async fn save(&mut self, draft: NoteDraft) -> Result<Note> {
        let note = self.repository.create_from(draft).await?;
        self.refresh();
        Ok(note)
    }

    /// Edit the title and description of a note
    pub async fn edit(
        &mut self,
        id: &NoteId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Note> {
        let note = self.repository.update(id, title, description).await?;
        self.refresh();
        Ok(note)
    }

    /// Delete a note; returns whether it existed
    pub async fn delete(&mut self, id: &NoteId) -> Result<bool> {
        let removed = self.repository.remove(id).await?;
        self.refresh();
        Ok(removed)
    }

    /// Underlying repository
    pub fn repository(&self) -> &NoteRepository<S> {
        &self.repository
    }

    fn refresh(&mut self) {
        self.visible = self.index.query(self.query.as_str(), &self.repository.list());
        debug!(
            "Showing {} of {} notes",
            self.visible.len(),
            self.repository.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::NoMatchBehavior;
    use crate::storage::{MockNoteStore, MockStoreConfig};

    async fn create_test_browser() -> (NoteBrowser<MockNoteStore>, MockNoteStore) {
        let store = MockNoteStore::new();
        let mut browser = NoteBrowser::new(NoteRepository::new(store.clone()));
        browser.open().await;
        (browser, store)
    }

    #[tokio::test]
    async fn test_open_empty_store() {
        let (browser, _store) = create_test_browser().await;

        assert!(browser.is_empty());
        assert_eq!(browser.total(), 0);
        assert!(browser.notes().is_empty());
        assert_eq!(browser.search_text(), "");
    }

    #[tokio::test]
    async fn test_save_shows_newest_first() {
        let (mut browser, _store) = create_test_browser().await;

        let first = browser
            .save(NoteDraft::note("Groceries", "<p>milk</p>"))
            .await
            .unwrap();
        let second = browser
            .save(NoteDraft::note("Dentist", "<p>Tuesday</p>"))
            .await
            .unwrap();

        let ids: Vec<&NoteId> = browser.notes().iter().map(|n| &n.id).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(browser.total(), 2);
        // created in quick succession, so equal timestamps are possible
        if second.created_date > first.created_date {
            assert_eq!(ids, vec![&second.id, &first.id]);
        }
    }

    #[tokio::test]
    async fn test_search_filters_but_total_does_not() {
        let (mut browser, _store) = create_test_browser().await;
        browser
            .save(NoteDraft::note("Groceries", "<p>milk</p>"))
            .await
            .unwrap();
        browser
            .save(NoteDraft::note("Dentist", "<p>Tuesday</p>"))
            .await
            .unwrap();

        let visible = browser.search("dentist");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Dentist");
        assert_eq!(browser.search_text(), "dentist");
        assert_eq!(browser.total(), 2);

        assert_eq!(browser.clear_search().len(), 2);
        assert_eq!(browser.search_text(), "");
    }

    #[tokio::test]
    async fn test_search_word_from_description() {
        let (mut browser, _store) = create_test_browser().await;
        browser
            .save(NoteDraft::note("Groceries", "<p>milk</p>"))
            .await
            .unwrap();
        browser
            .save(NoteDraft::note("Dentist", "<p>Tuesday</p>"))
            .await
            .unwrap();

        let found: Vec<&str> = browser
            .search("milk")
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(found, vec!["Groceries"]);

        // a dropped letter is past the default threshold
        assert_eq!(browser.search("mlk").len(), 2);
    }

    #[tokio::test]
    async fn test_search_without_matches_shows_everything() {
        let (mut browser, _store) = create_test_browser().await;
        browser
            .save(NoteDraft::note("Groceries", "<p>milk</p>"))
            .await
            .unwrap();

        assert_eq!(browser.search("zzzQQQnomatch").len(), 1);
    }

    #[tokio::test]
    async fn test_search_without_matches_can_show_nothing() {
        let store = MockNoteStore::new();
        let mut browser = NoteBrowser::with_options(
            NoteRepository::new(store),
            SearchOptions {
                no_match: NoMatchBehavior::ShowNone,
                ..SearchOptions::default()
            },
        );
        browser.open().await;
        browser
            .save(NoteDraft::note("Groceries", "<p>milk</p>"))
            .await
            .unwrap();

        assert!(browser.search("zzzQQQnomatch").is_empty());
    }

    #[tokio::test]
    async fn test_mutations_reapply_query() {
        let (mut browser, _store) = create_test_browser().await;
        let groceries = browser
            .save(NoteDraft::note("Groceries", "<p>milk</p>"))
            .await
            .unwrap();
        browser.search("milk");
        assert_eq!(browser.notes().len(), 1);

        browser
            .save(NoteDraft::note("Gym", "<p>milk shake</p>"))
            .await
            .unwrap();
        assert_eq!(browser.notes().len(), 2);

        browser.delete(&groceries.id).await.unwrap();
        assert_eq!(browser.notes().len(), 1);
        assert_eq!(browser.notes()[0].title, "Gym");
    }

    #[tokio::test]
    async fn test_edit_updates_visible_note() {
        let (mut browser, _store) = create_test_browser().await;
        let note = browser
            .save(NoteDraft::note("Groceries", "<p>milk</p>"))
            .await
            .unwrap();

        browser
            .edit(&note.id, "Groceries", "<p>oat milk</p>")
            .await
            .unwrap();

        assert_eq!(browser.notes().len(), 1);
        assert_eq!(browser.notes()[0].id, note.id);
        assert_eq!(browser.notes()[0].description, "<p>oat milk</p>");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_visible_list() {
        let (mut browser, store) = create_test_browser().await;
        browser
            .save(NoteDraft::note("Groceries", "<p>milk</p>"))
            .await
            .unwrap();

        store
            .set_config(MockStoreConfig {
                fail_set: true,
                ..Default::default()
            })
            .await;

        assert!(browser
            .save(NoteDraft::note("Dentist", "<p>Tuesday</p>"))
            .await
            .is_err());
        assert_eq!(browser.notes().len(), 1);
        assert_eq!(browser.total(), 1);
    }

    #[tokio::test]
    async fn test_open_resets_query() {
        let (mut browser, _store) = create_test_browser().await;
        browser
            .save(NoteDraft::note("Groceries", "<p>milk</p>"))
            .await
            .unwrap();
        browser
            .save(NoteDraft::note("Dentist", "<p>Tuesday</p>"))
            .await
            .unwrap();
        browser.search("dentist");

        assert_eq!(browser.open().await.len(), 2);
        assert_eq!(browser.search_text(), "");
    }
}
