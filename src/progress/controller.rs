use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{ProgressRecord, ProgressStore, StorageBackend, progress_percentage};

/// Chapter progress for one book, backed by a shared [`ProgressStore`].
///
/// Every mutation re-reads the stored map and replaces only this book's
/// record before writing, so controllers for other books sharing the store
/// keep their progress. A stored blob that cannot be read is never
/// overwritten. Chapter indices are zero-based and not range checked.
pub struct ProgressController<'a, B> {
    store: &'a ProgressStore<B>,
    book_id: String,
    completed: BTreeSet<u32>,
    last_read: Option<DateTime<Utc>>,
}

impl<'a, B: StorageBackend> ProgressController<'a, B> {
    pub fn new(store: &'a ProgressStore<B>, book_id: &str) -> Self {
        let (completed, last_read) = match store.load().remove(book_id) {
            Some(record) => (record.completed_chapters, Some(record.last_read)),
            None => (BTreeSet::new(), None),
        };
        Self {
            store,
            book_id: book_id.to_string(),
            completed,
            last_read,
        }
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    /// Completed chapter indices, ascending.
    pub fn completed_chapters(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    /// Flips the chapter and returns whether it is now completed.
    pub fn toggle_chapter(&mut self, index: u32) -> bool {
        let completed = if self.completed.remove(&index) {
            false
        } else {
            self.completed.insert(index);
            true
        };
        debug!(book = %self.book_id, chapter = index, completed, "toggled chapter");
        self.persist();
        completed
    }

    pub fn mark_all_complete(&mut self, total_chapters: u32) {
        self.completed = (0..total_chapters).collect();
        debug!(book = %self.book_id, total_chapters, "marked all chapters complete");
        self.persist();
    }

    pub fn reset_progress(&mut self) {
        self.completed.clear();
        debug!(book = %self.book_id, "reset progress");
        self.persist();
    }

    /// Time of the last mutation, stored or made in this session.
    pub fn last_read(&self) -> Option<&DateTime<Utc>> {
        self.last_read.as_ref()
    }

    pub fn is_chapter_completed(&self, index: u32) -> bool {
        self.completed.contains(&index)
    }

    pub fn progress_percentage(&self, total_chapters: u32) -> u8 {
        progress_percentage(self.completed.len(), total_chapters)
    }

    fn persist(&mut self) {
        let record = ProgressRecord::new(self.completed.clone());
        self.last_read = Some(record.last_read);

        let mut map = match self.store.try_load() {
            Ok(map) => map,
            Err(err) => {
                warn!(
                    book = %self.book_id,
                    "stored progress unreadable, change kept in memory only: {err:#}"
                );
                return;
            }
        };
        map.insert(self.book_id.clone(), record);
        self.store.save(&map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryBackend;
    use crate::progress::store::STORAGE_KEY;
    use crate::progress::store::tests::ReadOnlyBackend;

    fn chapters<B: StorageBackend>(controller: &ProgressController<'_, B>) -> Vec<u32> {
        controller.completed_chapters().iter().copied().collect()
    }

    #[test]
    fn new_book_starts_empty() {
        let store = ProgressStore::new(MemoryBackend::default());
        let controller = ProgressController::new(&store, "a");
        assert!(controller.completed_chapters().is_empty());
        assert_eq!(controller.progress_percentage(4), 0);
        assert!(store.load().is_empty());
    }

    #[test]
    fn toggle_is_an_involution_and_persists_each_step() {
        let store = ProgressStore::new(MemoryBackend::default());
        let mut controller = ProgressController::new(&store, "a");

        assert!(controller.toggle_chapter(3));
        assert!(controller.is_chapter_completed(3));
        assert_eq!(store.load()["a"].completed_chapters, BTreeSet::from([3]));

        assert!(!controller.toggle_chapter(3));
        assert!(!controller.is_chapter_completed(3));
        let map = store.load();
        assert!(map["a"].completed_chapters.is_empty());
    }

    #[test]
    fn completed_chapters_are_ascending() {
        let store = ProgressStore::new(MemoryBackend::default());
        let mut controller = ProgressController::new(&store, "a");
        controller.toggle_chapter(4);
        controller.toggle_chapter(0);
        controller.toggle_chapter(2);
        assert_eq!(chapters(&controller), vec![0, 2, 4]);
    }

    #[test]
    fn mark_all_then_reset() {
        let store = ProgressStore::new(MemoryBackend::default());
        let mut controller = ProgressController::new(&store, "a");

        controller.mark_all_complete(5);
        assert_eq!(controller.completed_chapters().len(), 5);
        assert_eq!(controller.progress_percentage(5), 100);

        controller.reset_progress();
        assert!(controller.completed_chapters().is_empty());
        assert_eq!(controller.progress_percentage(5), 0);

        controller.reset_progress();
        assert!(controller.completed_chapters().is_empty());
        let map = store.load();
        assert!(map["a"].completed_chapters.is_empty());
    }

    #[test]
    fn mark_all_replaces_out_of_range_chapters() {
        let store = ProgressStore::new(MemoryBackend::default());
        let mut controller = ProgressController::new(&store, "a");
        controller.toggle_chapter(9);
        controller.mark_all_complete(3);
        assert_eq!(chapters(&controller), vec![0, 1, 2]);
    }

    #[test]
    fn progress_is_restored_by_a_new_controller() {
        let store = ProgressStore::new(MemoryBackend::default());
        {
            let mut controller = ProgressController::new(&store, "a");
            controller.toggle_chapter(1);
            controller.toggle_chapter(2);
        }
        let controller = ProgressController::new(&store, "a");
        assert_eq!(chapters(&controller), vec![1, 2]);
        assert_eq!(controller.progress_percentage(4), 50);
    }

    #[test]
    fn books_are_isolated() {
        let store = ProgressStore::new(MemoryBackend::default());
        let mut book_b = ProgressController::new(&store, "B");
        book_b.toggle_chapter(0);

        let mut book_a = ProgressController::new(&store, "A");
        book_a.toggle_chapter(2);

        let map = store.load();
        assert_eq!(map["A"].completed_chapters, BTreeSet::from([2]));
        assert_eq!(map["B"].completed_chapters, BTreeSet::from([0]));
    }

    #[test]
    fn concurrent_controllers_do_not_lose_updates() {
        let store = ProgressStore::new(MemoryBackend::default());
        let mut first = ProgressController::new(&store, "A");
        let mut second = ProgressController::new(&store, "B");

        first.toggle_chapter(1);
        second.toggle_chapter(4);
        first.toggle_chapter(2);

        let map = store.load();
        assert_eq!(map["A"].completed_chapters, BTreeSet::from([1, 2]));
        assert_eq!(map["B"].completed_chapters, BTreeSet::from([4]));
    }

    #[test]
    fn unreadable_storage_is_left_untouched() {
        let raw = r#"{"version":2,"books":{"other":{"chapters":[1]}}}"#;
        let store = ProgressStore::new(MemoryBackend::with_value(STORAGE_KEY, raw));
        let mut controller = ProgressController::new(&store, "a");
        assert!(controller.completed_chapters().is_empty());
        assert!(controller.last_read().is_none());

        assert!(controller.toggle_chapter(0));
        controller.mark_all_complete(3);
        assert_eq!(chapters(&controller), vec![0, 1, 2]);
        assert!(controller.last_read().is_some());
        assert_eq!(store.backend().raw(STORAGE_KEY).as_deref(), Some(raw));
    }

    #[test]
    fn corrupt_storage_is_not_replaced() {
        let store = ProgressStore::new(MemoryBackend::with_value(STORAGE_KEY, "not valid data"));
        let mut controller = ProgressController::new(&store, "a");
        controller.toggle_chapter(0);
        controller.reset_progress();
        assert_eq!(
            store.backend().raw(STORAGE_KEY).as_deref(),
            Some("not valid data")
        );
    }

    #[test]
    fn last_read_is_restored_from_storage() {
        let store = ProgressStore::new(MemoryBackend::default());
        let stored = {
            let mut controller = ProgressController::new(&store, "a");
            controller.toggle_chapter(1);
            controller.last_read().copied()
        };
        let controller = ProgressController::new(&store, "a");
        assert!(stored.is_some());
        assert_eq!(controller.last_read().copied(), stored);
        assert_eq!(controller.last_read(), Some(&store.load()["a"].last_read));
    }

    #[test]
    fn failed_writes_keep_session_state() {
        let store = ProgressStore::new(ReadOnlyBackend);
        let mut controller = ProgressController::new(&store, "a");

        assert!(controller.toggle_chapter(1));
        controller.toggle_chapter(3);
        assert_eq!(chapters(&controller), vec![1, 3]);
        assert_eq!(controller.progress_percentage(4), 50);
        assert!(store.load().is_empty());
    }
}
