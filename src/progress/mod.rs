//! Per-book chapter reading progress.
//!
//! A [`ProgressMap`] holds one [`ProgressRecord`] per book and is persisted as a
//! single text blob under a fixed key of a [`StorageBackend`]. The
//! [`ProgressController`] mutates one book's record and writes it back through
//! the [`ProgressStore`].

mod backend;
mod codec;
mod controller;
mod store;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::backend::StorageBackend;
#[cfg(test)]
pub use self::backend::MemoryBackend;
pub use self::codec::{encode, try_decode};
pub use self::controller::ProgressController;
pub use self::store::ProgressStore;

/// Progress for a single book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub completed_chapters: BTreeSet<u32>,
    pub last_read: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn new(completed_chapters: BTreeSet<u32>) -> Self {
        Self {
            completed_chapters,
            last_read: Utc::now(),
        }
    }
}

/// Book id -> progress, for every tracked book.
pub type ProgressMap = BTreeMap<String, ProgressRecord>;

/// Rounded completion percentage, 0 when `total_chapters` is 0.
pub fn progress_percentage(completed: usize, total_chapters: u32) -> u8 {
    if total_chapters == 0 {
        return 0;
    }
    let completed = completed as u64;
    let total = u64::from(total_chapters);
    let rounded = (200 * completed + total) / (2 * total);
    rounded.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::progress_percentage;

    #[test]
    fn percentage_is_zero_without_chapters() {
        assert_eq!(progress_percentage(0, 0), 0);
        assert_eq!(progress_percentage(3, 0), 0);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(progress_percentage(0, 7), 0);
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(1, 8), 13);
        assert_eq!(progress_percentage(7, 7), 100);
    }

    #[test]
    fn percentage_never_exceeds_one_hundred() {
        assert_eq!(progress_percentage(9, 5), 100);
    }
}
