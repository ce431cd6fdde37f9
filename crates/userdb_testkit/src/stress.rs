//! Concurrency stress helpers.
//!
//! Run several writer and reader threads against one shared store and
//! report what they observed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use userdb_core::{Store, User};

/// Result of a stress run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Ids handed out to writers, in no particular order.
    pub created_ids: Vec<u64>,
    /// Snapshot reads that saw a torn or shrinking listing.
    pub inconsistent_reads: usize,
    /// Successful snapshot reads.
    pub reads: usize,
    /// Total duration.
    pub duration: Duration,
}

impl StressTestResult {
    /// Whether every created id is unique and they form `1..=n`.
    pub fn ids_are_dense(&self) -> bool {
        let mut ids = self.created_ids.clone();
        ids.sort_unstable();
        ids.iter().zip(1u64..).all(|(id, expected)| *id == expected)
    }
}

/// Configuration for stress runs.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Writer threads.
    pub writers: usize,
    /// Users created by each writer.
    pub creates_per_writer: usize,
    /// Reader threads.
    pub readers: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            writers: 4,
            creates_per_writer: 25,
            readers: 2,
        }
    }
}

/// Creates users from many threads while readers take snapshots.
///
/// Each reader checks that a snapshot's listing is sorted, matches its
/// count, and never shrinks between consecutive snapshots.
pub fn concurrent_creates(store: Arc<Store>, config: &StressConfig) -> StressTestResult {
    let start = Instant::now();
    let writers_left = Arc::new(AtomicUsize::new(config.writers));
    let inconsistent = Arc::new(AtomicUsize::new(0));
    let reads = Arc::new(AtomicUsize::new(0));

    let writer_handles: Vec<_> = (0..config.writers)
        .map(|w| {
            let store = Arc::clone(&store);
            let writers_left = Arc::clone(&writers_left);
            let count = config.creates_per_writer;
            thread::spawn(move || {
                let mut ids = Vec::with_capacity(count);
                for i in 0..count {
                    let mut user = User::new(format!("w{w}-{i}"));
                    ids.push(store.create_user(&mut user).expect("Failed to create user"));
                }
                writers_left.fetch_sub(1, Ordering::SeqCst);
                ids
            })
        })
        .collect();

    let reader_handles: Vec<_> = (0..config.readers)
        .map(|_| {
            let store = Arc::clone(&store);
            let writers_left = Arc::clone(&writers_left);
            let inconsistent = Arc::clone(&inconsistent);
            let reads = Arc::clone(&reads);
            thread::spawn(move || {
                let mut last_len = 0;
                loop {
                    let done = writers_left.load(Ordering::SeqCst) == 0;
                    let snapshot = store.snapshot().expect("Failed to take snapshot");
                    let users = snapshot.users().expect("Failed to list users");
                    let count = snapshot.count_users().expect("Failed to count users");
                    drop(snapshot);

                    let sorted = users.windows(2).all(|w| w[0].id < w[1].id);
                    if !sorted || users.len() as u64 != count || users.len() < last_len {
                        inconsistent.fetch_add(1, Ordering::SeqCst);
                    }
                    last_len = users.len();
                    reads.fetch_add(1, Ordering::SeqCst);
                    if done {
                        break;
                    }
                }
            })
        })
        .collect();

    let mut created_ids = Vec::new();
    for handle in writer_handles {
        created_ids.extend(handle.join().expect("Writer thread panicked"));
    }
    for handle in reader_handles {
        handle.join().expect("Reader thread panicked");
    }

    StressTestResult {
        created_ids,
        inconsistent_reads: inconsistent.load(Ordering::SeqCst),
        reads: reads.load(Ordering::SeqCst),
        duration: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::DB_FILE;

    #[test]
    fn test_concurrent_creates_small() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join(DB_FILE)).unwrap());
        let config = StressConfig {
            writers: 2,
            creates_per_writer: 5,
            readers: 1,
        };

        let result = concurrent_creates(Arc::clone(&store), &config);
        assert_eq!(result.created_ids.len(), 10);
        assert!(result.ids_are_dense());
        assert_eq!(result.inconsistent_reads, 0);
        assert!(result.reads >= 1);
        assert_eq!(store.count_users().unwrap(), 10);
    }
}
