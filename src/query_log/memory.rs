// In-memory query log backend
// Keeps the most recent entries up to a fixed capacity

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{QueryLog, QueryLogEntry, QueryLogError};

#[derive(Debug)]
struct Retained {
    entries: VecDeque<QueryLogEntry>,
    next_id: u64,
}

/// Bounded in-memory log.
///
/// Once `capacity` entries are held the oldest one is evicted on each append.
/// Ids keep increasing across evictions.
#[derive(Debug)]
pub struct MemoryQueryLog {
    capacity: usize,
    retained: Mutex<Retained>,
}

impl MemoryQueryLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            retained: Mutex::new(Retained {
                entries: VecDeque::with_capacity(capacity.min(1024)),
                next_id: 1,
            }),
        }
    }

    /// Snapshot of retained entries, oldest first
    #[cfg(test)]
    pub fn entries(&self) -> Result<Vec<QueryLogEntry>, QueryLogError> {
        self.retained
            .lock()
            .map(|retained| retained.entries.iter().cloned().collect())
            .map_err(|_| QueryLogError::Poisoned)
    }
}

#[async_trait]
impl QueryLog for MemoryQueryLog {
    async fn append(&self, question: &str, response: &str) -> Result<QueryLogEntry, QueryLogError> {
        let mut retained = self.retained.lock().map_err(|_| QueryLogError::Poisoned)?;
        let entry = QueryLogEntry::new(retained.next_id, question, response);
        retained.next_id += 1;

        if retained.entries.len() >= self.capacity {
            retained.entries.pop_front();
        }
        retained.entries.push_back(entry.clone());
        Ok(entry)
    }
}
