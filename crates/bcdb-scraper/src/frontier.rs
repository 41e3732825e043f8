//! Visit-once breadth-first traversal state.

use std::collections::{HashSet, VecDeque};

use crate::urls::BrandUrls;

/// FIFO queue of pending URLs plus the set of URLs already visited.
///
/// Every URL is canonicalized on the way in, so two spellings of the same
/// page are one entry. A visited URL is never queued or handed out again,
/// which bounds a run to the number of distinct URLs discovered.
#[derive(Debug)]
pub struct Frontier {
    urls: BrandUrls,
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    #[must_use]
    pub fn new(urls: BrandUrls) -> Self {
        Self {
            urls,
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
        }
    }

    /// Marks `url` visited without fetching it. Returns `false` if it
    /// already was.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(self.urls.canonical(url))
    }

    /// Appends `url` unless it is already visited or pending.
    ///
    /// Returns `true` when the URL was queued.
    pub fn enqueue(&mut self, url: &str) -> bool {
        let canonical = self.urls.canonical(url);
        if self.visited.contains(&canonical) || self.queued.contains(&canonical) {
            return false;
        }
        self.queued.insert(canonical.clone());
        self.queue.push_back(canonical);
        true
    }

    /// Pops the oldest pending URL that has not been visited yet and marks it
    /// visited.
    pub fn next_url(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }
}
