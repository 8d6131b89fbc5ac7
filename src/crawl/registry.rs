// src/crawl/registry.rs
// =============================================================================
// The visit registry: a counted set of normalized page URLs.
//
// Every crawl task reports every link it follows here. The first report of a
// page inserts it with count 1 and tells the caller "you own fetching this
// page"; every later report only bumps the count. Checking and updating happen
// under one lock, so two tasks can never both see a page as new.
// =============================================================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::links::NormalizedUrl;

/// Concurrency-safe map of page key -> number of times it was linked
#[derive(Debug, Default)]
pub struct VisitRegistry {
    pages: Mutex<HashMap<NormalizedUrl, usize>>,
}

impl VisitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sighting of `key`.
    ///
    /// Returns `true` only for the first sighting of a key.
    pub fn record_visit(&self, key: NormalizedUrl) -> bool {
        let mut pages = self.lock();
        match pages.get_mut(&key) {
            Some(count) => {
                *count += 1;
                false
            }
            None => {
                pages.insert(key, 1);
                true
            }
        }
    }

    /// Number of distinct pages seen so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// How many times `key` has been linked so far, if at all
    pub fn count(&self, key: &str) -> Option<usize> {
        self.lock().get(key).copied()
    }

    /// Point-in-time copy of every page and its count
    pub fn snapshot(&self) -> HashMap<NormalizedUrl, usize> {
        self.lock().clone()
    }

    // Each critical section leaves the map consistent, so a panic in another
    // thread while holding the lock does not corrupt it.
    fn lock(&self) -> MutexGuard<'_, HashMap<NormalizedUrl, usize>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::normalize_url;
    use std::sync::Arc;

    fn key(raw: &str) -> NormalizedUrl {
        normalize_url(raw).unwrap()
    }

    #[test]
    fn test_first_visit_then_increments() {
        let registry = VisitRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.record_visit(key("https://blog.boot.dev/path")));
        assert!(!registry.record_visit(key("http://BLOG.boot.dev/path/")));
        assert!(!registry.record_visit(key("https://blog.boot.dev/path#top")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.count("blog.boot.dev/path"), Some(3));
        assert_eq!(registry.count("blog.boot.dev/other"), None);
    }

    #[test]
    fn test_count_agrees_with_snapshot() {
        let registry = VisitRegistry::new();
        assert_eq!(registry.count("a.com/1"), None);

        registry.record_visit(key("https://a.com/1"));
        registry.record_visit(key("https://a.com/1/"));
        registry.record_visit(key("https://a.com/2"));

        let snapshot = registry.snapshot();
        for (page, count) in &snapshot {
            assert_eq!(registry.count(page.as_str()), Some(*count));
        }
        assert_eq!(registry.count("a.com/1"), Some(2));
    }

    #[test]
    fn test_distinct_keys_grow_len() {
        let registry = VisitRegistry::new();
        registry.record_visit(key("https://a.com/1"));
        registry.record_visit(key("https://a.com/2"));
        registry.record_visit(key("https://a.com/2"));
        assert_eq!(registry.len(), 2);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.get("a.com/1"), Some(&1));
        assert_eq!(snapshot.get("a.com/2"), Some(&2));
    }

    #[test]
    fn test_concurrent_callers_see_exactly_one_first_visit() {
        const CALLERS: usize = 64;
        let registry = Arc::new(VisitRegistry::new());

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.record_visit(key("https://blog.boot.dev/race")))
            })
            .collect();

        let firsts = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|first| *first)
            .count();

        assert_eq!(firsts, 1);
        assert_eq!(registry.count("blog.boot.dev/race"), Some(CALLERS));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tasks_many_keys() {
        let registry = Arc::new(VisitRegistry::new());
        let mut handles = Vec::new();

        for i in 0..200 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.record_visit(key(&format!("https://a.com/{}", i % 10)))
            }));
        }

        let mut firsts = 0;
        for handle in handles {
            if handle.await.unwrap() {
                firsts += 1;
            }
        }

        assert_eq!(firsts, 10);
        assert_eq!(registry.len(), 10);
        assert!(registry.snapshot().values().all(|count| *count == 20));
    }
}
