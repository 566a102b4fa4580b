use crate::filter::LinkClass;
use std::collections::{HashSet, VecDeque};

/// Pages fetched so far against a fixed maximum
#[derive(Debug, Clone, Copy)]
pub struct CrawlBudget {
    used: usize,
    max: usize,
}

impl CrawlBudget {
    pub fn new(max: usize) -> Self {
        Self { used: 0, max }
    }

    /// Count one fetch attempt; `false` (and no change) once the budget is spent
    pub fn try_consume(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

/// Pending and visited URLs of one crawl.
///
/// A URL is in at most one of {pending, visited}. Priority URLs are always
/// handed out before general ones; each class is FIFO.
#[derive(Debug, Default)]
pub struct CrawlFrontier {
    priority: VecDeque<String>,
    general: VecDeque<String>,
    queued: HashSet<String>,
    visited: Vec<String>,
    seen: HashSet<String>,
}

impl CrawlFrontier {
    pub fn seeded(seed: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed.into(), LinkClass::Priority);
        frontier
    }

    /// Queue a URL; returns `false` if it is rejected, pending or already visited
    pub fn push(&mut self, url: String, class: LinkClass) -> bool {
        if class == LinkClass::Reject || self.is_known(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        match class {
            LinkClass::Priority => self.priority.push_back(url),
            _ => self.general.push_back(url),
        }
        true
    }

    /// Take the next URL and mark it visited
    pub fn pop(&mut self) -> Option<String> {
        let url = self
            .priority
            .pop_front()
            .or_else(|| self.general.pop_front())?;
        self.queued.remove(&url);
        self.seen.insert(url.clone());
        self.visited.push(url.clone());
        Some(url)
    }

    pub fn is_known(&self, url: &str) -> bool {
        self.queued.contains(url) || self.seen.contains(url)
    }

    pub fn pending_len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Visited URLs in visit order
    pub fn into_visited(self) -> Vec<String> {
        self.visited
    }
}
