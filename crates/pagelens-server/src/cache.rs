//! In-memory TTL cache of final scan results.
//!
//! A successful scan's last snapshot is cached by URL so repeat requests
//! answer instantly without rescanning. Entries expire after the
//! configured TTL; a background sweeper evicts them on a fixed cadence,
//! and `get` double-checks expiry so a stale entry is never served
//! between sweeps.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CachedResult {
    body: String,
    stored_at: Instant,
}

/// Concurrent URL-keyed result cache.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CachedResult>,
    ttl: Duration,
}

impl ResponseCache {
    /// Cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// The cached result for `url`, if present and not expired.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<String> {
        let entry = self.entries.get(url)?;
        if entry.stored_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(url);
            return None;
        }
        Some(entry.body.clone())
    }

    /// Store the final result for `url`, replacing any previous entry.
    pub fn insert(&self, url: impl Into<String>, body: String) {
        self.entries.insert(
            url.into(),
            CachedResult {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry.
    pub fn sweep(&self) {
        self.entries
            .retain(|_, entry| entry.stored_at.elapsed() <= self.ttl);
    }

    /// Number of live entries (expired-but-unswept included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Spawn the periodic sweeper for this cache.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // immediate first tick
            loop {
                ticker.tick().await;
                self.sweep();
                tracing::debug!(entries = self.len(), "response cache swept");
            }
        });
    }
}
