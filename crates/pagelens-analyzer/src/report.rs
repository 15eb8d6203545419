//! Result aggregate and snapshot emission model.
//!
//! One [`ScanState`] is owned by one scan. The token-processing path is
//! the only writer of the core facts, so those sit behind an uncontended
//! `RwLock`; the liveness sets are written concurrently by the worker
//! pool and each gets its own lock so active and inactive classifications
//! never contend with each other.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

/// Append-only collection of discovered link URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSet {
    /// Number of links recorded
    pub count: usize,
    /// The links, in discovery order
    pub links: Vec<String>,
}

impl LinkSet {
    /// Append one link and bump the counter.
    pub fn push(&mut self, link: impl Into<String>) {
        self.links.push(link.into());
        self.count += 1;
    }
}

/// Owned copy of the aggregate at one point in time.
///
/// This is the wire format: one snapshot is serialized per newly
/// discovered fact and forwarded to the caller verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// Detected document version (`HTML5`, `XHTML`, ...), unset until the
    /// doctype is seen
    pub version: Option<String>,
    /// First non-blank page title, unset until found
    pub title: Option<String>,
    /// Heading tag name to occurrence count, `h1`..`h6` only
    pub headings: BTreeMap<String, u32>,
    /// Links pointing at the scanned site
    pub internal_links: LinkSet,
    /// Links pointing elsewhere
    pub external_links: LinkSet,
    /// Links that answered a liveness probe
    pub active_links: LinkSet,
    /// Links whose probe failed
    pub inactive_links: LinkSet,
    /// Whether the page carries a login form
    pub is_login: bool,
}

/// Facts written only from the single-threaded token path.
#[derive(Debug, Default)]
pub(crate) struct CoreFacts {
    pub version: Option<String>,
    pub title: Option<String>,
    pub headings: BTreeMap<String, u32>,
    pub internal_links: LinkSet,
    pub external_links: LinkSet,
    pub is_login: bool,
}

/// The shared mutable aggregate for one scan.
#[derive(Debug, Default)]
pub struct ScanState {
    core: RwLock<CoreFacts>,
    active: Mutex<LinkSet>,
    inactive: Mutex<LinkSet>,
}

impl ScanState {
    /// Run `f` against the core facts under the single write path.
    pub(crate) fn with_core<R>(&self, f: impl FnOnce(&mut CoreFacts) -> R) -> R {
        let mut core = self
            .core
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut core)
    }

    /// Whether the title has already been determined.
    pub(crate) fn has_title(&self) -> bool {
        self.read_core(|core| core.title.is_some())
    }

    /// Whether the version has already been determined.
    pub(crate) fn has_version(&self) -> bool {
        self.read_core(|core| core.version.is_some())
    }

    /// Whether the page has already been classified as a login page.
    pub(crate) fn is_login(&self) -> bool {
        self.read_core(|core| core.is_login)
    }

    /// Record a link that answered its liveness probe.
    pub(crate) fn record_active(&self, url: impl Into<String>) {
        lock(&self.active).push(url);
    }

    /// Record a link whose liveness probe failed.
    pub(crate) fn record_inactive(&self, url: impl Into<String>) {
        lock(&self.inactive).push(url);
    }

    /// Take an owned snapshot of the whole aggregate.
    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        let core = self.core.read().unwrap_or_else(PoisonError::into_inner);
        PageSnapshot {
            version: core.version.clone(),
            title: core.title.clone(),
            headings: core.headings.clone(),
            internal_links: core.internal_links.clone(),
            external_links: core.external_links.clone(),
            active_links: lock(&self.active).clone(),
            inactive_links: lock(&self.inactive).clone(),
            is_login: core.is_login,
        }
    }

    fn read_core<R>(&self, f: impl FnOnce(&CoreFacts) -> R) -> R {
        let core = self.core.read().unwrap_or_else(PoisonError::into_inner);
        f(&core)
    }
}

fn lock(set: &Mutex<LinkSet>) -> MutexGuard<'_, LinkSet> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}
