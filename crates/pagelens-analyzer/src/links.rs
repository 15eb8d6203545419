//! Link discovery and internal/external classification.
//!
//! Every `a` or `link` tag contributes one entry per `href` attribute.
//! The raw href is recorded in the matching set and queued for the
//! liveness workers; resolution against the base URL happens at probe
//! time so the recorded sets keep the page's own spelling.

use crate::extract::contains_ignore_case;
use crate::report::{PageSnapshot, ScanState};
use crate::token::Token;
use tokio::sync::mpsc;
use url::Url;

/// Tags whose `href` attributes are treated as page links.
const LINK_TAGS: [&str; 2] = ["a", "link"];

/// Classifies hrefs against the scanned page's host.
#[derive(Debug)]
pub struct LinkClassifier {
    base: Url,
}

impl LinkClassifier {
    /// Classifier for a page at `base`.
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Feed one token; records, enqueues, and snapshots every href found.
    ///
    /// Enqueueing may briefly block when the job queue is full; that
    /// backpressure is bounded by the worker count and accepted here.
    pub async fn observe(
        &self,
        token: &Token,
        state: &ScanState,
        jobs: &mpsc::Sender<String>,
        snapshots: &mpsc::Sender<PageSnapshot>,
    ) {
        let (Token::StartTag(tag) | Token::SelfClosingTag(tag)) = token else {
            return;
        };
        if !LINK_TAGS.contains(&tag.name.as_str()) {
            return;
        }

        for (name, value) in &tag.attrs {
            if name != "href" {
                continue;
            }
            if is_external(value, &self.base) {
                state.with_core(|core| core.external_links.push(value.clone()));
            } else {
                state.with_core(|core| core.internal_links.push(value.clone()));
            }

            if jobs.send(value.clone()).await.is_err() {
                // Queue already closed (cancellation); the link stays
                // recorded but is not probed.
                tracing::debug!(href = %value, "liveness queue closed, probe skipped");
            }
            let _ = snapshots.send(state.snapshot()).await;
        }
    }
}

/// A link is external when it names a host and that host does not contain
/// the base host (so `www.lucytech.se` still counts as `lucytech.se`).
pub(crate) fn is_external(href: &str, base: &Url) -> bool {
    let Ok(parsed) = Url::parse(href) else {
        // Relative reference: no host of its own.
        return false;
    };
    match (parsed.host_str(), base.host_str()) {
        (Some(link_host), Some(base_host)) => !contains_ignore_case(link_host, base_host),
        (Some(_), None) => true,
        _ => false,
    }
}

/// Resolve an href to the absolute form used for liveness probing.
///
/// Already-absolute links are kept byte-for-byte; everything else is
/// joined onto the base page URL.
pub(crate) fn resolve_against(base: &Url, href: &str) -> String {
    match Url::parse(href) {
        Ok(parsed) if parsed.host_str().is_some() => href.to_string(),
        _ => base
            .join(href)
            .map_or_else(|_| href.to_string(), Into::into),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Tag;

    fn base(url: &str) -> Url {
        Url::parse(url).expect("valid base url")
    }

    fn anchor(name: &str, attrs: Vec<(&str, &str)>) -> Token {
        Token::StartTag(Tag::new(
            name,
            attrs
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn test_is_external() {
        let lucytech = base("https://lucytech.se/");
        assert!(!is_external("https://lucytech.se/contact", &lucytech));
        assert!(!is_external("/contact", &lucytech));
        assert!(!is_external("https://www.lucytech.se/", &lucytech));
        assert!(is_external("https://www.home24.de/", &lucytech));
    }

    #[test]
    fn test_resolve_against_base() {
        let lucytech = base("https://lucytech.se/");
        assert_eq!(
            resolve_against(&lucytech, "/contact"),
            "https://lucytech.se/contact"
        );
        assert_eq!(
            resolve_against(&lucytech, "https://lucytech.se/contact"),
            "https://lucytech.se/contact"
        );
        assert_eq!(
            resolve_against(&lucytech, "https://www.home24.de"),
            "https://www.home24.de"
        );
    }

    #[tokio::test]
    async fn test_classifies_and_enqueues() {
        let state = ScanState::default();
        let classifier = LinkClassifier::new(base("https://www.home24.de"));
        let (job_tx, mut job_rx) = mpsc::channel(8);
        let (snapshot_tx, mut snapshot_rx) = mpsc::channel(8);

        classifier
            .observe(
                &anchor("a", vec![("href", "https://www.lucytech.se")]),
                &state,
                &job_tx,
                &snapshot_tx,
            )
            .await;

        let snapshot = snapshot_rx.try_recv().expect("snapshot emitted");
        assert_eq!(snapshot.external_links.count, 1);
        assert_eq!(snapshot.external_links.links, vec!["https://www.lucytech.se"]);
        assert_eq!(job_rx.try_recv().expect("job queued"), "https://www.lucytech.se");
    }

    #[tokio::test]
    async fn test_link_tag_counts_too() {
        let state = ScanState::default();
        let classifier = LinkClassifier::new(base("https://www.lucytech.se"));
        let (job_tx, mut job_rx) = mpsc::channel(8);
        let (snapshot_tx, mut snapshot_rx) = mpsc::channel(8);

        classifier
            .observe(
                &anchor("link", vec![("href", "https://www.lucytech.se")]),
                &state,
                &job_tx,
                &snapshot_tx,
            )
            .await;

        let snapshot = snapshot_rx.try_recv().expect("snapshot emitted");
        assert_eq!(snapshot.internal_links.count, 1);
        assert!(job_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_ignores_other_tags_and_attributes() {
        let state = ScanState::default();
        let classifier = LinkClassifier::new(base("https://www.lucytech.se"));
        let (job_tx, mut job_rx) = mpsc::channel(8);
        let (snapshot_tx, mut snapshot_rx) = mpsc::channel(8);

        classifier
            .observe(&anchor("div", vec![]), &state, &job_tx, &snapshot_tx)
            .await;
        classifier
            .observe(
                &anchor("a", vec![("type", "text/html")]),
                &state,
                &job_tx,
                &snapshot_tx,
            )
            .await;

        assert!(snapshot_rx.try_recv().is_err());
        assert!(job_rx.try_recv().is_err());
        let snapshot = state.snapshot();
        assert_eq!(snapshot.internal_links.count, 0);
        assert_eq!(snapshot.external_links.count, 0);
    }

    #[tokio::test]
    async fn test_every_href_processed() {
        let state = ScanState::default();
        let classifier = LinkClassifier::new(base("https://lucytech.se/"));
        let (job_tx, mut job_rx) = mpsc::channel(8);
        let (snapshot_tx, mut snapshot_rx) = mpsc::channel(8);

        // Malformed markup with two hrefs on one tag: both count.
        classifier
            .observe(
                &anchor("a", vec![("href", "/a"), ("href", "/b")]),
                &state,
                &job_tx,
                &snapshot_tx,
            )
            .await;

        assert_eq!(state.snapshot().internal_links.count, 2);
        assert_eq!(job_rx.try_recv().expect("first job"), "/a");
        assert_eq!(job_rx.try_recv().expect("second job"), "/b");
        assert!(snapshot_rx.try_recv().is_ok());
        assert!(snapshot_rx.try_recv().is_ok());
    }
}
