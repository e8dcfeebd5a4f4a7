//! Voice catalog: the platform's voice list with an explicit readiness future.
//!
//! Platforms often enumerate voices asynchronously: the list is empty at
//! startup and filled in later. Rather than polling or listening for a host
//! event, consumers hold a [`VoiceCatalog`] and await [`VoiceCatalog::ready`],
//! which resolves once the list is non-empty. Adapters keep the matching
//! [`VoiceCatalogPublisher`] and publish the list when it becomes known.

use tokio::sync::watch;

use crate::domain::PlatformVoice;

/// The publisher side was dropped before any voice was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("voice catalog closed before any voice was published")]
pub struct CatalogClosed;

/// Create an empty catalog and the publisher that fills it.
pub fn voice_catalog() -> (VoiceCatalogPublisher, VoiceCatalog) {
    let (tx, rx) = watch::channel(Vec::new());
    (VoiceCatalogPublisher { tx }, VoiceCatalog { rx })
}

/// Read side of the platform voice list. Cheap to clone.
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    rx: watch::Receiver<Vec<PlatformVoice>>,
}

impl VoiceCatalog {
    /// A catalog whose voice list is known up front and never changes.
    pub fn fixed(voices: Vec<PlatformVoice>) -> Self {
        let (_tx, rx) = watch::channel(voices);
        Self { rx }
    }

    /// Current voice list (possibly empty).
    pub fn snapshot(&self) -> Vec<PlatformVoice> {
        self.rx.borrow().clone()
    }

    /// Whether at least one voice is known.
    pub fn is_ready(&self) -> bool {
        !self.rx.borrow().is_empty()
    }

    /// Wait until the voice list is non-empty and return it.
    ///
    /// Resolves immediately if voices are already known.
    pub async fn ready(&mut self) -> Result<Vec<PlatformVoice>, CatalogClosed> {
        let voices = self
            .rx
            .wait_for(|voices| !voices.is_empty())
            .await
            .map_err(|_| CatalogClosed)?
            .clone();
        Ok(voices)
    }
}

/// Write side of the platform voice list, held by the speech adapter.
#[derive(Debug)]
pub struct VoiceCatalogPublisher {
    tx: watch::Sender<Vec<PlatformVoice>>,
}

impl VoiceCatalogPublisher {
    /// Replace the voice list, waking anyone waiting in [`VoiceCatalog::ready`].
    pub fn publish(&self, voices: Vec<PlatformVoice>) {
        tracing::debug!(count = voices.len(), "Publishing voice catalog");
        self.tx.send_replace(voices);
    }

    /// Another read handle onto the same list.
    pub fn subscribe(&self) -> VoiceCatalog {
        VoiceCatalog {
            rx: self.tx.subscribe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, assert_ready_eq, task};

    fn voices() -> Vec<PlatformVoice> {
        vec![PlatformVoice::new("Daniel", "en-GB")]
    }

    #[test]
    fn ready_is_pending_until_voices_are_published() {
        let (publisher, catalog) = voice_catalog();
        let mut waiter = catalog.clone();
        let mut ready = task::spawn(async move { waiter.ready().await });

        assert_pending!(ready.poll());
        assert!(!catalog.is_ready());

        publisher.publish(voices());

        assert!(ready.is_woken());
        assert_ready_eq!(ready.poll(), Ok(voices()));
        assert!(catalog.is_ready());
    }

    #[test]
    fn empty_publish_does_not_resolve_ready() {
        let (publisher, mut catalog) = voice_catalog();
        let mut ready = task::spawn(async move { catalog.ready().await });

        assert_pending!(ready.poll());
        publisher.publish(Vec::new());
        assert_pending!(ready.poll());
    }

    #[test]
    fn fixed_catalog_is_ready_immediately() {
        let mut catalog = VoiceCatalog::fixed(voices());
        let mut ready = task::spawn(async move { catalog.ready().await });
        assert_ready_eq!(ready.poll(), Ok(voices()));
    }

    #[test]
    fn dropped_publisher_closes_empty_catalog() {
        let (publisher, mut catalog) = voice_catalog();
        drop(publisher);
        let mut ready = task::spawn(async move { catalog.ready().await });
        let result = assert_ready!(ready.poll());
        assert_eq!(result, Err(CatalogClosed));
    }

    #[test]
    fn subscribers_share_the_published_list() {
        let (publisher, _catalog) = voice_catalog();
        let other = publisher.subscribe();
        publisher.publish(voices());
        assert_eq!(other.snapshot(), voices());
    }
}
