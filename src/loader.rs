use crate::fetch::{LoadOutcome, LyricFetcher, LyricSource};
use crate::messages::PlayerEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Coordinates lyric loads so only the most recent request is delivered.
///
/// Every request takes a new generation number. A load whose generation
/// is no longer current when it finishes is dropped, so a slow fetch for
/// an earlier song can never overwrite the lyrics of the song playing now.
pub struct LyricLoader {
    fetcher: Arc<LyricFetcher>,
    generation: Arc<AtomicU64>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl LyricLoader {
    pub fn new(fetcher: LyricFetcher) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Mutex::new(None),
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    /// Load lyrics inline. Returns `None` when a newer request superseded
    /// this one before it finished.
    pub async fn load(&self, source: &LyricSource) -> Option<LoadOutcome> {
        let generation = self.next_generation();
        let outcome = self.fetcher.load(source).await;
        self.is_current(generation).then_some(outcome)
    }

    /// Start loading in the background, cancelling the previous request.
    ///
    /// The outcome arrives as [`PlayerEvent::LyricsLoaded`] on `tx` unless
    /// another request supersedes it first.
    pub fn request(&self, source: LyricSource, tx: mpsc::UnboundedSender<PlayerEvent>) -> u64 {
        let generation = self.next_generation();
        let fetcher = self.fetcher.clone();
        let current = self.generation.clone();

        tracing::debug!("Lyric request {} for {:?}", generation, source);

        let handle = tokio::spawn(async move {
            let outcome = fetcher.load(&source).await;
            if current.load(Ordering::SeqCst) != generation {
                tracing::debug!("Dropping stale lyric result {}", generation);
                return;
            }
            let _ = tx.send(PlayerEvent::LyricsLoaded {
                generation,
                outcome,
            });
        });

        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = in_flight.replace(handle) {
            previous.abort();
        }

        generation
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Default for LyricLoader {
    fn default() -> Self {
        Self::new(LyricFetcher::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::test_server;
    use tokio::time::Duration;

    #[tokio::test]
    async fn test_load_inline_is_current() {
        let loader = LyricLoader::default();
        let outcome = loader
            .load(&LyricSource::Inline("[00:01.00]a".into()))
            .await
            .unwrap();
        assert_eq!(outcome.track.len(), 1);
        assert_eq!(loader.current_generation(), 1);
    }

    #[tokio::test]
    async fn test_superseded_load_is_discarded() {
        let slow = test_server::spawn(200, "[00:01.00]old song", Duration::from_millis(300)).await;
        let loader = Arc::new(LyricLoader::default());

        let first = {
            let loader = loader.clone();
            tokio::spawn(async move { loader.load(&LyricSource::Remote(slow)).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = loader
            .load(&LyricSource::Inline("[00:02.00]new song".into()))
            .await
            .unwrap();
        assert_eq!(second.track.lines()[0].text, "new song");

        assert!(first.await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_request_last_wins() {
        let slow = test_server::spawn(200, "[00:01.00]old song", Duration::from_millis(200)).await;
        let loader = LyricLoader::default();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let first = loader.request(LyricSource::Remote(slow), tx.clone());
        let second = loader.request(LyricSource::Inline("[00:02.00]new song".into()), tx);
        assert!(second > first);

        match rx.recv().await {
            Some(PlayerEvent::LyricsLoaded {
                generation,
                outcome,
            }) => {
                assert_eq!(generation, second);
                assert_eq!(outcome.track.lines()[0].text, "new song");
            }
            other => panic!("unexpected event: {:?}", other),
        }

        // The first request was aborted, nothing else arrives
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());
    }
}
