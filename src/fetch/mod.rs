use crate::error::FetchFailed;
use crate::lyrics::{self, LyricTrack};
use std::time::Duration;

const USER_AGENT: &str = concat!("lrcplay/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const REMOTE_PREFIXES: &[&str] = &["http://", "https://"];

/// Where a song's lyrics come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricSource {
    Remote(String),
    Inline(String),
    None,
}

impl LyricSource {
    /// URLs with a transport prefix are remote, anything else is LRC text
    pub fn classify(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::None,
            Some(s) if is_remote(s) => Self::Remote(s.to_string()),
            Some(_) => Self::Inline(value.unwrap_or_default().to_string()),
        }
    }
}

pub fn is_remote(value: &str) -> bool {
    let lower = value.trim_start().to_ascii_lowercase();
    REMOTE_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

/// Result of loading lyrics: the track plus the failure, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOutcome {
    pub track: LyricTrack,
    pub failure: Option<FetchFailed>,
}

impl LoadOutcome {
    pub fn loaded(track: LyricTrack) -> Self {
        Self {
            track,
            failure: None,
        }
    }

    pub fn failed(failure: FetchFailed) -> Self {
        Self {
            track: LyricTrack::empty(),
            failure: Some(failure),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

pub struct LyricFetcher {
    client: reqwest::Client,
}

impl LyricFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self { client }
    }

    /// Fetch and parse a remote LRC file.
    ///
    /// Non-success statuses and transport errors produce an empty track
    /// with the failure attached.
    pub async fn load_remote(&self, url: &str) -> LoadOutcome {
        tracing::debug!("Fetching lyrics: {}", url);

        match self.fetch_text(url).await {
            Ok(body) => {
                let track = lyrics::parse(&body);
                tracing::debug!("Fetched {} lyric lines from {}", track.len(), url);
                LoadOutcome::loaded(track)
            }
            Err(failure) => {
                tracing::warn!("Lyric fetch failed for {}: {}", url, failure);
                LoadOutcome::failed(failure)
            }
        }
    }

    /// Resolve any source to a track; inline text never fails
    pub async fn load(&self, source: &LyricSource) -> LoadOutcome {
        match source {
            LyricSource::Remote(url) => self.load_remote(url).await,
            LyricSource::Inline(text) => LoadOutcome::loaded(lyrics::parse(text)),
            LyricSource::None => LoadOutcome::default(),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchFailed> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailed::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

impl Default for LyricFetcher {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Duration;

    #[test]
    fn test_classify_source() {
        assert_eq!(LyricSource::classify(None), LyricSource::None);
        assert_eq!(LyricSource::classify(Some("  ")), LyricSource::None);
        assert_eq!(
            LyricSource::classify(Some("https://example.com/a.lrc")),
            LyricSource::Remote("https://example.com/a.lrc".into())
        );
        assert_eq!(
            LyricSource::classify(Some("HTTP://example.com/a.lrc")),
            LyricSource::Remote("HTTP://example.com/a.lrc".into())
        );
        assert_eq!(
            LyricSource::classify(Some("[00:01.00]hi")),
            LyricSource::Inline("[00:01.00]hi".into())
        );
    }

    #[tokio::test]
    async fn test_load_remote_success() {
        let url = test_server::spawn(200, "[00:01.00]one\n[00:02.00]two", Duration::ZERO).await;
        let outcome = LyricFetcher::new().load_remote(&url).await;
        assert!(!outcome.is_failed());
        assert_eq!(outcome.track.len(), 2);
    }

    #[tokio::test]
    async fn test_load_remote_bad_status() {
        let url = test_server::spawn(404, "missing", Duration::ZERO).await;
        let outcome = LyricFetcher::new().load_remote(&url).await;
        assert_eq!(outcome.failure, Some(FetchFailed::Status(404)));
        assert!(outcome.track.is_empty());
    }

    #[tokio::test]
    async fn test_load_remote_transport_failure() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = LyricFetcher::new()
            .load_remote(&format!("http://{}/x.lrc", addr))
            .await;
        assert!(matches!(outcome.failure, Some(FetchFailed::Transport(_))));
        assert!(outcome.track.is_empty());
    }

    #[tokio::test]
    async fn test_load_inline_and_none() {
        let fetcher = LyricFetcher::new();
        let inline = fetcher
            .load(&LyricSource::Inline("[00:03.00]x".into()))
            .await;
        assert_eq!(inline.track.len(), 1);

        let none = fetcher.load(&LyricSource::None).await;
        assert!(none.track.is_empty());
        assert!(!none.is_failed());
    }
}
