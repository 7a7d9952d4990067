use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error at {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid playlist {path}: {source}")]
    Playlist {
        source: serde_json::Error,
        path: PathBuf,
    },

    #[error("Playlist {0} contains no songs")]
    EmptyPlaylist(PathBuf),
}

/// Why a remote lyric fetch produced no lyrics
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailed {
    #[error("server answered with status {0}")]
    Status(u16),

    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchFailed {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(e.to_string()),
        }
    }
}
