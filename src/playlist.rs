use crate::error::{Error, Result};
use crate::fetch::LyricSource;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A playlist entry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Audio {
    pub name: String,
    pub artist: String,
    pub url: String,
    #[serde(default)]
    pub cover: String,
    /// Lyric URL or inline LRC text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lrc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Audio {
    pub fn lyric_source(&self) -> LyricSource {
        LyricSource::classify(self.lrc.as_deref())
    }

    pub fn display_name(&self) -> String {
        if self.artist.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.artist, self.name)
        }
    }
}

/// Read a JSON array of songs
pub fn load(path: &Path) -> Result<Vec<Audio>> {
    let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
        source,
        path: path.to_path_buf(),
    })?;

    let songs: Vec<Audio> = serde_json::from_str(&json).map_err(|source| Error::Playlist {
        source,
        path: path.to_path_buf(),
    })?;

    if songs.is_empty() {
        return Err(Error::EmptyPlaylist(path.to_path_buf()));
    }

    tracing::info!("Loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}
