use super::media::MediaElement;

struct Entry {
    id: String,
    media: Box<dyn MediaElement>,
}

/// Owns every active player so starting one can silence the others
#[derive(Default)]
pub struct PlayerRegistry {
    entries: Vec<Entry>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. An existing player with the same id is replaced.
    pub fn register(&mut self, id: impl Into<String>, media: Box<dyn MediaElement>) {
        let id = id.into();
        if let Some(mut old) = self.take(&id) {
            old.pause();
            tracing::debug!("Replacing registered player {}", id);
        }
        tracing::debug!("Registered player {}", id);
        self.entries.push(Entry { id, media });
    }

    /// Remove a player, pausing it first if it is playing
    pub fn unregister(&mut self, id: &str) -> Option<Box<dyn MediaElement>> {
        let mut media = self.take(id)?;
        if !media.is_paused() {
            media.pause();
        }
        tracing::debug!("Unregistered player {}", id);
        Some(media)
    }

    pub fn stop_all(&mut self) {
        for entry in &mut self.entries {
            entry.media.pause();
        }
    }

    /// Start `id` and pause everything else
    pub fn play_exclusive(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        for entry in &mut self.entries {
            if entry.id == id {
                entry.media.play();
            } else if !entry.media.is_paused() {
                entry.media.pause();
            }
        }
        true
    }

    pub fn get(&self, id: &str) -> Option<&(dyn MediaElement + 'static)> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.media.as_ref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn MediaElement + 'static)> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| e.media.as_mut())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn take(&mut self, id: &str) -> Option<Box<dyn MediaElement>> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx).media)
    }
}
