use super::format::{clamp_fraction, percentage, second_to_time};
use crate::messages::PlayerEvent;
use crate::playlist::Audio;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    None,
    #[default]
    All,
    One,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayOrder {
    #[default]
    List,
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub loop_mode: LoopMode,
    pub order: PlayOrder,
    pub volume: f64,
    pub muted: bool,
    pub show_list: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            loop_mode: LoopMode::All,
            order: PlayOrder::List,
            volume: 0.7,
            muted: false,
            show_list: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeView {
    pub ptime: String,
    pub duration: String,
    pub play_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferView {
    pub buffer_percentage: f64,
    pub buf_time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeView {
    pub volume_percentage: f64,
    pub muted: bool,
}

/// Playlist and playback state with derived views.
///
/// Views are recomputed from the raw fields on every call. Changes to the
/// current song or the song list are pushed to subscribers; the initial
/// state is not.
pub struct PlayerStore {
    songs: Vec<Audio>,
    playing_index: usize,
    current_time: f64,
    duration: f64,
    buffered: f64,
    control: ControlState,
    subscribers: Vec<mpsc::UnboundedSender<PlayerEvent>>,
}

impl PlayerStore {
    pub fn new(songs: Vec<Audio>, control: ControlState) -> Self {
        Self {
            songs,
            playing_index: 0,
            current_time: 0.0,
            duration: f64::NAN,
            buffered: 0.0,
            control,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PlayerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: PlayerEvent) {
        // Closed receivers drop out here
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn songs(&self) -> &[Audio] {
        &self.songs
    }

    pub fn playing_index(&self) -> usize {
        self.playing_index
    }

    pub fn current_song(&self) -> Option<&Audio> {
        self.songs.get(self.playing_index)
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    /// Replace the whole list, keeping the playing index when it still fits
    pub fn set_playlist(&mut self, songs: Vec<Audio>) {
        let before = self.current_song().cloned();
        self.songs = songs;
        if self.playing_index >= self.songs.len() {
            self.playing_index = 0;
        }
        self.notify(PlayerEvent::ListChange(self.songs.clone()));
        self.notify_if_switched(before);
    }

    pub fn add_song(&mut self, song: Audio) {
        let before = self.current_song().cloned();
        self.songs.push(song);
        self.notify(PlayerEvent::ListChange(self.songs.clone()));
        self.notify_if_switched(before);
    }

    pub fn remove_song(&mut self, index: usize) -> Option<Audio> {
        if index >= self.songs.len() {
            return None;
        }
        let before = self.current_song().cloned();
        let removed = self.songs.remove(index);
        if index < self.playing_index {
            self.playing_index -= 1;
        } else if self.playing_index >= self.songs.len() {
            self.playing_index = 0;
        }
        self.notify(PlayerEvent::ListChange(self.songs.clone()));
        self.notify_if_switched(before);
        Some(removed)
    }

    /// Make `index` the current song. Returns false when out of range or
    /// already current.
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index >= self.songs.len() || index == self.playing_index {
            return false;
        }
        self.playing_index = index;
        self.current_time = 0.0;
        self.duration = f64::NAN;
        self.buffered = 0.0;
        if let Some(song) = self.current_song().cloned() {
            tracing::info!("Switched to {}", song.display_name());
            self.notify(PlayerEvent::ListSwitch(song));
        }
        true
    }

    fn notify_if_switched(&mut self, before: Option<Audio>) {
        let after = self.current_song().cloned();
        if after != before {
            self.current_time = 0.0;
            self.duration = f64::NAN;
            self.buffered = 0.0;
            if let Some(song) = after {
                self.notify(PlayerEvent::ListSwitch(song));
            }
        }
    }

    /// The song a "next" button should go to
    pub fn next_index(&self) -> Option<usize> {
        let len = self.songs.len();
        match (len, self.control.order) {
            (0, _) => None,
            (1, _) => Some(0),
            (_, PlayOrder::List) => Some((self.playing_index + 1) % len),
            (_, PlayOrder::Random) => Some(self.random_other()),
        }
    }

    pub fn prev_index(&self) -> Option<usize> {
        let len = self.songs.len();
        match (len, self.control.order) {
            (0, _) => None,
            (1, _) => Some(0),
            (_, PlayOrder::List) => Some((self.playing_index + len - 1) % len),
            (_, PlayOrder::Random) => Some(self.random_other()),
        }
    }

    /// The song to continue with once the current one ends, or `None` to stop
    pub fn index_after_end(&self) -> Option<usize> {
        if self.songs.is_empty() {
            return None;
        }
        match self.control.loop_mode {
            LoopMode::One => Some(self.playing_index),
            LoopMode::All => self.next_index(),
            LoopMode::None => match self.control.order {
                PlayOrder::List if self.playing_index + 1 < self.songs.len() => {
                    Some(self.playing_index + 1)
                }
                _ => None,
            },
        }
    }

    fn random_other(&self) -> usize {
        let len = self.songs.len();
        let offset = rand::thread_rng().gen_range(1..len);
        (self.playing_index + offset) % len
    }

    pub fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = seconds;
    }

    pub fn set_buffered(&mut self, seconds: f64) {
        self.buffered = seconds;
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.control.volume = clamp_fraction(volume);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.control.muted = muted;
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.control.muted = !self.control.muted;
        self.control.muted
    }

    pub fn cycle_loop(&mut self) -> LoopMode {
        self.control.loop_mode = match self.control.loop_mode {
            LoopMode::All => LoopMode::One,
            LoopMode::One => LoopMode::None,
            LoopMode::None => LoopMode::All,
        };
        self.control.loop_mode
    }

    pub fn toggle_order(&mut self) -> PlayOrder {
        self.control.order = match self.control.order {
            PlayOrder::List => PlayOrder::Random,
            PlayOrder::Random => PlayOrder::List,
        };
        self.control.order
    }

    pub fn toggle_list(&mut self) -> bool {
        self.control.show_list = !self.control.show_list;
        self.control.show_list
    }

    pub fn time_view(&self) -> TimeView {
        TimeView {
            ptime: second_to_time(self.current_time),
            duration: second_to_time(self.duration),
            play_percentage: percentage(self.current_time, self.duration),
        }
    }

    pub fn buffer_view(&self) -> BufferView {
        BufferView {
            buffer_percentage: percentage(self.buffered, self.duration),
            buf_time: self.buffered,
        }
    }

    pub fn volume_view(&self) -> VolumeView {
        VolumeView {
            volume_percentage: clamp_fraction(self.control.volume) * 100.0,
            muted: self.control.muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(name: &str) -> Audio {
        Audio {
            name: name.to_string(),
            artist: "Artist".to_string(),
            url: format!("{}.mp3", name),
            ..Default::default()
        }
    }

    fn store(names: &[&str]) -> PlayerStore {
        PlayerStore::new(names.iter().map(|n| song(n)).collect(), ControlState::default())
    }

    #[test]
    fn test_no_event_for_initial_state() {
        let mut store = store(&["a", "b"]);
        let mut rx = store.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_switch_notifies_subscribers() {
        let mut store = store(&["a", "b"]);
        let mut rx = store.subscribe();
        store.set_current_time(42.0);

        assert!(store.switch_to(1));
        assert!(!store.switch_to(1));
        assert!(!store.switch_to(9));

        match rx.try_recv() {
            Ok(PlayerEvent::ListSwitch(s)) => assert_eq!(s.name, "b"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(store.current_time(), 0.0);
    }

    #[test]
    fn test_list_change_and_removal_of_current_song() {
        let mut store = store(&["a", "b", "c"]);
        store.switch_to(2);
        let mut rx = store.subscribe();

        assert_eq!(store.remove_song(2).unwrap().name, "c");
        assert!(matches!(rx.try_recv(), Ok(PlayerEvent::ListChange(list)) if list.len() == 2));
        assert!(matches!(rx.try_recv(), Ok(PlayerEvent::ListSwitch(s)) if s.name == "a"));
        assert_eq!(store.playing_index(), 0);
    }

    #[test]
    fn test_removing_earlier_song_keeps_current() {
        let mut store = store(&["a", "b", "c"]);
        store.switch_to(2);
        let mut rx = store.subscribe();

        store.remove_song(0);
        assert_eq!(store.current_song().unwrap().name, "c");
        assert!(matches!(rx.try_recv(), Ok(PlayerEvent::ListChange(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_add_song_to_empty_store_switches() {
        let mut store = store(&[]);
        let mut rx = store.subscribe();
        store.add_song(song("first"));
        assert!(matches!(rx.try_recv(), Ok(PlayerEvent::ListChange(_))));
        assert!(matches!(rx.try_recv(), Ok(PlayerEvent::ListSwitch(s)) if s.name == "first"));
    }

    #[test]
    fn test_next_and_prev_in_list_order() {
        let mut store = store(&["a", "b", "c"]);
        assert_eq!(store.next_index(), Some(1));
        assert_eq!(store.prev_index(), Some(2));
        store.switch_to(2);
        assert_eq!(store.next_index(), Some(0));
    }

    #[test]
    fn test_random_order_never_repeats_current() {
        let mut store = store(&["a", "b", "c"]);
        store.toggle_order();
        for _ in 0..50 {
            let next = store.next_index().unwrap();
            assert_ne!(next, store.playing_index());
            assert!(next < 3);
        }
    }

    #[test]
    fn test_index_after_end_follows_loop_mode() {
        let mut store = store(&["a", "b"]);
        store.switch_to(1);

        assert_eq!(store.control().loop_mode, LoopMode::All);
        assert_eq!(store.index_after_end(), Some(0));

        assert_eq!(store.cycle_loop(), LoopMode::One);
        assert_eq!(store.index_after_end(), Some(1));

        assert_eq!(store.cycle_loop(), LoopMode::None);
        assert_eq!(store.index_after_end(), None);
        store.switch_to(0);
        assert_eq!(store.index_after_end(), Some(1));
    }

    #[test]
    fn test_time_view() {
        let mut store = store(&["a"]);
        let view = store.time_view();
        assert_eq!(view.ptime, "00:00");
        assert_eq!(view.duration, "00:00");
        assert_eq!(view.play_percentage, 0.0);

        store.set_duration(200.0);
        store.set_current_time(50.0);
        store.set_buffered(100.0);
        let view = store.time_view();
        assert_eq!(view.ptime, "00:50");
        assert_eq!(view.duration, "03:20");
        assert_eq!(view.play_percentage, 25.0);
        assert_eq!(store.buffer_view().buffer_percentage, 50.0);
    }

    #[test]
    fn test_volume_view() {
        let mut store = store(&["a"]);
        store.set_volume(1.4);
        assert_eq!(store.volume_view().volume_percentage, 100.0);
        assert!(store.toggle_mute());
        assert!(store.volume_view().muted);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut store = store(&["a", "b"]);
        let rx = store.subscribe();
        drop(rx);
        store.switch_to(1);
        assert!(store.subscribers.is_empty());
    }
}
