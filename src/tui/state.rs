use crate::fetch::{LoadOutcome, LyricSource};
use crate::lyrics::LyricTrack;
use crate::messages::{MediaEvent, PlayerEvent};
use crate::player::drag::{seek_target, BarGeometry, DragController};
use crate::player::{MediaElement, PlayerRegistry, PlayerStore};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::collections::VecDeque;
use tokio::time::Instant;

const MAX_LOG_LINES: usize = 100;
const SEEK_STEP_SECS: f64 = 5.0;
const VOLUME_STEP: f64 = 0.05;

pub const MAIN_PLAYER: &str = "main";

#[derive(Debug, Clone, PartialEq)]
pub enum LyricStatus {
    Loading,
    Ready,
    Missing,
    Failed(String),
}

pub struct AppState {
    pub store: PlayerStore,
    pub players: PlayerRegistry,
    pub lyrics: LyricTrack,
    pub lyric_status: LyricStatus,
    pub awaited_generation: Option<u64>,
    pub logs: VecDeque<String>,
    pub last_media_event: Option<MediaEvent>,
    pub should_quit: bool,
    progress_drag: DragController,
    volume_drag: DragController,
    progress_bar: Rect,
    volume_bar: Rect,
}

/// Side effects the update step asks the app loop to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadLyrics(LyricSource),
}

impl AppState {
    pub fn new(store: PlayerStore, media: Box<dyn MediaElement>) -> Self {
        let mut players = PlayerRegistry::new();
        players.register(MAIN_PLAYER, media);

        let mut state = Self {
            store,
            players,
            lyrics: LyricTrack::empty(),
            lyric_status: LyricStatus::Missing,
            awaited_generation: None,
            logs: VecDeque::new(),
            last_media_event: None,
            should_quit: false,
            progress_drag: DragController::horizontal(BarGeometry::new(0.0, 0.0)),
            volume_drag: DragController::vertical(BarGeometry::new(0.0, 0.0)),
            progress_bar: Rect::default(),
            volume_bar: Rect::default(),
        };
        state.apply_control();
        state
    }

    /// Load the current song into the player; the store emits no event
    /// for its initial state
    pub fn start(&mut self) -> Option<Command> {
        let song = self.store.current_song().cloned()?;
        if let Some(media) = self.media_mut() {
            media.load(&song.url);
            media.play();
        }
        self.sync_from_media();
        self.add_log(format!("Now playing: {}", song.display_name()));
        Some(Command::LoadLyrics(song.lyric_source()))
    }

    /// Update state based on player events (Elm Architecture - Update)
    pub fn update(&mut self, event: PlayerEvent) -> Option<Command> {
        match event {
            PlayerEvent::ListSwitch(song) => {
                self.lyrics = LyricTrack::empty();
                self.awaited_generation = None;
                if let Some(media) = self.media_mut() {
                    media.load(&song.url);
                    media.play();
                }
                self.sync_from_media();
                self.add_log(format!("Now playing: {}", song.display_name()));
                Some(Command::LoadLyrics(song.lyric_source()))
            }
            PlayerEvent::ListChange(list) => {
                self.add_log(format!("Playlist changed: {} songs", list.len()));
                None
            }
            PlayerEvent::LyricsLoaded {
                generation,
                outcome,
            } => {
                self.accept_lyrics(generation, outcome);
                None
            }
        }
    }

    /// Record the generation of the lyric request issued for the current song
    pub fn awaiting_lyrics(&mut self, generation: u64, source: &LyricSource) {
        self.awaited_generation = Some(generation);
        self.lyric_status = match source {
            LyricSource::None => LyricStatus::Missing,
            _ => LyricStatus::Loading,
        };
    }

    fn accept_lyrics(&mut self, generation: u64, outcome: LoadOutcome) {
        if self.awaited_generation != Some(generation) {
            tracing::debug!("Ignoring lyrics from request {}", generation);
            return;
        }

        self.awaited_generation = None;
        self.lyric_status = match &outcome.failure {
            Some(failure) => {
                self.add_log(format!("[!] Lyrics unavailable: {}", failure));
                LyricStatus::Failed(failure.to_string())
            }
            None if outcome.track.is_empty() => LyricStatus::Missing,
            None => LyricStatus::Ready,
        };
        self.lyrics = outcome.track;
    }

    /// Advance the playback clock and follow the end of a song
    pub fn tick(&mut self, now: Instant) {
        let event = self.media_mut().and_then(|media| media.poll(now));
        self.sync_from_media();

        if let Some(MediaEvent::Ended) = event {
            self.record_media_event(MediaEvent::Ended);
            match self.store.index_after_end() {
                Some(index) if index == self.store.playing_index() => {
                    if let Some(media) = self.media_mut() {
                        media.set_current_time(0.0);
                        media.play();
                    }
                    self.sync_from_media();
                }
                Some(index) => {
                    self.store.switch_to(index);
                }
                None => self.add_log("Reached the end of the playlist".to_string()),
            }
        } else if let Some(event) = event {
            self.last_media_event = Some(event);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                self.players.stop_all();
            }
            KeyCode::Char(' ') => self.toggle_play(),
            KeyCode::Left => self.seek_by(-SEEK_STEP_SECS),
            KeyCode::Right => self.seek_by(SEEK_STEP_SECS),
            KeyCode::Up => self.set_volume(self.store.control().volume + VOLUME_STEP),
            KeyCode::Down => self.set_volume(self.store.control().volume - VOLUME_STEP),
            KeyCode::Char('m') => {
                self.store.toggle_mute();
                self.apply_control();
            }
            KeyCode::Char('n') => {
                if let Some(index) = self.store.next_index() {
                    self.store.switch_to(index);
                }
            }
            KeyCode::Char('p') => {
                if let Some(index) = self.store.prev_index() {
                    self.store.switch_to(index);
                }
            }
            KeyCode::Char('l') => {
                let mode = self.store.cycle_loop();
                self.add_log(format!("Loop: {:?}", mode));
            }
            KeyCode::Char('o') => {
                let order = self.store.toggle_order();
                self.add_log(format!("Order: {:?}", order));
            }
            KeyCode::Char('t') => {
                self.store.toggle_list();
            }
            _ => {}
        }
    }

    /// Where the bars were drawn, so pointer positions can be mapped
    pub fn set_bar_areas(&mut self, progress_bar: Rect, volume_bar: Rect) {
        self.progress_bar = progress_bar;
        self.volume_bar = volume_bar;
        self.progress_drag
            .set_geometry(BarGeometry::from_cells(progress_bar.x, progress_bar.width));
        self.volume_drag
            .set_geometry(BarGeometry::from_cells(volume_bar.y, volume_bar.height));
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let (col, row) = (event.column as f64, event.row as f64);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if rect_contains(self.progress_bar, event.column, event.row) {
                    self.progress_drag.start();
                    let fraction = self.progress_drag.move_to(col);
                    self.apply_progress(fraction);
                } else if rect_contains(self.volume_bar, event.column, event.row) {
                    self.volume_drag.start();
                    let fraction = self.volume_drag.move_to(row);
                    self.apply_volume(fraction);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let fraction = self.progress_drag.move_to(col);
                self.apply_progress(fraction);
                let fraction = self.volume_drag.move_to(row);
                self.apply_volume(fraction);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let fraction = self.progress_drag.end(col);
                self.apply_progress(fraction);
                let fraction = self.volume_drag.end(row);
                self.apply_volume(fraction);
            }
            _ => {}
        }
    }

    fn apply_progress(&mut self, fraction: Option<f64>) {
        if let Some(fraction) = fraction {
            let target = seek_target(self.store.duration(), fraction);
            self.seek_to(target);
        }
    }

    fn apply_volume(&mut self, fraction: Option<f64>) {
        if let Some(fraction) = fraction {
            self.set_volume(fraction);
        }
    }

    fn toggle_play(&mut self) {
        let event = match self.media_mut() {
            Some(media) if media.is_paused() => {
                media.play();
                MediaEvent::Play
            }
            Some(media) => {
                media.pause();
                MediaEvent::Pause
            }
            None => return,
        };
        self.record_media_event(event);
    }

    fn seek_by(&mut self, delta: f64) {
        self.seek_to(self.store.current_time() + delta);
    }

    fn seek_to(&mut self, seconds: f64) {
        if let Some(media) = self.media_mut() {
            media.set_current_time(seconds);
        }
        self.sync_from_media();
        self.record_media_event(MediaEvent::Seeked);
    }

    fn set_volume(&mut self, volume: f64) {
        self.store.set_volume(volume);
        self.apply_control();
        self.record_media_event(MediaEvent::VolumeChange);
    }

    fn apply_control(&mut self) {
        let control = self.store.control().clone();
        if let Some(media) = self.media_mut() {
            media.set_volume(control.volume);
            media.set_muted(control.muted);
        }
    }

    fn sync_from_media(&mut self) {
        let (time, duration) = match self.players.get(MAIN_PLAYER) {
            Some(media) => (media.current_time(), media.duration()),
            None => return,
        };
        self.store.set_current_time(time);
        self.store.set_duration(duration);
        // The simulated source is local, so all of it counts as buffered
        self.store.set_buffered(duration);
    }

    fn media_mut(&mut self) -> Option<&mut (dyn MediaElement + 'static)> {
        self.players.get_mut(MAIN_PLAYER)
    }

    pub fn is_playing(&self) -> bool {
        self.players
            .get(MAIN_PLAYER)
            .is_some_and(|media| !media.is_paused())
    }

    pub fn active_lyric(&self) -> Option<usize> {
        self.lyrics.active_index(self.store.current_time())
    }

    fn record_media_event(&mut self, event: MediaEvent) {
        tracing::trace!("Media event: {}", event.name());
        self.last_media_event = Some(event);
    }

    fn add_log(&mut self, msg: String) {
        tracing::info!("{}", msg);
        if self.logs.len() >= MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back(msg);
    }
}

fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    rect.contains(Position::new(col, row))
}
