pub mod state;
pub mod ui;
pub mod widgets;

use crate::loader::LyricLoader;
use crate::messages::PlayerEvent;
use crate::player::{MediaElement, PlayerStore};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use state::{AppState, Command};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct App {
    state: AppState,
    loader: LyricLoader,
    store_rx: mpsc::UnboundedReceiver<PlayerEvent>,
    lyric_tx: mpsc::UnboundedSender<PlayerEvent>,
    lyric_rx: mpsc::UnboundedReceiver<PlayerEvent>,
}

impl App {
    pub fn new(mut store: PlayerStore, media: Box<dyn MediaElement>, loader: LyricLoader) -> Self {
        let store_rx = store.subscribe();
        let (lyric_tx, lyric_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(store, media),
            loader,
            store_rx,
            lyric_tx,
            lyric_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        if let Some(command) = self.state.start() {
            self.execute(command);
        }

        loop {
            // Render UI
            terminal.draw(|f| ui::render(f, &self.state))?;

            let size = terminal.size()?;
            let areas = ui::layout(
                Rect::new(0, 0, size.width, size.height),
                self.state.store.control().show_list,
            );
            self.state
                .set_bar_areas(areas.progress_bar(), areas.volume_bar());

            // Handle events (non-blocking)
            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.state.handle_key(key.code);
                    }
                    Event::Mouse(mouse) => self.state.handle_mouse(mouse),
                    _ => {}
                }
            }

            if self.state.should_quit {
                break;
            }

            self.state.tick(Instant::now());

            // Process store and loader events (non-blocking)
            while let Ok(event) = self.store_rx.try_recv() {
                self.dispatch(event);
            }
            while let Ok(event) = self.lyric_rx.try_recv() {
                self.dispatch(event);
            }

            tokio::time::sleep(FRAME_INTERVAL).await;
        }

        Ok(())
    }

    fn dispatch(&mut self, event: PlayerEvent) {
        if let Some(command) = self.state.update(event) {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::LoadLyrics(source) => {
                let generation = self.loader.request(source.clone(), self.lyric_tx.clone());
                self.state.awaiting_lyrics(generation, &source);
            }
        }
    }
}
