use crate::player::{LoopMode, PlayOrder};
use crate::tui::{
    state::{AppState, LyricStatus},
    widgets::{SeekBar, VolumeBar},
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const VOLUME_WIDTH: u16 = 5;
const PLAYLIST_WIDTH: u16 = 32;

pub struct AppLayout {
    pub header: Rect,
    pub lyrics: Rect,
    pub volume: Rect,
    pub playlist: Option<Rect>,
    pub progress: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// Inner rows of the progress block
    pub fn progress_bar(&self) -> Rect {
        let inner = Block::default().borders(Borders::ALL).inner(self.progress);
        Rect { height: inner.height.min(1), ..inner }
    }

    /// Inner column of the volume block, minus the label row
    pub fn volume_bar(&self) -> Rect {
        let inner = Block::default().borders(Borders::ALL).inner(self.volume);
        Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        }
    }
}

pub fn layout(area: Rect, show_list: bool) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Lyrics, volume, playlist
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let mut columns = vec![Constraint::Min(10), Constraint::Length(VOLUME_WIDTH)];
    if show_list {
        columns.push(Constraint::Length(PLAYLIST_WIDTH));
    }
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(columns)
        .split(rows[1]);

    AppLayout {
        header: rows[0],
        lyrics: body[0],
        volume: body[1],
        playlist: show_list.then(|| body[2]),
        progress: rows[2],
        footer: rows[3],
    }
}

/// Render the TUI (Elm Architecture - View)
pub fn render(frame: &mut Frame, state: &AppState) {
    // Clear the frame to prevent ghost characters
    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Reset)),
        frame.area(),
    );

    let areas = layout(frame.area(), state.store.control().show_list);

    render_header(frame, areas.header, state);
    render_lyrics(frame, areas.lyrics, state);
    render_volume(frame, &areas, state);
    if let Some(area) = areas.playlist {
        render_playlist(frame, area, state);
    }
    render_progress(frame, &areas, state);
    render_footer(frame, areas.footer, state);
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = state
        .store
        .current_song()
        .map(|song| song.display_name())
        .unwrap_or_else(|| "No song".to_string());

    let status = if state.is_playing() { "▶" } else { "⏸" };
    let loop_label = match state.store.control().loop_mode {
        LoopMode::None => "loop: off",
        LoopMode::All => "loop: all",
        LoopMode::One => "loop: one",
    };
    let order_label = match state.store.control().order {
        PlayOrder::List => "order: list",
        PlayOrder::Random => "order: random",
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} {}", status, title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  [{} | {}]", loop_label, order_label)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("lrcplay"));

    frame.render_widget(header, area);
}

fn render_lyrics(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Lyrics");
    let inner = block.inner(area);

    let placeholder = match &state.lyric_status {
        LyricStatus::Loading => Some("Loading lyrics...".to_string()),
        LyricStatus::Missing => Some("No lyrics".to_string()),
        LyricStatus::Failed(e) => Some(format!("Lyrics unavailable: {}", e)),
        LyricStatus::Ready => None,
    };

    if let Some(text) = placeholder {
        let widget = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let active = state.active_lyric();
    let visible = inner.height as usize;
    // Keep the active line roughly in the middle
    let anchor = active.unwrap_or(0);
    let start = anchor
        .saturating_sub(visible / 2)
        .min(state.lyrics.len().saturating_sub(visible));

    let lines: Vec<Line> = state
        .lyrics
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(idx, line)| {
            let style = if Some(idx) == active {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::styled(line.text.clone(), style)
        })
        .collect();

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(widget, area);
}

fn render_volume(frame: &mut Frame, areas: &AppLayout, state: &AppState) {
    let view = state.store.volume_view();
    let block = Block::default().borders(Borders::ALL).title("Vol");
    frame.render_widget(block, areas.volume);

    VolumeBar::new(view.volume_percentage, view.muted).render(frame, areas.volume_bar());

    let bar = areas.volume_bar();
    let label_area = Rect {
        y: bar.y + bar.height,
        height: 1,
        ..bar
    };
    let label = if view.muted {
        "M".to_string()
    } else {
        format!("{:.0}", view.volume_percentage)
    };
    frame.render_widget(
        Paragraph::new(label).alignment(Alignment::Center),
        label_area,
    );
}

fn render_playlist(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Playlist");
    let max_width = block.inner(area).width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = state
        .store
        .songs()
        .iter()
        .enumerate()
        .map(|(idx, song)| {
            let name: String = song.display_name().chars().take(max_width).collect();
            if idx == state.store.playing_index() {
                ListItem::new(format!("▶ {}", name)).style(
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ListItem::new(format!("  {}", name))
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_progress(frame: &mut Frame, areas: &AppLayout, state: &AppState) {
    let time = state.store.time_view();
    let buffer = state.store.buffer_view();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} / {}", time.ptime, time.duration));
    frame.render_widget(block, areas.progress);

    SeekBar::new(time.play_percentage, buffer.buffer_percentage)
        .render(frame, areas.progress_bar());
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };

    let mut spans = vec![
        key("q"),
        Span::raw(" Quit | "),
        key("space"),
        Span::raw(if state.is_playing() { " Pause | " } else { " Play | " }),
        key("←/→"),
        Span::raw(" Seek | "),
        key("↑/↓"),
        Span::raw(" Volume | "),
        key("m"),
        Span::raw(" Mute | "),
        key("n/p"),
        Span::raw(" Next/Prev | "),
        key("l/o/t"),
        Span::raw(" Loop/Order/List"),
    ];

    if let Some(event) = state.last_media_event {
        spans.push(Span::styled(
            format!("  ({})", event.name()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
