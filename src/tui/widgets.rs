use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    Frame,
};

/// Horizontal bar showing played and buffered portions
pub struct SeekBar {
    played: f64,
    buffered: f64,
}

impl SeekBar {
    /// Both values are percentages in `[0, 100]`
    pub fn new(played: f64, buffered: f64) -> Self {
        Self { played, buffered }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let bar_width = area.width as usize;
        if bar_width == 0 || area.height == 0 {
            return;
        }

        let played_width = cells(self.played, bar_width);
        let buffered_width = cells(self.buffered, bar_width).saturating_sub(played_width);
        let empty_width = bar_width.saturating_sub(played_width + buffered_width);

        let mut spans = Vec::new();

        if played_width > 0 {
            spans.push(Span::styled(
                "█".repeat(played_width),
                Style::default().fg(Color::Green),
            ));
        }

        if buffered_width > 0 {
            spans.push(Span::styled(
                "▒".repeat(buffered_width),
                Style::default().fg(Color::DarkGray),
            ));
        }

        if empty_width > 0 {
            spans.push(Span::styled(
                "░".repeat(empty_width),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let bar_area = Rect { height: 1, ..area };
        frame.render_widget(Line::from(spans), bar_area);
    }
}

/// Vertical bar filled from the bottom
pub struct VolumeBar {
    percentage: f64,
    muted: bool,
}

impl VolumeBar {
    pub fn new(percentage: f64, muted: bool) -> Self {
        Self { percentage, muted }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let height = area.height as usize;
        if height == 0 || area.width == 0 {
            return;
        }

        let filled = cells(self.percentage, height);
        let color = if self.muted {
            Color::DarkGray
        } else {
            Color::Cyan
        };

        for row in 0..height {
            let is_filled = height - row <= filled;
            let span = if is_filled {
                Span::styled("█".repeat(area.width as usize), Style::default().fg(color))
            } else {
                Span::styled("░".repeat(area.width as usize), Style::default().fg(Color::DarkGray))
            };
            let row_area = Rect {
                y: area.y + row as u16,
                height: 1,
                ..area
            };
            frame.render_widget(Line::from(span), row_area);
        }
    }
}

fn cells(percentage: f64, total: usize) -> usize {
    let filled = (percentage.clamp(0.0, 100.0) / 100.0 * total as f64).round() as usize;
    filled.min(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_rounding() {
        assert_eq!(cells(0.0, 40), 0);
        assert_eq!(cells(50.0, 40), 20);
        assert_eq!(cells(100.0, 40), 40);
        assert_eq!(cells(250.0, 40), 40);
        assert_eq!(cells(f64::NAN, 40), 0);
    }
}
