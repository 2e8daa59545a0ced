use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    symbols::border,
    text::ToSpan,
    widgets::{Block, Borders, Gauge, Widget},
};

use crate::util::colors;

pub struct VolumeWidget {
    volume: Option<u8>,
    paused: bool,
}

impl VolumeWidget {
    pub fn new(volume: Option<u8>, paused: bool) -> Self {
        Self { volume, paused }
    }
}

impl Widget for VolumeWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (ratio, label) = match self.volume {
            Some(volume) => (f64::from(volume) / 100.0, format!("{volume}%")),
            None => (0.0, "n/a".to_string()),
        };
        let fg = if self.paused {
            colors::PAUSED
        } else {
            colors::ACTIVE
        };

        Gauge::default()
            .block(
                Block::default()
                    .title_top(" Target volume ")
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED),
            )
            .gauge_style(Style::new().fg(fg).bg(colors::DISABLED))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label.to_span().bold())
            .render(area, buf);
    }
}
