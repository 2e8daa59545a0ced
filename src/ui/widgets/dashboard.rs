use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::{
    control::state::{Phase, Status},
    ui::{app::App, widgets::volume::VolumeWidget},
    util::colors,
};

const HELP: &str = "e enable · m mode · [ ] threshold · j k full speed · - + default · , . min · < > max · q quit";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        buf.set_style(area, Style::new().bg(colors::BACKGROUND));
        let snapshot = self.handle.snapshot();
        let status = snapshot.status();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        let status_color = match status {
            Status::Disabled => colors::DISABLED,
            Status::ActiveDynamic => colors::ACTIVE,
            Status::ActiveNormal => colors::ACCENT,
        };
        let playback = match snapshot.state.phase() {
            Phase::Idle => "idle",
            Phase::Playing => "playing",
            Phase::PausedByEngine => "paused (stopped)",
        };
        let sensor = match (self.view.source_ended, self.view.sensor) {
            (true, _) => "ended".to_string(),
            (false, Some(status)) => status.to_string(),
            (false, None) => "waiting".to_string(),
        };

        let header = vec![
            Line::from(format!("{:.1} km/h", self.view.speed_kmh)).bold(),
            Line::from(status.to_string()).fg(status_color),
            Line::from(format!("music {playback} · sensor {sensor}")),
        ];
        Paragraph::new(header)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title_top(" velovolume ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED),
            )
            .render(chunks[0], buf);

        VolumeWidget::new(
            snapshot.last_volume_percent,
            snapshot.state.phase() == Phase::PausedByEngine,
        )
        .render(chunks[1], buf);

        let mut settings = vec![
            Line::from(format!("pause below      {:.1} km/h", snapshot.pause_threshold())),
            Line::from(format!(
                "full volume at   {:.1} km/h",
                snapshot.speed_for_max_volume()
            )),
            Line::from(format!(
                "volume range     {}% – {}%",
                snapshot.min_volume(),
                snapshot.max_volume()
            )),
            Line::from(format!("default volume   {}%", snapshot.default_volume())),
        ];
        if snapshot.min_volume() > snapshot.max_volume() {
            settings.push(
                Line::from("range is inverted: volume falls as speed rises").fg(colors::PAUSED),
            );
        }
        if let Some(error) = &self.view.last_error {
            settings.push(Line::from(format!("last sink error: {error}")).fg(colors::PAUSED));
        }

        Paragraph::new(settings)
            .block(
                Block::default()
                    .title_top(" Settings ")
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED),
            )
            .render(chunks[2], buf);

        Paragraph::new(HELP)
            .alignment(Alignment::Center)
            .fg(colors::DISABLED)
            .render(chunks[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, SinkKind, SourceKind};
    use std::time::Duration;

    #[tokio::test]
    async fn renders_status_and_speed() {
        let config = AppConfig {
            source: SourceKind::Constant,
            constant_kmh: 15.0,
            sink: SinkKind::Log,
            sample_interval: Duration::from_secs(3600),
            headless: true,
            ..AppConfig::default()
        };
        let mut app = App::new(config).await.unwrap();
        app.handle.flush().await.unwrap();
        app.on_event(crate::event::events::Event::SpeedChanged(15.0));

        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);

        let text: String = buf
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("15.0 km/h"));
        assert!(text.contains("Active – Dynamic Mode"));
        assert!(text.contains("velovolume"));
    }
}
