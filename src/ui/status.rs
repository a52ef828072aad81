//! Loading, error and not-found panels, plus the bottom status bar

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::app::{App, InputMode, LoadingState};
use crate::ui::Theme;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Spinner glyph for frame `tick`
pub fn spinner(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

/// Centered loading indicator
pub fn render_loader(frame: &mut Frame, area: Rect, tick: u64, message: Option<&str>) {
    let text = format!("{} {}", spinner(tick), message.unwrap_or("Loading..."));
    let loader = Paragraph::new(text)
        .style(Theme::loading())
        .alignment(Alignment::Center);
    frame.render_widget(loader, centered_line(area));
}

/// Failed fetch, with the refresh hint
pub fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled(format!("✗ {}", message), Theme::error())),
        Line::from(vec![
            Span::styled("r", Theme::keybind()),
            Span::styled(" to retry", Theme::keybind_desc()),
        ]),
    ];
    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, area);
}

/// Unknown route or missing record
pub fn render_not_found(frame: &mut Frame, area: Rect, what: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("404", Theme::title())),
        Line::from(""),
        Line::from(Span::styled(format!("Nothing lives at {}", what), Theme::secondary())),
        Line::from(""),
        Line::from(vec![
            Span::styled("ESC", Theme::keybind()),
            Span::styled(" back   ", Theme::keybind_desc()),
            Span::styled("TAB", Theme::keybind()),
            Span::styled(" browse", Theme::keybind_desc()),
        ]),
    ];
    let body = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(body, inner);
}

/// Settled state with nothing to show
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let empty = Paragraph::new(message)
        .style(Theme::dimmed())
        .alignment(Alignment::Center);
    frame.render_widget(empty, centered_line(area));
}

/// Render a loading state; returns false when the caller should draw content
pub fn render_loading_state(frame: &mut Frame, area: Rect, state: &LoadingState, tick: u64) -> bool {
    match state {
        LoadingState::Idle => false,
        LoadingState::Loading(msg) => {
            render_loader(frame, area, tick, msg.as_deref());
            true
        }
        LoadingState::Error(msg) => {
            render_error(frame, area, msg);
            true
        }
        LoadingState::NotFound => {
            render_empty(frame, area, "Not found");
            true
        }
    }
}

/// Render status bar at bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::SECONDARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let path = Span::styled(format!(" {} ", app.path()), Theme::secondary());

    let help = if app.input_mode == InputMode::Editing {
        " ↵:search  ESC:cancel "
    } else if app.detail.is_some() {
        " ←→:browse  ↑↓:row  ↵:open  ESC:close  q:quit "
    } else {
        " ←→:browse  ↑↓:row  []:page  ↵:open  /:search  TAB:section  r:retry  q:quit "
    };

    let status_line = Line::from(vec![
        mode_indicator,
        path,
        Span::raw("│"),
        Span::styled(help, Theme::keybind_desc()),
    ]);

    let status = Paragraph::new(status_line).style(Theme::status_bar());
    frame.render_widget(status, area);
}

fn centered_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: area.height.min(1),
    }
}
