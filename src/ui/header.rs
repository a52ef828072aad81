//! Header: logo, section tabs and search box

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, InputMode};
use crate::routes::Section;
use crate::ui::Theme;

pub const HEADER_HEIGHT: u16 = 3;

pub fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Logo
            Constraint::Length(22), // Tabs
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let logo = Paragraph::new(Span::styled("MARQUEE", Theme::title()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border()),
        );
    frame.render_widget(logo, chunks[0]);

    let section = &app.route().section;
    let tabs = Paragraph::new(Line::from(vec![
        Span::styled(Section::Home.label(), Theme::tab(*section == Section::Home)),
        Span::raw("  "),
        Span::styled(Section::TvShows.label(), Theme::tab(*section == Section::TvShows)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::TOP | Borders::BOTTOM).border_style(Theme::border()));
    frame.render_widget(tabs, chunks[1]);

    render_search_box(frame, chunks[2], app);
}

fn render_search_box(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Editing;
    let border_style = if editing {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let line = if editing {
        let (before, after) = app.search.split_at_cursor();
        Line::from(vec![
            Span::raw("⌕ "),
            Span::raw(before.to_string()),
            Span::styled("│", Theme::input_cursor()),
            Span::raw(after.to_string()),
        ])
    } else if app.search.query.is_empty() {
        Line::from(Span::styled("⌕ Press / to search...", Theme::dimmed()))
    } else {
        Line::from(format!("⌕ {}", app.search.query))
    };

    let search_box = Paragraph::new(line).style(Theme::input()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(" SEARCH ", Theme::title())),
    );
    frame.render_widget(search_box, area);
}
