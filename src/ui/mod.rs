//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first, with mouse drag and click on carousels.
//! `render` draws the whole screen from `App` and records hit areas for the
//! next mouse event.

pub mod banner;
pub mod carousel;
pub mod detail;
pub mod header;
pub mod status;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, Clear},
};

use crate::app::{App, CarouselSlot, HitMap, SectionState};
use crate::routes::Section;
use banner::{render_banner, BANNER_HEIGHT};
use carousel::{render_carousel, CAROUSEL_HEIGHT};
use header::{render_header, HEADER_HEIGHT};

/// Main render function
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Header
            Constraint::Min(1),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    let mut hits = std::mem::take(&mut app.hits);
    hits.clear();

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app, &mut hits);
    if app.detail.is_some() {
        // The modal owns the pointer while open
        hits.clear();
        detail::render_detail(frame, chunks[1], app, &mut hits);
    }
    status::render_status_bar(frame, chunks[2], app);

    app.hits = hits;
}

fn render_content(frame: &mut Frame, area: Rect, app: &mut App, hits: &mut HitMap) {
    let section = app.route().section.clone();
    let tick = app.tick;
    let path = app.path();

    match &section {
        Section::NotFound { .. } => status::render_not_found(frame, area, &path),
        Section::Home | Section::TvShows => {
            let Some(state) = app.section_mut() else {
                return;
            };
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(BANNER_HEIGHT), Constraint::Min(1)])
                .split(area);
            render_banner(frame, chunks[0], state.featured());
            render_rows(frame, chunks[1], state, tick, hits);
        }
        Section::Search { query } => {
            let Some(state) = app.section_mut() else {
                return;
            };
            if state.is_empty() && state.carousels.iter().all(|c| !c.loading.is_error()) {
                status::render_empty(frame, area, &format!("No results for \"{}\"", query));
                return;
            }
            render_rows(frame, area, state, tick, hits);
        }
    }
}

/// First carousel to draw so the focused one stays on screen
pub fn first_visible_row(focused: usize, rows: usize, visible: usize) -> usize {
    let visible = visible.max(1);
    focused
        .saturating_sub(visible - 1)
        .min(rows.saturating_sub(visible))
}

fn render_rows(frame: &mut Frame, area: Rect, state: &mut SectionState, tick: u64, hits: &mut HitMap) {
    let visible = (area.height / CAROUSEL_HEIGHT).max(1) as usize;
    let first = first_visible_row(state.focused, state.carousels.len(), visible);
    let focused = state.focused;

    for (row, (index, carousel)) in state
        .carousels
        .iter_mut()
        .enumerate()
        .skip(first)
        .take(visible)
        .enumerate()
    {
        let y = area.y + row as u16 * CAROUSEL_HEIGHT;
        let height = CAROUSEL_HEIGHT.min(area.bottom().saturating_sub(y));
        if height < 2 {
            break;
        }
        let rect = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        render_carousel(
            frame,
            rect,
            carousel,
            CarouselSlot::Section(index),
            index == focused,
            tick,
            hits,
        );
    }
}
