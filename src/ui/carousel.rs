//! Carousel row renderer
//!
//! Draws one `CarouselState` as a heading with page dots above a strip of
//! cards. The strip width measured here is fed back to the controller, which
//! is how the row learns about terminal resizes.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::app::{CarouselSlot, CarouselState, HitMap};
use crate::models::CatalogItem;
use crate::ui::{status, Theme};

/// Rows taken by one carousel (heading + cards)
pub const CAROUSEL_HEIGHT: u16 = 8;

/// Horizontal span of item `index` on the strip, before the strip offset
pub fn card_span(carousel: &CarouselState, index: usize) -> (f64, f64) {
    let c = &carousel.controller;
    let per_row = c.items_per_row();
    let gap = c.gap();
    let page_width = c.page_width();
    let card_width = ((page_width - gap * (per_row as f64 - 1.0)) / per_row as f64).max(1.0);

    let page = (index / per_row) as f64;
    let slot = (index % per_row) as f64;
    let x = page * (page_width + gap) + slot * (card_width + gap);
    (x, card_width)
}

/// Render a carousel row and record its hit areas
pub fn render_carousel(
    frame: &mut Frame,
    area: Rect,
    carousel: &mut CarouselState,
    slot: CarouselSlot,
    focused: bool,
    tick: u64,
    hits: &mut HitMap,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);
    let (heading, strip) = (chunks[0], chunks[1]);

    carousel.observe_width(f64::from(strip.width));
    render_heading(frame, heading, carousel, focused);
    hits.carousels.push((slot, area));

    if status::render_loading_state(frame, strip, &carousel.loading, tick) {
        return;
    }
    if carousel.items.is_empty() {
        status::render_empty(frame, strip, "No titles");
        return;
    }

    let offset = carousel.strip_offset();
    let page_width = carousel.controller.page_width();
    for (index, item) in carousel.items.iter().enumerate() {
        let (x, width) = card_span(carousel, index);
        let left = x + offset;
        let right = left + width;
        if right <= 0.0 || left >= page_width {
            continue;
        }

        // Clip cards sliding past either edge
        let start = left.max(0.0).round() as u16;
        let end = right.min(page_width).round() as u16;
        if end <= start {
            continue;
        }
        let rect = Rect {
            x: strip.x + start,
            y: strip.y,
            width: end - start,
            height: strip.height,
        };

        let selected = index == carousel.selected;
        render_card(frame, rect, item, selected, focused);
        hits.cards.push((slot, index, rect));
    }
}

fn render_heading(frame: &mut Frame, area: Rect, carousel: &CarouselState, focused: bool) {
    let marker = if focused { "▸ " } else { "  " };
    let mut spans = vec![
        Span::styled(marker, Theme::title()),
        Span::styled(carousel.title.clone(), Theme::row_title(focused)),
    ];

    let pages = carousel.controller.page_count();
    if pages > 1 && !carousel.items.is_empty() {
        spans.push(Span::raw("  "));
        let current = carousel.current_page();
        for page in 0..pages {
            let dot = if page == current { "●" } else { "○" };
            spans.push(Span::styled(dot, Theme::page_dot(page == current)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_card(frame: &mut Frame, area: Rect, item: &CatalogItem, selected: bool, row_focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::card_border(selected, row_focused))
        .style(Theme::card());

    let title_style = if selected && row_focused {
        Theme::selected()
    } else {
        Theme::text().bg(Theme::BACKGROUND_LIGHT)
    };

    let mut meta = Vec::new();
    if let Some(year) = item.year() {
        meta.push(Span::styled(format!("{} ", year), Theme::year()));
    }
    meta.push(Span::styled(
        format!("★ {:.1}", item.vote_average),
        Theme::rating(item.vote_average),
    ));

    let lines = vec![
        Line::from(Span::styled(item.title.clone(), title_style)),
        Line::from(meta),
    ];
    let card = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogQuery;
    use crate::models::MovieList;

    #[test]
    fn test_card_span_matches_page_offsets() {
        let mut carousel = CarouselState::new("popular", "Popular", CatalogQuery::movies(MovieList::Popular));
        carousel.observe_width(120.0);
        // Wide: 5 per row with 2-cell gaps -> 22.4-cell cards
        let (x0, w) = card_span(&carousel, 0);
        assert_eq!(x0, 0.0);
        assert!((w - 22.4).abs() < 1e-9);

        // First card of page 1 sits where offset_for(1) scrolls to
        let (x5, _) = card_span(&carousel, 5);
        assert!((x5 + carousel.controller.offset_for(1)).abs() < 1e-9);
    }

    #[test]
    fn test_card_span_narrow_has_no_gap() {
        let mut carousel = CarouselState::new("popular", "Popular", CatalogQuery::movies(MovieList::Popular));
        carousel.observe_width(80.0);
        assert_eq!(card_span(&carousel, 1), (20.0, 20.0));
        assert_eq!(card_span(&carousel, 4), (80.0, 20.0));
    }
}
