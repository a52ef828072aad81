//! Detail overlay for movies and TV shows
//!
//! A modal drawn over the current section. The header shows the record's
//! facts (or the carousel item while the record loads); below it sit the
//! "More Like This" and "Recommended" carousels.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::api::tmdb::{image_url, poster_url, ImageSize};
use crate::app::{App, CarouselSlot, HitMap, LoadingState};
use crate::models::{CatalogItem, ItemDetail};
use crate::ui::carousel::{render_carousel, CAROUSEL_HEIGHT};
use crate::ui::{status, Theme};

/// Minimum rows kept for the info panel
const INFO_MIN_HEIGHT: u16 = 6;

/// Area of the modal within `area`
pub fn overlay_area(area: Rect) -> Rect {
    let width = nine_tenths(area.width).max(area.width.min(20));
    let height = nine_tenths(area.height).max(area.height.min(10));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn nine_tenths(n: u16) -> u16 {
    u16::try_from(u32::from(n) * 9 / 10).unwrap_or(n)
}

/// Render the overlay for `app.detail`, if open
pub fn render_detail(frame: &mut Frame, area: Rect, app: &mut App, hits: &mut HitMap) {
    let preview = app.selected_item().cloned();
    let path = app.path();
    let tick = app.tick;
    let Some(detail) = app.detail.as_mut() else {
        return;
    };

    let popup = overlay_area(area);
    hits.overlay = Some(popup);
    frame.render_widget(Clear, popup);

    let title = detail
        .detail
        .as_ref()
        .map(|d| d.title().to_string())
        .or_else(|| preview.as_ref().map(|p| p.title.clone()))
        .unwrap_or_else(|| detail.target.id.clone());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Theme::border_focused())
        .title(Span::styled(format!(" {} ", title), Theme::title()))
        .title_bottom(Line::from(Span::styled(" ESC close ", Theme::keybind_desc())).right_aligned())
        .style(Theme::overlay());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    // Give related rows whatever the info panel can spare
    let related_rows = inner
        .height
        .saturating_sub(INFO_MIN_HEIGHT)
        .min(CAROUSEL_HEIGHT * detail.related.carousels.len() as u16)
        / CAROUSEL_HEIGHT;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(INFO_MIN_HEIGHT.min(inner.height)),
            Constraint::Length(related_rows * CAROUSEL_HEIGHT),
        ])
        .split(inner);
    let (info, related) = (chunks[0], chunks[1]);

    match (&detail.loading, &detail.detail) {
        (LoadingState::NotFound, _) => status::render_not_found(frame, info, &path),
        (LoadingState::Error(msg), _) => status::render_error(frame, info, msg),
        (_, Some(record)) => render_info(frame, info, record),
        (_, None) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(info);
            status::render_loader(frame, chunks[0], tick, Some("Loading details..."));
            if let Some(item) = preview.as_ref() {
                render_preview(frame, chunks[1], item);
            }
        }
    }

    // Related carousels are only meaningful for a record that exists
    if detail.loading == LoadingState::NotFound || related_rows == 0 {
        return;
    }
    let focused = detail.related.focused;
    for (index, carousel) in detail
        .related
        .carousels
        .iter_mut()
        .take(related_rows as usize)
        .enumerate()
    {
        let rect = Rect {
            x: related.x,
            y: related.y + index as u16 * CAROUSEL_HEIGHT,
            width: related.width,
            height: CAROUSEL_HEIGHT,
        };
        render_carousel(
            frame,
            rect,
            carousel,
            CarouselSlot::Related(index),
            index == focused,
            tick,
            hits,
        );
    }
}

/// Lines describing a loaded record
pub fn info_lines(record: &ItemDetail) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(tagline) = record.tagline() {
        lines.push(Line::from(Span::styled(
            format!("\"{}\"", tagline),
            Theme::secondary().add_modifier(Modifier::ITALIC),
        )));
    }

    let mut meta = vec![Span::styled(
        format!("★ {:.1}", record.vote_average()),
        Theme::rating(record.vote_average()),
    )];
    if let Some(year) = record.year() {
        meta.push(Span::styled(format!("  {}", year), Theme::year()));
    }
    if let Some(length) = record.length_summary() {
        meta.push(Span::styled(format!("  {}", length), Theme::duration()));
    }
    if !record.genres().is_empty() {
        meta.push(Span::styled(
            format!("  {}", record.genres().join(" · ")),
            Theme::genre(),
        ));
    }
    lines.push(Line::from(meta));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        record.overview().to_string(),
        Theme::text().bg(Theme::BACKGROUND_OVERLAY),
    )));
    if let Some(path) = record.poster_path() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            image_url(path, ImageSize::W500),
            Theme::dimmed(),
        )));
    }
    lines
}

fn render_info(frame: &mut Frame, area: Rect, record: &ItemDetail) {
    let info = Paragraph::new(info_lines(record)).wrap(Wrap { trim: true });
    frame.render_widget(info, area);
}

fn render_preview(frame: &mut Frame, area: Rect, item: &CatalogItem) {
    let mut lines = vec![Line::from(Span::styled(item.overview.clone(), Theme::secondary()))];
    if let Some(url) = poster_url(item) {
        lines.push(Line::from(Span::styled(url, Theme::dimmed())));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieDetail;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_overlay_area_is_centered() {
        let popup = overlay_area(Rect::new(0, 0, 100, 40));
        assert_eq!(popup, Rect::new(5, 2, 90, 36));
        let tiny = overlay_area(Rect::new(0, 0, 10, 5));
        assert_eq!(tiny, Rect::new(0, 0, 10, 5));
    }

    #[test]
    fn test_overlay_area_on_very_wide_terminals() {
        let wide = Rect {
            x: 0,
            y: 0,
            width: 10_000,
            height: 40,
        };
        let popup = overlay_area(wide);
        assert_eq!((popup.x, popup.width), (500, 9_000));

        let widest = Rect {
            x: 0,
            y: 0,
            width: u16::MAX,
            height: u16::MAX,
        };
        let popup = overlay_area(widest);
        assert_eq!((popup.width, popup.height), (58_981, 58_981));
        assert_eq!(popup.x, 3_277);
    }

    #[test]
    fn test_info_lines_for_movie() {
        let record = ItemDetail::Movie(MovieDetail {
            id: "550".into(),
            title: "Fight Club".into(),
            tagline: Some("Mischief. Mayhem. Soap.".into()),
            overview: "An insomniac office worker...".into(),
            poster_path: Some("/p.jpg".into()),
            backdrop_path: None,
            release_date: Some("1999-10-15".into()),
            runtime: Some(139),
            genres: vec!["Drama".into()],
            vote_average: 8.4,
            vote_count: 30000,
            homepage: None,
        });
        let text: Vec<String> = info_lines(&record).iter().map(line_text).collect();
        assert_eq!(text[0], "\"Mischief. Mayhem. Soap.\"");
        assert!(text[1].contains("★ 8.4"));
        assert!(text[1].contains("1999"));
        assert!(text[1].contains("2h 19m"));
        assert!(text[1].contains("Drama"));
        assert!(text.iter().any(|l| l.ends_with("/w500/p.jpg")));
    }
}
