//! Featured title banner shown above the Home and TV carousels

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::api::tmdb::banner_url;
use crate::models::CatalogItem;
use crate::ui::Theme;

pub const BANNER_HEIGHT: u16 = 7;

pub fn render_banner(frame: &mut Frame, area: Rect, item: Option<&CatalogItem>) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(item) = item else {
        return;
    };

    let mut meta = vec![Span::styled(
        format!("★ {:.1}", item.vote_average),
        Theme::rating(item.vote_average),
    )];
    if let Some(year) = item.year() {
        meta.push(Span::styled(format!("  {}", year), Theme::year()));
    }
    meta.push(Span::styled(
        format!("  {} votes", item.vote_count),
        Theme::dimmed(),
    ));

    let mut lines = vec![
        Line::from(Span::styled(
            item.title.to_uppercase(),
            Theme::title().add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        Line::from(Span::styled(item.overview.clone(), Theme::text())),
    ];
    if let Some(url) = banner_url(item) {
        lines.push(Line::from(Span::styled(url, Theme::dimmed())));
    }

    let banner = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(banner, inner);
}
