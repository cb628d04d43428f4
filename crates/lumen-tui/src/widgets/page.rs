use ratatui::{
    layout::{Margin, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};

use lumen_core::site::Section;

use super::{CardsWidget, FooterWidget, HeroWidget, LoginWidget, RowStyle, StatsWidget};
use crate::app::App;

/// The scrolled page body.
///
/// Rows of sections that have not been revealed yet stay blank, so the page
/// keeps its height and nothing below jumps when a section appears.
pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let content = app.site.page(app.page);
        let view = app.view();
        let now = app.now();
        let scroll = app.scroll_offset();
        let typed = view.and_then(|v| v.typed());
        let caret_on = app.caret_visible();

        let lines: Vec<Line> = (0..area.height)
            .map(|y| {
                let Some((block, index)) = app.layout.row_at(scroll.saturating_add(y)) else {
                    return Line::default();
                };
                let row = &block.rows[index];
                let Some(section) = block.section else {
                    return FooterWidget::line(row, theme);
                };
                let revealed = view.is_some_and(|v| v.is_revealed(section));
                if !revealed {
                    return Line::default();
                }
                let style = RowStyle {
                    theme,
                    fading: view.is_some_and(|v| v.reveal_progress(section, now) < 1.0),
                };
                match content.sections.get(section) {
                    Some(Section::Hero { .. }) => HeroWidget::line(row, &style, typed, caret_on),
                    Some(Section::Stats { .. }) => StatsWidget::line(row, &style),
                    Some(Section::Cards { .. }) => CardsWidget::line(row, &style),
                    Some(Section::LoginForm { .. }) => LoginWidget::line(row, &style, app),
                    None => Line::default(),
                }
            })
            .collect();

        let body = area.inner(Margin {
            horizontal: 2,
            vertical: 0,
        });
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(theme.bg0)),
            area,
        );
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().fg(theme.fg0).bg(theme.bg0)),
            body,
        );
    }
}
