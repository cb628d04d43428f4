use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use lumen_core::site::Page;

use crate::app::App;

pub struct NavbarWidget;

impl NavbarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar = Style::default().bg(theme.bg1);

        let mut spans = vec![Span::styled(
            format!(" {} ", app.site.brand),
            bar.fg(theme.accent).add_modifier(Modifier::BOLD),
        )];
        for page in Page::ALL {
            let label = format!(" {} {} ", page.index() + 1, page.label());
            let style = if page == app.page {
                Style::default()
                    .fg(theme.fg1)
                    .bg(theme.bg2)
                    .add_modifier(Modifier::BOLD)
            } else {
                bar.fg(theme.grey1)
            };
            spans.push(Span::styled(" ", bar));
            spans.push(Span::styled(label, style));
        }

        let route = app.site.meta(app.page).route.as_str();
        let used: usize = spans.iter().map(|s| s.width()).sum();
        let padding = usize::from(area.width).saturating_sub(used + route.len() + 1);
        spans.push(Span::styled(" ".repeat(padding), bar));
        spans.push(Span::styled(format!("{route} "), bar.fg(theme.grey0)));

        frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), area);
    }
}
