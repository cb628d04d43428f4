use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let mode_str = match app.mode {
            Mode::Normal => "NORMAL",
            Mode::Editing(_) => "EDIT",
            Mode::Help => "HELP",
        };

        let (revealed, total) = app
            .view()
            .map(|v| (v.revealed_count(), v.section_count()))
            .unwrap_or((0, 0));
        let max = app.max_scroll();
        let position = if max == 0 {
            "All".to_string()
        } else {
            format!("{}%", u32::from(app.scroll_offset()) * 100 / u32::from(max))
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {msg}")
        } else {
            format!(
                " {} | {} | Revealed: {}/{} | {}",
                mode_str,
                app.site.meta(app.page).title,
                revealed,
                total,
                position
            )
        };

        let help_hint = match app.mode {
            Mode::Editing(_) => " Esc:done Tab:next Enter:submit ",
            _ => " q:quit h/l:pages j/k:scroll r:replay ?:help ",
        };
        let used = Span::raw(status_text.as_str()).width() + help_hint.len();
        let padding_len = usize::from(area.width).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                status_text.as_str(),
                Style::default().fg(theme.fg0).bg(theme.bg2),
            ),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
