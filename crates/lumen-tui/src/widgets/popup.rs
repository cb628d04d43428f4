use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

pub struct PopupWidget;

impl PopupWidget {
    /// Key reference built from the configured keymap
    pub fn render_help(frame: &mut Frame, app: &App) {
        let theme = &app.theme;
        let keys = &app.config.keymap;
        let entries: Vec<(String, &str)> = vec![
            (format!("{} / {}", keys.scroll_down, keys.scroll_up), "Scroll"),
            (
                format!("{} / {}", keys.scroll_half_down, keys.scroll_half_up),
                "Half page",
            ),
            (
                format!("{} / {}", keys.scroll_page_down, keys.scroll_page_up),
                "Full page",
            ),
            (
                format!("{} / {}", keys.jump_to_top, keys.jump_to_bottom),
                "Top / bottom",
            ),
            (format!("{} / {}", keys.prev_page, keys.next_page), "Previous / next page"),
            ("1 2 3".to_string(), "Go to page"),
            (keys.replay.clone(), "Replay entrance"),
            (keys.edit.clone(), "Edit login form"),
            (keys.next_field.clone(), "Next field"),
            (keys.submit.clone(), "Sign in"),
            (keys.help.clone(), "Toggle help"),
            (keys.quit.clone(), "Quit"),
        ];

        let area = frame.area();
        let popup_width = 48u16.min(area.width.saturating_sub(4));
        let popup_height = (entries.len() as u16 + 4).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));
        let inner_area = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let key_width = entries.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        let mut lines: Vec<Line> = entries
            .into_iter()
            .map(|(key, description)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {key:<key_width$}  "),
                        Style::default()
                            .fg(theme.yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(description, Style::default().fg(theme.fg0)),
                ])
            })
            .collect();
        lines.push(Line::default());
        lines.push(
            Line::styled("any key closes", Style::default().fg(theme.grey1))
                .alignment(Alignment::Center),
        );

        frame.render_widget(Paragraph::new(lines), inner_area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let rect = centered_rect(10, 4, Rect::new(0, 0, 30, 10));
        assert_eq!(rect, Rect::new(10, 3, 10, 4));
    }
}
