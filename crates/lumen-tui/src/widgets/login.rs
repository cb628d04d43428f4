use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use lumen_core::site::Field;

use super::RowStyle;
use crate::app::{App, Mode};
use crate::layout::{Row, RowKind};

pub struct LoginWidget;

impl LoginWidget {
    pub fn line<'a>(row: &'a Row, style: &RowStyle, app: &App) -> Line<'a> {
        let theme = style.theme;
        match row.kind {
            RowKind::Heading => Line::from(Span::styled(
                row.text.as_str(),
                style.fg(theme.fg1).add_modifier(Modifier::BOLD),
            )),
            RowKind::FieldLabel(field) => {
                let focused = app.focused_field == field;
                let marker = if focused { "› " } else { "  " };
                let mut spans = vec![
                    Span::styled(marker, style.fg(theme.accent)),
                    Span::styled(row.text.as_str(), style.fg(theme.grey1)),
                ];
                if let Some(message) = app.field_error(field) {
                    spans.push(Span::styled(
                        format!("  {message}"),
                        Style::default().fg(theme.error),
                    ));
                }
                Line::from(spans)
            }
            RowKind::FieldValue(field) => Self::value_line(field, style, app),
            RowKind::Remember => {
                let focused = app.focused_field == Field::Remember;
                let check = if app.form.remember { "[x] " } else { "[ ] " };
                let marker = if focused { "› " } else { "  " };
                Line::from(vec![
                    Span::styled(marker, style.fg(theme.accent)),
                    Span::styled(check, style.fg(theme.aqua)),
                    Span::styled(row.text.as_str(), style.fg(theme.fg0)),
                ])
            }
            RowKind::FormHint => Line::from(Span::styled(row.text.as_str(), style.fg(theme.grey0))),
            RowKind::FormMessage => match &app.form_message {
                Some(message) => Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(theme.success),
                )),
                None => Line::default(),
            },
            _ => Line::default(),
        }
    }

    /// Input box contents; the password is masked
    fn value_line<'a>(field: Field, style: &RowStyle, app: &App) -> Line<'a> {
        let theme = style.theme;
        let value = match field {
            Field::Email => app.form.email.clone(),
            Field::Password => app.form.masked_password(),
            Field::Remember => String::new(),
        };
        let editing = app.mode == Mode::Editing(field);
        let border = if editing { theme.accent } else { theme.grey0 };

        let mut spans = vec![
            Span::styled("  [ ", style.fg(border)),
            Span::styled(value, style.fg(theme.fg1).bg(theme.bg1)),
        ];
        if editing {
            let caret = if app.caret_visible() { "▏" } else { " " };
            spans.push(Span::styled(caret, Style::default().fg(theme.caret)));
        }
        spans.push(Span::styled(" ]", style.fg(border)));
        Line::from(spans)
    }
}
