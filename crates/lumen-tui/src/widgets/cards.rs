use ratatui::{
    style::Modifier,
    text::{Line, Span},
};

use super::RowStyle;
use crate::layout::{Row, RowKind};

pub struct CardsWidget;

impl CardsWidget {
    pub fn line<'a>(row: &'a Row, style: &RowStyle) -> Line<'a> {
        let theme = style.theme;
        let span = match row.kind {
            RowKind::Heading => Span::styled(
                row.text.as_str(),
                style.fg(theme.fg1).add_modifier(Modifier::BOLD),
            ),
            RowKind::CardTitle => Span::styled(
                row.text.as_str(),
                style.fg(theme.aqua).add_modifier(Modifier::BOLD),
            ),
            RowKind::CardBody => Span::styled(row.text.as_str(), style.fg(theme.fg0)),
            _ => return Line::default(),
        };
        Line::from(span)
    }
}
