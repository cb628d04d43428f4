use ratatui::{
    style::Modifier,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use super::RowStyle;
use crate::layout::{Row, RowKind};

pub struct StatsWidget;

impl StatsWidget {
    /// Right-aligned figure in the accent color, label after it
    pub fn line<'a>(row: &'a Row, style: &RowStyle) -> Line<'a> {
        let RowKind::Stat { value_width } = row.kind else {
            return Line::default();
        };
        let split = if value_width == 0 {
            0
        } else {
            row.text
                .char_indices()
                .scan(0usize, |width, (i, c)| {
                    *width += c.width().unwrap_or(0);
                    Some((i + c.len_utf8(), *width))
                })
                .find(|&(_, w)| w >= value_width)
                .map(|(i, _)| i)
                .unwrap_or(row.text.len())
        };
        let (value, label) = row.text.split_at(split);

        Line::from(vec![
            Span::styled(
                value,
                style.fg(style.theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, style.fg(style.theme.grey1)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    #[test]
    fn test_value_and_label_are_split() {
        let theme = Theme::default();
        let style = RowStyle {
            theme: &theme,
            fading: false,
        };
        let row = Row {
            kind: RowKind::Stat { value_width: 6 },
            text: "   35%  faster reporting".to_string(),
        };
        let line = StatsWidget::line(&row, &style);
        assert_eq!(line.spans[0].content, "   35%");
        assert_eq!(line.spans[1].content, "  faster reporting");
    }
}
