use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::RowStyle;
use crate::layout::{Row, RowKind};
use crate::page::TypedState;

const CARET: &str = "▌";

pub struct HeroWidget;

impl HeroWidget {
    pub fn line<'a>(
        row: &'a Row,
        style: &RowStyle,
        typed: Option<TypedState>,
        caret_on: bool,
    ) -> Line<'a> {
        let theme = style.theme;
        match row.kind {
            RowKind::Eyebrow => Line::from(Span::styled(
                row.text.as_str(),
                style.fg(theme.accent).add_modifier(Modifier::BOLD),
            )),
            RowKind::Headline => Line::from(Span::styled(
                row.text.as_str(),
                style.fg(theme.fg1).add_modifier(Modifier::BOLD),
            )),
            RowKind::Typed { start } => match typed {
                Some(state) => typed_line(row, start, state, caret_on, style),
                None => Line::default(),
            },
            RowKind::Cta => Line::from(Span::styled(
                row.text.as_str(),
                style
                    .fg(theme.bg0)
                    .bg(if style.fading { theme.bg2 } else { theme.accent })
                    .add_modifier(Modifier::BOLD),
            )),
            _ => Line::default(),
        }
    }
}

/// The typed part of one tagline row, with the caret where typing is
fn typed_line<'a>(
    row: &'a Row,
    start: usize,
    state: TypedState,
    caret_on: bool,
    style: &RowStyle,
) -> Line<'a> {
    let len = row.text.chars().count();
    let shown = state.revealed.saturating_sub(start).min(len);
    let visible: String = row.text.chars().take(shown).collect();

    let mut spans = vec![Span::styled(visible, style.fg(style.theme.fg0))];
    if state.caret && caret_here(start, len, state.revealed) {
        let caret = if caret_on { CARET } else { " " };
        spans.push(Span::styled(caret, Style::default().fg(style.theme.caret)));
    }
    Line::from(spans)
}

/// Whether the caret sits on the row covering characters `start..start + len`
fn caret_here(start: usize, len: usize, revealed: usize) -> bool {
    revealed >= start && (revealed < start + len || len == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn typed_row(start: usize, text: &str) -> Row {
        Row {
            kind: RowKind::Typed { start },
            text: text.to_string(),
        }
    }

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_typed_row_shows_prefix_and_caret() {
        let theme = Theme::default();
        let style = RowStyle {
            theme: &theme,
            fading: false,
        };
        let row = typed_row(0, "Hello world");
        let state = TypedState {
            revealed: 4,
            caret: true,
        };
        let line = HeroWidget::line(&row, &style, Some(state), true);
        assert_eq!(text_of(&line), "Hell▌");

        let blink_off = HeroWidget::line(&row, &style, Some(state), false);
        assert_eq!(text_of(&blink_off), "Hell ");
    }

    #[test]
    fn test_caret_only_on_current_row() {
        let theme = Theme::default();
        let style = RowStyle {
            theme: &theme,
            fading: false,
        };
        let first = typed_row(0, "abc");
        let second = typed_row(4, "def");
        let state = TypedState {
            revealed: 5,
            caret: true,
        };
        assert_eq!(text_of(&HeroWidget::line(&first, &style, Some(state), true)), "abc");
        assert_eq!(text_of(&HeroWidget::line(&second, &style, Some(state), true)), "d▌");
    }

    #[test]
    fn test_finished_typing_hides_caret() {
        let theme = Theme::default();
        let style = RowStyle {
            theme: &theme,
            fading: false,
        };
        let row = typed_row(0, "abc");
        let state = TypedState {
            revealed: 3,
            caret: false,
        };
        assert_eq!(text_of(&HeroWidget::line(&row, &style, Some(state), true)), "abc");
        assert_eq!(text_of(&HeroWidget::line(&row, &style, None, true)), "");
    }
}
