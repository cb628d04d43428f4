use ratatui::{style::Style, text::Line};

use crate::layout::Row;
use crate::theme::Theme;

/// Footer rows are not tracked and always drawn
pub struct FooterWidget;

impl FooterWidget {
    pub fn line<'a>(row: &'a Row, theme: &Theme) -> Line<'a> {
        Line::styled(row.text.as_str(), Style::default().fg(theme.grey0))
    }
}
