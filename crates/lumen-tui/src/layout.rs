//! Page layout: every section pre-wrapped into rows at the current width.
//!
//! Heights depend only on the full content and the width, never on reveal
//! progress, so a section does not grow while its text is typed out.

use lumen_core::site::{Field, PageContent, Section};
use unicode_width::UnicodeWidthChar;

use crate::viewport::RowSpan;

/// What a row shows; widgets pick styling from this
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Blank,
    Eyebrow,
    Headline,
    /// Part of typed text starting at this character index
    Typed { start: usize },
    Cta,
    Stat { value_width: usize },
    Heading,
    CardTitle,
    CardBody,
    FieldLabel(Field),
    FieldValue(Field),
    Remember,
    FormHint,
    FormMessage,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub text: String,
}

impl Row {
    fn new(kind: RowKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::new(RowKind::Blank, "")
    }
}

/// Laid-out section (or the footer when `section` is `None`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub section: Option<usize>,
    pub top: u16,
    pub rows: Vec<Row>,
}

impl Block {
    pub fn span(&self) -> RowSpan {
        RowSpan {
            top: self.top,
            height: row_count(&self.rows),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub width: u16,
    pub blocks: Vec<Block>,
    pub height: u16,
}

/// Gap between blocks
const BLOCK_GAP: u16 = 1;

fn row_count(rows: &[Row]) -> u16 {
    u16::try_from(rows.len()).unwrap_or(u16::MAX)
}

impl PageLayout {
    pub fn build(content: &PageContent, footer: &str, width: u16) -> Self {
        let text_width = usize::from(width.max(8));
        let mut blocks = Vec::with_capacity(content.sections.len() + 1);
        let mut top = 0u16;

        let sections = content
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| (Some(i), section_rows(s, text_width)));
        let footer = std::iter::once((None, footer_rows(footer, text_width)));

        for (section, rows) in sections.chain(footer) {
            let height = row_count(&rows);
            blocks.push(Block { section, top, rows });
            top = top.saturating_add(height).saturating_add(BLOCK_GAP);
        }

        Self {
            width,
            blocks,
            height: top.saturating_sub(BLOCK_GAP),
        }
    }

    pub fn section_block(&self, section: usize) -> Option<&Block> {
        self.blocks.iter().find(|b| b.section == Some(section))
    }

    /// Largest scroll offset that still fills the viewport
    pub fn max_scroll(&self, viewport_height: u16) -> u16 {
        self.height.saturating_sub(viewport_height)
    }

    /// Block and row index at an absolute page row
    pub fn row_at(&self, y: u16) -> Option<(&Block, usize)> {
        self.blocks.iter().find_map(|block| {
            let offset = y.checked_sub(block.top)?;
            let index = usize::from(offset);
            (index < block.rows.len()).then_some((block, index))
        })
    }
}

fn section_rows(section: &Section, width: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    match section {
        Section::Hero {
            eyebrow,
            headline,
            tagline,
            cta,
        } => {
            rows.push(Row::blank());
            rows.push(Row::new(RowKind::Eyebrow, eyebrow.to_uppercase()));
            rows.push(Row::blank());
            for (_, line) in wrap(headline, width) {
                rows.push(Row::new(RowKind::Headline, line));
            }
            rows.push(Row::blank());
            for (start, line) in wrap(tagline, width) {
                rows.push(Row::new(RowKind::Typed { start }, line));
            }
            rows.push(Row::blank());
            rows.push(Row::new(RowKind::Cta, format!("[ {cta} → ]")));
            rows.push(Row::blank());
        }
        Section::Stats { items } => {
            let value_width = items
                .iter()
                .map(|s| display_width(&s.value))
                .max()
                .unwrap_or(0);
            for stat in items {
                let pad = value_width.saturating_sub(display_width(&stat.value));
                let text = format!("{}{}  {}", " ".repeat(pad), stat.value, stat.label);
                rows.push(Row::new(RowKind::Stat { value_width }, text));
            }
        }
        Section::Cards { heading, cards } => {
            for (_, line) in wrap(heading, width) {
                rows.push(Row::new(RowKind::Heading, line));
            }
            for card in cards {
                rows.push(Row::blank());
                for (_, line) in wrap(&card.title, width) {
                    rows.push(Row::new(RowKind::CardTitle, line));
                }
                for (_, line) in wrap(&card.body, width.saturating_sub(2).max(1)) {
                    rows.push(Row::new(RowKind::CardBody, format!("  {line}")));
                }
            }
        }
        Section::LoginForm { heading } => {
            for (_, line) in wrap(heading, width) {
                rows.push(Row::new(RowKind::Heading, line));
            }
            for field in [Field::Email, Field::Password] {
                rows.push(Row::blank());
                rows.push(Row::new(RowKind::FieldLabel(field), field.label()));
                rows.push(Row::new(RowKind::FieldValue(field), ""));
            }
            rows.push(Row::blank());
            rows.push(Row::new(RowKind::Remember, Field::Remember.label()));
            rows.push(Row::blank());
            rows.push(Row::new(RowKind::FormHint, "i edit · Tab next field · Enter sign in"));
            rows.push(Row::new(RowKind::FormMessage, ""));
        }
    }
    rows
}

fn footer_rows(footer: &str, width: usize) -> Vec<Row> {
    let mut rows = vec![Row::new(RowKind::Footer, "─".repeat(width))];
    rows.extend(
        wrap(footer, width)
            .into_iter()
            .map(|(_, line)| Row::new(RowKind::Footer, line)),
    );
    rows
}

pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Greedy word wrap by display width.
///
/// Each row is a contiguous run of the input's characters; the returned index
/// is the character offset where the row starts. Spaces at a break are
/// dropped, words wider than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<(usize, String)> {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    let mut rows = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !rows.is_empty() {
            while i < chars.len() && chars[i] == ' ' {
                i += 1;
            }
            if i == chars.len() {
                break;
            }
        }

        let start = i;
        let mut used = 0;
        let mut last_space = None;
        let mut j = i;
        while j < chars.len() {
            let w = chars[j].width().unwrap_or(0);
            if used + w > width {
                break;
            }
            if chars[j] == ' ' {
                last_space = Some(j);
            }
            used += w;
            j += 1;
        }

        let end = if j == chars.len() || chars[j] == ' ' {
            j
        } else if let Some(space) = last_space.filter(|&s| s > start) {
            space
        } else if j == start {
            j + 1
        } else {
            j
        };

        rows.push((start, chars[start..end].iter().collect()));
        i = end;
    }

    if rows.is_empty() {
        rows.push((0, String::new()));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::site::{Page, Site};
    use proptest::prelude::*;

    #[test]
    fn test_wrap_breaks_on_spaces() {
        let rows = wrap("the quick brown fox", 10);
        assert_eq!(
            rows,
            vec![(0, "the quick".to_string()), (10, "brown fox".to_string())]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let rows = wrap("abcdefgh", 3);
        let texts: Vec<&str> = rows.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["abc", "def", "gh"]);
        assert_eq!(rows[2].0, 6);
    }

    #[test]
    fn test_wrap_wide_chars() {
        let rows = wrap("日本語です", 4);
        let texts: Vec<&str> = rows.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["日本", "語で", "す"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap("", 10), vec![(0, String::new())]);
    }

    #[test]
    fn test_blocks_are_stacked_with_gaps() {
        let site = Site::builtin();
        let layout = PageLayout::build(site.page(Page::Home), &site.footer, 60);
        let mut expected_top = 0;
        for block in &layout.blocks {
            assert_eq!(block.top, expected_top);
            expected_top += block.rows.len() as u16 + BLOCK_GAP;
        }
        assert_eq!(layout.blocks.last().map(|b| b.section), Some(None));
        assert_eq!(layout.height, expected_top - BLOCK_GAP);
    }

    #[test]
    fn test_typed_rows_cover_tagline() {
        let site = Site::builtin();
        let content = site.page(Page::Home);
        let layout = PageLayout::build(content, &site.footer, 30);
        let hero = layout.section_block(0).unwrap();
        let typed: Vec<&Row> = hero
            .rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Typed { .. }))
            .collect();
        assert!(typed.len() > 1);
        let tagline: Vec<char> = content.typed_text().unwrap().chars().collect();
        for row in typed {
            let RowKind::Typed { start } = row.kind else {
                unreachable!()
            };
            let n = row.text.chars().count();
            let slice: String = tagline[start..start + n].iter().collect();
            assert_eq!(slice, row.text);
        }
    }

    #[test]
    fn test_row_at() {
        let site = Site::builtin();
        let layout = PageLayout::build(site.page(Page::Login), &site.footer, 40);
        let (block, index) = layout.row_at(0).unwrap();
        assert_eq!(block.section, Some(0));
        assert_eq!(index, 0);
        let gap = layout.blocks[0].rows.len() as u16;
        assert!(layout.row_at(gap).is_none());
    }

    #[test]
    fn test_oversized_section_saturates() {
        let site = Site::builtin();
        let cards = (0..30_000)
            .map(|i| lumen_core::site::Card {
                title: format!("Card {i}"),
                body: "body".to_string(),
            })
            .collect();
        let content = PageContent {
            meta: site.page(Page::Home).meta.clone(),
            sections: vec![Section::Cards {
                heading: "Many".to_string(),
                cards,
            }],
        };
        let layout = PageLayout::build(&content, &site.footer, 40);
        assert!(layout.blocks[0].rows.len() > usize::from(u16::MAX));
        assert_eq!(layout.blocks[0].span().height, u16::MAX);
        assert!(layout.height >= u16::MAX - BLOCK_GAP);
    }

    proptest! {
        #[test]
        fn wrapped_rows_fit_and_map_back(text in "[a-z ]{0,80}", width in 1usize..30) {
            let chars: Vec<char> = text.chars().collect();
            for (start, row) in wrap(&text, width) {
                prop_assert!(display_width(&row) <= width);
                let n = row.chars().count();
                let slice: String = chars[start..start + n].iter().collect();
                prop_assert_eq!(slice, row);
            }
        }
    }
}
