mod cards;
mod footer;
mod hero;
mod login;
mod navbar;
mod page;
mod popup;
mod stats;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    Frame,
};

use crate::app::{App, Mode};
use crate::theme::Theme;

pub use cards::CardsWidget;
pub use footer::FooterWidget;
pub use hero::HeroWidget;
pub use login::LoginWidget;
pub use navbar::NavbarWidget;
pub use page::PageWidget;
pub use popup::PopupWidget;
pub use stats::StatsWidget;
pub use status_bar::StatusBarWidget;

/// Draw the whole screen: navbar, page, status bar and any overlay
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    NavbarWidget::render(frame, chunks[0], app);
    PageWidget::render(frame, chunks[1], app);
    StatusBarWidget::render(frame, chunks[2], app);

    if app.mode == Mode::Help {
        PopupWidget::render_help(frame, app);
    }
}

/// Styling for one section row
pub struct RowStyle<'a> {
    pub theme: &'a Theme,
    /// Section has been revealed but is still fading in
    pub fading: bool,
}

impl RowStyle<'_> {
    /// Foreground `color`, or the muted color while fading
    pub fn fg(&self, color: Color) -> Style {
        Style::default().fg(if self.fading { self.theme.muted } else { color })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use lumen_core::site::{Page, Site};
    use lumen_core::config::ThresholdConfig;
    use lumen_core::AppConfig;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use super::*;
    use crate::input::Action;

    fn app(page: Page) -> App {
        App::new(
            Arc::new(AppConfig::default()),
            Site::builtin(),
            Theme::default(),
            page,
            (80, 24),
        )
    }

    fn draw(app: &App) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn screen_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_home_renders_chrome_and_hero() {
        let app = app(Page::Home);
        let text = screen_text(&draw(&app));
        assert!(text.contains("Lumen"));
        assert!(text.contains("1 Home"));
        assert!(text.contains("OPERATIONAL INTELLIGENCE"));
        assert!(text.contains("NORMAL"));
    }

    #[test]
    fn test_tagline_appears_as_it_types() {
        let mut app = app(Page::Home);
        assert!(!screen_text(&draw(&app)).contains("Lumen turns"));
        app.advance(Duration::from_secs(10));
        assert!(screen_text(&draw(&app)).contains("Lumen turns scattered data"));
    }

    #[test]
    fn test_unrevealed_sections_are_blank() {
        let mut config = AppConfig::default();
        config.animation.reveal.threshold = ThresholdConfig::Single(1.0);
        let app = App::new(
            Arc::new(config),
            Site::builtin(),
            Theme::default(),
            Page::Home,
            (80, 24),
        );

        // The first cards block is only partly on screen
        let text = screen_text(&draw(&app));
        assert!(text.contains("OPERATIONAL INTELLIGENCE"));
        assert!(!text.contains("Why teams choose Lumen"));
    }

    #[test]
    fn test_login_form_and_help_overlay() {
        let mut app = app(Page::Login);
        app.advance(Duration::from_secs(1));
        let text = screen_text(&draw(&app));
        assert!(text.contains("Welcome back"));
        assert!(text.contains("Password"));
        assert!(text.contains("Remember me"));

        app.handle_action(Action::ToggleHelp);
        let text = screen_text(&draw(&app));
        assert!(text.contains("Help"));
        assert!(text.contains("Replay entrance"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = app(Page::Industries);
        app.resize(10, 3);
        let mut terminal = Terminal::new(TestBackend::new(10, 3)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        app.handle_action(Action::ToggleHelp);
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }
}
