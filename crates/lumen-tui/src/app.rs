use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use lumen_core::host::{Scheduler, VirtualScheduler};
use lumen_core::site::{Field, FieldError, LoginForm, Page, Section, Site};
use lumen_core::{AppConfig, TypewriterOptions, VisibilityOptions};
use tracing::{debug, info};

use crate::caret::caret_on;
use crate::input::Action;
use crate::layout::PageLayout;
use crate::page::PageView;
use crate::scroll::ScrollAnimator;
use crate::theme::Theme;
use crate::viewport::TerminalViewport;

/// Rows taken by the navbar and the status bar
const CHROME_ROWS: u16 = 2;
/// Blank columns on each side of the page
const SIDE_PADDING: u16 = 2;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Browsing and scrolling
    Normal,
    /// Typing into a login field
    Editing(Field),
    /// Help overlay
    Help,
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub site: Site,
    pub theme: Theme,
    /// Page currently shown
    pub page: Page,
    /// Current application mode
    pub mode: Mode,
    /// Frame clock driving typing, reveals, scrolling and the caret
    pub clock: Rc<VirtualScheduler>,
    pub viewport: Rc<TerminalViewport>,
    pub layout: PageLayout,
    pub scroll: ScrollAnimator,
    pub form: LoginForm,
    /// Field that Tab moves between and editing starts in
    pub focused_field: Field,
    pub form_errors: Vec<FieldError>,
    pub form_message: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    /// Terminal size
    pub width: u16,
    pub height: u16,
    view: Option<PageView>,
    next_element: u64,
    reveal: VisibilityOptions,
    typing: TypewriterOptions,
    caret_blink: Duration,
}

impl App {
    pub fn new(
        config: Arc<AppConfig>,
        site: Site,
        theme: Theme,
        page: Page,
        (width, height): (u16, u16),
    ) -> Self {
        let reveal = config.animation.reveal.visibility_options();
        let typing = config.animation.typewriter.options();
        let caret_blink = config.animation.typewriter.caret_blink();
        let scroll = ScrollAnimator::new(config.ui.scroll.clone());
        let content_height = height.saturating_sub(CHROME_ROWS);

        let mut app = Self {
            config,
            site,
            theme,
            page,
            mode: Mode::Normal,
            clock: Rc::new(VirtualScheduler::new()),
            viewport: Rc::new(TerminalViewport::new(content_height)),
            layout: PageLayout::default(),
            scroll,
            form: LoginForm::new(),
            focused_field: Field::Email,
            form_errors: Vec::new(),
            form_message: None,
            should_quit: false,
            status_message: None,
            pending_key: None,
            width,
            height,
            view: None,
            next_element: 0,
            reveal,
            typing,
            caret_blink,
        };
        app.mount();
        app
    }

    /// Rows available to the page between navbar and status bar
    pub fn content_height(&self) -> u16 {
        self.height.saturating_sub(CHROME_ROWS)
    }

    /// Columns available to page text
    pub fn content_width(&self) -> u16 {
        self.width.saturating_sub(SIDE_PADDING * 2).max(1)
    }

    pub fn max_scroll(&self) -> u16 {
        self.layout.max_scroll(self.content_height())
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll.current_scroll()
    }

    pub fn view(&self) -> Option<&PageView> {
        self.view.as_ref()
    }

    /// Frame clock reading
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Blink phase of the typing caret
    pub fn caret_visible(&self) -> bool {
        caret_on(self.now(), self.caret_blink)
    }

    /// Build the layout for the current page and start tracking its sections
    fn mount(&mut self) {
        // Unmount first so the old trackers are gone before new ones report
        self.view = None;
        let content = self.site.page(self.page);
        self.layout = PageLayout::build(content, &self.site.footer, self.content_width());
        self.scroll.reset();
        self.viewport.set_scroll(0);
        self.viewport.set_height(self.content_height());
        self.view = Some(PageView::mount(
            self.page,
            content,
            &self.layout,
            self.viewport.clone(),
            self.clock.clone() as Rc<dyn Scheduler>,
            &mut self.next_element,
            &self.reveal,
            self.typing,
        ));
        self.viewport.evaluate();
    }

    pub fn navigate(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        info!(from = %self.page, to = %page, "navigate");
        self.page = page;
        self.mode = Mode::Normal;
        self.form_errors.clear();
        self.form_message = None;
        self.mount();
    }

    /// Play the page's entrance again from the top
    pub fn replay(&mut self) {
        debug!(page = %self.page, "replay");
        self.mount();
        self.set_status("Replaying");
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.viewport.set_height(self.content_height());

        if self.content_width() != self.layout.width {
            let content = self.site.page(self.page);
            self.layout = PageLayout::build(content, &self.site.footer, self.content_width());
            if let Some(view) = &self.view {
                view.relayout(&self.layout);
            }
        }
        let scroll = self.scroll.current_scroll().min(self.max_scroll());
        self.scroll.set_scroll(scroll);
        self.viewport.set_scroll(scroll);
        self.viewport.evaluate();
    }

    /// Move the frame clock forward: fire due timers, step the scroll
    /// animation, then let the viewport report what came into view.
    pub fn advance(&mut self, elapsed: Duration) {
        self.clock.advance(elapsed);
        let scroll = self.scroll.update(self.clock.now(), self.max_scroll());
        self.viewport.set_scroll(scroll);
        self.viewport.evaluate();
    }

    /// Something is moving and frames should come at the animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.scroll.needs_update()
            || self.view.as_ref().is_some_and(|v| {
                let now = self.now();
                v.is_typing() || v.is_fading(now)
            })
    }

    /// Whether the current page carries the login form
    pub fn has_form(&self) -> bool {
        self.site
            .page(self.page)
            .sections
            .iter()
            .any(|s| matches!(s, Section::LoginForm { .. }))
    }

    pub fn handle_action(&mut self, action: Action) {
        if action != Action::PendingG {
            self.pending_key = None;
        }
        if action != Action::None && action != Action::PendingG {
            self.clear_status();
        }

        let viewport_height = self.content_height();
        let max_scroll = self.max_scroll();

        match action {
            Action::Quit => self.should_quit = true,
            Action::NextPage => self.navigate(self.page.next()),
            Action::PrevPage => self.navigate(self.page.prev()),
            Action::GoToPage(page) => self.navigate(page),
            Action::ScrollDown => self.scroll.scroll_down(max_scroll),
            Action::ScrollUp => self.scroll.scroll_up(max_scroll),
            Action::ScrollHalfPageDown => {
                self.scroll.scroll_half_page_down(viewport_height, max_scroll)
            }
            Action::ScrollHalfPageUp => self.scroll.scroll_half_page_up(viewport_height, max_scroll),
            Action::ScrollPageDown => self.scroll.scroll_full_page_down(viewport_height, max_scroll),
            Action::ScrollPageUp => self.scroll.scroll_full_page_up(viewport_height, max_scroll),
            Action::JumpToTop => self.scroll.scroll_to(0, max_scroll),
            Action::JumpToBottom => self.scroll.scroll_to(max_scroll, max_scroll),
            Action::PendingG => self.pending_key = Some('g'),
            Action::Replay => self.replay(),
            Action::ToggleHelp => {
                self.mode = match self.mode {
                    Mode::Help => Mode::Normal,
                    _ => Mode::Help,
                };
            }
            Action::StartEditing => {
                if self.has_form() {
                    self.mode = Mode::Editing(self.focused_field);
                } else {
                    self.set_status("Nothing to edit on this page");
                }
            }
            Action::NextField => {
                if self.has_form() {
                    self.focused_field = self.focused_field.next();
                    if let Mode::Editing(_) = self.mode {
                        self.mode = Mode::Editing(self.focused_field);
                    }
                }
            }
            Action::Submit => self.submit(),
            Action::InputChar(c) => {
                if let Mode::Editing(field) = self.mode {
                    if field.is_text() {
                        self.form.push_char(field, c);
                        self.form_errors.retain(|e| e.field != field);
                    } else if c == ' ' {
                        self.form.toggle_remember();
                    }
                }
            }
            Action::Backspace => {
                if let Mode::Editing(field) = self.mode {
                    self.form.pop_char(field);
                }
            }
            Action::ExitMode => self.mode = Mode::Normal,
            Action::None => {}
        }
    }

    /// Check the form; nothing is ever sent anywhere
    fn submit(&mut self) {
        if !self.has_form() {
            return;
        }
        self.mode = Mode::Normal;
        self.form_errors = self.form.validate();
        if self.form_errors.is_empty() {
            info!("login form submitted");
            self.form_message = Some(format!(
                "Thanks, {}. This demo does not sign anyone in.",
                self.form.email.trim()
            ));
            self.form.password.clear();
        } else {
            debug!(errors = self.form_errors.len(), "login form incomplete");
            self.form_message = None;
            if let Some(first) = self.form_errors.first() {
                self.focused_field = first.field;
            }
        }
    }

    /// Validation message for a field, if it has one
    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.form_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(page: Page) -> App {
        App::new(
            Arc::new(AppConfig::default()),
            Site::builtin(),
            Theme::default(),
            page,
            (80, 24),
        )
    }

    #[test]
    fn test_mount_reveals_above_the_fold() {
        let app = app(Page::Home);
        let view = app.view().unwrap();
        assert!(view.is_revealed(0));
        assert!(view.revealed_count() < view.section_count());
        assert!(app.needs_fast_update());
    }

    #[test]
    fn test_tagline_types_on_frame_clock() {
        let mut app = app(Page::Home);
        app.advance(Duration::from_millis(300 + 50 * 4));
        assert_eq!(app.view().unwrap().typed().unwrap().revealed, 4);
    }

    #[test]
    fn test_scrolling_reveals_lower_sections() {
        let mut app = app(Page::Home);
        app.handle_action(Action::JumpToBottom);
        app.advance(Duration::from_secs(1));
        assert_eq!(app.scroll_offset(), app.max_scroll());
        let view = app.view().unwrap();
        assert!(view.is_revealed(view.section_count() - 1));
    }

    #[test]
    fn test_navigation_wraps_and_remounts() {
        let mut app = app(Page::Home);
        app.handle_action(Action::PrevPage);
        assert_eq!(app.page, Page::Login);
        assert_eq!(app.view().unwrap().page(), Page::Login);
        app.handle_action(Action::NextPage);
        assert_eq!(app.page, Page::Home);
        assert_eq!(app.viewport.active(), {
            let view = app.view().unwrap();
            view.section_count() - view.revealed_count()
        });
    }

    #[test]
    fn test_pending_g_is_cleared_by_other_actions() {
        let mut app = app(Page::Home);
        app.handle_action(Action::PendingG);
        assert_eq!(app.pending_key, Some('g'));
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.pending_key, None);
    }

    #[test]
    fn test_editing_only_on_login() {
        let mut app = app(Page::Home);
        app.handle_action(Action::StartEditing);
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.status_message.is_some());

        app.handle_action(Action::GoToPage(Page::Login));
        app.handle_action(Action::StartEditing);
        assert_eq!(app.mode, Mode::Editing(Field::Email));
    }

    #[test]
    fn test_login_submit_validates_presence() {
        let mut app = app(Page::Login);
        app.handle_action(Action::Submit);
        assert_eq!(app.form_errors.len(), 2);
        assert_eq!(app.focused_field, Field::Email);

        app.handle_action(Action::StartEditing);
        for c in "a@b.c".chars() {
            app.handle_action(Action::InputChar(c));
        }
        assert!(app.field_error(Field::Email).is_none());
        app.handle_action(Action::NextField);
        assert_eq!(app.mode, Mode::Editing(Field::Password));
        app.handle_action(Action::InputChar('x'));
        app.handle_action(Action::NextField);
        app.handle_action(Action::InputChar(' '));
        assert!(app.form.remember);
        app.handle_action(Action::Submit);

        assert!(app.form_errors.is_empty());
        assert!(app.form_message.is_some());
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.form.password.is_empty());
    }

    #[test]
    fn test_resize_keeps_scroll_in_range() {
        let mut app = app(Page::Home);
        app.handle_action(Action::JumpToBottom);
        app.advance(Duration::from_secs(1));
        app.resize(200, 120);
        assert!(app.scroll_offset() <= app.max_scroll());
        assert_eq!(app.viewport.height(), 118);
    }

    #[test]
    fn test_replay_restarts_typing() {
        let mut app = app(Page::Home);
        app.advance(Duration::from_secs(60));
        assert!(!app.view().unwrap().is_typing());
        app.handle_action(Action::Replay);
        assert!(app.view().unwrap().is_typing());
    }

    #[test]
    fn test_help_toggles() {
        let mut app = app(Page::Industries);
        app.handle_action(Action::ToggleHelp);
        assert_eq!(app.mode, Mode::Help);
        app.handle_action(Action::ToggleHelp);
        assert_eq!(app.mode, Mode::Normal);
    }
}
