//! A mounted page: one visibility tracker per section plus the hero typewriter.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lumen_core::host::{ElementId, Scheduler};
use lumen_core::site::{Page, PageContent, Section};
use lumen_core::{Subscription, Typewriter, TypewriterOptions, VisibilityOptions, VisibilityTracker};
use tracing::debug;

use crate::layout::PageLayout;
use crate::viewport::TerminalViewport;

/// How long a section takes to fade in after it is revealed
pub const REVEAL_FADE: Duration = Duration::from_millis(400);

/// Typed-text progress for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedState {
    pub revealed: usize,
    pub caret: bool,
}

/// Per-section reveal times, shared with the tracker listeners
type RevealTimes = Rc<RefCell<Vec<Option<Duration>>>>;

pub struct PageView {
    page: Page,
    viewport: Rc<TerminalViewport>,
    elements: Vec<ElementId>,
    trackers: Vec<VisibilityTracker>,
    revealed_at: RevealTimes,
    typewriter: Rc<RefCell<Option<Typewriter>>>,
    _subscriptions: Vec<Subscription>,
}

impl PageView {
    /// Place every section in the viewport and start tracking it.
    ///
    /// The hero typewriter starts the first time the hero is revealed.
    #[allow(clippy::too_many_arguments)]
    pub fn mount(
        page: Page,
        content: &PageContent,
        layout: &PageLayout,
        viewport: Rc<TerminalViewport>,
        scheduler: Rc<dyn Scheduler>,
        next_element: &mut u64,
        reveal: &VisibilityOptions,
        typing: TypewriterOptions,
    ) -> Self {
        let count = content.sections.len();
        let revealed_at: RevealTimes = Rc::new(RefCell::new(vec![None; count]));
        let typewriter: Rc<RefCell<Option<Typewriter>>> = Rc::new(RefCell::new(None));
        let mut elements = Vec::with_capacity(count);
        let mut trackers = Vec::with_capacity(count);
        let mut subscriptions = Vec::with_capacity(count);

        for (index, section) in content.sections.iter().enumerate() {
            let id = ElementId(*next_element);
            *next_element += 1;
            if let Some(block) = layout.section_block(index) {
                viewport.place(id, block.span());
            }

            let tracker = VisibilityTracker::new(viewport.clone(), reveal.clone());
            let typed = match section {
                Section::Hero { tagline, .. } => Some(tagline.clone()),
                _ => None,
            };
            let times = revealed_at.clone();
            let slot = typewriter.clone();
            let clock = scheduler.clone();
            subscriptions.push(tracker.subscribe(move |&visible| {
                let mut times = times.borrow_mut();
                if !visible {
                    times[index] = None;
                    return;
                }
                if times[index].is_none() {
                    times[index] = Some(clock.now());
                }
                drop(times);

                if let Some(text) = &typed {
                    let mut slot = slot.borrow_mut();
                    if slot.is_none() {
                        debug!(section = index, "hero revealed, typing tagline");
                        *slot = Some(Typewriter::new(clock.clone(), text.as_str(), typing));
                    }
                }
            }));
            tracker.attach(id);

            elements.push(id);
            trackers.push(tracker);
        }

        debug!(page = %page, sections = count, "page mounted");
        Self {
            page,
            viewport,
            elements,
            trackers,
            revealed_at,
            typewriter,
            _subscriptions: subscriptions,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Move elements after the layout changed (resize)
    pub fn relayout(&self, layout: &PageLayout) {
        for (index, id) in self.elements.iter().enumerate() {
            match layout.section_block(index) {
                Some(block) => self.viewport.place(*id, block.span()),
                None => self.viewport.remove(*id),
            }
        }
    }

    pub fn is_revealed(&self, section: usize) -> bool {
        self.trackers
            .get(section)
            .is_some_and(VisibilityTracker::is_visible)
    }

    /// Fade-in progress of a section in [0, 1]
    pub fn reveal_progress(&self, section: usize, now: Duration) -> f64 {
        let Some(Some(at)) = self.revealed_at.borrow().get(section).copied() else {
            return 0.0;
        };
        if REVEAL_FADE.is_zero() {
            return 1.0;
        }
        (now.saturating_sub(at).as_secs_f64() / REVEAL_FADE.as_secs_f64()).min(1.0)
    }

    /// Whether any section is still fading in
    pub fn is_fading(&self, now: Duration) -> bool {
        (0..self.trackers.len()).any(|i| {
            let p = self.reveal_progress(i, now);
            p > 0.0 && p < 1.0
        })
    }

    pub fn revealed_count(&self) -> usize {
        self.trackers.iter().filter(|t| t.is_visible()).count()
    }

    pub fn section_count(&self) -> usize {
        self.trackers.len()
    }

    /// Progress of the hero tagline, `None` until typing has started
    pub fn typed(&self) -> Option<TypedState> {
        self.typewriter.borrow().as_ref().map(|tw| TypedState {
            revealed: tw.revealed_chars(),
            caret: tw.show_caret(),
        })
    }

    pub fn is_typing(&self) -> bool {
        self.typewriter
            .borrow()
            .as_ref()
            .is_some_and(|tw| !tw.is_complete() && tw.total_chars() > 0)
    }
}

impl Drop for PageView {
    fn drop(&mut self) {
        for tracker in &self.trackers {
            tracker.detach();
        }
        for id in &self.elements {
            self.viewport.remove(*id);
        }
        debug!(page = %self.page, "page unmounted");
    }
}
