//! Character-by-character text reveal.
//!
//! A [`Typewriter`] walks `Idle → Typing → Complete` on a single timer chain:
//! one timer for the initial delay, then one timer per character. The first
//! character appears `delay + speed` after start and the last one at
//! `delay + speed * len`. Empty text stays `Idle` and never schedules
//! anything. [`Typewriter::cancel`] parks an unfinished reveal in `Stopped`.
//!
//! Restarting (new text, new timing or an explicit replay) bumps a
//! generation counter and cancels the pending timer, so ticks from a previous
//! run can never write into the current one.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;

use crate::host::{Scheduler, TimerId};
use crate::signal::{Signal, Subscription};

/// Reveal state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    /// Waiting for the initial delay, or holding empty text
    Idle,
    Typing,
    Complete,
    /// Cancelled before finishing; the prefix stays as it was
    Stopped,
}

/// Reveal timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterOptions {
    /// Interval between characters
    pub speed: Duration,
    /// Pause before typing starts
    pub delay: Duration,
}

impl Default for TypewriterOptions {
    fn default() -> Self {
        Self {
            speed: Duration::from_millis(50),
            delay: Duration::from_millis(300),
        }
    }
}

impl TypewriterOptions {
    /// Build from signed milliseconds; negative values clamp to zero
    pub fn from_millis(speed_ms: i64, delay_ms: i64) -> Self {
        Self {
            speed: Duration::from_millis(speed_ms.max(0) as u64),
            delay: Duration::from_millis(delay_ms.max(0) as u64),
        }
    }
}

struct TypingState {
    text: Rc<str>,
    /// Byte offset just past each character
    ends: Vec<usize>,
    revealed: usize,
    phase: TypingPhase,
    options: TypewriterOptions,
    timer: Option<TimerId>,
    generation: u64,
    started_at: Duration,
}

impl TypingState {
    fn prefix(&self) -> String {
        let end = match self.revealed {
            0 => 0,
            n => self.ends[n - 1],
        };
        self.text[..end].to_string()
    }
}

enum Step {
    /// Keep going; reveal this prefix (if any) and tick again after `next`
    Continue { prefix: Option<String>, next: Duration },
    Finished { prefix: String },
}

/// Reveals a string one character at a time
pub struct Typewriter {
    scheduler: Rc<dyn Scheduler>,
    state: Rc<RefCell<TypingState>>,
    displayed: Signal<String>,
    complete: Signal<bool>,
}

impl Typewriter {
    /// Create and start revealing `text`
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        text: impl Into<String>,
        options: TypewriterOptions,
    ) -> Self {
        let text: String = text.into();
        let typewriter = Self {
            scheduler,
            state: Rc::new(RefCell::new(TypingState {
                ends: char_ends(&text),
                text: text.into(),
                revealed: 0,
                phase: TypingPhase::Idle,
                options,
                timer: None,
                generation: 0,
                started_at: Duration::ZERO,
            })),
            displayed: Signal::new(String::new()),
            complete: Signal::new(false),
        };
        typewriter.restart();
        typewriter
    }

    pub fn with_defaults(scheduler: Rc<dyn Scheduler>, text: impl Into<String>) -> Self {
        Self::new(scheduler, text, TypewriterOptions::default())
    }

    /// Replace the text. A different text restarts from scratch.
    pub fn set_text(&self, text: impl Into<String>) {
        let text: String = text.into();
        {
            let mut state = self.state.borrow_mut();
            if *state.text == *text {
                return;
            }
            state.ends = char_ends(&text);
            state.text = text.into();
        }
        self.restart();
    }

    /// Replace the timing. Different timing restarts from scratch.
    pub fn set_options(&self, options: TypewriterOptions) {
        {
            let mut state = self.state.borrow_mut();
            if state.options == options {
                return;
            }
            state.options = options;
        }
        self.restart();
    }

    /// Start over from an empty prefix, as if freshly created
    pub fn restart(&self) {
        let (generation, delay, empty, stale) = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.revealed = 0;
            state.phase = TypingPhase::Idle;
            state.started_at = self.scheduler.now();
            (
                state.generation,
                state.options.delay,
                state.text.is_empty(),
                state.timer.take(),
            )
        };
        if let Some(id) = stale {
            self.scheduler.cancel(id);
        }

        self.displayed.set(String::new());
        self.complete.set(false);

        if empty {
            debug!("typewriter holding empty text");
            return;
        }
        debug!(?delay, "typewriter started");
        arm(
            &self.scheduler,
            &self.state,
            &self.displayed,
            &self.complete,
            generation,
            delay,
        );
    }

    /// Stop revealing. The current prefix stays as it is.
    pub fn cancel(&self) {
        let stale = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            if state.phase != TypingPhase::Complete {
                state.phase = TypingPhase::Stopped;
            }
            state.timer.take()
        };
        if let Some(id) = stale {
            self.scheduler.cancel(id);
            debug!("typewriter cancelled");
        }
    }

    /// Currently revealed prefix
    pub fn displayed(&self) -> String {
        self.displayed.get()
    }

    pub fn displayed_signal(&self) -> Signal<String> {
        self.displayed.clone()
    }

    pub fn is_complete(&self) -> bool {
        self.complete.get()
    }

    pub fn phase(&self) -> TypingPhase {
        self.state.borrow().phase
    }

    /// Number of characters revealed so far
    pub fn revealed_chars(&self) -> usize {
        self.state.borrow().revealed
    }

    pub fn total_chars(&self) -> usize {
        self.state.borrow().ends.len()
    }

    /// Whether a timer is pending for this instance
    pub fn is_running(&self) -> bool {
        self.state.borrow().timer.is_some()
    }

    /// The caret shows while there is text left to type
    pub fn show_caret(&self) -> bool {
        let state = self.state.borrow();
        !state.text.is_empty() && matches!(state.phase, TypingPhase::Idle | TypingPhase::Typing)
    }

    /// Scheduler time at which the reveal finishes, if it ever does
    pub fn completes_at(&self) -> Option<Duration> {
        let state = self.state.borrow();
        if state.ends.is_empty() {
            return None;
        }
        let chars = u32::try_from(state.ends.len()).unwrap_or(u32::MAX);
        Some(state.started_at + state.options.delay + state.options.speed * chars)
    }

    pub fn subscribe(&self, listener: impl FnMut(&String) + 'static) -> Subscription {
        self.displayed.subscribe(listener)
    }

    /// Run `listener` when the reveal completes
    pub fn on_complete(&self, mut listener: impl FnMut() + 'static) -> Subscription {
        self.complete.subscribe(move |done| {
            if *done {
                listener();
            }
        })
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn char_ends(text: &str) -> Vec<usize> {
    text.char_indices().map(|(i, c)| i + c.len_utf8()).collect()
}

fn arm(
    scheduler: &Rc<dyn Scheduler>,
    state: &Rc<RefCell<TypingState>>,
    displayed: &Signal<String>,
    complete: &Signal<bool>,
    generation: u64,
    delay: Duration,
) {
    let callback = {
        let scheduler = Rc::downgrade(scheduler);
        let state = Rc::downgrade(state);
        let displayed = displayed.clone();
        let complete = complete.clone();
        Box::new(move || tick(scheduler, state, displayed, complete, generation))
    };
    let id = scheduler.schedule(delay, callback);

    let mut state = state.borrow_mut();
    if state.generation == generation {
        state.timer = Some(id);
    } else {
        drop(state);
        scheduler.cancel(id);
    }
}

fn tick(
    scheduler: Weak<dyn Scheduler>,
    state: Weak<RefCell<TypingState>>,
    displayed: Signal<String>,
    complete: Signal<bool>,
    generation: u64,
) {
    let (Some(scheduler), Some(state)) = (scheduler.upgrade(), state.upgrade()) else {
        return;
    };

    let step = {
        let Ok(mut s) = state.try_borrow_mut() else {
            return;
        };
        if s.generation != generation {
            return;
        }
        s.timer = None;
        match s.phase {
            TypingPhase::Idle => {
                s.phase = TypingPhase::Typing;
                Step::Continue {
                    prefix: None,
                    next: s.options.speed,
                }
            }
            TypingPhase::Typing => {
                s.revealed += 1;
                if s.revealed >= s.ends.len() {
                    s.phase = TypingPhase::Complete;
                    Step::Finished { prefix: s.prefix() }
                } else {
                    Step::Continue {
                        prefix: Some(s.prefix()),
                        next: s.options.speed,
                    }
                }
            }
            TypingPhase::Complete | TypingPhase::Stopped => return,
        }
    };

    match step {
        Step::Continue { prefix, next } => {
            // Arm before notifying so a listener that restarts us cancels it
            arm(&scheduler, &state, &displayed, &complete, generation, next);
            if let Some(prefix) = prefix {
                displayed.set(prefix);
            }
        }
        Step::Finished { prefix } => {
            displayed.set(prefix);
            // A listener may have restarted us on the final prefix
            if state.borrow().generation != generation {
                return;
            }
            complete.set(true);
            debug!(at = ?scheduler.now(), "typewriter complete");
        }
    }
}
