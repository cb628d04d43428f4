//! Host facilities the reveal primitives are written against.
//!
//! Two capabilities are needed from the environment:
//!
//! - [`Scheduler`]: run a callback once after a delay, cancellable
//! - [`IntersectionHost`]: report when an element overlaps the viewport,
//!   cancellable
//!
//! Everything is single-threaded. Callbacks are invoked one at a time by the
//! host and hosts never hold internal borrows while a callback runs, so a
//! callback may schedule, cancel, observe or unobserve re-entrantly.

mod margin;
mod simulated;
mod tokio_scheduler;
mod virtual_clock;

use std::time::Duration;

pub use margin::{Length, RootMargin};
pub use simulated::SimulatedIntersections;
pub use tokio_scheduler::LocalTokioScheduler;
pub use virtual_clock::VirtualScheduler;

/// Identifier of a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Opaque handle to a renderable element owned by the page system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Identifier of a live intersection observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationId(pub u64);

pub type TimerCallback = Box<dyn FnOnce()>;
pub type IntersectionCallback = Box<dyn FnMut(IntersectionEntry)>;

/// Deferred-call facility
pub trait Scheduler {
    /// Time elapsed on this scheduler's clock
    fn now(&self) -> Duration;

    /// Run `callback` once, `delay` from now
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// Observation parameters handed to an [`IntersectionHost`]
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    /// Ratios in [0, 1] at which a report is delivered, sorted ascending
    pub thresholds: Vec<f64>,
    /// Expansion (or contraction) of the viewport
    pub margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            thresholds: vec![0.0],
            margin: RootMargin::default(),
        }
    }
}

/// One intersection report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the target, in [0, 1]
    pub ratio: f64,
}

/// Intersection-observation facility
pub trait IntersectionHost {
    /// Start observing `target`. Reports are delivered asynchronously.
    fn observe(
        &self,
        target: ElementId,
        options: &ObserverOptions,
        callback: IntersectionCallback,
    ) -> ObservationId;

    /// Stop an observation. No report is delivered for it afterwards.
    fn unobserve(&self, id: ObservationId);
}
