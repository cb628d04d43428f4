//! Viewport visibility tracking.
//!
//! A [`VisibilityTracker`] watches one element through an
//! [`IntersectionHost`] and exposes whether it has entered the viewport as a
//! [`Signal<bool>`]. One-shot trackers (`once = true`, the default) latch on
//! the first positive report and stop observing.
//!
//! Every observation carries a generation number. Reports arriving for a
//! generation other than the active one are ignored, so a host that delivers
//! a late report after `unobserve` cannot touch a detached or re-configured
//! tracker.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::host::{
    ElementId, IntersectionEntry, IntersectionHost, ObservationId, ObserverOptions, RootMargin,
};
use crate::signal::{Signal, Subscription};

/// Sorted set of ratios in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold(Vec<f64>);

impl Threshold {
    pub fn single(value: f64) -> Self {
        Self::many([value])
    }

    /// Build from any list of ratios. Values are clamped to [0, 1], NaN
    /// becomes 0, duplicates are removed. An empty list means `[0.0]`.
    pub fn many(values: impl IntoIterator<Item = f64>) -> Self {
        let mut values: Vec<f64> = values
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) })
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        if values.is_empty() {
            values.push(0.0);
        }
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::single(0.1)
    }
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Self::single(value)
    }
}

/// Tracker configuration
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityOptions {
    pub threshold: Threshold,
    pub margin: RootMargin,
    pub once: bool,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            margin: RootMargin::default(),
            once: true,
        }
    }
}

impl VisibilityOptions {
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            thresholds: self.threshold.values().to_vec(),
            margin: self.margin,
        }
    }
}

struct TrackerState {
    options: VisibilityOptions,
    element: Option<ElementId>,
    observation: Option<ObservationId>,
    /// Generation whose reports are currently accepted
    active: Option<u64>,
    generation: u64,
}

/// Reports whether one element has entered the viewport
pub struct VisibilityTracker {
    host: Rc<dyn IntersectionHost>,
    state: Rc<RefCell<TrackerState>>,
    visible: Signal<bool>,
}

impl VisibilityTracker {
    pub fn new(host: Rc<dyn IntersectionHost>, options: VisibilityOptions) -> Self {
        Self {
            host,
            state: Rc::new(RefCell::new(TrackerState {
                options,
                element: None,
                observation: None,
                active: None,
                generation: 0,
            })),
            visible: Signal::new(false),
        }
    }

    pub fn with_defaults(host: Rc<dyn IntersectionHost>) -> Self {
        Self::new(host, VisibilityOptions::default())
    }

    /// Start observing `element`.
    ///
    /// `None` is a no-op. Attaching to a different element replaces the
    /// current observation.
    pub fn attach(&self, element: impl Into<Option<ElementId>>) {
        let Some(element) = element.into() else {
            return;
        };

        {
            let state = self.state.borrow();
            if state.element == Some(element) && state.active.is_some() {
                return;
            }
        }

        self.stop_observing();
        self.state.borrow_mut().element = Some(element);
        debug!(?element, "visibility tracker attached");
        self.start_observing();
    }

    /// Stop observing and forget the element
    pub fn detach(&self) {
        self.stop_observing();
        if let Some(element) = self.state.borrow_mut().element.take() {
            debug!(?element, "visibility tracker detached");
        }
    }

    /// Replace the configuration, restarting the observation if it changed
    pub fn set_options(&self, options: VisibilityOptions) {
        if self.state.borrow().options == options {
            return;
        }
        self.stop_observing();
        let has_element = {
            let mut state = self.state.borrow_mut();
            state.options = options;
            state.element.is_some()
        };
        if has_element {
            self.start_observing();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Shared handle to the visibility signal
    pub fn visible(&self) -> Signal<bool> {
        self.visible.clone()
    }

    pub fn subscribe(&self, listener: impl FnMut(&bool) + 'static) -> Subscription {
        self.visible.subscribe(listener)
    }

    /// Whether a host observation is currently live
    pub fn is_observing(&self) -> bool {
        self.state.borrow().active.is_some()
    }

    pub fn element(&self) -> Option<ElementId> {
        self.state.borrow().element
    }

    pub fn options(&self) -> VisibilityOptions {
        self.state.borrow().options.clone()
    }

    fn start_observing(&self) {
        let (element, generation, observer_options) = {
            let mut state = self.state.borrow_mut();
            let Some(element) = state.element else {
                return;
            };
            // A latched one-shot tracker never observes again
            if state.options.once && self.visible.get() {
                return;
            }
            state.generation += 1;
            state.active = Some(state.generation);
            (element, state.generation, state.options.observer_options())
        };

        let callback = report_handler(
            Rc::downgrade(&self.state),
            Rc::downgrade(&self.host),
            self.visible.clone(),
            generation,
        );
        let id = self.host.observe(element, &observer_options, callback);

        let still_active = {
            let mut state = self.state.borrow_mut();
            if state.active == Some(generation) {
                state.observation = Some(id);
                true
            } else {
                false
            }
        };
        // A host may report synchronously from `observe`; a one-shot tracker
        // can already have latched and stopped before the id was known.
        if !still_active {
            self.host.unobserve(id);
        }
    }

    fn stop_observing(&self) {
        let observation = {
            let mut state = self.state.borrow_mut();
            state.active = None;
            state.observation.take()
        };
        if let Some(id) = observation {
            self.host.unobserve(id);
        }
    }
}

fn report_handler(
    state: Weak<RefCell<TrackerState>>,
    host: Weak<dyn IntersectionHost>,
    visible: Signal<bool>,
    generation: u64,
) -> Box<dyn FnMut(IntersectionEntry)> {
    Box::new(move |entry: IntersectionEntry| {
        let Some(state) = state.upgrade() else {
            return;
        };

        let (once, finished) = {
            let Ok(mut state) = state.try_borrow_mut() else {
                return;
            };
            if state.active != Some(generation) {
                return;
            }
            let once = state.options.once;
            if entry.is_intersecting && once {
                state.active = None;
                (once, state.observation.take())
            } else {
                (once, None)
            }
        };

        if let Some(id) = finished {
            if let Some(host) = host.upgrade() {
                host.unobserve(id);
            }
        }

        if entry.is_intersecting {
            if visible.set(true) {
                debug!(target = ?entry.target, ratio = entry.ratio, "element entered viewport");
            }
        } else if !once {
            visible.set(false);
        }
    })
}

impl Drop for VisibilityTracker {
    fn drop(&mut self) {
        self.stop_observing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{IntersectionCallback, SimulatedIntersections};
    use proptest::prelude::*;
    use std::cell::Cell;

    fn setup(options: VisibilityOptions) -> (Rc<SimulatedIntersections>, VisibilityTracker) {
        let host = Rc::new(SimulatedIntersections::new());
        let tracker = VisibilityTracker::new(host.clone(), options);
        (host, tracker)
    }

    const EL: ElementId = ElementId(1);

    #[test]
    fn test_default_options() {
        let options = VisibilityOptions::default();
        assert_eq!(options.threshold.values(), &[0.1]);
        assert!(options.margin.is_zero());
        assert!(options.once);
    }

    #[test]
    fn test_threshold_normalized() {
        let t = Threshold::many([1.5, 0.5, -1.0, 0.5, f64::NAN]);
        assert_eq!(t.values(), &[0.0, 0.5, 1.0]);
        assert_eq!(Threshold::many([]).values(), &[0.0]);
    }

    #[test]
    fn test_attach_none_is_noop() {
        let (host, tracker) = setup(VisibilityOptions::default());
        tracker.attach(None);
        assert_eq!(host.active(), 0);
        assert!(!tracker.is_observing());
        assert_eq!(tracker.element(), None);
    }

    #[test]
    fn test_once_latches_and_stops_observing() {
        let (host, tracker) = setup(VisibilityOptions::default());
        tracker.attach(EL);
        assert!(host.is_observed(EL));
        assert!(!tracker.is_visible());

        host.emit(EL, true);
        assert!(tracker.is_visible());
        assert!(!tracker.is_observing());
        assert_eq!(host.active(), 0);

        host.emit(EL, false);
        assert!(tracker.is_visible());
    }

    #[test]
    fn test_once_ignores_leave_before_enter() {
        let (host, tracker) = setup(VisibilityOptions::default());
        tracker.attach(EL);
        host.emit(EL, false);
        assert!(!tracker.is_visible());
        assert!(tracker.is_observing());
    }

    #[test]
    fn test_continuous_tracks_latest() {
        let (host, tracker) = setup(VisibilityOptions {
            once: false,
            ..Default::default()
        });
        tracker.attach(EL);

        host.emit(EL, true);
        assert!(tracker.is_visible());
        host.emit(EL, false);
        assert!(!tracker.is_visible());
        host.emit(EL, true);
        host.emit(EL, true);
        assert!(tracker.is_visible());
        assert!(tracker.is_observing());
    }

    #[test]
    fn test_half_threshold_flips_exactly_once() {
        let (host, tracker) = setup(VisibilityOptions {
            threshold: Threshold::single(0.5),
            ..Default::default()
        });
        let flips = Rc::new(Cell::new(0));
        let f = flips.clone();
        let _sub = tracker.subscribe(move |_| f.set(f.get() + 1));

        tracker.attach(EL);
        assert_eq!(host.options_for(EL).unwrap().thresholds, vec![0.5]);

        host.emit(EL, true);
        assert!(tracker.is_visible());
        assert_eq!(flips.get(), 1);

        host.emit(EL, true);
        assert_eq!(flips.get(), 1);
    }

    #[test]
    fn test_detach_cancels_observation() {
        let (host, tracker) = setup(VisibilityOptions {
            once: false,
            ..Default::default()
        });
        tracker.attach(EL);
        tracker.detach();
        assert_eq!(host.active(), 0);
        host.emit(EL, true);
        assert!(!tracker.is_visible());
    }

    #[test]
    fn test_drop_cancels_observation() {
        let host = Rc::new(SimulatedIntersections::new());
        {
            let tracker = VisibilityTracker::with_defaults(host.clone());
            tracker.attach(EL);
            assert_eq!(host.active(), 1);
        }
        assert_eq!(host.active(), 0);
    }

    #[test]
    fn test_reconfigure_replaces_observation() {
        let (host, tracker) = setup(VisibilityOptions::default());
        tracker.attach(EL);

        let margin: RootMargin = "20px".parse().unwrap();
        tracker.set_options(VisibilityOptions {
            margin,
            once: false,
            ..Default::default()
        });

        assert_eq!(host.active(), 1);
        assert_eq!(host.options_for(EL).unwrap().margin, margin);

        host.emit(EL, true);
        host.emit(EL, false);
        assert!(!tracker.is_visible());
    }

    #[test]
    fn test_same_options_keep_observation() {
        let (host, tracker) = setup(VisibilityOptions::default());
        tracker.attach(EL);
        tracker.set_options(VisibilityOptions::default());
        tracker.attach(EL);
        assert_eq!(host.active(), 1);
    }

    #[test]
    fn test_latched_once_tracker_does_not_reobserve() {
        let (host, tracker) = setup(VisibilityOptions::default());
        tracker.attach(EL);
        host.emit(EL, true);

        tracker.set_options(VisibilityOptions {
            threshold: Threshold::single(0.9),
            ..Default::default()
        });
        assert_eq!(host.active(), 0);
        assert!(tracker.is_visible());
    }

    /// Host that keeps every callback forever, even after `unobserve`
    #[derive(Default)]
    struct LeakyHost {
        callbacks: RefCell<Vec<Rc<RefCell<IntersectionCallback>>>>,
        next: Cell<u64>,
    }

    impl LeakyHost {
        fn emit_all(&self, is_intersecting: bool) {
            let callbacks = self.callbacks.borrow().clone();
            for cb in callbacks {
                (&mut *cb.borrow_mut())(IntersectionEntry {
                    target: EL,
                    is_intersecting,
                    ratio: if is_intersecting { 1.0 } else { 0.0 },
                });
            }
        }
    }

    impl IntersectionHost for LeakyHost {
        fn observe(
            &self,
            _target: ElementId,
            _options: &ObserverOptions,
            callback: IntersectionCallback,
        ) -> ObservationId {
            self.callbacks
                .borrow_mut()
                .push(Rc::new(RefCell::new(callback)));
            let id = self.next.get();
            self.next.set(id + 1);
            ObservationId(id)
        }

        fn unobserve(&self, _id: ObservationId) {}
    }

    #[test]
    fn test_stale_reports_after_detach_are_ignored() {
        let host = Rc::new(LeakyHost::default());
        let tracker = VisibilityTracker::new(
            host.clone(),
            VisibilityOptions {
                once: false,
                ..Default::default()
            },
        );
        tracker.attach(EL);
        tracker.detach();

        host.emit_all(true);
        assert!(!tracker.is_visible());
    }

    #[test]
    fn test_stale_config_reports_are_ignored() {
        let host = Rc::new(LeakyHost::default());
        let tracker = VisibilityTracker::new(
            host.clone(),
            VisibilityOptions {
                once: false,
                ..Default::default()
            },
        );
        tracker.attach(EL);
        tracker.set_options(VisibilityOptions {
            once: false,
            threshold: Threshold::single(0.75),
            ..Default::default()
        });

        // Both the old and the new callback receive the report; only the new
        // one may write, so the value is the same either way. Detach the new
        // generation and confirm the old one stays dead.
        host.emit_all(true);
        assert!(tracker.is_visible());
        tracker.detach();
        host.emit_all(false);
        assert!(tracker.is_visible());
    }

    /// Host that reports synchronously from inside `observe`
    #[derive(Default)]
    struct EagerHost {
        unobserved: RefCell<Vec<ObservationId>>,
    }

    impl IntersectionHost for EagerHost {
        fn observe(
            &self,
            target: ElementId,
            _options: &ObserverOptions,
            mut callback: IntersectionCallback,
        ) -> ObservationId {
            callback(IntersectionEntry {
                target,
                is_intersecting: true,
                ratio: 1.0,
            });
            ObservationId(42)
        }

        fn unobserve(&self, id: ObservationId) {
            self.unobserved.borrow_mut().push(id);
        }
    }

    #[test]
    fn test_synchronous_report_still_unobserves() {
        let host = Rc::new(EagerHost::default());
        let tracker = VisibilityTracker::with_defaults(host.clone());
        tracker.attach(EL);

        assert!(tracker.is_visible());
        assert!(!tracker.is_observing());
        assert_eq!(*host.unobserved.borrow(), vec![ObservationId(42)]);
    }

    proptest! {
        #[test]
        fn continuous_tracker_matches_last_report(reports in proptest::collection::vec(any::<bool>(), 1..40)) {
            let (host, tracker) = setup(VisibilityOptions { once: false, ..Default::default() });
            tracker.attach(EL);
            for r in &reports {
                host.emit(EL, *r);
                prop_assert_eq!(tracker.is_visible(), *r);
            }
        }

        #[test]
        fn once_tracker_never_unlatches(reports in proptest::collection::vec(any::<bool>(), 0..40)) {
            let (host, tracker) = setup(VisibilityOptions::default());
            tracker.attach(EL);
            let mut seen_true = false;
            for r in &reports {
                host.emit(EL, *r);
                seen_true |= *r;
                prop_assert_eq!(tracker.is_visible(), seen_true);
            }
        }
    }
}
