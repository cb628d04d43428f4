use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{
    ElementId, IntersectionCallback, IntersectionEntry, IntersectionHost, ObservationId,
    ObserverOptions,
};

struct Observation {
    target: ElementId,
    options: ObserverOptions,
    callback: Rc<RefCell<IntersectionCallback>>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    observations: BTreeMap<u64, Observation>,
}

/// Intersection host whose reports are scripted by the caller.
///
/// Nothing is delivered on `observe`; reports only go out when
/// [`emit`](Self::emit) or [`emit_ratio`](Self::emit_ratio) is called.
#[derive(Default)]
pub struct SimulatedIntersections {
    registry: RefCell<Registry>,
}

impl SimulatedIntersections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a report to every live observation of `target`.
    ///
    /// Returns how many callbacks ran.
    pub fn emit(&self, target: ElementId, is_intersecting: bool) -> usize {
        let ratio = if is_intersecting { 1.0 } else { 0.0 };
        self.deliver(target, |_| IntersectionEntry {
            target,
            is_intersecting,
            ratio,
        })
    }

    /// Deliver a report computed from a visible ratio and each observation's
    /// smallest threshold.
    pub fn emit_ratio(&self, target: ElementId, ratio: f64) -> usize {
        let ratio = ratio.clamp(0.0, 1.0);
        self.deliver(target, |options| {
            let min = options.thresholds.first().copied().unwrap_or(0.0);
            let is_intersecting = if min == 0.0 { ratio > 0.0 } else { ratio >= min };
            IntersectionEntry {
                target,
                is_intersecting,
                ratio,
            }
        })
    }

    fn deliver(
        &self,
        target: ElementId,
        entry_for: impl Fn(&ObserverOptions) -> IntersectionEntry,
    ) -> usize {
        let ids: Vec<u64> = self
            .registry
            .borrow()
            .observations
            .iter()
            .filter(|(_, o)| o.target == target)
            .map(|(id, _)| *id)
            .collect();

        let mut delivered = 0;
        for id in ids {
            let (callback, entry) = {
                let registry = self.registry.borrow();
                let Some(observation) = registry.observations.get(&id) else {
                    continue;
                };
                (
                    Rc::clone(&observation.callback),
                    entry_for(&observation.options),
                )
            };
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut *callback)(entry);
                delivered += 1;
            };
        }
        delivered
    }

    /// Number of live observations
    pub fn active(&self) -> usize {
        self.registry.borrow().observations.len()
    }

    pub fn is_observed(&self, target: ElementId) -> bool {
        self.registry
            .borrow()
            .observations
            .values()
            .any(|o| o.target == target)
    }

    /// Options of the most recent live observation of `target`
    pub fn options_for(&self, target: ElementId) -> Option<ObserverOptions> {
        self.registry
            .borrow()
            .observations
            .values()
            .rev()
            .find(|o| o.target == target)
            .map(|o| o.options.clone())
    }
}

impl IntersectionHost for SimulatedIntersections {
    fn observe(
        &self,
        target: ElementId,
        options: &ObserverOptions,
        callback: IntersectionCallback,
    ) -> ObservationId {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.observations.insert(
            id,
            Observation {
                target,
                options: options.clone(),
                callback: Rc::new(RefCell::new(callback)),
            },
        );
        ObservationId(id)
    }

    fn unobserve(&self, id: ObservationId) {
        self.registry.borrow_mut().observations.remove(&id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_only_target() {
        let host = SimulatedIntersections::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        host.observe(
            ElementId(1),
            &ObserverOptions::default(),
            Box::new(move |_| h.set(h.get() + 1)),
        );

        assert_eq!(host.emit(ElementId(2), true), 0);
        assert_eq!(host.emit(ElementId(1), true), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_unobserve_stops_delivery() {
        let host = SimulatedIntersections::new();
        let id = host.observe(ElementId(1), &ObserverOptions::default(), Box::new(|_| {}));
        assert!(host.is_observed(ElementId(1)));
        host.unobserve(id);
        assert_eq!(host.active(), 0);
        assert_eq!(host.emit(ElementId(1), true), 0);
    }

    #[test]
    fn test_emit_ratio_respects_threshold() {
        let host = SimulatedIntersections::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let options = ObserverOptions {
            thresholds: vec![0.5],
            ..Default::default()
        };
        host.observe(
            ElementId(7),
            &options,
            Box::new(move |e| s.borrow_mut().push(e.is_intersecting)),
        );

        host.emit_ratio(ElementId(7), 0.25);
        host.emit_ratio(ElementId(7), 0.5);
        assert_eq!(*seen.borrow(), vec![false, true]);
    }
}
