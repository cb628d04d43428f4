//! Intersection observation over terminal rows.
//!
//! Elements are vertical spans of page rows. The viewport is the window of
//! rows currently on screen, grown or shrunk by the observation's root margin
//! (px count as rows, percentages are of the viewport height, left and right
//! are ignored). Reports go out from [`TerminalViewport::evaluate`], once
//! right after an observation starts and then whenever the number of crossed
//! thresholds changes.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use lumen_core::host::{
    ElementId, IntersectionCallback, IntersectionEntry, IntersectionHost, ObservationId,
    ObserverOptions, RootMargin,
};
use tracing::trace;

/// Rows an element occupies on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub top: u16,
    pub height: u16,
}

struct Observation {
    target: ElementId,
    options: ObserverOptions,
    callback: Rc<RefCell<IntersectionCallback>>,
    /// Crossed-threshold count at the last report
    crossed: Option<usize>,
}

#[derive(Default)]
struct ViewportState {
    scroll: u16,
    height: u16,
    elements: HashMap<ElementId, RowSpan>,
    next_id: u64,
    observations: BTreeMap<u64, Observation>,
}

#[derive(Default)]
pub struct TerminalViewport {
    state: RefCell<ViewportState>,
}

impl TerminalViewport {
    pub fn new(height: u16) -> Self {
        let viewport = Self::default();
        viewport.set_height(height);
        viewport
    }

    pub fn set_scroll(&self, scroll: u16) {
        self.state.borrow_mut().scroll = scroll;
    }

    pub fn set_height(&self, height: u16) {
        self.state.borrow_mut().height = height;
    }

    pub fn scroll(&self) -> u16 {
        self.state.borrow().scroll
    }

    pub fn height(&self) -> u16 {
        self.state.borrow().height
    }

    /// Set or move an element's rows
    pub fn place(&self, id: ElementId, span: RowSpan) {
        self.state.borrow_mut().elements.insert(id, span);
    }

    pub fn remove(&self, id: ElementId) {
        self.state.borrow_mut().elements.remove(&id);
    }

    /// Number of live observations
    pub fn active(&self) -> usize {
        self.state.borrow().observations.len()
    }

    /// Recompute every observation and deliver the reports that are due.
    ///
    /// Returns the number of callbacks that ran.
    pub fn evaluate(&self) -> usize {
        let due: Vec<(u64, Rc<RefCell<IntersectionCallback>>, IntersectionEntry)> = {
            let mut state = self.state.borrow_mut();
            let ViewportState {
                scroll,
                height,
                elements,
                observations,
                ..
            } = &mut *state;

            observations
                .iter_mut()
                .filter_map(|(id, observation)| {
                    let span = elements.get(&observation.target)?;
                    let ratio =
                        intersection_ratio(*span, *scroll, *height, &observation.options.margin);
                    let crossed = crossed_thresholds(ratio, &observation.options.thresholds);
                    if observation.crossed == Some(crossed) {
                        return None;
                    }
                    observation.crossed = Some(crossed);
                    let entry = IntersectionEntry {
                        target: observation.target,
                        is_intersecting: crossed > 0,
                        ratio,
                    };
                    Some((*id, Rc::clone(&observation.callback), entry))
                })
                .collect()
        };

        let mut delivered = 0;
        for (id, callback, entry) in due {
            // An earlier callback may have ended this observation
            if !self.state.borrow().observations.contains_key(&id) {
                continue;
            }
            trace!(target = entry.target.0, ratio = entry.ratio, "intersection report");
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut *callback)(entry);
                delivered += 1;
            }
        }
        delivered
    }
}

impl IntersectionHost for TerminalViewport {
    fn observe(
        &self,
        target: ElementId,
        options: &ObserverOptions,
        callback: IntersectionCallback,
    ) -> ObservationId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.observations.insert(
            id,
            Observation {
                target,
                options: options.clone(),
                callback: Rc::new(RefCell::new(callback)),
                crossed: None,
            },
        );
        ObservationId(id)
    }

    fn unobserve(&self, id: ObservationId) {
        self.state.borrow_mut().observations.remove(&id.0);
    }
}

/// Fraction of `span` inside the margin-adjusted viewport
pub fn intersection_ratio(span: RowSpan, scroll: u16, height: u16, margin: &RootMargin) -> f64 {
    let viewport = f64::from(height);
    let region_top = f64::from(scroll) - margin.top.resolve(viewport);
    let region_bottom = f64::from(scroll) + viewport + margin.bottom.resolve(viewport);

    let top = f64::from(span.top);
    if span.height == 0 {
        return if top >= region_top && top < region_bottom {
            1.0
        } else {
            0.0
        };
    }
    let bottom = top + f64::from(span.height);
    let overlap = (bottom.min(region_bottom) - top.max(region_top)).max(0.0);
    (overlap / f64::from(span.height)).clamp(0.0, 1.0)
}

/// How many thresholds `ratio` has crossed. A zero threshold needs some overlap.
fn crossed_thresholds(ratio: f64, thresholds: &[f64]) -> usize {
    thresholds
        .iter()
        .filter(|&&t| if t == 0.0 { ratio > 0.0 } else { ratio >= t })
        .count()
}
