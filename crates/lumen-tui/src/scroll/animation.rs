//! Scroll animation controller.
//!
//! Time comes from the caller: every `update` passes the current clock
//! reading, and animations started between updates begin at the last reading.
//! The page uses the same virtual clock for scrolling, typing and reveals, so
//! all three stay in step.

use std::time::Duration;

use super::config::{ScrollConfig, ScrollConfigExt};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp_u16, progress};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Duration,
    from: u16,
    to: u16,
    duration: Duration,
    easing: EasingType,
}

/// Eases the page scroll offset towards a target.
///
/// Deltas from `scroll_by` are batched until the next `update`, so a burst of
/// key repeats becomes one animation.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current_scroll: u16,
    pending_delta: i32,
    /// Clock reading at the last update
    clock: Duration,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn set_config(&mut self, config: ScrollConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Animation running or deltas waiting; the caller should draw at full frame rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Where the scroll ends up once the animation finishes
    pub fn target_scroll(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current_scroll)
    }

    #[inline]
    pub fn current_scroll(&self) -> u16 {
        self.current_scroll
    }

    /// Jump without animating
    pub fn set_scroll(&mut self, scroll: u16) {
        self.animation = None;
        self.current_scroll = scroll;
        self.pending_delta = 0;
    }

    /// Animate to an absolute position
    pub fn scroll_to(&mut self, target: u16, max_scroll: u16) {
        let target = target.min(max_scroll);
        self.pending_delta = 0;

        if !self.config.is_smooth() || target == self.current_scroll {
            self.current_scroll = target;
            self.animation = None;
            return;
        }

        self.start_animation(target);
    }

    /// Scroll by a delta (positive = down)
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        if !self.config.is_smooth() {
            self.current_scroll = clamp_offset(i32::from(self.current_scroll) + delta, max_scroll);
            self.animation = None;
            return;
        }
        self.pending_delta += delta;
    }

    pub fn scroll_down(&mut self, max_scroll: u16) {
        self.scroll_by(i32::from(self.config.scroll_lines.max(1)), max_scroll);
    }

    pub fn scroll_up(&mut self, max_scroll: u16) {
        self.scroll_by(-i32::from(self.config.scroll_lines.max(1)), max_scroll);
    }

    pub fn scroll_half_page_down(&mut self, viewport_height: u16, max_scroll: u16) {
        self.scroll_by(i32::from((viewport_height / 2).max(1)), max_scroll);
    }

    pub fn scroll_half_page_up(&mut self, viewport_height: u16, max_scroll: u16) {
        self.scroll_by(-i32::from((viewport_height / 2).max(1)), max_scroll);
    }

    pub fn scroll_full_page_down(&mut self, viewport_height: u16, max_scroll: u16) {
        self.scroll_by(i32::from(viewport_height.max(1)), max_scroll);
    }

    pub fn scroll_full_page_up(&mut self, viewport_height: u16, max_scroll: u16) {
        self.scroll_by(-i32::from(viewport_height.max(1)), max_scroll);
    }

    /// Advance to clock reading `now` and return the scroll offset to draw
    pub fn update(&mut self, now: Duration, max_scroll: u16) -> u16 {
        self.clock = self.clock.max(now);

        if self.pending_delta != 0 {
            let target = clamp_offset(
                i32::from(self.target_scroll()) + self.pending_delta,
                max_scroll,
            );
            self.pending_delta = 0;
            if target != self.current_scroll {
                self.start_animation(target);
            }
        }

        if let Some(anim) = &self.animation {
            if is_complete(anim.start, self.clock, anim.duration) {
                self.current_scroll = anim.to.min(max_scroll);
                self.animation = None;
            } else {
                let t = anim.easing.apply(progress(anim.start, self.clock, anim.duration));
                self.current_scroll = lerp_u16(anim.from, anim.to, t).min(max_scroll);
            }
        }

        self.current_scroll = self.current_scroll.min(max_scroll);
        self.current_scroll
    }

    fn start_animation(&mut self, target: u16) {
        self.animation = Some(ActiveAnimation {
            start: self.clock,
            from: self.current_scroll,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
    }

    /// Stop where we are
    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0;
    }

    pub fn reset(&mut self) {
        self.animation = None;
        self.current_scroll = 0;
        self.pending_delta = 0;
    }
}

fn clamp_offset(value: i32, max_scroll: u16) -> u16 {
    value.clamp(0, i32::from(max_scroll)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn linear(duration_ms: u64) -> ScrollAnimator {
        ScrollAnimator::new(ScrollConfig {
            animation_duration_ms: duration_ms,
            easing: EasingType::Linear,
            ..Default::default()
        })
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let mut animator = ScrollAnimator::new(ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        });

        animator.scroll_to(100, 200);
        assert_eq!(animator.current_scroll(), 100);
        assert!(!animator.is_animating());

        animator.scroll_by(-150, 200);
        assert_eq!(animator.current_scroll(), 0);
    }

    #[test]
    fn test_animation_follows_clock() {
        let mut animator = linear(100);
        animator.update(ms(1000), 500);
        animator.scroll_to(40, 500);
        assert!(animator.is_animating());

        assert_eq!(animator.update(ms(1050), 500), 20);
        assert_eq!(animator.update(ms(1100), 500), 40);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_scroll_by_batching() {
        let mut animator = linear(100);
        animator.scroll_by(10, 200);
        animator.scroll_by(10, 200);
        animator.scroll_by(10, 200);

        animator.update(ms(0), 200);
        assert_eq!(animator.target_scroll(), 30);
        assert!(animator.is_animating());
    }

    #[test]
    fn test_retarget_mid_animation() {
        let mut animator = linear(100);
        animator.scroll_by(20, 200);
        animator.update(ms(0), 200);
        animator.update(ms(50), 200);
        assert_eq!(animator.current_scroll(), 10);

        animator.scroll_by(20, 200);
        animator.update(ms(50), 200);
        assert_eq!(animator.target_scroll(), 40);
        animator.update(ms(150), 200);
        assert_eq!(animator.current_scroll(), 40);
    }

    #[test]
    fn test_scroll_clamp_max() {
        let mut animator = ScrollAnimator::with_defaults();
        animator.set_scroll(50);
        animator.scroll_to(300, 100);
        animator.update(ms(10_000), 100);
        assert_eq!(animator.current_scroll(), 100);
    }

    #[test]
    fn test_shrinking_page_clamps_current() {
        let mut animator = ScrollAnimator::with_defaults();
        animator.set_scroll(80);
        assert_eq!(animator.update(ms(0), 30), 30);
    }
}
