//! Smooth scrolling driven by the frame clock.
//!
//! ## Pure helpers
//! - `easing` - easing curves mapping [0, 1] to [0, 1]
//! - `timing` - progress and interpolation
//! - `config` - duration helpers on the core `ScrollConfig`
//!
//! ## Controller
//! - `animation` - `ScrollAnimator`, fed the current clock reading each frame
//!
//! ```ignore
//! use lumen_tui::scroll::ScrollAnimator;
//!
//! let mut animator = ScrollAnimator::with_defaults();
//! animator.scroll_by(10, max_scroll);
//! // every frame
//! let scroll = animator.update(clock.now(), max_scroll);
//! ```

pub mod config;
pub mod easing;
pub mod timing;

pub mod animation;

pub use animation::ScrollAnimator;
pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::{EasingType, EasingTypeExt};
