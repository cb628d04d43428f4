pub mod config;
pub mod error;
pub mod host;
pub mod signal;
pub mod site;
pub mod typewriter;
pub mod visibility;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use signal::{Signal, Subscription};
pub use site::{Page, PageMeta, Site};
pub use typewriter::{Typewriter, TypewriterOptions, TypingPhase};
pub use visibility::{Threshold, VisibilityOptions, VisibilityTracker};
