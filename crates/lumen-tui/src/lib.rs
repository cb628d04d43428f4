//! Terminal front end for the Lumen site.
//!
//! Pages are laid out as rows, tracked through [`viewport::TerminalViewport`]
//! and revealed by the trackers and typewriter from `lumen-core`, all driven
//! by one frame clock that [`App::advance`] steps.

pub mod app;
pub mod caret;
pub mod event;
pub mod input;
pub mod keymap;
pub mod layout;
pub mod page;
pub mod scroll;
pub mod theme;
pub mod themes;
pub mod viewport;
pub mod widgets;

pub use app::App;
pub use theme::Theme;
pub use themes::load_theme;
