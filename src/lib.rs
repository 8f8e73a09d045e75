pub mod api;
pub mod config;
pub mod core;
pub mod input;
pub mod logging;
pub mod session;
pub mod task;
pub mod terminal;
pub mod ui;

pub use crate::core::action_bindings;
pub use crate::core::app;
pub use crate::core::event;
pub use crate::core::event_queue;
pub use crate::core::reducer;
pub use crate::core::state;
pub use crate::core::tree;

pub use crate::input::password_input;
pub use crate::input::select_input;
pub use crate::input::text_input;
pub use crate::input::validators;

pub use crate::terminal::input_event;
pub use crate::terminal::terminal_event;

pub use crate::ui::renderer;
pub use crate::ui::span;
pub use crate::ui::style;
pub use crate::ui::theme;
pub use crate::ui::view;
