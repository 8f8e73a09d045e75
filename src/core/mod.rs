pub mod action_bindings;
pub mod app;
pub mod editor;
pub mod event;
pub mod event_queue;
pub mod focus;
pub mod panel;
pub mod reducer;
pub mod state;
pub mod tree;
