pub mod renderer;
pub mod scroll;
pub mod span;
pub mod style;
pub mod theme;
pub mod view;
