pub mod input;
pub mod password_input;
pub mod select_input;
pub mod text_input;
pub mod validators;

pub use input::{Input, InputBase, InputId, KeyResult};
pub use password_input::PasswordInput;
pub use select_input::SelectInput;
pub use text_input::TextInput;
