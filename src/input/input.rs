use crate::terminal::{KeyCode, KeyModifiers};
use crate::ui::span::Span;
use crate::input::validators::Validator;

pub type InputId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    Handled,
    NotHandled,
    Submit,
}

pub trait Input: Send {
    fn id(&self) -> &InputId;
    fn label(&self) -> &str;
    fn value(&self) -> String;
    fn set_value(&mut self, value: String);

    fn error(&self) -> Option<&str>;
    fn set_error(&mut self, error: Option<String>);

    fn validators(&self) -> &[Validator];

    fn validate(&self) -> Result<(), String> {
        for validator in self.validators() {
            validator(&self.value())?;
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyResult;

    fn render_content(&self) -> Vec<Span>;

    fn cursor_offset_in_content(&self) -> Option<usize>;

    fn delete_word(&mut self) {}
}

pub struct InputBase {
    pub id: InputId,
    pub label: String,
    pub error: Option<String>,
    pub validators: Vec<Validator>,
}

impl InputBase {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            error: None,
            validators: Vec::new(),
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }
}
