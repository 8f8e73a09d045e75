use crate::input::text_input::TextInput;
use crate::input::validators::Validator;
use crate::input::{Input, InputId, KeyResult};
use crate::terminal::{KeyCode, KeyModifiers};
use crate::ui::span::Span;

/// Text input that renders one `*` per character.
pub struct PasswordInput {
    inner: TextInput,
}

impl PasswordInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            inner: TextInput::new(id, label),
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.inner = self.inner.with_validator(validator);
        self
    }

    fn masked(&self) -> String {
        "*".repeat(self.inner.value().chars().count())
    }
}

impl Input for PasswordInput {
    fn id(&self) -> &InputId {
        self.inner.id()
    }

    fn label(&self) -> &str {
        self.inner.label()
    }

    fn value(&self) -> String {
        self.inner.value()
    }

    fn set_value(&mut self, value: String) {
        self.inner.set_value(value);
    }

    fn error(&self) -> Option<&str> {
        self.inner.error()
    }

    fn set_error(&mut self, error: Option<String>) {
        self.inner.set_error(error);
    }

    fn validators(&self) -> &[Validator] {
        self.inner.validators()
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyResult {
        self.inner.handle_key(code, modifiers)
    }

    fn render_content(&self) -> Vec<Span> {
        vec![Span::new(self.masked())]
    }

    fn cursor_offset_in_content(&self) -> Option<usize> {
        Some(self.inner.cursor_pos())
    }

    fn delete_word(&mut self) {
        self.inner.delete_word();
    }
}
