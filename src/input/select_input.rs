use crate::input::validators::Validator;
use crate::input::{Input, InputBase, InputId, KeyResult};
use crate::terminal::{KeyCode, KeyModifiers};
use crate::ui::span::Span;

pub struct SelectInput {
    base: InputBase,
    options: Vec<String>,
    selected: usize,
}

impl SelectInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            base: InputBase::new(id, label),
            options,
            selected: 0,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.base = self.base.with_validator(validator);
        self
    }

    /// Preselects `value` when it is one of the options.
    pub fn with_selected(mut self, value: &str) -> Self {
        self.set_value(value.to_string());
        self
    }

    fn current_option(&self) -> Option<&str> {
        self.options.get(self.selected).map(|s| s.as_str())
    }

    fn move_by(&mut self, delta: isize) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len() as isize;
        self.selected = ((self.selected as isize + delta + len) % len) as usize;
        self.base.error = None;
    }
}

impl Input for SelectInput {
    fn id(&self) -> &InputId {
        &self.base.id
    }

    fn label(&self) -> &str {
        &self.base.label
    }

    fn value(&self) -> String {
        self.current_option().unwrap_or("").to_string()
    }

    fn set_value(&mut self, value: String) {
        if let Some(pos) = self.options.iter().position(|opt| opt == &value) {
            self.selected = pos;
        }
    }

    fn error(&self) -> Option<&str> {
        self.base.error.as_deref()
    }

    fn set_error(&mut self, error: Option<String>) {
        self.base.error = error;
    }

    fn validators(&self) -> &[Validator] {
        &self.base.validators
    }

    fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> KeyResult {
        match code {
            KeyCode::Left | KeyCode::Up => {
                self.move_by(-1);
                KeyResult::Handled
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                self.move_by(1);
                KeyResult::Handled
            }
            KeyCode::Enter => KeyResult::Submit,
            _ => KeyResult::NotHandled,
        }
    }

    fn render_content(&self) -> Vec<Span> {
        match self.current_option() {
            Some(option) => vec![Span::new(format!("< {} >", option))],
            None => vec![Span::new("< no options >")],
        }
    }

    fn cursor_offset_in_content(&self) -> Option<usize> {
        None
    }
}
