use crate::api::{Part, PartUpdate};
use crate::core::editor::{EditState, PartField};
use crate::input::validators;
use crate::input::{Input, KeyResult, SelectInput, TextInput};
use crate::terminal::KeyEvent;

pub const NO_STATUSES_MESSAGE: &str = "No allowable statuses for this part";

/// Detail panel of an expanded node: the retained part record plus one
/// editor per mutable field.
pub struct PartPanel {
    part: Part,
    unit: EditState<TextInput>,
    status: EditState<SelectInput>,
}

/// Read-only projection of a field editor for rendering.
pub enum FieldView<'a> {
    Viewing(&'a str),
    Preparing(&'a str),
    Editing(&'a dyn Input),
    Submitting(&'a dyn Input),
}

impl PartPanel {
    pub fn new(part: Part) -> Self {
        Self {
            part,
            unit: EditState::Viewing,
            status: EditState::Viewing,
        }
    }

    pub fn part(&self) -> &Part {
        &self.part
    }

    pub fn is_busy(&self) -> bool {
        !self.unit.is_viewing() || !self.status.is_viewing()
    }

    pub fn is_editing(&self, field: PartField) -> bool {
        match field {
            PartField::Unit => self.unit.is_editing(),
            PartField::Status => self.status.is_editing(),
        }
    }

    pub fn is_preparing(&self, field: PartField) -> bool {
        match field {
            PartField::Unit => self.unit.is_preparing(),
            PartField::Status => self.status.is_preparing(),
        }
    }

    pub fn is_viewing(&self, field: PartField) -> bool {
        match field {
            PartField::Unit => self.unit.is_viewing(),
            PartField::Status => self.status.is_viewing(),
        }
    }

    pub fn field_view(&self, field: PartField) -> FieldView<'_> {
        let current = field.value_of(&self.part);
        match field {
            PartField::Unit => project(&self.unit, current),
            PartField::Status => project(&self.status, current),
        }
    }

    /// Opens the unit editor prefilled from the retained record.
    pub fn begin_unit_edit(&mut self, input_id: String) -> bool {
        let control = TextInput::new(input_id, PartField::Unit.label()).with_value(self.part.unit());
        self.unit.is_viewing() && self.unit.open(control)
    }

    /// Status editing needs the allowed statuses first.
    pub fn begin_status_prepare(&mut self) -> bool {
        self.status.begin_prepare()
    }

    pub fn open_status_editor(&mut self, input_id: String, statuses: Vec<String>) -> bool {
        if !self.status.is_preparing() {
            return false;
        }
        let control = SelectInput::new(input_id, PartField::Status.label(), statuses)
            .with_validator(validators::non_empty_choice(NO_STATUSES_MESSAGE))
            .with_selected(self.part.status());
        self.status.open(control)
    }

    pub fn abort_prepare(&mut self, field: PartField) -> bool {
        match field {
            PartField::Unit => false,
            PartField::Status => {
                self.status.is_preparing() && self.status.settle()
            }
        }
    }

    pub fn handle_key(&mut self, field: PartField, key: KeyEvent) -> KeyResult {
        let control: Option<&mut dyn Input> = match field {
            PartField::Unit => self.unit.control_mut().map(|c| c as &mut dyn Input),
            PartField::Status => self.status.control_mut().map(|c| c as &mut dyn Input),
        };
        match control {
            Some(control) => control.handle_key(key.code, key.modifiers),
            None => KeyResult::NotHandled,
        }
    }

    pub fn delete_word(&mut self, field: PartField) {
        if let PartField::Unit = field
            && let Some(control) = self.unit.control_mut()
        {
            control.delete_word();
        }
    }

    /// Reads the control and builds an update carrying only that field.
    pub fn submit(&mut self, field: PartField) -> Option<PartUpdate> {
        let draft = match field {
            PartField::Unit => self.unit.submit(),
            PartField::Status => self.status.submit(),
        }?;
        Some(field.update(draft))
    }

    pub fn cancel(&mut self, field: PartField) -> bool {
        match field {
            PartField::Unit => self.unit.cancel(),
            PartField::Status => self.status.cancel(),
        }
    }

    /// Applies the server response of a successful update of `field`.
    pub fn complete_update(&mut self, field: PartField, response: &Part) {
        absorb(&mut self.part, field, response);
        match field {
            PartField::Unit => self.unit.settle(),
            PartField::Status => self.status.settle(),
        };
    }

    /// Failed update: the retained record is untouched, so the row shows
    /// the pre-edit value again.
    pub fn fail_update(&mut self, field: PartField) {
        match field {
            PartField::Unit => self.unit.settle(),
            PartField::Status => self.status.settle(),
        };
    }

    /// Refreshes a panel showing the same part after another panel saved it.
    pub fn sync_from(&mut self, field: PartField, response: &Part) -> bool {
        if self.part.uuid != response.uuid || !self.is_viewing(field) {
            return false;
        }
        absorb(&mut self.part, field, response);
        true
    }

    pub fn clear_error(&mut self, input_id: &str) -> bool {
        if let Some(control) = self.unit.control_mut()
            && control.id() == input_id
        {
            control.set_error(None);
            return true;
        }
        if let Some(control) = self.status.control_mut()
            && control.id() == input_id
        {
            control.set_error(None);
            return true;
        }
        false
    }
}

fn project<'a, C: Input>(state: &'a EditState<C>, current: &'a str) -> FieldView<'a> {
    match state {
        EditState::Viewing => FieldView::Viewing(current),
        EditState::Preparing => FieldView::Preparing(current),
        EditState::Editing(control) => FieldView::Editing(control),
        EditState::Submitting(control) => FieldView::Submitting(control),
    }
}

/// The edited field always takes the server's value; other fields are only
/// replaced when the response carries them.
fn absorb(part: &mut Part, field: PartField, response: &Part) {
    match field {
        PartField::Unit => part.unit = response.unit.clone(),
        PartField::Status => part.status = response.status.clone(),
    }
    if field != PartField::Unit && response.unit.is_some() {
        part.unit = response.unit.clone();
    }
    if field != PartField::Status && response.status.is_some() {
        part.status = response.status.clone();
    }
    if response.name.is_some() {
        part.name = response.name.clone();
    }
    if response.version.is_some() {
        part.version = response.version.clone();
    }
}
