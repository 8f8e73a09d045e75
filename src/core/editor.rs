use crate::api::{Part, PartUpdate};
use crate::input::Input;

/// Mutable part fields that can be edited inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartField {
    Unit,
    Status,
}

impl PartField {
    pub fn label(self) -> &'static str {
        match self {
            PartField::Unit => "Unit",
            PartField::Status => "Status",
        }
    }

    /// Lower-case name used in user-facing error notices.
    pub fn noun(self) -> &'static str {
        match self {
            PartField::Unit => "unit",
            PartField::Status => "status",
        }
    }

    pub fn value_of(self, part: &Part) -> &str {
        match self {
            PartField::Unit => part.unit(),
            PartField::Status => part.status(),
        }
    }

    pub fn update(self, value: String) -> PartUpdate {
        match self {
            PartField::Unit => PartUpdate::unit(value),
            PartField::Status => PartUpdate::status(value),
        }
    }
}

/// Per-field editor state. The rendered row is a function of this value.
pub enum EditState<C> {
    Viewing,
    /// Waiting for data needed to build the control (allowed statuses).
    Preparing,
    Editing(C),
    /// Update request in flight; the control keeps the submitted draft.
    Submitting(C),
}

impl<C> Default for EditState<C> {
    fn default() -> Self {
        EditState::Viewing
    }
}

impl<C: Input> EditState<C> {
    pub fn is_viewing(&self) -> bool {
        matches!(self, EditState::Viewing)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditState::Editing(_))
    }

    pub fn is_preparing(&self) -> bool {
        matches!(self, EditState::Preparing)
    }

    pub fn begin_prepare(&mut self) -> bool {
        if !self.is_viewing() {
            return false;
        }
        *self = EditState::Preparing;
        true
    }

    pub fn open(&mut self, control: C) -> bool {
        match self {
            EditState::Viewing | EditState::Preparing => {
                *self = EditState::Editing(control);
                true
            }
            _ => false,
        }
    }

    pub fn control(&self) -> Option<&C> {
        match self {
            EditState::Editing(control) | EditState::Submitting(control) => Some(control),
            _ => None,
        }
    }

    pub fn control_mut(&mut self) -> Option<&mut C> {
        match self {
            EditState::Editing(control) => Some(control),
            _ => None,
        }
    }

    /// Moves `Editing -> Submitting` and returns the draft value.
    ///
    /// Incomplete or invalid controls stay in `Editing` with their error set.
    pub fn submit(&mut self) -> Option<String> {
        let EditState::Editing(control) = self else {
            return None;
        };
        if let Err(err) = control.validate() {
            control.set_error(Some(err));
            return None;
        }
        let draft = control.value();
        if let EditState::Editing(control) = std::mem::take(self) {
            *self = EditState::Submitting(control);
        }
        Some(draft)
    }

    /// Drops any draft without touching the server.
    pub fn cancel(&mut self) -> bool {
        match self {
            EditState::Editing(_) | EditState::Preparing => {
                *self = EditState::Viewing;
                true
            }
            _ => false,
        }
    }

    /// Ends a submission or preparation, whatever its outcome.
    pub fn settle(&mut self) -> bool {
        match self {
            EditState::Submitting(_) | EditState::Preparing => {
                *self = EditState::Viewing;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{SelectInput, TextInput, validators};

    #[test]
    fn full_edit_cycle() {
        let mut state: EditState<TextInput> = EditState::default();
        assert!(state.open(TextInput::new("unit", "Unit").with_value("kg")));
        assert!(state.is_editing());

        assert_eq!(state.submit().as_deref(), Some("kg"));
        assert!(matches!(state, EditState::Submitting(_)));
        assert!(state.control_mut().is_none());
        assert_eq!(state.control().map(|c| c.value()), Some("kg".to_string()));

        assert!(state.settle());
        assert!(state.is_viewing());
    }

    #[test]
    fn cancel_only_from_editing_or_preparing() {
        let mut state: EditState<TextInput> = EditState::Viewing;
        assert!(!state.cancel());

        assert!(state.begin_prepare());
        assert!(state.cancel());

        state.open(TextInput::new("unit", "Unit"));
        state.submit();
        assert!(!state.cancel(), "in-flight submissions cannot be cancelled");
    }

    #[test]
    fn invalid_control_stays_editing() {
        let mut state = EditState::Viewing;
        state.open(
            SelectInput::new("status", "Status", Vec::new())
                .with_validator(validators::non_empty_choice("No statuses")),
        );
        assert_eq!(state.submit(), None);
        assert!(state.is_editing());
        assert_eq!(state.control().and_then(|c| c.error()), Some("No statuses"));
    }

    #[test]
    fn field_update_carries_only_that_field() {
        assert_eq!(PartField::Unit.update("kg".into()), PartUpdate::unit("kg"));
        assert_eq!(
            PartField::Status.update("Active".into()),
            PartUpdate::status("Active")
        );
    }
}
