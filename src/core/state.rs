use crate::core::action_bindings::InputMode;
use crate::core::editor::PartField;
use crate::core::focus::{self, FocusTarget};
use crate::core::tree::{ConfigTree, NodeKey};
use crate::input::{PasswordInput, validators};
use crate::session::Session;

pub const API_KEY_INPUT_ID: &str = "api-key";
pub const INVALID_KEY_MESSAGE: &str = "Please enter a valid API key.";
pub const HEALTH_FAILED_NOTICE: &str =
    "API key is invalid or there was an error connecting to the API";

pub struct AppState {
    pub session: Session,
    pub key_input: PasswordInput,
    pub tree: ConfigTree,
    pub focus: Option<FocusTarget>,
    /// Blocking message; all input except dismissal is held back while set.
    pub notice: Option<String>,
    /// Last non-blocking error, shown under the tree.
    pub status_line: Option<String>,
    pub should_exit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            key_input: PasswordInput::new(API_KEY_INPUT_ID, "API Key")
                .with_validator(validators::required(INVALID_KEY_MESSAGE)),
            tree: ConfigTree::new(),
            focus: None,
            notice: None,
            status_line: None,
            should_exit: false,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        if self.notice.is_some() {
            return InputMode::Notice;
        }
        match self.session {
            Session::Unset => InputMode::Control,
            Session::Validating(_) => InputMode::Locked,
            Session::Authenticated(_) if self.editing_field().is_some() => InputMode::Control,
            Session::Authenticated(_) if self.pending_field().is_some() => InputMode::Pending,
            Session::Authenticated(_) => InputMode::Browse,
        }
    }

    /// The focused field when its editor holds an open control.
    pub fn editing_field(&self) -> Option<(NodeKey, PartField)> {
        let FocusTarget::Field(key, field) = self.focus? else {
            return None;
        };
        let panel = self.tree.panel(key)?;
        panel.is_editing(field).then_some((key, field))
    }

    /// The focused field when its editor is still waiting for data.
    pub fn pending_field(&self) -> Option<(NodeKey, PartField)> {
        let FocusTarget::Field(key, field) = self.focus? else {
            return None;
        };
        let panel = self.tree.panel(key)?;
        panel.is_preparing(field).then_some((key, field))
    }

    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        focus::focus_targets(&self.tree)
    }

    /// Drops focus that points at a row which no longer exists.
    pub fn normalize_focus(&mut self) {
        let targets = self.focus_targets();
        let valid = self.focus.is_some_and(|current| targets.contains(&current));
        if !valid {
            self.focus = match self.focus.map(FocusTarget::node) {
                Some(key) if self.tree.contains(key) => Some(FocusTarget::Node(key)),
                _ => targets.first().copied(),
            };
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Id of the control editing `field` on `node`.
pub fn field_input_id(node: NodeKey, field: PartField) -> String {
    format!("{}-{}", field.noun(), node)
}
