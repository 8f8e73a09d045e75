use crate::task::TaskCompletion;
use crate::terminal::KeyEvent;

#[derive(Debug, Clone)]
pub enum Action {
    Exit,
    /// Enter: submit the key, activate the focused row or confirm an edit.
    Submit,
    /// Esc while editing: drop the draft.
    Cancel,
    FocusNext,
    FocusPrev,
    /// Left: collapse the focused node, or move to its parent.
    FocusParent,
    Reload,
    DeleteWord,
    InputKey(KeyEvent),
    ClearErrorMessage(String),
    DismissNotice,
    TaskCompleted(TaskCompletion),
}
