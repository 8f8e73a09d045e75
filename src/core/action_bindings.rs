use crate::core::event::Action;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn from_key_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Which binding table a key is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A blocking notice is shown; only dismissal and exit pass.
    Notice,
    /// A text or select control owns the keyboard.
    Control,
    /// Waiting for the health check; input is ignored.
    Locked,
    Browse,
    /// Browsing while the focused editor loads its options; Esc backs out.
    Pending,
}

pub struct ActionBindings {
    global: HashMap<KeyBinding, Action>,
    notice: HashMap<KeyBinding, Action>,
    control: HashMap<KeyBinding, Action>,
    pending: HashMap<KeyBinding, Action>,
    browse: HashMap<KeyBinding, Action>,
}

impl ActionBindings {
    pub fn new() -> Self {
        let mut manager = Self {
            global: HashMap::new(),
            notice: HashMap::new(),
            control: HashMap::new(),
            pending: HashMap::new(),
            browse: HashMap::new(),
        };
        manager.setup_default_bindings();
        manager
    }

    fn setup_default_bindings(&mut self) {
        self.global
            .insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Exit);

        self.notice
            .insert(KeyBinding::key(KeyCode::Enter), Action::DismissNotice);
        self.notice
            .insert(KeyBinding::key(KeyCode::Esc), Action::DismissNotice);

        self.control
            .insert(KeyBinding::key(KeyCode::Enter), Action::Submit);
        self.control
            .insert(KeyBinding::key(KeyCode::Esc), Action::Cancel);
        self.control
            .insert(KeyBinding::ctrl(KeyCode::Backspace), Action::DeleteWord);
        self.control
            .insert(KeyBinding::ctrl(KeyCode::Char('w')), Action::DeleteWord);

        self.pending
            .insert(KeyBinding::key(KeyCode::Esc), Action::Cancel);

        self.bind(KeyBinding::key(KeyCode::Enter), Action::Submit);
        self.bind(KeyBinding::key(KeyCode::Down), Action::FocusNext);
        self.bind(KeyBinding::key(KeyCode::Char('j')), Action::FocusNext);
        self.bind(KeyBinding::key(KeyCode::Tab), Action::FocusNext);
        self.bind(KeyBinding::key(KeyCode::Up), Action::FocusPrev);
        self.bind(KeyBinding::key(KeyCode::Char('k')), Action::FocusPrev);
        self.bind(
            KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            Action::FocusPrev,
        );
        self.bind(KeyBinding::key(KeyCode::Left), Action::FocusParent);
        self.bind(KeyBinding::key(KeyCode::Char('r')), Action::Reload);
        self.bind(KeyBinding::key(KeyCode::Char('q')), Action::Exit);
        self.bind(KeyBinding::key(KeyCode::Esc), Action::Exit);
    }

    /// Adds or replaces a browse-mode binding.
    pub fn bind(&mut self, key: KeyBinding, action: Action) {
        self.browse.insert(key, action);
    }

    /// Resolves a key for `mode`. Unbound keys reach the focused control in
    /// `Control` mode and are dropped otherwise.
    pub fn handle_key(&self, mode: InputMode, key_event: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_key_event(key_event);
        if let Some(action) = self.global.get(&binding) {
            return Some(action.clone());
        }
        match mode {
            InputMode::Notice => self.notice.get(&binding).cloned(),
            InputMode::Control => Some(
                self.control
                    .get(&binding)
                    .cloned()
                    .unwrap_or(Action::InputKey(*key_event)),
            ),
            InputMode::Locked => None,
            InputMode::Browse => self.browse.get(&binding).cloned(),
            InputMode::Pending => self
                .pending
                .get(&binding)
                .or_else(|| self.browse.get(&binding))
                .cloned(),
        }
    }
}

impl Default for ActionBindings {
    fn default() -> Self {
        Self::new()
    }
}
