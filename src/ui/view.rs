//! Projection of [`AppState`] into styled lines.
//!
//! Nothing here mutates state: every row, marker and cursor position is
//! derived from the session, the tree arena and the field editors.

use crate::core::action_bindings::InputMode;
use crate::core::editor::PartField;
use crate::core::focus::FocusTarget;
use crate::core::panel::{FieldView, PartPanel};
use crate::core::state::AppState;
use crate::core::tree::{Expansion, NodeKey, RootState};
use crate::input::Input;
use crate::session::Session;
use crate::ui::span::{Span, SpanLine, line_width, plain_text};
use crate::ui::style::Style;
use crate::ui::theme::Theme;
use unicode_width::UnicodeWidthStr;

pub const TITLE: &str = "Configuration Browser";
pub const ROOT_HEADER: &str = "Root Configurations:";
pub const CHILD_HEADER: &str = "Child Configurations:";
pub const PART_HEADER: &str = "Part Info:";

const INDENT: &str = "    ";

/// Cursor position inside [`View::body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyCursor {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Default)]
pub struct View {
    pub header: Vec<SpanLine>,
    /// Scrollable part of the screen.
    pub body: Vec<SpanLine>,
    pub footer: Vec<SpanLine>,
    pub focus_row: Option<usize>,
    pub cursor: Option<BodyCursor>,
    pub notice: Option<String>,
}

impl View {
    pub fn build(state: &AppState, theme: &Theme) -> Self {
        let mut view = View::default();
        view.header.push(vec![Span::styled(TITLE, theme.title)]);
        view.header.push(Vec::new());

        match state.session {
            Session::Unset => key_entry_rows(state, theme, &mut view),
            Session::Validating(_) => view
                .body
                .push(vec![Span::styled("Validating API key...", theme.pending)]),
            Session::Authenticated(_) => tree_rows(state, theme, &mut view),
        }

        if let Some(status) = &state.status_line {
            view.footer
                .push(vec![Span::styled(format!("! {status}"), theme.error)]);
        }
        view.footer
            .push(vec![Span::styled(hint_text(state), theme.hint)]);
        view.notice = state.notice.clone();
        view
    }

    /// Body rows as plain text.
    pub fn body_text(&self) -> Vec<String> {
        self.body
            .iter()
            .map(|line| plain_text(line))
            .collect()
    }
}

fn key_entry_rows(state: &AppState, theme: &Theme, view: &mut View) {
    let input = &state.key_input;
    let label = format!("{}: ", input.label());
    let label_width = label.width();
    let mut line = vec![Span::styled(label, theme.label)];
    line.extend(input.render_content());

    view.cursor = input.cursor_offset_in_content().map(|offset| BodyCursor {
        row: view.body.len(),
        col: label_width + offset,
    });
    view.body.push(line);
    if let Some(error) = input.error() {
        view.body
            .push(vec![Span::styled(format!("  ! {error}"), theme.error)]);
    }
}

fn tree_rows(state: &AppState, theme: &Theme, view: &mut View) {
    match state.tree.root_state() {
        RootState::Idle => return,
        RootState::Loading => {
            view.body
                .push(vec![Span::styled("Loading configurations...", theme.pending)]);
            return;
        }
        RootState::Loaded => {}
    }
    if state.tree.roots().is_empty() {
        return;
    }
    view.body
        .push(vec![Span::styled(ROOT_HEADER, theme.header)]);
    for key in state.tree.roots() {
        node_rows(state, theme, *key, view);
    }
}

fn node_rows(state: &AppState, theme: &Theme, key: NodeKey, view: &mut View) {
    let Some(node) = state.tree.get(key) else {
        return;
    };
    let focused = state.focus == Some(FocusTarget::Node(key));
    let marker = match node.expansion {
        Expansion::Collapsed | Expansion::Loading => "▸",
        Expansion::Expanded(_) => "▾",
    };
    let label_style = if focused { theme.focused } else { Style::default() };
    let mut line = vec![
        focus_prefix(focused, theme),
        Span::new(INDENT.repeat(node.depth)),
        Span::styled(format!("{marker} {}", node.label), label_style),
    ];
    if node.expansion.is_loading() {
        line.push(Span::styled("  loading...", theme.pending));
    }
    if focused {
        view.focus_row = Some(view.body.len());
    }
    view.body.push(line);

    let Some(panel) = state.tree.panel(key) else {
        return;
    };
    let indent = INDENT.repeat(node.depth + 1);
    panel_rows(state, theme, key, panel, &indent, view);

    if !node.children.is_empty() {
        view.body.push(vec![
            Span::new("  "),
            Span::new(indent),
            Span::styled(CHILD_HEADER, theme.header),
        ]);
        for child in &node.children {
            node_rows(state, theme, *child, view);
        }
    }
}

fn panel_rows(
    state: &AppState,
    theme: &Theme,
    key: NodeKey,
    panel: &PartPanel,
    indent: &str,
    view: &mut View,
) {
    let part = panel.part();
    let plain_row = |label: &str, value: &str| {
        vec![
            Span::new("  "),
            Span::new(indent),
            Span::styled(format!("{label}: "), theme.label),
            Span::new(value),
        ]
    };

    view.body.push(vec![
        Span::new("  "),
        Span::new(indent),
        Span::styled(PART_HEADER, theme.header),
    ]);
    view.body.push(plain_row("ID", &part.uuid));
    view.body.push(plain_row("Name", part.name()));
    field_row(state, theme, key, PartField::Unit, panel, indent, view);
    field_row(state, theme, key, PartField::Status, panel, indent, view);
    if let Some(version) = part.version_label() {
        view.body.push(plain_row("Version", &version));
    }
}

fn field_row(
    state: &AppState,
    theme: &Theme,
    key: NodeKey,
    field: PartField,
    panel: &PartPanel,
    indent: &str,
    view: &mut View,
) {
    let focused = state.focus == Some(FocusTarget::Field(key, field));
    let row = view.body.len();
    let mut line = vec![
        focus_prefix(focused, theme),
        Span::new(indent),
        Span::styled(format!("{}: ", field.label()), theme.label),
    ];
    let mut error = None;

    match panel.field_view(field) {
        FieldView::Viewing(value) => {
            let trigger = if focused { theme.focused } else { theme.trigger };
            line.push(Span::new(format!("{value} ")));
            line.push(Span::styled("[edit]", trigger));
        }
        FieldView::Preparing(value) => {
            line.push(Span::new(value));
            line.push(Span::styled("  loading statuses...", theme.pending));
        }
        FieldView::Editing(control) => {
            if focused {
                let offset = line_width(&line);
                view.cursor = control
                    .cursor_offset_in_content()
                    .map(|col| BodyCursor { row, col: offset + col });
            }
            line.extend(control.render_content());
            line.push(Span::new("  "));
            line.push(Span::styled("[✔ Enter]", theme.trigger));
            line.push(Span::new(" "));
            line.push(Span::styled("[x Esc]", theme.trigger));
            error = control.error().map(str::to_string);
        }
        FieldView::Submitting(control) => {
            line.push(Span::new(control.value()));
            line.push(Span::styled("  saving...", theme.pending));
        }
    }

    if focused {
        view.focus_row = Some(row);
    }
    view.body.push(line);
    if let Some(error) = error {
        view.body.push(vec![
            Span::new("  "),
            Span::new(indent),
            Span::styled(format!("  ! {error}"), theme.error),
        ]);
    }
}

fn focus_prefix(focused: bool, theme: &Theme) -> Span {
    if focused {
        Span::styled("> ", theme.focused)
    } else {
        Span::new("  ")
    }
}

fn hint_text(state: &AppState) -> &'static str {
    match state.input_mode() {
        InputMode::Notice => "Enter/Esc dismiss",
        InputMode::Locked => "Ctrl+C quit",
        InputMode::Control => match state.editing_field() {
            Some((_, PartField::Status)) => "←/→ choose · Enter confirm · Esc cancel",
            Some((_, PartField::Unit)) => "Enter confirm · Esc cancel",
            None => "Enter submit · Esc quit",
        },
        InputMode::Browse => "↑/↓ move · Enter open/edit · ← collapse · r reload · q quit",
        InputMode::Pending => "Esc cancel edit · ↑/↓ move · q quit",
    }
}
