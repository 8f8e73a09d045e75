use crate::api::ApiError;
use crate::core::editor::PartField;
use crate::core::event::Action;
use crate::core::focus::{self, FocusTarget};
use crate::core::state::{
    API_KEY_INPUT_ID, AppState, HEALTH_FAILED_NOTICE, INVALID_KEY_MESSAGE, field_input_id,
};
use crate::core::tree::{NodeKey, RootState, ToggleOutcome};
use crate::input::{Input, KeyResult};
use crate::session::{ApiKey, Session};
use crate::task::{TaskCompletion, TaskRequest};
use crate::terminal::KeyEvent;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub enum Effect {
    /// Clears the inline error of an input once `Duration` has passed.
    ClearErrorAfter(String, Duration),
    CancelClearError(String),
    Spawn(TaskRequest),
}

pub struct Reducer;

impl Reducer {
    pub fn reduce(state: &mut AppState, action: Action, error_timeout: Duration) -> Vec<Effect> {
        let effects = match action {
            Action::Exit => {
                state.should_exit = true;
                vec![]
            }
            Action::DismissNotice => {
                state.notice = None;
                vec![]
            }
            Action::Submit => Self::handle_submit(state, error_timeout),
            Action::Cancel => Self::handle_cancel(state),
            Action::FocusNext => Self::move_focus(state, 1),
            Action::FocusPrev => Self::move_focus(state, -1),
            Action::FocusParent => Self::focus_parent(state),
            Action::Reload => Self::reload(state),
            Action::DeleteWord => {
                Self::delete_word(state);
                vec![]
            }
            Action::InputKey(key_event) => Self::handle_input_key(state, key_event, error_timeout),
            Action::ClearErrorMessage(id) => {
                Self::clear_error(state, &id);
                vec![]
            }
            Action::TaskCompleted(completion) => Self::handle_completion(state, completion),
        };
        state.normalize_focus();
        effects
    }

    fn handle_submit(state: &mut AppState, error_timeout: Duration) -> Vec<Effect> {
        match state.session {
            Session::Unset => Self::submit_api_key(state, error_timeout),
            Session::Validating(_) => vec![],
            Session::Authenticated(_) => {
                if let Some((node, field)) = state.editing_field() {
                    return Self::confirm_edit(state, node, field, error_timeout);
                }
                match state.focus {
                    Some(FocusTarget::Node(node)) => Self::toggle_node(state, node),
                    Some(FocusTarget::Field(node, field)) => Self::begin_edit(state, node, field),
                    None => vec![],
                }
            }
        }
    }

    fn submit_api_key(state: &mut AppState, error_timeout: Duration) -> Vec<Effect> {
        let parsed = state.key_input.validate().and_then(|()| {
            ApiKey::parse(&state.key_input.value()).ok_or_else(|| INVALID_KEY_MESSAGE.to_string())
        });
        let key = match parsed {
            Ok(key) => key,
            Err(message) => {
                state.key_input.set_error(Some(message));
                return schedule_clear(API_KEY_INPUT_ID.to_string(), error_timeout);
            }
        };

        info!("validating api key");
        state.key_input.set_error(None);
        state.session.begin(key.clone());
        vec![
            Effect::CancelClearError(API_KEY_INPUT_ID.to_string()),
            Effect::Spawn(TaskRequest::HealthCheck { key }),
        ]
    }

    fn handle_cancel(state: &mut AppState) -> Vec<Effect> {
        if matches!(state.session, Session::Unset) {
            state.should_exit = true;
            return vec![];
        }
        if let Some((node, field)) = state.editing_field().or_else(|| state.pending_field())
            && let Some(panel) = state.tree.panel_mut(node)
            && panel.cancel(field)
        {
            debug!(%node, field = field.noun(), "edit cancelled");
            return vec![Effect::CancelClearError(field_input_id(node, field))];
        }
        vec![]
    }

    fn toggle_node(state: &mut AppState, node: NodeKey) -> Vec<Effect> {
        let Some(key) = state.session.api_key().cloned() else {
            return vec![];
        };
        match state.tree.toggle(node) {
            ToggleOutcome::Load(config) => {
                debug!(%node, config = %config.uuid, "expanding");
                state.status_line = None;
                vec![Effect::Spawn(TaskRequest::Expand { key, node, config })]
            }
            ToggleOutcome::Collapsed { removed } => {
                debug!(%node, removed, "collapsed");
                vec![]
            }
            ToggleOutcome::Busy | ToggleOutcome::Missing => vec![],
        }
    }

    fn begin_edit(state: &mut AppState, node: NodeKey, field: PartField) -> Vec<Effect> {
        let Some(key) = state.session.api_key().cloned() else {
            return vec![];
        };
        let Some(panel) = state.tree.panel_mut(node) else {
            return vec![];
        };
        match field {
            PartField::Unit => {
                panel.begin_unit_edit(field_input_id(node, field));
                vec![]
            }
            PartField::Status => {
                if !panel.begin_status_prepare() {
                    return vec![];
                }
                let part_uuid = panel.part().uuid.clone();
                vec![Effect::Spawn(TaskRequest::FetchStatuses {
                    key,
                    node,
                    part_uuid,
                })]
            }
        }
    }

    fn confirm_edit(
        state: &mut AppState,
        node: NodeKey,
        field: PartField,
        error_timeout: Duration,
    ) -> Vec<Effect> {
        let Some(key) = state.session.api_key().cloned() else {
            return vec![];
        };
        let Some(panel) = state.tree.panel_mut(node) else {
            return vec![];
        };
        let input_id = field_input_id(node, field);
        let Some(update) = panel.submit(field) else {
            return schedule_clear(input_id, error_timeout);
        };
        let part_uuid = panel.part().uuid.clone();
        info!(part = %part_uuid, field = field.noun(), "submitting update");
        vec![
            Effect::CancelClearError(input_id),
            Effect::Spawn(TaskRequest::UpdatePart {
                key,
                node,
                field,
                part_uuid,
                update,
            }),
        ]
    }

    fn move_focus(state: &mut AppState, delta: isize) -> Vec<Effect> {
        if !state.session.is_authenticated() || state.editing_field().is_some() {
            return vec![];
        }
        let targets = state.focus_targets();
        state.focus = focus::step(&targets, state.focus, delta);
        vec![]
    }

    fn focus_parent(state: &mut AppState) -> Vec<Effect> {
        if state.editing_field().is_some() {
            return vec![];
        }
        match state.focus {
            Some(FocusTarget::Node(node)) => {
                let expanded = state
                    .tree
                    .get(node)
                    .is_some_and(|n| n.expansion.is_expanded());
                if expanded {
                    let removed = state.tree.collapse(node);
                    debug!(%node, removed, "collapsed");
                } else if let Some(parent) = state.tree.parent_of(node) {
                    state.focus = Some(FocusTarget::Node(parent));
                }
            }
            Some(FocusTarget::Field(node, _)) => state.focus = Some(FocusTarget::Node(node)),
            None => {}
        }
        vec![]
    }

    fn reload(state: &mut AppState) -> Vec<Effect> {
        let Some(key) = state.session.api_key().cloned() else {
            return vec![];
        };
        if !state.tree.begin_root_load() {
            return vec![];
        }
        info!("reloading root configurations");
        state.focus = None;
        state.status_line = None;
        vec![Effect::Spawn(TaskRequest::LoadRoot { key })]
    }

    fn delete_word(state: &mut AppState) {
        if matches!(state.session, Session::Unset) {
            state.key_input.delete_word();
        } else if let Some((node, field)) = state.editing_field()
            && let Some(panel) = state.tree.panel_mut(node)
        {
            panel.delete_word(field);
        }
    }

    fn handle_input_key(
        state: &mut AppState,
        key_event: KeyEvent,
        error_timeout: Duration,
    ) -> Vec<Effect> {
        if matches!(state.session, Session::Unset) {
            let result = state
                .key_input
                .handle_key(key_event.code, key_event.modifiers);
            return match result {
                KeyResult::Submit => Self::submit_api_key(state, error_timeout),
                KeyResult::Handled if state.key_input.error().is_some() => {
                    state.key_input.set_error(None);
                    vec![Effect::CancelClearError(API_KEY_INPUT_ID.to_string())]
                }
                _ => vec![],
            };
        }

        let Some((node, field)) = state.editing_field() else {
            return vec![];
        };
        let Some(panel) = state.tree.panel_mut(node) else {
            return vec![];
        };
        match panel.handle_key(field, key_event) {
            KeyResult::Submit => Self::confirm_edit(state, node, field, error_timeout),
            KeyResult::Handled => {
                let input_id = field_input_id(node, field);
                panel.clear_error(&input_id);
                vec![Effect::CancelClearError(input_id)]
            }
            KeyResult::NotHandled => vec![],
        }
    }

    fn clear_error(state: &mut AppState, id: &str) {
        if id == API_KEY_INPUT_ID {
            state.key_input.set_error(None);
            return;
        }
        for (_, panel) in state.tree.panels_mut() {
            if panel.clear_error(id) {
                break;
            }
        }
    }

    fn handle_completion(state: &mut AppState, completion: TaskCompletion) -> Vec<Effect> {
        match completion {
            TaskCompletion::HealthChecked(Ok(())) => {
                if !state.session.authenticate() {
                    return vec![];
                }
                info!("api key accepted");
                let Some(key) = state.session.api_key().cloned() else {
                    return vec![];
                };
                if !state.tree.begin_root_load() {
                    return vec![];
                }
                vec![Effect::Spawn(TaskRequest::LoadRoot { key })]
            }
            TaskCompletion::HealthChecked(Err(err)) => {
                warn!(error = %err, "api key rejected");
                state.session.reject();
                state.notice = Some(HEALTH_FAILED_NOTICE.to_string());
                vec![]
            }
            TaskCompletion::RootLoaded(result) => {
                if state.tree.root_state() != RootState::Loading {
                    debug!("discarding stale root listing");
                    return vec![];
                }
                match result {
                    Ok(children) => {
                        info!(count = children.len(), "root configurations loaded");
                        state.tree.finish_root_load(children);
                        state.focus = None;
                    }
                    Err(err) => {
                        error!(error = %err, "root listing failed");
                        state.tree.fail_root_load();
                        state.status_line = Some(err.to_string());
                    }
                }
                vec![]
            }
            TaskCompletion::Expanded { node, result } => {
                match result {
                    Ok(outcome) => {
                        let count = outcome.children.len();
                        if !state.tree.finish_expand(node, outcome.part, outcome.children) {
                            debug!(%node, "discarding expansion of removed node");
                        } else if count == 0 {
                            debug!(%node, "no child configurations");
                        }
                    }
                    Err(err) => {
                        warn!(%node, error = %err, "expansion failed");
                        if state.tree.fail_expand(node) {
                            state.status_line = Some(err.to_string());
                        }
                    }
                }
                vec![]
            }
            TaskCompletion::StatusesFetched { node, result } => {
                Self::statuses_fetched(state, node, result);
                vec![]
            }
            TaskCompletion::PartUpdated {
                node,
                field,
                result,
            } => {
                match result {
                    Ok(part) => {
                        info!(part = %part.uuid, field = field.noun(), "part updated");
                        if let Some(panel) = state.tree.panel_mut(node) {
                            panel.complete_update(field, &part);
                        }
                        for (other, panel) in state.tree.panels_mut() {
                            if other != node && panel.sync_from(field, &part) {
                                debug!(node = %other, "refreshed panel of same part");
                            }
                        }
                    }
                    Err(err) => {
                        warn!(%node, field = field.noun(), error = %err, "update failed");
                        if let Some(panel) = state.tree.panel_mut(node) {
                            panel.fail_update(field);
                        }
                        state.notice = Some(format!("Error updating {}: {}", field.noun(), err));
                    }
                }
                vec![]
            }
        }
    }

    fn statuses_fetched(
        state: &mut AppState,
        node: NodeKey,
        result: Result<Vec<String>, ApiError>,
    ) {
        let editing_elsewhere = state.editing_field().is_some();
        let Some(panel) = state.tree.panel_mut(node) else {
            debug!(%node, "discarding statuses of removed node");
            return;
        };
        match result {
            Ok(statuses) => {
                let input_id = field_input_id(node, PartField::Status);
                if panel.open_status_editor(input_id, statuses) && !editing_elsewhere {
                    state.focus = Some(FocusTarget::Field(node, PartField::Status));
                }
            }
            Err(err) => {
                warn!(%node, error = %err, "allowed statuses unavailable");
                if panel.abort_prepare(PartField::Status) {
                    state.notice = Some(err.to_string());
                }
            }
        }
    }
}

fn schedule_clear(input_id: String, error_timeout: Duration) -> Vec<Effect> {
    vec![Effect::ClearErrorAfter(input_id, error_timeout)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ConfigNode, Operation, Part};
    use crate::core::action_bindings::InputMode;
    use crate::core::tree::ResolvedChild;
    use crate::task::ExpandOutcome;
    use crate::terminal::KeyCode;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn reduce(state: &mut AppState, action: Action) -> Vec<Effect> {
        Reducer::reduce(state, action, TIMEOUT)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for ch in text.chars() {
            reduce(state, Action::InputKey(KeyEvent::plain(KeyCode::Char(ch))));
        }
    }

    fn part(uuid: &str) -> Part {
        Part {
            uuid: uuid.into(),
            name: Some(format!("Part {uuid}")),
            unit: Some("kg".into()),
            status: Some("Draft".into()),
            version: None,
        }
    }

    fn child(uuid: &str, part_uuid: &str) -> ResolvedChild {
        ResolvedChild {
            config: ConfigNode {
                uuid: uuid.into(),
                part_uuid: part_uuid.into(),
                parent_uuid: None,
                end_unit_serial_no: None,
            },
            part: part(part_uuid),
        }
    }

    fn authenticated(children: Vec<ResolvedChild>) -> AppState {
        let mut state = AppState::new();
        type_text(&mut state, "key");
        reduce(&mut state, Action::Submit);
        reduce(
            &mut state,
            Action::TaskCompleted(TaskCompletion::HealthChecked(Ok(()))),
        );
        reduce(
            &mut state,
            Action::TaskCompleted(TaskCompletion::RootLoaded(Ok(children))),
        );
        state
    }

    #[test]
    fn blank_key_sets_inline_error_and_schedules_clear() {
        let mut state = AppState::new();
        type_text(&mut state, "   ");
        let effects = reduce(&mut state, Action::Submit);

        assert_eq!(state.key_input.error(), Some(INVALID_KEY_MESSAGE));
        assert!(matches!(state.session, Session::Unset));
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::ClearErrorAfter(id, delay) if id == API_KEY_INPUT_ID && *delay == TIMEOUT
        )));

        reduce(&mut state, Action::ClearErrorMessage(API_KEY_INPUT_ID.into()));
        assert_eq!(state.key_input.error(), None);
    }

    #[test]
    fn valid_key_starts_health_check_with_trimmed_key() {
        let mut state = AppState::new();
        type_text(&mut state, " abc ");
        let effects = reduce(&mut state, Action::Submit);

        assert!(state.session.is_validating());
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Spawn(TaskRequest::HealthCheck { key }) if key.expose() == "abc"
        )));
    }

    #[test]
    fn failed_health_check_shows_notice_and_keeps_key_entry() {
        let mut state = AppState::new();
        type_text(&mut state, "bad");
        reduce(&mut state, Action::Submit);
        let err = ApiError::Connectivity("Forbidden".into());
        let effects = reduce(
            &mut state,
            Action::TaskCompleted(TaskCompletion::HealthChecked(Err(err))),
        );

        assert!(effects.is_empty());
        assert_eq!(state.notice.as_deref(), Some(HEALTH_FAILED_NOTICE));
        assert!(matches!(state.session, Session::Unset));
        assert!(state.tree.is_empty());

        reduce(&mut state, Action::DismissNotice);
        assert!(state.notice.is_none());
    }

    #[test]
    fn accepted_key_loads_root_and_focuses_first_node() {
        let state = authenticated(vec![child("c1", "p1"), child("c2", "p2")]);
        assert!(state.session.is_authenticated());
        assert_eq!(state.tree.roots().len(), 2);
        assert_eq!(state.focus, Some(FocusTarget::Node(state.tree.roots()[0])));
    }

    #[test]
    fn expansion_of_collapsed_ancestor_is_discarded() {
        let mut state = authenticated(vec![child("c1", "p1")]);
        let root = state.tree.roots()[0];

        reduce(&mut state, Action::Submit);
        let outcome = ExpandOutcome {
            part: part("p1"),
            children: vec![child("c1a", "p2")],
        };
        reduce(
            &mut state,
            Action::TaskCompleted(TaskCompletion::Expanded {
                node: root,
                result: Ok(outcome),
            }),
        );
        let grandchild = state.tree.display_order()[1];
        state.focus = Some(FocusTarget::Node(grandchild));
        reduce(&mut state, Action::Submit);
        assert!(state.tree.get(grandchild).is_some_and(|n| n.expansion.is_loading()));

        state.focus = Some(FocusTarget::Node(root));
        reduce(&mut state, Action::Submit);
        assert_eq!(state.tree.len(), 1);

        reduce(
            &mut state,
            Action::TaskCompleted(TaskCompletion::Expanded {
                node: grandchild,
                result: Ok(ExpandOutcome {
                    part: part("p2"),
                    children: vec![child("deep", "p3")],
                }),
            }),
        );
        assert_eq!(state.tree.len(), 1);
    }

    #[test]
    fn failed_own_part_fetch_collapses_node() {
        let mut state = authenticated(vec![child("c1", "p1")]);
        let root = state.tree.roots()[0];
        reduce(&mut state, Action::Submit);

        let err = ApiError::fetch(Operation::PartInfo, "Not Found");
        reduce(
            &mut state,
            Action::TaskCompleted(TaskCompletion::Expanded {
                node: root,
                result: Err(err),
            }),
        );
        let node = state.tree.get(root).unwrap();
        assert!(!node.expansion.is_expanded() && !node.expansion.is_loading());
        assert_eq!(
            state.status_line.as_deref(),
            Some("Error fetching part info: Not Found")
        );
    }

    #[test]
    fn keys_reach_the_open_editor_only() {
        let mut state = authenticated(vec![child("c1", "p1")]);
        let root = state.tree.roots()[0];
        reduce(&mut state, Action::Submit);
        reduce(
            &mut state,
            Action::TaskCompleted(TaskCompletion::Expanded {
                node: root,
                result: Ok(ExpandOutcome {
                    part: part("p1"),
                    children: vec![],
                }),
            }),
        );

        reduce(&mut state, Action::FocusNext);
        assert_eq!(state.focus, Some(FocusTarget::Field(root, PartField::Unit)));
        reduce(&mut state, Action::Submit);
        assert_eq!(state.editing_field(), Some((root, PartField::Unit)));

        reduce(&mut state, Action::FocusNext);
        assert_eq!(state.focus, Some(FocusTarget::Field(root, PartField::Unit)));

        type_text(&mut state, "s");
        let effects = reduce(&mut state, Action::Submit);
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Spawn(TaskRequest::UpdatePart { update, .. }) if update.unit.as_deref() == Some("kgs")
        )));
    }

    #[test]
    fn cancel_while_statuses_load_returns_field_to_viewing() {
        let mut state = authenticated(vec![child("c1", "p1")]);
        let root = state.tree.roots()[0];
        reduce(&mut state, Action::Submit);
        reduce(
            &mut state,
            Action::TaskCompleted(TaskCompletion::Expanded {
                node: root,
                result: Ok(ExpandOutcome {
                    part: part("p1"),
                    children: vec![],
                }),
            }),
        );

        reduce(&mut state, Action::FocusNext);
        reduce(&mut state, Action::FocusNext);
        assert_eq!(state.focus, Some(FocusTarget::Field(root, PartField::Status)));
        let effects = reduce(&mut state, Action::Submit);
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Spawn(TaskRequest::FetchStatuses { .. })
        )));
        assert_eq!(state.input_mode(), InputMode::Pending);

        let effects = reduce(&mut state, Action::Cancel);
        assert!(!effects.iter().any(|effect| matches!(effect, Effect::Spawn(_))));
        assert!(!state.should_exit);
        assert_eq!(state.pending_field(), None);
        assert_eq!(state.input_mode(), InputMode::Browse);

        reduce(
            &mut state,
            Action::TaskCompleted(TaskCompletion::StatusesFetched {
                node: root,
                result: Ok(vec!["Draft".into(), "Active".into()]),
            }),
        );
        assert_eq!(state.editing_field(), None);
        assert!(state.tree.panel(root).is_some_and(|p| p.is_viewing(PartField::Status)));
    }
}
