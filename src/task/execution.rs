use crate::api::{ApiError, ApiResult, ConfigApi, ConfigNode, ParentFilter, Part, PartUpdate};
use crate::core::editor::PartField;
use crate::core::tree::{NodeKey, ResolvedChild, sort_configs};
use crate::session::ApiKey;
use tracing::{debug, warn};

/// One API round trip, executed off the UI thread.
#[derive(Debug, Clone)]
pub enum TaskRequest {
    HealthCheck {
        key: ApiKey,
    },
    LoadRoot {
        key: ApiKey,
    },
    Expand {
        key: ApiKey,
        node: NodeKey,
        config: ConfigNode,
    },
    FetchStatuses {
        key: ApiKey,
        node: NodeKey,
        part_uuid: String,
    },
    UpdatePart {
        key: ApiKey,
        node: NodeKey,
        field: PartField,
        part_uuid: String,
        update: PartUpdate,
    },
}

/// Fresh part record of an expanded node plus its resolved children.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandOutcome {
    pub part: Part,
    pub children: Vec<ResolvedChild>,
}

#[derive(Debug, Clone)]
pub enum TaskCompletion {
    HealthChecked(Result<(), ApiError>),
    RootLoaded(Result<Vec<ResolvedChild>, ApiError>),
    Expanded {
        node: NodeKey,
        result: Result<ExpandOutcome, ApiError>,
    },
    StatusesFetched {
        node: NodeKey,
        result: Result<Vec<String>, ApiError>,
    },
    PartUpdated {
        node: NodeKey,
        field: PartField,
        result: Result<Part, ApiError>,
    },
}

pub fn execute_request(api: &dyn ConfigApi, request: TaskRequest) -> TaskCompletion {
    match request {
        TaskRequest::HealthCheck { key } => {
            let result = api.health_check(&key).map(|body| {
                debug!(%body, "health check passed");
            });
            TaskCompletion::HealthChecked(result)
        }
        TaskRequest::LoadRoot { key } => {
            TaskCompletion::RootLoaded(resolve_children(api, &key, &ParentFilter::Root))
        }
        TaskRequest::Expand { key, node, config } => TaskCompletion::Expanded {
            node,
            result: expand(api, &key, &config),
        },
        TaskRequest::FetchStatuses {
            key,
            node,
            part_uuid,
        } => TaskCompletion::StatusesFetched {
            node,
            result: api
                .get_allowed_statuses(&key, &part_uuid)
                .map(|statuses| statuses.allowable_statuses),
        },
        TaskRequest::UpdatePart {
            key,
            node,
            field,
            part_uuid,
            update,
        } => TaskCompletion::PartUpdated {
            node,
            field,
            result: api.update_part(&key, &part_uuid, &update),
        },
    }
}

/// The node's own part is fetched fresh; a failed children listing still
/// yields the part panel, just without children.
fn expand(api: &dyn ConfigApi, key: &ApiKey, config: &ConfigNode) -> ApiResult<ExpandOutcome> {
    let part = api.get_part(key, &config.part_uuid)?;
    let children = match resolve_children(api, key, &ParentFilter::Parent(config.uuid.clone())) {
        Ok(children) => children,
        Err(err) => {
            warn!(config = %config.uuid, error = %err, "child listing failed");
            Vec::new()
        }
    };
    Ok(ExpandOutcome { part, children })
}

/// Lists, sorts, then resolves each child's part in sorted order.
///
/// Lookups run one after another; a failed lookup skips that child only.
pub fn resolve_children(
    api: &dyn ConfigApi,
    key: &ApiKey,
    parent: &ParentFilter,
) -> ApiResult<Vec<ResolvedChild>> {
    let mut configs = api.get_configuration(key, parent)?;
    if configs.is_empty() {
        debug!(?parent, "no child configurations");
        return Ok(Vec::new());
    }
    sort_configs(&mut configs);

    let mut resolved = Vec::with_capacity(configs.len());
    for config in configs {
        match api.get_part(key, &config.part_uuid) {
            Ok(part) => resolved.push(ResolvedChild { config, part }),
            Err(err) => {
                warn!(config = %config.uuid, part = %config.part_uuid, error = %err, "skipping child");
            }
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AllowableStatuses, Operation};
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        children: HashMap<String, Vec<ConfigNode>>,
        parts: HashMap<String, Part>,
        part_lookups: Mutex<Vec<String>>,
    }

    impl ConfigApi for FakeApi {
        fn health_check(&self, _key: &ApiKey) -> ApiResult<serde_json::Value> {
            Ok(serde_json::json!({"status": "ok"}))
        }

        fn get_configuration(
            &self,
            _key: &ApiKey,
            parent: &ParentFilter,
        ) -> ApiResult<Vec<ConfigNode>> {
            let id = parent.query_value().unwrap_or("root");
            self.children
                .get(id)
                .cloned()
                .ok_or_else(|| ApiError::fetch(Operation::Configuration, "Not Found"))
        }

        fn get_part(&self, _key: &ApiKey, part_uuid: &str) -> ApiResult<Part> {
            self.part_lookups.lock().unwrap().push(part_uuid.to_string());
            self.parts
                .get(part_uuid)
                .cloned()
                .ok_or_else(|| ApiError::fetch(Operation::PartInfo, "Not Found"))
        }

        fn get_allowed_statuses(
            &self,
            _key: &ApiKey,
            _part_uuid: &str,
        ) -> ApiResult<AllowableStatuses> {
            Ok(AllowableStatuses::default())
        }

        fn update_part(
            &self,
            _key: &ApiKey,
            _part_uuid: &str,
            _update: &PartUpdate,
        ) -> ApiResult<Part> {
            Err(ApiError::fetch(Operation::UpdatePart, "Forbidden"))
        }
    }

    fn config(uuid: &str, part_uuid: &str, serial: Option<&str>) -> ConfigNode {
        ConfigNode {
            uuid: uuid.into(),
            part_uuid: part_uuid.into(),
            parent_uuid: None,
            end_unit_serial_no: serial.map(str::to_string),
        }
    }

    fn part(uuid: &str, name: &str) -> Part {
        Part {
            uuid: uuid.into(),
            name: Some(name.into()),
            unit: None,
            status: None,
            version: None,
        }
    }

    fn key() -> ApiKey {
        ApiKey::parse("k").unwrap()
    }

    #[test]
    fn children_resolve_in_sorted_order_and_skip_failures() {
        let mut api = FakeApi::default();
        api.children.insert(
            "root".into(),
            vec![
                config("c3", "p2", None),
                config("c2", "p1", Some("SN2")),
                config("c1", "p1", None),
                config("c4", "missing", None),
            ],
        );
        api.parts.insert("p1".into(), part("p1", "Widget"));
        api.parts.insert("p2".into(), part("p2", "Gadget"));

        let resolved = resolve_children(&api, &key(), &ParentFilter::Root).unwrap();
        let uuids: Vec<&str> = resolved.iter().map(|c| c.config.uuid.as_str()).collect();
        assert_eq!(uuids, ["c1", "c2", "c3"]);
        assert_eq!(
            *api.part_lookups.lock().unwrap(),
            ["missing", "p1", "p1", "p2"]
        );
    }

    #[test]
    fn expand_keeps_panel_when_listing_fails() {
        let mut api = FakeApi::default();
        api.parts.insert("p1".into(), part("p1", "Widget"));

        let completion = execute_request(
            &api,
            TaskRequest::Expand {
                key: key(),
                node: NodeKey::default(),
                config: config("c1", "p1", None),
            },
        );
        match completion {
            TaskCompletion::Expanded { result: Ok(outcome), .. } => {
                assert_eq!(outcome.part.name(), "Widget");
                assert!(outcome.children.is_empty());
            }
            other => panic!("unexpected completion: {other:?}"),
        }
    }

    #[test]
    fn expand_fails_when_own_part_is_missing() {
        let api = FakeApi::default();
        let completion = execute_request(
            &api,
            TaskRequest::Expand {
                key: key(),
                node: NodeKey::default(),
                config: config("c1", "p1", None),
            },
        );
        assert!(matches!(
            completion,
            TaskCompletion::Expanded { result: Err(_), .. }
        ));
    }

    fn arb_listing() -> impl Strategy<Value = Vec<(String, Option<String>)>> {
        let part_uuid = prop_oneof![Just("p1"), Just("p2"), Just("P3"), Just("p10")];
        let serial = prop_oneof![
            Just(None),
            Just(Some(String::new())),
            "[A-C0-9]{1,3}".prop_map(Some),
        ];
        prop::collection::vec((part_uuid.prop_map(str::to_string), serial), 0..24)
    }

    proptest! {
        #[test]
        fn resolved_children_are_ordered_and_stable(listing in arb_listing()) {
            let mut api = FakeApi::default();
            let configs: Vec<ConfigNode> = listing
                .iter()
                .enumerate()
                .map(|(index, (part_uuid, serial))| ConfigNode {
                    uuid: format!("c{index}"),
                    part_uuid: part_uuid.clone(),
                    parent_uuid: None,
                    end_unit_serial_no: serial.clone(),
                })
                .collect();
            for config in &configs {
                api.parts
                    .insert(config.part_uuid.clone(), part(&config.part_uuid, "Part"));
            }
            api.children.insert("root".into(), configs);

            let resolved = resolve_children(&api, &key(), &ParentFilter::Root).unwrap();
            prop_assert_eq!(resolved.len(), listing.len());

            let position = |child: &ResolvedChild| -> usize {
                child.config.uuid[1..].parse().unwrap()
            };
            for pair in resolved.windows(2) {
                let (a, b) = (&pair[0].config, &pair[1].config);
                let key_a = (a.part_uuid.as_str(), a.end_unit_serial_no.as_deref().unwrap_or(""));
                let key_b = (b.part_uuid.as_str(), b.end_unit_serial_no.as_deref().unwrap_or(""));
                prop_assert!(key_a <= key_b);
                if key_a == key_b {
                    prop_assert!(position(&pair[0]) < position(&pair[1]));
                }
            }

            let looked_up: Vec<String> = resolved.iter().map(|c| c.config.part_uuid.clone()).collect();
            prop_assert_eq!(&*api.part_lookups.lock().unwrap(), &looked_up);
        }
    }
}
