use serde::{Deserialize, Serialize};

/// Sentinel parent id used to list root configurations.
pub const ROOT_PARENT: &str = "root";

/// One position in the configuration hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigNode {
    pub uuid: String,
    pub part_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_unit_serial_no: Option<String>,
}

impl ConfigNode {
    /// Ordering key for sibling lists; a missing serial sorts as "".
    pub fn sort_key(&self) -> (&str, &str) {
        (
            self.part_uuid.as_str(),
            self.end_unit_serial_no.as_deref().unwrap_or(""),
        )
    }

    pub fn serial(&self) -> Option<&str> {
        self.end_unit_serial_no
            .as_deref()
            .filter(|serial| !serial.is_empty())
    }
}

/// Part record as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
}

impl Part {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn unit(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }

    /// Display form of the optional version; `None` hides the row.
    pub fn version_label(&self) -> Option<String> {
        match self.version.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) if text.is_empty() => None,
            serde_json::Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowableStatuses {
    #[serde(default, rename = "allowableStatuses")]
    pub allowable_statuses: Vec<String>,
}

/// Body of `PUT /api/parts/{uuid}`; only provided fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PartUpdate {
    pub fn unit(value: impl Into<String>) -> Self {
        Self {
            unit: Some(value.into()),
            status: None,
        }
    }

    pub fn status(value: impl Into<String>) -> Self {
        Self {
            unit: None,
            status: Some(value.into()),
        }
    }
}

/// Which configurations to list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentFilter {
    Root,
    Parent(String),
}

impl ParentFilter {
    pub fn from_id(id: &str) -> Self {
        if id == ROOT_PARENT {
            ParentFilter::Root
        } else {
            ParentFilter::Parent(id.to_string())
        }
    }

    pub fn query_value(&self) -> Option<&str> {
        match self {
            ParentFilter::Root => None,
            ParentFilter::Parent(id) => Some(id.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_node_reads_camel_case_fields() {
        let node: ConfigNode = serde_json::from_value(json!({
            "uuid": "c2",
            "partUuid": "p1",
            "parentUuid": "c0",
            "endUnitSerialNo": "SN2",
            "createdAt": "ignored"
        }))
        .expect("config node");
        assert_eq!(node.part_uuid, "p1");
        assert_eq!(node.parent_uuid.as_deref(), Some("c0"));
        assert_eq!(node.sort_key(), ("p1", "SN2"));
    }

    #[test]
    fn missing_serial_sorts_as_empty() {
        let node: ConfigNode =
            serde_json::from_value(json!({"uuid": "c1", "partUuid": "p1"})).expect("config node");
        assert_eq!(node.sort_key(), ("p1", ""));
        assert_eq!(node.serial(), None);
    }

    #[test]
    fn part_tolerates_sparse_records() {
        let part: Part =
            serde_json::from_value(json!({"uuid": "p1", "status": "Active"})).expect("part");
        assert_eq!(part.name(), "");
        assert_eq!(part.unit(), "");
        assert_eq!(part.status(), "Active");
        assert_eq!(part.version_label(), None);
    }

    #[test]
    fn version_label_accepts_numbers_and_strings() {
        let numeric: Part =
            serde_json::from_value(json!({"uuid": "p", "version": 3})).expect("part");
        assert_eq!(numeric.version_label().as_deref(), Some("3"));
        let text: Part =
            serde_json::from_value(json!({"uuid": "p", "version": "B.2"})).expect("part");
        assert_eq!(text.version_label().as_deref(), Some("B.2"));
        let null: Part =
            serde_json::from_value(json!({"uuid": "p", "version": null})).expect("part");
        assert_eq!(null.version_label(), None);
    }

    #[test]
    fn part_update_serializes_only_provided_field() {
        let body = serde_json::to_value(PartUpdate::status("Active")).expect("json");
        assert_eq!(body, json!({"status": "Active"}));
        let body = serde_json::to_value(PartUpdate::unit("kg")).expect("json");
        assert_eq!(body, json!({"unit": "kg"}));
    }

    #[test]
    fn allowable_statuses_default_to_empty() {
        let statuses: AllowableStatuses = serde_json::from_value(json!({})).expect("statuses");
        assert!(statuses.allowable_statuses.is_empty());
    }

    #[test]
    fn root_sentinel_omits_filter() {
        assert_eq!(ParentFilter::from_id("root").query_value(), None);
        assert_eq!(ParentFilter::from_id("c1").query_value(), Some("c1"));
    }
}
