use crate::api::{
    API_KEY_HEADER, AllowableStatuses, ApiError, ApiResult, ConfigApi, ConfigNode, Operation,
    ParentFilter, Part, PartUpdate,
};
use crate::session::ApiKey;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Blocking HTTP implementation of [`ConfigApi`].
pub struct HttpApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            agent: builder.build(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: &str, path: &str, key: &ApiKey) -> ureq::Request {
        let url = format!("{}{}", self.base_url, path);
        debug!(method, %url, "api request");
        self.agent
            .request(method, &url)
            .set(API_KEY_HEADER, key.expose())
    }
}

impl ConfigApi for HttpApi {
    fn health_check(&self, key: &ApiKey) -> ApiResult<serde_json::Value> {
        let response = send(self.request("GET", "/api/health", key), None)
            .map_err(ApiError::Connectivity)?;
        decode(response).map_err(ApiError::Connectivity)
    }

    fn get_configuration(
        &self,
        key: &ApiKey,
        parent: &ParentFilter,
    ) -> ApiResult<Vec<ConfigNode>> {
        let mut request = self.request("GET", "/api/configs/children", key);
        if let Some(parent_uuid) = parent.query_value() {
            request = request.query("parentUuid", parent_uuid);
        }
        fetch(request, None, Operation::Configuration)
    }

    fn get_part(&self, key: &ApiKey, part_uuid: &str) -> ApiResult<Part> {
        let path = format!("/api/parts/{part_uuid}");
        fetch(self.request("GET", &path, key), None, Operation::PartInfo)
    }

    fn get_allowed_statuses(&self, key: &ApiKey, part_uuid: &str) -> ApiResult<AllowableStatuses> {
        let path = format!("/api/parts/{part_uuid}/allowable-statuses");
        fetch(
            self.request("GET", &path, key),
            None,
            Operation::AllowedStatuses,
        )
    }

    fn update_part(&self, key: &ApiKey, part_uuid: &str, update: &PartUpdate) -> ApiResult<Part> {
        let path = format!("/api/parts/{part_uuid}");
        let body = serde_json::to_string(update)
            .map_err(|err| ApiError::fetch(Operation::UpdatePart, err.to_string()))?;
        fetch(
            self.request("PUT", &path, key),
            Some(&body),
            Operation::UpdatePart,
        )
    }
}

fn fetch<T: DeserializeOwned>(
    request: ureq::Request,
    body: Option<&str>,
    operation: Operation,
) -> ApiResult<T> {
    let response = send(request, body).map_err(|reason| ApiError::fetch(operation, reason))?;
    decode(response).map_err(|reason| ApiError::fetch(operation, reason))
}

fn send(request: ureq::Request, body: Option<&str>) -> Result<ureq::Response, String> {
    let result = match body {
        Some(body) => request
            .set("Content-Type", "application/json")
            .send_string(body),
        None => request.call(),
    };
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(code, response)) => Err(status_text(code, &response)),
        Err(ureq::Error::Transport(transport)) => Err(transport.to_string()),
    }
}

fn status_text(code: u16, response: &ureq::Response) -> String {
    let text = response.status_text().trim();
    if text.is_empty() {
        code.to_string()
    } else {
        text.to_string()
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, String> {
    serde_json::from_reader(response.into_reader())
        .map_err(|err| format!("invalid response body: {err}"))
}
