//! REST client for the Trellis server.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use trellis_core::{EntityId, WorkspaceId};

use crate::routes::{Operation, RouteError, RouteSet};
use crate::types::{
    CreateUpdateRequest, ListAttachmentsResponse, ListEntitiesResponse, ListUpdatesResponse,
    ServerError, UpdateRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

/// Credentials presented on every request.
#[derive(Debug, Clone, Default)]
pub struct ClientCredentials {
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    workspace_id: WorkspaceId,
    auth_header: HeaderMap,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        workspace_id: WorkspaceId,
        credentials: &ClientCredentials,
        timeout: Duration,
    ) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let auth_header = build_auth_headers(credentials)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            workspace_id,
            auth_header,
        })
    }

    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    pub async fn list_updates(
        &self,
        routes: &RouteSet,
        entity_id: EntityId,
    ) -> Result<Vec<UpdateRecord>, ApiClientError> {
        let path = routes.operation(Operation::ListUpdates).render(entity_id);
        let response: ListUpdatesResponse = self.get_json(&path).await?;
        Ok(response.updates)
    }

    pub async fn list_attachments(
        &self,
        routes: &RouteSet,
        entity_id: EntityId,
    ) -> Result<ListAttachmentsResponse, ApiClientError> {
        let path = routes
            .operation(Operation::ListAttachments)
            .render(entity_id);
        self.get_json(&path).await
    }

    pub async fn create_update(
        &self,
        routes: &RouteSet,
        entity_id: EntityId,
        req: &CreateUpdateRequest,
    ) -> Result<UpdateRecord, ApiClientError> {
        let path = routes.operation(Operation::CreateUpdate).render(entity_id);
        self.post_json(&path, req).await
    }

    pub async fn delete_update(
        &self,
        routes: &RouteSet,
        update_id: EntityId,
    ) -> Result<(), ApiClientError> {
        let path = routes.operation(Operation::DeleteUpdate).render(update_id);
        self.delete(&path).await
    }

    pub async fn delete_attachment(
        &self,
        routes: &RouteSet,
        attachment_id: EntityId,
    ) -> Result<(), ApiClientError> {
        let path = routes
            .operation(Operation::DeleteAttachment)
            .render(attachment_id);
        self.delete(&path).await
    }

    /// Directory listing used by the host surface around the sidebar.
    pub async fn list_entities(
        &self,
        collection_path: &str,
    ) -> Result<ListEntitiesResponse, ApiClientError> {
        self.get_json(collection_path).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(url)
            .headers(self.auth_header.clone())
            .header("x-workspace-id", self.workspace_id.as_uuid().to_string())
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(url)
            .headers(self.auth_header.clone())
            .header("x-workspace-id", self.workspace_id.as_uuid().to_string())
            .json(body)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .delete(url)
            .headers(self.auth_header.clone())
            .header("x-workspace-id", self.workspace_id.as_uuid().to_string())
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.response_error(status, response).await)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(self.response_error(status, response).await)
        }
    }

    async fn response_error(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiClientError {
        match response.text().await {
            Ok(text) => {
                if let Ok(server_error) = serde_json::from_str::<ServerError>(&text) {
                    return ApiClientError::InvalidResponse(format!(
                        "{}: {}",
                        server_error.code, server_error.message
                    ));
                }
                ApiClientError::InvalidResponse(format!("HTTP {}: {}", status.as_u16(), text))
            }
            Err(err) => ApiClientError::Http(err),
        }
    }
}

fn build_auth_headers(credentials: &ClientCredentials) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &credentials.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    if let Some(token) = &credentials.bearer_token {
        let value = format!("Bearer {}", token);
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&value).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn auth_headers_carry_both_credentials() {
        let headers = build_auth_headers(&ClientCredentials {
            api_key: Some("key-123".to_string()),
            bearer_token: Some("tok-456".to_string()),
        })
        .unwrap();
        assert_eq!(headers.get("x-api-key").unwrap(), "key-123");
        assert_eq!(headers.get("authorization").unwrap(), "Bearer tok-456");
    }

    #[test]
    fn auth_headers_reject_control_characters() {
        let result = build_auth_headers(&ClientCredentials {
            api_key: Some("bad\nkey".to_string()),
            bearer_token: None,
        });
        assert!(matches!(result, Err(ApiClientError::Config(_))));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new(
            "http://localhost:8080/",
            WorkspaceId::new(Uuid::now_v7()),
            &ClientCredentials::default(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
