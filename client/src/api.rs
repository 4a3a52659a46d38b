use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::model::{Resource, SortKey, UploadFile};

const LOAD_FAILED: &str = "Failed to load photos";
const UPLOAD_FAILED: &str = "Failed to upload photo";
const DELETE_FAILED: &str = "Failed to delete photo";
const RENAME_FAILED: &str = "Failed to update photo name";

/// The four collection calls the manager depends on
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn list(&self, owner: &str, sort: SortKey) -> Result<Vec<Resource>, ApiError>;

    /// One request for the whole batch; returns the created records in server order
    async fn upload(&self, owner: &str, files: &[UploadFile]) -> Result<Vec<Resource>, ApiError>;

    /// `url` is needed so the stored object goes too, not just the row
    async fn delete(&self, id: &str, url: &str) -> Result<(), ApiError>;

    async fn rename(&self, id: &str, new_name: &str) -> Result<Resource, ApiError>;
}

#[derive(Serialize)]
struct RenameBody<'a> {
    id: &'a str,
    #[serde(rename = "newName")]
    new_name: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `ResourceApi` over HTTP against `/api/{collection}`
#[derive(Debug, Clone)]
pub struct HttpResourceApi {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpResourceApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    pub fn with_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            endpoint: config.collection_url(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ResourceApi for HttpResourceApi {
    async fn list(&self, owner: &str, sort: SortKey) -> Result<Vec<Resource>, ApiError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("userId", owner), ("sortType", sort.as_str())])
            .send()
            .await?;
        read_json(response, LOAD_FAILED).await
    }

    async fn upload(&self, owner: &str, files: &[UploadFile]) -> Result<Vec<Resource>, ApiError> {
        let mut form = Form::new().text("userId", owner.to_string());
        for file in files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type).map_err(|_| {
                    ApiError::Validation(format!("Invalid content type for {}", file.name))
                })?;
            }
            form = form.part("files", part);
        }

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        read_json(response, UPLOAD_FAILED).await
    }

    async fn delete(&self, id: &str, url: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(&self.endpoint)
            .query(&[("id", id), ("photo_url", url)])
            .send()
            .await?;
        read_body(response, DELETE_FAILED).await.map(|_| ())
    }

    async fn rename(&self, id: &str, new_name: &str) -> Result<Resource, ApiError> {
        let response = self
            .http
            .patch(&self.endpoint)
            .json(&RenameBody { id, new_name })
            .send()
            .await?;
        read_json(response, RENAME_FAILED).await
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, ApiError> {
    let body = read_body(response, fallback).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Success body, or `Server` with the body's `error` (else `fallback`)
async fn read_body(response: reqwest::Response, fallback: &str) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    let body = response.bytes().await?.to_vec();

    if status.is_success() {
        return Ok(body);
    }

    tracing::debug!("collection API answered {}", status);
    Err(ApiError::Server {
        status: status.as_u16(),
        message: server_message(&body).unwrap_or_else(|| fallback.to_string()),
    })
}

fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_targets_the_collection() {
        let config = ClientConfig::new("http://localhost:3000/").with_collection("food");
        let api = HttpResourceApi::new(&config).unwrap();
        assert_eq!(api.endpoint(), "http://localhost:3000/api/food");
    }

    #[test]
    fn server_message_prefers_the_error_field() {
        assert_eq!(
            server_message(br#"{"error":"User ID is required"}"#).as_deref(),
            Some("User ID is required")
        );
        assert_eq!(server_message(br#"{"error":""}"#), None);
        assert_eq!(server_message(b"<html>bad gateway</html>"), None);
    }

    #[test]
    fn rename_body_uses_wire_names() {
        let body = serde_json::to_value(RenameBody {
            id: "p1",
            new_name: "Beach",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"id": "p1", "newName": "Beach"}));
    }
}
