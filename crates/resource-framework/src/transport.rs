//! # Resource Transport
//!
//! The seam between a store and its backing service. [`ResourceTransport`] is what the store
//! actor calls; [`HttpTransport`] implements it against the REST contract:
//!
//! | Operation | Request | Success | Failure mapping |
//! |-----------|---------|---------|-----------------|
//! | list | `GET /{collection}` | array of records | any error → `TransportFailed` |
//! | create | `POST /{collection}` | record (200/201) | 400/422 → `ValidationFailed` |
//! | update | `PUT /{collection}/{id}` | record | 404 → `NotFound` |
//! | delete | `DELETE /{collection}/{id}` | 200/204 | 404 → `NotFound` |
//!
//! Error bodies carry `{"message": "..."}`; the message is surfaced to the user when present.
//! File-bearing writes go out as multipart: one part for the file plus one text part per
//! non-null payload field. Timeouts belong to the HTTP client configured here.

use crate::entity::AdminResource;
use crate::error::{StoreError, GENERIC_ERROR_MESSAGE};
use crate::staging::StagedFile;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Remote operations a store needs from its backing service.
#[async_trait]
pub trait ResourceTransport<R: AdminResource>: Send + Sync + 'static {
    /// Fetches the whole collection in server order.
    async fn fetch_all(&self) -> Result<Vec<R>, StoreError>;

    async fn create(
        &self,
        payload: &R::Payload,
        file: Option<&StagedFile>,
    ) -> Result<R, StoreError>;

    async fn update(
        &self,
        id: &R::Id,
        payload: &R::Payload,
        file: Option<&StagedFile>,
    ) -> Result<R, StoreError>;

    async fn delete(&self, id: &R::Id) -> Result<(), StoreError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// REST transport over reqwest. One instance can serve every resource type.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL without a trailing slash.
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Builds a transport with a bearer token (optional) and the given timeouts.
    ///
    /// # Errors
    ///
    /// [`StoreError::TransportFailed`] when the token is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<&str>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                StoreError::TransportFailed(Some("invalid auth token".to_string()))
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| StoreError::TransportFailed(Some(e.to_string())))?;
        Ok(Self::with_client(base_url, client))
    }

    /// Wraps an already configured client.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let mut base_url = base_url.into();
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url<R: AdminResource>(&self) -> String {
        format!("{}/{}", self.base_url, R::COLLECTION)
    }

    fn item_url<R: AdminResource>(&self, id: &R::Id) -> String {
        format!("{}/{}/{}", self.base_url, R::COLLECTION, id)
    }

    /// Attaches the payload as JSON, or as multipart when a file rides along.
    async fn with_body<R: AdminResource>(
        &self,
        request: RequestBuilder,
        payload: &R::Payload,
        file: Option<&StagedFile>,
    ) -> Result<RequestBuilder, StoreError> {
        match (file, R::FILE) {
            (Some(file), Some(field)) => {
                let form = multipart_form(payload, field.name, file).await?;
                Ok(request.multipart(form))
            }
            (Some(_), None) => {
                warn!(collection = R::COLLECTION, "Resource has no file field, file ignored");
                Ok(request.json(payload))
            }
            (None, _) => Ok(request.json(payload)),
        }
    }
}

#[async_trait]
impl<R: AdminResource> ResourceTransport<R> for HttpTransport {
    async fn fetch_all(&self) -> Result<Vec<R>, StoreError> {
        let url = self.collection_url::<R>();
        debug!(%url, "GET");
        let response = send(self.client.get(&url)).await?;
        if !response.status().is_success() {
            return Err(classify(response, None).await);
        }
        decode(response).await
    }

    async fn create(
        &self,
        payload: &R::Payload,
        file: Option<&StagedFile>,
    ) -> Result<R, StoreError> {
        let url = self.collection_url::<R>();
        debug!(%url, has_file = file.is_some(), "POST");
        let request = self
            .with_body::<R>(self.client.post(&url), payload, file)
            .await?;
        let response = send(request).await?;
        if !response.status().is_success() {
            return Err(classify(response, None).await);
        }
        decode(response).await
    }

    async fn update(
        &self,
        id: &R::Id,
        payload: &R::Payload,
        file: Option<&StagedFile>,
    ) -> Result<R, StoreError> {
        let url = self.item_url::<R>(id);
        debug!(%url, has_file = file.is_some(), "PUT");
        let request = self
            .with_body::<R>(self.client.put(&url), payload, file)
            .await?;
        let response = send(request).await?;
        if !response.status().is_success() {
            return Err(classify(response, Some(&id.to_string())).await);
        }
        decode(response).await
    }

    async fn delete(&self, id: &R::Id) -> Result<(), StoreError> {
        let url = self.item_url::<R>(id);
        debug!(%url, "DELETE");
        let response = send(self.client.delete(&url)).await?;
        if !response.status().is_success() {
            return Err(classify(response, Some(&id.to_string())).await);
        }
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
    request.send().await.map_err(|error| {
        warn!(%error, "Request failed");
        StoreError::TransportFailed(None)
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    response.json::<T>().await.map_err(|error| {
        warn!(%error, "Response body did not decode");
        StoreError::TransportFailed(None)
    })
}

/// Maps a non-success response onto the store's error taxonomy.
///
/// `target` is the record the request addressed. Only such requests can be `NotFound`; a
/// 404 on the collection itself means the endpoint is wrong.
async fn classify(response: Response, target: Option<&str>) -> StoreError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty());
    warn!(%status, ?message, "Request rejected");
    match status {
        StatusCode::NOT_FOUND => match target {
            Some(target) => StoreError::NotFound(target.to_string()),
            None => StoreError::TransportFailed(message),
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => StoreError::ValidationFailed(
            message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        ),
        _ => StoreError::TransportFailed(message),
    }
}

async fn multipart_form<P: serde::Serialize>(
    payload: &P,
    file_field: &'static str,
    file: &StagedFile,
) -> Result<Form, StoreError> {
    let fields = match serde_json::to_value(payload) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => {
            return Err(StoreError::ValidationFailed(
                "Form data must be a set of named fields".to_string(),
            ))
        }
        Err(error) => return Err(StoreError::ValidationFailed(error.to_string())),
    };

    let mut form = Form::new();
    for (name, value) in fields {
        if name == file_field {
            continue;
        }
        let text = match value {
            Value::Null => continue,
            Value::String(text) => text,
            other => other.to_string(),
        };
        form = form.text(name, text);
    }

    let bytes = tokio::fs::read(&file.storage_path).await.map_err(|error| {
        warn!(path = %file.storage_path.display(), %error, "Staged file unreadable");
        StoreError::TransportFailed(Some("The uploaded file is no longer available".to_string()))
    })?;
    let part = Part::bytes(bytes)
        .file_name(file.original_name.clone())
        .mime_str(&file.content_type)
        .map_err(|_| StoreError::ValidationFailed(format!("Unsupported file type {}", file.content_type)))?;
    Ok(form.part(file_field, part))
}
