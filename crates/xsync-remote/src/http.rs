//! Reqwest-backed RemoteApi implementation
//!
//! Thin JSON client over the remote workspace's metadata API: bearer-token
//! auth, 30s timeout, one request at a time. Remote error messages are
//! surfaced verbatim; uniqueness conflicts are classified so the push
//! engine can run its delete-then-recreate recovery.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::api::{CreatedObject, RemoteApi, RequestOptions};
use crate::error::{Error, Result};
use crate::types::{ObjectType, RawObject};

/// HTTP client for the remote workspace API.
pub struct HttpRemoteApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpRemoteApi {
    /// Create a client for the given API base URL and bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    fn collection_url(&self, object_type: ObjectType) -> String {
        format!("{}/{}", self.base_url, object_type.collection())
    }

    fn object_url(&self, object_type: ObjectType, id: u64) -> String {
        format!("{}/{}/{}", self.base_url, object_type.collection(), id)
    }

    fn write_body(content: &str, options: RequestOptions) -> Value {
        let mut body = serde_json::json!({ "xanoscript": content });
        if let Some(group_id) = options.group_id {
            body["apigroup_id"] = serde_json::json!(group_id);
        }
        body
    }
}

/// Map a non-success response to the error taxonomy.
///
/// 409 is always a uniqueness conflict; 400/422 are conflicts only when
/// the remote's message says so. Everything else surfaces verbatim.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or(body);

    let code = status.as_u16();
    let conflict = code == 409
        || (matches!(code, 400 | 422) && message.to_lowercase().contains("unique"));
    if conflict {
        Err(Error::UniquenessConflict { message })
    } else {
        Err(Error::Api {
            status: code,
            message,
        })
    }
}

/// Accept both a bare array and an `{items: [...]}` envelope.
fn parse_list(value: Value) -> Result<Vec<RawObject>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => return Err(Error::malformed("expected array or {items: [...]}")),
        },
        _ => return Err(Error::malformed("expected array or {items: [...]}")),
    };
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| Error::malformed(format!("bad list entry: {e}")))
        })
        .collect()
}

#[async_trait]
impl RemoteApi for HttpRemoteApi {
    async fn list_objects(
        &self,
        object_type: ObjectType,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawObject>> {
        debug!(%object_type, page, "listing remote objects");
        let response = self
            .client
            .get(self.collection_url(object_type))
            .bearer_auth(&self.token)
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;
        let value: Value = check(response).await?.json().await?;
        parse_list(value)
    }

    async fn create_object(
        &self,
        object_type: ObjectType,
        content: &str,
        options: RequestOptions,
    ) -> Result<CreatedObject> {
        debug!(%object_type, "creating remote object");
        let response = self
            .client
            .post(self.collection_url(object_type))
            .bearer_auth(&self.token)
            .json(&Self::write_body(content, options))
            .send()
            .await?;
        let value: Value = check(response).await?.json().await?;
        let id = value
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::malformed("create response missing id"))?;
        Ok(CreatedObject { id })
    }

    async fn update_object(
        &self,
        object_type: ObjectType,
        id: u64,
        content: &str,
        options: RequestOptions,
    ) -> Result<()> {
        debug!(%object_type, id, "updating remote object");
        let response = self
            .client
            .put(self.object_url(object_type, id))
            .bearer_auth(&self.token)
            .json(&Self::write_body(content, options))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn delete_object(&self, object_type: ObjectType, id: u64) -> Result<()> {
        debug!(%object_type, id, "deleting remote object");
        let response = self
            .client
            .delete(self.object_url(object_type, id))
            .bearer_auth(&self.token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn get_object(&self, object_type: ObjectType, id: u64) -> Result<RawObject> {
        debug!(%object_type, id, "fetching remote object");
        let response = self
            .client
            .get(self.object_url(object_type, id))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let value: Value = check(response).await?.json().await?;
        serde_json::from_value(value).map_err(|e| Error::malformed(format!("bad object: {e}")))
    }
}
