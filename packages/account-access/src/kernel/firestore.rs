//! Firestore REST document store.
//!
//! Documents live at `projects/{project}/databases/(default)/documents/{collection}/{key}`.
//! Existence is a plain GET (404 means absent); writes are a PATCH that creates or
//! replaces the document.

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use crate::kernel::{BaseDocumentStore, StoreError};

const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

pub struct FirestoreDocumentStore {
    client: Client,
    base_url: String,
    project_id: String,
    bearer_token: Option<String>,
}

impl FirestoreDocumentStore {
    pub fn new(project_id: String, bearer_token: Option<String>, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_FIRESTORE_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            project_id,
            bearer_token,
        }
    }

    fn document_url(&self, collection: &str, key: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}/{}",
            self.base_url, self.project_id, collection, key
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl BaseDocumentStore for FirestoreDocumentStore {
    async fn exists(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        let response = self
            .authorized(self.client.get(self.document_url(collection, key)))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.into()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => {
                let body = response.text().await.unwrap_or_default();
                error!(%status, collection, "Firestore lookup failed");
                Err(StoreError::Unavailable(anyhow!(
                    "Firestore returned {}: {}",
                    status,
                    body
                )))
            }
        }
    }

    async fn put(&self, collection: &str, key: &str, document: &Value) -> Result<(), StoreError> {
        let fields = match document {
            Value::Object(map) => encode_fields(map),
            _ => {
                return Err(StoreError::Encode(
                    "top-level document must be a JSON object".to_string(),
                ))
            }
        };

        let response = self
            .authorized(self.client.patch(self.document_url(collection, key)))
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, collection, "Firestore write failed");
            return Err(StoreError::Unavailable(anyhow!(
                "Firestore returned {}: {}",
                status,
                body
            )));
        }

        debug!(collection, "Firestore document written");
        Ok(())
    }
}

fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(name, value)| (name.clone(), encode_value(value)))
            .collect(),
    )
}

/// Convert plain JSON into Firestore's typed value representation.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        // Firestore wants int64 as a decimal string
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url() {
        let store = FirestoreDocumentStore::new(
            "eventify".to_string(),
            None,
            Some("http://localhost:8080/".to_string()),
        );
        assert_eq!(
            store.document_url("users", "380991234567"),
            "http://localhost:8080/v1/projects/eventify/databases/(default)/documents/users/380991234567"
        );
    }

    #[test]
    fn test_encode_account_fields() {
        let doc = json!({
            "id": "380991234567",
            "name": "Olena",
            "email": "olena@example.com",
            "phoneNumber": "380991234567",
        });
        let Value::Object(map) = doc else { unreachable!() };

        let encoded = encode_fields(&map);

        assert_eq!(encoded["id"], json!({ "stringValue": "380991234567" }));
        assert_eq!(encoded["phoneNumber"], json!({ "stringValue": "380991234567" }));
        assert_eq!(encoded["name"], json!({ "stringValue": "Olena" }));
    }

    #[test]
    fn test_encode_nested_values() {
        assert_eq!(encode_value(&json!(42)), json!({ "integerValue": "42" }));
        assert_eq!(encode_value(&json!(1.5)), json!({ "doubleValue": 1.5 }));
        assert_eq!(encode_value(&json!(true)), json!({ "booleanValue": true }));
        assert_eq!(encode_value(&Value::Null), json!({ "nullValue": null }));
        assert_eq!(
            encode_value(&json!(["a"])),
            json!({ "arrayValue": { "values": [{ "stringValue": "a" }] } })
        );
        assert_eq!(
            encode_value(&json!({ "k": "v" })),
            json!({ "mapValue": { "fields": { "k": { "stringValue": "v" } } } })
        );
    }
}
