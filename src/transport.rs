//! Transport abstraction for the CRM REST API.
//!
//! Endpoint models never hold a client; every operation receives a
//! `&dyn Transport` explicitly. Per-request settings (query, body, relayed
//! session cookies) travel on the [`ApiRequest`] itself, so a transport is
//! never reconfigured between calls.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{CrmError, Result};

/// A single request against the CRM API, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub cookies: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            cookies: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach query parameters from any serializable struct.
    ///
    /// `None` fields are dropped; scalars are rendered as strings and
    /// arrays expand to repeated `key[]` pairs.
    pub fn with_query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self> {
        let value = serde_json::to_value(query)?;
        let Value::Object(map) = value else {
            return Err(CrmError::InvalidArgument {
                field: "query".to_string(),
                reason: "query parameters must serialize to an object".to_string(),
            });
        };

        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items {
                        if let Some(s) = scalar_to_string(&item) {
                            self.query.push((format!("{key}[]"), s));
                        }
                    }
                }
                other => {
                    if let Some(s) = scalar_to_string(&other) {
                        self.query.push((key, s));
                    }
                }
            }
        }

        Ok(self)
    }

    /// Relay a cookie on this request only.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// The `Cookie` header value, if any cookies are attached.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

/// Issues requests against the CRM API and decodes JSON responses.
///
/// Implementations fail with an error from the HTTP family
/// (see [`CrmError::is_http`]) on network failure, non-2xx status or an
/// undecodable body. Nothing is retried.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the decoded JSON body (`Null` when empty).
    async fn execute(&self, request: ApiRequest) -> Result<Value>;

    async fn get(&self, path: &str) -> Result<Value> {
        self.execute(ApiRequest::get(path)).await
    }

    async fn get_with_query(&self, path: &str, query: Vec<(String, String)>) -> Result<Value> {
        let mut request = ApiRequest::get(path);
        request.query = query;
        self.execute(request).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(ApiRequest::post(path, body)).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(ApiRequest::patch(path, body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(ApiRequest::put(path, body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.execute(ApiRequest::delete(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    struct Filters {
        user_ident: Option<String>,
        limit: Option<u32>,
        is_lead: Option<bool>,
        ids: Vec<i64>,
    }

    #[test]
    fn test_with_query_drops_none_and_expands_arrays() {
        let filters = Filters {
            user_ident: Some("A-1".to_string()),
            limit: None,
            is_lead: Some(true),
            ids: vec![3, 4],
        };
        let request = ApiRequest::get("clients").with_query(&filters).unwrap();

        assert!(request.query.contains(&("userIdent".to_string(), "A-1".to_string())));
        assert!(request.query.contains(&("isLead".to_string(), "1".to_string())));
        assert!(request.query.contains(&("ids[]".to_string(), "3".to_string())));
        assert!(request.query.contains(&("ids[]".to_string(), "4".to_string())));
        assert!(!request.query.iter().any(|(k, _)| k == "limit"));
    }

    #[test]
    fn test_with_query_rejects_non_object() {
        let result = ApiRequest::get("clients").with_query(&vec![1, 2]);
        assert!(matches!(result, Err(CrmError::InvalidArgument { .. })));
    }

    #[test]
    fn test_cookie_header() {
        let request = ApiRequest::get("current-user");
        assert_eq!(request.cookie_header(), None);

        let request = request
            .with_cookie("PHPSESSID", "abc")
            .with_cookie("lang", "en");
        assert_eq!(request.cookie_header().as_deref(), Some("PHPSESSID=abc; lang=en"));
    }
}
