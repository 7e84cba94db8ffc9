//! List trait for fetching collections of entities.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::collection::Collection;
use crate::endpoint::Endpoint;
use crate::error::{CrmError, Result};
use crate::transport::{ApiRequest, Transport};

/// List/filter entities.
///
/// # Example
///
/// ```ignore
/// use crm_plugin_sdk::{Client, ClientListQuery, CrmClient, List};
///
/// let client = CrmClient::from_env()?;
///
/// let leads = Client::list(&client, &ClientListQuery {
///     is_lead: Some(true),
///     ..Default::default()
/// }).await?;
///
/// let everyone = Client::list_all(&client).await?;
/// ```
#[async_trait]
pub trait List: Endpoint {
    /// Query parameters for filtering.
    type Query: Serialize + Default + Send + Sync;

    /// Path of the list resource.
    fn list_path() -> String {
        Self::SCHEMA.path.to_string()
    }

    /// List entities matching the query.
    ///
    /// Every returned model is persisted with an empty dirty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the host does not answer
    /// with an array of objects.
    async fn list(client: &dyn Transport, query: &Self::Query) -> Result<Collection<Self>> {
        let path = Self::list_path();
        let request = ApiRequest::get(path.as_str()).with_query(query)?;

        let value = client.execute(request).await?;
        let Value::Array(items) = value else {
            return Err(CrmError::InvalidResponse(format!(
                "expected a JSON array from {path}"
            )));
        };

        let collection = items
            .into_iter()
            .map(Self::from_json)
            .collect::<Result<Collection<Self>>>()?;

        tracing::debug!(
            entity = Self::SCHEMA.entity,
            count = collection.count(),
            "listed"
        );
        Ok(collection)
    }

    /// List entities with default filters.
    async fn list_all(client: &dyn Transport) -> Result<Collection<Self>> {
        let query = Self::Query::default();
        Self::list(client, &query).await
    }
}
