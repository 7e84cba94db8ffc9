//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::endpoint::Endpoint;
use crate::error::{CrmError, Result};
use crate::transport::Transport;

/// Fetch a single entity by ID.
///
/// # Example
///
/// ```ignore
/// use crm_plugin_sdk::{Client, CrmClient, Get};
///
/// let client = CrmClient::from_env()?;
/// let customer = Client::get_by_id(&client, 42).await?;
/// ```
#[async_trait]
pub trait Get: Endpoint {
    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::NotFound`] when the host answers 404, or any
    /// transport error.
    async fn get_by_id(client: &dyn Transport, id: i64) -> Result<Self> {
        let path = Self::SCHEMA.item_path(id);
        tracing::debug!(entity = Self::SCHEMA.entity, id, "fetching");

        let value = match client.get(&path).await {
            Ok(value) => value,
            Err(err) if err.status_code() == Some(404) => {
                return Err(CrmError::NotFound {
                    entity_type: Self::SCHEMA.entity,
                    id: id.to_string(),
                });
            }
            Err(err) => return Err(err),
        };

        Self::from_json(value)
    }
}
