//! Insert trait for creating entities.

use async_trait::async_trait;

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::transport::Transport;

/// Create a transient entity on the host.
///
/// # Example
///
/// ```ignore
/// use crm_plugin_sdk::{Client, CrmClient, Endpoint, Insert};
///
/// let api = CrmClient::from_env()?;
/// let mut customer = Client::transient();
/// customer.set_first_name("Jane")?.set_last_name("Doe")?;
/// customer.insert(&api).await?;
/// assert!(customer.id().is_some());
/// ```
#[async_trait]
pub trait Insert: Endpoint {
    /// Path to `POST` new entities to.
    fn insert_path(&self) -> String {
        Self::SCHEMA.path.to_string()
    }

    /// Send the full state of a transient entity and adopt the host's answer.
    ///
    /// On success the model holds the assigned ID and every field the host
    /// echoed back, and its dirty set is empty. On failure it is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::InvalidState`](crate::CrmError::InvalidState) if
    /// the model already has an ID or was deleted and
    /// [`CrmError::Validation`](crate::CrmError::Validation) if required
    /// fields are missing, both without contacting the host; otherwise any
    /// transport error.
    async fn insert(&mut self, client: &dyn Transport) -> Result<()> {
        let payload = self.record().create_payload()?;
        let path = self.insert_path();

        tracing::debug!(entity = Self::SCHEMA.entity, %path, "inserting");
        let response = client.post(&path, payload).await?;

        self.record_mut().absorb_created(response)?;
        tracing::debug!(entity = Self::SCHEMA.entity, id = ?self.id(), "inserted");
        Ok(())
    }
}
