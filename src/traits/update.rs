//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::transport::Transport;

/// Send local changes of a persisted entity as a partial update.
///
/// # Example
///
/// ```ignore
/// use crm_plugin_sdk::{Client, CrmClient, Get, Update};
///
/// let api = CrmClient::from_env()?;
/// let mut customer = Client::get_by_id(&api, 42).await?;
/// customer.set_note("Prefers e-mail")?;
/// customer.update(&api).await?; // PATCH clients/42 {"note": "..."}
/// ```
#[async_trait]
pub trait Update: Endpoint {
    /// Path to `PATCH` an entity at.
    fn update_path(&self, id: i64) -> String {
        Self::SCHEMA.item_path(id)
    }

    /// `PATCH` only the dirty fields, then take whatever the host echoes.
    ///
    /// A model with no dirty fields is left as is and nothing is sent. The
    /// same holds when every dirty field is read-only after create: those
    /// stay dirty and the model stays [`Lifecycle::Modified`](crate::Lifecycle::Modified).
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::InvalidState`](crate::CrmError::InvalidState) for
    /// a transient or deleted model and
    /// [`CrmError::Validation`](crate::CrmError::Validation) when a change
    /// clears a required field, both without contacting the host; otherwise
    /// any transport error.
    async fn update(&mut self, client: &dyn Transport) -> Result<()> {
        let id = self.record().require_id("update")?;
        let Some(payload) = self.record().patch_payload()? else {
            tracing::debug!(entity = Self::SCHEMA.entity, id, "nothing writable to send, skipping update");
            return Ok(());
        };

        let path = self.update_path(id);
        tracing::debug!(
            entity = Self::SCHEMA.entity,
            id,
            dirty = ?self.dirty_fields(),
            "updating"
        );
        let response = client.patch(&path, payload).await?;

        self.record_mut().absorb_updated(response)
    }
}
