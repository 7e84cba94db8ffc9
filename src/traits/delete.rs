//! Delete trait for removing entities.

use async_trait::async_trait;

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::transport::Transport;

/// Remove a persisted entity from the host.
///
/// After a successful delete the model is terminal: every further read,
/// write or remote operation fails with
/// [`CrmError::InvalidState`](crate::CrmError::InvalidState).
#[async_trait]
pub trait Delete: Endpoint {
    fn delete_path(&self, id: i64) -> String {
        Self::SCHEMA.item_path(id)
    }

    async fn delete(&mut self, client: &dyn Transport) -> Result<()> {
        let id = self.record().require_id("delete")?;
        let path = self.delete_path(id);

        tracing::debug!(entity = Self::SCHEMA.entity, id, "deleting");
        client.delete(&path).await?;

        self.record_mut().mark_deleted();
        Ok(())
    }
}
