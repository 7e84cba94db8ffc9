//! Identify the host user behind a plugin page request.
//!
//! When a logged-in user opens a plugin page, the browser sends the host's
//! session cookie along. Relaying that cookie to the host's `current-user`
//! resource tells the plugin who the user is and what they may do.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CrmError, Result};
use crate::transport::{ApiRequest, Transport};

/// Name of the host's session cookie.
pub const SESSION_COOKIE: &str = "PHPSESSID";

/// Resource describing the session's user.
pub const CURRENT_USER_PATH: &str = "current-user";

/// Permission level on one host section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    View,
    Edit,
    Denied,
}

/// The user logged in to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: i64,

    pub username: String,

    /// Whether this is a client-zone user rather than staff.
    #[serde(default)]
    pub is_client: bool,

    /// Client ID, for client-zone users.
    #[serde(default)]
    pub client_id: Option<i64>,

    #[serde(default)]
    pub user_group: Option<String>,

    /// Section name to permission level.
    #[serde(default)]
    pub permissions: HashMap<String, PermissionLevel>,

    /// Special permission name to `allow`/`deny`.
    #[serde(default)]
    pub special_permissions: HashMap<String, String>,
}

impl CurrentUser {
    pub fn has_view_permission(&self, section: &str) -> bool {
        matches!(
            self.permissions.get(section),
            Some(PermissionLevel::View | PermissionLevel::Edit)
        )
    }

    pub fn has_edit_permission(&self, section: &str) -> bool {
        matches!(self.permissions.get(section), Some(PermissionLevel::Edit))
    }

    pub fn has_special_permission(&self, name: &str) -> bool {
        self.special_permissions.get(name).map(String::as_str) == Some("allow")
    }
}

/// Look up the user owning `session_token`.
///
/// The token travels as a cookie on this one request only. Returns
/// `Ok(None)` when the host does not recognise the session.
///
/// # Errors
///
/// Transport failures other than 401/403/404 propagate.
pub async fn current_user(
    client: &dyn Transport,
    session_token: &str,
) -> Result<Option<CurrentUser>> {
    if session_token.is_empty() {
        return Ok(None);
    }

    let request = ApiRequest::get(CURRENT_USER_PATH).with_cookie(SESSION_COOKIE, session_token);

    let value = match client.execute(request).await {
        Ok(value) => value,
        Err(err) if matches!(err.status_code(), Some(401 | 403 | 404)) => {
            tracing::debug!(status = ?err.status_code(), "session not recognised");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    match value {
        Value::Null => Ok(None),
        Value::Object(ref map) if map.is_empty() => Ok(None),
        other => serde_json::from_value(other)
            .map(Some)
            .map_err(CrmError::Parse),
    }
}
