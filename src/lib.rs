//! SDK for building plugins against a CRM host's REST API.
//!
//! Entities of the host (clients, surcharges, payment plans, ...) are
//! modelled as typed endpoint models that keep their own state locally and
//! synchronise it with the host on demand. Each model tracks which fields
//! changed since it was last in sync, so updates send only those fields.
//!
//! # Quick Start
//!
//! ```no_run
//! use crm_plugin_sdk::{Client, CrmClient, Endpoint, Get, Insert, List, Update};
//!
//! #[tokio::main]
//! async fn main() -> crm_plugin_sdk::Result<()> {
//!     // Create client from environment variables
//!     let api = CrmClient::from_env()?;
//!
//!     // Create a new client on the host
//!     let mut customer = Client::transient();
//!     customer.set_first_name("Jane")?.set_last_name("Doe")?;
//!     customer.insert(&api).await?;
//!
//!     // Change one field; only that field is sent
//!     customer.set_note("Prefers e-mail")?;
//!     customer.update(&api).await?;
//!
//!     // Fetch and list
//!     let same = Client::get_by_id(&api, customer.id().unwrap_or_default()).await?;
//!     println!("Client: {}", same.display_name()?);
//!
//!     let everyone = Client::list_all(&api).await?;
//!     println!("Found {} clients", everyone.count());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Endpoint`] - Base trait: schema, local state, validation
//! - [`Get`], [`List`], [`Insert`], [`Update`], [`Delete`] - Remote
//!   operations, implemented by each entity its resource supports
//! - [`Transport`] - How requests reach the host; [`CrmClient`] is the
//!   HTTP implementation
//! - [`Collection`] - Ordered, typed list of models
//!
//! Models move through the [`Lifecycle`] states transient, persisted,
//! modified and deleted. Operations illegal in the current state fail with
//! [`CrmError::InvalidState`] before any request is made.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `CRM_APP_KEY` (required) - The plugin's app key
//! - `CRM_API_URL` (optional) - Base URL (defaults to `http://localhost/api/v1.0`)
//!
//! Plugins running inside the host use [`PluginConfig`] instead, which reads
//! the `ucrm.json` file the host provisions.

pub mod cli;
mod client;
mod collection;
mod config;
mod endpoint;
mod error;
mod models;
pub mod output;
mod record;
mod schema;
mod security;
mod tracker;
mod traits;
mod transport;
mod validation;

#[cfg(feature = "test-server")]
pub mod mock_server;

#[cfg(test)]
mod testing;

// Re-export core types
pub use client::{CrmClient, APP_KEY_HEADER};
pub use config::{PluginConfig, API_PREFIX, PLUGIN_CONFIG_FILE};
pub use error::{CrmError, Result};
pub use transport::{ApiRequest, Transport};

// Endpoint model machinery
pub use collection::Collection;
pub use endpoint::Endpoint;
pub use record::{Lifecycle, Record};
pub use schema::{
    format_date, parse_date, EntitySchema, FieldAccess, FieldDef, FieldDefault, FieldKind,
    Operation, DATE_FORMAT,
};
pub use tracker::ChangeTracker;
pub use validation::{validate, ValidationReport};

// Re-export traits
pub use traits::{Delete, Get, Insert, List, Update};

// Re-export models
pub use models::{
    // Client types
    Client,
    ClientListQuery,
    ClientType,
    // Payment plan types
    PaymentPlan,
    PaymentPlanListQuery,
    PERIODS,
    PROVIDERS,
    STATUSES,
    // Surcharge types
    Surcharge,
    SurchargeListQuery,
};

// Session relay
pub use security::{current_user, CurrentUser, PermissionLevel, CURRENT_USER_PATH, SESSION_COOKIE};
