//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the crmapi binary.

use clap::{Parser, Subcommand, ValueEnum};

/// CRM API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "crmapi", about = "CRM plugin API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests and responses to stderr.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: i64,
    },

    /// List entities with optional paging.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Maximum number of items to return.
        #[arg(long)]
        limit: Option<u32>,

        /// Number of items to skip.
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Delete an entity.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// The entity ID.
        id: i64,
    },

    /// Cancel a payment plan.
    Cancel {
        /// The payment plan ID.
        id: i64,
    },

    /// Show the user owning a host session.
    Whoami {
        /// Value of the host's session cookie.
        #[arg(long, env = "CRM_SESSION")]
        session: String,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A client or lead.
    #[value(alias = "clients")]
    Client,
    /// A surcharge definition.
    #[value(alias = "surcharges")]
    Surcharge,
    /// A recurring payment plan.
    #[value(alias = "payment-plans")]
    PaymentPlan,
}
