//! CRM entity models.

mod client;
mod payment_plan;
mod surcharge;

pub use client::*;
pub use payment_plan::*;
pub use surcharge::*;
