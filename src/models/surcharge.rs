//! Surcharge model and trait implementations.
//!
//! Surcharges are reusable price add-ons (e.g. a router rental fee) that can
//! be attached to client services.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use crate::endpoint::Endpoint;
use crate::error::{CrmError, Result};
use crate::record::Record;
use crate::schema::{EntitySchema, FieldDef, FieldDefault, FieldKind};
use crate::traits::{Delete, Get, Insert, List, Update};

static SURCHARGE_FIELDS: &[FieldDef] = &[
    FieldDef::new("name", FieldKind::String).required(),
    FieldDef::new("invoiceLabel", FieldKind::String),
    FieldDef::new("price", FieldKind::Decimal).required(),
    FieldDef::new("taxable", FieldKind::Bool).with_default(FieldDefault::Bool(false)),
];

static SURCHARGE_SCHEMA: EntitySchema = EntitySchema {
    entity: "Surcharge",
    path: "surcharges",
    fields: SURCHARGE_FIELDS,
};

/// A surcharge definition.
#[derive(Debug, Clone)]
pub struct Surcharge {
    record: Record,
}

impl Endpoint for Surcharge {
    const SCHEMA: &'static EntitySchema = &SURCHARGE_SCHEMA;

    fn from_record(record: Record) -> Self {
        Self { record }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }
}

impl Surcharge {
    pub fn name(&self) -> Result<Option<&str>> {
        self.record.get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.record.set("name", json!(name.into()))?;
        Ok(self)
    }

    /// Label printed on invoices; `None` means the host uses the name.
    pub fn invoice_label(&self) -> Result<Option<&str>> {
        self.record.get_str("invoiceLabel")
    }

    pub fn set_invoice_label(&mut self, label: impl Into<String>) -> Result<&mut Self> {
        self.record.set("invoiceLabel", json!(label.into()))?;
        Ok(self)
    }

    /// Go back to labelling invoices with the surcharge name.
    pub fn reset_invoice_label(&mut self) -> Result<&mut Self> {
        self.record.reset_field("invoiceLabel")?;
        Ok(self)
    }

    pub fn price(&self) -> Result<Option<f64>> {
        self.record.get_f64("price")
    }

    pub fn set_price(&mut self, price: f64) -> Result<&mut Self> {
        if !price.is_finite() {
            return Err(CrmError::InvalidArgument {
                field: "price".to_string(),
                reason: format!("{price} is not a finite amount"),
            });
        }
        self.record.set("price", json!(price))?;
        Ok(self)
    }

    pub fn taxable(&self) -> Result<Option<bool>> {
        self.record.get_bool("taxable")
    }

    pub fn set_taxable(&mut self, taxable: bool) -> Result<&mut Self> {
        self.record.set("taxable", json!(taxable))?;
        Ok(self)
    }

    pub fn reset_taxable(&mut self) -> Result<&mut Self> {
        self.record.reset_field("taxable")?;
        Ok(self)
    }
}

/// Surcharges take no filters; only paging.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SurchargeListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[async_trait]
impl Get for Surcharge {}

#[async_trait]
impl List for Surcharge {
    type Query = SurchargeListQuery;
}

#[async_trait]
impl Insert for Surcharge {}

#[async_trait]
impl Update for Surcharge {}

#[async_trait]
impl Delete for Surcharge {}
