//! Client model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use serde_json::{json, Value};

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::record::Record;
use crate::schema::{format_date, EntitySchema, FieldDef, FieldDefault, FieldKind};
use crate::traits::{Delete, Get, Insert, List, Update};

/// Kind of client account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    Residential,
    Company,
}

impl ClientType {
    pub fn code(self) -> i64 {
        match self {
            ClientType::Residential => 1,
            ClientType::Company => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ClientType::Residential),
            2 => Some(ClientType::Company),
            _ => None,
        }
    }
}

static CLIENT_FIELDS: &[FieldDef] = &[
    FieldDef::new("organizationId", FieldKind::Int).create_only(),
    FieldDef::new("userIdent", FieldKind::String),
    FieldDef::new("previousIsp", FieldKind::String),
    FieldDef::new("isLead", FieldKind::Bool).with_default(FieldDefault::Bool(false)),
    FieldDef::new("clientType", FieldKind::IntEnum(&[1, 2]))
        .required()
        .with_default(FieldDefault::Int(1)),
    FieldDef::new("companyName", FieldKind::String),
    FieldDef::new("companyRegistrationNumber", FieldKind::String),
    FieldDef::new("companyTaxId", FieldKind::String),
    FieldDef::new("companyWebsite", FieldKind::String),
    FieldDef::new("firstName", FieldKind::String).required(),
    FieldDef::new("lastName", FieldKind::String).required(),
    FieldDef::new("street1", FieldKind::String),
    FieldDef::new("street2", FieldKind::String),
    FieldDef::new("city", FieldKind::String),
    FieldDef::new("countryId", FieldKind::Int),
    FieldDef::new("stateId", FieldKind::Int),
    FieldDef::new("zipCode", FieldKind::String),
    FieldDef::new("registrationDate", FieldKind::Date),
    FieldDef::new("note", FieldKind::String),
    FieldDef::new("invoiceMaturityDays", FieldKind::Int),
    FieldDef::new("sendInvoiceByPost", FieldKind::Bool),
    FieldDef::new("stopServiceDue", FieldKind::Bool),
    FieldDef::new("contacts", FieldKind::Collection),
    FieldDef::new("attributes", FieldKind::Collection),
    FieldDef::new("accountBalance", FieldKind::Decimal).read_only(),
    FieldDef::new("accountCredit", FieldKind::Decimal).read_only(),
    FieldDef::new("accountOutstanding", FieldKind::Decimal).read_only(),
    FieldDef::new("currencyCode", FieldKind::String).read_only(),
    FieldDef::new("hasOverdueInvoice", FieldKind::Bool).read_only(),
    FieldDef::new("isActive", FieldKind::Bool).read_only(),
];

static CLIENT_SCHEMA: EntitySchema = EntitySchema {
    entity: "Client",
    path: "clients",
    fields: CLIENT_FIELDS,
};

/// A CRM client (customer or lead).
///
/// Getters read the current local value, including changes not yet sent.
/// Setters check the value, mark the field dirty and return `&mut Self`, so
/// they chain with `?`:
///
/// ```
/// use crm_plugin_sdk::{Client, ClientType, Endpoint};
///
/// # fn example() -> crm_plugin_sdk::Result<()> {
/// let mut client = Client::transient();
/// client
///     .set_client_type(ClientType::Residential)?
///     .set_first_name("Jane")?
///     .set_last_name("Doe")?;
/// assert!(client.is_dirty("firstName"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    record: Record,
}

impl Endpoint for Client {
    const SCHEMA: &'static EntitySchema = &CLIENT_SCHEMA;

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

impl Client {
    fn put(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        self.record.set(name, value)?;
        Ok(self)
    }

    fn reset(&mut self, name: &str) -> Result<&mut Self> {
        self.record.reset_field(name)?;
        Ok(self)
    }

    /// Company name for companies, "first last" otherwise.
    pub fn display_name(&self) -> Result<String> {
        if self.client_type()? == Some(ClientType::Company) {
            if let Some(name) = self.company_name()? {
                return Ok(name.to_string());
            }
        }
        let parts: Vec<&str> = [self.first_name()?, self.last_name()?]
            .into_iter()
            .flatten()
            .collect();
        Ok(parts.join(" "))
    }

    // Identity and classification

    pub fn organization_id(&self) -> Result<Option<i64>> {
        self.record.get_i64("organizationId")
    }

    /// Only honoured on insert.
    pub fn set_organization_id(&mut self, id: i64) -> Result<&mut Self> {
        self.put("organizationId", json!(id))
    }

    pub fn user_ident(&self) -> Result<Option<&str>> {
        self.record.get_str("userIdent")
    }

    pub fn set_user_ident(&mut self, ident: impl Into<String>) -> Result<&mut Self> {
        self.put("userIdent", json!(ident.into()))
    }

    pub fn previous_isp(&self) -> Result<Option<&str>> {
        self.record.get_str("previousIsp")
    }

    pub fn set_previous_isp(&mut self, isp: impl Into<String>) -> Result<&mut Self> {
        self.put("previousIsp", json!(isp.into()))
    }

    pub fn is_lead(&self) -> Result<Option<bool>> {
        self.record.get_bool("isLead")
    }

    pub fn set_is_lead(&mut self, lead: bool) -> Result<&mut Self> {
        self.put("isLead", json!(lead))
    }

    pub fn client_type(&self) -> Result<Option<ClientType>> {
        Ok(self
            .record
            .get_i64("clientType")?
            .and_then(ClientType::from_code))
    }

    pub fn set_client_type(&mut self, client_type: ClientType) -> Result<&mut Self> {
        self.put("clientType", json!(client_type.code()))
    }

    // Company

    pub fn company_name(&self) -> Result<Option<&str>> {
        self.record.get_str("companyName")
    }

    pub fn set_company_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.put("companyName", json!(name.into()))
    }

    pub fn company_registration_number(&self) -> Result<Option<&str>> {
        self.record.get_str("companyRegistrationNumber")
    }

    pub fn set_company_registration_number(
        &mut self,
        number: impl Into<String>,
    ) -> Result<&mut Self> {
        self.put("companyRegistrationNumber", json!(number.into()))
    }

    pub fn company_tax_id(&self) -> Result<Option<&str>> {
        self.record.get_str("companyTaxId")
    }

    pub fn set_company_tax_id(&mut self, tax_id: impl Into<String>) -> Result<&mut Self> {
        self.put("companyTaxId", json!(tax_id.into()))
    }

    pub fn company_website(&self) -> Result<Option<&str>> {
        self.record.get_str("companyWebsite")
    }

    pub fn set_company_website(&mut self, url: impl Into<String>) -> Result<&mut Self> {
        self.put("companyWebsite", json!(url.into()))
    }

    // Person

    pub fn first_name(&self) -> Result<Option<&str>> {
        self.record.get_str("firstName")
    }

    pub fn set_first_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.put("firstName", json!(name.into()))
    }

    pub fn last_name(&self) -> Result<Option<&str>> {
        self.record.get_str("lastName")
    }

    pub fn set_last_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.put("lastName", json!(name.into()))
    }

    // Address

    pub fn street1(&self) -> Result<Option<&str>> {
        self.record.get_str("street1")
    }

    pub fn set_street1(&mut self, street: impl Into<String>) -> Result<&mut Self> {
        self.put("street1", json!(street.into()))
    }

    pub fn street2(&self) -> Result<Option<&str>> {
        self.record.get_str("street2")
    }

    pub fn set_street2(&mut self, street: impl Into<String>) -> Result<&mut Self> {
        self.put("street2", json!(street.into()))
    }

    pub fn city(&self) -> Result<Option<&str>> {
        self.record.get_str("city")
    }

    pub fn set_city(&mut self, city: impl Into<String>) -> Result<&mut Self> {
        self.put("city", json!(city.into()))
    }

    pub fn country_id(&self) -> Result<Option<i64>> {
        self.record.get_i64("countryId")
    }

    pub fn set_country_id(&mut self, id: i64) -> Result<&mut Self> {
        self.put("countryId", json!(id))
    }

    pub fn state_id(&self) -> Result<Option<i64>> {
        self.record.get_i64("stateId")
    }

    pub fn set_state_id(&mut self, id: i64) -> Result<&mut Self> {
        self.put("stateId", json!(id))
    }

    pub fn zip_code(&self) -> Result<Option<&str>> {
        self.record.get_str("zipCode")
    }

    pub fn set_zip_code(&mut self, zip: impl Into<String>) -> Result<&mut Self> {
        self.put("zipCode", json!(zip.into()))
    }

    // Account settings

    pub fn registration_date(&self) -> Result<Option<DateTime<FixedOffset>>> {
        self.record.get_date("registrationDate")
    }

    pub fn set_registration_date<Tz: TimeZone>(&mut self, date: DateTime<Tz>) -> Result<&mut Self>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.put("registrationDate", json!(format_date(&date)))
    }

    pub fn note(&self) -> Result<Option<&str>> {
        self.record.get_str("note")
    }

    pub fn set_note(&mut self, note: impl Into<String>) -> Result<&mut Self> {
        self.put("note", json!(note.into()))
    }

    pub fn reset_note(&mut self) -> Result<&mut Self> {
        self.reset("note")
    }

    pub fn invoice_maturity_days(&self) -> Result<Option<i64>> {
        self.record.get_i64("invoiceMaturityDays")
    }

    pub fn set_invoice_maturity_days(&mut self, days: i64) -> Result<&mut Self> {
        if days < 0 {
            return Err(crate::CrmError::InvalidArgument {
                field: "invoiceMaturityDays".to_string(),
                reason: format!("{days} is negative"),
            });
        }
        self.put("invoiceMaturityDays", json!(days))
    }

    /// Use the system default maturity on the next update.
    pub fn reset_invoice_maturity_days(&mut self) -> Result<&mut Self> {
        self.reset("invoiceMaturityDays")
    }

    pub fn send_invoice_by_post(&self) -> Result<Option<bool>> {
        self.record.get_bool("sendInvoiceByPost")
    }

    pub fn set_send_invoice_by_post(&mut self, send: bool) -> Result<&mut Self> {
        self.put("sendInvoiceByPost", json!(send))
    }

    /// Use the system default on the next update.
    pub fn reset_send_invoice_by_post(&mut self) -> Result<&mut Self> {
        self.reset("sendInvoiceByPost")
    }

    pub fn stop_service_due(&self) -> Result<Option<bool>> {
        self.record.get_bool("stopServiceDue")
    }

    pub fn set_stop_service_due(&mut self, stop: bool) -> Result<&mut Self> {
        self.put("stopServiceDue", json!(stop))
    }

    /// Use the system default on the next update.
    pub fn reset_stop_service_due(&mut self) -> Result<&mut Self> {
        self.reset("stopServiceDue")
    }

    // Nested collections, kept as the host's JSON

    pub fn contacts(&self) -> Result<&[Value]> {
        Ok(self
            .record
            .get("contacts")?
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    pub fn set_contacts(&mut self, contacts: Vec<Value>) -> Result<&mut Self> {
        self.put("contacts", Value::Array(contacts))
    }

    pub fn attributes(&self) -> Result<&[Value]> {
        Ok(self
            .record
            .get("attributes")?
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    pub fn set_attributes(&mut self, attributes: Vec<Value>) -> Result<&mut Self> {
        self.put("attributes", Value::Array(attributes))
    }

    // Computed by the host

    pub fn account_balance(&self) -> Result<Option<f64>> {
        self.record.get_f64("accountBalance")
    }

    pub fn account_credit(&self) -> Result<Option<f64>> {
        self.record.get_f64("accountCredit")
    }

    pub fn account_outstanding(&self) -> Result<Option<f64>> {
        self.record.get_f64("accountOutstanding")
    }

    pub fn currency_code(&self) -> Result<Option<&str>> {
        self.record.get_str("currencyCode")
    }

    pub fn has_overdue_invoice(&self) -> Result<Option<bool>> {
        self.record.get_bool("hasOverdueInvoice")
    }

    pub fn is_active(&self) -> Result<Option<bool>> {
        self.record.get_bool("isActive")
    }
}

/// Query parameters for listing clients.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientListQuery {
    /// Filter by custom client ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ident: Option<String>,

    /// Filter by a custom attribute key...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attribute_key: Option<String>,

    /// ...and its value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attribute_value: Option<String>,

    /// Leads only (`true`) or clients only (`false`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_lead: Option<bool>,

    /// Sort column, e.g. `client.id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,

    /// `ASC` or `DESC`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[async_trait]
impl Get for Client {}

#[async_trait]
impl List for Client {
    type Query = ClientListQuery;
}

#[async_trait]
impl Insert for Client {}

#[async_trait]
impl Update for Client {}

#[async_trait]
impl Delete for Client {}
