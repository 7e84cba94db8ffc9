//! Payment plan model and trait implementations.
//!
//! A payment plan is a recurring online payment (subscription) a client set
//! up with a payment provider. Plans are created and cancelled through the
//! API but never edited or deleted.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::endpoint::Endpoint;
use crate::error::{CrmError, Result};
use crate::record::{Lifecycle, Record};
use crate::schema::{format_date, EntitySchema, FieldDef, FieldKind};
use crate::traits::{Get, Insert, List};
use crate::transport::Transport;

/// Payment providers a plan can be set up with.
pub const PROVIDERS: &[&str] = &[
    "paypal",
    "stripe",
    "stripe_ach",
    "anet",
    "ipay_africa",
    "mercado_pago",
];

/// Allowed billing periods, in months.
pub const PERIODS: &[i64] = &[1, 2, 3, 4, 6, 12, 24, 36, 48, 60];

/// Plan states as reported by the host.
pub const STATUSES: &[&str] = &["created", "pending", "active", "cancelled", "paused", "error"];

static PAYMENT_PLAN_FIELDS: &[FieldDef] = &[
    FieldDef::new("clientId", FieldKind::Int).required().create_only(),
    FieldDef::new("currencyId", FieldKind::Int).required().create_only(),
    FieldDef::new("provider", FieldKind::Enum(PROVIDERS)).required().create_only(),
    FieldDef::new("name", FieldKind::String).create_only(),
    FieldDef::new("amount", FieldKind::Decimal).required().create_only(),
    FieldDef::new("period", FieldKind::IntEnum(PERIODS)).required().create_only(),
    FieldDef::new("startDate", FieldKind::Date).create_only(),
    FieldDef::new("providerPlanId", FieldKind::String).read_only(),
    FieldDef::new("providerSubscriptionId", FieldKind::String).read_only(),
    FieldDef::new("status", FieldKind::Enum(STATUSES)).read_only(),
    FieldDef::new("nextPaymentDate", FieldKind::Date).read_only(),
    FieldDef::new("createdDate", FieldKind::Date).read_only(),
    FieldDef::new("canceledDate", FieldKind::Date).read_only(),
    FieldDef::new("failures", FieldKind::Int).read_only(),
];

static PAYMENT_PLAN_SCHEMA: EntitySchema = EntitySchema {
    entity: "PaymentPlan",
    path: "payment-plans",
    fields: PAYMENT_PLAN_FIELDS,
};

/// A recurring payment plan.
#[derive(Debug, Clone)]
pub struct PaymentPlan {
    record: Record,
}

impl Endpoint for PaymentPlan {
    const SCHEMA: &'static EntitySchema = &PAYMENT_PLAN_SCHEMA;

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

impl PaymentPlan {
    fn put(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        self.record.set(name, value)?;
        Ok(self)
    }

    pub fn client_id(&self) -> Result<Option<i64>> {
        self.record.get_i64("clientId")
    }

    pub fn set_client_id(&mut self, id: i64) -> Result<&mut Self> {
        self.put("clientId", json!(id))
    }

    pub fn currency_id(&self) -> Result<Option<i64>> {
        self.record.get_i64("currencyId")
    }

    pub fn set_currency_id(&mut self, id: i64) -> Result<&mut Self> {
        self.put("currencyId", json!(id))
    }

    pub fn provider(&self) -> Result<Option<&str>> {
        self.record.get_str("provider")
    }

    /// One of [`PROVIDERS`].
    pub fn set_provider(&mut self, provider: &str) -> Result<&mut Self> {
        self.put("provider", json!(provider))
    }

    pub fn name(&self) -> Result<Option<&str>> {
        self.record.get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.put("name", json!(name.into()))
    }

    pub fn amount(&self) -> Result<Option<f64>> {
        self.record.get_f64("amount")
    }

    pub fn set_amount(&mut self, amount: f64) -> Result<&mut Self> {
        self.put("amount", json!(amount))
    }

    pub fn period(&self) -> Result<Option<i64>> {
        self.record.get_i64("period")
    }

    /// Billing period in months, one of [`PERIODS`].
    pub fn set_period(&mut self, months: i64) -> Result<&mut Self> {
        self.put("period", json!(months))
    }

    pub fn start_date(&self) -> Result<Option<DateTime<FixedOffset>>> {
        self.record.get_date("startDate")
    }

    pub fn set_start_date<Tz: TimeZone>(&mut self, date: DateTime<Tz>) -> Result<&mut Self>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.put("startDate", json!(format_date(&date)))
    }

    pub fn status(&self) -> Result<Option<&str>> {
        self.record.get_str("status")
    }

    pub fn is_active(&self) -> Result<bool> {
        Ok(self.status()? == Some("active"))
    }

    pub fn provider_plan_id(&self) -> Result<Option<&str>> {
        self.record.get_str("providerPlanId")
    }

    pub fn provider_subscription_id(&self) -> Result<Option<&str>> {
        self.record.get_str("providerSubscriptionId")
    }

    pub fn next_payment_date(&self) -> Result<Option<DateTime<FixedOffset>>> {
        self.record.get_date("nextPaymentDate")
    }

    pub fn created_date(&self) -> Result<Option<DateTime<FixedOffset>>> {
        self.record.get_date("createdDate")
    }

    pub fn canceled_date(&self) -> Result<Option<DateTime<FixedOffset>>> {
        self.record.get_date("canceledDate")
    }

    pub fn failures(&self) -> Result<Option<i64>> {
        self.record.get_i64("failures")
    }

    /// Cancel the subscription on the host and take the updated plan.
    ///
    /// # Errors
    ///
    /// Fails with [`CrmError::InvalidState`](crate::CrmError::InvalidState)
    /// on a transient or deleted plan, and on a plan with local edits that
    /// were never sent, without contacting the host.
    pub async fn cancel(&mut self, client: &dyn Transport) -> Result<()> {
        let id = self.record.require_id("cancel")?;
        if self.record.lifecycle() == Lifecycle::Modified {
            return Err(CrmError::InvalidState {
                entity: Self::SCHEMA.entity,
                state: Lifecycle::Modified,
                operation: "cancel",
            });
        }
        let path = format!("{}/cancel", Self::SCHEMA.item_path(id));

        tracing::debug!(id, "cancelling payment plan");
        let response = client.patch(&path, Value::Object(Map::new())).await?;
        self.record.absorb_updated(response)
    }
}

/// Query parameters for listing payment plans.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlanListQuery {
    /// Only plans of this client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[async_trait]
impl Get for PaymentPlan {}

#[async_trait]
impl List for PaymentPlan {
    type Query = PaymentPlanListQuery;
}

#[async_trait]
impl Insert for PaymentPlan {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Operation;
    use crate::testing::FakeTransport;
    use crate::{CrmError, Lifecycle};
    use chrono::Utc;
    use reqwest::Method;

    fn draft() -> PaymentPlan {
        let mut plan = PaymentPlan::transient();
        plan.set_client_id(7)
            .unwrap()
            .set_currency_id(33)
            .unwrap()
            .set_provider("stripe")
            .unwrap()
            .set_amount(29.9)
            .unwrap()
            .set_period(1)
            .unwrap();
        plan
    }

    #[test]
    fn test_provider_must_be_known() {
        let mut plan = PaymentPlan::transient();
        let err = plan.set_provider("bitcoin").unwrap_err();

        assert!(matches!(err, CrmError::InvalidArgument { ref field, .. } if field == "provider"));
        assert!(plan.dirty_fields().is_empty());
    }

    #[test]
    fn test_period_must_be_allowed() {
        let mut plan = PaymentPlan::transient();
        assert!(plan.set_period(5).is_err());
        assert!(plan.set_period(12).is_ok());
    }

    #[test]
    fn test_draft_validates_for_create() {
        let report = draft().validate(Operation::Create).unwrap();
        assert!(report.is_ok(), "{report:?}");
    }

    #[test]
    fn test_start_date_format() {
        let mut plan = draft();
        plan.set_start_date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .unwrap();
        assert_eq!(
            plan.field("startDate").unwrap(),
            Some(&json!("2024-01-01T00:00:00+0000"))
        );
    }

    #[tokio::test]
    async fn test_insert_then_cancel() {
        let transport = FakeTransport::new();
        transport.respond(json!({
            "id": 80,
            "clientId": 7,
            "currencyId": 33,
            "provider": "stripe",
            "amount": 29.9,
            "period": 1,
            "status": "created"
        }));
        transport.respond(json!({"id": 80, "status": "cancelled", "canceledDate": "2024-02-01T10:00:00+0000"}));

        let mut plan = draft();
        plan.insert(&transport).await.unwrap();
        assert_eq!(plan.id(), Some(80));
        assert_eq!(plan.status().unwrap(), Some("created"));

        plan.cancel(&transport).await.unwrap();
        assert_eq!(plan.status().unwrap(), Some("cancelled"));
        assert!(plan.canceled_date().unwrap().is_some());
        assert_eq!(plan.lifecycle(), Lifecycle::Persisted);

        let requests = transport.requests();
        assert_eq!(requests[1].method, Method::PATCH);
        assert_eq!(requests[1].path, "payment-plans/80/cancel");
    }

    #[tokio::test]
    async fn test_cancel_transient_fails_without_request() {
        let transport = FakeTransport::new();
        let mut plan = draft();

        let err = plan.cancel(&transport).await.unwrap_err();
        assert!(matches!(err, CrmError::InvalidState { operation: "cancel", .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_with_unsent_edits_fails_without_request() {
        let transport = FakeTransport::new();
        let mut plan = PaymentPlan::from_json(json!({
            "id": 80,
            "clientId": 7,
            "amount": 29.9,
            "status": "active"
        }))
        .unwrap();
        plan.set_amount(35.0).unwrap();

        let err = plan.cancel(&transport).await.unwrap_err();
        assert!(matches!(
            err,
            CrmError::InvalidState { state: Lifecycle::Modified, operation: "cancel", .. }
        ));
        assert!(transport.requests().is_empty());
        assert!(plan.is_dirty("amount"));
        assert_eq!(plan.amount().unwrap(), Some(35.0));
    }
}
