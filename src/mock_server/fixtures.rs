//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data in the host's
//! JSON representation.

use serde_json::{json, Map, Value};

use super::state::MockState;

/// Session cookie value of the default staff user.
pub const ADMIN_SESSION: &str = "admin-session";

/// Session cookie value of the default client-zone user.
pub const CLIENT_SESSION: &str = "client-session";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Entity Fixtures
    // =========================================================================

    /// A residential client with the fields the host always returns.
    pub fn client(id: i64, first_name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "organizationId": 1,
            "userIdent": format!("C-{id:04}"),
            "previousIsp": null,
            "isLead": false,
            "clientType": 1,
            "companyName": null,
            "companyRegistrationNumber": null,
            "companyTaxId": null,
            "companyWebsite": null,
            "firstName": first_name,
            "lastName": last_name,
            "street1": "2580 Orchard Parkway",
            "street2": null,
            "city": "San Jose",
            "countryId": 249,
            "stateId": 5,
            "zipCode": "95131",
            "registrationDate": "2023-04-01T00:00:00+0000",
            "note": null,
            "invoiceMaturityDays": 14,
            "sendInvoiceByPost": null,
            "stopServiceDue": null,
            "contacts": [],
            "attributes": [],
            "accountBalance": 0.0,
            "accountCredit": 0.0,
            "accountOutstanding": 0.0,
            "currencyCode": "USD",
            "hasOverdueInvoice": false,
            "isActive": true
        })
    }

    /// A company lead.
    pub fn company_lead(id: i64, company_name: &str) -> Value {
        let mut lead = Self::client(id, "Contact", "Person");
        if let Value::Object(fields) = &mut lead {
            fields.insert("clientType".to_string(), json!(2));
            fields.insert("companyName".to_string(), json!(company_name));
            fields.insert("isLead".to_string(), json!(true));
            fields.insert("isActive".to_string(), json!(false));
        }
        lead
    }

    pub fn surcharge(id: i64, name: &str, price: f64) -> Value {
        json!({
            "id": id,
            "name": name,
            "invoiceLabel": null,
            "price": price,
            "taxable": false
        })
    }

    /// An active monthly payment plan.
    pub fn payment_plan(id: i64, client_id: i64, amount: f64) -> Value {
        json!({
            "id": id,
            "clientId": client_id,
            "currencyId": 33,
            "provider": "stripe",
            "name": "Monthly internet",
            "amount": amount,
            "period": 1,
            "startDate": "2024-01-01T00:00:00+0000",
            "providerPlanId": format!("plan_{id}"),
            "providerSubscriptionId": format!("sub_{id}"),
            "status": "active",
            "nextPaymentDate": "2024-02-01T00:00:00+0000",
            "createdDate": "2023-12-20T09:30:00+0000",
            "canceledDate": null,
            "failures": 0
        })
    }

    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Staff user with edit rights on clients.
    pub fn admin_user() -> Value {
        json!({
            "userId": 1,
            "username": "admin",
            "isClient": false,
            "clientId": null,
            "userGroup": "Admin Group",
            "permissions": {
                "clients/clients": "edit",
                "billing/invoices": "view",
                "system/settings": "denied"
            },
            "specialPermissions": {
                "special/view_financial_information": "allow",
                "special/client_impersonation": "deny"
            }
        })
    }

    /// Client-zone user bound to `client_id`.
    pub fn client_user(client_id: i64) -> Value {
        json!({
            "userId": 100 + client_id,
            "username": format!("client{client_id}"),
            "isClient": true,
            "clientId": client_id,
            "userGroup": null,
            "permissions": {},
            "specialPermissions": {}
        })
    }

    // =========================================================================
    // Server-computed fields
    // =========================================================================

    /// Fields the host fills in itself when an entity of `resource` is
    /// created, unless the request already set them.
    pub fn computed_fields(resource: &str) -> Map<String, Value> {
        let computed = match resource {
            "clients" => json!({
                "isLead": false,
                "clientType": 1,
                "contacts": [],
                "attributes": [],
                "accountBalance": 0.0,
                "accountCredit": 0.0,
                "accountOutstanding": 0.0,
                "currencyCode": "USD",
                "hasOverdueInvoice": false,
                "isActive": false
            }),
            "surcharges" => json!({
                "invoiceLabel": null,
                "taxable": false
            }),
            "payment-plans" => json!({
                "status": "created",
                "failures": 0,
                "canceledDate": null
            }),
            _ => json!({}),
        };
        match computed {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Default test scenario with a few entities of every resource and two
    /// known sessions.
    pub fn default_state() -> MockState {
        MockState::new()
            .with_entity("clients", Self::client(1, "Jane", "Doe"))
            .with_entity("clients", Self::client(2, "John", "Smith"))
            .with_entity("clients", Self::company_lead(3, "Acme Networks"))
            .with_entity("surcharges", Self::surcharge(1, "Router rental", 5.0))
            .with_entity("surcharges", Self::surcharge(2, "Public IP", 3.5))
            .with_entity("payment-plans", Self::payment_plan(1, 1, 29.9))
            .with_session(ADMIN_SESSION, Self::admin_user())
            .with_session(CLIENT_SESSION, Self::client_user(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Client, Endpoint, PaymentPlan, Surcharge};

    #[test]
    fn test_fixtures_hydrate_models() {
        let client = Client::from_json(Fixtures::client(1, "Jane", "Doe")).unwrap();
        assert_eq!(client.display_name().unwrap(), "Jane Doe");

        let lead = Client::from_json(Fixtures::company_lead(3, "Acme Networks")).unwrap();
        assert_eq!(lead.display_name().unwrap(), "Acme Networks");

        let surcharge = Surcharge::from_json(Fixtures::surcharge(1, "Router", 5.0)).unwrap();
        assert_eq!(surcharge.price().unwrap(), Some(5.0));

        let plan = PaymentPlan::from_json(Fixtures::payment_plan(1, 1, 29.9)).unwrap();
        assert!(plan.is_active().unwrap());
    }

    #[test]
    fn test_default_state() {
        let state = Fixtures::default_state();
        assert_eq!(state.list("clients", &[]).len(), 3);
        assert_eq!(state.list("surcharges", &[]).len(), 2);
        assert!(state.sessions.contains_key(ADMIN_SESSION));
    }
}
