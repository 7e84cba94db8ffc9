//! Remote operations on endpoint models.
//!
//! Each entity type implements the traits its REST resource supports. The
//! provided methods do the work; an entity only overrides a path when its
//! resource deviates from `{path}` / `{path}/{id}`.

mod delete;
mod get;
mod insert;
mod list;
mod update;

pub use delete::Delete;
pub use get::Get;
pub use insert::Insert;
pub use list::List;
pub use update::Update;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;
    use crate::record::Lifecycle;
    use crate::testing::FakeTransport;
    use crate::{Client, ClientListQuery, CrmError, Surcharge};
    use reqwest::Method;
    use serde_json::json;

    fn stored_client() -> serde_json::Value {
        json!({
            "id": 5,
            "clientType": 1,
            "firstName": "Jane",
            "lastName": "Doe",
            "isLead": false,
            "note": null,
            "accountBalance": 0.0
        })
    }

    #[tokio::test]
    async fn test_get_by_id_hydrates_persisted_model() {
        let transport = FakeTransport::new();
        transport.respond(stored_client());

        let client = Client::get_by_id(&transport, 5).await.unwrap();
        assert_eq!(client.id(), Some(5));
        assert_eq!(client.lifecycle(), Lifecycle::Persisted);
        assert_eq!(transport.requests()[0].path, "clients/5");
    }

    #[tokio::test]
    async fn test_get_by_id_maps_404() {
        let transport = FakeTransport::new();
        transport.fail(404, r#"{"code":404,"message":"Not found"}"#);

        let err = Client::get_by_id(&transport, 99).await.unwrap_err();
        assert!(matches!(
            err,
            CrmError::NotFound { entity_type: "Client", ref id } if id == "99"
        ));
    }

    #[tokio::test]
    async fn test_list_sends_query_and_keeps_order() {
        let transport = FakeTransport::new();
        transport.respond(json!([
            {"id": 3, "firstName": "C", "lastName": "X"},
            {"id": 1, "firstName": "A", "lastName": "Y"}
        ]));

        let query = ClientListQuery {
            is_lead: Some(true),
            limit: Some(10),
            ..Default::default()
        };
        let clients = Client::list(&transport, &query).await.unwrap();

        let ids: Vec<_> = clients.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![Some(3), Some(1)]);
        assert!(clients.iter().all(|c| c.dirty_fields().is_empty()));

        let request = &transport.requests()[0];
        assert_eq!(request.path, "clients");
        assert!(request.query.contains(&("isLead".to_string(), "1".to_string())));
        assert!(request.query.contains(&("limit".to_string(), "10".to_string())));
    }

    #[tokio::test]
    async fn test_list_rejects_non_array() {
        let transport = FakeTransport::new();
        transport.respond(json!({"id": 1}));

        let err = Surcharge::list_all(&transport).await.unwrap_err();
        assert!(matches!(err, CrmError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_insert_sends_full_state_and_adopts_id() {
        let transport = FakeTransport::new();
        transport.respond(json!({
            "id": 41,
            "clientType": 1,
            "firstName": "Jane",
            "lastName": "Doe",
            "isActive": false
        }));

        let mut client = Client::transient();
        client
            .set_client_type(crate::ClientType::Residential)
            .unwrap()
            .set_first_name("Jane")
            .unwrap()
            .set_last_name("Doe")
            .unwrap();
        client.insert(&transport).await.unwrap();

        assert_eq!(client.id(), Some(41));
        assert_eq!(client.lifecycle(), Lifecycle::Persisted);
        assert_eq!(client.is_active().unwrap(), Some(false));

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "clients");
        assert_eq!(
            request.body,
            Some(json!({"clientType": 1, "firstName": "Jane", "lastName": "Doe"}))
        );
    }

    #[tokio::test]
    async fn test_insert_missing_required_sends_nothing() {
        let transport = FakeTransport::new();
        let mut client = Client::transient();
        client.set_first_name("Jane").unwrap();

        let err = client.insert(&transport).await.unwrap_err();
        match err {
            CrmError::Validation { entity, missing } => {
                assert_eq!(entity, "Client");
                assert!(missing.contains(&"lastName".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(transport.requests().is_empty());
        assert_eq!(client.lifecycle(), Lifecycle::Transient);
    }

    #[tokio::test]
    async fn test_insert_twice_is_invalid_state() {
        let transport = FakeTransport::new();
        let mut client = Client::from_json(stored_client()).unwrap();

        let err = client.insert(&transport).await.unwrap_err();
        assert!(matches!(err, CrmError::InvalidState { operation: "insert", .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_sends_only_dirty_fields() {
        let transport = FakeTransport::new();
        transport.respond(json!({"id": 5, "note": "VIP"}));

        let mut client = Client::from_json(stored_client()).unwrap();
        client.set_note("VIP").unwrap();
        client.update(&transport).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.path, "clients/5");
        assert_eq!(request.body, Some(json!({"note": "VIP"})));
        assert_eq!(client.lifecycle(), Lifecycle::Persisted);
    }

    #[tokio::test]
    async fn test_update_without_changes_sends_nothing() {
        let transport = FakeTransport::new();
        let mut client = Client::from_json(stored_client()).unwrap();

        client.update(&transport).await.unwrap();
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_of_create_only_field_sends_nothing() {
        let transport = FakeTransport::new();
        let mut client = Client::from_json(stored_client()).unwrap();
        client.set_organization_id(4).unwrap();

        client.update(&transport).await.unwrap();

        assert!(transport.requests().is_empty());
        assert_eq!(client.lifecycle(), Lifecycle::Modified);
        assert!(client.is_dirty("organizationId"));
        assert_eq!(client.organization_id().unwrap(), Some(4));
    }

    #[tokio::test]
    async fn test_update_transient_is_invalid_state() {
        let transport = FakeTransport::new();
        let mut surcharge = Surcharge::transient();
        surcharge.set_name("Fee").unwrap();

        let err = surcharge.update(&transport).await.unwrap_err();
        assert!(matches!(err, CrmError::InvalidState { state: Lifecycle::Transient, .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_changes() {
        let transport = FakeTransport::new();
        transport.fail(422, r#"{"code":422,"message":"Validation failed."}"#);

        let mut client = Client::from_json(stored_client()).unwrap();
        client.set_note("VIP").unwrap();

        let err = client.update(&transport).await.unwrap_err();
        assert_eq!(err.status_code(), Some(422));
        assert!(client.is_dirty("note"));
        assert_eq!(client.lifecycle(), Lifecycle::Modified);
    }

    #[tokio::test]
    async fn test_delete_is_terminal() {
        let transport = FakeTransport::new();
        transport.respond(serde_json::Value::Null);

        let mut client = Client::from_json(stored_client()).unwrap();
        client.delete(&transport).await.unwrap();
        assert_eq!(client.lifecycle(), Lifecycle::Deleted);
        assert_eq!(transport.requests()[0].method, Method::DELETE);

        assert!(matches!(client.first_name(), Err(CrmError::InvalidState { .. })));
        assert!(matches!(client.to_json(), Err(CrmError::InvalidState { .. })));
        assert_eq!(client.id(), Some(5));
        assert!(matches!(client.set_note("x"), Err(CrmError::InvalidState { .. })));
        assert!(client.update(&transport).await.is_err());
        assert!(client.delete(&transport).await.is_err());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_transient_sends_nothing() {
        let transport = FakeTransport::new();
        let mut surcharge = Surcharge::transient();

        let err = surcharge.delete(&transport).await.unwrap_err();
        assert!(matches!(err, CrmError::InvalidState { operation: "delete", .. }));
        assert!(transport.requests().is_empty());
    }
}
