//! Mock server state management.
//!
//! Provides the in-memory data store for the mock CRM API server. Entities
//! are kept as raw JSON objects per resource, keyed by ID.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// Resources the mock host serves.
pub const RESOURCES: &[&str] = &["clients", "surcharges", "payment-plans"];

/// One request as received by the mock server.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub app_key: Option<String>,
    pub cookie: Option<String>,
    /// Parsed JSON body, if there was one.
    pub body: Option<Value>,
}

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Stored entities per resource path, ordered by ID.
    pub resources: HashMap<String, BTreeMap<i64, Value>>,

    /// Optional app key. If set, requests must carry it.
    pub required_app_key: Option<String>,

    /// Session cookie value to the user it belongs to.
    pub sessions: HashMap<String, Value>,

    /// Every request received, in order.
    pub requests: Vec<RecordedRequest>,

    next_id: i64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            resources: RESOURCES
                .iter()
                .map(|name| (name.to_string(), BTreeMap::new()))
                .collect(),
            required_app_key: None,
            sessions: HashMap::new(),
            requests: Vec::new(),
            next_id: 1,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Seed an entity. Its `id` is kept when present, assigned otherwise.
    pub fn with_entity(mut self, resource: &str, entity: Value) -> Self {
        self.seed(resource, entity);
        self
    }

    /// Set the required app key.
    pub fn with_required_app_key(mut self, key: &str) -> Self {
        self.required_app_key = Some(key.to_string());
        self
    }

    /// Register a session cookie value for a user.
    pub fn with_session(mut self, token: &str, user: Value) -> Self {
        self.sessions.insert(token.to_string(), user);
        self
    }

    pub fn has_resource(&self, resource: &str) -> bool {
        self.resources.contains_key(resource)
    }

    fn seed(&mut self, resource: &str, entity: Value) -> Option<i64> {
        let Value::Object(mut fields) = entity else {
            return None;
        };
        let id = match fields.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => self.next_id,
        };
        self.next_id = self.next_id.max(id + 1);
        fields.insert("id".to_string(), Value::from(id));

        self.resources
            .entry(resource.to_string())
            .or_default()
            .insert(id, Value::Object(fields));
        Some(id)
    }

    pub fn get(&self, resource: &str, id: i64) -> Option<&Value> {
        self.resources.get(resource)?.get(&id)
    }

    /// Entities of a resource in ID order, filtered by exact match on every
    /// filter. Booleans match `1`/`0` as well as `true`/`false`.
    pub fn list(&self, resource: &str, filters: &[(String, String)]) -> Vec<&Value> {
        let Some(entities) = self.resources.get(resource) else {
            return Vec::new();
        };
        entities
            .values()
            .filter(|entity| {
                filters
                    .iter()
                    .all(|(key, expected)| matches_filter(entity.get(key), expected))
            })
            .collect()
    }

    /// Store a new entity under a fresh ID, with `computed` fields added.
    pub fn create(
        &mut self,
        resource: &str,
        mut fields: Map<String, Value>,
        computed: Map<String, Value>,
    ) -> Option<&Value> {
        if !self.has_resource(resource) {
            return None;
        }
        fields.remove("id");
        for (key, value) in computed {
            fields.entry(key).or_insert(value);
        }
        let id = self.next_id;
        self.seed(resource, Value::Object(fields))?;
        self.get(resource, id)
    }

    /// Merge changed fields into a stored entity. The ID never changes.
    pub fn update(
        &mut self,
        resource: &str,
        id: i64,
        mut changes: Map<String, Value>,
    ) -> Option<&Value> {
        changes.remove("id");
        let entity = self.resources.get_mut(resource)?.get_mut(&id)?;
        if let Value::Object(fields) = &mut *entity {
            fields.extend(changes);
        }
        Some(&*entity)
    }

    pub fn remove(&mut self, resource: &str, id: i64) -> Option<Value> {
        self.resources.get_mut(resource)?.remove(&id)
    }

    /// Requests received with the given method and path.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<&RecordedRequest> {
        self.requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

fn matches_filter(value: Option<&Value>, expected: &str) -> bool {
    match value {
        Some(Value::Bool(b)) => match expected {
            "1" | "true" => *b,
            "0" | "false" => !*b,
            _ => false,
        },
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::Null) | None => expected.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_state_seed_and_get() {
        let state = MockState::new().with_entity("clients", json!({"id": 7, "firstName": "Jane"}));

        let client = state.get("clients", 7).unwrap();
        assert_eq!(client["firstName"], "Jane");
    }

    #[test]
    fn test_create_assigns_ids_after_seeded_ones() {
        let mut state = MockState::new().with_entity("surcharges", json!({"id": 10, "name": "A"}));

        let created = state
            .create("surcharges", fields(json!({"id": 1, "name": "B"})), Map::new())
            .unwrap();
        assert_eq!(created["id"], 11);
        assert_eq!(created["name"], "B");
    }

    #[test]
    fn test_create_adds_computed_fields() {
        let mut state = MockState::new();
        let created = state
            .create(
                "payment-plans",
                fields(json!({"provider": "stripe"})),
                fields(json!({"status": "created"})),
            )
            .unwrap();
        assert_eq!(created["status"], "created");
    }

    #[test]
    fn test_create_unknown_resource() {
        let mut state = MockState::new();
        assert!(state.create("invoices", Map::new(), Map::new()).is_none());
    }

    #[test]
    fn test_list_filters() {
        let state = MockState::new()
            .with_entity("clients", json!({"id": 1, "isLead": true, "userIdent": "A-1"}))
            .with_entity("clients", json!({"id": 2, "isLead": false, "userIdent": "A-2"}))
            .with_entity("clients", json!({"id": 3, "isLead": true, "userIdent": "A-3"}));

        assert_eq!(state.list("clients", &[]).len(), 3);

        let leads = state.list("clients", &[("isLead".to_string(), "1".to_string())]);
        let ids: Vec<_> = leads.iter().map(|c| c["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 3]);

        let exact = state.list("clients", &[("userIdent".to_string(), "A-2".to_string())]);
        assert_eq!(exact.len(), 1);
    }

    #[test]
    fn test_update_keeps_id() {
        let mut state = MockState::new().with_entity("clients", json!({"id": 4, "note": null}));

        let updated = state
            .update("clients", 4, fields(json!({"id": 99, "note": "VIP"})))
            .unwrap();
        assert_eq!(updated["id"], 4);
        assert_eq!(updated["note"], "VIP");
    }
}
