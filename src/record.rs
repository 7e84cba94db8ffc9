//! Field storage and lifecycle shared by every endpoint model.
//!
//! A [`Record`] is the untyped half of an entity: the resource ID, the JSON
//! field map exactly as the host represents it, the dirty set and the
//! lifecycle. Concrete entities wrap one and add typed accessors.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use crate::error::{CrmError, Result};
use crate::schema::{parse_date, EntitySchema, Operation};
use crate::tracker::ChangeTracker;
use crate::validation::{self, ValidationReport};

/// Lifecycle state of an endpoint model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Built locally, never written; no ID.
    Transient,
    /// In sync with the host; has an ID and no dirty fields.
    Persisted,
    /// Has an ID and local changes not yet sent.
    Modified,
    /// Removed on the host. Terminal.
    Deleted,
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Lifecycle::Transient => "transient",
            Lifecycle::Persisted => "persisted",
            Lifecycle::Modified => "modified",
            Lifecycle::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// Untyped state of one endpoint model instance.
#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static EntitySchema,
    id: Option<i64>,
    fields: Map<String, Value>,
    tracker: ChangeTracker,
    deleted: bool,
}

impl Record {
    /// An empty, transient record.
    pub fn new(schema: &'static EntitySchema) -> Self {
        Self {
            schema,
            id: None,
            fields: Map::new(),
            tracker: ChangeTracker::new(),
            deleted: false,
        }
    }

    /// Hydrate a persisted record from a host JSON object.
    ///
    /// Every key is kept verbatim, including ones the schema does not know.
    pub fn from_json(schema: &'static EntitySchema, value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(CrmError::InvalidResponse(format!(
                "expected a JSON object for {}",
                schema.entity
            )));
        };

        let id = fields
            .remove("id")
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                CrmError::InvalidResponse(format!("{} response has no numeric id", schema.entity))
            })?;

        Ok(Self {
            schema,
            id: Some(id),
            fields,
            tracker: ChangeTracker::new(),
            deleted: false,
        })
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn entity(&self) -> &'static str {
        self.schema.entity
    }

    /// Resource ID; `None` until the host assigns one.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.deleted {
            Lifecycle::Deleted
        } else if self.id.is_none() {
            Lifecycle::Transient
        } else if self.tracker.is_empty() {
            Lifecycle::Persisted
        } else {
            Lifecycle::Modified
        }
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn dirty_fields(&self) -> BTreeSet<&'static str> {
        self.tracker.dirty_fields()
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.tracker.is_dirty(field)
    }

    /// Raw field map, without the ID.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Whether `name` holds a non-null value.
    pub fn has_value(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|v| !v.is_null())
    }

    fn invalid_state(&self, operation: &'static str) -> CrmError {
        CrmError::InvalidState {
            entity: self.schema.entity,
            state: self.lifecycle(),
            operation,
        }
    }

    /// Fail unless the record has not been deleted.
    pub fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.deleted {
            return Err(self.invalid_state(operation));
        }
        Ok(())
    }

    /// ID of a live, persisted record.
    pub fn require_id(&self, operation: &'static str) -> Result<i64> {
        self.ensure_live(operation)?;
        self.id.ok_or_else(|| self.invalid_state(operation))
    }

    /// Current value of a field, local changes included. `null` reads as `None`.
    pub fn get(&self, name: &str) -> Result<Option<&Value>> {
        self.ensure_live("read")?;
        Ok(self.fields.get(name).filter(|v| !v.is_null()))
    }

    pub fn get_str(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.get(name)?.and_then(Value::as_str))
    }

    pub fn get_i64(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.get(name)?.and_then(Value::as_i64))
    }

    pub fn get_f64(&self, name: &str) -> Result<Option<f64>> {
        Ok(self.get(name)?.and_then(Value::as_f64))
    }

    pub fn get_bool(&self, name: &str) -> Result<Option<bool>> {
        Ok(self.get(name)?.and_then(Value::as_bool))
    }

    pub fn get_date(&self, name: &str) -> Result<Option<DateTime<FixedOffset>>> {
        Ok(self.get(name)?.and_then(Value::as_str).and_then(parse_date))
    }

    /// Assign a field after checking it against the schema, and mark it dirty.
    ///
    /// The state is untouched when the check fails.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        self.ensure_live("modify")?;

        let def = self.schema.field(name).ok_or_else(|| CrmError::InvalidArgument {
            field: name.to_string(),
            reason: format!("{} has no such field", self.schema.entity),
        })?;

        def.kind
            .check(&value)
            .map_err(|reason| CrmError::InvalidArgument {
                field: def.name.to_string(),
                reason,
            })?;

        self.fields.insert(def.name.to_string(), value);
        self.tracker.record_change(def.name);
        Ok(())
    }

    /// Put a field back to its schema default and mark it dirty, so the next
    /// update explicitly asks the host for its default.
    pub fn reset_field(&mut self, name: &str) -> Result<()> {
        let default = self
            .schema
            .field(name)
            .map(|def| def.default.to_value())
            .unwrap_or(Value::Null);
        self.set(name, default)
    }

    /// Host representation of the current state, ID included.
    pub fn to_json(&self) -> Result<Value> {
        self.ensure_live("read")?;
        let mut map = Map::new();
        if let Some(id) = self.id {
            map.insert("id".to_string(), Value::from(id));
        }
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone());
        }
        Ok(Value::Object(map))
    }

    /// Validate and build the full-state body of a create request.
    ///
    /// Every present field writable on create is sent, dirty or not.
    pub fn create_payload(&self) -> Result<Value> {
        if self.lifecycle() != Lifecycle::Transient {
            return Err(self.invalid_state("insert"));
        }

        let report = validation::validate(self, Operation::Create);
        self.check_report(&report)?;

        let mut payload = Map::new();
        for def in self.schema.fields {
            if !def.access.writable_on(Operation::Create) {
                continue;
            }
            if let Some(value) = self.fields.get(def.name) {
                payload.insert(def.name.to_string(), value.clone());
            }
        }
        Ok(Value::Object(payload))
    }

    /// Validate and build the body of a partial update.
    ///
    /// Only dirty fields writable on patch are sent, plus any field the
    /// schema requires on every patch. Returns `None` when nothing changed
    /// or when no dirty field can be written on patch.
    pub fn patch_payload(&self) -> Result<Option<Value>> {
        self.require_id("update")?;

        if self.tracker.is_empty() {
            return Ok(None);
        }

        let report = validation::validate(self, Operation::Patch);
        self.check_report(&report)?;

        let mut payload = Map::new();
        for def in self.schema.fields {
            if !def.access.writable_on(Operation::Patch) {
                continue;
            }
            if self.tracker.is_dirty(def.name) || def.required_on_patch {
                if let Some(value) = self.fields.get(def.name) {
                    payload.insert(def.name.to_string(), value.clone());
                }
            }
        }
        if payload.is_empty() {
            return Ok(None);
        }
        Ok(Some(Value::Object(payload)))
    }

    fn check_report(&self, report: &ValidationReport) -> Result<()> {
        if !report.ignored.is_empty() {
            tracing::warn!(
                entity = self.schema.entity,
                operation = %report.operation,
                ignored = ?report.ignored,
                "fields not writable for this operation will not be sent"
            );
        }
        if !report.is_ok() {
            return Err(CrmError::Validation {
                entity: self.schema.entity,
                missing: report.missing.clone(),
            });
        }
        Ok(())
    }

    /// Take the host's answer to a create: adopt the assigned ID and every
    /// echoed field, then clear the dirty set.
    pub fn absorb_created(&mut self, response: Value) -> Result<()> {
        let Value::Object(mut fields) = response else {
            return Err(CrmError::InvalidResponse(format!(
                "create of {} returned no object",
                self.schema.entity
            )));
        };

        let id = fields
            .remove("id")
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                CrmError::InvalidResponse(format!(
                    "create of {} returned no numeric id",
                    self.schema.entity
                ))
            })?;

        self.id = Some(id);
        self.fields.extend(fields);
        self.tracker.reset();
        Ok(())
    }

    /// Take the host's answer to an update. Echoed fields overwrite local
    /// ones; the ID never changes once assigned.
    pub fn absorb_updated(&mut self, response: Value) -> Result<()> {
        if let Value::Object(mut fields) = response {
            fields.remove("id");
            self.fields.extend(fields);
        }
        self.tracker.reset();
        Ok(())
    }

    pub fn mark_deleted(&mut self) {
        self.deleted = true;
        self.tracker.reset();
    }
}
