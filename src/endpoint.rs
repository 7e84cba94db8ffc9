//! The endpoint model base trait.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::Result;
use crate::record::{Lifecycle, Record};
use crate::schema::{EntitySchema, Operation};
use crate::validation::{self, ValidationReport};

/// A typed entity bound to one REST resource.
///
/// Implementors own a [`Record`] and declare a static schema. Everything
/// schema-driven (dynamic field access, validation, JSON conversion) is
/// provided here; remote operations come from the [`Get`](crate::Get),
/// [`List`](crate::List), [`Insert`](crate::Insert),
/// [`Update`](crate::Update) and [`Delete`](crate::Delete) traits, which an
/// entity implements only when its resource supports them.
pub trait Endpoint: Clone + Send + Sync + 'static {
    /// Field table and resource path of this entity.
    const SCHEMA: &'static EntitySchema;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// A fresh, transient instance.
    fn transient() -> Self {
        Self::from_record(Record::new(Self::SCHEMA))
    }

    /// Hydrate a persisted instance from the host's JSON representation.
    fn from_json(value: Value) -> Result<Self> {
        Record::from_json(Self::SCHEMA, value).map(Self::from_record)
    }

    /// Host representation of the current state, ID included.
    fn to_json(&self) -> Result<Value> {
        self.record().to_json()
    }

    fn id(&self) -> Option<i64> {
        self.record().id()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.record().lifecycle()
    }

    fn dirty_fields(&self) -> BTreeSet<&'static str> {
        self.record().dirty_fields()
    }

    fn is_dirty(&self, field: &str) -> bool {
        self.record().is_dirty(field)
    }

    /// Pre-flight check of what an insert or update would send.
    fn validate(&self, operation: Operation) -> Result<ValidationReport> {
        self.record().ensure_live("validate")?;
        Ok(validation::validate(self.record(), operation))
    }

    /// Read any field by its JSON name.
    fn field(&self, name: &str) -> Result<Option<&Value>> {
        self.record().get(name)
    }

    /// Write any schema field by its JSON name, checked at runtime.
    fn set_field(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        self.record_mut().set(name, value)?;
        Ok(self)
    }

    /// Reset any schema field to its default and mark it dirty.
    fn reset_field(&mut self, name: &str) -> Result<&mut Self> {
        self.record_mut().reset_field(name)?;
        Ok(self)
    }
}
