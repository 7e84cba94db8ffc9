//! Pre-flight validation of a record against its schema.

use crate::error::{CrmError, Result};
use crate::record::Record;
use crate::schema::Operation;

/// Outcome of validating a record for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub operation: Operation,
    /// Required for this operation but unset or null. Blocks the write.
    pub missing: Vec<String>,
    /// Supplied but not writable for this operation. Informational only;
    /// these fields are left out of the request.
    pub ignored: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }

    /// Turn a failed report into [`CrmError::Validation`].
    pub fn into_result(self, entity: &'static str) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(CrmError::Validation {
                entity,
                missing: self.missing,
            })
        }
    }
}

/// Classify a record's fields for `operation`.
///
/// For [`Operation::Create`] every field required on create must hold a
/// value, and present fields the host computes are reported as ignored.
///
/// For [`Operation::Patch`] only dirty fields are examined: a dirty field
/// that is required on create may not be cleared, and a dirty field that is
/// not writable on patch is ignored. Fields the schema requires on every
/// patch must hold a value whether dirty or not.
pub fn validate(record: &Record, operation: Operation) -> ValidationReport {
    let schema = record.schema();
    let mut missing = Vec::new();
    let mut ignored = Vec::new();

    match operation {
        Operation::Create => {
            for def in schema.fields {
                if def.required_on_create && !record.has_value(def.name) {
                    missing.push(def.name.to_string());
                }
            }
            for def in schema.fields {
                if !def.access.writable_on(operation) && record.has_value(def.name) {
                    ignored.push(def.name.to_string());
                }
            }
            for key in record.fields().keys() {
                if schema.field(key).is_none() {
                    ignored.push(key.clone());
                }
            }
        }
        Operation::Patch => {
            for def in schema.fields {
                let dirty = record.is_dirty(def.name);
                let must_have = def.required_on_patch || (dirty && def.required_on_create);
                if must_have && !record.has_value(def.name) {
                    missing.push(def.name.to_string());
                }
                if dirty && !def.access.writable_on(operation) {
                    ignored.push(def.name.to_string());
                }
            }
        }
    }

    ValidationReport {
        operation,
        missing,
        ignored,
    }
}
