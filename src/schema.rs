//! Static field schemas for endpoint models.
//!
//! Each entity declares one [`EntitySchema`] as a `static` table. The table
//! drives setter type checks, pre-flight validation and payload building, so
//! the typed accessors on each entity stay thin.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde_json::{json, Value};

/// Wire format the host uses for date-time fields.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Kind of write being prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Full-state `POST` of a new resource.
    Create,
    /// Partial `PATCH` of an existing resource.
    Patch,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => f.write_str("create"),
            Operation::Patch => f.write_str("patch"),
        }
    }
}

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    String,
    Int,
    Bool,
    Decimal,
    Date,
    /// String restricted to the listed values.
    Enum(&'static [&'static str]),
    /// Integer restricted to the listed values.
    IntEnum(&'static [i64]),
    Object,
    Collection,
}

impl FieldKind {
    /// Check a value against this kind. `null` is accepted for every kind;
    /// required-ness is the validator's concern.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return Ok(());
        }

        let ok = match self {
            FieldKind::String => value.is_string(),
            FieldKind::Int => value.is_i64(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Decimal => value.is_number(),
            FieldKind::Date => value.as_str().and_then(parse_date).is_some(),
            FieldKind::Enum(allowed) => {
                return match value.as_str() {
                    Some(s) if allowed.iter().any(|a| *a == s) => Ok(()),
                    Some(s) => Err(format!(
                        "'{s}' is not one of: {}",
                        allowed.join(", ")
                    )),
                    None => Err(format!("expected {}, got {}", self.name(), type_name(value))),
                };
            }
            FieldKind::IntEnum(allowed) => {
                return match value.as_i64() {
                    Some(n) if allowed.contains(&n) => Ok(()),
                    Some(n) => Err(format!(
                        "{n} is not one of: {}",
                        allowed
                            .iter()
                            .map(i64::to_string)
                            .collect::<Vec<_>>()
                            .join(", ")
                    )),
                    None => Err(format!("expected {}, got {}", self.name(), type_name(value))),
                };
            }
            FieldKind::Object => value.is_object(),
            FieldKind::Collection => value.is_array(),
        };

        if ok {
            Ok(())
        } else {
            Err(format!("expected {}, got {}", self.name(), type_name(value)))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int => "int",
            FieldKind::Bool => "bool",
            FieldKind::Decimal => "decimal",
            FieldKind::Date => "date",
            FieldKind::Enum(_) => "enum",
            FieldKind::IntEnum(_) => "int enum",
            FieldKind::Object => "object",
            FieldKind::Collection => "collection",
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Which writes may carry a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    ReadWrite,
    /// Accepted on create, ignored on patch.
    CreateOnly,
    /// Computed by the host; never sent.
    ReadOnly,
}

impl FieldAccess {
    pub fn writable_on(&self, operation: Operation) -> bool {
        match (self, operation) {
            (FieldAccess::ReadWrite, _) => true,
            (FieldAccess::CreateOnly, Operation::Create) => true,
            (FieldAccess::CreateOnly, Operation::Patch) => false,
            (FieldAccess::ReadOnly, _) => false,
        }
    }
}

/// Value a field takes when reset to the host default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Str(&'static str),
}

impl FieldDefault {
    pub fn to_value(&self) -> Value {
        match self {
            FieldDefault::Null => Value::Null,
            FieldDefault::Bool(b) => json!(b),
            FieldDefault::Int(n) => json!(n),
            FieldDefault::Decimal(d) => json!(d),
            FieldDefault::Str(s) => json!(s),
        }
    }
}

/// One field of an entity schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub access: FieldAccess,
    pub required_on_create: bool,
    /// Sent with, and required by, every patch.
    pub required_on_patch: bool,
    pub default: FieldDefault,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            access: FieldAccess::ReadWrite,
            required_on_create: false,
            required_on_patch: false,
            default: FieldDefault::Null,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required_on_create = true;
        self
    }

    pub const fn required_on_patch(mut self) -> Self {
        self.required_on_patch = true;
        self
    }

    pub const fn create_only(mut self) -> Self {
        self.access = FieldAccess::CreateOnly;
        self
    }

    pub const fn read_only(mut self) -> Self {
        self.access = FieldAccess::ReadOnly;
        self
    }

    pub const fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }
}

/// Declarative description of one entity type and its REST resource.
#[derive(Debug)]
pub struct EntitySchema {
    /// Entity name used in errors and logs.
    pub entity: &'static str,
    /// Collection path relative to the API root, e.g. `clients`.
    pub path: &'static str,
    pub fields: &'static [FieldDef],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Path of a single resource.
    pub fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.path, id)
    }
}

/// Parse a date as the host writes it (`2016-09-12T00:00:00+0000`),
/// RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, DATE_FORMAT) {
        return Some(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let utc = FixedOffset::east_opt(0)?;
    utc.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

/// Render a date in the host's wire format.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};

    static FIELDS: &[FieldDef] = &[
        FieldDef::new("name", FieldKind::String).required(),
        FieldDef::new("status", FieldKind::Enum(&["active", "paused"])),
        FieldDef::new("balance", FieldKind::Decimal).read_only(),
        FieldDef::new("period", FieldKind::IntEnum(&[1, 3, 12])).with_default(FieldDefault::Int(1)),
    ];

    static SCHEMA: EntitySchema = EntitySchema {
        entity: "Thing",
        path: "things",
        fields: FIELDS,
    };

    #[test]
    fn test_field_lookup_and_paths() {
        let name = SCHEMA.field("name").unwrap();
        assert!(name.required_on_create);
        assert_eq!(name.access, FieldAccess::ReadWrite);
        assert!(SCHEMA.field("missing").is_none());
        assert_eq!(SCHEMA.item_path(5), "things/5");
    }

    #[test]
    fn test_kind_checks() {
        assert!(FieldKind::String.check(&json!("x")).is_ok());
        assert!(FieldKind::String.check(&json!(1)).is_err());
        assert!(FieldKind::Int.check(&json!(1.5)).is_err());
        assert!(FieldKind::Int.check(&json!(i64::MAX)).is_ok());
        assert!(FieldKind::Int.check(&json!(u64::MAX)).is_err());
        assert!(FieldKind::Decimal.check(&json!(1)).is_ok());
        assert!(FieldKind::Bool.check(&Value::Null).is_ok());
        assert!(FieldKind::Collection.check(&json!([])).is_ok());
        assert!(FieldKind::Object.check(&json!([])).is_err());
    }

    #[test]
    fn test_enum_checks() {
        let status = SCHEMA.field("status").unwrap().kind;
        assert!(status.check(&json!("active")).is_ok());
        let err = status.check(&json!("deleted")).unwrap_err();
        assert!(err.contains("active, paused"));

        let period = SCHEMA.field("period").unwrap().kind;
        assert!(period.check(&json!(12)).is_ok());
        assert!(period.check(&json!(2)).is_err());
        assert!(period.check(&json!("12")).is_err());
    }

    #[test]
    fn test_access_rules() {
        assert!(FieldAccess::CreateOnly.writable_on(Operation::Create));
        assert!(!FieldAccess::CreateOnly.writable_on(Operation::Patch));
        assert!(!FieldAccess::ReadOnly.writable_on(Operation::Create));
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2016-09-12T00:00:00+0000").is_some());
        assert!(parse_date("2016-09-12T00:00:00+02:00").is_some());
        let bare = parse_date("2016-09-12").unwrap();
        assert_eq!(bare.day(), 12);
        assert!(parse_date("yesterday").is_none());
        assert!(FieldKind::Date.check(&json!("12/09/2016")).is_err());
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(format_date(&date), "2024-03-01T08:30:00+0000");
    }
}
