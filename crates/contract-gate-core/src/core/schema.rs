// crates/contract-gate-core/src/core/schema.rs
// ============================================================================
// Module: Schema Contracts
// Description: Field-presence and field-type contracts for resource payloads.
// Purpose: Report every shape violation of a response body in one pass.
// Dependencies: jsonschema, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`SchemaContract`] names the required and optional fields of a resource
//! and the JSON type each must carry. [`SchemaContract::check`] never stops at
//! the first problem: it returns every missing required field and every type
//! mismatch, ordered by field name, so a failure report is complete.
//!
//! Contracts convert to and from the Draft 2020-12 JSON Schema subset used by
//! resource documentation (`type: object`, `properties`, `required`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use jsonschema::Draft;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::core::identifiers::ResourceKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON Schema dialect emitted by [`SchemaContract::to_json_schema`].
pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

// ============================================================================
// SECTION: Field Types
// ============================================================================

/// JSON type a contract field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Integral JSON number.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON string.
    String,
    /// JSON boolean.
    Boolean,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl FieldType {
    /// Returns the JSON Schema type keyword for this field type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Parses a JSON Schema type keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// Returns true when `value` satisfies this type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Integer, Value::Number(number)) => {
                number.is_i64()
                    || number.is_u64()
                    || number.as_f64().is_some_and(|float| float.fract() == 0.0)
            }
            (Self::Number, Value::Number(_))
            | (Self::String, Value::String(_))
            | (Self::Boolean, Value::Bool(_))
            | (Self::Array, Value::Array(_))
            | (Self::Object, Value::Object(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the JSON type label of a value for violation messages.
#[must_use]
pub const fn json_type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// A single shape violation found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum FieldViolation {
    /// The body is not a JSON document.
    NotJson {
        /// What was received instead (`empty` or `text`).
        actual: &'static str,
    },
    /// A value expected to be an object is not one.
    NotAnObject {
        /// Location of the value (empty for the root).
        path: String,
        /// JSON type received.
        actual: &'static str,
    },
    /// A value expected to be an array is not one.
    NotAnArray {
        /// Location of the value (empty for the root).
        path: String,
        /// JSON type received.
        actual: &'static str,
    },
    /// A required field is absent.
    Missing {
        /// Field location.
        field: String,
        /// Declared type.
        expected: FieldType,
    },
    /// A field is present with the wrong JSON type.
    TypeMismatch {
        /// Field location.
        field: String,
        /// Declared type.
        expected: FieldType,
        /// JSON type received.
        actual: &'static str,
    },
    /// An echoed field does not carry the value that was sent.
    FieldMismatch {
        /// Field location.
        field: String,
        /// Value that was sent.
        expected: Value,
        /// Value that came back, if any.
        actual: Option<Value>,
    },
}

impl FieldViolation {
    /// Re-roots the violation under an array element index.
    #[must_use]
    pub fn at_index(self, index: usize) -> Self {
        let prefix = |inner: String| {
            if inner.is_empty() { format!("[{index}]") } else { format!("[{index}].{inner}") }
        };
        match self {
            Self::NotJson {
                actual,
            } => Self::NotJson {
                actual,
            },
            Self::NotAnObject {
                path,
                actual,
            } => Self::NotAnObject {
                path: prefix(path),
                actual,
            },
            Self::NotAnArray {
                path,
                actual,
            } => Self::NotAnArray {
                path: prefix(path),
                actual,
            },
            Self::Missing {
                field,
                expected,
            } => Self::Missing {
                field: prefix(field),
                expected,
            },
            Self::TypeMismatch {
                field,
                expected,
                actual,
            } => Self::TypeMismatch {
                field: prefix(field),
                expected,
                actual,
            },
            Self::FieldMismatch {
                field,
                expected,
                actual,
            } => Self::FieldMismatch {
                field: prefix(field),
                expected,
                actual,
            },
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotJson {
                actual,
            } => write!(f, "body is not JSON (got {actual})"),
            Self::NotAnObject {
                path,
                actual,
            } => write!(f, "{} is {actual}, expected object", display_path(path)),
            Self::NotAnArray {
                path,
                actual,
            } => write!(f, "{} is {actual}, expected array", display_path(path)),
            Self::Missing {
                field,
                expected,
            } => write!(f, "missing required field `{field}` ({expected})"),
            Self::TypeMismatch {
                field,
                expected,
                actual,
            } => write!(f, "field `{field}` is {actual}, expected {expected}"),
            Self::FieldMismatch {
                field,
                expected,
                actual,
            } => match actual {
                Some(actual) => write!(f, "field `{field}` is {actual}, expected {expected}"),
                None => write!(f, "field `{field}` is absent, expected {expected}"),
            },
        }
    }
}

/// Renders a violation path, naming the root explicitly.
fn display_path(path: &str) -> String {
    if path.is_empty() { "payload".to_string() } else { format!("`{path}`") }
}

/// Every violation found while validating a payload against a contract.
///
/// # Invariants
/// - `violations` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Contract that was violated.
    pub kind: ResourceKind,
    /// Violations in field order.
    pub violations: Vec<FieldViolation>,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contract `{}` violated: ", self.kind)?;
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Contract
// ============================================================================

/// Named set of field-presence and field-type rules.
///
/// # Invariants
/// - A field appears in at most one of `required` and `optional`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaContract {
    /// Contract display name.
    name: String,
    /// Fields that must be present with the declared type.
    required: BTreeMap<String, FieldType>,
    /// Fields that may be absent but must carry the declared type when present.
    optional: BTreeMap<String, FieldType>,
}

impl SchemaContract {
    /// Creates an empty contract.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: BTreeMap::new(),
            optional: BTreeMap::new(),
        }
    }

    /// Declares a required field. Replaces any earlier rule for the field.
    #[must_use]
    pub fn require(mut self, field: impl Into<String>, field_type: FieldType) -> Self {
        let field = field.into();
        self.optional.remove(&field);
        self.required.insert(field, field_type);
        self
    }

    /// Declares an optional field. Replaces any earlier rule for the field.
    #[must_use]
    pub fn allow(mut self, field: impl Into<String>, field_type: FieldType) -> Self {
        let field = field.into();
        self.required.remove(&field);
        self.optional.insert(field, field_type);
        self
    }

    /// Returns the pet resource contract.
    #[must_use]
    pub fn pet() -> Self {
        Self::new("Pet")
            .require("id", FieldType::Integer)
            .require("name", FieldType::String)
            .require("photoUrls", FieldType::Array)
            .require("status", FieldType::String)
            .allow("category", FieldType::Object)
            .allow("tags", FieldType::Array)
    }

    /// Returns the contract display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the required fields.
    #[must_use]
    pub const fn required(&self) -> &BTreeMap<String, FieldType> {
        &self.required
    }

    /// Returns the optional fields.
    #[must_use]
    pub const fn optional(&self) -> &BTreeMap<String, FieldType> {
        &self.optional
    }

    /// Returns every violation of this contract found in `payload`.
    ///
    /// Extra fields are ignored. An empty result means the payload conforms.
    #[must_use]
    pub fn check(&self, payload: &Value) -> Vec<FieldViolation> {
        let Value::Object(map) = payload else {
            return vec![FieldViolation::NotAnObject {
                path: String::new(),
                actual: json_type_label(payload),
            }];
        };
        let mut violations = Vec::new();
        let rules = self
            .required
            .iter()
            .map(|(field, field_type)| (field, *field_type, true))
            .chain(self.optional.iter().map(|(field, field_type)| (field, *field_type, false)));
        let mut ordered: Vec<_> = rules.collect();
        ordered.sort_by(|left, right| left.0.cmp(right.0));
        for (field, expected, required) in ordered {
            match map.get(field) {
                None if required => violations.push(FieldViolation::Missing {
                    field: field.clone(),
                    expected,
                }),
                None => {}
                Some(value) if !expected.matches(value) => {
                    violations.push(FieldViolation::TypeMismatch {
                        field: field.clone(),
                        expected,
                        actual: json_type_label(value),
                    });
                }
                Some(_) => {}
            }
        }
        violations
    }

    /// Renders the contract as a Draft 2020-12 JSON Schema document.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for (field, field_type) in self.required.iter().chain(self.optional.iter()) {
            properties.insert(field.clone(), json!({ "type": field_type.as_str() }));
        }
        let required: Vec<Value> =
            self.required.keys().map(|field| Value::String(field.clone())).collect();
        json!({
            "$schema": JSON_SCHEMA_DIALECT,
            "title": self.name,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Parses a JSON Schema document into a contract.
    ///
    /// # Errors
    ///
    /// Returns [`ContractParseError`] when the document is not a valid JSON
    /// Schema or uses constructs outside the supported subset.
    pub fn from_json_schema(
        name: impl Into<String>,
        document: &Value,
    ) -> Result<Self, ContractParseError> {
        jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(document)
            .map_err(|err| ContractParseError::InvalidSchema(err.to_string()))?;
        let Value::Object(root) = document else {
            return Err(ContractParseError::NotObjectSchema);
        };
        if let Some(kind) = root.get("type")
            && kind.as_str() != Some("object")
        {
            return Err(ContractParseError::NotObjectSchema);
        }
        let mut contract = Self::new(name);
        let empty = Map::new();
        let properties = match root.get("properties") {
            None => &empty,
            Some(Value::Object(properties)) => properties,
            Some(_) => return Err(ContractParseError::InvalidProperties),
        };
        let mut declared = BTreeMap::new();
        for (field, rule) in properties {
            let keyword = rule.get("type").and_then(Value::as_str).ok_or_else(|| {
                ContractParseError::UnsupportedType {
                    field: field.clone(),
                    keyword: rule.get("type").map_or_else(|| "<none>".to_string(), Value::to_string),
                }
            })?;
            let field_type = FieldType::from_keyword(keyword).ok_or_else(|| {
                ContractParseError::UnsupportedType {
                    field: field.clone(),
                    keyword: keyword.to_string(),
                }
            })?;
            declared.insert(field.clone(), field_type);
        }
        let required = match root.get("required") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or(ContractParseError::InvalidRequired)
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(ContractParseError::InvalidRequired),
        };
        for field in &required {
            if !declared.contains_key(field) {
                return Err(ContractParseError::UndeclaredRequired(field.clone()));
            }
        }
        for (field, field_type) in declared {
            contract = if required.contains(&field) {
                contract.require(field, field_type)
            } else {
                contract.allow(field, field_type)
            };
        }
        Ok(contract)
    }
}

/// Errors raised while parsing a JSON Schema document into a contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractParseError {
    /// The document failed JSON Schema compilation.
    #[error("invalid json schema: {0}")]
    InvalidSchema(String),
    /// The document does not describe an object.
    #[error("contract schema must describe an object")]
    NotObjectSchema,
    /// `properties` is not an object.
    #[error("contract schema properties must be an object")]
    InvalidProperties,
    /// `required` is not an array of strings.
    #[error("contract schema required must be an array of strings")]
    InvalidRequired,
    /// A property uses a type outside the supported subset.
    #[error("field `{field}` uses unsupported type {keyword}")]
    UnsupportedType {
        /// Field name.
        field: String,
        /// Offending type keyword.
        keyword: String,
    },
    /// `required` names a field without a property declaration.
    #[error("required field `{0}` has no property declaration")]
    UndeclaredRequired(String),
}
