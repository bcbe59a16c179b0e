// crates/contract-gate-core/src/core/record.rs
// ============================================================================
// Module: Resource Records
// Description: Wire representation of the resources exercised by scenarios.
// Purpose: Provide typed request payloads for create and update operations.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ResourceRecord`] is the entity the remote API stores: identifier,
//! optional category, display name, media references, tags, and a status.
//! Records are sent by the harness; responses are validated as untyped JSON
//! against a [`crate::SchemaContract`] instead of being deserialized here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Lifecycle status of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Resource is available.
    Available,
    /// Resource is pending.
    Pending,
    /// Resource has been sold.
    Sold,
}

impl ResourceStatus {
    /// Returns the wire label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "available" => Ok(Self::Available),
            "pending" => Ok(Self::Pending),
            "sold" => Ok(Self::Sold),
            other => Err(format!("unknown resource status: {other}")),
        }
    }
}

// ============================================================================
// SECTION: Record Types
// ============================================================================

/// Classification attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Category name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Free-form tag attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Tag name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Resource entity exchanged with the remote API.
///
/// # Invariants
/// - `id` and `status` are always present.
/// - `category` is omitted from the wire when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Caller-supplied identifier.
    pub id: i64,
    /// Optional classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Display name.
    pub name: String,
    /// Media references.
    #[serde(default)]
    pub photo_urls: Vec<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Lifecycle status.
    pub status: ResourceStatus,
}

impl ResourceRecord {
    /// Creates a record with the given identifier and name, no media, and
    /// `available` status.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            category: None,
            name: name.into(),
            photo_urls: Vec::new(),
            tags: Vec::new(),
            status: ResourceStatus::Available,
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, id: i64, name: impl Into<String>) -> Self {
        self.category = Some(Category {
            id: Some(id),
            name: Some(name.into()),
        });
        self
    }

    /// Appends a media reference.
    #[must_use]
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_urls.push(url.into());
        self
    }

    /// Appends a tag.
    #[must_use]
    pub fn with_tag(mut self, id: i64, name: impl Into<String>) -> Self {
        self.tags.push(Tag {
            id: Some(id),
            name: Some(name.into()),
        });
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
