// crates/contract-gate-core/src/core/mod.rs
// ============================================================================
// Module: Contract Gate Core Types
// Description: Resource records, contracts, responses, and the error taxonomy.
// Purpose: Provide stable, serializable types shared by every harness layer.
// Dependencies: serde, serde_json, jsonschema, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what the remote service exchanges (resource records and
//! normalized responses) and what the harness expects of it (schema contracts
//! held in a registry). The error taxonomy used by every scenario lives here.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod error;
pub mod identifiers;
pub mod record;
pub mod registry;
pub mod response;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::FixtureLeakWarning;
pub use error::FixtureProvisionError;
pub use error::HarnessError;
pub use identifiers::AuthToken;
pub use identifiers::ResourceKind;
pub use record::Category;
pub use record::ResourceRecord;
pub use record::ResourceStatus;
pub use record::Tag;
pub use registry::PET_KIND;
pub use registry::RegistryError;
pub use registry::SchemaRegistry;
pub use response::ContractResponse;
pub use response::ResponseBody;
pub use schema::ContractParseError;
pub use schema::FieldType;
pub use schema::FieldViolation;
pub use schema::SchemaContract;
pub use schema::SchemaViolation;
