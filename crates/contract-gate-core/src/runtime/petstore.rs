// crates/contract-gate-core/src/runtime/petstore.rs
// ============================================================================
// Module: Pet Store Catalog
// Description: Built-in contract scenarios for the pet resource API.
// Purpose: Cover read, create, update, list, and delete with isolated fixtures.
// Dependencies: crate::{core, runtime::scenario}, serde_json
// ============================================================================

//! ## Overview
//! [`scenarios`] returns the built-in catalog. Every scenario that needs a
//! record provisions it as a fixture, and every record the operation under
//! test creates is adopted, so each scenario leaves the store as it found it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;

use crate::core::PET_KIND;
use crate::core::ResourceKind;
use crate::core::ResourceRecord;
use crate::core::ResourceStatus;
use crate::runtime::scenario::Scenario;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Identifier used by the create and update scenarios.
pub const BUDDY_ID: i64 = 12_345;
/// Identifier no scenario ever creates.
pub const MISSING_ID: i64 = 99_999;

/// Returns the pet resource kind.
fn pet() -> ResourceKind {
    ResourceKind::new(PET_KIND)
}

/// Record read back by `get_pet_by_id`.
#[must_use]
pub fn test_pet() -> ResourceRecord {
    ResourceRecord::new(1, "TestPet")
        .with_category(1, "dog")
        .with_photo_url("http://example.com/testpet.jpg")
        .with_tag(1, "test")
}

/// Record created by `add_new_pet` and replaced by `update_existing_pet`.
#[must_use]
pub fn buddy() -> ResourceRecord {
    ResourceRecord::new(BUDDY_ID, "Buddy")
        .with_category(1, "dog")
        .with_photo_url("http://example.com/dog.jpg")
        .with_tag(1, "friendly")
}

/// Record removed by `delete_pet`.
#[must_use]
pub fn delete_pet() -> ResourceRecord {
    ResourceRecord::new(2, "DeletePet")
        .with_category(1, "cat")
        .with_photo_url("http://example.com/deletepet.jpg")
        .with_tag(2, "delete")
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the built-in scenarios in execution order.
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("get_pet_by_id", "read an existing pet and validate its shape", |ctx| {
            let id = ctx.fixture(0)?.id();
            let response = ctx.transport().get_by_id(id)?;
            ctx.exercised()?;
            ctx.assertions().expect_response(&pet(), &response, &[200])?;
            ctx.validated()
        })
        .with_fixture(PET_KIND, test_pet()),
        Scenario::new("get_pet_by_invalid_id", "reading id -1 answers 404", |ctx| {
            let response = ctx.transport().get_by_id(-1)?;
            ctx.exercised()?;
            ctx.assertions().expect_status(&response, &[404])?;
            ctx.validated()
        }),
        Scenario::new("add_new_pet", "create a pet and validate the echoed record", |ctx| {
            let response = ctx.transport().create(&buddy())?;
            if response.is_success() {
                ctx.adopt(PET_KIND, BUDDY_ID);
            }
            ctx.exercised()?;
            ctx.assertions().expect_response(&pet(), &response, &[200])?;
            ctx.validated()
        }),
        Scenario::new(
            "update_existing_pet",
            "replace a pet and check name and status are echoed",
            |ctx| {
                let updated = buddy().with_status(ResourceStatus::Sold);
                let updated = ResourceRecord {
                    name: "BuddyUpdated".to_string(),
                    ..updated
                };
                let response = ctx.transport().update(&updated)?;
                ctx.exercised()?;
                let kind = pet();
                let assertions = ctx.assertions();
                assertions.expect_response(&kind, &response, &[200])?;
                assertions.expect_fields(
                    &kind,
                    &response.body,
                    &[("name", json!(updated.name)), ("status", json!(updated.status))],
                )?;
                ctx.validated()
            },
        )
        .with_fixture(PET_KIND, buddy()),
        Scenario::new(
            "find_pets_by_status",
            "list available pets and validate every element",
            |ctx| {
                let response = ctx.transport().find_by_status(ResourceStatus::Available)?;
                ctx.exercised()?;
                let assertions = ctx.assertions();
                assertions.expect_status(&response, &[200])?;
                assertions.expect_each_shape(&pet(), &response.body)?;
                ctx.validated()
            },
        ),
        Scenario::new("delete_pet", "delete a pet and confirm it is gone", |ctx| {
            let id = ctx.fixture(0)?.id();
            let response = ctx.transport().delete_by_id(id, ctx.auth_token())?;
            ctx.exercised()?;
            let assertions = ctx.assertions();
            assertions.expect_status(&response, &[200])?;
            assertions.expect_absence(&pet(), id)?;
            ctx.validated()
        })
        .with_fixture(PET_KIND, delete_pet()),
        Scenario::new("delete_nonexistent_pet", "deleting a missing pet answers 404", |ctx| {
            let response = ctx.transport().delete_by_id(MISSING_ID, ctx.auth_token())?;
            ctx.exercised()?;
            ctx.assertions().expect_status(&response, &[404])?;
            ctx.validated()
        }),
    ]
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::scenarios;

    #[test]
    fn catalog_names_are_unique_and_stable() {
        let names: Vec<String> = scenarios().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(
            names,
            [
                "get_pet_by_id",
                "get_pet_by_invalid_id",
                "add_new_pet",
                "update_existing_pet",
                "find_pets_by_status",
                "delete_pet",
                "delete_nonexistent_pet",
            ]
        );
        let unique: BTreeSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn fixtures_are_declared_where_records_are_read() {
        let catalog = scenarios();
        let fixture_ids = |name: &str| -> Vec<i64> {
            catalog
                .iter()
                .find(|s| s.name() == name)
                .map(|s| s.fixtures().iter().map(|(_, record)| record.id).collect())
                .unwrap_or_default()
        };
        assert_eq!(fixture_ids("get_pet_by_id"), [1]);
        assert_eq!(fixture_ids("update_existing_pet"), [12_345]);
        assert_eq!(fixture_ids("delete_pet"), [2]);
        assert!(fixture_ids("delete_nonexistent_pet").is_empty());
    }
}
