// crates/contract-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Test Fixtures
// Description: In-memory pet store transport with fault injection.
// Purpose: Exercise the runtime without a network.
// ============================================================================

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared test helpers; not every suite uses every helper."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Mutex;

use contract_gate_core::AuthToken;
use contract_gate_core::ContractResponse;
use contract_gate_core::ContractTransport;
use contract_gate_core::ResourceRecord;
use contract_gate_core::ResourceStatus;
use contract_gate_core::TransportError;
use contract_gate_core::interfaces::operation;
use serde_json::Value;
use serde_json::json;

/// Key the fake store accepts on deletes.
pub const API_KEY: &str = "special-key";

/// Injected misbehavior.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Fields removed from every record the store returns.
    pub drop_fields: Vec<String>,
    /// Fields overwritten in every record the store returns.
    pub override_fields: Vec<(String, Value)>,
    /// Status returned by every create call.
    pub create_status: Option<u16>,
    /// Status returned by every delete call.
    pub delete_status: Option<u16>,
    /// Operations that fail without a response.
    pub unreachable: BTreeSet<&'static str>,
    /// Ignore updates (echo the stored record instead).
    pub ignore_updates: bool,
}

/// Stateful in-memory pet store.
#[derive(Default)]
pub struct FakeStore {
    /// Records by id.
    records: Mutex<BTreeMap<i64, ResourceRecord>>,
    /// Injected faults.
    faults: Mutex<Faults>,
    /// Operations in call order.
    calls: Mutex<Vec<(&'static str, i64)>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        let store = Self::default();
        *store.faults.lock().unwrap() = faults;
        store
    }

    pub fn seed(&self, record: ResourceRecord) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    pub fn contains(&self, id: i64) -> bool {
        self.records.lock().unwrap().contains_key(&id)
    }

    pub fn ids(&self) -> Vec<i64> {
        self.records.lock().unwrap().keys().copied().collect()
    }

    pub fn calls(&self) -> Vec<(&'static str, i64)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_faults(&self, faults: Faults) {
        *self.faults.lock().unwrap() = faults;
    }

    fn enter(&self, name: &'static str, id: i64) -> Result<Faults, TransportError> {
        self.calls.lock().unwrap().push((name, id));
        let faults = self.faults.lock().unwrap().clone();
        if faults.unreachable.contains(name) {
            return Err(TransportError::Connect {
                operation: name,
                message: "connection refused".to_string(),
            });
        }
        Ok(faults)
    }

    fn render(faults: &Faults, record: &ResourceRecord) -> Value {
        let mut value = serde_json::to_value(record).unwrap();
        if let Value::Object(map) = &mut value {
            for field in &faults.drop_fields {
                map.remove(field);
            }
            for (field, replacement) in &faults.override_fields {
                map.insert(field.clone(), replacement.clone());
            }
        }
        value
    }

    fn not_found() -> ContractResponse {
        ContractResponse::json(404, json!({"code": 1, "type": "error", "message": "Pet not found"}))
    }
}

impl ContractTransport for FakeStore {
    fn get_by_id(&self, id: i64) -> Result<ContractResponse, TransportError> {
        let faults = self.enter(operation::GET_BY_ID, id)?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&id)
            .map_or_else(Self::not_found, |record| {
                ContractResponse::json(200, Self::render(&faults, record))
            }))
    }

    fn create(&self, record: &ResourceRecord) -> Result<ContractResponse, TransportError> {
        let faults = self.enter(operation::CREATE, record.id)?;
        if let Some(status) = faults.create_status {
            return Ok(ContractResponse::json(status, json!({"message": "rejected"})));
        }
        self.records.lock().unwrap().insert(record.id, record.clone());
        Ok(ContractResponse::json(200, Self::render(&faults, record)))
    }

    fn update(&self, record: &ResourceRecord) -> Result<ContractResponse, TransportError> {
        let faults = self.enter(operation::UPDATE, record.id)?;
        let mut records = self.records.lock().unwrap();
        if faults.ignore_updates
            && let Some(existing) = records.get(&record.id)
        {
            return Ok(ContractResponse::json(200, Self::render(&faults, existing)));
        }
        records.insert(record.id, record.clone());
        Ok(ContractResponse::json(200, Self::render(&faults, record)))
    }

    fn find_by_status(&self, status: ResourceStatus) -> Result<ContractResponse, TransportError> {
        let faults = self.enter(operation::FIND_BY_STATUS, 0)?;
        let items: Vec<Value> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|record| record.status == status)
            .map(|record| Self::render(&faults, record))
            .collect();
        Ok(ContractResponse::json(200, Value::Array(items)))
    }

    fn delete_by_id(
        &self,
        id: i64,
        token: &AuthToken,
    ) -> Result<ContractResponse, TransportError> {
        let faults = self.enter(operation::DELETE_BY_ID, id)?;
        if let Some(status) = faults.delete_status {
            return Ok(ContractResponse::empty(status));
        }
        if token.expose() != API_KEY {
            return Ok(ContractResponse::empty(401));
        }
        match self.records.lock().unwrap().remove(&id) {
            Some(_) => Ok(ContractResponse::json(
                200,
                json!({"code": 200, "type": "unknown", "message": id.to_string()}),
            )),
            None => Ok(ContractResponse::empty(404)),
        }
    }
}
