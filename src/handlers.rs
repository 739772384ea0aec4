//! The four collection operations and how their outcomes become replies.
//!
//! Each operation runs its own load → mutate → save against the store while
//! holding a turn from the [`AccessGate`]. Every failure is turned into a
//! reply here; nothing propagates past a handler.

use crate::access::{AccessGate, AccessMode};
use crate::error::{Error, Result};
use crate::record::{loose_id_eq, shallow_merge, strict_id_eq, Record, ID_FIELD};
use crate::store::{next_id, RecordStore};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Status code and JSON body produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status.
    pub status: StatusCode,
    /// Response body, always JSON text.
    pub body: Vec<u8>,
}

impl Reply {
    /// Reply with pre-encoded bytes.
    pub fn raw(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Reply whose body is a one-field object, e.g. `{"error":"ID not found"}`.
    pub fn message(status: StatusCode, key: &str, text: &str) -> Self {
        let mut obj = serde_json::Map::new();
        obj.insert(key.to_owned(), Value::String(text.to_owned()));
        Self::raw(status, Value::Object(obj).to_string().into_bytes())
    }

    /// Fallback for anything the router doesn't know.
    pub fn not_found() -> Self {
        Self::message(StatusCode::NOT_FOUND, "message", "Not Found")
    }

    /// Body parsed as JSON. Handy in tests.
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_slice(&self.body)
    }
}

/// How store failures map onto status codes.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Historical codes: Create and Update answer 400 for any failure, Read
    /// and Delete answer 500.
    #[default]
    Compatible,
    /// Malformed body is 400, any store failure is 500, in every operation.
    Normalized,
}

impl std::str::FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "compatible" => Ok(StatusPolicy::Compatible),
            "normalized" => Ok(StatusPolicy::Normalized),
            other => Err(format!("unknown status policy `{other}`")),
        }
    }
}

const ID_NOT_FOUND: &str = "ID not found";

/// CRUD operations over one [`RecordStore`].
pub struct Items<S> {
    store: S,
    gate: AccessGate,
    policy: StatusPolicy,
}

impl<S: RecordStore> Items<S> {
    /// Serialized access, compatible status codes.
    pub fn new(store: S) -> Self {
        Self {
            store,
            gate: AccessGate::new(AccessMode::default()),
            policy: StatusPolicy::default(),
        }
    }

    /// Pick the access mode (default: [`AccessMode::Serialized`]).
    pub fn with_access(mut self, mode: AccessMode) -> Self {
        self.gate = AccessGate::new(mode);
        self
    }

    /// Pick the status policy (default: [`StatusPolicy::Compatible`]).
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access mode in effect.
    #[must_use]
    pub fn access_mode(&self) -> AccessMode {
        self.gate.mode()
    }

    // ---- operations ----

    /// Return the stored bytes verbatim.
    pub fn read(&self) -> Reply {
        let _turn = self.gate.enter();
        match self.store.load_raw() {
            Ok(bytes) => Reply::raw(StatusCode::OK, bytes),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read data");
                Reply::message(StatusCode::INTERNAL_SERVER_ERROR, "message", "Failed to read data")
            }
        }
    }

    /// Append `body` as a new record with a fresh id.
    pub fn create(&self, body: &[u8]) -> Reply {
        match self.try_create(body) {
            Ok(bytes) => Reply::raw(StatusCode::CREATED, bytes),
            Err(e) => {
                tracing::warn!(error = %e, "failed to add data");
                let status = self.failure_status(&e, StatusCode::BAD_REQUEST);
                Reply::message(status, "error", "failed to add data")
            }
        }
    }

    /// Merge `body` into the record with the same `id`.
    pub fn update(&self, body: &[u8]) -> Reply {
        match self.try_update(body) {
            Ok(bytes) => Reply::raw(StatusCode::OK, bytes),
            Err(Error::NotFound) => Reply::message(StatusCode::NOT_FOUND, "error", ID_NOT_FOUND),
            Err(e) => {
                tracing::error!(error = %e, "error updating data");
                let status = self.failure_status(&e, StatusCode::BAD_REQUEST);
                Reply::message(status, "error", "Failed to update: Invalid data")
            }
        }
    }

    /// Remove the first record whose id matches `id_token`.
    pub fn delete(&self, id_token: &str) -> Reply {
        match self.try_delete(id_token) {
            Ok(bytes) => Reply::raw(StatusCode::OK, bytes),
            Err(Error::NotFound) => Reply::message(StatusCode::NOT_FOUND, "error", ID_NOT_FOUND),
            Err(e) => {
                tracing::warn!(error = %e, id = id_token, "failed to delete");
                let status = self.failure_status(&e, StatusCode::INTERNAL_SERVER_ERROR);
                Reply::message(status, "error", "Failed to delete")
            }
        }
    }

    // ---- internal ----

    fn try_create(&self, body: &[u8]) -> Result<Vec<u8>> {
        let mut record = parse_object(body)?;
        let _turn = self.gate.enter();
        let mut records = self.store.load()?;
        let id = next_id(&records);
        record.insert(ID_FIELD.to_owned(), json!(id));
        records.push(record);
        self.store.save(&records)?;
        tracing::info!(id, total = records.len(), "record created");
        encode(&records)
    }

    fn try_update(&self, body: &[u8]) -> Result<Vec<u8>> {
        let incoming = parse_object(body)?;
        let _turn = self.gate.enter();
        let mut records = self.store.load()?;
        let wanted = incoming.get(ID_FIELD);
        let index = records
            .iter()
            .position(|r| strict_id_eq(r.get(ID_FIELD), wanted))
            .ok_or(Error::NotFound)?;
        records[index] = shallow_merge(&records[index], &incoming);
        self.store.save(&records)?;
        tracing::info!(index, "record updated");
        encode(&records)
    }

    fn try_delete(&self, id_token: &str) -> Result<Vec<u8>> {
        let _turn = self.gate.enter();
        let mut records = self.store.load()?;
        let index = records
            .iter()
            .position(|r| loose_id_eq(r.get(ID_FIELD), id_token))
            .ok_or(Error::NotFound)?;
        records.remove(index);
        self.store.save(&records)?;
        tracing::info!(id = id_token, total = records.len(), "record deleted");
        encode(&records)
    }

    fn failure_status(&self, err: &Error, compatible: StatusCode) -> StatusCode {
        match self.policy {
            StatusPolicy::Compatible => compatible,
            StatusPolicy::Normalized if err.is_store() => StatusCode::INTERNAL_SERVER_ERROR,
            StatusPolicy::Normalized => StatusCode::BAD_REQUEST,
        }
    }
}

impl<S> std::fmt::Debug for Items<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Items")
            .field("gate", &self.gate)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn parse_object(body: &[u8]) -> Result<Record> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err(Error::BadRequest("body is not a JSON object".into())),
        Err(e) => Err(Error::BadRequest(e.to_string())),
    }
}

// Responses are always compact, whatever the store's on-disk layout.
fn encode(records: &[Record]) -> Result<Vec<u8>> {
    serde_json::to_vec(records).map_err(|e| Error::StoreCorrupt(e.to_string()))
}
