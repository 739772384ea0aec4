//! Configuration schema definitions.

use crate::access::AccessMode;
use crate::handlers::StatusPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Where to listen.
    pub listener: ListenerConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Backing file and how it's accessed.
    pub store: StoreConfig,

    /// Status code policy.
    pub responses: ResponsesConfig,

    /// Logging.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest request body the transport will buffer.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Backing store.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON array file.
    pub path: PathBuf,

    /// Indent the file on disk.
    pub pretty: bool,

    /// Write through temp file + rename.
    pub atomic_writes: bool,

    /// Seed a missing file with `[]` at startup.
    pub create_if_missing: bool,

    /// Whether handlers take turns on the store.
    pub access: AccessMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("items.json"),
            pretty: false,
            atomic_writes: true,
            create_if_missing: true,
            access: AccessMode::Serialized,
        }
    }
}

/// Response shaping.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResponsesConfig {
    /// How failures map to status codes.
    pub status_policy: StatusPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "json_items=info,tower_http=info".to_string(),
        }
    }
}
