//! Service configuration.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → CLI flags override individual fields in main.rs
//! ```
//!
//! Every field has a default, so running without a file is fine.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    LimitsConfig, ListenerConfig, ObservabilityConfig, ResponsesConfig, ServiceConfig, StoreConfig,
};
pub use validation::{validate_config, ValidationError};
