//! Tiny HTTP CRUD service over one collection of JSON records kept in a
//! single flat file.
//!
//! The file holds a JSON array of objects, each with an integer `id`. Every
//! request reloads the file, mutates the array, and writes it back; there is
//! no cache. Pick an [`AccessMode`] to decide whether concurrent requests take
//! turns on the file (the default) or race.
//!
//! ```rust,no_run
//! use axum::http::Method;
//! use json_items::{dispatch, FileStore, Items, Request};
//!
//! let items = Items::new(FileStore::open("items.json").unwrap());
//! let reply = dispatch(&items, &Request::new(Method::POST, "/items", r#"{"name":"widget"}"#));
//! assert_eq!(reply.status.as_u16(), 201);
//! ```
//!
//! **Single-process only.** The access gate lives in memory. If multiple
//! processes serve the same file they will clobber each other.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod access;
pub mod config;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod persist;
pub mod record;
pub mod router;
pub mod serializer;
pub mod server;
pub mod store;

pub use access::AccessMode;
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use handlers::{Items, Reply, StatusPolicy};
pub use memory::MemoryStore;
pub use record::Record;
pub use router::{dispatch, route, Request, Route};
pub use server::HttpServer;
pub use store::{next_id, FileStore, FileStoreBuilder, RecordStore};
