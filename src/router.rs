//! Route lookup and dispatch.
//!
//! Routing is pure: it looks at the method and the raw request target only
//! and never touches the store. Matching is literal on the target text, so
//! `GET /items?x=1` is not a read, while any `DELETE /items…` is a delete.

use crate::handlers::{Items, Reply};
use crate::store::RecordStore;
use axum::body::Bytes;
use axum::http::Method;

/// Path of the one collection.
pub const COLLECTION_PATH: &str = "/items";

/// Marker in front of the id in a delete target.
const ID_MARKER: &str = "?id=";

/// A fully buffered request, as handed over by the transport.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Raw request target: path plus query, exactly as received.
    pub target: String,
    /// Complete body.
    pub body: Bytes,
}

impl Request {
    /// Build a request.
    pub fn new(method: Method, target: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            target: target.into(),
            body: body.into(),
        }
    }
}

/// Outcome of route lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /items`
    Read,
    /// `POST /items`
    Create,
    /// `PUT /items`
    Update,
    /// `DELETE /items…`, carrying the raw id text.
    Delete {
        /// Text after the last `?id=`, or the whole target without one.
        id_token: String,
    },
    /// Nothing matched.
    NotFound,
}

/// Look up the route for `method` + `target`.
#[must_use]
pub fn route(method: &Method, target: &str) -> Route {
    let exact = target == COLLECTION_PATH;
    if exact && *method == Method::GET {
        Route::Read
    } else if exact && *method == Method::POST {
        Route::Create
    } else if exact && *method == Method::PUT {
        Route::Update
    } else if *method == Method::DELETE && target.starts_with(COLLECTION_PATH) {
        Route::Delete {
            id_token: id_token(target).to_owned(),
        }
    } else {
        Route::NotFound
    }
}

/// Text after the last `?id=` marker. Without a marker the whole target
/// comes back, which then matches no record.
#[must_use]
pub fn id_token(target: &str) -> &str {
    target.rsplit(ID_MARKER).next().unwrap_or(target)
}

/// Route `request` and run the matching handler.
pub fn dispatch<S: RecordStore>(items: &Items<S>, request: &Request) -> Reply {
    let route = route(&request.method, &request.target);
    tracing::debug!(method = %request.method, target = %request.target, ?route, "dispatching");
    match route {
        Route::Read => items.read(),
        Route::Create => items.create(&request.body),
        Route::Update => items.update(&request.body),
        Route::Delete { id_token } => items.delete(&id_token),
        Route::NotFound => Reply::not_found(),
    }
}
