//! Service layer providing the file CRUD operations behind the HTTP endpoints.
//! - `storage` holds the byte store boundary and its implementations.
//! - `services` holds the generic and JSON file services built on top of it.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod services;
