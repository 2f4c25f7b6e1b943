//! HTTP API for administering the domain table.
//!
//! # API Endpoints
//!
//! ## `/healthcheck` (GET)
//!
//!   Returns HTTP 200 (OK) and the JSON body `{"ok":"healthy"}` when the
//!   service is operational.
//!
//! ## `/api` (GET)
//!
//!   Returns the current table as a JSON object of name → address pairs:
//!
//!   ```json
//!   { "dns.example.com": "192.168.1.15", "service.local": "10.0.0.5" }
//!   ```
//!
//! ## `/api` (POST)
//!
//!   Adds or overwrites entries. Expects a JSON object of name → address
//!   pairs; names are stored with a trailing dot stripped. Returns HTTP 201
//!   (Created). Addresses are accepted as given and not validated.
//!
//!   ```bash
//!   ❯ curl --json '{"service.local.": "10.0.0.5"}' http://localhost:2080/api
//!   ```
//!
//! ## `/api` (PATCH)
//!
//!   Updates existing entries only, in document order. The first name with no
//!   entry stops the batch and returns HTTP 404 (Not Found); entries earlier
//!   in the same batch stay updated. This partial-application behavior is a
//!   documented contract.
//!
//! ## `/api` (DELETE)
//!
//!   Removes entries by `domain` and/or `address` query parameter, with OR
//!   semantics: every entry whose name equals `domain` or whose value equals
//!   `address` is removed. Always returns HTTP 200, even when nothing matched.
//!
//!   ```bash
//!   ❯ curl -X DELETE 'http://localhost:2080/api?address=10.0.0.5'
//!   ```

mod api_error;
mod model;
mod routes;
pub mod server;

pub use server::{new, serve};
