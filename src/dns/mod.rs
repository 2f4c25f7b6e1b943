//! The DNS surface: listener, resolution engine, and fallback forwarder.
//!
//! # Local resolution
//!
//! masqdns answers `A` queries authoritatively for every name in the
//! [domain table][crate::registry], with a fixed 60 second TTL. Names reach
//! the table from [startup self-registration][crate::bootstrap] and from the
//! [HTTP admin API][crate::api].
//!
//! E.g. after:
//!
//! ```bash
//! ❯ curl --json '{"service.local.": "10.0.0.5"}' http://localhost:2080/api
//! ```
//!
//! An `A` query for `service.local` returns:
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 2053 +short service.local A
//! 10.0.0.5
//! ```
//!
//! Lookups are exact: the trailing dot is stripped, but case is preserved, so
//! `Service.local` is a different key than `service.local`.
//!
//! # Fallback forwarding
//!
//! Any query that misses the table (including non-`A` types) is forwarded to
//! the upstream resolver named by `--fallback`, one round trip per query, and
//! the upstream's answer section is relayed back under the original request's
//! transaction id. Without a configured fallback, misses answer SERVFAIL.

pub mod forwarder;
pub mod handlers;
pub mod server;

pub use server::new;
