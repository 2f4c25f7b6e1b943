//! masqdns
//!
//! A local name-resolution service. It answers `A` queries authoritatively for
//! an operator-managed table of domain names and forwards everything else to a
//! configured upstream resolver, so a host can masquerade as authoritative for
//! private or development names while staying a normal client of public DNS.
//!
//! The table lives in memory behind one reader-writer lock. It is seeded at
//! startup with this machine's own address under the configured hostname and
//! mutated at runtime through an [HTTP admin API][crate::api].
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod dns;
pub mod error;
pub mod registry;

pub use api::new as new_http;
pub use config::{Config, Shared};
pub use dns::new as new_dns;
pub use registry::{DomainRegistry, SharedRegistry};
