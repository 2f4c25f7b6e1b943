//! Flag/environment configuration.
//!
//! Every setting can come from a command line flag or an environment variable,
//! with the flag winning. Fallback forwarding is enabled iff a syntactically
//! valid upstream address was supplied; see [`Config::fallback_addr`].

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

/// Default port for an upstream resolver given without one.
const DEFAULT_UPSTREAM_PORT: u16 = 53;

pub type Shared = Arc<Config>;

#[derive(Parser, Debug, Clone)]
#[command(name = "masqdns")]
#[command(about = "Authoritative DNS for a local domain table, with upstream fallback")]
pub struct Config {
    /// Hostname self-registered against this machine's address at startup.
    #[arg(long = "name", env = "DNS_NAME", default_value = "dns.example.com")]
    pub hostname: String,

    /// UDP port the DNS listener binds.
    #[arg(long, env = "DNS_PORT", default_value_t = 2053)]
    pub dns_port: u16,

    /// TCP port the HTTP admin API binds.
    #[arg(long, env = "HTTP_PORT", default_value_t = 2080)]
    pub http_port: u16,

    /// Enable debug logging.
    #[arg(long, env = "DEBUG")]
    pub debug: bool,

    /// Upstream resolver as `ip` or `ip:port` (port defaults to 53). Queries
    /// that miss the local table are forwarded here; when unset or unparseable,
    /// misses answer SERVFAIL instead.
    #[arg(long, env = "FALLBACK_ADDR")]
    pub fallback: Option<String>,

    /// Upper bound on a single upstream exchange, in seconds.
    #[arg(long = "fallback-timeout", default_value_t = 5)]
    pub fallback_timeout_secs: u64,

    /// Upper bound on concurrently in-flight forwarded queries.
    #[arg(long, default_value_t = 128)]
    pub max_in_flight: usize,
}

impl Config {
    /// The validated upstream resolver address, or `None` when fallback
    /// forwarding is disabled.
    ///
    /// A value without a port gets [`DEFAULT_UPSTREAM_PORT`]. A value that
    /// parses as neither `ip:port` nor `ip` disables fallback with a warning
    /// rather than failing startup.
    pub fn fallback_addr(&self) -> Option<SocketAddr> {
        let raw = self.fallback.as_deref()?;
        if let Ok(addr) = raw.parse::<SocketAddr>() {
            return Some(addr);
        }
        if let Ok(ip) = raw.parse::<IpAddr>() {
            return Some(SocketAddr::new(ip, DEFAULT_UPSTREAM_PORT));
        }
        tracing::warn!("ignoring unparseable fallback address \"{raw}\"; fallback disabled");
        None
    }

    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_secs(self.fallback_timeout_secs)
    }

    pub fn dns_bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.dns_port)
    }

    pub fn api_bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.http_port)
    }
}
