//! DNS resolution as an alternative lookup source.
//!
//! An IP literal is reverse-resolved (PTR) into `hostname`; anything else is forward-resolved
//! (A/AAAA) into `ip`. Failures of any kind are "no result".
//!
//! The resolver is either the system one or an explicit server queried over UDP. The choice is
//! made once, when the [`DnsResolver`] is built; nothing is read from global state afterwards.

use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use hickory_resolver::Resolver;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use tracing::debug;

use crate::error::{LookupError, LookupResult};
use crate::types::ResolutionResult;

/// Port appended to `--dns-server` endpoints given without one.
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Name service backend used by [`DnsResolver`].
///
/// Both methods return the first answer, or `None` on any failure.
pub trait NameService {
    /// Forward lookup (A/AAAA).
    fn lookup_ip(&self, host: &str) -> Option<IpAddr>;

    /// Reverse lookup (PTR). The returned name may carry a trailing root dot.
    fn reverse_lookup(&self, addr: IpAddr) -> Option<String>;
}

/// [`NameService`] backed by the hickory synchronous resolver.
pub struct HickoryNameService {
    resolver: Resolver,
}

impl HickoryNameService {
    /// Use the system resolver configuration (`/etc/resolv.conf` and hosts file).
    pub fn system() -> LookupResult<Self> {
        let (config, opts) = hickory_resolver::system_conf::read_system_conf().map_err(|e| LookupError::Resolver {
            message: format!("reading system resolver config: {e}"),
        })?;
        Self::build(config, opts)
    }

    /// Query only `server`, over UDP.
    pub fn with_server(server: SocketAddr) -> LookupResult<Self> {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(server, Protocol::Udp));
        Self::build(config, ResolverOpts::default())
    }

    fn build(config: ResolverConfig, mut opts: ResolverOpts) -> LookupResult<Self> {
        // One attempt per record, nothing carried across records.
        opts.attempts = 1;
        opts.cache_size = 0;
        let resolver = Resolver::new(config, opts).map_err(|e| LookupError::Resolver {
            message: e.to_string(),
        })?;
        Ok(Self { resolver })
    }
}

impl fmt::Debug for HickoryNameService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HickoryNameService").finish_non_exhaustive()
    }
}

impl NameService for HickoryNameService {
    fn lookup_ip(&self, host: &str) -> Option<IpAddr> {
        match self.resolver.lookup_ip(host) {
            Ok(answer) => answer.iter().next(),
            Err(e) => {
                debug!(host = %host, error = %e, "forward lookup failed");
                None
            }
        }
    }

    fn reverse_lookup(&self, addr: IpAddr) -> Option<String> {
        match self.resolver.reverse_lookup(addr) {
            Ok(answer) => answer.iter().next().map(|name| name.to_string()),
            Err(e) => {
                debug!(addr = %addr, error = %e, "reverse lookup failed");
                None
            }
        }
    }
}

/// Turn a `--dns-server` value into a socket address.
///
/// Accepts `ip`, `ip:port`, `[v6]`, `[v6]:port`, a bare IPv6 literal, `host` and `host:port`.
/// Endpoints without a port get [`DEFAULT_DNS_PORT`]. Hostnames are resolved here, once.
pub fn parse_server_addr(server: &str) -> LookupResult<SocketAddr> {
    let server = server.trim();
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let unbracketed = server
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(server);
    if let Ok(ip) = unbracketed.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_DNS_PORT));
    }

    let invalid = |message: String| LookupError::DnsServer {
        server: server.to_string(),
        message,
    };

    let mut addrs = if server.contains(':') {
        server.to_socket_addrs()
    } else {
        (server, DEFAULT_DNS_PORT).to_socket_addrs()
    }
    .map_err(|e| invalid(e.to_string()))?;

    addrs
        .next()
        .ok_or_else(|| invalid("endpoint resolved to no addresses".to_string()))
}

/// DNS lookup source for the enrichment pipeline.
pub struct DnsResolver {
    service: Box<dyn NameService>,
}

impl DnsResolver {
    /// Build a resolver for `server`; an empty string selects the system resolver.
    pub fn new(server: &str) -> LookupResult<Self> {
        let service = if server.trim().is_empty() {
            HickoryNameService::system()?
        } else {
            HickoryNameService::with_server(parse_server_addr(server)?)?
        };
        Ok(Self::with_service(service))
    }

    /// Build a resolver on top of an arbitrary name service.
    pub fn with_service(service: impl NameService + 'static) -> Self {
        Self {
            service: Box::new(service),
        }
    }

    /// Resolve `value`: reverse for IP literals, forward otherwise.
    pub fn resolve(&self, value: &str) -> Option<ResolutionResult> {
        match value.parse::<IpAddr>() {
            Ok(addr) => self.service.reverse_lookup(addr).map(|name| {
                let name = name.strip_suffix('.').map(str::to_owned).unwrap_or(name);
                ResolutionResult::Hostname(name)
            }),
            Err(_) => self.service.lookup_ip(value).map(ResolutionResult::Ip),
        }
    }
}

impl fmt::Debug for DnsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    struct FixedService;

    impl NameService for FixedService {
        fn lookup_ip(&self, host: &str) -> Option<IpAddr> {
            (host == "dns.google").then(|| IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)))
        }

        fn reverse_lookup(&self, addr: IpAddr) -> Option<String> {
            match addr {
                IpAddr::V4(v4) if v4 == Ipv4Addr::new(8, 8, 8, 8) => Some("dns.google.".to_string()),
                IpAddr::V4(v4) if v4 == Ipv4Addr::new(1, 1, 1, 1) => Some("one.one.one.one".to_string()),
                _ => None,
            }
        }
    }

    #[test]
    fn ip_literal_is_reverse_resolved_without_root_dot() {
        let r = DnsResolver::with_service(FixedService);
        assert_eq!(r.resolve("8.8.8.8"), Some(ResolutionResult::Hostname("dns.google".to_string())));
        assert_eq!(
            r.resolve("1.1.1.1"),
            Some(ResolutionResult::Hostname("one.one.one.one".to_string()))
        );
    }

    #[test]
    fn hostname_is_forward_resolved() {
        let r = DnsResolver::with_service(FixedService);
        let res = r.resolve("dns.google").unwrap();
        assert_eq!(res.key(), "ip");
        assert_eq!(res.value(), "8.8.8.8");
    }

    #[test]
    fn failures_are_no_result() {
        let r = DnsResolver::with_service(FixedService);
        assert_eq!(r.resolve("9.9.9.9"), None);
        assert_eq!(r.resolve("nonexistent.invalid"), None);
    }

    #[test]
    fn server_without_port_gets_default_port() {
        assert_eq!(parse_server_addr("8.8.8.8").unwrap(), "8.8.8.8:53".parse().unwrap());
        assert_eq!(parse_server_addr("8.8.4.4:5353").unwrap(), "8.8.4.4:5353".parse().unwrap());
        assert_eq!(parse_server_addr("2001:4860::8888").unwrap(), "[2001:4860::8888]:53".parse().unwrap());
        assert_eq!(parse_server_addr("[::1]").unwrap(), "[::1]:53".parse().unwrap());
        assert_eq!(parse_server_addr("[::1]:5300").unwrap(), "[::1]:5300".parse().unwrap());
        assert_eq!(parse_server_addr("localhost:5300").unwrap().port(), 5300);
    }

    #[test]
    fn unusable_server_is_an_error() {
        let err = parse_server_addr("not a server:xx").unwrap_err();
        assert!(matches!(err, LookupError::DnsServer { .. }));
    }
}
