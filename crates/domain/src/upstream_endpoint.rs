use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

const DEFAULT_DNS_PORT: u16 = 53;
const DEFAULT_TLS_PORT: u16 = 853;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointProtocol {
    Udp,
    Tcp,
    Tls,
}

impl EndpointProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointProtocol::Udp => "udp",
            EndpointProtocol::Tcp => "tcp",
            EndpointProtocol::Tls => "tls",
        }
    }

    fn default_port(&self) -> u16 {
        match self {
            EndpointProtocol::Tls => DEFAULT_TLS_PORT,
            _ => DEFAULT_DNS_PORT,
        }
    }
}

/// A single resolver inside an upstream group.
///
/// Accepted forms: `1.2.3.4`, `1.2.3.4:5353`, `[2001:db8::1]:53`, `2001:db8::1`,
/// optionally prefixed with `udp://`, `dns://`, `tcp://` or `tls://`.
///
/// TLS endpoints default to port 853 and may name the certificate to verify
/// with a `#` suffix: `tls://1.1.1.1#cloudflare-dns.com`. Without one the
/// certificate must carry the IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamEndpoint {
    pub protocol: EndpointProtocol,
    pub addr: SocketAddr,
    pub server_name: Option<String>,
}

impl UpstreamEndpoint {
    pub fn udp(addr: SocketAddr) -> Self {
        Self {
            protocol: EndpointProtocol::Udp,
            addr,
            server_name: None,
        }
    }

    pub fn tcp(addr: SocketAddr) -> Self {
        Self {
            protocol: EndpointProtocol::Tcp,
            addr,
            server_name: None,
        }
    }

    pub fn tls(addr: SocketAddr, server_name: Option<&str>) -> Self {
        Self {
            protocol: EndpointProtocol::Tls,
            addr,
            server_name: server_name.map(str::to_string),
        }
    }
}

impl fmt::Display for UpstreamEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol.as_str(), self.addr)?;
        if let Some(name) = &self.server_name {
            write!(f, "#{}", name)?;
        }
        Ok(())
    }
}

impl FromStr for UpstreamEndpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (protocol, rest) = match s.split_once("://") {
            Some((scheme, rest)) => {
                let protocol = match scheme.to_ascii_lowercase().as_str() {
                    "udp" | "dns" => EndpointProtocol::Udp,
                    "tcp" => EndpointProtocol::Tcp,
                    "tls" => EndpointProtocol::Tls,
                    other => {
                        return Err(DomainError::InvalidEndpoint(format!(
                            "'{}' is not a supported upstream protocol: {}",
                            other, s
                        )))
                    }
                };
                (protocol, rest)
            }
            None => (EndpointProtocol::Udp, s),
        };

        let (rest, server_name) = match rest.split_once('#') {
            Some(_) if protocol != EndpointProtocol::Tls => {
                return Err(DomainError::InvalidEndpoint(format!(
                    "server name is only allowed for tls:// upstreams: {}",
                    s
                )))
            }
            Some((rest, name)) if is_valid_server_name(name) => (rest, Some(name)),
            Some((_, name)) => {
                return Err(DomainError::InvalidEndpoint(format!(
                    "invalid TLS server name '{}': {}",
                    name, s
                )))
            }
            None => (rest, None),
        };

        if rest.is_empty() {
            return Err(DomainError::InvalidEndpoint(format!(
                "missing address: '{}'",
                s
            )));
        }

        let addr = match rest.parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(_) => {
                let host = rest.trim_start_matches('[').trim_end_matches(']');
                let ip = host.parse::<IpAddr>().map_err(|_| {
                    DomainError::InvalidEndpoint(format!("'{}' is not an IP address", rest))
                })?;
                SocketAddr::new(ip, protocol.default_port())
            }
        };

        Ok(Self {
            protocol,
            addr,
            server_name: server_name.map(|n| n.to_ascii_lowercase()),
        })
    }
}

fn is_valid_server_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 253
        && name.split('.').all(|label| {
            !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
