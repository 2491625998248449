use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// What we are probing. Immutable for the whole run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub ip: Ipv4Addr,
    pub domain: String,
    pub protocol: Protocol,
    pub port: Option<u16>, // None = scheme default
}

impl Target {
    pub fn new(ip: Ipv4Addr, domain: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            ip,
            domain: domain.into(),
            protocol,
            port: None,
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.protocol.default_port())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.ip, self.port()))
    }

    /// `admin` -> `admin.example.com`
    pub fn host_for(&self, candidate: &str) -> String {
        format!("{}.{}", candidate, self.domain)
    }

    pub fn url_for(&self, host: &str) -> String {
        match self.port {
            Some(port) if port != self.protocol.default_port() => {
                format!("{}://{}:{}/", self.protocol.scheme(), host, port)
            }
            _ => format!("{}://{}/", self.protocol.scheme(), host),
        }
    }
}

/// Reference response shape of the bare domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    pub char_count: usize,
    pub word_count: usize,
}

impl Baseline {
    pub fn from_body(body: &str) -> Self {
        Self {
            char_count: body.chars().count(),
            word_count: word_count(body),
        }
    }
}

pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub candidate: String,
    pub url: String,
    pub status_code: u16,
    pub word_count: usize,
}

/// Discovered virtual hosts, in completion order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub discoveries: Vec<ProbeOutcome>,
    pub processed: usize,
    pub total: usize,
}

impl DiscoveryReport {
    pub fn len(&self) -> usize {
        self.discoveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discoveries.is_empty()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.discoveries.iter().map(|d| d.url.as_str()).collect()
    }
}
