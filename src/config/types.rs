use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub concurrency: ConcurrencyConfig,
    pub http: HttpConfig,
    pub filter: FilterConfig,
    pub hosts: HostsConfig,
    /// Named wordlists, e.g. `common = "/usr/share/seclists/.../subdomains-top1million-5000.txt"`
    pub wordlists: HashMap<String, PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub max_workers: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { max_workers: 20 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Vhost targets routinely serve self-signed or mismatched certificates.
    pub accept_invalid_certs: bool,
    pub follow_redirects: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("vhostcrawler/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_invalid_certs: true,
            follow_redirects: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Responses with these status codes are treated as "not served".
    pub ignored_status: Vec<u16>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignored_status: vec![404, 500],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostsConfig {
    pub path: PathBuf,
    pub backup_suffix: String,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/etc/hosts"),
            backup_suffix: "bak".to_string(),
        }
    }
}
