//! Name resolution overrides.
//!
//! A probe asks a [`NameResolver`] to make `hostname` resolve to the target
//! for the lifetime of one request. [`ClientResolver`] does this inside the
//! request's own HTTP client, so concurrent probes never see each other's
//! bindings. [`HostsFileResolver`] rewrites a shared hosts file instead and
//! is racy under concurrency.

mod client;
mod hosts_file;

pub use client::ClientResolver;
pub use hosts_file::HostsFileResolver;

use crate::config::HttpConfig;
use anyhow::Result;
use reqwest::{Client, redirect};
use std::net::SocketAddr;
use std::time::Duration;

pub trait NameResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Make `hostname` resolve to `addr` until the returned binding drops.
    fn bind(&self, hostname: &str, addr: SocketAddr) -> Result<ScopedBinding>;
}

/// A live hostname binding. Builds the client that must carry the request.
#[derive(Debug)]
pub struct ScopedBinding {
    hostname: String,
    pinned: Option<SocketAddr>,
}

impl ScopedBinding {
    /// Binding carried by the client itself.
    pub fn pinned(hostname: impl Into<String>, addr: SocketAddr) -> Self {
        Self {
            hostname: hostname.into(),
            pinned: Some(addr),
        }
    }

    /// Binding installed in the system resolver; the client resolves normally.
    pub fn system(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            pinned: None,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn pinned_addr(&self) -> Option<SocketAddr> {
        self.pinned
    }

    pub fn client(&self, http: &HttpConfig) -> reqwest::Result<Client> {
        let redirects = if http.follow_redirects {
            redirect::Policy::limited(5)
        } else {
            redirect::Policy::none()
        };

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .danger_accept_invalid_certs(http.accept_invalid_certs)
            .user_agent(http.user_agent.as_str())
            .redirect(redirects)
            .pool_max_idle_per_host(0);

        if let Some(addr) = self.pinned {
            builder = builder.resolve(&self.hostname, addr);
        }

        builder.build()
    }
}

impl Drop for ScopedBinding {
    fn drop(&mut self) {
        tracing::trace!("Released binding for {}", self.hostname);
    }
}
