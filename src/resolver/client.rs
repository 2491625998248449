use super::{NameResolver, ScopedBinding};
use anyhow::Result;
use std::net::SocketAddr;

/// Per-request override: each binding lives only in the client built from it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientResolver;

impl NameResolver for ClientResolver {
    fn name(&self) -> &'static str {
        "per-request"
    }

    fn bind(&self, hostname: &str, addr: SocketAddr) -> Result<ScopedBinding> {
        Ok(ScopedBinding::pinned(hostname, addr))
    }
}
