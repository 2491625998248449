use super::{NameResolver, ScopedBinding};
use crate::core::errors::VhostError;
use anyhow::{Context, Result};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Overrides resolution through a shared hosts file.
///
/// Every bind rewrites the file as the original content plus a single
/// `IP hostname` line. The rewrite itself is serialized, but a request may
/// still resolve through a newer binding written by a concurrent probe.
#[derive(Debug)]
pub struct HostsFileResolver {
    path: PathBuf,
    backup: PathBuf,
    original: String,
    write_lock: Mutex<()>,
    restored: AtomicBool,
}

impl HostsFileResolver {
    /// Back up `path` to `path.<suffix>` before any mutation.
    pub fn prepare(path: impl Into<PathBuf>, backup_suffix: &str) -> Result<Self, VhostError> {
        let path = path.into();
        if !path.is_file() {
            return Err(VhostError::Environment(format!(
                "hosts file not found: {}",
                path.display()
            )));
        }

        let backup = backup_path(&path, backup_suffix);
        let original = fs::read_to_string(&path).map_err(|e| {
            VhostError::Environment(format!("cannot read {}: {}", path.display(), e))
        })?;
        fs::copy(&path, &backup).map_err(|e| {
            VhostError::Environment(format!(
                "cannot back up {} to {}: {}",
                path.display(),
                backup.display(),
                e
            ))
        })?;
        tracing::info!("Backed up {} to {}", path.display(), backup.display());

        Ok(Self {
            path,
            backup,
            original,
            write_lock: Mutex::new(()),
            restored: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Put the original file back and delete the backup.
    ///
    /// Safe to call any number of times from any exit path. Returns `true`
    /// only for the call that actually restored.
    pub fn restore(&self) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if self.restored.swap(true, Ordering::SeqCst) {
            tracing::debug!("Hosts file already restored");
            return Ok(false);
        }

        if !self.backup.exists() {
            tracing::warn!("Backup {} is gone, nothing to restore", self.backup.display());
            return Ok(false);
        }

        fs::copy(&self.backup, &self.path).with_context(|| {
            format!(
                "Failed to restore {} from {}",
                self.path.display(),
                self.backup.display()
            )
        })?;
        fs::remove_file(&self.backup)
            .with_context(|| format!("Failed to remove backup {}", self.backup.display()))?;

        tracing::info!("Restored {}", self.path.display());
        Ok(true)
    }

    pub fn is_restored(&self) -> bool {
        self.restored.load(Ordering::SeqCst)
    }
}

impl NameResolver for HostsFileResolver {
    fn name(&self) -> &'static str {
        "hosts-file"
    }

    fn bind(&self, hostname: &str, addr: SocketAddr) -> Result<ScopedBinding> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if self.restored.load(Ordering::SeqCst) {
            anyhow::bail!("hosts file {} was already restored", self.path.display());
        }

        let mut content = self.original.clone();
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&format!("{} {}\n", addr.ip(), hostname));

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        Ok(ScopedBinding::system(hostname))
    }
}

impl Drop for HostsFileResolver {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::error!("{:#}", e);
        }
    }
}

fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix.trim_start_matches('.'));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ORIGINAL: &str = "127.0.0.1 localhost\n::1 localhost\n";

    fn hosts(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("hosts");
        fs::write(&path, ORIGINAL).unwrap();
        path
    }

    fn addr() -> SocketAddr {
        "10.0.0.5:80".parse().unwrap()
    }

    #[test]
    fn test_prepare_creates_backup() {
        let dir = TempDir::new().unwrap();
        let path = hosts(&dir);
        let resolver = HostsFileResolver::prepare(&path, "bak").unwrap();

        assert_eq!(resolver.backup_path(), dir.path().join("hosts.bak"));
        assert_eq!(fs::read_to_string(resolver.backup_path()).unwrap(), ORIGINAL);
    }

    #[test]
    fn test_missing_hosts_file() {
        let dir = TempDir::new().unwrap();
        let err = HostsFileResolver::prepare(dir.path().join("hosts"), "bak").unwrap_err();
        assert!(matches!(err, VhostError::Environment(_)));
    }

    #[test]
    fn test_bind_replaces_previous_binding() {
        let dir = TempDir::new().unwrap();
        let path = hosts(&dir);
        let resolver = HostsFileResolver::prepare(&path, "bak").unwrap();

        let first = resolver.bind("admin.example.com", addr()).unwrap();
        assert_eq!(first.pinned_addr(), None);
        let _second = resolver.bind("www.example.com", addr()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}10.0.0.5 www.example.com\n", ORIGINAL));
    }

    #[test]
    fn test_restore_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = hosts(&dir);
        let resolver = HostsFileResolver::prepare(&path, "bak").unwrap();
        resolver.bind("admin.example.com", addr()).unwrap();

        assert!(resolver.restore().unwrap());
        assert!(!resolver.restore().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), ORIGINAL);
        assert!(!resolver.backup_path().exists());
        assert!(resolver.is_restored());
    }

    #[test]
    fn test_restore_without_backup() {
        let dir = TempDir::new().unwrap();
        let path = hosts(&dir);
        let resolver = HostsFileResolver::prepare(&path, "bak").unwrap();
        fs::remove_file(resolver.backup_path()).unwrap();

        assert!(!resolver.restore().unwrap());
        assert!(!resolver.restore().unwrap());
    }

    #[test]
    fn test_bind_after_restore_fails() {
        let dir = TempDir::new().unwrap();
        let path = hosts(&dir);
        let resolver = HostsFileResolver::prepare(&path, "bak").unwrap();
        resolver.restore().unwrap();

        assert!(resolver.bind("admin.example.com", addr()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), ORIGINAL);
    }

    #[test]
    fn test_drop_restores() {
        let dir = TempDir::new().unwrap();
        let path = hosts(&dir);
        {
            let resolver = HostsFileResolver::prepare(&path, ".bak").unwrap();
            resolver.bind("admin.example.com", addr()).unwrap();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), ORIGINAL);
        assert!(!dir.path().join("hosts.bak").exists());
    }
}
