use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Candidate subdomains read from a wordlist file.
#[derive(Debug, Clone)]
pub struct Wordlist {
    pub path: PathBuf,
    pub candidates: Vec<String>,
}

impl Wordlist {
    /// Resolve a wordlist name or path to an actual file path.
    /// A direct file path wins over a configured name.
    pub fn resolve(name_or_path: &str, named: &HashMap<String, PathBuf>) -> Result<PathBuf> {
        let path = Path::new(name_or_path);
        if path.is_file() {
            return Ok(path.to_path_buf());
        }

        match named.get(name_or_path) {
            Some(configured) if configured.is_file() => Ok(configured.clone()),
            Some(configured) => anyhow::bail!(
                "Wordlist '{}' points to non-existent file: {}",
                name_or_path,
                configured.display()
            ),
            None => anyhow::bail!("Wordlist file not found: {}", name_or_path),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        // Lossy decode: large public wordlists are not always clean UTF-8.
        let raw = fs::read(path)
            .with_context(|| format!("Failed to read wordlist: {}", path.display()))?;
        let candidates = Self::parse(&String::from_utf8_lossy(&raw));
        tracing::debug!("Loaded {} candidates from {}", candidates.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            candidates,
        })
    }

    /// Trimmed, non-blank lines in file order. Duplicates are kept.
    pub fn parse(content: &str) -> Vec<String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
