//! Saved packages with an optional note.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPackage {
    pub package_id: String,
    pub network: String,
    pub module_count: usize,
    pub function_count: usize,
    pub struct_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub saved_at: DateTime<Utc>,
}

/// Where saved packages live. Saving an already saved package replaces it.
pub trait FavoritesStore: Send + Sync {
    fn save(&self, package: SavedPackage) -> Result<()>;

    /// Returns whether anything was removed.
    fn remove(&self, package_id: &str) -> Result<bool>;

    /// Most recently saved first.
    fn list(&self) -> Result<Vec<SavedPackage>>;

    fn contains(&self, package_id: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|p| p.package_id == package_id))
    }

    /// Ids saved for `network`.
    fn ids_for_network(&self, network: &str) -> Result<HashSet<String>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| p.network == network)
            .map(|p| p.package_id)
            .collect())
    }
}

fn upsert(saved: &mut Vec<SavedPackage>, package: SavedPackage) {
    saved.retain(|p| p.package_id != package.package_id);
    saved.push(package);
}

fn newest_first(mut saved: Vec<SavedPackage>) -> Vec<SavedPackage> {
    saved.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
    saved
}

#[derive(Debug, Default)]
pub struct InMemoryFavorites {
    saved: Mutex<Vec<SavedPackage>>,
}

impl InMemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesStore for InMemoryFavorites {
    fn save(&self, package: SavedPackage) -> Result<()> {
        upsert(&mut self.saved.lock(), package);
        Ok(())
    }

    fn remove(&self, package_id: &str) -> Result<bool> {
        let mut saved = self.saved.lock();
        let before = saved.len();
        saved.retain(|p| p.package_id != package_id);
        Ok(saved.len() != before)
    }

    fn list(&self) -> Result<Vec<SavedPackage>> {
        Ok(newest_first(self.saved.lock().clone()))
    }
}

/// Pretty-printed JSON array on disk, rewritten whole on every change.
#[derive(Debug)]
pub struct JsonFileFavorites {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileFavorites {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<SavedPackage>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read favorites {}", self.path.display()))?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse favorites {}", self.path.display()))
    }

    fn store(&self, saved: &[SavedPackage]) -> Result<()> {
        let json = serde_json::to_vec_pretty(saved).context("Failed to serialize favorites")?;
        atomic_write(&self.path, &json)?;
        debug!(path = %self.path.display(), count = saved.len(), "favorites written");
        Ok(())
    }
}

impl FavoritesStore for JsonFileFavorites {
    fn save(&self, package: SavedPackage) -> Result<()> {
        let _guard = self.lock.lock();
        let mut saved = self.load()?;
        upsert(&mut saved, package);
        self.store(&saved)
    }

    fn remove(&self, package_id: &str) -> Result<bool> {
        let _guard = self.lock.lock();
        let mut saved = self.load()?;
        let before = saved.len();
        saved.retain(|p| p.package_id != package_id);
        if saved.len() == before {
            return Ok(false);
        }
        self.store(&saved)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<SavedPackage>> {
        let _guard = self.lock.lock();
        Ok(newest_first(self.load()?))
    }
}

/// Write to a sibling `.tmp` file, then rename over `path`.
fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|s| s.to_str()).unwrap_or("tmp")
    ));
    std::fs::write(&tmp_path, contents)
        .map_err(|e| anyhow!("Failed to write temp file {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        anyhow!(
            "Failed to rename {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        )
    })
}
