//! Native file backend: `<data dir>/<key>.json`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::KeyValueStore;

/// Directory-backed store, one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted in the platform data directory for this game
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "road-rush")
            .context("could not determine a data directory")?;
        Self::open(dirs.data_dir())
    }

    /// Store rooted in `dir` (created if missing)
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        match self.write(key, value) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to save {}: {:#}", key, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("road-rush-test-{}", std::process::id()));
        let mut store = FileStore::open(&dir).unwrap();

        assert_eq!(store.get_item("scores"), None);
        assert!(store.set_item("scores", r#"[{"name":"A","score":1}]"#));
        assert_eq!(
            store.get_item("scores").as_deref(),
            Some(r#"[{"name":"A","score":1}]"#)
        );

        let _ = fs::remove_dir_all(&dir);
    }
}
