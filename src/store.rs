//! 一覧スナップショットのファイルストア
//!
//! ブラウザの sessionStorage の代わりに、キャッシュディレクトリへ
//! キーごとに1ファイルで保存する。

use sky_souls_common::{Error, ViewStateStore};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

/// 保存済みエントリの情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub key: String,
    pub size: u64,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(file_name)
    }

    /// 保存済みエントリ一覧（キー順）
    pub fn entries(&self) -> Vec<StoreEntry> {
        let Ok(read_dir) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut entries: Vec<StoreEntry> = read_dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| StoreEntry {
                key: entry.file_name().to_string_lossy().to_string(),
                size: entry.metadata().map(|m| m.len()).unwrap_or(0),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// 全削除。削除した件数を返す
    pub fn clear_all(&mut self) -> std::io::Result<usize> {
        let entries = self.entries();
        for entry in &entries {
            std::fs::remove_file(self.dir.join(&entry.key))?;
        }
        Ok(entries.len())
    }
}

impl ViewStateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> sky_souls_common::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value).map_err(Error::from)
    }

    fn remove(&mut self, key: &str) {
        let path = self.path_for(key);
        if let Err(err) = std::fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %err, "failed to remove session entry");
            }
        }
    }
}
