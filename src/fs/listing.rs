use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::node::NodeKind;

/// One entry produced by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: PathBuf,
    pub kind: NodeKind,
    /// Size in bytes for files, zero otherwise.
    pub size: u64,
}

/// Filesystem access used by the tree.
///
/// Only failing to open a directory is an error; a bad entry inside a
/// listing is skipped so one unreadable entry never aborts the whole list.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn list_directory(&self, path: &Path) -> io::Result<Vec<EntryInfo>>;

    fn file_size(&self, path: &Path) -> io::Result<u64>;
}

/// `FileSystem` backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Symlinks are followed; dangling links and entries whose metadata
    /// can't be read are skipped.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<EntryInfo>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("skipping unreadable entry in {}: {}", path.display(), e);
                    continue;
                }
            };
            let entry_path = entry.path();
            let metadata = match fs::metadata(&entry_path) {
                Ok(m) => m,
                Err(e) => {
                    debug!("skipping {}: {}", entry_path.display(), e);
                    continue;
                }
            };

            let (kind, size) = if metadata.is_dir() {
                (NodeKind::Directory, 0)
            } else if metadata.is_file() {
                (NodeKind::File, metadata.len())
            } else {
                (NodeKind::Unknown, 0)
            };

            entries.push(EntryInfo {
                path: entry_path,
                kind,
                size,
            });
        }

        Ok(entries)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }
}
