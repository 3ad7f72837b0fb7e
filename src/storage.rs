use std::fs;
use std::io;
use std::path::PathBuf;

/// Flat uploads-directory blob store. Keys are bare filenames; anything that
/// could escape the directory is rejected before it reaches the filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<LocalStorage> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(LocalStorage { root })
    }

    pub fn path(&self, filename: &str) -> Option<PathBuf> {
        if !Self::is_safe_name(filename) {
            return None;
        }
        Some(self.root.join(filename))
    }

    pub fn write(&self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self
            .path(filename)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "unsafe filename"))?;
        fs::write(path, bytes)
    }

    /// Removal tolerates already-missing files so cleanup paths stay
    /// idempotent.
    pub fn remove(&self, filename: &str) -> io::Result<()> {
        let Some(path) = self.path(filename) else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn is_safe_name(filename: &str) -> bool {
        !filename.is_empty()
            && !filename.starts_with('.')
            && filename
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'))
    }
}
