use crate::cache::error::CacheError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "vcsn_rs_cache";

pub fn get_cache_dir() -> Result<PathBuf, CacheError> {
    dirs::cache_dir()
        .ok_or(CacheError::CacheDirResolution)
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub fn ensure_cache_dir_exists(path: &Path) -> Result<(), CacheError> {
    match std::fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(CacheError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            std::fs::create_dir_all(path)
                .map_err(|e| CacheError::CacheDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(CacheError::CacheDirCreation(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_nested_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_cache_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        // second call is a no-op
        ensure_cache_dir_exists(&nested).unwrap();
    }

    #[test]
    fn rejects_file_in_the_way() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("cache");
        std::fs::write(&file, b"").unwrap();
        assert!(matches!(
            ensure_cache_dir_exists(&file),
            Err(CacheError::NotADirectory(_))
        ));
    }
}
