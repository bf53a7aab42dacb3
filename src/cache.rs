//! This module provides `TemplateCache`, a file-to-template cache keyed by
//! path and invalidated by modification time. It is an explicit collaborator
//! owned by the driver; the engine itself carries no global or static
//! mutable state. A cached `Definition` holds only the reusable template, so
//! callers still clone it per run.

use crate::loader::{Definition, DefinitionLoader};
use crate::types::MachineError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

struct CacheEntry {
    modified: SystemTime,
    definition: Definition,
}

/// Caches parsed machine definitions across repeated loads of the same file.
#[derive(Default)]
pub struct TemplateCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl TemplateCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached definition for `path`, reloading it if the file
    /// was never loaded or its modification time changed since.
    pub fn get_or_load(&mut self, path: &Path) -> Result<&Definition, MachineError> {
        let modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|e| {
                MachineError::File(format!("failed to stat {}: {}", path.display(), e))
            })?;

        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().modified != modified {
                    let definition = DefinitionLoader::load(path)?;
                    occupied.insert(CacheEntry {
                        modified,
                        definition,
                    });
                }
                Ok(&occupied.into_mut().definition)
            }
            Entry::Vacant(vacant) => {
                let definition = DefinitionLoader::load(path)?;
                Ok(&vacant
                    .insert(CacheEntry {
                        modified,
                        definition,
                    })
                    .definition)
            }
        }
    }

    /// Number of cached definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached definition.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    fn write_definition(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }

    #[test]
    fn test_caches_definition_across_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.txt");
        write_definition(&path, "2\n1\n0,0,N\n1,1,R\n");

        let mut cache = TemplateCache::new();
        assert!(cache.is_empty());

        let state_count = cache.get_or_load(&path).unwrap().state_count;
        assert_eq!(state_count, 2);
        assert_eq!(cache.len(), 1);

        // Second load hits the cache, no new entry.
        let state_count = cache.get_or_load(&path).unwrap().state_count;
        assert_eq!(state_count, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_reloads_when_modification_time_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.txt");
        write_definition(&path, "2\n1\n0,0,N\n1,1,R\n");

        let mut cache = TemplateCache::new();
        assert_eq!(cache.get_or_load(&path).unwrap().state_count, 2);

        // Filesystems may round modification times to a coarse granularity.
        thread::sleep(Duration::from_millis(1100));
        write_definition(&path, "3\n1\n1,1,R\n1,1,R\n2,0,N\n2,1,N\n");

        assert_eq!(cache.get_or_load(&path).unwrap().state_count, 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_file_is_a_file_error() {
        let dir = tempdir().unwrap();
        let mut cache = TemplateCache::new();

        let err = cache.get_or_load(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, MachineError::File(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_parse_failure_is_not_cached() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.txt");
        write_definition(&path, "not a machine");

        let mut cache = TemplateCache::new();
        let err = cache.get_or_load(&path).unwrap_err();
        assert!(matches!(err, MachineError::Definition(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_empties_the_cache() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.txt");
        write_definition(&path, "2\n1\n0,0,N\n1,1,R\n");

        let mut cache = TemplateCache::new();
        cache.get_or_load(&path).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
