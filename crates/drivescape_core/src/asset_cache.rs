//! Asset caching and hot reload
//!
//! Assets are stored type-erased behind `Arc<dyn Any + Send + Sync>`,
//! deduplicated by file path and tagged with the owners that still use them.
//! Entries without owners are dropped by [`AssetCache::gc`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::asset_error::AssetError;

/// Identifier of a cache entry; 0 is never assigned
pub type AssetId = u64;

/// Cheap, cloneable reference to a cached asset
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AssetHandle {
    id: AssetId,
    path: PathBuf,
}

impl AssetHandle {
    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Something that can be read from a file and cached
pub trait Asset: Sized + Send + Sync + 'static {
    fn load_from_file(path: &Path) -> Result<Self, AssetError>;
}

struct CachedEntry {
    data: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    path: PathBuf,
    /// `None` for assets inserted from memory; those are never hot-reloaded
    load_time: Option<SystemTime>,
    owners: Vec<String>,
}

/// Type-erased asset store
pub struct AssetCache {
    assets: HashMap<AssetId, CachedEntry>,
    path_index: HashMap<PathBuf, AssetId>,
    next_id: AssetId,
    watch_for_changes: bool,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            path_index: HashMap::new(),
            next_id: 1,
            watch_for_changes: false,
        }
    }

    /// Load `path` as `T`, or return the existing handle if it is cached
    pub fn load<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<AssetHandle, AssetError> {
        let path = path.as_ref().to_path_buf();
        if let Some(&id) = self.path_index.get(&path) {
            return Ok(AssetHandle { id, path });
        }

        let data = T::load_from_file(&path)?;
        Ok(self.store(path, Arc::new(data), TypeId::of::<T>(), Some(SystemTime::now())))
    }

    /// Cache an asset that was built in memory under a virtual path
    ///
    /// Replaces any entry already stored under that path.
    pub fn insert<T: Asset>(&mut self, path: impl AsRef<Path>, data: T) -> AssetHandle {
        let path = path.as_ref().to_path_buf();
        if let Some(id) = self.path_index.remove(&path) {
            self.assets.remove(&id);
        }
        self.store(path, Arc::new(data), TypeId::of::<T>(), None)
    }

    fn store(
        &mut self,
        path: PathBuf,
        data: Arc<dyn Any + Send + Sync>,
        type_id: TypeId,
        load_time: Option<SystemTime>,
    ) -> AssetHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.assets.insert(
            id,
            CachedEntry {
                data,
                type_id,
                path: path.clone(),
                load_time,
                owners: Vec::new(),
            },
        );
        self.path_index.insert(path.clone(), id);
        AssetHandle { id, path }
    }

    /// Fetch a cached asset; `None` if removed or stored as another type
    pub fn get<T: Asset>(&self, handle: &AssetHandle) -> Option<Arc<T>> {
        let entry = self.assets.get(&handle.id)?;
        entry.data.clone().downcast::<T>().ok()
    }

    /// Record that `owner` uses this asset
    pub fn add_owner(&mut self, handle: &AssetHandle, owner: &str) {
        if let Some(entry) = self.assets.get_mut(&handle.id) {
            if !entry.owners.iter().any(|o| o == owner) {
                entry.owners.push(owner.to_string());
            }
        }
    }

    pub fn remove_owner(&mut self, handle: &AssetHandle, owner: &str) {
        if let Some(entry) = self.assets.get_mut(&handle.id) {
            entry.owners.retain(|o| o != owner);
        }
    }

    pub fn owners(&self, handle: &AssetHandle) -> Option<&[String]> {
        self.assets.get(&handle.id).map(|e| e.owners.as_slice())
    }

    pub fn set_watch_for_changes(&mut self, enabled: bool) {
        self.watch_for_changes = enabled;
    }

    pub fn is_watching_for_changes(&self) -> bool {
        self.watch_for_changes
    }

    /// Reload every file-backed `T` whose modification time is newer than
    /// its load time. No-op unless watching is enabled.
    pub fn check_hot_reload<T: Asset>(&mut self) -> Vec<AssetHandle> {
        if !self.watch_for_changes {
            return Vec::new();
        }

        let candidates: Vec<(AssetId, PathBuf, SystemTime)> = self
            .assets
            .iter()
            .filter(|(_, e)| e.type_id == TypeId::of::<T>())
            .filter_map(|(&id, e)| e.load_time.map(|t| (id, e.path.clone(), t)))
            .collect();

        let mut reloaded = Vec::new();
        for (id, path, load_time) in candidates {
            let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(time) => time,
                Err(_) => continue,
            };
            if modified <= load_time {
                continue;
            }

            match T::load_from_file(&path) {
                Ok(data) => {
                    if let Some(entry) = self.assets.get_mut(&id) {
                        entry.data = Arc::new(data);
                        entry.load_time = Some(SystemTime::now());
                    }
                    log::info!("Hot-reloaded asset: {}", path.display());
                    reloaded.push(AssetHandle { id, path });
                }
                Err(err) => log::warn!("Failed to hot-reload asset {}: {}", path.display(), err),
            }
        }
        reloaded
    }

    /// Drop every entry that has no owner; returns how many were removed
    pub fn gc(&mut self) -> usize {
        let orphaned: Vec<AssetId> = self
            .assets
            .iter()
            .filter(|(_, e)| e.owners.is_empty())
            .map(|(&id, _)| id)
            .collect();

        for id in &orphaned {
            if let Some(entry) = self.assets.remove(id) {
                self.path_index.remove(&entry.path);
            }
        }
        orphaned.len()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    pub fn contains(&self, handle: &AssetHandle) -> bool {
        self.assets.contains_key(&handle.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[derive(Debug, PartialEq)]
    struct TextAsset(String);

    impl Asset for TextAsset {
        fn load_from_file(path: &Path) -> Result<Self, AssetError> {
            Ok(TextAsset(fs::read_to_string(path)?))
        }
    }

    #[derive(Debug)]
    struct Other;

    impl Asset for Other {
        fn load_from_file(_path: &Path) -> Result<Self, AssetError> {
            Ok(Other)
        }
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("drivescape_asset_cache_tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_and_get() {
        let path = temp_file("load.txt", "hello");
        let mut cache = AssetCache::new();
        let handle = cache.load::<TextAsset>(&path).unwrap();
        assert_eq!(handle.id(), 1);
        assert_eq!(cache.get::<TextAsset>(&handle).unwrap().0, "hello");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_deduplicates_by_path() {
        let path = temp_file("dedup.txt", "x");
        let mut cache = AssetCache::new();
        let a = cache.load::<TextAsset>(&path).unwrap();
        let b = cache.load::<TextAsset>(&path).unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.asset_count(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_errors() {
        let mut cache = AssetCache::new();
        assert!(cache.load::<TextAsset>("/nope/missing.txt").is_err());
        assert_eq!(cache.asset_count(), 0);
    }

    #[test]
    fn test_get_with_wrong_type_is_none() {
        let mut cache = AssetCache::new();
        let handle = cache.insert("mem://a", TextAsset("a".into()));
        assert!(cache.get::<Other>(&handle).is_none());
        assert!(cache.get::<TextAsset>(&handle).is_some());
    }

    #[test]
    fn test_insert_replaces_same_path() {
        let mut cache = AssetCache::new();
        let first = cache.insert("mem://a", TextAsset("1".into()));
        let second = cache.insert("mem://a", TextAsset("2".into()));
        assert!(!cache.contains(&first));
        assert_eq!(cache.get::<TextAsset>(&second).unwrap().0, "2");
        assert_eq!(cache.asset_count(), 1);
    }

    #[test]
    fn test_gc_keeps_owned_assets() {
        let mut cache = AssetCache::new();
        let kept = cache.insert("mem://kept", TextAsset("k".into()));
        let dropped = cache.insert("mem://dropped", TextAsset("d".into()));
        cache.add_owner(&kept, "city");
        cache.add_owner(&kept, "city");
        assert_eq!(cache.owners(&kept).unwrap().len(), 1);

        assert_eq!(cache.gc(), 1);
        assert!(cache.contains(&kept));
        assert!(!cache.contains(&dropped));

        cache.remove_owner(&kept, "city");
        assert_eq!(cache.gc(), 1);
    }

    #[test]
    fn test_hot_reload_disabled_by_default() {
        let path = temp_file("hot_off.txt", "v1");
        let mut cache = AssetCache::new();
        cache.load::<TextAsset>(&path).unwrap();
        assert!(cache.check_hot_reload::<TextAsset>().is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_hot_reload_picks_up_changes() {
        let path = temp_file("hot_on.txt", "v1");
        let mut cache = AssetCache::new();
        cache.set_watch_for_changes(true);
        let handle = cache.load::<TextAsset>(&path).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(50));
        fs::write(&path, "v2").unwrap();

        let reloaded = cache.check_hot_reload::<TextAsset>();
        if !reloaded.is_empty() {
            assert_eq!(cache.get::<TextAsset>(&handle).unwrap().0, "v2");
        }
        let _ = fs::remove_file(&path);
    }
}
