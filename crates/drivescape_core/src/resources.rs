//! Named model resources
//!
//! A manifest lists every model the city needs under a resource name
//! (`roadModel`, `greenBoxModel`, ...). Loading is best effort: a model that
//! fails to load is logged and simply absent, and objects asking for it get
//! `None`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::asset_cache::{AssetCache, AssetHandle};
use crate::asset_error::AssetError;
use crate::model::ModelAsset;

/// Owner tag used for every manifest entry in the asset cache
const MANIFEST_OWNER: &str = "manifest";

/// One manifest line: resource name to model file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub name: String,
    /// Relative to the asset root
    pub path: String,
}

/// RON list of resources to load at startup
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceManifest {
    pub models: Vec<ResourceEntry>,
}

impl ResourceManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    pub fn with_model(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.models.push(ResourceEntry {
            name: name.into(),
            path: path.into(),
        });
        self
    }
}

/// Loaded models indexed by resource name
pub struct Resources {
    root: PathBuf,
    cache: AssetCache,
    items: HashMap<String, AssetHandle>,
}

impl Resources {
    /// Empty set resolving manifest paths against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: AssetCache::new(),
            items: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn set_hot_reload(&mut self, enabled: bool) {
        self.cache.set_watch_for_changes(enabled);
    }

    /// Load every manifest entry, returning how many succeeded
    pub fn load_manifest(&mut self, manifest: &ResourceManifest) -> usize {
        let mut loaded = 0;
        for entry in &manifest.models {
            match self.load_model(&entry.name, &entry.path) {
                Ok(()) => loaded += 1,
                Err(err) => log::error!("Resource '{}' failed to load from {}: {}", entry.name, entry.path, err),
            }
        }
        log::info!("Loaded {}/{} model resources", loaded, manifest.models.len());
        loaded
    }

    /// Load a single model file under `name`
    pub fn load_model(&mut self, name: &str, relative_path: &str) -> Result<(), AssetError> {
        let path = self.root.join(relative_path);
        let handle = self.cache.load::<ModelAsset>(&path)?;
        self.cache.add_owner(&handle, MANIFEST_OWNER);
        self.items.insert(name.to_string(), handle);
        Ok(())
    }

    /// Register an in-memory model under `name`
    pub fn insert(&mut self, name: &str, model: ModelAsset) {
        let handle = self.cache.insert(format!("memory://{}", name), model);
        self.cache.add_owner(&handle, MANIFEST_OWNER);
        self.items.insert(name.to_string(), handle);
    }

    /// Forget `name`; the model is dropped once nothing else holds it
    pub fn remove(&mut self, name: &str) -> bool {
        match self.items.remove(name) {
            Some(handle) => {
                self.cache.remove_owner(&handle, MANIFEST_OWNER);
                self.cache.gc();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<ModelAsset>> {
        self.items.get(name).and_then(|h| self.cache.get::<ModelAsset>(h))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reload changed model files, returning the affected resource names
    pub fn check_hot_reload(&mut self) -> Vec<String> {
        let reloaded = self.cache.check_hot_reload::<ModelAsset>();
        self.items
            .iter()
            .filter(|(_, h)| reloaded.contains(h))
            .map(|(name, _)| name.clone())
            .collect()
    }
}
