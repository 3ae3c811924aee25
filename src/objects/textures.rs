//! Background textures
//!
//! A [`TextureSource`] turns a location into decoded RGBA pixels. Loads run
//! on a [`TextureLoader`] worker thread that walks each request's fallback
//! list and reports back over a channel; the tick loop polls it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Decoded RGBA8 image
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// Location the pixels came from
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Texture {
    pub fn new(source: &str, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            source: source.to_string(),
            width,
            height,
            pixels,
        }
    }
}

/// Error loading a texture
#[derive(Debug)]
pub enum TextureError {
    Io { path: PathBuf, source: std::io::Error },
    Decode(image::ImageError),
    /// Locations this source cannot fetch (remote URLs)
    UnsupportedSource(String),
    /// The fallback list was empty
    NoCandidates,
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::Io { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
            TextureError::Decode(e) => write!(f, "cannot decode image: {}", e),
            TextureError::UnsupportedSource(location) => write!(f, "unsupported texture source: {}", location),
            TextureError::NoCandidates => write!(f, "no texture locations to try"),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io { source, .. } => Some(source),
            TextureError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::Decode(e)
    }
}

/// Somewhere textures can be loaded from
pub trait TextureSource: Send + Sync {
    fn load(&self, location: &str) -> Result<Texture, TextureError>;
}

/// Reads images from disk relative to an asset root
///
/// Site-absolute paths such as `/static/mnzr1.jpg` resolve under the root.
#[derive(Clone, Debug)]
pub struct FileTextureSource {
    root: PathBuf,
}

impl FileTextureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        self.root.join(location.trim_start_matches('/'))
    }
}

impl TextureSource for FileTextureSource {
    fn load(&self, location: &str) -> Result<Texture, TextureError> {
        if location.contains("://") {
            return Err(TextureError::UnsupportedSource(location.to_string()));
        }
        let path = self.resolve(location);
        let bytes = std::fs::read(&path).map_err(|source| TextureError::Io {
            path: path.clone(),
            source,
        })?;
        let image = image::load_from_memory(&bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Texture::new(location, width, height, image.into_raw()))
    }
}

/// Try each candidate in order, returning the first that loads
///
/// Every failure is logged; the last error is returned once the list is
/// exhausted.
pub fn load_with_fallback(source: &dyn TextureSource, candidates: &[String]) -> Result<Texture, TextureError> {
    let mut last = TextureError::NoCandidates;
    for (i, location) in candidates.iter().enumerate() {
        match source.load(location) {
            Ok(texture) => {
                if i > 0 {
                    log::info!("Loaded fallback texture {}", location);
                }
                return Ok(texture);
            }
            Err(e) => {
                log::warn!("Texture {} failed: {}", location, e);
                last = e;
            }
        }
    }
    log::error!("All {} texture locations failed", candidates.len());
    Err(last)
}

struct TextureRequest {
    id: String,
    candidates: Vec<String>,
}

/// A finished background load
#[derive(Debug)]
pub struct LoadedTexture {
    /// Id given with the request
    pub id: String,
    pub result: Result<Texture, TextureError>,
}

/// Background texture loader using a dedicated worker thread
///
/// The worker runs until the loader is dropped.
pub struct TextureLoader {
    sender: Sender<TextureRequest>,
    receiver: Receiver<LoadedTexture>,
}

impl TextureLoader {
    pub fn new(source: Arc<dyn TextureSource>) -> Self {
        let (request_tx, request_rx) = channel::<TextureRequest>();
        let (result_tx, result_rx) = channel::<LoadedTexture>();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let loaded = LoadedTexture {
                    result: load_with_fallback(source.as_ref(), &request.candidates),
                    id: request.id,
                };
                if result_tx.send(loaded).is_err() {
                    break;
                }
            }
        });

        Self {
            sender: request_tx,
            receiver: result_rx,
        }
    }

    /// Queue a load of the first working location in `candidates`
    pub fn request(&self, id: impl Into<String>, candidates: Vec<String>) {
        let request = TextureRequest {
            id: id.into(),
            candidates,
        };
        if self.sender.send(request).is_err() {
            log::error!("Texture loader thread has stopped");
        }
    }

    /// Next finished load, if any (non-blocking)
    pub fn poll(&self) -> Option<LoadedTexture> {
        match self.receiver.try_recv() {
            Ok(loaded) => Some(loaded),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn poll_all(&self) -> Vec<LoadedTexture> {
        let mut results = Vec::new();
        while let Ok(loaded) = self.receiver.try_recv() {
            results.push(loaded);
        }
        results
    }

    /// Block up to `timeout` for the next finished load
    pub fn wait(&self, timeout: Duration) -> Option<LoadedTexture> {
        match self.receiver.recv_timeout(timeout) {
            Ok(loaded) => Some(loaded),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Loaded textures keyed by background id
#[derive(Clone, Debug, Default)]
pub struct TextureCache {
    textures: HashMap<String, Arc<Texture>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(id.into(), Arc::clone(&texture));
        texture
    }

    pub fn get(&self, id: &str) -> Option<Arc<Texture>> {
        self.textures.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.textures.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::FakeTextures;
    use std::path::Path;

    /// Directory under the system temp dir for test images
    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("drivescape-{}-{}", name, std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        dir
    }

    fn write_png(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 200, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_file_source_decodes_png() {
        let dir = test_dir("decode");
        write_png(&dir, "static/mnzr1.png");

        let source = FileTextureSource::new(&dir);
        let texture = source.load("/static/mnzr1.png").unwrap();
        assert_eq!((texture.width, texture.height), (2, 3));
        assert_eq!(texture.pixels.len(), 2 * 3 * 4);
        assert_eq!(&texture.pixels[..4], &[10, 200, 30, 255]);
    }

    #[test]
    fn test_file_source_errors() {
        let source = FileTextureSource::new(test_dir("errors"));
        assert!(matches!(source.load("/missing.jpg"), Err(TextureError::Io { .. })));
        assert!(matches!(
            source.load("https://images.example.com/a.jpg"),
            Err(TextureError::UnsupportedSource(_))
        ));

        let dir = test_dir("garbage");
        std::fs::write(dir.join("bad.png"), b"not an image").unwrap();
        let source = FileTextureSource::new(&dir);
        assert!(matches!(source.load("bad.png"), Err(TextureError::Decode(_))));
    }

    #[test]
    fn test_fallback_tries_in_order() {
        let candidates = vec!["first.jpg".to_string(), "ok-second.jpg".to_string(), "ok-third.jpg".to_string()];
        let texture = load_with_fallback(&FakeTextures, &candidates).unwrap();
        assert_eq!(texture.source, "ok-second.jpg");
    }

    #[test]
    fn test_fallback_exhausted_returns_last_error() {
        let candidates = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        match load_with_fallback(&FakeTextures, &candidates) {
            Err(TextureError::UnsupportedSource(location)) => assert_eq!(location, "b.jpg"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(load_with_fallback(&FakeTextures, &[]), Err(TextureError::NoCandidates)));
    }

    #[test]
    fn test_loader_reports_results() {
        let loader = TextureLoader::new(Arc::new(FakeTextures));
        assert!(loader.poll().is_none());

        loader.request("mnzr1", vec!["nope.jpg".to_string(), "ok.jpg".to_string()]);
        loader.request("mnzr2", vec!["nope.jpg".to_string()]);

        let first = loader.wait(Duration::from_secs(2)).unwrap();
        assert_eq!(first.id, "mnzr1");
        assert_eq!(first.result.unwrap().source, "ok.jpg");

        let second = loader.wait(Duration::from_secs(2)).unwrap();
        assert_eq!(second.id, "mnzr2");
        assert!(second.result.is_err());
        assert!(loader.poll_all().is_empty());
    }

    #[test]
    fn test_cache() {
        let mut cache = TextureCache::new();
        assert!(cache.is_empty());
        cache.insert("mnzr1", Texture::new("ok.jpg", 1, 1, vec![0; 4]));
        assert!(cache.contains("mnzr1"));
        assert_eq!(cache.get("mnzr1").unwrap().source, "ok.jpg");
        assert!(cache.get("mnzr2").is_none());
        assert_eq!(cache.len(), 1);
    }
}
