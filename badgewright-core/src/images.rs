//! # Image Loading
//!
//! Image elements can't be materialized until their source is decoded, which may take a while. Loads are
//! started by the canvas controller and run on a tokio runtime, and their results are delivered over a
//! channel to be picked up at the start of the next tick. The synchronous path never waits on a load.

use std::{path::PathBuf, sync::Arc};

use crate::state::ElementID;

/// Decoded RGBA8 pixel data.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pixels: Arc<image::RgbaImage>,
}
impl DecodedImage {
    #[must_use]
    pub fn new(pixels: image::RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }
    /// `[width, height]` in pixels.
    #[must_use]
    pub fn size(&self) -> [u32; 2] {
        [self.pixels.width(), self.pixels.height()]
    }
    #[must_use]
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ImageLoadError {
    #[error("reading image: {0}")]
    Io(#[from] std::io::Error),
    #[error("decoding image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image load was cancelled")]
    Cancelled,
}

/// Decode an encoded image (png or jpeg) from memory.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, ImageLoadError> {
    let image = image::load_from_memory(bytes)?;
    Ok(DecodedImage::new(image.to_rgba8()))
}

/// Resolves an image element's `src` to pixel data.
#[async_trait::async_trait]
pub trait ImageLoader: Send + Sync + 'static {
    async fn load(&self, src: &str) -> Result<DecodedImage, ImageLoadError>;
}

/// Loads sources as paths on the local filesystem. Relative paths are taken relative to `root`.
#[derive(Clone, Debug, Default)]
pub struct FileImageLoader {
    root: Option<PathBuf>,
}
impl FileImageLoader {
    #[must_use]
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
    fn resolve(&self, src: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(src),
            None => PathBuf::from(src),
        }
    }
}
#[async_trait::async_trait]
impl ImageLoader for FileImageLoader {
    async fn load(&self, src: &str) -> Result<DecodedImage, ImageLoadError> {
        let path = self.resolve(src);
        // Both reading and decoding block.
        tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(path)?;
            decode(&bytes)
        })
        .await
        .map_err(|_| ImageLoadError::Cancelled)?
    }
}

struct Loaded {
    id: ElementID,
    src: String,
    result: Result<DecodedImage, ImageLoadError>,
}

/// Bookkeeping for in-flight and finished loads, per element.
///
/// Each `(element, src)` pair is loaded at most once. A failure is remembered and never retried, though a
/// different `src` for the same element gets a fresh attempt.
pub struct ImagePipeline {
    loader: Arc<dyn ImageLoader>,
    runtime: tokio::runtime::Handle,
    sender: tokio::sync::mpsc::UnboundedSender<Loaded>,
    receiver: tokio::sync::mpsc::UnboundedReceiver<Loaded>,
    /// Requested and not yet drained.
    pending: hashbrown::HashMap<ElementID, String>,
    loaded: hashbrown::HashMap<ElementID, (String, DecodedImage)>,
    failed: hashbrown::HashSet<(ElementID, String)>,
    tasks: Vec<tokio::task::JoinHandle<()>>,
}
impl ImagePipeline {
    #[must_use]
    pub fn new(loader: Arc<dyn ImageLoader>, runtime: tokio::runtime::Handle) -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        Self {
            loader,
            runtime,
            sender,
            receiver,
            pending: hashbrown::HashMap::new(),
            loaded: hashbrown::HashMap::new(),
            failed: hashbrown::HashSet::new(),
            tasks: Vec::new(),
        }
    }
    /// The decoded image for this element, if `src` is what was loaded for it.
    #[must_use]
    pub fn get(&self, id: ElementID, src: &str) -> Option<&DecodedImage> {
        self.loaded
            .get(&id)
            .filter(|(loaded, _)| loaded == src)
            .map(|(_, image)| image)
    }
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }
    /// Nothing loaded, loading, or failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.loaded.is_empty() && self.failed.is_empty()
    }
    /// Start loading, unless this source is already loaded, loading, or has failed.
    /// Returns whether a load was started.
    pub fn request(&mut self, id: ElementID, src: &str) -> bool {
        if src.is_empty()
            || self.get(id, src).is_some()
            || self.pending.get(&id).is_some_and(|pending| pending == src)
            || self.failed.contains(&(id, src.to_owned()))
        {
            return false;
        }
        log::debug!("Loading image {src:?} for {id}");
        self.pending.insert(id, src.to_owned());
        let loader = self.loader.clone();
        let sender = self.sender.clone();
        let src = src.to_owned();
        let task = self.runtime.spawn(async move {
            let result = loader.load(&src).await;
            // The receiver only closes when the pipeline is dropped, in which case nobody cares.
            let _ = sender.send(Loaded { id, src, result });
        });
        self.tasks.push(task);
        true
    }
    /// Collect finished loads. Returns the elements that now have an image ready.
    pub fn drain(&mut self) -> Vec<ElementID> {
        let mut ready = Vec::new();
        while let Ok(Loaded { id, src, result }) = self.receiver.try_recv() {
            // Results for a src that is no longer wanted are dropped.
            if self.pending.get(&id) != Some(&src) {
                log::trace!("Dropping outdated image {src:?} for {id}");
                continue;
            }
            self.pending.remove(&id);
            match result {
                Ok(image) => {
                    log::debug!("Loaded image {src:?} for {id} ({:?})", image.size());
                    self.loaded.insert(id, (src, image));
                    ready.push(id);
                }
                Err(err) => {
                    log::warn!("Failed to load image {src:?} for {id}: {err}");
                    self.failed.insert((id, src));
                }
            }
        }
        self.tasks.retain(|task| !task.is_finished());
        ready
    }
    /// Stop caring about an element's image.
    pub fn forget(&mut self, id: ElementID) {
        self.pending.remove(&id);
        self.loaded.remove(&id);
        self.failed.retain(|(failed, _)| *failed != id);
    }
    /// Drop every image and failure, such as when the design is replaced. Loads still in flight are
    /// dropped once they arrive.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.loaded.clear();
        self.failed.clear();
    }
    /// Wait until every load started so far has finished. Results still need to be [drained](Self::drain).
    pub async fn settle(&mut self) {
        for task in std::mem::take(&mut self.tasks) {
            // A panicked loader is treated the same as a dropped result, it just never arrives.
            if let Err(err) = task.await {
                log::warn!("Image load task failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Serves a 2x1 image for any source starting with "ok", fails otherwise.
    struct StubLoader;
    #[async_trait::async_trait]
    impl ImageLoader for StubLoader {
        async fn load(&self, src: &str) -> Result<DecodedImage, ImageLoadError> {
            if src.starts_with("ok") {
                Ok(DecodedImage::new(image::RgbaImage::new(2, 1)))
            } else {
                Err(std::io::Error::from(std::io::ErrorKind::NotFound).into())
            }
        }
    }

    fn pipeline() -> ImagePipeline {
        ImagePipeline::new(Arc::new(StubLoader), tokio::runtime::Handle::current())
    }

    #[tokio::test]
    async fn loads_once() {
        let mut images = pipeline();
        let id = ElementID::next();
        assert!(images.request(id, "ok.png"));
        assert!(!images.request(id, "ok.png"));
        assert!(images.is_pending());
        images.settle().await;
        assert_eq!(images.drain(), [id]);
        assert_eq!(images.get(id, "ok.png").unwrap().size(), [2, 1]);
        assert!(images.get(id, "other.png").is_none());
        // Already have it.
        assert!(!images.request(id, "ok.png"));
    }
    #[tokio::test]
    async fn failure_not_retried() {
        let mut images = pipeline();
        let id = ElementID::next();
        assert!(images.request(id, "missing.png"));
        images.settle().await;
        assert!(images.drain().is_empty());
        assert!(!images.is_pending());
        assert!(!images.request(id, "missing.png"));
        // A new source is a new attempt.
        assert!(images.request(id, "ok-now.png"));
    }
    #[tokio::test]
    async fn forget_and_clear_release() {
        let mut images = pipeline();
        let (kept, gone) = (ElementID::next(), ElementID::next());
        images.request(kept, "ok.png");
        images.request(gone, "missing.png");
        images.settle().await;
        assert_eq!(images.drain(), [kept]);
        assert_eq!(images.failed.len(), 1);

        images.forget(gone);
        assert!(images.failed.is_empty());
        // Forgotten, so it may be tried again.
        assert!(images.request(gone, "missing.png"));

        images.clear();
        assert!(images.is_empty());
        images.settle().await;
        // The load that was in flight arrives to nobody.
        assert!(images.drain().is_empty());
        assert!(images.failed.is_empty());
    }
    #[tokio::test]
    async fn empty_source_skipped() {
        let mut images = pipeline();
        assert!(!images.request(ElementID::next(), ""));
        assert!(!images.is_pending());
    }
    #[tokio::test]
    async fn outdated_result_dropped() {
        let mut images = pipeline();
        let id = ElementID::next();
        images.request(id, "ok-first.png");
        images.request(id, "ok-second.png");
        images.settle().await;
        assert_eq!(images.drain(), [id]);
        assert!(images.get(id, "ok-second.png").is_some());
        assert!(images.get(id, "ok-first.png").is_none());
    }
    #[tokio::test]
    async fn file_loader_reports_missing() {
        let loader = FileImageLoader::new(Some(std::env::temp_dir()));
        let result = loader.load("badgewright-definitely-not-here.png").await;
        assert!(matches!(result, Err(ImageLoadError::Io(_))));
    }
    #[test]
    fn decode_garbage() {
        assert!(matches!(
            decode(b"not an image"),
            Err(ImageLoadError::Decode(_))
        ));
    }
}
