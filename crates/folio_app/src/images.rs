// SPDX-License-Identifier: MIT OR Apache-2.0
//! Background loading of carousel images into egui textures.
//!
//! Local files and http(s) URLs are fetched and decoded on a worker thread.
//! Decoded pixels come back over a channel and are uploaded on the UI
//! thread. Failures are recorded straight into the shared state table so the
//! carousel keeps drawing its placeholder for that image.

use folio_carousel::{ImageRef, TextureSource};
use image::{DynamicImage, GenericImageView};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Longest side a carousel texture is decoded to
pub const MAX_TEXTURE_SIDE: u32 = 512;

/// Image loading errors
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    /// Reading a local file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a URL failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The bytes are not a supported image
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Load state of one image
#[derive(Clone)]
pub enum ImageState {
    /// Requested, not decoded yet
    Loading,
    /// Uploaded and ready to draw
    Ready(egui::TextureHandle),
    /// Could not be loaded
    Failed(String),
}

/// Decoded pixels ready for upload
#[derive(Debug)]
pub struct DecodedImage {
    /// Image the pixels belong to
    pub image: ImageRef,
    /// RGBA pixel data
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Loads carousel images on demand and caches their textures
pub struct ImageLoader {
    ctx: egui::Context,
    states: Arc<RwLock<HashMap<ImageRef, ImageState>>>,
    request_tx: mpsc::UnboundedSender<ImageRef>,
    result_rx: mpsc::UnboundedReceiver<DecodedImage>,
}

impl ImageLoader {
    /// Spawn the loader worker; textures are created on `ctx`
    pub fn new(ctx: egui::Context) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let states = Arc::new(RwLock::new(HashMap::new()));

        let worker_states = Arc::clone(&states);
        let worker_ctx = ctx.clone();
        std::thread::spawn(move || {
            image_worker(request_rx, result_tx, worker_states, worker_ctx);
        });

        Self {
            ctx,
            states,
            request_tx,
            result_rx,
        }
    }

    /// Request an image unless it is already loading or loaded
    pub fn request(&self, image: &ImageRef) {
        let mut states = self.states.write();
        if states.contains_key(image) {
            return;
        }

        states.insert(image.clone(), ImageState::Loading);
        if self.request_tx.send(image.clone()).is_err() {
            states.insert(image.clone(), ImageState::Failed("loader stopped".to_string()));
        }
    }

    /// Request every image up front
    pub fn preload<'a>(&self, images: impl IntoIterator<Item = &'a ImageRef>) {
        for image in images {
            self.request(image);
        }
    }

    /// Current state of an image, if it was ever requested
    pub fn state(&self, image: &ImageRef) -> Option<ImageState> {
        self.states.read().get(image).cloned()
    }

    /// Upload images decoded since the last call
    pub fn update(&mut self) {
        while let Ok(decoded) = self.result_rx.try_recv() {
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [decoded.width as usize, decoded.height as usize],
                &decoded.pixels,
            );
            let handle = self.ctx.load_texture(
                decoded.image.key(),
                color_image,
                egui::TextureOptions::LINEAR,
            );
            tracing::debug!(
                "Loaded image {} ({}x{})",
                decoded.image,
                decoded.width,
                decoded.height
            );
            self.states.write().insert(decoded.image, ImageState::Ready(handle));
        }
    }
}

impl TextureSource for ImageLoader {
    fn texture_for(&mut self, image: &ImageRef) -> Option<egui::TextureId> {
        if let Some(state) = self.states.read().get(image) {
            return match state {
                ImageState::Ready(handle) => Some(handle.id()),
                ImageState::Loading | ImageState::Failed(_) => None,
            };
        }
        self.request(image);
        None
    }
}

/// Worker thread fetching and decoding requested images
fn image_worker(
    mut request_rx: mpsc::UnboundedReceiver<ImageRef>,
    result_tx: mpsc::UnboundedSender<DecodedImage>,
    states: Arc<RwLock<HashMap<ImageRef, ImageState>>>,
    ctx: egui::Context,
) {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create image loader runtime: {}", e);
            return;
        }
    };
    let client = reqwest::Client::new();

    rt.block_on(async {
        while let Some(image) = request_rx.recv().await {
            match load_image(&client, &image, MAX_TEXTURE_SIDE).await {
                Ok(decoded) => {
                    if result_tx.send(decoded).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to load image {}: {}", image, e);
                    states.write().insert(image, ImageState::Failed(e.to_string()));
                }
            }
            ctx.request_repaint();
        }
    });
}

/// Fetch and decode one image
pub async fn load_image(
    client: &reqwest::Client,
    image: &ImageRef,
    max_side: u32,
) -> Result<DecodedImage, ImageLoadError> {
    let bytes = match image {
        ImageRef::Path(path) => tokio::fs::read(path).await?,
        ImageRef::Url(url) => client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec(),
    };

    let decoded = image::load_from_memory(&bytes)?;
    let decoded = fit_within(decoded, max_side);
    let (width, height) = decoded.dimensions();

    Ok(DecodedImage {
        image: image.clone(),
        pixels: decoded.to_rgba8().into_raw(),
        width,
        height,
    })
}

/// Downscale so neither side exceeds `max_side`, keeping the aspect ratio
fn fit_within(img: DynamicImage, max_side: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_side && height <= max_side {
        return img;
    }
    img.thumbnail(max_side, max_side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::Path;
    use std::time::{Duration, Instant};

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([38, 208, 206, 255]))
            .save(path)
            .unwrap();
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_load_local_image_is_downscaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_png(&path, 1024, 256);

        let image = ImageRef::Path(path);
        let decoded = block_on(load_image(&reqwest::Client::new(), &image, 512)).unwrap();

        assert_eq!((decoded.width, decoded.height), (512, 128));
        assert_eq!(decoded.pixels.len(), 512 * 128 * 4);
        assert_eq!(&decoded.pixels[..4], &[38, 208, 206, 255]);
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();

        let missing = ImageRef::Path(dir.path().join("absent.png"));
        assert!(matches!(
            block_on(load_image(&client, &missing, 512)),
            Err(ImageLoadError::Io(_))
        ));

        let corrupt_path = dir.path().join("corrupt.png");
        std::fs::write(&corrupt_path, b"not an image").unwrap();
        let corrupt = ImageRef::Path(corrupt_path);
        assert!(matches!(
            block_on(load_image(&client, &corrupt, 512)),
            Err(ImageLoadError::Decode(_))
        ));
    }

    #[test]
    fn test_loader_uploads_texture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.png");
        write_png(&path, 8, 8);
        let image = ImageRef::Path(path);
        let broken = ImageRef::Path(dir.path().join("missing.png"));

        let mut loader = ImageLoader::new(egui::Context::default());
        assert!(loader.texture_for(&image).is_none());
        assert!(loader.texture_for(&broken).is_none());

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut texture = None;
        while texture.is_none() && Instant::now() < deadline {
            loader.update();
            texture = loader.texture_for(&image);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(texture.is_some());

        while !matches!(loader.state(&broken), Some(ImageState::Failed(_)))
            && Instant::now() < deadline
        {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(matches!(loader.state(&broken), Some(ImageState::Failed(_))));
        assert!(loader.texture_for(&broken).is_none());
    }
}
