/// Sprite cache
///
/// Images referenced by the dataset are bulk-loaded once during the
/// loading screen and kept decoded for the rest of the session. Files
/// that are missing or fail to decode are logged and skipped; panels
/// show a placeholder for them.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use iced::widget::image::Handle;

#[allow(unused_imports)]
use log::{debug, info, warn, error};

/// RGBA pixels fresh off the decoder, before a display handle exists.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SpriteCache {
    sprites: HashMap<String, Sprite>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_decoded(&mut self, file_name: &str, decoded: DecodedImage) {
        let sprite = Sprite {
            handle: Handle::from_rgba(decoded.width, decoded.height, decoded.rgba),
            width: decoded.width,
            height: decoded.height,
        };
        self.sprites.insert(file_name.to_string(), sprite);
    }

    pub fn get(&self, file_name: &str) -> Option<&Sprite> {
        self.sprites.get(file_name)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.sprites.contains_key(file_name)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// Directory the image file names resolve against.
pub fn image_dir(data_dir: &Path, subfolder: &str) -> PathBuf {
    if subfolder.is_empty() {
        data_dir.to_path_buf()
    } else {
        data_dir.join(subfolder)
    }
}

async fn load_one(path: PathBuf) -> Option<DecodedImage> {
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read image {:?}: {}", path, e);
            return None;
        }
    };

    match image::load_from_memory(&bytes) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            Some(DecodedImage {
                width,
                height,
                rgba: rgba.into_raw(),
            })
        }
        Err(e) => {
            warn!("Failed to decode image {:?}: {}", path, e);
            None
        }
    }
}

/// Load one batch of image files concurrently. Returns every requested
/// name so the caller can account for failures in its progress.
pub async fn load_batch(dir: PathBuf, names: Vec<String>) -> Vec<(String, Option<DecodedImage>)> {
    let futures = names.into_iter().map(|name| {
        let path = dir.join(&name);
        async move { (name, load_one(path).await) }
    });
    join_all(futures).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(width: u32, height: u32) -> DecodedImage {
        DecodedImage {
            width,
            height,
            rgba: vec![255; (width * height * 4) as usize],
        }
    }

    #[test]
    fn test_cache_bookkeeping() {
        let mut cache = SpriteCache::new();
        assert!(cache.is_empty());
        cache.insert_decoded("mill.png", decoded(2, 3));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("mill.png"));
        let sprite = cache.get("mill.png").unwrap();
        assert_eq!((sprite.width, sprite.height), (2, 3));
        assert!(cache.get("other.png").is_none());
    }

    #[test]
    fn test_image_dir_with_and_without_subfolder() {
        let data_dir = Path::new("/data");
        assert_eq!(image_dir(data_dir, ""), PathBuf::from("/data"));
        assert_eq!(image_dir(data_dir, "images"), PathBuf::from("/data/images"));
    }

    #[tokio::test]
    async fn test_load_batch_skips_missing_and_decodes_valid() {
        let dir = std::env::temp_dir().join(format!("hoverlens_sprites_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join("ok.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([120, 40, 40, 255]))
            .save(&path)
            .unwrap();

        let results = load_batch(
            dir.clone(),
            vec!["ok.png".to_string(), "missing.png".to_string()],
        )
        .await;

        assert_eq!(results.len(), 2);
        let ok = results.iter().find(|(name, _)| name == "ok.png").unwrap();
        let decoded = ok.1.as_ref().unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 2));
        let missing = results.iter().find(|(name, _)| name == "missing.png").unwrap();
        assert!(missing.1.is_none());

        std::fs::remove_dir_all(&dir).ok();
    }
}
