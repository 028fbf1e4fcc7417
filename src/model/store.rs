//! Decoded image storage

use image::RgbImage;
use indexmap::IndexMap;

use super::cluster::ImageKey;

/// Decoded RGB8 images keyed by [`ImageKey`]
///
/// Keeps insertion order so that the reference cell shape is always taken
/// from the same entry.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: IndexMap<ImageKey, RgbImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an image, returning the previous one stored under `key`
    pub fn insert(&mut self, key: impl Into<ImageKey>, image: RgbImage) -> Option<RgbImage> {
        self.images.insert(key.into(), image)
    }

    pub fn get(&self, key: &ImageKey) -> Option<&RgbImage> {
        self.images.get(key)
    }

    pub fn contains(&self, key: &ImageKey) -> bool {
        self.images.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ImageKey> {
        self.images.keys()
    }

    /// `(height, width)` of the first inserted image
    ///
    /// All images are expected to share this shape.
    pub fn cell_shape(&self) -> Option<(u32, u32)> {
        self.images
            .values()
            .next()
            .map(|img| (img.height(), img.width()))
    }
}

impl<K: Into<ImageKey>> FromIterator<(K, RgbImage)> for ImageStore {
    fn from_iter<I: IntoIterator<Item = (K, RgbImage)>>(iter: I) -> Self {
        ImageStore {
            images: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
