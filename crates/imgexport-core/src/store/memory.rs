//! In-memory image store.

use image::DynamicImage;
use std::collections::HashMap;

use super::ImageStore;
use crate::error::{StoreError, StoreResult};

/// Image store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryImageStore {
    images: HashMap<String, DynamicImage>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `image` under `name`, replacing any previous image.
    pub fn insert(&mut self, name: impl Into<String>, image: DynamicImage) {
        self.images.insert(name.into(), image);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_image(mut self, name: impl Into<String>, image: DynamicImage) -> Self {
        self.insert(name, image);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageStore for MemoryImageStore {
    fn get(&self, name: &str) -> StoreResult<DynamicImage> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
