//! Image stores: where the save nodes fetch decoded images by name.
//!
//! The host owns image storage; nodes only see the [`ImageStore`] trait.
//! Two implementations are provided:
//! - **disk**: images are files in a directory, addressed by file name
//! - **memory**: a name → image map for embedding hosts and tests

pub mod disk;
pub mod memory;

pub use disk::DiskImageStore;
pub use memory::MemoryImageStore;

use image::DynamicImage;

use crate::error::StoreResult;

/// Lookup of decoded images by name.
pub trait ImageStore: Send + Sync {
    /// Fetch the image registered under `name`.
    ///
    /// Returns [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// when nothing is registered under that name.
    fn get(&self, name: &str) -> StoreResult<DynamicImage>;
}
