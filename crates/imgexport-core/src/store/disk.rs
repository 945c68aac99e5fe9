//! Directory-backed image store with pre-decode validation.

use image::{GenericImageView, ImageReader};
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};

use super::ImageStore;
use crate::config::{Config, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::format::{sniff, SNIFF_LEN};

/// Serves images from files in a single directory.
///
/// An image's name is its file name; names that would leave the directory
/// are rejected.
pub struct DiskImageStore {
    root: PathBuf,
    limits: StoreConfig,
}

impl DiskImageStore {
    /// Create a store rooted at `root` with the given limits.
    pub fn new(root: impl Into<PathBuf>, limits: StoreConfig) -> Self {
        Self {
            root: root.into(),
            limits,
        }
    }

    /// Create a store from the `[store]` section of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.images_dir(), config.store.clone())
    }

    /// Directory images are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> StoreResult<PathBuf> {
        let mut components = Path::new(name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || name.contains(['/', '\\']) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    /// Check file size and magic bytes before paying for a decode.
    fn check_file(&self, name: &str, path: &Path) -> StoreResult<()> {
        let metadata = std::fs::metadata(path).map_err(|e| StoreError::Decode {
            name: name.to_string(),
            message: format!("Cannot read metadata: {}", e),
        })?;

        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(StoreError::FileTooLarge {
                name: name.to_string(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let mut header = [0u8; SNIFF_LEN];
        let bytes_read = std::fs::File::open(path)
            .and_then(|mut file| file.read(&mut header))
            .map_err(|e| StoreError::Decode {
                name: name.to_string(),
                message: format!("Cannot open file: {}", e),
            })?;

        if sniff(&header[..bytes_read]).is_none() {
            return Err(StoreError::UnsupportedFormat {
                name: name.to_string(),
                reason: "unrecognized image format (invalid magic bytes)".to_string(),
            });
        }
        Ok(())
    }
}

impl ImageStore for DiskImageStore {
    fn get(&self, name: &str) -> StoreResult<image::DynamicImage> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.check_file(name, &path)?;

        let bytes = std::fs::read(&path).map_err(|e| StoreError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| StoreError::Decode {
                name: name.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?
            .decode()
            .map_err(|e| StoreError::Decode {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        let (width, height) = image.dimensions();
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(StoreError::ImageTooLarge {
                name: name.to_string(),
                width,
                height,
                max_dim,
            });
        }

        tracing::trace!("Loaded {:?} ({}x{}) from {:?}", name, width, height, path);
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::gradient_rgb;
    use image::DynamicImage;

    fn store_with_png() -> (tempfile::TempDir, DiskImageStore) {
        let dir = tempfile::tempdir().unwrap();
        DynamicImage::ImageRgb8(gradient_rgb(20, 10))
            .save(dir.path().join("ramp.png"))
            .unwrap();
        let store = DiskImageStore::new(dir.path(), StoreConfig::default());
        (dir, store)
    }

    #[test]
    fn test_get_decodes_by_content() {
        let (dir, store) = store_with_png();
        // Misnamed extension: format is detected from the bytes
        std::fs::copy(dir.path().join("ramp.png"), dir.path().join("ramp.jpg")).unwrap();

        let image = store.get("ramp.jpg").unwrap();
        assert_eq!(image.dimensions(), (20, 10));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, store) = store_with_png();
        let err = store.get("nope.png").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(name) if name == "nope.png"));
    }

    #[test]
    fn test_directory_is_not_found() {
        let (dir, store) = store_with_png();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        assert!(matches!(store.get("sub"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_names_cannot_escape_root() {
        let (_dir, store) = store_with_png();
        for name in ["../ramp.png", "a/ramp.png", "/etc/passwd", "..", ".", "", "a\\b.png"] {
            assert!(
                matches!(store.get(name), Err(StoreError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_image_rejected_before_decode() {
        let (dir, store) = store_with_png();
        std::fs::write(dir.path().join("notes.png"), b"definitely not an image").unwrap();
        let err = store.get("notes.png").unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_file_size_limit() {
        let (dir, _) = store_with_png();
        let mut big = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        big.resize(1024 * 1024 + 1, 0);
        std::fs::write(dir.path().join("big.png"), big).unwrap();

        let limits = StoreConfig {
            max_file_size_mb: 1,
            ..StoreConfig::default()
        };
        let store = DiskImageStore::new(dir.path(), limits);
        let err = store.get("big.png").unwrap_err();
        assert!(matches!(err, StoreError::FileTooLarge { max_mb: 1, .. }));
    }

    #[test]
    fn test_huge_file_size_limit_does_not_overflow() {
        let (dir, _) = store_with_png();
        let limits = StoreConfig {
            max_file_size_mb: u64::MAX,
            ..StoreConfig::default()
        };
        let store = DiskImageStore::new(dir.path(), limits);
        assert_eq!(store.get("ramp.png").unwrap().dimensions(), (20, 10));
    }

    #[test]
    fn test_dimension_limit() {
        let (dir, _) = store_with_png();
        let limits = StoreConfig {
            max_image_dimension: 16,
            ..StoreConfig::default()
        };
        let store = DiskImageStore::new(dir.path(), limits);
        let err = store.get("ramp.png").unwrap_err();
        assert!(matches!(
            err,
            StoreError::ImageTooLarge {
                width: 20,
                height: 10,
                max_dim: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_image_is_decode_error() {
        let (dir, store) = store_with_png();
        let bytes = std::fs::read(dir.path().join("ramp.png")).unwrap();
        std::fs::write(dir.path().join("cut.png"), &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(store.get("cut.png"), Err(StoreError::Decode { .. })));
    }
}
