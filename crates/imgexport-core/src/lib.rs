//! imgexport core - image export nodes for pipeline hosts.
//!
//! Each node takes the name of an image held by the host, validates a few
//! bounded encoder parameters and writes the image in one format:
//!
//! ```text
//! ImageStore::get(name) → validate fields → codec → {outputs}/invoke_image_export/{stamp}-{id}.{ext}
//! ```
//!
//! The path of the written file is the node's only output.
//!
//! # Usage
//!
//! ```rust,ignore
//! use imgexport_core::{AnyInvocation, Config, Exporter, SaveJpegInvocation};
//!
//! fn main() -> imgexport_core::Result<()> {
//!     let exporter = Exporter::from_config(Config::load()?);
//!     let record = AnyInvocation::Jpeg(SaveJpegInvocation::new("render.png"));
//!     let output = exporter.run(&record)?;
//!     println!("{}", output.path);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod encode;
pub mod error;
pub mod format;
pub mod invocation;
pub mod output;
pub mod output_path;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{
    CodecError, ConfigError, EncodeError, ExportError, FieldError, Result, StoreError,
    StoreResult,
};
pub use format::ExportFormat;
pub use invocation::{
    registry, AnyInvocation, ImageField, Invocation, InvocationContext, InvocationSpec,
    PathOutput, SaveAvifInvocation, SaveJpegInvocation, SavePngInvocation, SaveTiffInvocation,
    SaveWebpInvocation,
};
pub use output::{OutputFormat, OutputWriter};
pub use store::{DiskImageStore, ImageStore, MemoryImageStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs invocation records against one image store and configuration.
pub struct Exporter {
    config: Config,
    store: Box<dyn ImageStore>,
}

impl Exporter {
    /// Create an exporter with an explicit image store.
    pub fn new(config: Config, store: Box<dyn ImageStore>) -> Self {
        tracing::debug!("Initializing imgexport v{}", VERSION);
        Self { config, store }
    }

    /// Create an exporter reading images from `store.images_dir`.
    pub fn from_config(config: Config) -> Self {
        let store = DiskImageStore::from_config(&config);
        Self::new(config, Box::new(store))
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Context handed to nodes run by this exporter.
    pub fn context(&self) -> InvocationContext<'_> {
        InvocationContext::new(self.store.as_ref(), &self.config)
    }

    /// Validate and execute one record.
    pub fn run(&self, record: &AnyInvocation) -> Result<PathOutput> {
        let start = std::time::Instant::now();
        let spec = record.spec();
        tracing::debug!("Running {} on {:?}", spec.id, record.image_name());

        let output = record.execute(&self.context())?;

        tracing::debug!(
            "{} finished in {:?}: {}",
            spec.id,
            start.elapsed(),
            output.path
        );
        Ok(output)
    }
}
