//! Loading and validation of generative model specification records.
//!
//! A record is a JSON object naming the model family, the encoder and decoder
//! networks with their constructor options, the optimizer and the training
//! schedule. [`load`] turns one into an immutable [`ModelSpec`] that a training
//! framework can build its components from.

pub mod error;
mod layout;
mod loader;
mod registry;
pub mod spec;

use std::path::Path;

pub use error::{Result, SpecError};
pub use layout::{Layout, SAVED_MODELS_DIR_VAR, SPECS_DIR_VAR};
pub use loader::Loader;
pub use registry::Registry;
pub use spec::{KwargValue, Kwargs, ModelSpec, NetworkSource, OptimizerConfig};

/// Parses a record using the default registry.
///
/// # Errors
/// Returns a `SpecError` if the source is malformed or fails validation.
pub fn load(source: impl AsRef<[u8]>) -> Result<ModelSpec> {
    Loader::default().load(source)
}

/// Reads and parses the record at `path` using the default registry.
///
/// # Errors
/// Returns a `SpecError` if the file cannot be read, is malformed or fails
/// validation.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<ModelSpec> {
    Loader::default().load_file(path)
}
