use std::{fs, io::Read, path::Path};

use log::{debug, info};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{
    error::{Result, SpecError},
    registry::Registry,
    spec::ModelSpec,
};

/// Parses and validates model spec records against a [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct Loader {
    registry: Registry,
}

impl Loader {
    /// Creates a new `Loader`.
    ///
    /// # Arguments
    /// * `registry` - The names the consuming framework can construct.
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parses a single JSON record.
    ///
    /// # Arguments
    /// * `source` - The serialized record.
    ///
    /// # Returns
    /// The validated spec, a `MalformedInput` error on invalid syntax or a
    /// `SchemaValidation` error on a missing or out of range field.
    pub fn load(&self, source: impl AsRef<[u8]>) -> Result<ModelSpec> {
        let value: Value = serde_json::from_slice(source.as_ref())?;

        let Value::Object(record) = value else {
            return Err(SpecError::malformed(format!(
                "expected a JSON object, got {}",
                crate::spec::kind(&value)
            )));
        };

        let spec = ModelSpec::from_record(record)?;
        self.registry.check(&spec)?;

        debug!(
            "loaded spec {} ({}, latent_dim={}, epochs={})",
            spec.name(),
            spec.model_type(),
            spec.latent_dim(),
            spec.epochs()
        );
        Ok(spec)
    }

    /// Reads the whole `reader` and parses it.
    pub fn load_reader<R: Read>(&self, mut reader: R) -> Result<ModelSpec> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load(buf)
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<ModelSpec> {
        let path = path.as_ref();
        info!("loading model spec from {}", path.display());
        self.load(fs::read(path)?)
    }

    /// Reads the whole async `reader` and parses it.
    pub async fn load_async<R: AsyncRead + Unpin>(&self, mut reader: R) -> Result<ModelSpec> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        self.load(buf)
    }

    pub async fn load_file_async<P: AsRef<Path>>(&self, path: P) -> Result<ModelSpec> {
        let path = path.as_ref();
        info!("loading model spec from {}", path.display());
        self.load(tokio::fs::read(path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"{"model_type": "vae", "latent_dim": 2, "inference_net": "conv_encoder",
        "inference_net_kwargs": {}, "generative_net": "conv_decoder",
        "generative_net_kwargs": {}, "optimizer": "adam", "opt_kwargs": {},
        "epochs": 1, "batch_size": 1, "likelihood": "bernoulli", "name": "tiny"}"#;

    #[test]
    fn non_object_root_is_malformed() {
        for source in ["[1, 2]", "42", "\"vae\"", "null"] {
            let err = Loader::default().load(source).unwrap_err();
            assert!(
                matches!(err, SpecError::MalformedInput { position: None, .. }),
                "{source}: {err}"
            );
        }
    }

    #[test]
    fn empty_source_is_malformed() {
        assert!(Loader::default().load("").unwrap_err().is_malformed());
    }

    #[test]
    fn reader_and_bytes_agree() {
        let loader = Loader::default();
        assert_eq!(
            loader.load_reader(SPEC.as_bytes()).unwrap(),
            loader.load(SPEC).unwrap()
        );
    }

    #[test]
    fn registry_is_applied() {
        let registry = Registry::unrestricted().with_likelihood("normal");
        let err = Loader::new(registry).load(SPEC).unwrap_err();
        assert_eq!(err.field(), Some("likelihood"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Loader::default()
            .load_file("/nonexistent/model_spec.json")
            .unwrap_err();
        assert!(matches!(err, SpecError::Io(_)));
    }
}
