use std::collections::BTreeSet;

use crate::{
    error::{Result, SpecError},
    spec::{ModelSpec, network},
};

const MODEL_TYPES: &[&str] = &["vae", "gan"];
const NETWORKS: &[&str] = &[
    "conv_decoder",
    "conv_encoder",
    "test_decoder",
    "test_encoder",
    "resnet_decoder",
    "resnet_encoder",
];
const OPTIMIZERS: &[&str] = &["adam"];
const LIKELIHOODS: &[&str] = &["bernoulli", "continuous_bernoulli", "normal"];

/// The names a consuming framework knows how to construct.
///
/// A category left as `None` accepts any name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    model_types: Option<BTreeSet<String>>,
    networks: Option<BTreeSet<String>>,
    optimizers: Option<BTreeSet<String>>,
    likelihoods: Option<BTreeSet<String>>,
}

impl Registry {
    /// A registry that accepts every name.
    pub fn unrestricted() -> Self {
        Self {
            model_types: None,
            networks: None,
            optimizers: None,
            likelihoods: None,
        }
    }

    pub fn with_model_type(mut self, name: impl Into<String>) -> Self {
        insert(&mut self.model_types, name);
        self
    }

    pub fn with_network(mut self, name: impl Into<String>) -> Self {
        insert(&mut self.networks, name);
        self
    }

    pub fn with_optimizer(mut self, name: impl Into<String>) -> Self {
        insert(&mut self.optimizers, name);
        self
    }

    pub fn with_likelihood(mut self, name: impl Into<String>) -> Self {
        insert(&mut self.likelihoods, name);
        self
    }

    /// Checks every registry-backed name in `spec`.
    ///
    /// Network names referring to spec files are not looked up.
    ///
    /// # Errors
    /// A schema error naming the first unknown field.
    pub fn check(&self, spec: &ModelSpec) -> Result<()> {
        check_name("model_type", &self.model_types, spec.model_type())?;

        for (field, name) in [
            ("inference_net", spec.inference_net()),
            ("generative_net", spec.generative_net()),
        ] {
            if !network::is_spec_file(name) {
                check_name(field, &self.networks, name)?;
            }
        }

        check_name("optimizer", &self.optimizers, spec.optimizer())?;
        check_name("likelihood", &self.likelihoods, spec.likelihood())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            model_types: Some(set(MODEL_TYPES)),
            networks: Some(set(NETWORKS)),
            optimizers: Some(set(OPTIMIZERS)),
            likelihoods: Some(set(LIKELIHOODS)),
        }
    }
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn insert(names: &mut Option<BTreeSet<String>>, name: impl Into<String>) {
    names.get_or_insert_with(BTreeSet::new).insert(name.into());
}

fn check_name(field: &str, known: &Option<BTreeSet<String>>, name: &str) -> Result<()> {
    let Some(known) = known else {
        return Ok(());
    };

    if known.contains(name) {
        return Ok(());
    }

    let expected = known
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(SpecError::schema(
        field,
        format!("unknown name `{name}`, expected one of: {expected}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_accepts_anything() {
        assert!(check_name("optimizer", &None, "lbfgs").is_ok());
    }

    #[test]
    fn custom_registry_restricts_only_configured_categories() {
        let registry = Registry::unrestricted().with_optimizer("sgd");

        assert!(check_name("optimizer", &registry.optimizers, "sgd").is_ok());
        assert!(check_name("optimizer", &registry.optimizers, "adam").is_err());
        assert!(registry.networks.is_none());
    }

    #[test]
    fn error_lists_known_names() {
        let err = check_name("likelihood", &Some(set(LIKELIHOODS)), "poisson").unwrap_err();

        assert_eq!(err.field(), Some("likelihood"));
        assert!(err.to_string().contains("continuous_bernoulli"));
    }
}
