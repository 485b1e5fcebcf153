use std::{
    env,
    path::{Path, PathBuf},
};

/// Environment variable overriding [`Layout::specs_dir`].
pub const SPECS_DIR_VAR: &str = "MODEL_SPECS_DIR";
/// Environment variable overriding [`Layout::saved_models_dir`].
pub const SAVED_MODELS_DIR_VAR: &str = "SAVED_MODELS_DIR";

const DEFAULT_SPECS_DIR: &str = "../model_specs/network_specs";
const DEFAULT_SAVED_MODELS_DIR: &str = "../data/saved_models";

/// Directories a consumer resolves a spec's relative resources against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    specs_dir: PathBuf,
    saved_models_dir: PathBuf,
}

impl Layout {
    pub fn new(specs_dir: impl Into<PathBuf>, saved_models_dir: impl Into<PathBuf>) -> Self {
        Self {
            specs_dir: specs_dir.into(),
            saved_models_dir: saved_models_dir.into(),
        }
    }

    /// Reads the layout from the process environment, falling back to the
    /// defaults for unset variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the layout from an arbitrary variable lookup.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let specs_dir = lookup(SPECS_DIR_VAR).unwrap_or_else(|| DEFAULT_SPECS_DIR.to_string());
        let saved_models_dir =
            lookup(SAVED_MODELS_DIR_VAR).unwrap_or_else(|| DEFAULT_SAVED_MODELS_DIR.to_string());

        Self::new(specs_dir, saved_models_dir)
    }

    /// Directory holding serialized network descriptions.
    pub fn specs_dir(&self) -> &Path {
        &self.specs_dir
    }

    /// Directory trained networks are saved into.
    pub fn saved_models_dir(&self) -> &Path {
        &self.saved_models_dir
    }

    /// Path of a network spec file. `file` is expected to be relative, a
    /// rooted path replaces `specs_dir` entirely.
    pub fn network_spec_path(&self, file: &str) -> PathBuf {
        self.specs_dir.join(file)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(DEFAULT_SPECS_DIR, DEFAULT_SAVED_MODELS_DIR)
    }
}
