mod fields;
mod kwargs;
mod model;
pub(crate) mod network;
mod optimizer;
mod schedule;

use serde_json::Value;

pub use kwargs::{KwargValue, Kwargs};
pub use model::{AdversarialSettings, ArtifactPaths, GAN_MODEL_TYPE, ModelSpec, NORMAL_LIKELIHOOD};
pub use network::NetworkSource;
pub use optimizer::OptimizerConfig;
pub use schedule::{BetaSchedule, DEFAULT_CYCLE_LENGTH};

/// A short name for the JSON type of `value`, used in error messages.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
