use super::{KwargValue, Kwargs};
use crate::error::{Result, SpecError};

const ADAM_LEARNING_RATE: f64 = 0.001;
const ADAM_BETA_1: f64 = 0.9;
const ADAM_BETA_2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-7;

/// Typed optimizer settings resolved from `optimizer` and `opt_kwargs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptimizerConfig {
    Adam {
        learning_rate: f64,
        beta_1: f64,
        beta_2: f64,
        epsilon: f64,
    },
}

impl OptimizerConfig {
    /// Resolves the settings for the named optimizer.
    ///
    /// # Arguments
    /// * `name` - The registered optimizer name.
    /// * `kwargs` - The optimizer's hyperparameters, missing ones take their
    ///   usual defaults.
    ///
    /// # Errors
    /// A schema error if the optimizer is unsupported or a kwarg is unknown
    /// or out of range.
    pub fn from_kwargs(name: &str, kwargs: &Kwargs) -> Result<Self> {
        match name {
            "adam" => {
                let mut learning_rate = ADAM_LEARNING_RATE;
                let mut beta_1 = ADAM_BETA_1;
                let mut beta_2 = ADAM_BETA_2;
                let mut epsilon = ADAM_EPSILON;

                for (key, value) in kwargs.iter() {
                    let field = format!("opt_kwargs.{key}");
                    let slot = match key {
                        "learning_rate" => &mut learning_rate,
                        "beta_1" => &mut beta_1,
                        "beta_2" => &mut beta_2,
                        "epsilon" => &mut epsilon,
                        _ => {
                            return Err(SpecError::schema(field, "unknown adam hyperparameter"));
                        }
                    };
                    *slot = number(&field, value)?;
                }

                if learning_rate <= 0.0 {
                    return Err(SpecError::schema(
                        "opt_kwargs.learning_rate",
                        "must be positive",
                    ));
                }
                for (key, beta) in [("beta_1", beta_1), ("beta_2", beta_2)] {
                    if !(0.0..1.0).contains(&beta) {
                        return Err(SpecError::schema(
                            format!("opt_kwargs.{key}"),
                            "must be in [0, 1)",
                        ));
                    }
                }
                if epsilon <= 0.0 {
                    return Err(SpecError::schema("opt_kwargs.epsilon", "must be positive"));
                }

                Ok(Self::Adam {
                    learning_rate,
                    beta_1,
                    beta_2,
                    epsilon,
                })
            }
            other => Err(SpecError::schema(
                "optimizer",
                format!("no settings are known for optimizer `{other}`"),
            )),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        match *self {
            Self::Adam { learning_rate, .. } => learning_rate,
        }
    }
}

fn number(field: &str, value: &KwargValue) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| SpecError::schema(field, format!("expected a number, got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adam_fills_defaults() {
        let kwargs: Kwargs = [("learning_rate", KwargValue::Float(0.0001))]
            .into_iter()
            .collect();

        let config = OptimizerConfig::from_kwargs("adam", &kwargs).unwrap();
        assert_eq!(
            config,
            OptimizerConfig::Adam {
                learning_rate: 0.0001,
                beta_1: 0.9,
                beta_2: 0.999,
                epsilon: 1e-7,
            }
        );
        assert_eq!(config.learning_rate(), 0.0001);
    }

    #[test]
    fn adam_accepts_integer_values() {
        let kwargs: Kwargs = [("epsilon", KwargValue::Int(1))].into_iter().collect();
        let OptimizerConfig::Adam { epsilon, .. } =
            OptimizerConfig::from_kwargs("adam", &kwargs).unwrap();
        assert_eq!(epsilon, 1.0);
    }

    #[test]
    fn adam_rejects_unknown_key() {
        let kwargs: Kwargs = [("momentum", KwargValue::Float(0.9))].into_iter().collect();
        let err = OptimizerConfig::from_kwargs("adam", &kwargs).unwrap_err();
        assert_eq!(err.field(), Some("opt_kwargs.momentum"));
    }

    #[test]
    fn adam_rejects_bad_beta() {
        let kwargs: Kwargs = [("beta_2", KwargValue::Float(1.0))].into_iter().collect();
        let err = OptimizerConfig::from_kwargs("adam", &kwargs).unwrap_err();
        assert_eq!(err.field(), Some("opt_kwargs.beta_2"));
    }

    #[test]
    fn adam_rejects_non_numeric() {
        let kwargs: Kwargs = [("learning_rate", KwargValue::Str("fast".into()))]
            .into_iter()
            .collect();
        let err = OptimizerConfig::from_kwargs("adam", &kwargs).unwrap_err();
        assert_eq!(err.field(), Some("opt_kwargs.learning_rate"));
    }

    #[test]
    fn unsupported_optimizer() {
        let err = OptimizerConfig::from_kwargs("rmsprop", &Kwargs::new()).unwrap_err();
        assert_eq!(err.field(), Some("optimizer"));
    }
}
