use std::{num::NonZeroUsize, path::PathBuf};

use log::{debug, warn};
use serde_json::{Map, Value, json};

use super::{BetaSchedule, Kwargs, NetworkSource, OptimizerConfig, fields::Fields, network};
use crate::{
    error::{Result, SpecError},
    layout::Layout,
};

/// Model family whose records carry [`AdversarialSettings`].
pub const GAN_MODEL_TYPE: &str = "gan";
/// Likelihood family for which `error_trainable` is meaningful.
pub const NORMAL_LIKELIHOOD: &str = "normal";

const DEFAULT_VAE_BETA: f64 = 1.0;

/// Training settings specific to adversarial models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdversarialSettings {
    pub learning_rate: f64,
    pub gradient_penalty: f64,
    pub gen_train_steps: NonZeroUsize,
}

/// Where the trained networks of a spec get saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub inference: PathBuf,
    pub generative: PathBuf,
}

/// A beta schedule as written in the record.
#[derive(Debug, Clone, PartialEq)]
struct ScheduleEntry {
    label: String,
    schedule: BetaSchedule,
    cycle_length: Option<NonZeroUsize>,
}

/// A validated, immutable generative model specification.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    model_type: String,
    latent_dim: NonZeroUsize,
    inference_net: String,
    inference_net_kwargs: Kwargs,
    generative_net: String,
    generative_net_kwargs: Kwargs,
    optimizer: String,
    opt_kwargs: Kwargs,
    epochs: NonZeroUsize,
    batch_size: NonZeroUsize,
    likelihood: String,
    name: String,
    vae_beta: f64,
    image_dims: Option<Vec<NonZeroUsize>>,
    error_trainable: bool,
    beta_schedule: Option<ScheduleEntry>,
    adversarial: Option<AdversarialSettings>,
    extra: Map<String, Value>,
}

impl ModelSpec {
    /// Validates a raw record.
    ///
    /// # Errors
    /// A schema error naming the first field that is missing or out of range.
    pub(crate) fn from_record(record: Map<String, Value>) -> Result<Self> {
        let mut fields = Fields::new(record);

        let model_type = fields.string("model_type")?;
        let latent_dim = fields.positive("latent_dim")?;
        let inference_net = fields.string("inference_net")?;
        network::check_name("inference_net", &inference_net)?;
        let inference_net_kwargs = fields.kwargs("inference_net_kwargs")?;
        let generative_net = fields.string("generative_net")?;
        network::check_name("generative_net", &generative_net)?;
        let generative_net_kwargs = fields.kwargs("generative_net_kwargs")?;
        let optimizer = fields.string("optimizer")?;
        let opt_kwargs = fields.kwargs("opt_kwargs")?;
        let epochs = fields.positive("epochs")?;
        let batch_size = fields.positive("batch_size")?;
        let likelihood = fields.string("likelihood")?;
        let name = fields.string("name")?;

        let vae_beta = match fields.opt_non_negative("vae_beta")? {
            Some(beta) => beta,
            None => {
                debug!("{name}: no vae_beta given, using {DEFAULT_VAE_BETA}");
                DEFAULT_VAE_BETA
            }
        };

        if let Some(lr) = opt_kwargs.get("learning_rate") {
            match lr.as_f64() {
                Some(x) if x > 0.0 => {}
                _ => {
                    return Err(SpecError::schema(
                        "opt_kwargs.learning_rate",
                        format!("must be a positive number, got {lr}"),
                    ));
                }
            }
        }

        let image_dims = fields.opt_dims("image_dims")?;

        let error_trainable = fields.opt_bool("error_trainable")?;
        if error_trainable.is_some() && likelihood != NORMAL_LIKELIHOOD {
            warn!("{name}: error_trainable has no effect with the {likelihood} likelihood");
        }

        let beta_schedule = Self::take_beta_schedule(&mut fields, &name)?;

        let adversarial = if model_type == GAN_MODEL_TYPE {
            Some(AdversarialSettings {
                learning_rate: fields.positive_real("learning_rate")?,
                gradient_penalty: fields.non_negative("gradient_penalty")?,
                gen_train_steps: fields.positive("gen_train_steps")?,
            })
        } else {
            None
        };

        let extra = fields.into_rest();
        if !extra.is_empty() {
            let keys = extra.keys().map(String::as_str).collect::<Vec<_>>();
            debug!("{name}: keeping uninterpreted keys {keys:?}");
        }

        Ok(Self {
            model_type,
            latent_dim,
            inference_net,
            inference_net_kwargs,
            generative_net,
            generative_net_kwargs,
            optimizer,
            opt_kwargs,
            epochs,
            batch_size,
            likelihood,
            name,
            vae_beta,
            image_dims,
            error_trainable: error_trainable.unwrap_or(false),
            beta_schedule,
            adversarial,
            extra,
        })
    }

    /// Reads `beta_schedule` and, for cyclic schedules, `beta_cycle_length`.
    /// A cycle length no schedule uses stays behind as an extra key.
    fn take_beta_schedule(fields: &mut Fields, name: &str) -> Result<Option<ScheduleEntry>> {
        let Some(label) = fields.opt_string("beta_schedule")? else {
            if fields.contains("beta_cycle_length") {
                warn!("{name}: beta_cycle_length given without a cyclic beta_schedule");
            }
            return Ok(None);
        };

        let unknown = || {
            SpecError::schema(
                "beta_schedule",
                format!("unknown schedule `{label}`, expected constant, linear or cyclic"),
            )
        };

        let cycle_length = match BetaSchedule::parse(&label, None).ok_or_else(unknown)? {
            BetaSchedule::Cyclic { .. } => fields.opt_positive("beta_cycle_length")?,
            _ => {
                if fields.contains("beta_cycle_length") {
                    warn!("{name}: beta_cycle_length has no effect with a {label} schedule");
                }
                None
            }
        };
        let schedule = BetaSchedule::parse(&label, cycle_length).ok_or_else(unknown)?;

        Ok(Some(ScheduleEntry {
            label,
            schedule,
            cycle_length,
        }))
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    pub fn latent_dim(&self) -> NonZeroUsize {
        self.latent_dim
    }

    pub fn inference_net(&self) -> &str {
        &self.inference_net
    }

    pub fn inference_net_kwargs(&self) -> &Kwargs {
        &self.inference_net_kwargs
    }

    pub fn generative_net(&self) -> &str {
        &self.generative_net
    }

    pub fn generative_net_kwargs(&self) -> &Kwargs {
        &self.generative_net_kwargs
    }

    pub fn optimizer(&self) -> &str {
        &self.optimizer
    }

    pub fn opt_kwargs(&self) -> &Kwargs {
        &self.opt_kwargs
    }

    pub fn epochs(&self) -> NonZeroUsize {
        self.epochs
    }

    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    pub fn likelihood(&self) -> &str {
        &self.likelihood
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vae_beta(&self) -> f64 {
        self.vae_beta
    }

    pub fn image_dims(&self) -> Option<&[NonZeroUsize]> {
        self.image_dims.as_deref()
    }

    /// Whether the observation noise of a normal likelihood is learned.
    pub fn error_trainable(&self) -> bool {
        self.error_trainable && self.likelihood == NORMAL_LIKELIHOOD
    }

    pub fn beta_schedule(&self) -> Option<BetaSchedule> {
        self.beta_schedule.as_ref().map(|entry| entry.schedule)
    }

    /// The schedule name exactly as the record spells it.
    pub fn beta_schedule_name(&self) -> Option<&str> {
        self.beta_schedule.as_ref().map(|entry| entry.label.as_str())
    }

    pub fn adversarial(&self) -> Option<&AdversarialSettings> {
        self.adversarial.as_ref()
    }

    /// Keys present in the source that this crate does not interpret.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Resolves the typed optimizer settings.
    ///
    /// # Errors
    /// A schema error if the optimizer has no known settings or a kwarg does
    /// not fit them.
    pub fn optimizer_config(&self) -> Result<OptimizerConfig> {
        OptimizerConfig::from_kwargs(&self.optimizer, &self.opt_kwargs)
    }

    /// The regularization weight for every epoch, `epochs` values long.
    pub fn betas(&self) -> Vec<f64> {
        self.beta_schedule()
            .unwrap_or(BetaSchedule::Constant)
            .betas(self.vae_beta, self.epochs)
    }

    /// The regularization weight at `epoch`, `None` past the last epoch.
    pub fn beta_at(&self, epoch: usize) -> Option<f64> {
        self.betas().get(epoch).copied()
    }

    pub fn inference_source(&self, layout: &Layout) -> NetworkSource<'_> {
        network::resolve(&self.inference_net, &self.inference_net_kwargs, layout)
    }

    pub fn generative_source(&self, layout: &Layout) -> NetworkSource<'_> {
        network::resolve(&self.generative_net, &self.generative_net_kwargs, layout)
    }

    pub fn artifact_paths(&self, layout: &Layout) -> ArtifactPaths {
        let dir = layout.saved_models_dir();
        ArtifactPaths {
            inference: dir.join(format!("{}_inference_net.h5", self.name)),
            generative: dir.join(format!("{}_generative_net.h5", self.name)),
        }
    }

    /// Serializes the spec back into a JSON record, uninterpreted keys
    /// included.
    pub fn to_json(&self) -> Value {
        let mut record = self.extra.clone();
        let mut put = |key: &str, value: Value| {
            record.insert(key.to_string(), value);
        };

        put("model_type", json!(self.model_type));
        put("latent_dim", json!(self.latent_dim));
        put("inference_net", json!(self.inference_net));
        put("inference_net_kwargs", json!(self.inference_net_kwargs));
        put("generative_net", json!(self.generative_net));
        put("generative_net_kwargs", json!(self.generative_net_kwargs));
        put("optimizer", json!(self.optimizer));
        put("opt_kwargs", json!(self.opt_kwargs));
        put("epochs", json!(self.epochs));
        put("batch_size", json!(self.batch_size));
        put("likelihood", json!(self.likelihood));
        put("name", json!(self.name));
        put("vae_beta", json!(self.vae_beta));

        if let Some(dims) = &self.image_dims {
            put("image_dims", json!(dims));
        }
        if self.error_trainable {
            put("error_trainable", json!(true));
        }
        if let Some(entry) = &self.beta_schedule {
            put("beta_schedule", json!(entry.label));
            if let Some(cycle_length) = entry.cycle_length {
                put("beta_cycle_length", json!(cycle_length));
            }
        }
        if let Some(adv) = &self.adversarial {
            put("learning_rate", json!(adv.learning_rate));
            put("gradient_penalty", json!(adv.gradient_penalty));
            put("gen_train_steps", json!(adv.gen_train_steps));
        }

        Value::Object(record)
    }
}
