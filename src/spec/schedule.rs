use std::num::NonZeroUsize;

/// Cycle length used when a cyclic schedule does not name one.
pub const DEFAULT_CYCLE_LENGTH: NonZeroUsize = NonZeroUsize::new(5).unwrap();

/// How the weight of the regularization term evolves across epochs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetaSchedule {
    /// `beta_max` on every epoch.
    Constant,
    /// Ramps from 0 up to `beta_max` over the whole run.
    Linear,
    /// Repeated ramps from 0 up to `beta_max`, `cycle_length` epochs each.
    Cyclic { cycle_length: NonZeroUsize },
}

impl BetaSchedule {
    /// Parses a schedule name. Any name containing `cyclic` selects a cyclic
    /// schedule.
    pub fn parse(name: &str, cycle_length: Option<NonZeroUsize>) -> Option<Self> {
        match name {
            "constant" => Some(Self::Constant),
            "linear" => Some(Self::Linear),
            s if s.contains("cyclic") => Some(Self::Cyclic {
                cycle_length: cycle_length.unwrap_or(DEFAULT_CYCLE_LENGTH),
            }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Linear => "linear",
            Self::Cyclic { .. } => "cyclic",
        }
    }

    /// Computes the beta value for every epoch.
    ///
    /// # Arguments
    /// * `beta_max` - The peak weight, the record's `vae_beta`.
    /// * `epochs` - The amount of training epochs.
    ///
    /// # Returns
    /// Exactly `epochs` values, one per epoch.
    pub fn betas(&self, beta_max: f64, epochs: NonZeroUsize) -> Vec<f64> {
        let epochs = epochs.get();

        match *self {
            Self::Constant => vec![beta_max; epochs],
            Self::Linear => linspace(0.0, beta_max, epochs),
            Self::Cyclic { cycle_length } => {
                let cycle = linspace(0.0, beta_max, cycle_length.get());
                cycle.into_iter().cycle().take(epochs).collect()
            }
        }
    }
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }

    let span = stop - start;
    let last = (n - 1) as f64;
    (0..n).map(|i| start + span * i as f64 / last).collect()
}
