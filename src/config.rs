use serde::{Serialize, Deserialize};

use crate::error::{LossError, Result};
use crate::loss::strategy::LossStrategy;

/// Settings for an evaluation run of the demo binary.
///
/// # Fields
/// - `strategy`     — which evaluation path is treated as primary
/// - `reg`          — L2 regularization strength
/// - `num_examples` — N, rows of the generated data batch
/// - `num_features` — D, columns of the data / rows of the weights
/// - `num_classes`  — C, columns of the weights
/// - `seed`         — RNG seed for the generated problem
///
/// Missing fields fall back to [`LossConfig::default`] when loading JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LossConfig {
    pub strategy: LossStrategy,
    pub reg: f64,
    pub num_examples: usize,
    pub num_features: usize,
    pub num_classes: usize,
    pub seed: u64,
}

impl Default for LossConfig {
    fn default() -> Self {
        LossConfig {
            strategy: LossStrategy::Vectorized,
            reg: 5e-6,
            num_examples: 500,
            num_features: 3073,
            num_classes: 10,
            seed: 0,
        }
    }
}

impl LossConfig {
    /// Rejects configurations the loss functions would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        if self.num_examples == 0 {
            return Err(LossError::EmptyBatch);
        }
        if self.num_classes == 0 {
            return Err(LossError::NoClasses);
        }
        if self.num_features == 0 {
            return Err(LossError::InvalidDimension { what: "num_features" });
        }
        if !self.reg.is_finite() || self.reg < 0.0 {
            return Err(LossError::InvalidRegularization(self.reg));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a config from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<LossConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
