//! The learning side of the pipeline.
//!
//! [`TrainableModel`] is the seam the classifier trains through;
//! [`FeedForwardNet`] is the dense network shipped with the crate.

mod network;

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

pub use network::FeedForwardNet;

/// Stack equally wide rows into a `rows x cols` array. `cols` is used when
/// `rows` is empty.
pub fn stack_rows<R: AsRef<[f64]>>(rows: &[R], cols: usize) -> Result<Array2<f64>> {
    let mut data = Vec::with_capacity(rows.len() * cols);
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != cols {
            return Err(QuizError::DimensionMismatch {
                subject: format!("matrix row {i}"),
                expected: cols,
                got: row.len(),
            });
        }
        data.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), cols), data)
        .map_err(|err| QuizError::Training(format!("stacking rows: {err}")))
}

/// Element-wise activation of a hidden layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    #[must_use]
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Self::Relu => z.max(0.0),
            Self::Sigmoid => 1.0 / (1.0 + (-z).exp()),
            Self::Tanh => z.tanh(),
            Self::Linear => z,
        }
    }

    /// Derivative at pre-activation `z`, given the activated output `a`.
    #[must_use]
    pub fn derivative(self, z: f64, a: f64) -> f64 {
        match self {
            Self::Relu => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Sigmoid => a * (1.0 - a),
            Self::Tanh => a.mul_add(-a, 1.0),
            Self::Linear => 1.0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relu => "relu",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
            Self::Linear => "linear",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activation {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relu" => Ok(Self::Relu),
            "sigmoid" => Ok(Self::Sigmoid),
            "tanh" => Ok(Self::Tanh),
            "linear" => Ok(Self::Linear),
            other => Err(QuizError::Config(format!(
                "unknown activation {other:?} (expected relu, sigmoid, tanh or linear)"
            ))),
        }
    }
}

/// One hidden layer: width and activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub units: usize,
    pub activation: Activation,
}

impl LayerSpec {
    #[must_use]
    pub const fn new(units: usize, activation: Activation) -> Self {
        Self { units, activation }
    }
}

impl fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.units, self.activation)
    }
}

/// Parses `"100:relu"`.
impl FromStr for LayerSpec {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self> {
        let (units, activation) = s
            .split_once(':')
            .ok_or_else(|| QuizError::Config(format!("layer {s:?} is not <units>:<activation>")))?;
        let units = units
            .trim()
            .parse()
            .map_err(|err| QuizError::Config(format!("layer {s:?}: bad unit count: {err}")))?;
        Ok(Self::new(units, activation.parse()?))
    }
}

/// The default topology: 100 relu units, then 50 relu units.
#[must_use]
pub fn default_hidden_layers() -> Vec<LayerSpec> {
    vec![
        LayerSpec::new(100, Activation::Relu),
        LayerSpec::new(50, Activation::Relu),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOptions {
    pub epochs: u32,
    pub batch_size: usize,
    /// 0 silent, 1 progress bar, 2 one log line per epoch.
    pub verbosity: u8,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            epochs: 5,
            batch_size: 32,
            verbosity: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochStats {
    pub epoch: u32,
    pub loss: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FitReport {
    pub samples: usize,
    pub epochs: Vec<EpochStats>,
}

impl FitReport {
    #[must_use]
    pub fn last(&self) -> Option<&EpochStats> {
        self.epochs.last()
    }
}

/// A classifier that can be shaped, trained and queried.
pub trait TrainableModel {
    /// Build the topology: `input_dim` inputs, the hidden layers in order,
    /// then a softmax output of `output_dim` probabilities. Any previous
    /// weights are discarded.
    fn configure(&mut self, input_dim: usize, hidden: &[LayerSpec], output_dim: usize)
    -> Result<()>;

    fn is_configured(&self) -> bool;

    /// Fit on `data` (one row per sample) against one-hot `labels`.
    fn fit(
        &mut self,
        data: &Array2<f64>,
        labels: &Array2<f64>,
        options: &FitOptions,
    ) -> Result<FitReport>;

    /// Probability per output class for one input vector.
    fn predict(&self, input: &[f64]) -> Result<Vec<f64>>;
}
