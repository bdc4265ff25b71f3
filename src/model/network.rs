//! Dense feed-forward network with a softmax output.
//!
//! Trained with categorical cross-entropy and Adam on shuffled mini-batches.
//! All randomness (initial weights, batch order) comes from one seeded
//! [`StdRng`], so two nets with the same seed and data train identically.

use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array, Array1, Array2, ArrayView1, ArrayViewMut1, Axis, Dimension, Ix1, Ix2, Zip};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand_distr::{Distribution, Normal};
use tracing::{debug, info};

use super::{Activation, EpochStats, FitOptions, FitReport, LayerSpec, TrainableModel};
use crate::error::{QuizError, Result};

/// Floor for probabilities inside `ln` and Adam's denominator term.
const EPSILON: f64 = 1e-7;

/// Adam's first and second moment estimates for one parameter array.
#[derive(Debug, Clone)]
struct Moments<D: Dimension> {
    m: Array<f64, D>,
    v: Array<f64, D>,
}

impl<D: Dimension> Moments<D> {
    fn like(params: &Array<f64, D>) -> Self {
        Self {
            m: Array::zeros(params.raw_dim()),
            v: Array::zeros(params.raw_dim()),
        }
    }
}

#[derive(Debug, Clone)]
struct Dense {
    /// `inputs x units`
    weights: Array2<f64>,
    bias: Array1<f64>,
    /// `None` marks the softmax output layer.
    activation: Option<Activation>,
    weight_moments: Moments<Ix2>,
    bias_moments: Moments<Ix1>,
}

impl Dense {
    fn init(
        inputs: usize,
        units: usize,
        activation: Option<Activation>,
        rng: &mut StdRng,
    ) -> Result<Self> {
        #[allow(clippy::cast_precision_loss)]
        let std_dev = match activation {
            // He normal
            Some(Activation::Relu) => (2.0 / inputs as f64).sqrt(),
            // Glorot normal
            _ => (2.0 / (inputs + units) as f64).sqrt(),
        };
        let normal = Normal::new(0.0, std_dev)
            .map_err(|err| QuizError::Training(format!("weight init: {err}")))?;
        let weights = Array2::from_shape_simple_fn((inputs, units), || normal.sample(rng));
        let bias = Array1::zeros(units);
        Ok(Self {
            weight_moments: Moments::like(&weights),
            bias_moments: Moments::like(&bias),
            weights,
            bias,
            activation,
        })
    }

    fn units(&self) -> usize {
        self.weights.ncols()
    }

    /// `input . W + b`, one row per sample.
    fn affine(&self, input: &Array2<f64>) -> Array2<f64> {
        input.dot(&self.weights) + &self.bias
    }

    fn activate(&self, z: &Array2<f64>) -> Array2<f64> {
        match self.activation {
            Some(activation) => z.mapv(|v| activation.apply(v)),
            None => {
                let mut out = z.clone();
                for row in out.rows_mut() {
                    softmax_in_place(row);
                }
                out
            }
        }
    }
}

fn softmax_in_place(mut row: ArrayViewMut1<'_, f64>) {
    let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    row.mapv_inplace(|v| (v - max).exp());
    let sum = row.sum();
    row /= sum;
}

fn argmax(row: ArrayView1<'_, f64>) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

#[derive(Debug, Clone)]
struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    step: i32,
}

impl Adam {
    const fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: EPSILON,
            step: 0,
        }
    }

    fn update<D: Dimension>(
        &self,
        params: &mut Array<f64, D>,
        grads: &Array<f64, D>,
        moments: &mut Moments<D>,
    ) {
        let (beta1, beta2) = (self.beta1, self.beta2);
        let bc1 = 1.0 - beta1.powi(self.step);
        let bc2 = 1.0 - beta2.powi(self.step);
        let (lr, eps) = (self.learning_rate, self.epsilon);
        Zip::from(params)
            .and(&mut moments.m)
            .and(&mut moments.v)
            .and(grads)
            .for_each(|param, m, v, &g| {
                *m = beta1.mul_add(*m, (1.0 - beta1) * g);
                *v = beta2.mul_add(*v, (1.0 - beta2) * g * g);
                *param -= lr * (*m / bc1) / ((*v / bc2).sqrt() + eps);
            });
    }
}

/// Weight and bias gradient of one layer.
type Gradient = (Array2<f64>, Array1<f64>);

/// Layer inputs and pre-activations recorded by a forward pass.
struct Trace {
    /// `activations[0]` is the input; `activations[l + 1]` is layer `l`'s output.
    activations: Vec<Array2<f64>>,
    pre_activations: Vec<Array2<f64>>,
}

impl Trace {
    fn output(&self) -> &Array2<f64> {
        &self.activations[self.activations.len() - 1]
    }
}

#[derive(Debug, Clone)]
pub struct FeedForwardNet {
    seed: u64,
    rng: StdRng,
    input_dim: usize,
    layers: Vec<Dense>,
    optimizer: Adam,
}

impl Default for FeedForwardNet {
    fn default() -> Self {
        Self::new(0.001, 42)
    }
}

impl FeedForwardNet {
    #[must_use]
    pub fn new(learning_rate: f64, seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            input_dim: 0,
            layers: Vec::new(),
            optimizer: Adam::new(learning_rate),
        }
    }

    #[must_use]
    pub const fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, Dense::units)
    }

    /// Trainable parameter count.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.weights.len() + layer.bias.len())
            .sum()
    }

    fn forward(&self, input: Array2<f64>) -> Trace {
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        activations.push(input);
        for layer in &self.layers {
            let z = layer.affine(&activations[activations.len() - 1]);
            activations.push(layer.activate(&z));
            pre_activations.push(z);
        }
        Trace {
            activations,
            pre_activations,
        }
    }

    /// Weight and bias gradients per layer for the mean batch loss.
    #[allow(clippy::cast_precision_loss)]
    fn backward(&self, trace: &Trace, labels: &Array2<f64>) -> Vec<Gradient> {
        // softmax + cross-entropy: dL/dz = (p - y) / n
        let mut delta = (trace.output() - labels) / labels.nrows() as f64;

        let mut grads = Vec::with_capacity(self.layers.len());
        for l in (0..self.layers.len()).rev() {
            let input = &trace.activations[l];
            grads.push((input.t().dot(&delta), delta.sum_axis(Axis(0))));

            if l > 0 {
                let mut back = delta.dot(&self.layers[l].weights.t());
                if let Some(below) = self.layers[l - 1].activation {
                    Zip::from(&mut back)
                        .and(&trace.pre_activations[l - 1])
                        .and(input)
                        .for_each(|b, &z, &a| *b *= below.derivative(z, a));
                }
                delta = back;
            }
        }
        grads.reverse();
        grads
    }

    fn apply(&mut self, grads: Vec<Gradient>) {
        self.optimizer.step += 1;
        let optimizer = &self.optimizer;
        for (layer, (grad_w, grad_b)) in self.layers.iter_mut().zip(grads) {
            optimizer.update(&mut layer.weights, &grad_w, &mut layer.weight_moments);
            optimizer.update(&mut layer.bias, &grad_b, &mut layer.bias_moments);
        }
    }

    fn check_configured(&self) -> Result<()> {
        if self.layers.is_empty() {
            Err(QuizError::ModelNotConfigured)
        } else {
            Ok(())
        }
    }
}

fn progress_bar(epochs: u32) -> Result<ProgressBar> {
    let bar = ProgressBar::new(u64::from(epochs));
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] epoch {pos}/{len} {msg}")
            .map_err(|err| QuizError::Training(format!("progress template: {err}")))?
            .progress_chars("#>-"),
    );
    Ok(bar)
}

impl TrainableModel for FeedForwardNet {
    fn configure(
        &mut self,
        input_dim: usize,
        hidden: &[LayerSpec],
        output_dim: usize,
    ) -> Result<()> {
        if input_dim == 0 {
            return Err(QuizError::Validation("model input dimension is 0".to_string()));
        }
        if output_dim == 0 {
            return Err(QuizError::Validation("model output dimension is 0".to_string()));
        }
        if let Some(spec) = hidden.iter().find(|spec| spec.units == 0) {
            return Err(QuizError::Validation(format!("hidden layer {spec} has no units")));
        }

        self.rng = StdRng::seed_from_u64(self.seed);
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut inputs = input_dim;
        for spec in hidden {
            layers.push(Dense::init(inputs, spec.units, Some(spec.activation), &mut self.rng)?);
            inputs = spec.units;
        }
        layers.push(Dense::init(inputs, output_dim, None, &mut self.rng)?);

        self.input_dim = input_dim;
        self.layers = layers;
        self.optimizer.step = 0;
        debug!(
            input_dim,
            output_dim,
            hidden = hidden.len(),
            parameters = self.parameter_count(),
            "configured network"
        );
        Ok(())
    }

    fn is_configured(&self) -> bool {
        !self.layers.is_empty()
    }

    #[allow(clippy::cast_precision_loss)]
    fn fit(
        &mut self,
        data: &Array2<f64>,
        labels: &Array2<f64>,
        options: &FitOptions,
    ) -> Result<FitReport> {
        self.check_configured()?;
        if data.ncols() != self.input_dim {
            return Err(QuizError::DimensionMismatch {
                subject: "training data columns".to_string(),
                expected: self.input_dim,
                got: data.ncols(),
            });
        }
        if labels.ncols() != self.output_dim() {
            return Err(QuizError::DimensionMismatch {
                subject: "training label columns".to_string(),
                expected: self.output_dim(),
                got: labels.ncols(),
            });
        }
        if labels.nrows() != data.nrows() {
            return Err(QuizError::DimensionMismatch {
                subject: "training label rows".to_string(),
                expected: data.nrows(),
                got: labels.nrows(),
            });
        }
        if data.nrows() == 0 {
            return Err(QuizError::Validation("no training samples".to_string()));
        }
        if options.epochs == 0 || options.batch_size == 0 {
            return Err(QuizError::Validation(
                "epochs and batch size must be at least 1".to_string(),
            ));
        }

        let bar = if options.verbosity == 1 {
            Some(progress_bar(options.epochs)?)
        } else {
            None
        };

        let samples = data.nrows();
        let mut order: Vec<usize> = (0..samples).collect();
        let mut report = FitReport {
            samples,
            epochs: Vec::with_capacity(options.epochs as usize),
        };

        for epoch in 1..=options.epochs {
            order.shuffle(&mut self.rng);
            let mut loss_sum = 0.0;
            let mut correct = 0usize;
            for batch in order.chunks(options.batch_size) {
                let targets = labels.select(Axis(0), batch);
                let trace = self.forward(data.select(Axis(0), batch));
                let output = trace.output();
                loss_sum -= (&targets * &output.mapv(|p| p.max(EPSILON).ln())).sum();
                correct += output
                    .rows()
                    .into_iter()
                    .zip(targets.rows())
                    .filter(|(p, y)| argmax(p.view()) == argmax(y.view()))
                    .count();
                let grads = self.backward(&trace, &targets);
                self.apply(grads);
            }

            let stats = EpochStats {
                epoch,
                loss: loss_sum / samples as f64,
                accuracy: correct as f64 / samples as f64,
            };
            debug!(epoch, loss = stats.loss, accuracy = stats.accuracy, "epoch finished");
            if options.verbosity >= 2 {
                info!(
                    "epoch {epoch}/{}: loss {:.4}, accuracy {:.4}",
                    options.epochs, stats.loss, stats.accuracy
                );
            }
            if let Some(bar) = &bar {
                bar.set_message(format!("loss {:.4} acc {:.4}", stats.loss, stats.accuracy));
                bar.inc(1);
            }
            report.epochs.push(stats);
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        Ok(report)
    }

    fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_configured()?;
        if input.len() != self.input_dim {
            return Err(QuizError::DimensionMismatch {
                subject: "input vector".to_string(),
                expected: self.input_dim,
                got: input.len(),
            });
        }
        let row = Array1::from(input.to_vec()).insert_axis(Axis(0));
        Ok(self.forward(row).output().row(0).to_vec())
    }
}
