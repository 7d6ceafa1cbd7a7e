//! Dense feed-forward backend.
//!
//! Consumes the raw (unnormalised) trailing [`INPUT_WINDOW`] closes and
//! emits a single sigmoid-style probability.

use std::{path::Path, sync::Arc};

use serde::Deserialize;

use crate::{
    artifact::{ArtifactError, read_json},
    backend::{BackendKind, InferError, PredictionBackend, to_probability, trailing},
    signal::Probability,
};

/// Number of closes the network was trained on.
pub const INPUT_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Linear => x,
        }
    }
}

/// `y = activation(W·x + b)` with `W` stored row-major as `out × in`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn outputs(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| {
                let sum: f64 = row.iter().zip(x).map(|(w, v)| w * v).sum();
                self.activation.apply(sum + b)
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct ClassicalArtifact {
    layers: Vec<DenseLayer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassicalModel {
    layers: Vec<DenseLayer>,
}

impl ClassicalModel {
    /// Checks that the layers chain from [`INPUT_WINDOW`] inputs down to one output.
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self, ArtifactError> {
        let shape = |msg: String| Err(ArtifactError::Shape(msg));

        let Some(first) = layers.first() else {
            return shape("network has no layers".into());
        };
        if first.inputs() != INPUT_WINDOW {
            return shape(format!(
                "first layer takes {} inputs, expected {INPUT_WINDOW}",
                first.inputs()
            ));
        }

        let mut width = INPUT_WINDOW;
        for (i, layer) in layers.iter().enumerate() {
            if layer.outputs() == 0 || layer.weights.iter().any(|row| row.len() != width) {
                return shape(format!("layer {i} does not accept {width} inputs"));
            }
            if layer.bias.len() != layer.outputs() {
                return shape(format!(
                    "layer {i} has {} biases for {} outputs",
                    layer.bias.len(),
                    layer.outputs()
                ));
            }
            width = layer.outputs();
        }
        if width != 1 {
            return shape(format!("network ends with {width} outputs, expected 1"));
        }

        Ok(Self { layers })
    }

    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        let raw: ClassicalArtifact = read_json(path)?;
        Self::new(raw.layers)
    }

    /// Forward pass; `x` must hold exactly [`INPUT_WINDOW`] values.
    pub fn forward(&self, x: &[f64]) -> f64 {
        let out = self
            .layers
            .iter()
            .fold(x.to_vec(), |acc, layer| layer.forward(&acc));
        out.first().copied().unwrap_or(f64::NAN)
    }
}

pub struct ClassicalBackend {
    model: Arc<ClassicalModel>,
}

impl ClassicalBackend {
    pub fn new(model: Arc<ClassicalModel>) -> Self {
        Self { model }
    }
}

impl PredictionBackend for ClassicalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Classical
    }

    fn infer(&self, closes: &[f64]) -> Result<Probability, InferError> {
        let x = trailing(closes, INPUT_WINDOW)?;
        to_probability(self.model.forward(x))
    }
}
