//! Variational-circuit backend.
//!
//! The circuit is simulated exactly on a dense state vector:
//!
//! 1. angle embedding: `RX(x_i)` on wire `i` for the first `wires` features;
//! 2. `layers` basic entangler layers: `RX(w[l][i])` on every wire, then a
//!    ring of CNOTs (a single CNOT for two wires, none for one);
//! 3. the expectation of Pauli-Z on wire 0, in `[-1, 1]`.
//!
//! Wire 0 is the most significant bit of the basis-state index.

use std::{path::Path, sync::Arc};

use num_complex::Complex64;
use serde::Deserialize;

use crate::{
    artifact::{ArtifactError, read_json},
    backend::{BackendKind, InferError, PredictionBackend, to_probability, trailing},
    signal::Probability,
};

/// Simulation cost doubles per wire; anything beyond this is a corrupt artifact.
pub const MAX_WIRES: usize = 16;

#[derive(Deserialize)]
struct QuantumArtifact {
    window: usize,
    wires: usize,
    layers: usize,
    weights: Vec<Vec<f64>>,
}

/// Trained circuit parameters. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumModel {
    window: usize,
    wires: usize,
    weights: Vec<Vec<f64>>,
}

impl QuantumModel {
    /// Validates that `weights` is a `layers × wires` matrix of finite angles.
    pub fn new(
        window: usize,
        wires: usize,
        layers: usize,
        weights: Vec<Vec<f64>>,
    ) -> Result<Self, ArtifactError> {
        if window == 0 {
            return Err(ArtifactError::Shape("window must be positive".into()));
        }
        if wires == 0 || wires > MAX_WIRES {
            return Err(ArtifactError::Shape(format!(
                "wires must be in 1..={MAX_WIRES}, got {wires}"
            )));
        }
        if weights.len() != layers {
            return Err(ArtifactError::Shape(format!(
                "expected {layers} weight rows, got {}",
                weights.len()
            )));
        }
        if let Some(row) = weights.iter().find(|row| row.len() != wires) {
            return Err(ArtifactError::Shape(format!(
                "weight row has {} entries, expected {wires}",
                row.len()
            )));
        }
        if weights.iter().flatten().any(|w| !w.is_finite()) {
            return Err(ArtifactError::Shape("non-finite weight".into()));
        }

        Ok(Self {
            window,
            wires,
            weights,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        let raw: QuantumArtifact = read_json(path)?;
        Self::new(raw.window, raw.wires, raw.layers, raw.weights)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn wires(&self) -> usize {
        self.wires
    }

    pub fn layers(&self) -> usize {
        self.weights.len()
    }

    /// Runs the circuit on already-normalised features and returns ⟨Z₀⟩.
    pub fn expectation(&self, features: &[f64]) -> f64 {
        let mut state = StateVector::zero(self.wires);

        for (wire, x) in features.iter().take(self.wires).enumerate() {
            state.rx(wire, *x);
        }

        for layer in &self.weights {
            for (wire, theta) in layer.iter().enumerate() {
                state.rx(wire, *theta);
            }
            match self.wires {
                1 => {}
                2 => state.cnot(0, 1),
                n => {
                    for wire in 0..n {
                        state.cnot(wire, (wire + 1) % n);
                    }
                }
            }
        }

        state.expval_z(0)
    }
}

struct StateVector {
    wires: usize,
    amps: Vec<Complex64>,
}

impl StateVector {
    fn zero(wires: usize) -> Self {
        let mut amps = vec![Complex64::new(0.0, 0.0); 1 << wires];
        amps[0] = Complex64::new(1.0, 0.0);
        Self { wires, amps }
    }

    fn mask(&self, wire: usize) -> usize {
        1 << (self.wires - 1 - wire)
    }

    fn rx(&mut self, wire: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new(0.0, -(theta / 2.0).sin());
        let bit = self.mask(wire);

        for i in 0..self.amps.len() {
            if i & bit == 0 {
                let j = i | bit;
                let (a, b) = (self.amps[i], self.amps[j]);
                self.amps[i] = c * a + s * b;
                self.amps[j] = s * a + c * b;
            }
        }
    }

    fn cnot(&mut self, control: usize, target: usize) {
        let cbit = self.mask(control);
        let tbit = self.mask(target);

        for i in 0..self.amps.len() {
            if i & cbit != 0 && i & tbit == 0 {
                self.amps.swap(i, i | tbit);
            }
        }
    }

    fn expval_z(&self, wire: usize) -> f64 {
        let bit = self.mask(wire);
        self.amps
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let p = a.norm_sqr();
                if i & bit == 0 { p } else { -p }
            })
            .sum()
    }
}

/// Subtract the mean and divide by the population standard deviation
/// (or by 1 when the sequence is flat).
pub fn z_score(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    let std = if std == 0.0 { 1.0 } else { std };
    values.iter().map(|v| (v - mean) / std).collect()
}

pub struct QuantumBackend {
    model: Arc<QuantumModel>,
}

impl QuantumBackend {
    pub fn new(model: Arc<QuantumModel>) -> Self {
        Self { model }
    }
}

impl PredictionBackend for QuantumBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Quantum
    }

    fn infer(&self, closes: &[f64]) -> Result<Probability, InferError> {
        let window = trailing(closes, self.model.window())?;
        let z = self.model.expectation(&z_score(window));
        if !z.is_finite() {
            return Err(InferError::InvalidOutput(z));
        }
        // tiny float drift can push ⟨Z⟩ a hair past ±1
        to_probability(((z.clamp(-1.0, 1.0)) + 1.0) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn single_wire_matches_closed_form() {
        let model = QuantumModel::new(1, 1, 1, vec![vec![0.3]]).unwrap();
        for x in [-1.2, 0.0, 0.7, 2.5] {
            assert!((model.expectation(&[x]) - (x + 0.3_f64).cos()).abs() < EPS);
        }
    }

    #[test]
    fn control_wire_is_unaffected_by_its_own_cnot() {
        // two wires: only CNOT(0, 1), so wire 0 sees RX(x0) then RX(w0)
        let model = QuantumModel::new(2, 2, 1, vec![vec![0.4, 1.1]]).unwrap();
        let z = model.expectation(&[0.2, -0.9]);
        assert!((z - 0.6_f64.cos()).abs() < EPS);
    }

    #[test]
    fn ring_feeds_last_wire_back_into_wire_zero() {
        // |000> -> RX(pi) on wire 2 gives |001>; ring CNOT(2, 0) flips wire 0
        let model = QuantumModel::new(3, 3, 1, vec![vec![0.0, 0.0, PI]]).unwrap();
        let z = model.expectation(&[0.0, 0.0, 0.0]);
        assert!((z + 1.0).abs() < EPS);
    }

    #[test]
    fn extra_features_beyond_wire_count_are_ignored() {
        let model = QuantumModel::new(4, 1, 1, vec![vec![0.0]]).unwrap();
        let z = model.expectation(&[0.5, 9.0, 9.0, 9.0]);
        assert!((z - 0.5_f64.cos()).abs() < EPS);
    }

    #[test]
    fn z_score_of_flat_series_is_zero() {
        assert_eq!(z_score(&[3.0, 3.0, 3.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn z_score_uses_population_deviation() {
        let z = z_score(&[1.0, 3.0]);
        assert!((z[0] + 1.0).abs() < EPS);
        assert!((z[1] - 1.0).abs() < EPS);
    }

    #[test]
    fn backend_requires_full_window() {
        let model = QuantumModel::new(8, 4, 2, vec![vec![0.1; 4]; 2]).unwrap();
        let backend = QuantumBackend::new(Arc::new(model));
        let err = backend.infer(&[1.0; 7]).unwrap_err();
        assert_eq!(err, InferError::InsufficientHistory { needed: 8, got: 7 });
    }

    #[test]
    fn backend_output_is_a_probability() {
        let model = QuantumModel::new(8, 4, 2, vec![vec![0.1, -0.4, 0.9, 0.2]; 2]).unwrap();
        let backend = QuantumBackend::new(Arc::new(model));
        let p = backend
            .infer(&[10.0, 11.0, 12.0, 11.0, 13.0, 14.0, 13.0, 15.0])
            .unwrap();
        assert!((0.0..=1.0).contains(&p.value()));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        assert!(QuantumModel::new(8, 4, 2, vec![vec![0.1; 4]]).is_err());
        assert!(QuantumModel::new(8, 4, 1, vec![vec![0.1; 3]]).is_err());
        assert!(QuantumModel::new(0, 4, 1, vec![vec![0.1; 4]]).is_err());
        assert!(QuantumModel::new(8, 0, 0, vec![]).is_err());
        assert!(QuantumModel::new(8, 1, 1, vec![vec![f64::NAN]]).is_err());
    }
}
