use std::fs;

use direction_inference::{
    BackendKind, InferenceDispatcher, ModelConfig, ModelPaths,
    config::{CLASSICAL_ARTIFACT, QUANTUM_ARTIFACT},
};
use serde_json::json;
use tempfile::TempDir;

fn quantum_json(window: usize) -> String {
    json!({
        "window": window,
        "wires": 4,
        "layers": 2,
        "weights": [[0.1, 0.2, 0.3, 0.4], [-0.1, -0.2, -0.3, -0.4]],
    })
    .to_string()
}

fn classical_json(bias: f64) -> String {
    let hidden = vec![vec![0.0; 20]; 3];
    json!({
        "layers": [
            { "weights": hidden, "bias": [0.5, 0.0, 1.0], "activation": "relu" },
            { "weights": [[1.0, 1.0, 1.0]], "bias": [bias], "activation": "sigmoid" },
        ]
    })
    .to_string()
}

#[test]
fn empty_directory_means_no_model() {
    let dir = TempDir::new().unwrap();
    let config = ModelConfig::load(&ModelPaths::in_dir(dir.path()));
    assert!(matches!(config, ModelConfig::None));
    assert_eq!(config.kind(), None);
}

#[test]
fn quantum_artifact_wins_over_classical() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(QUANTUM_ARTIFACT), quantum_json(8)).unwrap();
    fs::write(dir.path().join(CLASSICAL_ARTIFACT), classical_json(0.0)).unwrap();

    let config = ModelConfig::load(&ModelPaths::in_dir(dir.path()));
    assert_eq!(config.kind(), Some(BackendKind::Quantum));

    let dispatcher = InferenceDispatcher::from_config(&config);
    let closes: Vec<f64> = (0..8).map(|i| 50.0 + i as f64).collect();
    assert_eq!(dispatcher.predict(&closes).backend, BackendKind::Quantum);
}

#[test]
fn broken_quantum_artifact_does_not_enable_classical() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(QUANTUM_ARTIFACT), "{ not json").unwrap();
    fs::write(dir.path().join(CLASSICAL_ARTIFACT), classical_json(0.0)).unwrap();

    let config = ModelConfig::load(&ModelPaths::in_dir(dir.path()));
    assert!(matches!(config, ModelConfig::None));
}

#[test]
fn classical_artifact_is_used_when_alone() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CLASSICAL_ARTIFACT), classical_json(-1.5)).unwrap();

    let config = ModelConfig::load(&ModelPaths::in_dir(dir.path()));
    assert_eq!(config.kind(), Some(BackendKind::Classical));

    // hidden relu -> [0.5, 0, 1]; head sigmoid(1.5 - 1.5) = 0.5
    let out = InferenceDispatcher::from_config(&config).predict(&[7.0; 20]);
    assert_eq!(out.backend, BackendKind::Classical);
    assert_eq!(out.signal.confidence, 50);
}

#[test]
fn misshapen_quantum_weights_are_rejected() {
    let dir = TempDir::new().unwrap();
    let bad = json!({ "window": 8, "wires": 4, "layers": 3, "weights": [[0.1, 0.2, 0.3, 0.4]] });
    fs::write(dir.path().join(QUANTUM_ARTIFACT), bad.to_string()).unwrap();

    let config = ModelConfig::load(&ModelPaths::in_dir(dir.path()));
    assert!(matches!(config, ModelConfig::None));
}
