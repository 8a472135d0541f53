use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;
use crate::agent::{AgentConfig, DeepQAgent};
use crate::error::DqnError;
use crate::network::{build_network, NetworkTopology};
use crate::optimizer::{Adam, OptimizerWrapper, RMSProp, SGD};
use crate::value_function::QModel;

fn lidar_config(seed: u64) -> AgentConfig {
    AgentConfig {
        input_size: 20,
        output_size: 3,
        hidden_layers: vec![32, 16],
        memory_size: 100,
        learn_start: 4,
        seed: Some(seed),
        ..AgentConfig::default()
    }
}

#[test]
fn test_layer_shapes_follow_topology() {
    let topology = NetworkTopology::new(20, &[32, 16], 3).with_attention(true);
    let network = build_network(&topology, OptimizerWrapper::SGD(SGD::new()), &mut StdRng::seed_from_u64(1)).unwrap();

    let gate = network.attention.as_ref().unwrap();
    assert_eq!(gate.probs.weights.shape(), [20, 20]);
    assert_eq!(network.layers.len(), 3);
    assert_eq!(network.layers[0].weights.shape(), [20, 32]);
    assert_eq!(network.layers[1].weights.shape(), [32, 16]);
    assert_eq!(network.layers[2].weights.shape(), [16, 3]);
    assert_eq!(network.parameter_count(), 20 * 20 + 20 + 20 * 32 + 32 + 32 * 16 + 16 + 16 * 3 + 3);
}

#[test]
fn test_forward_batch_matches_single_rows() {
    let topology = NetworkTopology::new(3, &[5], 2).with_attention(true);
    let network = build_network(&topology, OptimizerWrapper::SGD(SGD::new()), &mut StdRng::seed_from_u64(6)).unwrap();
    let inputs = array![[0.1, 0.2, 0.3], [-1.0, 0.5, 2.0]];

    let batch = network.forward_batch(inputs.view());
    for (i, row) in inputs.rows().into_iter().enumerate() {
        let single = network.forward(row);
        for (a, b) in single.iter().zip(batch.row(i).iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}

#[test]
fn test_every_optimizer_reduces_loss() {
    let topology = NetworkTopology::new(4, &[16], 2).with_attention(true);
    let inputs = array![[0.1, 0.9, 0.3, 0.5], [0.8, 0.2, 0.6, 0.1], [0.4, 0.4, 0.9, 0.7]];
    let targets = array![[1.0, -1.0], [0.5, 0.0], [-0.5, 2.0]];

    let optimizers = vec![
        (OptimizerWrapper::SGD(SGD::new()), 0.1),
        (OptimizerWrapper::Adam(Adam::default()), 0.01),
        (OptimizerWrapper::RMSProp(RMSProp::default()), 0.005),
    ];
    for (optimizer, learning_rate) in optimizers {
        let mut network = build_network(&topology, optimizer, &mut StdRng::seed_from_u64(12)).unwrap();
        let first = network.train_batch(inputs.view(), targets.view(), learning_rate);
        let mut last = first;
        for _ in 0..300 {
            last = network.train_batch(inputs.view(), targets.view(), learning_rate);
        }
        assert!(last < first * 0.5, "{:?}: loss went from {} to {}", network.optimizer.kind(), first, last);
    }
}

#[test]
fn test_save_load_reproduces_predictions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("online.bin");

    let mut trained = DeepQAgent::new(lidar_config(1)).unwrap();
    for i in 0..20 {
        let state = ndarray::Array1::from_elem(20, i as f32 / 20.0);
        trained.add_memory(state.clone(), i % 3, 1.0, state, i == 19);
    }
    assert!(trained.learn_on_mini_batch(8, false).is_some());
    trained.save_model(&path).unwrap();

    let mut fresh = DeepQAgent::new(lidar_config(2)).unwrap();
    let probe = Array2::from_shape_fn((5, 20), |(i, j)| ((i * 20 + j) as f32).sin());
    assert_ne!(
        fresh.value_function().predict_batch(QModel::Online, probe.view()),
        trained.value_function().predict_batch(QModel::Online, probe.view())
    );

    fresh.load_weights(&path).unwrap();
    assert_eq!(
        fresh.value_function().predict_batch(QModel::Online, probe.view()),
        trained.value_function().predict_batch(QModel::Online, probe.view())
    );
    // Only the online network is restored
    assert!(!fresh
        .value_function()
        .network(QModel::Target)
        .same_parameters(trained.value_function().network(QModel::Target)));
}

#[test]
fn test_load_into_different_topology_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("online.bin");
    DeepQAgent::new(lidar_config(1)).unwrap().save_model(&path).unwrap();

    let other = AgentConfig { hidden_layers: vec![32, 32], ..lidar_config(1) };
    let mut agent = DeepQAgent::new(other).unwrap();
    match agent.load_weights(&path) {
        Err(DqnError::TopologyMismatch { expected, actual }) => {
            assert_eq!(expected, "20-32-32-3 with attention");
            assert_eq!(actual, "20-32-16-3 with attention");
        }
        other => panic!("expected a topology mismatch, got {:?}", other),
    }
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let mut agent = DeepQAgent::new(lidar_config(1)).unwrap();
    assert!(matches!(agent.load_weights(dir.path().join("missing.bin")), Err(DqnError::IoError(_))));
}
