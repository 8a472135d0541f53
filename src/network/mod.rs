//! # Q-Network Module
//!
//! A small feed-forward network mapping an observation vector to one value
//! per discrete action. Networks are described by a [`NetworkTopology`] and
//! created by [`build_network`]; the online and target copies held by a
//! [`ValueFunction`](crate::value_function::ValueFunction) are two instances
//! of the same topology.
//!
//! Parameters are persisted as an opaque bincode blob holding the topology
//! and every layer's weights and biases. Optimizer state is not persisted.

pub mod builder;
pub mod topology;

pub use builder::build_network;
pub use topology::NetworkTopology;

use std::fs;
use std::path::Path;

use log::info;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};
use crate::layers::{AttentionGate, DenseLayer};
use crate::loss::{Loss, MeanSquaredError};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A Q-network: an optional attention gate followed by dense layers, plus
/// the optimizer that trains it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub topology: NetworkTopology,
    pub attention: Option<AttentionGate>,
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

#[derive(Serialize)]
struct ParametersRef<'a> {
    topology: &'a NetworkTopology,
    attention: &'a Option<AttentionGate>,
    layers: &'a [DenseLayer],
}

#[derive(Deserialize)]
struct Parameters {
    topology: NetworkTopology,
    attention: Option<AttentionGate>,
    layers: Vec<DenseLayer>,
}

impl NeuralNetwork {
    pub(crate) fn from_parts(
        topology: NetworkTopology,
        attention: Option<AttentionGate>,
        layers: Vec<DenseLayer>,
        optimizer: OptimizerWrapper,
    ) -> Self {
        NeuralNetwork { topology, attention, layers, optimizer }
    }

    pub fn input_size(&self) -> usize {
        self.topology.input_size
    }

    pub fn output_size(&self) -> usize {
        self.topology.output_size
    }

    /// Perform a forward pass for a single observation.
    ///
    /// Panics if `input` does not have `input_size` components.
    pub fn forward(&self, input: ArrayView1<f32>) -> Array1<f32> {
        assert_eq!(
            input.len(),
            self.input_size(),
            "observation has {} components, network expects {}",
            input.len(),
            self.input_size()
        );
        let output = self.forward_batch(input.insert_axis(Axis(0)));
        output.index_axis_move(Axis(0), 0)
    }

    /// Perform a forward pass for a batch of observations, one per row.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        let mut current = match &self.attention {
            Some(gate) => gate.forward_batch(inputs),
            None => inputs.to_owned(),
        };
        for layer in &self.layers {
            current = layer.forward_batch(current.view());
        }
        current
    }

    /// One optimization step of mean squared error between the network's
    /// outputs for `inputs` and `targets`. Every row is used; returns the
    /// loss measured before the update.
    pub fn train_batch(&mut self, inputs: ArrayView2<f32>, targets: ArrayView2<f32>, learning_rate: f32) -> f32 {
        assert_eq!(inputs.nrows(), targets.nrows(), "inputs and targets must have the same number of rows");
        assert_eq!(targets.ncols(), self.output_size(), "targets must have one column per action");

        // Forward pass, keeping each layer's input and pre-activation
        let (gate_trace, mut current) = match &self.attention {
            Some(gate) => {
                let (trace, gated) = gate.forward_cached(inputs);
                (Some(trace), gated)
            }
            None => (None, inputs.to_owned()),
        };
        let mut traces = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let (pre_activation, output) = layer.forward_cached(current.view());
            traces.push((current, pre_activation));
            current = output;
        }

        let loss_fn = MeanSquaredError;
        let loss = loss_fn.compute_batch(current.view(), targets);
        let mut error = loss_fn.gradient_batch(current.view(), targets);

        let mut gradients = Vec::with_capacity(self.layers.len());
        for (layer, (layer_input, pre_activation)) in self.layers.iter().zip(&traces).rev() {
            let (adjusted_error, weight_gradients, bias_gradients) =
                layer.backward_batch(layer_input.view(), pre_activation.view(), error.view());
            error = adjusted_error.dot(&layer.weights.t());
            gradients.push((weight_gradients, bias_gradients));
        }
        gradients.reverse();

        let gate_gradients = match (&self.attention, &gate_trace) {
            (Some(gate), Some(trace)) => Some(gate.backward_batch(inputs, trace, error.view())),
            _ => None,
        };

        self.optimizer.begin_step();
        let mut slot = 0;
        if let (Some(gate), Some((weight_gradients, bias_gradients))) = (self.attention.as_mut(), gate_gradients) {
            self.optimizer.update_weights(slot, &mut gate.probs.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(slot, &mut gate.probs.biases, &bias_gradients, learning_rate);
            slot += 1;
        }
        for (layer, (weight_gradients, bias_gradients)) in self.layers.iter_mut().zip(gradients) {
            self.optimizer.update_weights(slot, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(slot, &mut layer.biases, &bias_gradients, learning_rate);
            slot += 1;
        }

        loss
    }

    /// Overwrite every parameter of `self` with an exact copy of `other`'s.
    /// Optimizer state is left untouched.
    ///
    /// Panics if the two networks do not share a topology.
    pub fn copy_parameters_from(&mut self, other: &NeuralNetwork) {
        assert_eq!(self.topology, other.topology, "cannot copy parameters between different topologies");
        self.attention.clone_from(&other.attention);
        self.layers.clone_from(&other.layers);
    }

    /// Whether both networks hold bit-identical parameters.
    pub fn same_parameters(&self, other: &NeuralNetwork) -> bool {
        self.topology == other.topology && self.attention == other.attention && self.layers == other.layers
    }

    pub fn parameter_count(&self) -> usize {
        let gate = self.attention.as_ref().map_or(0, |gate| gate.probs.parameter_count());
        gate + self.layers.iter().map(DenseLayer::parameter_count).sum::<usize>()
    }

    /// Save the network's parameters to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let blob = ParametersRef {
            topology: &self.topology,
            attention: &self.attention,
            layers: &self.layers,
        };
        let serialized = bincode::serialize(&blob)?;
        fs::write(path.as_ref(), serialized)?;
        info!("Saved network parameters to {:?}", path.as_ref());
        Ok(())
    }

    /// Replace this network's parameters with the ones saved at `path`.
    /// The saved topology must match this network's.
    pub fn load_parameters<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let data = fs::read(path.as_ref())?;
        let parameters: Parameters = bincode::deserialize(&data)?;
        if parameters.topology != self.topology {
            return Err(DqnError::TopologyMismatch {
                expected: self.topology.describe(),
                actual: parameters.topology.describe(),
            });
        }
        self.attention = parameters.attention;
        self.layers = parameters.layers;
        info!("Loaded network parameters from {:?}", path.as_ref());
        Ok(())
    }
}
