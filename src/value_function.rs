//! Online and target Q-networks.
//!
//! The online network is trained every learning step. The target network
//! is only ever written by [`ValueFunction::sync_target_from_online`], so
//! its parameters are always an exact snapshot of some earlier online
//! parameters.

use std::path::Path;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

use crate::error::Result;
use crate::network::{build_network, NetworkTopology, NeuralNetwork};
use crate::optimizer::OptimizerWrapper;

/// Which of the two parameter sets a prediction should use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QModel {
    Online,
    Target,
}

#[derive(Clone, Debug)]
pub struct ValueFunction {
    online: NeuralNetwork,
    target: NeuralNetwork,
    learning_rate: f32,
}

impl ValueFunction {
    /// Build two independently initialized networks of the same topology.
    pub fn new<R: Rng + ?Sized>(
        topology: &NetworkTopology,
        optimizer: OptimizerWrapper,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        let online = build_network(topology, optimizer.clone(), rng)?;
        let target = build_network(topology, optimizer, rng)?;
        Ok(ValueFunction { online, target, learning_rate })
    }

    pub fn topology(&self) -> &NetworkTopology {
        &self.online.topology
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn network(&self, model: QModel) -> &NeuralNetwork {
        match model {
            QModel::Online => &self.online,
            QModel::Target => &self.target,
        }
    }

    #[cfg(test)]
    pub(crate) fn network_mut(&mut self, model: QModel) -> &mut NeuralNetwork {
        match model {
            QModel::Online => &mut self.online,
            QModel::Target => &mut self.target,
        }
    }

    /// Action-values for one observation.
    pub fn predict(&self, model: QModel, observation: ArrayView1<f32>) -> Array1<f32> {
        self.network(model).forward(observation)
    }

    /// Action-values for a batch of observations, one per row.
    pub fn predict_batch(&self, model: QModel, observations: ArrayView2<f32>) -> Array2<f32> {
        self.network(model).forward_batch(observations)
    }

    pub fn sync_target_from_online(&mut self) {
        self.target.copy_parameters_from(&self.online);
        debug!("Target network synced ({} parameters)", self.target.parameter_count());
    }

    /// One gradient step on the online network over every row of
    /// `states`/`labels`. Returns the loss before the update.
    pub fn apply_gradient_step(&mut self, states: ArrayView2<f32>, labels: ArrayView2<f32>) -> f32 {
        self.online.train_batch(states, labels, self.learning_rate)
    }

    /// Persist the online parameters.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.online.save(path)
    }

    /// Restore the online parameters. The target network is left as is
    /// until the next sync.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.online.load_parameters(path)
    }
}
