//! Gradient-descent optimizers for the online Q-network.
//!
//! Every trainable tensor of a network is addressed by a *slot* index
//! (attention gate first, then dense layers in order), so stateful
//! optimizers keep their moment estimates per tensor.

use ndarray::{Array1, Array2};
use serde::{Serialize, Deserialize};

pub trait Optimizer {
    /// Called once before the parameter updates of a training step.
    fn begin_step(&mut self) {}

    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);
}

/// Serializable choice of optimizer, used by agent configuration.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum OptimizerKind {
    Sgd,
    Adam,
    RmsProp,
}

impl Default for OptimizerKind {
    fn default() -> Self {
        OptimizerKind::Adam
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
    RMSProp(RMSProp),
}

impl OptimizerWrapper {
    pub fn from_kind(kind: OptimizerKind) -> Self {
        match kind {
            OptimizerKind::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerKind::Adam => OptimizerWrapper::Adam(Adam::default()),
            OptimizerKind::RmsProp => OptimizerWrapper::RMSProp(RMSProp::default()),
        }
    }

    pub fn kind(&self) -> OptimizerKind {
        match self {
            OptimizerWrapper::SGD(_) => OptimizerKind::Sgd,
            OptimizerWrapper::Adam(_) => OptimizerKind::Adam,
            OptimizerWrapper::RMSProp(_) => OptimizerKind::RmsProp,
        }
    }
}

impl Optimizer for OptimizerWrapper {
    fn begin_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.begin_step(),
        }
    }

    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(slot, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(slot, weights, gradients, learning_rate),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.update_weights(slot, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(slot, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(slot, biases, gradients, learning_rate),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.update_biases(slot, biases, gradients, learning_rate),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Lazily sized per-slot state.
fn slot_state<T: Clone, F: FnOnce() -> T>(states: &mut Vec<Option<T>>, slot: usize, init: F) -> &mut T {
    if states.len() <= slot {
        states.resize(slot + 1, None);
    }
    states[slot].get_or_insert_with(init)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Option<Array2<f32>>>,
    v_weights: Vec<Option<Array2<f32>>>,
    m_biases: Vec<Option<Array1<f32>>>,
    v_biases: Vec<Option<Array1<f32>>>,
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 0,
        }
    }

    fn bias_corrections(&self) -> (f32, f32) {
        let t = self.t.max(1);
        (1.0 - self.beta1.powi(t), 1.0 - self.beta2.powi(t))
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-7)
    }
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let (c1, c2) = self.bias_corrections();
        let dim = weights.dim();

        let m = slot_state(&mut self.m_weights, slot, || Array2::zeros(dim));
        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        let m_hat = m.mapv(|x| x / c1);

        let v = slot_state(&mut self.v_weights, slot, || Array2::zeros(dim));
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
        let v_hat = v.mapv(|x| x / c2);

        *weights -= &((&m_hat / (v_hat.mapv(f32::sqrt) + epsilon)) * learning_rate);
    }

    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let (c1, c2) = self.bias_corrections();
        let dim = biases.dim();

        let m = slot_state(&mut self.m_biases, slot, || Array1::zeros(dim));
        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        let m_hat = m.mapv(|x| x / c1);

        let v = slot_state(&mut self.v_biases, slot, || Array1::zeros(dim));
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
        let v_hat = v.mapv(|x| x / c2);

        *biases -= &((&m_hat / (v_hat.mapv(f32::sqrt) + epsilon)) * learning_rate);
    }
}

/// RMSProp optimizer
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RMSProp {
    pub rho: f32,
    pub epsilon: f32,
    v_weights: Vec<Option<Array2<f32>>>,
    v_biases: Vec<Option<Array1<f32>>>,
}

impl RMSProp {
    pub fn new(rho: f32, epsilon: f32) -> Self {
        RMSProp {
            rho,
            epsilon,
            v_weights: Vec::new(),
            v_biases: Vec::new(),
        }
    }
}

impl Default for RMSProp {
    fn default() -> Self {
        Self::new(0.9, 1e-6)
    }
}

impl Optimizer for RMSProp {
    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let (rho, epsilon) = (self.rho, self.epsilon);
        let dim = weights.dim();

        let v = slot_state(&mut self.v_weights, slot, || Array2::zeros(dim));
        v.zip_mut_with(gradients, |v, &g| *v = rho * *v + (1.0 - rho) * g * g);

        *weights -= &((gradients / &(v.mapv(f32::sqrt) + epsilon)) * learning_rate);
    }

    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let (rho, epsilon) = (self.rho, self.epsilon);
        let dim = biases.dim();

        let v = slot_state(&mut self.v_biases, slot, || Array1::zeros(dim));
        v.zip_mut_with(gradients, |v, &g| *v = rho * *v + (1.0 - rho) * g * g);

        *biases -= &((gradients / &(v.mapv(f32::sqrt) + epsilon)) * learning_rate);
    }
}
