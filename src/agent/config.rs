use serde::{Serialize, Deserialize};
use crate::error::{DqnError, Result};
use crate::network::NetworkTopology;
use crate::optimizer::OptimizerKind;

/// Hyperparameters fixed for the lifetime of a [`DeepQAgent`](super::DeepQAgent).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AgentConfig {
    /// Observation size
    pub input_size: usize,
    /// Number of discrete actions
    pub output_size: usize,
    pub hidden_layers: Vec<usize>,
    /// Gate the observation through an attention layer
    pub attention: bool,
    /// Gamma, in `[0, 1)`
    pub discount_factor: f32,
    pub learning_rate: f32,
    /// Replay memory capacity
    pub memory_size: usize,
    /// Learning starts once the memory holds more than this many transitions
    pub learn_start: usize,
    pub optimizer: OptimizerKind,
    /// Seed for network initialization and sampling; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            input_size: 118,
            output_size: 4,
            hidden_layers: vec![300, 300],
            attention: true,
            discount_factor: 0.99,
            learning_rate: 0.00025,
            memory_size: 1_000_000,
            learn_start: 64,
            optimizer: OptimizerKind::Adam,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn topology(&self) -> NetworkTopology {
        NetworkTopology::new(self.input_size, &self.hidden_layers, self.output_size)
            .with_attention(self.attention)
    }

    pub fn validate(&self) -> Result<()> {
        self.topology().validate()?;
        if !(0.0..1.0).contains(&self.discount_factor) {
            return Err(DqnError::InvalidParameter {
                name: "discount_factor".to_string(),
                reason: format!("must be in [0, 1), got {}", self.discount_factor),
            });
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(DqnError::InvalidParameter {
                name: "learning_rate".to_string(),
                reason: format!("must be positive, got {}", self.learning_rate),
            });
        }
        if self.memory_size == 0 {
            return Err(DqnError::invalid_parameter("memory_size", "must be greater than 0"));
        }
        Ok(())
    }
}
