use serde::{Serialize, Deserialize};
use crate::activations::Activation;
use crate::error::{DqnError, Result};

/// Declarative description of a Q-network.
///
/// With no hidden layers the network is a single linear map from
/// observation to action-values. Otherwise the observation optionally
/// passes through an [`AttentionGate`](crate::layers::AttentionGate), then
/// one dense layer per entry of `hidden_layers`, then a linear output layer
/// with one unit per action.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NetworkTopology {
    pub input_size: usize,
    pub hidden_layers: Vec<usize>,
    pub output_size: usize,
    pub attention: bool,
    pub hidden_activation: Activation,
}

impl NetworkTopology {
    pub fn new(input_size: usize, hidden_layers: &[usize], output_size: usize) -> Self {
        NetworkTopology {
            input_size,
            hidden_layers: hidden_layers.to_vec(),
            output_size,
            attention: false,
            hidden_activation: Activation::default(),
        }
    }

    pub fn with_attention(mut self, attention: bool) -> Self {
        self.attention = attention;
        self
    }

    pub fn with_hidden_activation(mut self, activation: Activation) -> Self {
        self.hidden_activation = activation;
        self
    }

    /// Whether the built network actually carries an attention gate.
    /// Single-layer linear networks never do.
    pub fn has_attention(&self) -> bool {
        self.attention && !self.hidden_layers.is_empty()
    }

    /// Sizes of every dense layer boundary, input and output included.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.input_size);
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(self.output_size);
        sizes
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(DqnError::invalid_parameter("input_size", "must be greater than 0"));
        }
        if self.output_size == 0 {
            return Err(DqnError::invalid_parameter("output_size", "must be greater than 0"));
        }
        if self.hidden_layers.iter().any(|&size| size == 0) {
            return Err(DqnError::invalid_parameter("hidden_layers", "every hidden layer needs at least one unit"));
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        let sizes = self.layer_sizes()
            .iter()
            .map(|size| size.to_string())
            .collect::<Vec<_>>()
            .join("-");
        if self.has_attention() {
            format!("{} with attention", sizes)
        } else {
            sizes
        }
    }
}
