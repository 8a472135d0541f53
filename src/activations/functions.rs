use ndarray::{Array2, ArrayView2};
use serde::{Serialize, Deserialize};

/// Slope used for negative inputs by the hidden layers of a navigation network.
pub const DEFAULT_LEAKY_ALPHA: f32 = 0.01;

/// An enumeration of the activation functions a navigation network can use.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Activation {
    Relu,
    Linear,
    Sigmoid,
    LeakyRelu { alpha: f32 },
}

impl Default for Activation {
    fn default() -> Self {
        Activation::LeakyRelu { alpha: DEFAULT_LEAKY_ALPHA }
    }
}

impl Activation {
    /// Apply the activation function to a batch of input arrays in-place.
    pub fn apply_batch(&self, inputs: &mut Array2<f32>) {
        if let Activation::Linear = self {
            return;
        }
        inputs.mapv_inplace(|v| self.value(v));
    }

    /// Compute the derivative of the activation function for a batch of
    /// pre-activation values.
    pub fn derivative_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Activation::Linear => Array2::ones(inputs.dim()),
            _ => inputs.mapv(|v| self.slope(v)),
        }
    }

    fn value(&self, v: f32) -> f32 {
        match self {
            Activation::Relu => v.max(0.0),
            Activation::Linear => v,
            Activation::Sigmoid => 1.0 / (1.0 + (-v).exp()),
            Activation::LeakyRelu { alpha } => if v > 0.0 { v } else { alpha * v },
        }
    }

    fn slope(&self, v: f32) -> f32 {
        match self {
            Activation::Relu => if v > 0.0 { 1.0 } else { 0.0 },
            Activation::Linear => 1.0,
            Activation::Sigmoid => {
                let sigmoid = 1.0 / (1.0 + (-v).exp());
                sigmoid * (1.0 - sigmoid)
            }
            Activation::LeakyRelu { alpha } => if v > 0.0 { 1.0 } else { *alpha },
        }
    }
}
