use ndarray::{Array1, Array2, ArrayView2};
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::activations::Activation;
use super::dense::DenseLayer;
use super::initialization::WeightInit;

/// Element-wise attention gate over the raw observation.
///
/// A square sigmoid layer produces one weight in `(0, 1)` per observation
/// component and the gate returns `input * weights`, so lidar beams the
/// network has learned to ignore are scaled towards zero before they reach
/// the first hidden layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AttentionGate {
    pub probs: DenseLayer,
}

/// Intermediate values of a gated forward pass, kept for backpropagation.
pub struct GateTrace {
    pub pre_activation: Array2<f32>,
    pub probs: Array2<f32>,
}

impl AttentionGate {
    pub fn new<R: Rng + ?Sized>(input_size: usize, rng: &mut R) -> Self {
        AttentionGate {
            probs: DenseLayer::new_with_init(
                input_size,
                input_size,
                Activation::Sigmoid,
                WeightInit::GlorotUniform,
                rng,
            ),
        }
    }

    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        let probs = self.probs.forward_batch(inputs);
        &inputs * &probs
    }

    pub fn forward_cached(&self, inputs: ArrayView2<f32>) -> (GateTrace, Array2<f32>) {
        let (pre_activation, probs) = self.probs.forward_cached(inputs);
        let gated = &inputs * &probs;
        (GateTrace { pre_activation, probs }, gated)
    }

    /// Gradients of the gate parameters given the error at the gated output.
    /// The observation is the network input, so no error is propagated further.
    pub fn backward_batch(
        &self,
        inputs: ArrayView2<f32>,
        trace: &GateTrace,
        output_errors: ArrayView2<f32>,
    ) -> (Array2<f32>, Array1<f32>) {
        debug_assert_eq!(trace.probs.dim(), inputs.dim());
        let probs_error = &output_errors * &inputs;
        let (_adjusted_error, weight_gradients, bias_gradients) =
            self.probs.backward_batch(inputs, trace.pre_activation.view(), probs_error.view());
        (weight_gradients, bias_gradients)
    }

    pub fn size(&self) -> usize {
        self.probs.input_size()
    }
}
