use ndarray::{Array2, ArrayView2};

/// Trait defining the interface for regression losses over a batch of
/// predicted action-values
pub trait Loss: Send + Sync {
    /// Compute the loss for a batch of predictions and targets
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32;

    /// Compute the gradient of the loss with respect to every prediction
    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32>;
}

/// Mean squared error averaged over every output of every sample.
///
/// Label components equal to the network's own prediction contribute zero
/// error, which is how a Q-value label restricts the update to the taken
/// action.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl Loss for MeanSquaredError {
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32 {
        let diff = &predictions - &targets;
        diff.mapv(|d| d * d).sum() / predictions.len() as f32
    }

    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32> {
        (&predictions - &targets) * (2.0 / predictions.len() as f32)
    }
}
