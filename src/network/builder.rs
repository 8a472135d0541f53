use rand::Rng;
use crate::activations::Activation;
use crate::error::Result;
use crate::layers::{AttentionGate, DenseLayer, WeightInit};
use crate::optimizer::OptimizerWrapper;
use super::{NeuralNetwork, NetworkTopology};

/// Build a freshly initialized network for `topology`.
///
/// Hidden and output layers use Glorot-uniform weights; a network without
/// hidden layers is a single LeCun-uniform linear layer.
pub fn build_network<R: Rng + ?Sized>(
    topology: &NetworkTopology,
    optimizer: OptimizerWrapper,
    rng: &mut R,
) -> Result<NeuralNetwork> {
    topology.validate()?;

    if topology.hidden_layers.is_empty() {
        let output = DenseLayer::new_with_init(
            topology.input_size,
            topology.output_size,
            Activation::Linear,
            WeightInit::LecunUniform,
            rng,
        );
        return Ok(NeuralNetwork::from_parts(topology.clone(), None, vec![output], optimizer));
    }

    let attention = if topology.has_attention() {
        Some(AttentionGate::new(topology.input_size, rng))
    } else {
        None
    };

    let sizes = topology.layer_sizes();
    let last = sizes.len() - 2;
    let layers = sizes
        .windows(2)
        .enumerate()
        .map(|(i, window)| {
            let activation = if i == last { Activation::Linear } else { topology.hidden_activation };
            DenseLayer::new_with_init(window[0], window[1], activation, WeightInit::GlorotUniform, &mut *rng)
        })
        .collect::<Vec<_>>();

    Ok(NeuralNetwork::from_parts(topology.clone(), attention, layers, optimizer))
}
