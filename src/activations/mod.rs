//! # Activation Functions Module
//!
//! The activations a navigation Q-network is built from:
//!
//! - **LeakyReLU**: hidden layers, `alpha = 0.01` by default
//! - **Sigmoid**: the attention gate over the raw observation
//! - **Linear**: the action-value output layer
//! - **ReLU**: available for experiments with plain rectifiers

pub mod functions;

pub use functions::{Activation, DEFAULT_LEAKY_ALPHA};
