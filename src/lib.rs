//! # navdqn - Deep Q-Learning for Lidar Robot Navigation
//!
//! navdqn trains a robot to navigate from lidar range readings with a Deep
//! Q-Network. It provides the learning core (replay memory, online and
//! target value networks, mini-batch Bellman updates, action selection)
//! and the episodic loop that drives it against a simulator.
//!
//! ## Key Features
//!
//! - **Value Networks**: Dense networks with an optional sigmoid attention
//!   gate over the observation, LeakyReLU hidden layers and linear outputs
//! - **Experience Replay**: Fixed-capacity ring memory with uniform sampling
//! - **Target Network**: Exact parameter sync on a fixed step period
//! - **Optimizers**: SGD, Adam, RMSProp with per-layer state
//! - **Checkpoints**: Binary weight files plus resumable JSON parameters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use navdqn::environment::{CorridorConfig, LidarCorridor};
//! use navdqn::training::{TrainingConfig, TrainingLoop};
//!
//! let config = TrainingConfig {
//!     epochs: 50,
//!     network_inputs: 20,
//!     network_outputs: 3,
//!     ..TrainingConfig::default()
//! };
//! let mut env = LidarCorridor::new(CorridorConfig::default(), 42);
//! let mut training = TrainingLoop::new(config).unwrap();
//! let summary = training.run(&mut env).unwrap();
//! println!("best reward: {}", summary.highest_reward);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions (LeakyReLU, Sigmoid, Linear, ReLU)
//! - [`agent`] - The DQN agent and its exploration policies
//! - [`environment`] - Simulator boundary and a lidar corridor simulator
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers, the attention gate and weight initialization
//! - [`loss`] - Loss functions for training
//! - [`network`] - Network topology, construction and persistence
//! - [`optimizer`] - Optimization algorithms
//! - [`replay_memory`] - Experience replay
//! - [`training`] - Episodic training loop, statistics and checkpoints
//! - [`value_function`] - Online and target networks

pub mod activations;
pub mod agent;
pub mod environment;
pub mod error;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optimizer;
pub mod replay_memory;
pub mod training;
pub mod value_function;

#[cfg(test)]
mod tests;
