//! # Deep Q-Network Agent Module
//!
//! The agent ties together the replay memory and the online/target value
//! function:
//!
//! - **Action selection**: epsilon-greedy over online action-values, or the
//!   alternate power-law policy in [`explorer::power_law`]
//! - **Experience replay**: every transition is stored unconditionally
//! - **Learning**: Bellman targets bootstrapped from the target (or online)
//!   network, one gradient step per sampled mini-batch
//! - **Target sync**: exact copy of the online parameters on request
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use navdqn::agent::{AgentConfig, DeepQAgent};
//! use ndarray::Array1;
//!
//! let mut agent = DeepQAgent::new(AgentConfig::default()).unwrap();
//! let observation = Array1::zeros(118);
//! let action = agent.select_action(observation.view(), 1.0);
//! ```

pub mod config;
pub mod explorer;

mod dqn;

pub use config::AgentConfig;
pub use dqn::{DeepQAgent, DeepQAgentBuilder};
