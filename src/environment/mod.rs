//! # Environment Boundary
//!
//! The simulator is an external collaborator. The training loop only needs
//! `reset`, `step` and an optional episode-number hook; reward shaping and
//! observation encoding belong to the implementation.

pub mod corridor;

pub use corridor::{CorridorConfig, LidarCorridor};

use ndarray::Array1;
use crate::error::Result;

/// Auxiliary per-step information reported by the environment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepInfo {
    /// Reward component attributable to collisions
    pub collision_reward: f32,
}

/// Outcome of one environment step.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub observation: Array1<f32>,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

pub trait Environment {
    /// Start a new episode and return its first observation.
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Apply `action` and advance the simulation by one step.
    fn step(&mut self, action: usize) -> Result<Step>;

    /// Informs the environment which episode is about to run, so it can
    /// adapt its reward function.
    fn set_episode(&mut self, _episode: usize) {}
}
