use std::f32::consts::{FRAC_PI_2, PI};

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};
use super::{Environment, Step, StepInfo};

pub const FORWARD: usize = 0;
pub const TURN_LEFT: usize = 1;
pub const TURN_RIGHT: usize = 2;
pub const NUM_ACTIONS: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorridorConfig {
    /// Number of lidar beams, spread evenly over the front half-plane
    pub beams: usize,
    pub width: f32,
    pub length: f32,
    pub max_range: f32,
    /// Distance to a wall at which the robot counts as crashed
    pub collision_distance: f32,
    pub forward_speed: f32,
    pub turn_rate: f32,
    pub forward_reward: f32,
    pub turn_reward: f32,
    pub collision_reward: f32,
    pub goal_reward: f32,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        CorridorConfig {
            beams: 20,
            width: 2.0,
            length: 20.0,
            max_range: 3.5,
            collision_distance: 0.2,
            forward_speed: 0.2,
            turn_rate: 0.3,
            forward_reward: 5.0,
            turn_reward: 1.0,
            collision_reward: -200.0,
            goal_reward: 200.0,
        }
    }
}

/// A robot driving down a straight corridor, seeing the walls through a
/// fan of range beams normalized to `[0, 1]`.
///
/// Driving forward pays more than turning, touching a wall ends the
/// episode with a large penalty and reaching the far end with a bonus.
pub struct LidarCorridor {
    config: CorridorConfig,
    x: f32,
    y: f32,
    heading: f32,
    episode: usize,
    rng: StdRng,
}

impl LidarCorridor {
    pub fn new(config: CorridorConfig, seed: u64) -> Self {
        let y = config.width / 2.0;
        LidarCorridor {
            config,
            x: 0.0,
            y,
            heading: 0.0,
            episode: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &CorridorConfig {
        &self.config
    }

    pub fn episode(&self) -> usize {
        self.episode
    }

    pub fn position(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.heading)
    }

    fn beam_range(&self, angle: f32) -> f32 {
        let dy = angle.sin();
        let range = if dy > 1e-6 {
            (self.config.width - self.y) / dy
        } else if dy < -1e-6 {
            self.y / -dy
        } else {
            f32::INFINITY
        };
        range.min(self.config.max_range)
    }

    fn observe(&self) -> Array1<f32> {
        let beams = self.config.beams;
        Array1::from_shape_fn(beams, |i| {
            let offset = if beams == 1 {
                0.0
            } else {
                -FRAC_PI_2 + PI * i as f32 / (beams - 1) as f32
            };
            self.beam_range(self.heading + offset) / self.config.max_range
        })
    }
}

impl Environment for LidarCorridor {
    fn reset(&mut self) -> Result<Array1<f32>> {
        let margin = self.config.width / 4.0;
        self.x = 0.0;
        self.y = self.rng.gen_range(margin..self.config.width - margin);
        self.heading = self.rng.gen_range(-0.3..0.3);
        Ok(self.observe())
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        let reward = match action {
            FORWARD => self.config.forward_reward,
            TURN_LEFT => {
                self.heading += self.config.turn_rate;
                self.config.turn_reward
            }
            TURN_RIGHT => {
                self.heading -= self.config.turn_rate;
                self.config.turn_reward
            }
            _ => {
                return Err(DqnError::EnvironmentError(format!(
                    "action {} out of range for {} actions",
                    action, NUM_ACTIONS
                )))
            }
        };
        let speed = if action == FORWARD { self.config.forward_speed } else { self.config.forward_speed / 4.0 };
        self.x += speed * self.heading.cos();
        self.y += speed * self.heading.sin();

        let collided = self.y < self.config.collision_distance
            || self.y > self.config.width - self.config.collision_distance;
        let arrived = self.x >= self.config.length;

        let (reward, collision_reward) = if collided {
            (self.config.collision_reward, self.config.collision_reward)
        } else if arrived {
            (self.config.goal_reward, 0.0)
        } else {
            (reward, 0.0)
        };

        Ok(Step {
            observation: self.observe(),
            reward,
            done: collided || arrived,
            info: StepInfo { collision_reward },
        })
    }

    fn set_episode(&mut self, episode: usize) {
        self.episode = episode;
    }
}
